use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;
use serde::Deserialize;
use shared::YearMonth;

use crate::domain::BookingError;
use crate::AppState;

// Query parameters for calendar month APIs
#[derive(Debug, Deserialize)]
pub struct CalendarMonthQuery {
    pub year: i32,
    pub month: u32,
}

/// Create a router for calendar related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/month", get(get_calendar_month))
        .route("/month/next", get(get_next_month))
        .route("/month/previous", get(get_previous_month))
        .route("/current-date", get(get_current_date))
}

/// Get the day grid for one month
async fn get_calendar_month(
    State(state): State<AppState>,
    Query(query): Query<CalendarMonthQuery>,
) -> impl IntoResponse {
    info!("GET /api/calendar/month - query: {:?}", query);
    month_response(&state, query.year, query.month)
}

/// Get the grid for the month after the one given
async fn get_next_month(
    State(state): State<AppState>,
    Query(query): Query<CalendarMonthQuery>,
) -> impl IntoResponse {
    info!("GET /api/calendar/month/next - query: {:?}", query);
    let next = YearMonth::new(query.year, query.month)
        .ok_or(BookingError::InvalidMonth(query.month))
        .and_then(|focus| state.calendar_service.next_month(focus));
    match next {
        Ok(next) => month_response(&state, next.year, next.month),
        Err(e) => e.into_response(),
    }
}

/// Get the grid for the month before the one given
async fn get_previous_month(
    State(state): State<AppState>,
    Query(query): Query<CalendarMonthQuery>,
) -> impl IntoResponse {
    info!("GET /api/calendar/month/previous - query: {:?}", query);
    let previous = YearMonth::new(query.year, query.month)
        .ok_or(BookingError::InvalidMonth(query.month))
        .and_then(|focus| state.calendar_service.previous_month(focus));
    match previous {
        Ok(previous) => month_response(&state, previous.year, previous.month),
        Err(e) => e.into_response(),
    }
}

/// Get current date information from the backend
async fn get_current_date(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/calendar/current-date");
    let current_date = state.calendar_service.get_current_date();
    (StatusCode::OK, Json(current_date)).into_response()
}

fn month_response(state: &AppState, year: i32, month: u32) -> axum::response::Response {
    match state.calendar_service.month_view(year, month) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use axum::{
        body::Body,
        http::{Method, Request},
    };
    use shared::{CalendarMonthView, CurrentDateResponse, ErrorResponse};
    use tower::util::ServiceExt; // for `oneshot`

    fn setup_test_app() -> Router {
        router().with_state(test_state())
    }

    async fn get(uri: &str) -> Result<(StatusCode, Vec<u8>), Box<dyn std::error::Error>> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())?;
        let response = setup_test_app().oneshot(request).await?;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, body.to_vec()))
    }

    #[tokio::test]
    async fn test_get_calendar_month() -> Result<(), Box<dyn std::error::Error>> {
        let (status, body) = get("/month?year=2025&month=6").await?;
        assert_eq!(status, StatusCode::OK);

        let view: CalendarMonthView = serde_json::from_slice(&body)?;
        assert_eq!(view.month_name, "June");
        assert_eq!(view.leading_blanks, 0);
        assert_eq!(view.cells.len(), 30);

        let today = view.cells[10].as_ref().ok_or("missing cell")?;
        assert!(today.is_today);
        assert!(today.available);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_calendar_month_invalid() -> Result<(), Box<dyn std::error::Error>> {
        let (status, body) = get("/month?year=2025&month=13").await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ErrorResponse = serde_json::from_slice(&body)?;
        assert_eq!(error.kind, "invalid_month");
        Ok(())
    }

    #[tokio::test]
    async fn test_month_navigation_rolls_over_year() -> Result<(), Box<dyn std::error::Error>> {
        let (status, body) = get("/month/next?year=2025&month=12").await?;
        assert_eq!(status, StatusCode::OK);
        let view: CalendarMonthView = serde_json::from_slice(&body)?;
        assert_eq!((view.year, view.month), (2026, 1));
        assert_eq!(view.leading_blanks, 4);

        let (status, body) = get("/month/previous?year=2025&month=1").await?;
        assert_eq!(status, StatusCode::OK);
        let view: CalendarMonthView = serde_json::from_slice(&body)?;
        assert_eq!((view.year, view.month), (2024, 12));
        Ok(())
    }

    #[tokio::test]
    async fn test_month_navigation_past_year_range() -> Result<(), Box<dyn std::error::Error>> {
        let (status, body) = get("/month/next?year=2147483647&month=12").await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_slice(&body)?;
        assert_eq!(error.kind, "invalid_year");

        let (status, body) = get("/month/previous?year=-2147483648&month=1").await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_slice(&body)?;
        assert_eq!(error.kind, "invalid_year");

        // Representable as integers but outside the calendar's range
        let (status, body) = get("/month/next?year=2147483646&month=12").await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_slice(&body)?;
        assert_eq!(error.kind, "invalid_year");
        Ok(())
    }

    #[tokio::test]
    async fn test_get_current_date() -> Result<(), Box<dyn std::error::Error>> {
        let (status, body) = get("/current-date").await?;
        assert_eq!(status, StatusCode::OK);

        let current: CurrentDateResponse = serde_json::from_slice(&body)?;
        assert_eq!(current.formatted_date, "June 11, 2025");
        Ok(())
    }
}
