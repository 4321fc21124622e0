use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use log::info;
use serde::Deserialize;
use shared::{SlotListResponse, TierListResponse};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
}

/// Create a router for catalog related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tiers", get(list_tiers))
        .route("/slots", get(list_slots))
}

/// List the tiers with their prices and features
async fn list_tiers(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/catalog/tiers");
    let response = TierListResponse {
        currency: state.catalog.currency().to_string(),
        tiers: state.catalog.tiers(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// List the slots offered on a date, booked ones included
async fn list_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotQuery>,
) -> impl IntoResponse {
    info!("GET /api/catalog/slots - date: {}", query.date);
    let response = SlotListResponse {
        date: query.date,
        slots: state.catalog.list_slots_for(query.date),
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use axum::{
        body::Body,
        http::{Method, Request},
    };
    use shared::TierId;
    use tower::util::ServiceExt; // for `oneshot`

    async fn get(uri: &str) -> Result<(StatusCode, Vec<u8>), Box<dyn std::error::Error>> {
        let app = router().with_state(test_state());
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())?;
        let response = app.oneshot(request).await?;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, body.to_vec()))
    }

    #[tokio::test]
    async fn test_list_tiers() -> Result<(), Box<dyn std::error::Error>> {
        let (status, body) = get("/tiers").await?;
        assert_eq!(status, StatusCode::OK);

        let response: TierListResponse = serde_json::from_slice(&body)?;
        assert_eq!(response.currency, "CHF");
        let ids: Vec<TierId> = response.tiers.iter().map(|tier| tier.id).collect();
        assert_eq!(ids, vec![TierId::Standard, TierId::Premium, TierId::Video]);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_slots_keeps_booked_entries() -> Result<(), Box<dyn std::error::Error>> {
        let (status, body) = get("/slots?date=2025-06-16").await?;
        assert_eq!(status, StatusCode::OK);

        let response: SlotListResponse = serde_json::from_slice(&body)?;
        assert_eq!(response.slots.len(), 12);
        assert_eq!(response.slots.first().map(|slot| slot.time.as_str()), Some("09:00"));
        assert_eq!(response.slots.iter().filter(|slot| !slot.available).count(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_slots_rejects_bad_date() -> Result<(), Box<dyn std::error::Error>> {
        let (status, _) = get("/slots?date=16.06.2025").await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }
}
