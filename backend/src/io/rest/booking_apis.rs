use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use log::info;
use shared::{ContactDetailsUpdate, SelectDateRequest, SelectSlotRequest};
use uuid::Uuid;

use crate::domain::SubmitOutcome;
use crate::AppState;

/// Create a router for booking session APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/:id", get(get_booking).delete(delete_booking))
        .route("/:id/date", post(select_date))
        .route("/:id/slot", post(select_slot))
        .route("/:id/details", put(update_details))
        .route("/:id/advance", post(advance))
        .route("/:id/retreat", post(retreat))
        .route("/:id/confirm", post(confirm))
        .route("/:id/reset", post(reset))
        .route("/:id/summary", get(get_summary))
}

/// Start a new booking session
async fn create_booking(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/bookings");
    match state.session_service.create_session().await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_booking(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    info!("GET /api/bookings/{}", id);
    match state.session_service.get_session(id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_booking(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    info!("DELETE /api/bookings/{}", id);
    match state.session_service.delete_session(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

async fn select_date(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectDateRequest>,
) -> impl IntoResponse {
    info!("POST /api/bookings/{}/date - {}", id, request.date);
    match state.session_service.select_date(id, request.date).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn select_slot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectSlotRequest>,
) -> impl IntoResponse {
    info!("POST /api/bookings/{}/slot - {}", id, request.time);
    match state.session_service.select_slot(id, &request.time).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn update_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ContactDetailsUpdate>,
) -> impl IntoResponse {
    info!("PUT /api/bookings/{}/details", id);
    match state.session_service.update_details(id, update).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn advance(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    info!("POST /api/bookings/{}/advance", id);
    match state.session_service.advance(id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn retreat(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    info!("POST /api/bookings/{}/retreat", id);
    match state.session_service.retreat(id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Submit the booking. Answers 202 when another confirm is still in flight.
async fn confirm(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    info!("POST /api/bookings/{}/confirm", id);
    match state.session_service.confirm(id).await {
        Ok((SubmitOutcome::Confirmed(_), view)) => (StatusCode::OK, Json(view)).into_response(),
        Ok((SubmitOutcome::AlreadySubmitting, view)) => {
            (StatusCode::ACCEPTED, Json(view)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn reset(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    info!("POST /api/bookings/{}/reset", id);
    match state.session_service.reset(id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_summary(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    info!("GET /api/bookings/{}/summary", id);
    match state.session_service.summary(id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => e.into_response(),
    }
}
