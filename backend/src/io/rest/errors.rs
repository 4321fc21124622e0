//! Translation of domain errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::{error, warn};
use shared::ErrorResponse;

use crate::domain::BookingError;

/// Status code for each error class
pub fn status_for(error: &BookingError) -> StatusCode {
    match error {
        BookingError::ValidationFailed { .. } | BookingError::IneligibleSelection(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        BookingError::NotAllowed { .. } | BookingError::SubmissionInProgress => StatusCode::CONFLICT,
        BookingError::SubmissionFailed(_) => StatusCode::BAD_GATEWAY,
        BookingError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        BookingError::InvalidMonth(_) | BookingError::InvalidYear(_) => StatusCode::BAD_REQUEST,
        BookingError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            kind: self.kind().to_string(),
            missing_fields: self.missing_fields().to_vec(),
        };
        (status, Json(body)).into_response()
    }
}
