//! # Booking Backend
//!
//! Contains all non-UI logic for booking a CV review appointment.
//!
//! This crate brings together:
//! - **Domain**: Calendar, step gates, the booking wizard and its sessions
//! - **Storage**: Slot and tier catalog, submission services
//! - **IO**: REST API exposing the domain to a frontend
//!
//! ## Architecture
//!
//! ```text
//! Frontend
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (calendar, wizard, sessions)
//!     ↓
//! Storage Layer (catalog, submission service)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::BookingConfig;
use crate::domain::{BookingSessionService, CalendarService, Clock, SystemClock};
use crate::storage::{
    load_catalog_file, BookingCatalog, HttpSubmissionService, SimulatedSubmissionService,
    StaticCatalog, SubmissionService,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub calendar_service: CalendarService,
    pub catalog: Arc<dyn BookingCatalog>,
    pub session_service: BookingSessionService,
}

impl AppState {
    pub fn new(
        clock: Arc<dyn Clock>,
        catalog: Arc<dyn BookingCatalog>,
        submission: Arc<dyn SubmissionService>,
    ) -> Self {
        let calendar_service = CalendarService::new(clock);
        let session_service =
            BookingSessionService::new(catalog.clone(), calendar_service.clone(), submission);
        Self {
            calendar_service,
            catalog,
            session_service,
        }
    }
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &BookingConfig) -> Result<AppState> {
    info!("Setting up catalog");
    let catalog: Arc<dyn BookingCatalog> = match &config.catalog_path {
        Some(path) => Arc::new(load_catalog_file(path)?),
        None => {
            info!("No catalog file configured, using built-in catalog");
            Arc::new(StaticCatalog::default())
        }
    };

    info!("Setting up submission service");
    let submission: Arc<dyn SubmissionService> = match &config.submission.endpoint {
        Some(endpoint) => {
            info!("Submitting bookings to {}", endpoint);
            Arc::new(HttpSubmissionService::new(
                endpoint.clone(),
                config.submission.timeout(),
            )?)
        }
        None => {
            info!(
                "No submission endpoint configured, simulating with {}ms latency",
                config.submission.simulated_latency_ms
            );
            Arc::new(SimulatedSubmissionService::new(
                config.submission.simulated_latency(),
            ))
        }
    };

    info!("Setting up application state");
    let mut state = AppState::new(Arc::new(SystemClock), catalog, submission);
    state.session_service = state
        .session_service
        .with_idle_ttl(config.sessions.idle_ttl());
    Ok(state)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    // CORS setup to allow frontend to make requests
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin '{}'", cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/calendar", io::rest::calendar_apis::router())
        .nest("/catalog", io::rest::catalog_apis::router())
        .nest("/bookings", io::rest::booking_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt; // for `oneshot`

    #[test]
    fn test_initialize_backend_with_defaults() {
        let state = initialize_backend(&BookingConfig::default()).unwrap();
        assert_eq!(state.catalog.currency(), "CHF");
        assert_eq!(state.catalog.tiers().len(), 3);
    }

    #[test]
    fn test_initialize_backend_missing_catalog_file() {
        let config = BookingConfig {
            catalog_path: Some("/nonexistent/catalog.yaml".into()),
            ..BookingConfig::default()
        };
        assert!(initialize_backend(&config).is_err());
    }

    #[test]
    fn test_create_router_rejects_bad_origin() {
        let state = test_support::test_state();
        assert!(create_router(state, "bad\norigin").is_err());
    }

    #[tokio::test]
    async fn test_router_nests_api_routes() -> Result<(), Box<dyn std::error::Error>> {
        let app = create_router(test_support::test_state(), "http://localhost:8080")?;

        let request = Request::builder()
            .uri("/api/catalog/tiers")
            .body(Body::empty())?;
        let response = app.clone().oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .method("POST")
            .uri("/api/bookings")
            .body(Body::empty())?;
        let response = app.oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::CREATED);
        Ok(())
    }
}
