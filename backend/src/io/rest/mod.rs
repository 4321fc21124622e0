//! # REST API Interface Layer
//!
//! Provides HTTP REST endpoints for the booking flow.
//! This layer handles:
//! - HTTP request/response serialization and deserialization
//! - Translation of domain errors into status codes and JSON error bodies
//! - Request logging
//!
//! Every module exposes a `router()` that is nested under `/api` by
//! [`crate::create_router`]. Handlers hold no business logic; they call into
//! the calendar, the catalog or the booking session service.

pub mod booking_apis;
pub mod calendar_apis;
pub mod catalog_apis;
pub mod errors;
