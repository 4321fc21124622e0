//! # Storage Module
//!
//! Everything the booking flow reads from or hands off to the outside world.
//!
//! The booking core owns no persisted state. It reads slot and tier
//! definitions from a catalog and hands a finished booking to a submission
//! service. Both are reached through the traits in [`traits`], so the
//! built-in tables and the simulated submission can be swapped for a real
//! backend without affecting the domain layer.
//!
//! ## Implementations
//!
//! - **StaticCatalog**: built-in slot template and tier table, optionally
//!   loaded from a YAML file with per-date booked overrides
//! - **SimulatedSubmissionService**: accepts every booking after a delay
//! - **HttpSubmissionService**: POSTs the booking to a configured endpoint

pub mod catalog;
pub mod submission;
pub mod traits;

pub use catalog::{load_catalog_file, StaticCatalog};
pub use submission::{HttpSubmissionService, SimulatedSubmissionService};
pub use traits::{BookingCatalog, CatalogError, SubmissionError, SubmissionService};
