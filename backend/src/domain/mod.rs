//! # Domain Module
//!
//! Contains all business logic for the booking flow.
//!
//! The domain layer decides which days and slots can be picked, what a
//! booking needs before it can move on, and how the wizard moves between its
//! steps. It never reads the system clock or a catalog directly; both are
//! injected.
//!
//! ## Module Organization
//!
//! - **calendar**: Month grid generation and day classification
//! - **clock**: Injected time source
//! - **validation**: Step gates over the booking draft
//! - **summary**: Review and confirmation views
//! - **wizard**: The per-booking state machine
//! - **session_service**: Isolated wizards keyed by session id for the REST layer
//! - **errors**: The booking error taxonomy
//!
//! ## Business Rules
//!
//! - Past days and weekends can never be selected
//! - Booked slots are listed but can never be selected
//! - Choosing a slot sets the booking's tier to the slot's tier
//! - Choosing a different date clears the chosen slot
//! - A booking is submitted at most once per confirm

pub mod calendar;
pub mod clock;
pub mod errors;
pub mod session_service;
pub mod summary;
pub mod validation;
pub mod wizard;

pub use calendar::{CalendarService, MonthCells, MonthGrid};
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{BookingError, SelectionIssue, WizardAction};
pub use session_service::BookingSessionService;
pub use wizard::{BookingWizard, SubmitOutcome};
