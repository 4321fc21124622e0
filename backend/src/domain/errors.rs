use chrono::NaiveDate;
use shared::{DraftField, WizardStep};
use std::fmt;
use uuid::Uuid;

use crate::storage::{CatalogError, SubmissionError};

/// User actions the wizard accepts, used to report an action attempted on
/// the wrong step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    SelectDate,
    SelectSlot,
    EditDetails,
    Advance,
    Retreat,
    Confirm,
}

impl fmt::Display for WizardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            WizardAction::SelectDate => "select a date",
            WizardAction::SelectSlot => "select a time slot",
            WizardAction::EditDetails => "edit contact details",
            WizardAction::Advance => "advance",
            WizardAction::Retreat => "go back",
            WizardAction::Confirm => "confirm the booking",
        };
        f.write_str(text)
    }
}

/// Why a day or slot could not be selected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionIssue {
    #[error("{0} is in the past")]
    PastDay(NaiveDate),
    #[error("{0} falls on a weekend")]
    WeekendDay(NaiveDate),
    #[error("the {0} slot is already booked")]
    SlotBooked(String),
    #[error("there is no {0} slot on the selected date")]
    UnknownSlot(String),
    #[error("a date must be selected before a time")]
    NoDateSelected,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    /// A step gate failed; the wizard stays where it is
    #[error("Cannot leave {step}: missing {}", field_list(.missing))]
    ValidationFailed {
        step: WizardStep,
        missing: Vec<DraftField>,
    },
    /// Draft is left untouched
    #[error("Selection rejected: {0}")]
    IneligibleSelection(SelectionIssue),
    /// The wizard is back on the review step and can be confirmed again
    #[error("Submission failed: {0}")]
    SubmissionFailed(#[from] SubmissionError),
    #[error("Cannot {action} on {step}")]
    NotAllowed {
        action: WizardAction,
        step: WizardStep,
    },
    #[error("A submission is already in progress")]
    SubmissionInProgress,
    #[error("Booking session {0} not found")]
    SessionNotFound(Uuid),
    #[error("Invalid month: {0}. Must be between 1 and 12")]
    InvalidMonth(u32),
    #[error("Year {0} is outside the supported calendar range")]
    InvalidYear(i32),
    /// Broken catalog; a defect, not a user error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl BookingError {
    /// Stable machine-readable name for API responses
    pub fn kind(&self) -> &'static str {
        match self {
            BookingError::ValidationFailed { .. } => "validation_failed",
            BookingError::IneligibleSelection(_) => "ineligible_selection",
            BookingError::SubmissionFailed(_) => "submission_failed",
            BookingError::NotAllowed { .. } => "not_allowed",
            BookingError::SubmissionInProgress => "submission_in_progress",
            BookingError::SessionNotFound(_) => "session_not_found",
            BookingError::InvalidMonth(_) => "invalid_month",
            BookingError::InvalidYear(_) => "invalid_year",
            BookingError::Catalog(_) => "catalog_error",
        }
    }

    pub fn missing_fields(&self) -> &[DraftField] {
        match self {
            BookingError::ValidationFailed { missing, .. } => missing.as_slice(),
            _ => &[],
        }
    }
}

fn field_list(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}
