//! Step gates for the booking draft.
//!
//! Each gate lists the draft fields that are still missing for a step.
//! Email and phone are only checked for presence; their format is not
//! validated.

use log::debug;
use shared::{BookingDraft, DraftField, WizardStep};

use crate::domain::errors::BookingError;

/// Outcome of checking a draft against one step's gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftValidation {
    pub step: WizardStep,
    pub missing: Vec<DraftField>,
}

impl DraftValidation {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }

    /// `Ok(())` when nothing is missing, `ValidationFailed` otherwise
    pub fn into_result(self) -> Result<(), BookingError> {
        if self.is_valid() {
            Ok(())
        } else {
            debug!("Gate for {} failed: missing {:?}", self.step, self.missing);
            Err(BookingError::ValidationFailed {
                step: self.step,
                missing: self.missing,
            })
        }
    }
}

/// Whitespace-only input counts as missing
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check the fields required to leave `step`. Review and confirmed steps
/// have no passive gate.
pub fn validate_step(draft: &BookingDraft, step: WizardStep) -> DraftValidation {
    let missing = match step {
        WizardStep::SelectingSlot => missing_slot_fields(draft),
        WizardStep::EnteringDetails => missing_contact_fields(draft),
        WizardStep::Reviewing | WizardStep::Confirmed => Vec::new(),
    };
    DraftValidation { step, missing }
}

/// Every field a booking needs before it can be submitted
pub fn validate_complete(draft: &BookingDraft) -> DraftValidation {
    let mut missing = missing_slot_fields(draft);
    missing.extend(missing_contact_fields(draft));
    DraftValidation {
        step: WizardStep::Reviewing,
        missing,
    }
}

fn missing_slot_fields(draft: &BookingDraft) -> Vec<DraftField> {
    let mut missing = Vec::new();
    if draft.date.is_none() {
        missing.push(DraftField::Date);
    }
    if draft.time.is_none() {
        missing.push(DraftField::Time);
    }
    missing
}

fn missing_contact_fields(draft: &BookingDraft) -> Vec<DraftField> {
    [
        (DraftField::FirstName, &draft.first_name),
        (DraftField::LastName, &draft.last_name),
        (DraftField::Email, &draft.email),
        (DraftField::Phone, &draft.phone),
    ]
    .into_iter()
    .filter(|(_, value)| is_blank(value))
    .map(|(field, _)| field)
    .collect()
}
