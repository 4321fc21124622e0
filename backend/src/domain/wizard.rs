//! The three-step booking wizard.
//!
//! A [`BookingWizard`] owns one draft and walks it through
//! `SelectingSlot -> EnteringDetails -> Reviewing -> Confirmed`. Every
//! operation either applies completely or returns a [`BookingError`] and
//! leaves the wizard untouched. The only asynchronous step is the
//! submission, which is split into [`BookingWizard::begin_submission`] and
//! [`BookingWizard::finish_submission`] so an owner can release its lock
//! while the request is in flight.

use chrono::NaiveDate;
use log::{error, info, warn};
use shared::{
    BookingConfirmation, BookingDraft, BookingSummary, ContactDetailsUpdate, StepProgress,
    StepStatus, SubmissionAck, TimeSlot, WizardStep,
};
use std::sync::Arc;

use crate::domain::calendar::CalendarService;
use crate::domain::errors::{BookingError, SelectionIssue, WizardAction};
use crate::domain::summary::{build_confirmation, build_summary};
use crate::domain::validation::{validate_complete, validate_step};
use crate::storage::{BookingCatalog, SubmissionError, SubmissionService};

/// Steps shown in the progress indicator
const INDICATOR_STEPS: [WizardStep; 3] = [
    WizardStep::SelectingSlot,
    WizardStep::EnteringDetails,
    WizardStep::Reviewing,
];

/// Result of a confirm action that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Confirmed(SubmissionAck),
    /// A submission was already in flight; nothing was sent
    AlreadySubmitting,
}

pub struct BookingWizard {
    catalog: Arc<dyn BookingCatalog>,
    calendar: CalendarService,
    step: WizardStep,
    draft: BookingDraft,
    submitting: bool,
    last_error: Option<SubmissionError>,
    acknowledgement: Option<SubmissionAck>,
}

impl BookingWizard {
    pub fn new(catalog: Arc<dyn BookingCatalog>, calendar: CalendarService) -> Self {
        let draft = BookingDraft::new(catalog.default_tier());
        Self {
            catalog,
            calendar,
            step: WizardStep::SelectingSlot,
            draft,
            submitting: false,
            last_error: None,
            acknowledgement: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Cause of the most recent failed submission, cleared on the next attempt
    pub fn last_error(&self) -> Option<&SubmissionError> {
        self.last_error.as_ref()
    }

    pub fn acknowledgement(&self) -> Option<&SubmissionAck> {
        self.acknowledgement.as_ref()
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), BookingError> {
        self.require_step(WizardAction::SelectDate, WizardStep::SelectingSlot)?;
        self.check_day(date)?;

        if self.draft.date != Some(date) {
            if let Some(time) = self.draft.time.take() {
                info!("📅 Date changed to {}, clearing slot {}", date, time);
            }
        }
        self.draft.date = Some(date);
        info!("📅 Selected date {}", date);
        Ok(())
    }

    /// Select a slot on the chosen date. Sets the draft's time and tier together.
    pub fn select_slot(&mut self, time: &str) -> Result<(), BookingError> {
        self.require_step(WizardAction::SelectSlot, WizardStep::SelectingSlot)?;
        let date = self
            .draft
            .date
            .ok_or(BookingError::IneligibleSelection(SelectionIssue::NoDateSelected))?;
        let slot = self.check_slot(date, time)?;

        info!("⏰ Selected {} on {} ({} tier)", slot.time, date, slot.tier);
        self.draft.time = Some(slot.time);
        self.draft.tier = slot.tier;
        Ok(())
    }

    /// Slots for the chosen date, booked ones included. Empty until a date is chosen.
    pub fn available_slots(&self) -> Vec<TimeSlot> {
        self.draft
            .date
            .map(|date| self.catalog.list_slots_for(date))
            .unwrap_or_default()
    }

    /// Apply a partial edit of the contact and context fields
    pub fn update_details(&mut self, update: ContactDetailsUpdate) -> Result<(), BookingError> {
        self.require_step(WizardAction::EditDetails, WizardStep::EnteringDetails)?;

        let draft = &mut self.draft;
        if let Some(first_name) = update.first_name {
            draft.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            draft.last_name = last_name;
        }
        if let Some(email) = update.email {
            draft.email = email;
        }
        if let Some(phone) = update.phone {
            draft.phone = phone;
        }
        if let Some(current_role) = update.current_role {
            draft.current_role = current_role;
        }
        if let Some(experience_band) = update.experience_band {
            draft.experience_band = experience_band;
        }
        if let Some(goals) = update.goals {
            draft.goals = goals;
        }
        Ok(())
    }

    /// Move forward one step if the current step's gate passes
    pub fn advance(&mut self) -> Result<WizardStep, BookingError> {
        if self.submitting {
            return Err(BookingError::SubmissionInProgress);
        }

        let next = match self.step {
            WizardStep::SelectingSlot => {
                validate_step(&self.draft, WizardStep::SelectingSlot).into_result()?;
                self.check_selection()?;
                WizardStep::EnteringDetails
            }
            WizardStep::EnteringDetails => {
                validate_step(&self.draft, WizardStep::EnteringDetails).into_result()?;
                self.check_selection()?;
                WizardStep::Reviewing
            }
            step => {
                return Err(BookingError::NotAllowed {
                    action: WizardAction::Advance,
                    step,
                })
            }
        };

        info!("➡️ Advancing from {} to {}", self.step, next);
        self.step = next;
        Ok(next)
    }

    /// Move back one step. The draft is kept as is.
    pub fn retreat(&mut self) -> Result<WizardStep, BookingError> {
        if self.submitting {
            return Err(BookingError::SubmissionInProgress);
        }

        let previous = match self.step {
            WizardStep::EnteringDetails => WizardStep::SelectingSlot,
            WizardStep::Reviewing => WizardStep::EnteringDetails,
            step => {
                return Err(BookingError::NotAllowed {
                    action: WizardAction::Retreat,
                    step,
                })
            }
        };

        info!("⬅️ Going back from {} to {}", self.step, previous);
        self.step = previous;
        Ok(previous)
    }

    /// First half of a confirm. Returns the draft to submit, or `None` when a
    /// submission is already in flight.
    pub fn begin_submission(&mut self) -> Result<Option<BookingDraft>, BookingError> {
        if self.step != WizardStep::Reviewing {
            return Err(BookingError::NotAllowed {
                action: WizardAction::Confirm,
                step: self.step,
            });
        }
        if self.submitting {
            warn!("Confirm ignored: submission already in progress");
            return Ok(None);
        }

        validate_complete(&self.draft).into_result()?;
        self.check_selection()?;

        self.submitting = true;
        self.last_error = None;
        info!("📨 Submitting booking for {:?} {:?}", self.draft.date, self.draft.time);
        Ok(Some(self.draft.clone()))
    }

    /// Second half of a confirm: record what the submission service returned
    pub fn finish_submission(
        &mut self,
        result: Result<SubmissionAck, SubmissionError>,
    ) -> Result<SubmissionAck, BookingError> {
        if !self.submitting {
            return Err(BookingError::NotAllowed {
                action: WizardAction::Confirm,
                step: self.step,
            });
        }
        self.submitting = false;

        match result {
            Ok(ack) => {
                info!("✅ Booking confirmed with reference {}", ack.reference);
                self.step = WizardStep::Confirmed;
                self.acknowledgement = Some(ack.clone());
                Ok(ack)
            }
            Err(e) => {
                error!("Booking submission failed: {}", e);
                self.last_error = Some(e.clone());
                Err(BookingError::SubmissionFailed(e))
            }
        }
    }

    /// Submit the draft and move to `Confirmed` on success. On failure the
    /// wizard stays on the review step and can be confirmed again. Dropping
    /// the future mid-flight records the attempt as cancelled.
    pub async fn confirm_and_submit(
        &mut self,
        service: &dyn SubmissionService,
    ) -> Result<SubmitOutcome, BookingError> {
        let Some(draft) = self.begin_submission()? else {
            return Ok(SubmitOutcome::AlreadySubmitting);
        };
        let pending = PendingSubmission(self);
        let result = service.submit(&draft).await;
        pending.0.finish_submission(result).map(SubmitOutcome::Confirmed)
    }

    /// Start over with a fresh draft
    pub fn reset(&mut self) -> Result<(), BookingError> {
        if self.submitting {
            return Err(BookingError::SubmissionInProgress);
        }
        info!("🔄 Resetting booking wizard");
        self.step = WizardStep::SelectingSlot;
        self.draft = BookingDraft::new(self.catalog.default_tier());
        self.last_error = None;
        self.acknowledgement = None;
        Ok(())
    }

    /// Status of steps 1-3 for the progress indicator
    pub fn progress(&self) -> Vec<StepProgress> {
        INDICATOR_STEPS
            .iter()
            .map(|&step| StepProgress {
                step,
                number: step.number(),
                label: step.label().to_string(),
                status: if step < self.step {
                    StepStatus::Completed
                } else if step == self.step {
                    StepStatus::Current
                } else {
                    StepStatus::Upcoming
                },
            })
            .collect()
    }

    /// Appointment summary, available once date and time are chosen
    pub fn summary(&self) -> Result<BookingSummary, BookingError> {
        build_summary(&self.draft, self.catalog.as_ref())
    }

    /// Confirmation details, `None` until the booking is confirmed
    pub fn confirmation(&self) -> Result<Option<BookingConfirmation>, BookingError> {
        match (&self.step, &self.acknowledgement) {
            (WizardStep::Confirmed, Some(ack)) => {
                build_confirmation(&self.draft, ack, self.catalog.as_ref()).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn require_step(&self, action: WizardAction, expected: WizardStep) -> Result<(), BookingError> {
        if self.submitting {
            return Err(BookingError::SubmissionInProgress);
        }
        if self.step != expected {
            return Err(BookingError::NotAllowed {
                action,
                step: self.step,
            });
        }
        Ok(())
    }

    fn check_day(&self, date: NaiveDate) -> Result<(), BookingError> {
        let cell = self.calendar.day_cell(date);
        if cell.is_past {
            warn!("Rejected past date {}", date);
            return Err(BookingError::IneligibleSelection(SelectionIssue::PastDay(date)));
        }
        if cell.is_weekend {
            warn!("Rejected weekend date {}", date);
            return Err(BookingError::IneligibleSelection(SelectionIssue::WeekendDay(date)));
        }
        Ok(())
    }

    fn check_slot(&self, date: NaiveDate, time: &str) -> Result<TimeSlot, BookingError> {
        let slot = self.catalog.find_slot(date, time).ok_or_else(|| {
            BookingError::IneligibleSelection(SelectionIssue::UnknownSlot(time.to_string()))
        })?;
        if !slot.available {
            warn!("Rejected booked slot {} on {}", time, date);
            return Err(BookingError::IneligibleSelection(SelectionIssue::SlotBooked(
                slot.time,
            )));
        }
        Ok(slot)
    }

    /// Re-check a stored date and slot against the current day and catalog
    fn check_selection(&self) -> Result<(), BookingError> {
        if let Some(date) = self.draft.date {
            self.check_day(date)?;
            if let Some(time) = self.draft.time.as_deref() {
                self.check_slot(date, time)?;
            }
        }
        Ok(())
    }
}

/// Finishes a begun submission as cancelled unless it was finished normally
struct PendingSubmission<'a>(&'a mut BookingWizard);

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if self.0.submitting {
            warn!("Submission abandoned before the service answered");
            let _ = self.0.finish_submission(Err(SubmissionError::Cancelled));
        }
    }
}
