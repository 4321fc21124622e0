//! # Storage Traits
//!
//! Abstractions over the two collaborators the booking flow depends on: the
//! catalog of slots and tiers, and the service that accepts a finished
//! booking. The domain layer only sees these traits, so a real backend can
//! replace the built-in catalog or the simulated submission without touching
//! the wizard.

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{BookingDraft, SubmissionAck, Tier, TierId, TimeSlot};
use std::time::Duration;

/// Catalog problems. These indicate a broken catalog definition, never bad
/// user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Tier '{0}' is not defined in the catalog")]
    TierNotFound(TierId),
    #[error("Tier '{0}' is defined more than once")]
    DuplicateTier(TierId),
    #[error("Slot time '{0}' is not a valid HH:MM time")]
    InvalidSlotTime(String),
    #[error("Slot time '{0}' appears more than once")]
    DuplicateSlot(String),
    #[error("Booked override for {date} names unknown slot '{time}'")]
    UnknownBookedSlot { date: NaiveDate, time: String },
}

/// Why the external submission did not produce an acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Booking was rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Submission endpoint unreachable: {0}")]
    Transport(String),
    #[error("Submission timed out after {0:?}")]
    Timeout(Duration),
    #[error("Unexpected response from submission endpoint: {0}")]
    InvalidResponse(String),
    /// The confirm was abandoned before the service answered
    #[error("Submission was cancelled before it completed")]
    Cancelled,
}

/// Source of time slots and tier descriptions
pub trait BookingCatalog: Send + Sync {
    /// Slots offered on `date`, in time order. Booked slots are included
    /// with `available = false`.
    fn list_slots_for(&self, date: NaiveDate) -> Vec<TimeSlot>;

    /// All tiers, in catalog order
    fn tiers(&self) -> Vec<Tier>;

    /// Look up one tier. Tier ids are a closed set, so `TierNotFound`
    /// means the catalog itself is broken.
    fn tier_of(&self, id: TierId) -> Result<Tier, CatalogError>;

    /// Currency code the prices are expressed in
    fn currency(&self) -> &str;

    /// Tier a fresh draft starts with: the first one in the catalog
    fn default_tier(&self) -> TierId {
        self.tiers().first().map(|tier| tier.id).unwrap_or_default()
    }

    fn find_slot(&self, date: NaiveDate, time: &str) -> Option<TimeSlot> {
        self.list_slots_for(date)
            .into_iter()
            .find(|slot| slot.time == time)
    }
}

/// Accepts a finalized booking. Called at most once per confirm action.
#[async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit(&self, draft: &BookingDraft) -> Result<SubmissionAck, SubmissionError>;
}
