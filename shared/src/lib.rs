use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Service tier a time slot is sold under. Closed set; every catalog must
/// describe all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierId {
    #[default]
    Standard,
    Premium,
    Video,
}

impl TierId {
    pub const ALL: [TierId; 3] = [TierId::Standard, TierId::Premium, TierId::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            TierId::Standard => "standard",
            TierId::Premium => "premium",
            TierId::Video => "video",
        }
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Month/year pair used for calendar navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1 = January ... 12 = December
    pub month: u32,
}

impl YearMonth {
    /// Returns `None` when `month` is outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The following month, `None` past the last representable year
    pub fn next(self) -> Option<Self> {
        if self.month == 12 {
            let year = self.year.checked_add(1)?;
            Some(Self { year, month: 1 })
        } else {
            Some(Self { year: self.year, month: self.month + 1 })
        }
    }

    /// The preceding month, `None` before the first representable year
    pub fn previous(self) -> Option<Self> {
        if self.month == 1 {
            let year = self.year.checked_sub(1)?;
            Some(Self { year, month: 12 })
        } else {
            Some(Self { year: self.year, month: self.month - 1 })
        }
    }
}

/// One real day in a month grid. Padding cells are represented as `None`
/// by the grid itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_today: bool,
    /// Strictly before today; today itself is never past
    pub is_past: bool,
    pub is_weekend: bool,
    /// `!is_past && !is_weekend`
    pub available: bool,
}

impl DayCell {
    /// Day of month (1-based)
    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

/// Bookable time of day. Booked slots stay listed with `available = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// 24-hour local time, `HH:MM`
    pub time: String,
    pub available: bool,
    pub price: u32,
    pub tier: TierId,
}

/// Display attributes of a service tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub id: TierId,
    pub name: String,
    pub duration_label: String,
    pub price: u32,
    pub features: Vec<String>,
}

/// Years-of-experience bucket offered by the details form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceBand {
    #[serde(rename = "0-1")]
    ZeroToOne,
    #[serde(rename = "2-3")]
    TwoToThree,
    #[serde(rename = "4-5")]
    FourToFive,
    #[serde(rename = "6-10")]
    SixToTen,
    #[serde(rename = "10+")]
    TenPlus,
}

impl ExperienceBand {
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceBand::ZeroToOne => "0-1 years",
            ExperienceBand::TwoToThree => "2-3 years",
            ExperienceBand::FourToFive => "4-5 years",
            ExperienceBand::SixToTen => "6-10 years",
            ExperienceBand::TenPlus => "10+ years",
        }
    }
}

/// Everything the user has chosen or typed so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub date: Option<NaiveDate>,
    /// Only ever set while `date` is set
    pub time: Option<String>,
    /// Follows the selected slot's tier
    pub tier: TierId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub current_role: String,
    pub experience_band: Option<ExperienceBand>,
    pub goals: String,
}

impl BookingDraft {
    pub fn new(default_tier: TierId) -> Self {
        Self {
            tier: default_tier,
            ..Self::default()
        }
    }
}

/// Names a draft field a step gate requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Date,
    Time,
    FirstName,
    LastName,
    Email,
    Phone,
}

impl DraftField {
    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Date => "date",
            DraftField::Time => "time",
            DraftField::FirstName => "first name",
            DraftField::LastName => "last name",
            DraftField::Email => "email",
            DraftField::Phone => "phone",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Partial update of the contact/context fields. `None` leaves a field as is.
///
/// `experience_band` has three states: absent keeps the current band, `null`
/// clears it, a value replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetailsUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub current_role: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub experience_band: Option<Option<ExperienceBand>>,
    #[serde(default)]
    pub goals: Option<String>,
}

/// Maps a present field to `Some`, keeping `null` apart from a missing key
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Wizard steps. `Confirmed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    SelectingSlot,
    EnteringDetails,
    Reviewing,
    Confirmed,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::SelectingSlot => 1,
            WizardStep::EnteringDetails => 2,
            WizardStep::Reviewing => 3,
            WizardStep::Confirmed => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::SelectingSlot => "Select Date & Time",
            WizardStep::EnteringDetails => "Your Information",
            WizardStep::Reviewing => "Review & Confirm",
            WizardStep::Confirmed => "Booking Confirmed",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

/// One entry of the progress indicator (steps 1-3)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepProgress {
    pub step: WizardStep,
    pub number: u8,
    pub label: String,
    pub status: StepStatus,
}

/// Read-only view of a draft joined with its tier, used by the review and
/// confirmation screens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    pub date: NaiveDate,
    /// e.g. "Monday, June 16, 2025"
    pub date_label: String,
    pub time: String,
    pub tier: TierId,
    pub service_name: String,
    pub duration_label: String,
    pub price: u32,
    pub currency: String,
    /// e.g. "CHF 199"
    pub formatted_total: String,
    pub features: Vec<String>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub current_role: Option<String>,
    pub experience: Option<String>,
    pub goals: Option<String>,
}

/// Acknowledgement returned by the submission endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAck {
    pub reference: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub reference: String,
    pub message: String,
    pub summary: BookingSummary,
}

/// Body sent to an HTTP submission endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitBookingRequest {
    pub booking: BookingDraft,
}

// ---------------------------------------------------------------------------
// REST DTOs
// ---------------------------------------------------------------------------

/// Month grid as served to a frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonthView {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    /// Sunday first
    pub weekday_labels: Vec<String>,
    pub leading_blanks: u32,
    pub days_in_month: u32,
    pub cells: Vec<Option<DayCell>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentDateResponse {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub formatted_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotListResponse {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierListResponse {
    pub currency: String,
    pub tiers: Vec<Tier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectDateRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectSlotRequest {
    pub time: String,
}

/// Snapshot of one booking session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSessionView {
    pub session_id: String,
    pub step: WizardStep,
    pub step_number: u8,
    pub submitting: bool,
    pub draft: BookingDraft,
    /// Empty until a date is chosen
    pub available_slots: Vec<TimeSlot>,
    pub progress: Vec<StepProgress>,
    pub last_error: Option<String>,
    pub confirmation: Option<BookingConfirmation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<DraftField>,
}
