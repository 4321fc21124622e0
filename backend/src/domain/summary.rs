//! Read-only views of a draft for the review and confirmation screens.

use shared::{BookingConfirmation, BookingDraft, BookingSummary, SubmissionAck, WizardStep};

use crate::domain::calendar::format_long_date;
use crate::domain::errors::BookingError;
use crate::domain::validation::{is_blank, validate_step};
use crate::storage::BookingCatalog;

/// Join a draft with its tier. Requires date and time to be set.
pub fn build_summary(
    draft: &BookingDraft,
    catalog: &dyn BookingCatalog,
) -> Result<BookingSummary, BookingError> {
    let (Some(date), Some(time)) = (draft.date, draft.time.as_ref()) else {
        let gate = validate_step(draft, WizardStep::SelectingSlot);
        return Err(BookingError::ValidationFailed {
            step: gate.step,
            missing: gate.missing,
        });
    };

    let tier = catalog.tier_of(draft.tier)?;
    let currency = catalog.currency().to_string();

    Ok(BookingSummary {
        date,
        date_label: format_long_date(date),
        time: time.clone(),
        tier: tier.id,
        formatted_total: format_price(&currency, tier.price),
        service_name: tier.name,
        duration_label: tier.duration_label,
        price: tier.price,
        currency,
        features: tier.features,
        full_name: format!("{} {}", draft.first_name.trim(), draft.last_name.trim())
            .trim()
            .to_string(),
        email: draft.email.trim().to_string(),
        phone: draft.phone.trim().to_string(),
        current_role: non_blank(&draft.current_role),
        experience: draft.experience_band.map(|band| band.label().to_string()),
        goals: non_blank(&draft.goals),
    })
}

/// Confirmation screen contents for an acknowledged booking
pub fn build_confirmation(
    draft: &BookingDraft,
    ack: &SubmissionAck,
    catalog: &dyn BookingCatalog,
) -> Result<BookingConfirmation, BookingError> {
    let summary = build_summary(draft, catalog)?;
    Ok(BookingConfirmation {
        reference: ack.reference.clone(),
        message: thank_you_message(&draft.first_name),
        summary,
    })
}

pub fn thank_you_message(first_name: &str) -> String {
    format!(
        "Thank you {}! Your CV review appointment has been successfully booked. \
         You'll receive a confirmation email shortly with all the details.",
        first_name.trim()
    )
}

/// e.g. "CHF 199"
pub fn format_price(currency: &str, amount: u32) -> String {
    format!("{} {}", currency, amount)
}

fn non_blank(value: &str) -> Option<String> {
    if is_blank(value) {
        None
    } else {
        Some(value.trim().to_string())
    }
}
