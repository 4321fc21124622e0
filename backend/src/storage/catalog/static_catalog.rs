//! In-memory catalog: one daily slot template applied to every date, plus
//! optional per-date booked overrides.

use chrono::{NaiveDate, NaiveTime};
use log::debug;
use shared::{Tier, TierId, TimeSlot};
use std::collections::{HashMap, HashSet};

use crate::storage::traits::{BookingCatalog, CatalogError};

pub const DEFAULT_CURRENCY: &str = "CHF";

#[derive(Debug, Clone)]
pub struct StaticCatalog {
    currency: String,
    slots: Vec<TimeSlot>,
    tiers: Vec<Tier>,
    booked: HashMap<NaiveDate, HashSet<String>>,
}

impl StaticCatalog {
    /// Build a catalog, checking that every tier id is described exactly
    /// once and that slot times are unique `HH:MM` values. Slots are kept in
    /// time order; tiers keep the order given.
    pub fn new(
        currency: impl Into<String>,
        mut slots: Vec<TimeSlot>,
        tiers: Vec<Tier>,
    ) -> Result<Self, CatalogError> {
        let mut seen_tiers = HashSet::new();
        for tier in &tiers {
            if !seen_tiers.insert(tier.id) {
                return Err(CatalogError::DuplicateTier(tier.id));
            }
        }
        if let Some(missing) = TierId::ALL.iter().find(|id| !seen_tiers.contains(id)) {
            return Err(CatalogError::TierNotFound(*missing));
        }

        let mut seen_times = HashSet::new();
        for slot in &slots {
            if !is_valid_slot_time(&slot.time) {
                return Err(CatalogError::InvalidSlotTime(slot.time.clone()));
            }
            if !seen_times.insert(slot.time.clone()) {
                return Err(CatalogError::DuplicateSlot(slot.time.clone()));
            }
        }
        slots.sort_by(|a, b| a.time.cmp(&b.time));

        Ok(Self {
            currency: currency.into(),
            slots,
            tiers,
            booked: HashMap::new(),
        })
    }

    /// Mark template slots as taken on one specific date
    pub fn with_booked<I, S>(mut self, date: NaiveDate, times: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for time in times {
            let time = time.into();
            if !self.slots.iter().any(|slot| slot.time == time) {
                return Err(CatalogError::UnknownBookedSlot { date, time });
            }
            self.booked.entry(date).or_default().insert(time);
        }
        Ok(self)
    }

    /// The built-in CV review catalog
    pub fn default_template() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            slots: default_slots(),
            tiers: default_tiers(),
            booked: HashMap::new(),
        }
    }

    /// The daily template without per-date overrides
    pub fn slot_template(&self) -> &[TimeSlot] {
        &self.slots
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::default_template()
    }
}

impl BookingCatalog for StaticCatalog {
    fn list_slots_for(&self, date: NaiveDate) -> Vec<TimeSlot> {
        let booked = self.booked.get(&date);
        let slots: Vec<TimeSlot> = self
            .slots
            .iter()
            .map(|slot| {
                let mut slot = slot.clone();
                if booked.is_some_and(|times| times.contains(&slot.time)) {
                    slot.available = false;
                }
                slot
            })
            .collect();
        debug!(
            "Listing {} slots for {} ({} booked overrides)",
            slots.len(),
            date,
            booked.map_or(0, |times| times.len())
        );
        slots
    }

    fn tiers(&self) -> Vec<Tier> {
        self.tiers.clone()
    }

    fn tier_of(&self, id: TierId) -> Result<Tier, CatalogError> {
        self.tiers
            .iter()
            .find(|tier| tier.id == id)
            .cloned()
            .ok_or(CatalogError::TierNotFound(id))
    }

    fn currency(&self) -> &str {
        &self.currency
    }
}

/// Zero-padded 24-hour `HH:MM`
pub fn is_valid_slot_time(time: &str) -> bool {
    time.len() == 5 && NaiveTime::parse_from_str(time, "%H:%M").is_ok()
}

fn slot(time: &str, available: bool, price: u32, tier: TierId) -> TimeSlot {
    TimeSlot {
        time: time.to_string(),
        available,
        price,
        tier,
    }
}

fn default_slots() -> Vec<TimeSlot> {
    vec![
        slot("09:00", true, 149, TierId::Standard),
        slot("09:30", false, 149, TierId::Standard),
        slot("10:00", true, 149, TierId::Standard),
        slot("10:30", true, 199, TierId::Premium),
        slot("11:00", true, 149, TierId::Standard),
        slot("11:30", false, 149, TierId::Standard),
        slot("14:00", true, 149, TierId::Standard),
        slot("14:30", true, 249, TierId::Video),
        slot("15:00", true, 199, TierId::Premium),
        slot("15:30", true, 149, TierId::Standard),
        slot("16:00", true, 199, TierId::Premium),
        slot("16:30", false, 149, TierId::Standard),
    ]
}

fn features(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn default_tiers() -> Vec<Tier> {
    vec![
        Tier {
            id: TierId::Standard,
            name: "Standard Review".to_string(),
            duration_label: "45 minutes".to_string(),
            price: 149,
            features: features(&[
                "CV Analysis & Feedback",
                "Skills Assessment",
                "Written Report",
                "Industry Insights",
            ]),
        },
        Tier {
            id: TierId::Premium,
            name: "Premium Review".to_string(),
            duration_label: "60 minutes".to_string(),
            price: 199,
            features: features(&[
                "Everything in Standard",
                "LinkedIn Profile Review",
                "Cover Letter Template",
                "Interview Tips",
                "Salary Negotiation Guide",
            ]),
        },
        Tier {
            id: TierId::Video,
            name: "Video Consultation".to_string(),
            duration_label: "90 minutes".to_string(),
            price: 249,
            features: features(&[
                "Everything in Premium",
                "Live Video Session",
                "Mock Interview",
                "Career Coaching",
                "Personalized Action Plan",
            ]),
        },
    ]
}
