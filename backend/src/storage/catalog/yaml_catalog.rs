//! # YAML Catalog Loader
//!
//! Lets a deployment replace the built-in slot and tier tables with a file.
//!
//! ## YAML Format
//!
//! ```yaml
//! currency: CHF
//! tiers:
//!   - id: standard
//!     name: Standard Review
//!     duration_label: 45 minutes
//!     price: 149
//!     features: ["CV Analysis & Feedback"]
//!   # ... premium and video must also be present
//! slots:
//!   - { time: "09:00", available: true, price: 149, tier: standard }
//! booked:
//!   "2025-06-16": ["09:00"]
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use shared::{Tier, TimeSlot};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::static_catalog::{StaticCatalog, DEFAULT_CURRENCY};

/// On-disk shape of a catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default = "default_currency")]
    pub currency: String,
    pub tiers: Vec<Tier>,
    pub slots: Vec<TimeSlot>,
    /// Date-specific bookings layered over the daily template
    #[serde(default)]
    pub booked: BTreeMap<NaiveDate, Vec<String>>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl CatalogFile {
    pub fn into_catalog(self) -> Result<StaticCatalog> {
        let mut catalog = StaticCatalog::new(self.currency, self.slots, self.tiers)?;
        for (date, times) in self.booked {
            catalog = catalog.with_booked(date, times)?;
        }
        Ok(catalog)
    }
}

/// Parse and validate a catalog from YAML text
pub fn parse_catalog_yaml(yaml: &str) -> Result<StaticCatalog> {
    let file: CatalogFile = serde_yaml::from_str(yaml).context("Catalog YAML is malformed")?;
    file.into_catalog().context("Catalog definition is inconsistent")
}

/// Load a catalog file from disk
pub fn load_catalog_file(path: &Path) -> Result<StaticCatalog> {
    let yaml = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {:?}", path))?;
    let catalog = parse_catalog_yaml(&yaml)
        .with_context(|| format!("Failed to load catalog file {:?}", path))?;
    info!(
        "📋 Loaded catalog from {:?}: {} slots",
        path,
        catalog.slot_template().len()
    );
    Ok(catalog)
}
