// ⚙️ Application Config - Booking-side policy knobs
//
// Everything here is presentation/application policy, not business logic:
// currency code, guest-count bounds, the quote debounce window, and the
// catalog display markup. Deployments override the defaults from a JSON file.

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// ISO currency code used for all displayed amounts.
    pub currency: String,

    /// Guest count a fresh booking session starts with.
    pub default_guests: u32,

    /// Lower bound for the session guest count.
    pub min_guests: u32,

    /// Upper bound for the session guest count.
    pub max_guests: u32,

    /// Quiet window before a quote recomputation fires, in milliseconds.
    pub debounce_ms: u64,

    /// Fixed markup added to the base price for the struck-through
    /// comparison price on listings. Cosmetic, not pricing history.
    pub catalog_markup: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: "BDT".to_string(),
            default_guests: 2,
            min_guests: 1,
            max_guests: 10,
            debounce_ms: 300,
            catalog_markup: 500,
        }
    }
}

impl AppConfig {
    /// Load config from a JSON file. Missing fields fall back to defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: AppConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        Ok(config)
    }

    /// Clamp a requested guest count into the configured bounds.
    pub fn clamp_guests(&self, guests: u32) -> u32 {
        guests.clamp(self.min_guests, self.max_guests)
    }
}
