// 🏨 Catalog Sync Adapter - Rooms
// Transforms management-side room records into the public, booking-ready
// projection. The management record stays the single writable copy; catalog
// entries are regenerated on every read and never mutated in place.

use anyhow::{Context as AnyhowContext, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::money::Amount;

// ============================================================================
// MANAGEMENT RECORD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomPolicies {
    pub cancellation: String,
    pub extra_note: String,
    pub smoking_policy: String,
    pub pet_policy: String,
}

/// A room as the hotel management side sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: String,
    pub room_number: String,
    pub room_name: String,
    pub room_type: String,
    pub floor: String,
    pub capacity: u32,
    /// Per-night price in whole currency units.
    pub base_price: Amount,
    pub amenities: Vec<String>,
    pub description: String,
    pub status: RoomStatus,
    pub images: Vec<String>,
    pub policies: RoomPolicies,
    /// Current guest, when occupied.
    #[serde(default)]
    pub guest: Option<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

// ============================================================================
// AMENITY ICONS
// ============================================================================

/// Amenity-name to display-icon table. Presentation policy, not business
/// logic: deployments may load their own table from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmenityIcons {
    pub icons: HashMap<String, String>,
    pub default_icon: String,
}

impl Default for AmenityIcons {
    fn default() -> Self {
        let icons = [
            ("WiFi", "📶"),
            ("AC", "❄️"),
            ("TV", "📺"),
            ("Balcony", "🏠"),
            ("Kitchen", "🍳"),
            ("Minibar", "🍷"),
            ("Safe", "🔒"),
            ("Kitchenette", "🍴"),
            ("Living Room", "🛋️"),
            ("Bunk Beds", "🛏️"),
            ("Bathtub", "🛁"),
            ("Shower", "🚿"),
            ("Hair Dryer", "💨"),
            ("Iron", "👔"),
            ("Room Service", "🍽️"),
            ("Desk", "🏢"),
            ("Chair", "💺"),
        ]
        .into_iter()
        .map(|(name, icon)| (name.to_string(), icon.to_string()))
        .collect();

        AmenityIcons {
            icons,
            default_icon: "✨".to_string(),
        }
    }
}

impl AmenityIcons {
    /// Load an icon table from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read amenity icons file: {:?}", path.as_ref()))?;

        let icons: AmenityIcons =
            serde_json::from_str(&content).context("Failed to parse amenity icons JSON")?;

        Ok(icons)
    }

    /// Icon for an amenity name; unmapped amenities get the default icon.
    pub fn icon_for(&self, amenity: &str) -> &str {
        self.icons
            .get(amenity)
            .map(String::as_str)
            .unwrap_or(&self.default_icon)
    }
}

// ============================================================================
// CATALOG ENTRY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Amenity {
    pub icon: String,
    pub name: String,
}

/// Pricing block for a listing. The "original" price is the base price plus
/// a fixed display markup for the struck-through comparison figure; it is a
/// presentation artifact, not pricing history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingDisplay {
    pub original_price: Amount,
    pub discounted_price: Amount,
    pub discount_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPolicies {
    pub smoking: String,
    pub pets: String,
    pub additional: String,
}

/// The public, booking-ready projection of a room record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub room_type: String,
    /// Display capacity, e.g. "2 guests".
    pub capacity: String,
    pub images: Vec<String>,
    pub amenities: Vec<Amenity>,
    pub pricing: PricingDisplay,
    pub cancellation: String,
    pub extra_note: String,
    pub policies: CatalogPolicies,
}

const DEFAULT_EXTRA_NOTE: &str = "Comfortable accommodation with modern amenities";

// ============================================================================
// TRANSFORM
// ============================================================================

/// Project management room records into catalog entries.
///
/// Only rooms whose status is `Available` appear on the booking site.
/// A malformed record is skipped with a warning rather than failing the
/// whole listing. Empty input yields empty output.
pub fn to_catalog_entries(
    records: &[RoomRecord],
    icons: &AmenityIcons,
    markup: Amount,
) -> Vec<CatalogEntry> {
    records
        .iter()
        .filter(|room| room.status == RoomStatus::Available)
        .filter_map(|room| match to_catalog_entry(room, icons, markup) {
            Some(entry) => Some(entry),
            None => {
                warn!(room_id = %room.id, "skipping malformed room record");
                None
            }
        })
        .collect()
}

fn to_catalog_entry(room: &RoomRecord, icons: &AmenityIcons, markup: Amount) -> Option<CatalogEntry> {
    if room.capacity == 0 || room.base_price < 0 {
        return None;
    }

    let extra_note = if room.policies.extra_note.is_empty() {
        DEFAULT_EXTRA_NOTE.to_string()
    } else {
        room.policies.extra_note.clone()
    };

    Some(CatalogEntry {
        id: room.id.clone(),
        room_type: room.room_type.clone(),
        capacity: format!("{} guests", room.capacity),
        images: room.images.clone(),
        amenities: room
            .amenities
            .iter()
            .map(|name| Amenity {
                icon: icons.icon_for(name).to_string(),
                name: name.clone(),
            })
            .collect(),
        pricing: PricingDisplay {
            original_price: room.base_price + markup,
            discounted_price: room.base_price,
            discount_label: "10% off".to_string(),
        },
        cancellation: room.policies.cancellation.clone(),
        extra_note: extra_note.clone(),
        policies: CatalogPolicies {
            smoking: room.policies.smoking_policy.clone(),
            pets: room.policies.pet_policy.clone(),
            additional: extra_note,
        },
    })
}

// ============================================================================
// TESTS
// ============================================================================
