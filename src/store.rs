// 🗄️ Room Store - Injected repository for management records
//
// The management side writes room records through this interface; the booking
// site only ever reads projections of them. Writes are serialized per record
// id, last-write-wins. The in-memory implementation stands in for a database
// and keeps tests deterministic.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::booking::DateRange;
use crate::catalog::{to_catalog_entries, AmenityIcons, CatalogEntry, RoomPolicies, RoomRecord, RoomStatus};
use crate::error::BookingError;
use crate::money::Amount;

// ============================================================================
// AVAILABILITY
// ============================================================================

/// Answer to a booking-site availability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Availability {
    Unavailable { reason: String },
    Available {
        base_price: Amount,
        total_price: Amount,
        policies: RoomPolicies,
    },
}

// ============================================================================
// STORE INTERFACE
// ============================================================================

/// Storage interface for management-side room records.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Insert or update a room (matched by id). Stamps `last_updated`.
    async fn save_room(&self, room: RoomRecord) -> Result<(), BookingError>;

    /// All rooms, management view.
    async fn all_rooms(&self) -> Vec<RoomRecord>;

    /// One room by id.
    async fn room(&self, id: &str) -> Result<RoomRecord, BookingError>;
}

/// Availability check for a specific room and stay.
pub async fn check_availability(
    store: &dyn RoomStore,
    room_id: &str,
    range: &DateRange,
) -> Availability {
    let room = match store.room(room_id).await {
        Ok(room) => room,
        Err(_) => {
            return Availability::Unavailable {
                reason: "Room not found".to_string(),
            }
        }
    };

    if room.status != RoomStatus::Available {
        return Availability::Unavailable {
            reason: "Room is currently occupied or under maintenance".to_string(),
        };
    }

    Availability::Available {
        base_price: room.base_price,
        total_price: room.base_price * Amount::from(range.nights()),
        policies: room.policies,
    }
}

/// Read the store and project it into the public catalog.
pub async fn rooms_for_booking_site(
    store: &dyn RoomStore,
    icons: &AmenityIcons,
    markup: Amount,
) -> Vec<CatalogEntry> {
    let rooms = store.all_rooms().await;
    to_catalog_entries(&rooms, icons, markup)
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryRoomStore {
    rooms: Arc<RwLock<Vec<RoomRecord>>>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn save_room(&self, mut room: RoomRecord) -> Result<(), BookingError> {
        room.last_updated = Some(Utc::now());

        let mut rooms = self.rooms.write().await;
        match rooms.iter_mut().find(|r| r.id == room.id) {
            Some(existing) => {
                info!(room_id = %room.id, room_number = %room.room_number, "room updated");
                *existing = room;
            }
            None => {
                info!(room_id = %room.id, room_number = %room.room_number, "room added");
                rooms.push(room);
            }
        }

        Ok(())
    }

    async fn all_rooms(&self) -> Vec<RoomRecord> {
        self.rooms.read().await.clone()
    }

    async fn room(&self, id: &str) -> Result<RoomRecord, BookingError> {
        self.rooms
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| BookingError::not_found("room", id))
    }
}

// ============================================================================
// TESTS
// ============================================================================
