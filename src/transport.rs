// 🚌 Transport Store - Vehicles, drivers and transport types
//
// Management records for the transport side of the catalog. Same contract as
// rooms: upsert by id with last-write-wins, and the booking site only reads
// filtered projections (active vehicles, active drivers).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::BookingError;
use crate::money::Amount;

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub images: Vec<String>,
    /// Flag-fall fare in whole currency units.
    pub base_fare: Amount,
    pub rate_per_km: f64,
    pub is_active: bool,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Maintenance,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub model: String,
    pub registration_no: String,
    pub capacity: u32,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub transport_type_id: String,
    pub status: VehicleStatus,
    #[serde(default)]
    pub driver_id: Option<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub rating: f64,
    pub experience_years: u32,
    #[serde(default)]
    pub image: Option<String>,
    pub vehicle_ids: Vec<String>,
    pub is_active: bool,
}

// ============================================================================
// STORE INTERFACE
// ============================================================================

#[async_trait]
pub trait TransportStore: Send + Sync {
    async fn save_transport_type(&self, transport_type: TransportType) -> Result<(), BookingError>;
    async fn all_transport_types(&self) -> Vec<TransportType>;

    async fn save_vehicle(&self, vehicle: Vehicle) -> Result<(), BookingError>;
    async fn all_vehicles(&self) -> Vec<Vehicle>;

    async fn save_driver(&self, driver: Driver) -> Result<(), BookingError>;
    async fn all_drivers(&self) -> Vec<Driver>;

    /// Link a driver and a vehicle both ways.
    async fn assign_driver(&self, driver_id: &str, vehicle_id: &str) -> Result<(), BookingError>;
}

/// Vehicles of a transport type that are bookable right now.
pub async fn available_vehicles(store: &dyn TransportStore, transport_type_id: &str) -> Vec<Vehicle> {
    store
        .all_vehicles()
        .await
        .into_iter()
        .filter(|v| v.transport_type_id == transport_type_id && v.status == VehicleStatus::Active)
        .collect()
}

/// Drivers currently taking assignments.
pub async fn active_drivers(store: &dyn TransportStore) -> Vec<Driver> {
    store
        .all_drivers()
        .await
        .into_iter()
        .filter(|d| d.is_active)
        .collect()
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryTransportStore {
    transport_types: Arc<RwLock<Vec<TransportType>>>,
    vehicles: Arc<RwLock<Vec<Vehicle>>>,
    drivers: Arc<RwLock<Vec<Driver>>>,
}

impl InMemoryTransportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the demo fleet used by the demo binary and examples.
    pub async fn seed_demo_data(&self) -> Result<(), BookingError> {
        if !self.all_transport_types().await.is_empty() {
            return Ok(());
        }

        self.save_transport_type(TransportType {
            id: "TRP-1".to_string(),
            name: "CNG".to_string(),
            description: "Three-wheeler auto rickshaw for short distances".to_string(),
            icon: "🛺".to_string(),
            images: Vec::new(),
            base_fare: 25,
            rate_per_km: 15.0,
            is_active: true,
            last_updated: None,
        })
        .await?;
        self.save_transport_type(TransportType {
            id: "TRP-2".to_string(),
            name: "Bus".to_string(),
            description: "Large capacity vehicle for long distance travel".to_string(),
            icon: "🚌".to_string(),
            images: Vec::new(),
            base_fare: 100,
            rate_per_km: 2.5,
            is_active: true,
            last_updated: None,
        })
        .await?;
        self.save_transport_type(TransportType {
            id: "TRP-3".to_string(),
            name: "Boat".to_string(),
            description: "Water transport for river and coastal routes".to_string(),
            icon: "🚢".to_string(),
            images: Vec::new(),
            base_fare: 50,
            rate_per_km: 8.0,
            is_active: true,
            last_updated: None,
        })
        .await?;

        self.save_vehicle(Vehicle {
            id: "VEH-1".to_string(),
            name: "Green CNG 001".to_string(),
            model: "Bajaj RE 4S".to_string(),
            registration_no: "DHK-CNG-1234".to_string(),
            capacity: 3,
            features: vec!["GPS Tracker".to_string(), "Meter System".to_string()],
            images: Vec::new(),
            transport_type_id: "TRP-1".to_string(),
            status: VehicleStatus::Active,
            driver_id: None,
            last_updated: None,
        })
        .await?;
        self.save_vehicle(Vehicle {
            id: "VEH-2".to_string(),
            name: "Express Bus 001".to_string(),
            model: "Volvo B11R".to_string(),
            registration_no: "DHK-BUS-5678".to_string(),
            capacity: 40,
            features: vec![
                "AC".to_string(),
                "WiFi".to_string(),
                "Entertainment System".to_string(),
                "GPS Tracker".to_string(),
            ],
            images: Vec::new(),
            transport_type_id: "TRP-2".to_string(),
            status: VehicleStatus::Active,
            driver_id: None,
            last_updated: None,
        })
        .await?;

        self.save_driver(Driver {
            id: "DRV-1".to_string(),
            name: "Md. Rafiqul Islam".to_string(),
            phone: "+8801712345678".to_string(),
            rating: 4.8,
            experience_years: 12,
            image: None,
            vehicle_ids: Vec::new(),
            is_active: true,
        })
        .await?;
        self.save_driver(Driver {
            id: "DRV-2".to_string(),
            name: "Abdul Karim".to_string(),
            phone: "+8801823456789".to_string(),
            rating: 4.6,
            experience_years: 8,
            image: None,
            vehicle_ids: Vec::new(),
            is_active: true,
        })
        .await?;

        self.assign_driver("DRV-1", "VEH-1").await?;
        self.assign_driver("DRV-2", "VEH-2").await?;

        Ok(())
    }
}

#[async_trait]
impl TransportStore for InMemoryTransportStore {
    async fn save_transport_type(
        &self,
        mut transport_type: TransportType,
    ) -> Result<(), BookingError> {
        transport_type.last_updated = Some(Utc::now());

        let mut types = self.transport_types.write().await;
        match types.iter_mut().find(|t| t.id == transport_type.id) {
            Some(existing) => *existing = transport_type,
            None => {
                info!(name = %transport_type.name, "transport type added");
                types.push(transport_type);
            }
        }
        Ok(())
    }

    async fn all_transport_types(&self) -> Vec<TransportType> {
        self.transport_types.read().await.clone()
    }

    async fn save_vehicle(&self, mut vehicle: Vehicle) -> Result<(), BookingError> {
        vehicle.last_updated = Some(Utc::now());

        let mut vehicles = self.vehicles.write().await;
        match vehicles.iter_mut().find(|v| v.id == vehicle.id) {
            Some(existing) => *existing = vehicle,
            None => {
                info!(name = %vehicle.name, registration = %vehicle.registration_no, "vehicle added");
                vehicles.push(vehicle);
            }
        }
        Ok(())
    }

    async fn all_vehicles(&self) -> Vec<Vehicle> {
        self.vehicles.read().await.clone()
    }

    async fn save_driver(&self, driver: Driver) -> Result<(), BookingError> {
        let mut drivers = self.drivers.write().await;
        match drivers.iter_mut().find(|d| d.id == driver.id) {
            Some(existing) => *existing = driver,
            None => {
                info!(name = %driver.name, "driver added");
                drivers.push(driver);
            }
        }
        Ok(())
    }

    async fn all_drivers(&self) -> Vec<Driver> {
        self.drivers.read().await.clone()
    }

    async fn assign_driver(&self, driver_id: &str, vehicle_id: &str) -> Result<(), BookingError> {
        let mut drivers = self.drivers.write().await;
        let mut vehicles = self.vehicles.write().await;

        let driver = drivers
            .iter_mut()
            .find(|d| d.id == driver_id)
            .ok_or_else(|| BookingError::not_found("driver", driver_id))?;
        let vehicle = vehicles
            .iter_mut()
            .find(|v| v.id == vehicle_id)
            .ok_or_else(|| BookingError::not_found("vehicle", vehicle_id))?;

        if !driver.vehicle_ids.iter().any(|id| id == vehicle_id) {
            driver.vehicle_ids.push(vehicle_id.to_string());
        }
        vehicle.driver_id = Some(driver_id.to_string());

        info!(driver = %driver.name, vehicle = %vehicle.name, "driver assigned to vehicle");
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(id: &str, type_id: &str, status: VehicleStatus) -> Vehicle {
        Vehicle {
            id: id.to_string(),
            name: format!("Vehicle {}", id),
            model: "Test Model".to_string(),
            registration_no: format!("DHK-{}", id),
            capacity: 4,
            features: Vec::new(),
            images: Vec::new(),
            transport_type_id: type_id.to_string(),
            status,
            driver_id: None,
            last_updated: None,
        }
    }

    fn driver(id: &str, is_active: bool) -> Driver {
        Driver {
            id: id.to_string(),
            name: format!("Driver {}", id),
            phone: "+880".to_string(),
            rating: 4.5,
            experience_years: 5,
            image: None,
            vehicle_ids: Vec::new(),
            is_active,
        }
    }

    #[tokio::test]
    async fn test_seed_demo_data_is_idempotent() {
        let store = InMemoryTransportStore::new();
        store.seed_demo_data().await.unwrap();
        store.seed_demo_data().await.unwrap();

        assert_eq!(store.all_transport_types().await.len(), 3);
        assert_eq!(store.all_vehicles().await.len(), 2);
        assert_eq!(store.all_drivers().await.len(), 2);
    }

    #[tokio::test]
    async fn test_vehicle_upsert_last_write_wins() {
        let store = InMemoryTransportStore::new();
        store
            .save_vehicle(vehicle("VEH-1", "TRP-1", VehicleStatus::Active))
            .await
            .unwrap();
        store
            .save_vehicle(vehicle("VEH-1", "TRP-1", VehicleStatus::Maintenance))
            .await
            .unwrap();

        let vehicles = store.all_vehicles().await;
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].status, VehicleStatus::Maintenance);
        assert!(vehicles[0].last_updated.is_some());
    }

    #[tokio::test]
    async fn test_available_vehicles_filters_type_and_status() {
        let store = InMemoryTransportStore::new();
        store
            .save_vehicle(vehicle("VEH-1", "TRP-1", VehicleStatus::Active))
            .await
            .unwrap();
        store
            .save_vehicle(vehicle("VEH-2", "TRP-1", VehicleStatus::Maintenance))
            .await
            .unwrap();
        store
            .save_vehicle(vehicle("VEH-3", "TRP-2", VehicleStatus::Active))
            .await
            .unwrap();

        let available = available_vehicles(&store, "TRP-1").await;
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, "VEH-1");
    }

    #[tokio::test]
    async fn test_active_drivers_filter() {
        let store = InMemoryTransportStore::new();
        store.save_driver(driver("DRV-1", true)).await.unwrap();
        store.save_driver(driver("DRV-2", false)).await.unwrap();

        let active = active_drivers(&store).await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "DRV-1");
    }

    #[tokio::test]
    async fn test_assign_driver_links_both_sides() {
        let store = InMemoryTransportStore::new();
        store
            .save_vehicle(vehicle("VEH-1", "TRP-1", VehicleStatus::Active))
            .await
            .unwrap();
        store.save_driver(driver("DRV-1", true)).await.unwrap();

        store.assign_driver("DRV-1", "VEH-1").await.unwrap();

        let drivers = store.all_drivers().await;
        assert_eq!(drivers[0].vehicle_ids, vec!["VEH-1".to_string()]);

        let vehicles = store.all_vehicles().await;
        assert_eq!(vehicles[0].driver_id.as_deref(), Some("DRV-1"));

        // Re-assigning is a no-op for the driver's vehicle list
        store.assign_driver("DRV-1", "VEH-1").await.unwrap();
        assert_eq!(store.all_drivers().await[0].vehicle_ids.len(), 1);
    }

    #[tokio::test]
    async fn test_assign_driver_missing_either_side() {
        let store = InMemoryTransportStore::new();
        store.save_driver(driver("DRV-1", true)).await.unwrap();

        let err = store.assign_driver("DRV-1", "VEH-404").await.unwrap_err();
        assert_eq!(err, BookingError::not_found("vehicle", "VEH-404"));

        let err = store.assign_driver("DRV-404", "VEH-404").await.unwrap_err();
        assert_eq!(err, BookingError::not_found("driver", "DRV-404"));
    }
}
