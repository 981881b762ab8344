// Booking Core - Library
// Price/tax aggregation pipeline and catalog sync for a hotel/travel booking
// application. The surrounding shell supplies UI, auth and persistence; this
// crate owns quoting (nights, subtotal, tax breakdown, final total) and the
// projection of management records into the public booking catalog.

pub mod booking;
pub mod breakdown;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;
pub mod money;
pub mod session;
pub mod store;
pub mod tax;
pub mod transport;

// Re-export commonly used types
pub use booking::{
    aggregate, compute_subtotal, BookingDetails, BookingQuote, DateRange, LineItem,
};
pub use breakdown::{compute_breakdown, TaxBreakdown, TaxLine};
pub use catalog::{
    to_catalog_entries, Amenity, AmenityIcons, CatalogEntry, CatalogPolicies, PricingDisplay,
    RoomPolicies, RoomRecord, RoomStatus,
};
pub use config::AppConfig;
pub use error::BookingError;
pub use ids::{
    generate_booking_id, generate_driver_id, generate_id, generate_room_id,
    generate_transport_type_id, generate_vehicle_id,
};
pub use money::{format_amount, round_half_up, Amount};
pub use session::{BookingSession, QuoteEngine, SessionState};
pub use store::{
    check_availability, rooms_for_booking_site, Availability, InMemoryRoomStore, RoomStore,
};
pub use tax::{
    GuestType, Jurisdiction, ServiceCategory, TaxBasis, TaxContext, TaxRateSource, TaxRegistry,
    TaxRule, TaxType,
};
pub use transport::{
    active_drivers, available_vehicles, Driver, InMemoryTransportStore, TransportStore,
    TransportType, Vehicle, VehicleStatus,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
