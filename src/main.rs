// Booking Core - Demo binary
// Seeds the in-memory stores, prints the public catalog, and walks a booking
// session through the quote pipeline.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use booking_core::{
    check_availability, rooms_for_booking_site, AmenityIcons, AppConfig, Availability,
    BookingSession, InMemoryRoomStore, InMemoryTransportStore, LineItem, RoomPolicies, RoomRecord,
    RoomStatus, RoomStore, TaxContext, TaxRegistry, TaxRateSource, available_vehicles,
    format_amount, generate_room_id,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::default();
    let icons = AmenityIcons::default();

    // 1. Seed management-side records
    let rooms = InMemoryRoomStore::new();
    seed_rooms(&rooms).await?;

    let transport = InMemoryTransportStore::new();
    transport.seed_demo_data().await?;

    // 2. Public catalog projection
    println!("📋 Booking catalog");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for entry in rooms_for_booking_site(&rooms, &icons, config.catalog_markup).await {
        let amenities: Vec<&str> = entry.amenities.iter().map(|a| a.name.as_str()).collect();
        println!(
            "  {} ({}) — {}/night, was {} — {}",
            entry.room_type,
            entry.capacity,
            format_amount(entry.pricing.discounted_price, &config.currency),
            format_amount(entry.pricing.original_price, &config.currency),
            amenities.join(", "),
        );
    }

    for vehicle in available_vehicles(&transport, "TRP-2").await {
        println!("  🚌 {} ({} seats)", vehicle.name, vehicle.capacity);
    }

    // 3. Booking flow
    let registry: Arc<dyn TaxRateSource> = Arc::new(TaxRegistry::new());
    let mut session = BookingSession::new(&config, TaxContext::new("Dhaka"), registry);

    session.add_item(LineItem::new("Deluxe Room", 3200, 1));
    session.set_dates(
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        NaiveDate::from_ymd_opt(2024, 1, 3).expect("valid date"),
    );
    session.set_guests(2);

    let quote = session.quote_now().await;

    println!("\n🛒 Booking summary");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "  Subtotal ({} nights): {}",
        quote.nights,
        format_amount(quote.subtotal, &config.currency)
    );
    for tax in quote.tax_lines() {
        println!(
            "  {} — {}",
            tax.name,
            format_amount(tax.amount, &config.currency)
        );
    }
    println!(
        "  Final total: {} (incl. {} tax)",
        format_amount(quote.final_total, &config.currency),
        format_amount(quote.total_tax(), &config.currency)
    );

    let details = session.confirm().await?;
    println!(
        "\n✅ Booking {} confirmed — {}",
        details.booking_id,
        format_amount(details.final_total, &config.currency)
    );

    // 4. Availability check against the store
    if let Some(range) = session.date_range() {
        if let Availability::Available { total_price, .. } =
            check_availability(&rooms, "RM-101", range).await
        {
            println!(
                "🔍 Room RM-101 available for the stay at {}",
                format_amount(total_price, &config.currency)
            );
        }
    }

    Ok(())
}

async fn seed_rooms(store: &InMemoryRoomStore) -> Result<()> {
    let policies = RoomPolicies {
        cancellation: "Free cancellation until 24h before check-in".to_string(),
        extra_note: String::new(),
        smoking_policy: "No smoking".to_string(),
        pet_policy: "No pets".to_string(),
    };

    store
        .save_room(RoomRecord {
            id: "RM-101".to_string(),
            room_number: "101".to_string(),
            room_name: "Padma".to_string(),
            room_type: "Deluxe Room".to_string(),
            floor: "1".to_string(),
            capacity: 2,
            base_price: 3200,
            amenities: vec!["WiFi".to_string(), "AC".to_string(), "Balcony".to_string()],
            description: "River-view deluxe room".to_string(),
            status: RoomStatus::Available,
            images: vec!["/rooms/101/photo-1.jpg".to_string()],
            policies: policies.clone(),
            guest: None,
            last_updated: None,
        })
        .await?;

    store
        .save_room(RoomRecord {
            id: generate_room_id(),
            room_number: "204".to_string(),
            room_name: "Meghna".to_string(),
            room_type: "Standard Room".to_string(),
            floor: "2".to_string(),
            capacity: 2,
            base_price: 1600,
            amenities: vec!["WiFi".to_string(), "TV".to_string()],
            description: "Cozy standard room".to_string(),
            status: RoomStatus::Available,
            images: Vec::new(),
            policies: policies.clone(),
            guest: None,
            last_updated: None,
        })
        .await?;

    store
        .save_room(RoomRecord {
            id: generate_room_id(),
            room_number: "305".to_string(),
            room_name: "Jamuna".to_string(),
            room_type: "Family Suite".to_string(),
            floor: "3".to_string(),
            capacity: 4,
            base_price: 5200,
            amenities: vec!["WiFi".to_string(), "Kitchenette".to_string()],
            description: "Suite under renovation".to_string(),
            status: RoomStatus::Maintenance,
            images: Vec::new(),
            policies,
            guest: None,
            last_updated: None,
        })
        .await?;

    Ok(())
}
