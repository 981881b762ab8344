// 🆔 ID Generation - Prefixed short identifiers
// Management-side records carry human-readable prefixed ids ("VEH-k3JdP2xQ")
// rather than full UUIDs. Booking sessions use UUIDs for identity.

use rand::Rng;

const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const ID_LENGTH: usize = 8;

/// Generate a random identifier with an optional prefix.
pub fn generate_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_LENGTH)
        .map(|_| ID_CHARSET[rng.gen_range(0..ID_CHARSET.len())] as char)
        .collect();

    if prefix.is_empty() {
        suffix
    } else {
        format!("{}-{}", prefix, suffix)
    }
}

pub fn generate_room_id() -> String {
    generate_id("RM")
}

pub fn generate_vehicle_id() -> String {
    generate_id("VEH")
}

pub fn generate_transport_type_id() -> String {
    generate_id("TRP")
}

pub fn generate_driver_id() -> String {
    generate_id("DRV")
}

pub fn generate_booking_id() -> String {
    generate_id("BKG")
}
