// 🛏️ Booking Aggregator
// Computes nights and the pre-tax subtotal for the selected line items, then
// composes the tax breakdown into the final payable amount. Tax failures are
// recovered here: a booking quote always comes back, taxed or not.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::breakdown::{compute_breakdown, TaxBreakdown, TaxLine};
use crate::error::BookingError;
use crate::ids::generate_booking_id;
use crate::money::Amount;
use crate::tax::{TaxContext, TaxRateSource};

// ============================================================================
// LINE ITEMS AND DATES
// ============================================================================

/// One selected room or service, priced per night.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Room/service type, e.g. "Deluxe Room".
    pub category: String,
    /// Per-night price in whole currency units.
    pub unit_price: Amount,
    /// Number of units booked, at least 1.
    pub quantity: u32,
}

impl LineItem {
    pub fn new(category: impl Into<String>, unit_price: Amount, quantity: u32) -> Self {
        LineItem {
            category: category.into(),
            unit_price,
            quantity: quantity.max(1),
        }
    }

    pub fn line_total(&self) -> Amount {
        self.unit_price * Amount::from(self.quantity)
    }
}

/// Check-in/check-out pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl DateRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        DateRange {
            check_in,
            check_out,
        }
    }

    /// Number of nights, never below 1. Equal or inverted dates count as
    /// a single night (documented fallback, not an error).
    pub fn nights(&self) -> u32 {
        let days = (self.check_out - self.check_in).num_days();
        days.max(1) as u32
    }
}

// ============================================================================
// QUOTE
// ============================================================================

/// The computed booking summary shown to the guest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingQuote {
    pub nights: u32,
    pub guests: u32,
    /// Pre-tax total across all items and nights.
    pub subtotal: Amount,
    /// None when taxes were not computed (empty cart or degraded fallback).
    pub breakdown: Option<TaxBreakdown>,
    pub final_total: Amount,
}

impl BookingQuote {
    /// Quote for an empty cart.
    pub fn empty(nights: u32, guests: u32) -> Self {
        BookingQuote {
            nights,
            guests,
            subtotal: 0,
            breakdown: None,
            final_total: 0,
        }
    }

    pub fn total_tax(&self) -> Amount {
        self.breakdown.as_ref().map_or(0, |b| b.total_tax)
    }

    pub fn tax_lines(&self) -> &[TaxLine] {
        self.breakdown.as_ref().map_or(&[], |b| b.taxes.as_slice())
    }
}

/// Pre-tax subtotal: each item is priced per night uniformly across the stay,
/// so the night multiplier applies at the aggregate level.
pub fn compute_subtotal(items: &[LineItem], nights: u32) -> Amount {
    let per_night: Amount = items.iter().map(LineItem::line_total).sum();
    per_night * Amount::from(nights)
}

/// Aggregate the selected items into a booking quote.
///
/// Infallible by design: an empty cart yields a zero quote without touching
/// the rate source, and any breakdown failure degrades to a subtotal-only
/// total instead of blocking checkout.
pub async fn aggregate(
    items: &[LineItem],
    date_range: Option<&DateRange>,
    guests: u32,
    ctx: &TaxContext,
    source: &dyn TaxRateSource,
) -> BookingQuote {
    let nights = date_range.map_or(1, DateRange::nights);

    if items.is_empty() {
        return BookingQuote::empty(nights, guests);
    }

    let subtotal = compute_subtotal(items, nights);

    // The context the calculator sees always carries the aggregator's dates.
    let mut tax_ctx = ctx.clone();
    tax_ctx.date_range = date_range.copied();

    match compute_breakdown(subtotal, nights, &tax_ctx, source).await {
        Ok(breakdown) => {
            let final_total = breakdown.total;
            BookingQuote {
                nights,
                guests,
                subtotal,
                breakdown: Some(breakdown),
                final_total,
            }
        }
        Err(err) => {
            warn!(error = %err, subtotal, "tax breakdown failed, falling back to subtotal");
            BookingQuote {
                nights,
                guests,
                subtotal,
                breakdown: None,
                final_total: subtotal,
            }
        }
    }
}

// ============================================================================
// CONFIRMED BOOKING
// ============================================================================

/// Snapshot assembled when the guest confirms a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDetails {
    pub booking_id: String,
    pub rooms: Vec<LineItem>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub nights: u32,
    pub subtotal: Amount,
    pub taxes: Vec<TaxLine>,
    pub total_tax: Amount,
    pub final_total: Amount,
}

impl BookingDetails {
    /// Build the confirmation snapshot from the latest quote.
    ///
    /// Confirming requires a non-empty cart and a selected date range;
    /// both checks mirror what the booking form enforces.
    pub fn from_quote(
        items: &[LineItem],
        date_range: Option<&DateRange>,
        quote: &BookingQuote,
    ) -> Result<Self, BookingError> {
        if items.is_empty() {
            return Err(BookingError::invalid_input("no rooms selected"));
        }
        let range = date_range.ok_or_else(|| {
            BookingError::invalid_input("check-in and check-out dates are required")
        })?;

        Ok(BookingDetails {
            booking_id: generate_booking_id(),
            rooms: items.to_vec(),
            check_in: range.check_in,
            check_out: range.check_out,
            guests: quote.guests,
            nights: quote.nights,
            subtotal: quote.subtotal,
            taxes: quote.tax_lines().to_vec(),
            total_tax: quote.total_tax(),
            final_total: quote.final_total,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::{Jurisdiction, TaxRegistry, TaxRule, TaxType, TaxBasis};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn no_rule_registry() -> TaxRegistry {
        let mut registry = TaxRegistry::empty();
        registry.add_jurisdiction(Jurisdiction {
            location: "Dhaka".to_string(),
            rules: Vec::new(),
        });
        registry
    }

    fn five_percent_registry() -> TaxRegistry {
        let mut registry = TaxRegistry::empty();
        registry.add_jurisdiction(Jurisdiction {
            location: "Dhaka".to_string(),
            rules: vec![TaxRule {
                id: "vat".to_string(),
                name: "VAT".to_string(),
                tax_type: TaxType::Percentage,
                rate: 5.0,
                basis: TaxBasis::PerStay,
                applies_to: None,
                guest_types: Vec::new(),
                description: None,
            }],
        });
        registry
    }

    #[test]
    fn test_nights_from_range() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 3));
        assert_eq!(range.nights(), 2);

        let one_night = DateRange::new(date(2024, 1, 1), date(2024, 1, 2));
        assert_eq!(one_night.nights(), 1);
    }

    #[test]
    fn test_nights_clamped_for_equal_and_inverted_dates() {
        let same_day = DateRange::new(date(2024, 1, 1), date(2024, 1, 1));
        assert_eq!(same_day.nights(), 1);

        let inverted = DateRange::new(date(2024, 1, 5), date(2024, 1, 1));
        assert_eq!(inverted.nights(), 1);
    }

    #[test]
    fn test_line_item_quantity_floor() {
        let item = LineItem::new("Standard Room", 1600, 0);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.line_total(), 1600);
    }

    #[test]
    fn test_subtotal_multiplies_nights_at_aggregate_level() {
        let items = vec![
            LineItem::new("Deluxe Room", 3000, 1),
            LineItem::new("Standard Room", 1600, 2),
        ];
        // (3000 + 3200) per night x 3 nights
        assert_eq!(compute_subtotal(&items, 3), 18600);
    }

    #[tokio::test]
    async fn test_two_night_stay_without_taxes() {
        // 3200/night, 2 nights, no rules resolved -> subtotal 6400, final 6400
        let registry = no_rule_registry();
        let items = vec![LineItem::new("Deluxe Room", 3200, 1)];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 3));

        let quote = aggregate(
            &items,
            Some(&range),
            2,
            &TaxContext::new("Dhaka"),
            &registry,
        )
        .await;

        assert_eq!(quote.nights, 2);
        assert_eq!(quote.subtotal, 6400);
        assert_eq!(quote.final_total, 6400);
        let breakdown = quote.breakdown.unwrap();
        assert!(breakdown.taxes.is_empty());
        assert_eq!(breakdown.total, 6400);
    }

    #[tokio::test]
    async fn test_two_night_stay_with_five_percent_vat() {
        let registry = five_percent_registry();
        let items = vec![LineItem::new("Deluxe Room", 3200, 1)];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 3));

        let quote = aggregate(
            &items,
            Some(&range),
            2,
            &TaxContext::new("Dhaka"),
            &registry,
        )
        .await;

        assert_eq!(quote.subtotal, 6400);
        assert_eq!(quote.total_tax(), 320);
        assert_eq!(quote.final_total, 6720);
    }

    #[tokio::test]
    async fn test_empty_cart_skips_breakdown() {
        // The registry would fail on resolve; an empty cart must never get there.
        let registry = TaxRegistry::empty();

        let quote = aggregate(&[], None, 2, &TaxContext::new("Atlantis"), &registry).await;

        assert_eq!(quote.nights, 1);
        assert_eq!(quote.subtotal, 0);
        assert_eq!(quote.final_total, 0);
        assert!(quote.breakdown.is_none());
    }

    #[tokio::test]
    async fn test_missing_dates_default_to_one_night() {
        let registry = no_rule_registry();
        let items = vec![LineItem::new("Standard Room", 1600, 1)];

        let quote = aggregate(&items, None, 2, &TaxContext::new("Dhaka"), &registry).await;

        assert_eq!(quote.nights, 1);
        assert_eq!(quote.subtotal, 1600);
        // Breakdown needs a date range; degraded to subtotal-only
        assert!(quote.breakdown.is_none());
        assert_eq!(quote.final_total, 1600);
    }

    #[tokio::test]
    async fn test_unresolvable_location_degrades_gracefully() {
        let registry = five_percent_registry();
        let items = vec![LineItem::new("Deluxe Room", 3200, 1)];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 3));

        let quote = aggregate(
            &items,
            Some(&range),
            2,
            &TaxContext::new("Atlantis"),
            &registry,
        )
        .await;

        assert!(quote.breakdown.is_none());
        assert_eq!(quote.final_total, quote.subtotal);
        assert_eq!(quote.final_total, 6400);
    }

    #[tokio::test]
    async fn test_aggregate_does_not_mutate_items() {
        let registry = no_rule_registry();
        let items = vec![LineItem::new("Deluxe Room", 3200, 2)];
        let before = items.clone();
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 3));

        let _ = aggregate(
            &items,
            Some(&range),
            2,
            &TaxContext::new("Dhaka"),
            &registry,
        )
        .await;

        assert_eq!(items.len(), before.len());
        assert_eq!(items[0].quantity, before[0].quantity);
        assert_eq!(items[0].unit_price, before[0].unit_price);
    }

    #[tokio::test]
    async fn test_booking_details_from_quote() {
        let registry = five_percent_registry();
        let items = vec![LineItem::new("Deluxe Room", 3200, 1)];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 3));

        let quote = aggregate(
            &items,
            Some(&range),
            2,
            &TaxContext::new("Dhaka"),
            &registry,
        )
        .await;

        let details = BookingDetails::from_quote(&items, Some(&range), &quote).unwrap();

        assert!(details.booking_id.starts_with("BKG-"));
        assert_eq!(details.nights, 2);
        assert_eq!(details.subtotal, 6400);
        assert_eq!(details.total_tax, 320);
        assert_eq!(details.final_total, 6720);
        assert_eq!(details.taxes.len(), 1);
    }

    #[test]
    fn test_booking_details_requires_items_and_dates() {
        let quote = BookingQuote::empty(1, 2);
        let err = BookingDetails::from_quote(&[], None, &quote).unwrap_err();
        assert!(matches!(err, BookingError::InvalidInput { .. }));

        let items = vec![LineItem::new("Deluxe Room", 3200, 1)];
        let err = BookingDetails::from_quote(&items, None, &quote).unwrap_err();
        assert!(matches!(err, BookingError::InvalidInput { .. }));
    }
}
