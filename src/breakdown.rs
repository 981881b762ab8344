// 🧾 Tax Breakdown Calculator
// Applies resolved tax rules to a pre-tax subtotal, producing the itemized
// tax lines and grand total shown in the booking summary.
//
// Invariants:
//   total == subtotal + total_tax
//   total_tax == sum of line amounts
//   every line amount >= 0

use serde::{Deserialize, Serialize};

use crate::error::BookingError;
use crate::money::{round_half_up, Amount};
use crate::tax::{TaxContext, TaxRateSource, TaxRule, TaxBasis, TaxType};

// ============================================================================
// BREAKDOWN TYPES
// ============================================================================

/// One itemized tax line, in resolver order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxLine {
    pub name: String,
    pub tax_type: TaxType,
    /// Percentage (e.g. 15.0) or flat amount, as defined by the rule.
    pub rate: f64,
    pub amount: Amount,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub subtotal: Amount,
    pub taxes: Vec<TaxLine>,
    pub total_tax: Amount,
    pub total: Amount,
}

// ============================================================================
// CALCULATOR
// ============================================================================

/// Compute the tax breakdown for a pre-tax subtotal.
///
/// Pure given a resolved rule set: identical inputs always produce identical
/// output. Percentage amounts are rounded half-up to whole currency units;
/// flat per-night rules scale by `nights`.
///
/// Fails with `InvalidInput` for a negative subtotal, zero nights, or a
/// context with no date range, and passes through `ResolutionFailure` from
/// the rate source. Callers recover by falling back to a subtotal-only total.
pub async fn compute_breakdown(
    subtotal: Amount,
    nights: u32,
    ctx: &TaxContext,
    source: &dyn TaxRateSource,
) -> Result<TaxBreakdown, BookingError> {
    if subtotal < 0 {
        return Err(BookingError::invalid_input("subtotal must be non-negative"));
    }
    if nights == 0 {
        return Err(BookingError::invalid_input("nights must be at least 1"));
    }
    if ctx.date_range.is_none() {
        return Err(BookingError::invalid_input(
            "tax context is missing a date range",
        ));
    }

    let rules = source.resolve(ctx).await?;

    let taxes: Vec<TaxLine> = rules
        .iter()
        .map(|rule| TaxLine {
            name: rule.name.clone(),
            tax_type: rule.tax_type,
            rate: rule.rate,
            amount: rule_amount(rule, subtotal, nights),
            description: rule.description.clone(),
        })
        .collect();

    let total_tax: Amount = taxes.iter().map(|line| line.amount).sum();

    Ok(TaxBreakdown {
        subtotal,
        taxes,
        total_tax,
        total: subtotal + total_tax,
    })
}

fn rule_amount(rule: &TaxRule, subtotal: Amount, nights: u32) -> Amount {
    match rule.tax_type {
        TaxType::Percentage => round_half_up(subtotal as f64 * rule.rate / 100.0),
        TaxType::Flat => {
            let base = round_half_up(rule.rate);
            match rule.basis {
                TaxBasis::PerStay => base,
                TaxBasis::PerNight => base * Amount::from(nights),
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
