// 💰 Money - Whole-unit amounts and rounding policy
//
// The configured currency (BDT) has no practical subunit, so all amounts are
// whole currency units stored as i64. Tax math happens in f64 and is rounded
// back to whole units with round-half-up.

/// Monetary amount in whole currency units.
pub type Amount = i64;

/// Round a computed amount to whole currency units, half-up.
///
/// Tax amounts are never negative; anything at or below zero rounds to 0.
pub fn round_half_up(value: f64) -> Amount {
    if value <= 0.0 {
        return 0;
    }
    (value + 0.5).floor() as Amount
}

/// Format an amount for display: currency code plus thousands separators.
///
/// Example: `format_amount(6400, "BDT")` → `"BDT 6,400"`
pub fn format_amount(amount: Amount, currency: &str) -> String {
    format!("{} {}", currency, group_thousands(amount))
}

fn group_thousands(amount: Amount) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
