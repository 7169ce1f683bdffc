//! Decimal helpers shared by the calculators

use bigdecimal::{BigDecimal, ToPrimitive};
use std::str::FromStr;

/// Exact decimal fraction for a whole percentage (`percent(85)` is 0.85)
pub fn percent(value: i64) -> BigDecimal {
    BigDecimal::from(value) / BigDecimal::from(100)
}

/// Parse a ledger amount cell
///
/// Thousands separators and surrounding whitespace are ignored, a blank cell
/// reads as zero. Returns `None` when the cell is not a number.
pub fn parse_amount(raw: &str) -> Option<BigDecimal> {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Some(BigDecimal::from(0));
    }
    BigDecimal::from_str(cleaned).ok()
}

/// Round a monetary figure to paise
pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.round(2)
}

/// Lossy conversion for the primitive-valued export boundary
///
/// Returns `None` when the value has no finite `f64` representation.
pub fn to_f64(value: &BigDecimal) -> Option<f64> {
    value.to_f64().filter(|float| float.is_finite())
}
