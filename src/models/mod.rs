//! Data models shared across the crate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from 3-letter currency code to its rate expressed as units of that
/// currency per 1 USD.
///
/// A table is fetched wholesale from the primary provider and treated as
/// immutable until replaced by the next refresh; there are no partial updates.
pub type RateTable = HashMap<String, f64>;

/// Spot prices and daily deltas for gold and silver, fetched and cached as one
/// atomic unit.
///
/// The timestamp is the provider's own date string, stored verbatim with no
/// parsing or timezone normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalQuote {
    /// Gold spot price in USD per troy ounce
    pub gold_usd: f64,
    /// Silver spot price in USD per troy ounce
    pub silver_usd: f64,
    /// Absolute daily change for gold
    pub gold_change: f64,
    /// Absolute daily change for silver
    pub silver_change: f64,
    /// Percentage daily change for gold
    pub gold_pct: f64,
    /// Percentage daily change for silver
    pub silver_pct: f64,
    /// Provider-supplied timestamp string, verbatim
    pub timestamp: String,
}

/// Normalize a currency code for lookups: trim surrounding whitespace and
/// uppercase. Codes are not validated against a real ISO-4217 list.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Round a rate to 6 decimal digits.
///
/// Applied uniformly to every pair-resolution path so results are stable and
/// comparable regardless of which path produced them.
pub fn round_rate(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_uppercases() {
        assert_eq!(normalize_code(" rub "), "RUB");
        assert_eq!(normalize_code("Eur"), "EUR");
        assert_eq!(normalize_code("USD"), "USD");
    }

    #[test]
    fn round_rate_six_digits() {
        assert_eq!(round_rate(1.0 / 95.0), 0.010526);
        assert_eq!(round_rate(150.0 / 0.92), 163.043478);
        assert_eq!(round_rate(95.0), 95.0);
    }
}
