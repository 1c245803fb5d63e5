//! FX domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response of a rate-conversion lookup.
///
/// Mirrors the public conversion API shape: the converted `amount` for the
/// requested base, and a `rates` map keyed by target currency code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateResponse {
    pub amount: Decimal,
    pub base: String,
    pub date: String,
    pub rates: HashMap<String, Decimal>,
}

impl RateResponse {
    /// The conversion factor for `currency_code`, if the response carries it.
    pub fn rate_for(&self, currency_code: &str) -> Option<Decimal> {
        self.rates.get(currency_code).copied()
    }
}
