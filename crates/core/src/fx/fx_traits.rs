//! Rate provider trait and test implementations.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::errors::{Error, Result};
use crate::fx::RateResponse;

/// Trait for fetching currency conversion rates from an external source.
#[async_trait]
pub trait RateProviderTrait: Send + Sync {
    /// Fetches the one-unit conversion rates from `from_currency`, including
    /// at least `to_currency` when the pair is supported.
    async fn fetch_unit_rates(
        &self,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<RateResponse>;
}

/// Map-backed provider for tests: returns configured rates, fails on
/// unknown pairs.
#[derive(Clone, Default)]
pub struct StaticRateProvider {
    rates: HashMap<(String, String), Decimal>,
}

impl StaticRateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, from: &str, to: &str, rate: Decimal) -> Self {
        self.rates.insert((from.to_string(), to.to_string()), rate);
        self
    }
}

#[async_trait]
impl RateProviderTrait for StaticRateProvider {
    async fn fetch_unit_rates(
        &self,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<RateResponse> {
        let key = (from_currency.to_string(), to_currency.to_string());
        let rate = self.rates.get(&key).copied().ok_or_else(|| {
            Error::CurrencyConversionFailed(format!(
                "no rate configured for {from_currency}->{to_currency}"
            ))
        })?;
        let mut rates = HashMap::new();
        rates.insert(to_currency.to_string(), rate);
        Ok(RateResponse {
            amount: Decimal::ONE,
            base: from_currency.to_string(),
            date: "1970-01-01".to_string(),
            rates,
        })
    }
}
