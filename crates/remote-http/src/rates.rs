//! Conversion-rate provider backed by the Frankfurter API.
//!
//! Frankfurter serves ECB reference rates from a single
//! `GET /latest?amount&from&to` endpoint, no API key required.

use log::debug;
use std::time::Duration;

use async_trait::async_trait;
use nestegg_core::errors::{Error, Result};
use nestegg_core::fx::{RateProviderTrait, RateResponse};

use crate::client::map_transport_error;

/// Public Frankfurter endpoint.
pub const FRANKFURTER_BASE_URL: &str = "https://api.frankfurter.dev/v1";

/// Default timeout for rate lookups.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Rate provider for the Frankfurter currency API.
#[derive(Debug, Clone)]
pub struct FrankfurterRateProvider {
    client: reqwest::Client,
    base_url: String,
}

impl FrankfurterRateProvider {
    /// Create a provider against the public Frankfurter endpoint.
    pub fn new() -> Self {
        Self::with_base_url(FRANKFURTER_BASE_URL)
    }

    /// Create a provider against a custom endpoint (e.g., a self-hosted mirror).
    pub fn with_base_url(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn latest_url(&self, from_currency: &str, to_currency: &str) -> String {
        format!(
            "{}/latest?amount=1&from={}&to={}",
            self.base_url, from_currency, to_currency
        )
    }
}

impl Default for FrankfurterRateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProviderTrait for FrankfurterRateProvider {
    /// GET /latest?amount=1&from={from}&to={to}
    async fn fetch_unit_rates(
        &self,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<RateResponse> {
        let url = self.latest_url(from_currency, to_currency);
        debug!("Fetching conversion rate: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Remote(map_transport_error(e)))?;

        // A non-2xx answer is the service rejecting the pair, which is a
        // conversion failure rather than a connectivity one.
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| Error::Remote(map_transport_error(e)))?;
            return Err(Error::CurrencyConversionFailed(format!(
                "Rate service returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<RateResponse>()
            .await
            .map_err(|e| Error::Remote(map_transport_error(e)))
    }
}
