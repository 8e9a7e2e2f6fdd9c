//! Exchange rates relative to the canonical currency and the client that
//! fetches them.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    Error,
    currency::{CANONICAL_CURRENCY, CurrencyCode},
};

/// Multipliers that convert an amount in the canonical currency into another
/// currency.
///
/// The canonical currency always maps to exactly 1.0 and every stored
/// multiplier is finite and positive.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: HashMap<CurrencyCode, f64>,
}

impl RateTable {
    /// Create a rate table, dropping unusable multipliers.
    ///
    /// Multipliers that are not finite and positive are logged and skipped.
    /// The canonical currency is set to 1.0 regardless of what `rates` holds.
    pub fn new(rates: impl IntoIterator<Item = (CurrencyCode, f64)>) -> Self {
        let mut table: HashMap<CurrencyCode, f64> = rates
            .into_iter()
            .filter(|(code, rate)| {
                let is_usable = rate.is_finite() && *rate > 0.0;

                if !is_usable {
                    tracing::warn!("Ignoring unusable exchange rate {rate} for {code}");
                }

                is_usable
            })
            .collect();

        table.insert(CurrencyCode::canonical(), 1.0);

        Self { rates: table }
    }

    /// Build a rate table from raw currency codes, skipping invalid codes.
    pub fn from_raw(rates: HashMap<String, f64>) -> Self {
        Self::new(rates.into_iter().filter_map(|(code, rate)| {
            code.parse::<CurrencyCode>()
                .inspect_err(|error| tracing::warn!("Ignoring exchange rate: {error}"))
                .ok()
                .map(|code| (code, rate))
        }))
    }

    /// The multiplier for `currency`, if the table has one.
    pub fn get(&self, currency: &CurrencyCode) -> Option<f64> {
        self.rates.get(currency).copied()
    }

    /// Whether the table has a multiplier for `currency`.
    pub fn contains(&self, currency: &CurrencyCode) -> bool {
        self.rates.contains_key(currency)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.rates.len()
    }
}

impl Default for RateTable {
    /// The rates used until the first successful fetch.
    fn default() -> Self {
        Self::new([
            (CurrencyCode::canonical(), 1.0),
            (CurrencyCode::from_static("INR"), 83.0),
            (CurrencyCode::from_static("EUR"), 0.92),
        ])
    }
}

/// Something that can provide the latest exchange rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch a fresh rate table relative to the canonical currency.
    async fn fetch_rates(&self) -> Result<RateTable, Error>;
}

/// The body returned by the exchange rate API.
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
}

/// The default endpoint for the latest rates relative to the canonical currency.
pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

/// Fetches rates from an exchangerate-api.com compatible endpoint.
#[derive(Debug, Clone)]
pub struct ExchangeRateApiClient {
    client: Client,
    url: Url,
}

impl ExchangeRateApiClient {
    /// Create a client for the rates endpoint at `url`.
    ///
    /// # Errors
    /// Returns [Error::InvalidConfig] if the HTTP client cannot be built.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::InvalidConfig(format!("could not build HTTP client: {error}")))?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl RateSource for ExchangeRateApiClient {
    async fn fetch_rates(&self) -> Result<RateTable, Error> {
        tracing::debug!("Fetching exchange rates from {}", self.url);

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|error| Error::RateFetch(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::RateFetch(format!(
                "{} responded with {status}",
                self.url
            )));
        }

        let body: LatestRatesResponse = response
            .json()
            .await
            .map_err(|error| Error::RateFetch(format!("could not decode rates: {error}")))?;

        if !body.rates.contains_key(CANONICAL_CURRENCY) {
            tracing::warn!("Exchange rate response did not include {CANONICAL_CURRENCY}");
        }

        Ok(RateTable::from_raw(body.rates))
    }
}
