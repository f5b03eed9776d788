//! birzha-cbr
//!
//! Connector that implements `MarketConnector` on top of the Bank of
//! Russia `XML_dynamic` endpoint: one GET per instrument covering the whole
//! date range, returning a bounded XML document of (date, nominal, value)
//! records. No pagination, no retries.
#![warn(missing_docs)]

mod codec;

use std::time::Duration;

use async_trait::async_trait;
use birzha_core::connector::{MarketConnector, RateHistoryProvider};
use birzha_core::{BirzhaError, DateRange, Instrument, InstrumentKind, RawRateRecord};

const NAME: &str = "birzha-cbr";
const DEFAULT_BASE_URL: &str = "https://www.cbr.ru";
const RATES_PATH: &str = "/scripts/XML_dynamic.asp";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Public connector type for the central-bank daily-rates source.
pub struct CbrConnector {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl Default for CbrConnector {
    fn default() -> Self {
        Self::new_default()
    }
}

impl CbrConnector {
    /// Build with a fresh HTTP client against the production endpoint.
    #[must_use]
    pub fn new_default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Build against an alternate base URL (tests point this at a local
    /// mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl MarketConnector for CbrConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vendor(&self) -> &'static str {
        "Bank of Russia"
    }

    fn supports_kind(&self, kind: InstrumentKind) -> bool {
        kind == InstrumentKind::CurrencyRate
    }

    fn as_rate_history_provider(&self) -> Option<&dyn RateHistoryProvider> {
        Some(self as &dyn RateHistoryProvider)
    }
}

#[async_trait]
impl RateHistoryProvider for CbrConnector {
    async fn rate_history(
        &self,
        instrument: &Instrument,
        range: &DateRange,
    ) -> Result<Vec<RawRateRecord>, BirzhaError> {
        let (from, till) = range.as_day_month_year();
        let url = format!("{}{}", self.base_url, RATES_PATH);
        tracing::debug!(code = instrument.code(), %from, %till, "requesting rate history");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("VAL_NM_RQ", instrument.code()),
                ("date_req1", from.as_str()),
                ("date_req2", till.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| BirzhaError::connector(NAME, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BirzhaError::status(NAME, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BirzhaError::connector(NAME, e.to_string()))?;
        let records = codec::parse_val_curs(&body)?;
        tracing::debug!(code = instrument.code(), rows = records.len(), "rate history fetched");
        Ok(records)
    }
}
