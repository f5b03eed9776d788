//! birzha-moex
//!
//! Connector that implements `MarketConnector` on top of the Moscow
//! Exchange ISS candles endpoint for the CETS currency board. Responses are
//! paginated: each request carries a `start` offset, each page reports its
//! rows, and the loop advances the offset by the number of rows received
//! until the server answers with an empty page.
#![warn(missing_docs)]

mod codec;

use std::time::Duration;

use async_trait::async_trait;
use birzha_core::connector::{CandleHistoryProvider, MarketConnector};
use birzha_core::{BirzhaError, DateRange, FetchInterval, Instrument, InstrumentKind, RawCandleRecord};

const NAME: &str = "birzha-moex";
const DEFAULT_BASE_URL: &str =
    "https://iss.moex.com/iss/engines/currency/markets/selt/boards/CETS";
const CANDLE_COLUMNS: &str = "begin,open,high,low,close,value,volume";
const USER_AGENT: &str = concat!("birzha/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SUPPORTED_INTERVALS: &[FetchInterval] = &[
    FetchInterval::Min1,
    FetchInterval::Min10,
    FetchInterval::Hour1,
    FetchInterval::Day1,
];

/// Public connector type for the exchange candles source.
pub struct MoexConnector {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl Default for MoexConnector {
    fn default() -> Self {
        Self::new_default()
    }
}

impl MoexConnector {
    /// Build with a fresh HTTP client against the production endpoint.
    #[must_use]
    pub fn new_default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Build against an alternate base URL (tests point this at a local
    /// mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            http,
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

    async fn fetch_page(
        &self,
        url: &str,
        range: &DateRange,
        interval: FetchInterval,
        start: usize,
    ) -> Result<Vec<RawCandleRecord>, BirzhaError> {
        let (from, till) = range.as_iso();
        let response = self
            .http
            .get(url)
            .query(&[
                ("from", from.as_str()),
                ("till", till.as_str()),
                ("interval", interval.wire_code().to_string().as_str()),
                ("iss.only", "candles"),
                ("candles.columns", CANDLE_COLUMNS),
                ("start", start.to_string().as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| BirzhaError::connector(NAME, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BirzhaError::status(NAME, status.as_u16()));
        }

        let envelope: codec::CandlesEnvelope = response
            .json()
            .await
            .map_err(|e| BirzhaError::Data(format!("malformed candles response: {e}")))?;
        codec::decode_page(&envelope)
    }
}

impl MarketConnector for MoexConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vendor(&self) -> &'static str {
        "Moscow Exchange"
    }

    fn supports_kind(&self, kind: InstrumentKind) -> bool {
        kind == InstrumentKind::CurrencyPair
    }

    fn as_candle_history_provider(&self) -> Option<&dyn CandleHistoryProvider> {
        Some(self as &dyn CandleHistoryProvider)
    }
}

#[async_trait]
impl CandleHistoryProvider for MoexConnector {
    async fn candle_history(
        &self,
        instrument: &Instrument,
        range: &DateRange,
        interval: FetchInterval,
    ) -> Result<Vec<RawCandleRecord>, BirzhaError> {
        let url = format!("{}/securities/{}/candles.json", self.base_url, instrument.code());
        tracing::debug!(
            secid = instrument.code(),
            interval = interval.wire_code(),
            "requesting candle history"
        );

        let mut all = Vec::new();
        let mut start = 0usize;
        loop {
            let page = self.fetch_page(&url, range, interval, start).await?;
            if page.is_empty() {
                break;
            }
            start += page.len();
            all.extend(page);
        }

        tracing::debug!(secid = instrument.code(), rows = all.len(), "candle history fetched");
        Ok(all)
    }

    fn supported_fetch_intervals(&self) -> &'static [FetchInterval] {
        SUPPORTED_INTERVALS
    }
}
