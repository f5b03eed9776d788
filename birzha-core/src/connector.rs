use async_trait::async_trait;

use crate::BirzhaError;
use crate::types::{DateRange, FetchInterval, Instrument, InstrumentKind, RawCandleRecord, RawRateRecord};

/// Focused role trait for connectors that serve daily currency rates.
#[async_trait]
pub trait RateHistoryProvider: Send + Sync {
    /// Fetch every raw rate record for the instrument inside the range.
    ///
    /// Zero records for a valid request is not an error; it yields an empty
    /// vector. Transport failures and non-success statuses are errors and
    /// must not be retried.
    async fn rate_history(
        &self,
        instrument: &Instrument,
        range: &DateRange,
    ) -> Result<Vec<RawRateRecord>, BirzhaError>;
}

/// Focused role trait for connectors that serve OHLCV candle history.
#[async_trait]
pub trait CandleHistoryProvider: Send + Sync {
    /// Fetch every raw candle row for the instrument inside the range at the
    /// given fetch granularity, following the source's pagination cursor
    /// until an empty page, concatenated in request order.
    async fn candle_history(
        &self,
        instrument: &Instrument,
        range: &DateRange,
        interval: FetchInterval,
    ) -> Result<Vec<RawCandleRecord>, BirzhaError>;

    /// REQUIRED: exact fetch granularities this connector can natively serve.
    fn supported_fetch_intervals(&self) -> &'static [FetchInterval];
}

/// Main connector trait implemented by source crates. Exposes capability
/// discovery via accessor methods that return a usable trait object when the
/// capability is supported.
pub trait MarketConnector: Send + Sync {
    /// A stable identifier for logs and error tagging (e.g. "birzha-cbr").
    fn name(&self) -> &'static str;

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Whether this connector claims to support a given instrument kind.
    ///
    /// Default: `false` for all kinds; connectors must explicitly override.
    fn supports_kind(&self, kind: InstrumentKind) -> bool {
        let _ = kind;
        false
    }

    /// Advertise rate-history capability when supported.
    fn as_rate_history_provider(&self) -> Option<&dyn RateHistoryProvider> {
        None
    }

    /// Advertise candle-history capability when supported.
    fn as_candle_history_provider(&self) -> Option<&dyn CandleHistoryProvider> {
        None
    }
}
