//! Mock connectors for CI-safe tests of the orchestration layer.
//!
//! `MockRates` serves deterministic fixtures by display symbol; `MockCandles`
//! is programmed per (secid, interval) so tests can stage pagination results,
//! empty primaries, and the 10-minute fallback series. Both honor the magic
//! symbol `FAIL`, which forces a connector error.

use std::collections::HashMap;

use async_trait::async_trait;
use birzha_core::connector::{CandleHistoryProvider, MarketConnector, RateHistoryProvider};
use birzha_core::{
    BirzhaError, DateRange, FetchInterval, Instrument, InstrumentKind, RawCandleRecord,
    RawRateRecord,
};

mod fixtures;

/// Symbol that forces a transport-style connector failure from both mocks.
pub const FAIL_SYMBOL: &str = "FAIL";

fn maybe_fail(connector: &'static str, symbol: &str) -> Result<(), BirzhaError> {
    if symbol == FAIL_SYMBOL {
        return Err(BirzhaError::connector(connector, "forced failure"));
    }
    Ok(())
}

/// Mock rate connector backed by static fixtures.
#[derive(Default)]
pub struct MockRates;

impl MockRates {
    /// Build the fixture-backed mock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MarketConnector for MockRates {
    fn name(&self) -> &'static str {
        "birzha-mock-rates"
    }
    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn supports_kind(&self, kind: InstrumentKind) -> bool {
        kind == InstrumentKind::CurrencyRate
    }

    fn as_rate_history_provider(&self) -> Option<&dyn RateHistoryProvider> {
        Some(self as &dyn RateHistoryProvider)
    }
}

#[async_trait]
impl RateHistoryProvider for MockRates {
    async fn rate_history(
        &self,
        instrument: &Instrument,
        _range: &DateRange,
    ) -> Result<Vec<RawRateRecord>, BirzhaError> {
        let symbol = instrument.symbol();
        maybe_fail(self.name(), symbol)?;
        Ok(fixtures::rates::by_symbol(symbol).unwrap_or_default())
    }
}

/// Programmable mock candle connector.
///
/// Responses are staged up front with [`MockCandles::with_series`]; a lookup
/// miss yields an empty page set, which is how the real source reports "no
/// candles in range".
#[derive(Default)]
pub struct MockCandles {
    responses: HashMap<(String, FetchInterval), Vec<RawCandleRecord>>,
}

impl MockCandles {
    /// Build an empty mock; every request answers with zero rows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the rows answered for one (secid, interval) pair.
    #[must_use]
    pub fn with_series(
        mut self,
        secid: impl Into<String>,
        interval: FetchInterval,
        rows: Vec<RawCandleRecord>,
    ) -> Self {
        self.responses.insert((secid.into(), interval), rows);
        self
    }
}

impl MarketConnector for MockCandles {
    fn name(&self) -> &'static str {
        "birzha-mock-candles"
    }
    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn supports_kind(&self, kind: InstrumentKind) -> bool {
        kind == InstrumentKind::CurrencyPair
    }

    fn as_candle_history_provider(&self) -> Option<&dyn CandleHistoryProvider> {
        Some(self as &dyn CandleHistoryProvider)
    }
}

#[async_trait]
impl CandleHistoryProvider for MockCandles {
    async fn candle_history(
        &self,
        instrument: &Instrument,
        _range: &DateRange,
        interval: FetchInterval,
    ) -> Result<Vec<RawCandleRecord>, BirzhaError> {
        maybe_fail(self.name(), instrument.symbol())?;
        Ok(self
            .responses
            .get(&(instrument.code().to_string(), interval))
            .cloned()
            .unwrap_or_default())
    }

    fn supported_fetch_intervals(&self) -> &'static [FetchInterval] {
        &[
            FetchInterval::Min1,
            FetchInterval::Min10,
            FetchInterval::Hour1,
            FetchInterval::Day1,
        ]
    }
}

/// Convenience builder for a raw candle row with full OHLCV fields.
#[must_use]
pub fn raw_candle(begin: &str, open: f64, high: f64, low: f64, close: f64, volume: f64) -> RawCandleRecord {
    RawCandleRecord {
        begin: begin.to_string(),
        open: Some(open),
        high: Some(high),
        low: Some(low),
        close: Some(close),
        value: Some(open * volume),
        volume: Some(volume),
    }
}
