use std::collections::HashSet;
use std::sync::Arc;

use birzha_core::{
    BirzhaError, Candle, CandleTable, DateRange, Instrument, MarketConnector, Timeframe,
    combine_candles, normalize_candles, resample_to_minutes,
};
use tokio::sync::mpsc;

use crate::Birzha;
use crate::pipeline::{LoadEvent, LoadHandle};

/// Builder to orchestrate a candles load for multiple currency pairs.
pub struct CandlesBuilder<'a> {
    birzha: &'a Birzha,
    instruments: Vec<Instrument>,
    range: Option<DateRange>,
    timeframe: Timeframe,
}

impl<'a> CandlesBuilder<'a> {
    /// Create a new builder bound to a `Birzha` instance. The timeframe
    /// starts at fifteen minutes.
    #[must_use]
    pub(crate) const fn new(birzha: &'a Birzha) -> Self {
        Self {
            birzha,
            instruments: Vec::new(),
            range: None,
            timeframe: Timeframe::M15,
        }
    }

    /// Replace the instruments list, preserving the given selection order.
    ///
    /// # Errors
    /// Returns an error if duplicate symbols are present.
    pub fn instruments(mut self, instruments: &[Instrument]) -> Result<Self, BirzhaError> {
        let mut seen = HashSet::new();
        for instrument in instruments {
            if !seen.insert(instrument.symbol().to_string()) {
                return Err(BirzhaError::InvalidArg(format!(
                    "duplicate symbol '{}' in instruments list",
                    instrument.symbol()
                )));
            }
        }
        self.instruments = instruments.to_vec();
        Ok(self)
    }

    /// Append a single instrument.
    ///
    /// # Errors
    /// Returns an error if the instrument's symbol is already selected.
    pub fn add_instrument(mut self, instrument: Instrument) -> Result<Self, BirzhaError> {
        if self
            .instruments
            .iter()
            .any(|existing| existing.symbol() == instrument.symbol())
        {
            return Err(BirzhaError::InvalidArg(format!(
                "duplicate symbol '{}' already exists in instruments list",
                instrument.symbol()
            )));
        }
        self.instruments.push(instrument);
        Ok(self)
    }

    /// Set the inclusive date range for the load.
    #[must_use]
    pub const fn date_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Select the requested candle timeframe.
    #[must_use]
    pub const fn timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    fn validated(&self) -> Result<(Vec<Instrument>, DateRange), BirzhaError> {
        if self.instruments.is_empty() {
            return Err(BirzhaError::InvalidArg(
                "no instruments selected for the candles load".into(),
            ));
        }
        let range = self
            .range
            .ok_or_else(|| BirzhaError::InvalidArg("no date range supplied".into()))?;
        Ok((self.instruments.clone(), range))
    }

    fn connector_for(&self) -> Result<Arc<dyn MarketConnector>, BirzhaError> {
        let connector = self.birzha.candle_connector()?;
        {
            let provider = connector
                .as_candle_history_provider()
                .ok_or_else(|| BirzhaError::unsupported("candle_history"))?;
            let fetch = self.timeframe.fetch_interval();
            if !provider.supported_fetch_intervals().contains(&fetch) {
                return Err(BirzhaError::unsupported(format!(
                    "candle_history/{}",
                    self.timeframe
                )));
            }
        }
        Ok(connector)
    }

    /// Run the whole pipeline on the current task and return the combined
    /// table.
    ///
    /// # Errors
    /// Propagates validation errors, the first transport failure (which
    /// aborts the whole run), and `NoData` when every instrument is empty.
    pub async fn run(self) -> Result<CandleTable, BirzhaError> {
        let (instruments, range) = self.validated()?;
        let connector = self.connector_for()?;
        run_candles(connector, instruments, range, self.timeframe, None).await
    }

    /// Run the pipeline on one background task and observe it through the
    /// returned event channel. Input validation still happens synchronously,
    /// before any task is spawned.
    ///
    /// # Errors
    /// Returns validation and capability errors immediately; runtime errors
    /// arrive through `LoadEvent::Finished`.
    pub fn spawn(
        self,
    ) -> Result<(LoadHandle, mpsc::Receiver<LoadEvent<CandleTable>>), BirzhaError> {
        let (instruments, range) = self.validated()?;
        let connector = self.connector_for()?;
        let timeframe = self.timeframe;
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(async move {
            let result = run_candles(connector, instruments, range, timeframe, Some(tx.clone())).await;
            let _ = tx.send(LoadEvent::Finished(result)).await;
        });
        Ok((LoadHandle::new(handle), rx))
    }
}

/// Fetch one instrument's candles at the timeframe's fetch grain, falling
/// back to the secondary grain only when the primary result is empty (never
/// on error), then aggregate to the target bucket when one is configured.
async fn load_one(
    provider: &dyn birzha_core::connector::CandleHistoryProvider,
    instrument: &Instrument,
    range: &DateRange,
    timeframe: Timeframe,
) -> Result<Vec<Candle>, BirzhaError> {
    let raw = provider
        .candle_history(instrument, range, timeframe.fetch_interval())
        .await?;
    let mut candles = normalize_candles(&raw)?;

    if candles.is_empty()
        && let Some(fallback) = timeframe.fallback_interval()
    {
        tracing::debug!(
            secid = instrument.code(),
            grain = fallback.wire_code(),
            "primary fetch empty, trying fallback grain"
        );
        let raw = provider.candle_history(instrument, range, fallback).await?;
        candles = normalize_candles(&raw)?;
    }

    if let Some(minutes) = timeframe.resample_minutes() {
        candles = resample_to_minutes(candles, minutes);
    }
    Ok(candles)
}

/// Sequential per-instrument pipeline in selection order; a transport
/// failure on any instrument aborts the run.
async fn run_candles(
    connector: Arc<dyn MarketConnector>,
    instruments: Vec<Instrument>,
    range: DateRange,
    timeframe: Timeframe,
    progress: Option<mpsc::Sender<LoadEvent<CandleTable>>>,
) -> Result<CandleTable, BirzhaError> {
    let provider = connector
        .as_candle_history_provider()
        .ok_or_else(|| BirzhaError::unsupported("candle_history"))?;

    let mut per_instrument = Vec::with_capacity(instruments.len());
    for instrument in &instruments {
        let candles = load_one(provider, instrument, &range, timeframe).await?;
        tracing::debug!(
            secid = instrument.code(),
            rows = candles.len(),
            "candle series ready"
        );
        if let Some(tx) = &progress {
            let _ = tx
                .send(LoadEvent::Fetched {
                    symbol: instrument.symbol().to_string(),
                    rows: candles.len(),
                })
                .await;
        }
        per_instrument.push((instrument.clone(), candles));
    }
    combine_candles(per_instrument)
}
