use std::collections::HashSet;
use std::sync::Arc;

use birzha_core::{
    BirzhaError, DateRange, Instrument, MarketConnector, RateTable, combine_rates, normalize_rates,
};
use tokio::sync::mpsc;

use crate::Birzha;
use crate::pipeline::{LoadEvent, LoadHandle};

/// Builder to orchestrate a daily-rates load for multiple currencies.
pub struct RatesBuilder<'a> {
    birzha: &'a Birzha,
    instruments: Vec<Instrument>,
    range: Option<DateRange>,
}

impl<'a> RatesBuilder<'a> {
    /// Create a new builder bound to a `Birzha` instance.
    #[must_use]
    pub(crate) const fn new(birzha: &'a Birzha) -> Self {
        Self {
            birzha,
            instruments: Vec::new(),
            range: None,
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

    fn validated(&self) -> Result<(Vec<Instrument>, DateRange), BirzhaError> {
        if self.instruments.is_empty() {
            return Err(BirzhaError::InvalidArg(
                "no instruments selected for the rates load".into(),
            ));
        }
        let range = self
            .range
            .ok_or_else(|| BirzhaError::InvalidArg("no date range supplied".into()))?;
        Ok((self.instruments.clone(), range))
    }

    /// Run the whole pipeline on the current task and return the combined
    /// table.
    ///
    /// # Errors
    /// Propagates validation errors, the first transport failure (which
    /// aborts the whole run), and `NoData` when every instrument is empty.
    pub async fn run(self) -> Result<RateTable, BirzhaError> {
        let (instruments, range) = self.validated()?;
        let connector = self.birzha.rate_connector()?;
        run_rates(connector, instruments, range, None).await
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
    ) -> Result<(LoadHandle, mpsc::Receiver<LoadEvent<RateTable>>), BirzhaError> {
        let (instruments, range) = self.validated()?;
        let connector = self.birzha.rate_connector()?;
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(async move {
            let result = run_rates(connector, instruments, range, Some(tx.clone())).await;
            let _ = tx.send(LoadEvent::Finished(result)).await;
        });
        Ok((LoadHandle::new(handle), rx))
    }
}

/// Sequential per-instrument pipeline: fetch, normalize, then one combined
/// outer join. Instruments are processed in selection order; a transport
/// failure on any of them aborts the run.
async fn run_rates(
    connector: Arc<dyn MarketConnector>,
    instruments: Vec<Instrument>,
    range: DateRange,
    progress: Option<mpsc::Sender<LoadEvent<RateTable>>>,
) -> Result<RateTable, BirzhaError> {
    let provider = connector
        .as_rate_history_provider()
        .ok_or_else(|| BirzhaError::unsupported("rate_history"))?;

    let mut series = Vec::with_capacity(instruments.len());
    for instrument in &instruments {
        let raw = provider.rate_history(instrument, &range).await?;
        tracing::debug!(symbol = instrument.symbol(), rows = raw.len(), "rate series fetched");
        if let Some(tx) = &progress {
            let _ = tx
                .send(LoadEvent::Fetched {
                    symbol: instrument.symbol().to_string(),
                    rows: raw.len(),
                })
                .await;
        }
        series.push(normalize_rates(instrument, &raw)?);
    }
    combine_rates(series)
}
