use std::sync::Arc;

use birzha_core::{BirzhaError, MarketConnector};

use crate::pipeline::{CandlesBuilder, RatesBuilder};

/// Orchestrator that runs load pipelines over registered connectors.
pub struct Birzha {
    pub(crate) connectors: Vec<Arc<dyn MarketConnector>>,
}

/// Builder for constructing a `Birzha` orchestrator.
#[derive(Default)]
pub struct BirzhaBuilder {
    connectors: Vec<Arc<dyn MarketConnector>>,
}

impl BirzhaBuilder {
    /// Create a builder with no connectors registered.
    #[must_use]
    pub const fn new() -> Self {
        Self { connectors: vec![] }
    }

    /// Register a connector.
    ///
    /// When several connectors advertise the same capability, the first
    /// registered one serves it; there is no routing beyond that.
    #[must_use]
    pub fn with_connector(mut self, connector: Arc<dyn MarketConnector>) -> Self {
        self.connectors.push(connector);
        self
    }

    /// Finalize the orchestrator.
    ///
    /// # Errors
    /// Returns `BirzhaError::InvalidArg` when no connector was registered.
    pub fn build(self) -> Result<Birzha, BirzhaError> {
        if self.connectors.is_empty() {
            return Err(BirzhaError::InvalidArg(
                "at least one connector must be registered".into(),
            ));
        }
        Ok(Birzha {
            connectors: self.connectors,
        })
    }
}

impl Birzha {
    /// Begin building an orchestrator.
    #[must_use]
    pub const fn builder() -> BirzhaBuilder {
        BirzhaBuilder::new()
    }

    /// Begin building a daily-rates load request.
    #[must_use]
    pub const fn rates(&self) -> RatesBuilder<'_> {
        RatesBuilder::new(self)
    }

    /// Begin building a candles load request.
    #[must_use]
    pub const fn candles(&self) -> CandlesBuilder<'_> {
        CandlesBuilder::new(self)
    }

    pub(crate) fn rate_connector(&self) -> Result<Arc<dyn MarketConnector>, BirzhaError> {
        self.connectors
            .iter()
            .find(|c| c.as_rate_history_provider().is_some())
            .cloned()
            .ok_or_else(|| BirzhaError::unsupported("rate_history"))
    }

    pub(crate) fn candle_connector(&self) -> Result<Arc<dyn MarketConnector>, BirzhaError> {
        self.connectors
            .iter()
            .find(|c| c.as_candle_history_provider().is_some())
            .cloned()
            .ok_or_else(|| BirzhaError::unsupported("candle_history"))
    }
}
