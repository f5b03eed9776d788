//! Birzha orchestrates currency-rate and candle loads over pluggable
//! market data connectors.
//!
//! Overview
//! - Routes each pipeline to the first registered connector that implements
//!   the `birzha_core` capability it needs.
//! - Runs every load sequentially, instrument by instrument, on one
//!   background task; the foreground observes progress and the final
//!   combined table through an event channel only.
//! - A transport failure on any instrument aborts the whole run; an
//!   instrument with zero rows merely contributes no data, and an all-empty
//!   load surfaces as an explicit `NoData` error.
//! - Combined tables can be written to an XLSX workbook via [`export`].
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use birzha::Birzha;
//! use birzha_core::{DateRange, catalog};
//!
//! let birzha = Birzha::builder()
//!     .with_connector(Arc::new(birzha_cbr::CbrConnector::new_default()))
//!     .build()?;
//!
//! let table = birzha
//!     .rates()
//!     .instruments(&[catalog::currency_by_symbol("USD").unwrap()])?
//!     .date_range(DateRange::parse("01/01/2024", "31/12/2024")?)
//!     .run()
//!     .await?;
//! birzha::export::write_rates(&table, "rates.xlsx".as_ref())?;
//! ```
#![warn(missing_docs)]

mod core;
/// XLSX export of combined tables.
pub mod export;
mod pipeline;

pub use core::{Birzha, BirzhaBuilder};
pub use pipeline::{CandlesBuilder, LoadEvent, LoadHandle, RatesBuilder};

// Re-export core types for convenience
pub use birzha_core::{
    BirzhaError,
    Candle,
    CandleRow,
    CandleTable,
    DateRange,
    FetchInterval,
    Instrument,
    InstrumentKind,
    MarketConnector,
    RatePoint,
    RateRow,
    RateSeries,
    RateTable,
    Timeframe,
    catalog,
};
