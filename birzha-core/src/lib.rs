//! birzha-core
//!
//! Core types, traits, and utilities shared across the birzha ecosystem.
//!
//! - `types`: common data structures (instruments, date ranges, raw records,
//!   series, combined tables).
//! - `catalog`: the static instrument catalogs for both sources.
//! - `connector`: the `MarketConnector` trait and capability provider traits.
//! - `timeseries`: normalize raw records, resample candles, and combine
//!   per-instrument series.
//!
#![warn(missing_docs)]

/// Static instrument catalogs and lookup helpers.
pub mod catalog;
/// Connector capability traits and the primary `MarketConnector` interface.
pub mod connector;
mod error;
/// Time-series utilities for normalizing, resampling, and combining.
pub mod timeseries;
pub mod types;

pub use connector::MarketConnector;
pub use error::BirzhaError;
pub use timeseries::merge::{combine_candles, combine_rates};
pub use timeseries::normalize::{normalize_candles, normalize_rates, parse_decimal_comma};
pub use timeseries::resample::resample_to_minutes;
pub use types::*;
