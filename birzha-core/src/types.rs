//! Common data structures shared across the birzha workspace: instruments,
//! date ranges, timeframes, raw source records, and canonical series.

use core::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::BirzhaError;

/// Which provider capability serves an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentKind {
    /// A currency quoted by the central bank's daily-rate feed.
    CurrencyRate,
    /// A currency pair traded on the exchange's FX board.
    CurrencyPair,
}

/// A quotable entity selected by the user at request time.
///
/// Instruments are immutable; they are built from the static catalogs in
/// [`crate::catalog`] and carry the source-specific code plus a
/// human-readable label. The display symbol is the label text before the
/// first space (`"USD (US Dollar)"` → `"USD"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    code: String,
    label: String,
    kind: InstrumentKind,
}

impl Instrument {
    /// Build an instrument from its source code, display label, and kind.
    pub fn new(code: impl Into<String>, label: impl Into<String>, kind: InstrumentKind) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            kind,
        }
    }

    /// Shorthand for a central-bank currency instrument.
    pub fn currency(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(code, label, InstrumentKind::CurrencyRate)
    }

    /// Shorthand for an exchange currency-pair instrument.
    pub fn pair(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(code, label, InstrumentKind::CurrencyPair)
    }

    /// The source-specific identifier (rate code or board security id).
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The human-readable label as shown in the catalog.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The capability kind this instrument is served by.
    #[must_use]
    pub const fn kind(&self) -> InstrumentKind {
        self.kind
    }

    /// Short display symbol: the label text before the first space.
    #[must_use]
    pub fn symbol(&self) -> &str {
        self.label.split_whitespace().next().unwrap_or(&self.label)
    }
}

/// Inclusive calendar date range for a load request.
///
/// Both bounds must parse as valid dates; `start <= end` is deliberately not
/// enforced — an inverted range simply yields empty series from the sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    const INPUT_FORMAT: &'static str = "%d/%m/%Y";

    /// Build a range from already-validated dates.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse a range from `dd/mm/yyyy` user input.
    ///
    /// # Errors
    /// Returns `BirzhaError::InvalidArg` when either bound is not a valid
    /// calendar date in `dd/mm/yyyy` form.
    pub fn parse(from: &str, till: &str) -> Result<Self, BirzhaError> {
        let parse_one = |text: &str| {
            NaiveDate::parse_from_str(text.trim(), Self::INPUT_FORMAT).map_err(|_| {
                BirzhaError::InvalidArg(format!("invalid date '{text}', expected dd/mm/yyyy"))
            })
        };
        Ok(Self {
            start: parse_one(from)?,
            end: parse_one(till)?,
        })
    }

    /// First day of the range (inclusive).
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Both bounds in `dd/mm/yyyy` form, as the rates endpoint expects.
    #[must_use]
    pub fn as_day_month_year(&self) -> (String, String) {
        (
            self.start.format(Self::INPUT_FORMAT).to_string(),
            self.end.format(Self::INPUT_FORMAT).to_string(),
        )
    }

    /// Both bounds in `yyyy-mm-dd` form, as the candles endpoint expects.
    #[must_use]
    pub fn as_iso(&self) -> (String, String) {
        (
            self.start.format("%Y-%m-%d").to_string(),
            self.end.format("%Y-%m-%d").to_string(),
        )
    }
}

/// Native fetch granularity understood by the candles source.
///
/// The wire codes are the source's interval identifiers, not minute counts
/// (daily candles are requested as `24`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchInterval {
    /// One-minute candles.
    Min1,
    /// Ten-minute candles (used only as the 30-minute fallback grain).
    Min10,
    /// Hourly candles.
    Hour1,
    /// Daily candles.
    Day1,
}

impl FetchInterval {
    /// The interval code to put on the wire.
    #[must_use]
    pub const fn wire_code(self) -> u32 {
        match self {
            Self::Min1 => 1,
            Self::Min10 => 10,
            Self::Hour1 => 60,
            Self::Day1 => 24,
        }
    }
}

/// User-requested candle granularity.
///
/// Each timeframe maps to the fetch granularity to request from the source
/// and an optional coarser resample target when the source cannot serve the
/// requested grain natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    /// One minute.
    M1,
    /// Five minutes, aggregated from one-minute candles.
    M5,
    /// Fifteen minutes, aggregated from one-minute candles.
    M15,
    /// Thirty minutes, aggregated from one-minute candles, with a
    /// ten-minute fallback fetch when the primary fetch comes back empty.
    M30,
    /// One hour, served natively.
    H1,
    /// One day, served natively.
    D1,
}

impl Timeframe {
    /// All supported timeframes, in display order.
    pub const ALL: [Self; 6] = [Self::M1, Self::M5, Self::M15, Self::M30, Self::H1, Self::D1];

    /// The granularity to request from the source.
    #[must_use]
    pub const fn fetch_interval(self) -> FetchInterval {
        match self {
            Self::M1 | Self::M5 | Self::M15 | Self::M30 => FetchInterval::Min1,
            Self::H1 => FetchInterval::Hour1,
            Self::D1 => FetchInterval::Day1,
        }
    }

    /// Target aggregation bucket in minutes; `None` means the fetched series
    /// passes through unchanged.
    #[must_use]
    pub const fn resample_minutes(self) -> Option<i64> {
        match self {
            Self::M5 => Some(5),
            Self::M15 => Some(15),
            Self::M30 => Some(30),
            Self::M1 | Self::H1 | Self::D1 => None,
        }
    }

    /// Secondary fetch granularity to try when the primary fetch returns
    /// zero rows. Only the 30-minute timeframe has one.
    #[must_use]
    pub const fn fallback_interval(self) -> Option<FetchInterval> {
        match self {
            Self::M30 => Some(FetchInterval::Min10),
            _ => None,
        }
    }

    /// Canonical text form, as accepted by [`Timeframe::from_str`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::M30 => "30m",
            Self::H1 => "1h",
            Self::D1 => "1d",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = BirzhaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1m" => Ok(Self::M1),
            "5m" => Ok(Self::M5),
            "15m" => Ok(Self::M15),
            "30m" => Ok(Self::M30),
            "1h" => Ok(Self::H1),
            "1d" => Ok(Self::D1),
            other => Err(BirzhaError::InvalidArg(format!(
                "unsupported timeframe '{other}'"
            ))),
        }
    }
}

/// One source-native daily-rate data point, exactly as it appears in the
/// rates document: a `dd.mm.yyyy` date, an integer nominal, and a
/// decimal-comma value. Produced by the fetcher, consumed by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRateRecord {
    /// Record date in `dd.mm.yyyy` form.
    pub date: String,
    /// Source multiplier (e.g. "100" for low-value currencies).
    pub nominal: String,
    /// Quoted value with a comma decimal separator.
    pub value: String,
}

/// One source-native candle row. Numeric fields are already coerced
/// leniently: a JSON null or non-numeric cell becomes `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandleRecord {
    /// Bucket begin timestamp in `yyyy-mm-dd HH:MM:SS` form.
    pub begin: String,
    /// Opening price.
    pub open: Option<f64>,
    /// High price.
    pub high: Option<f64>,
    /// Low price.
    pub low: Option<f64>,
    /// Closing price.
    pub close: Option<f64>,
    /// Traded value (turnover).
    pub value: Option<f64>,
    /// Traded volume.
    pub volume: Option<f64>,
}

/// One normalized per-unit rate observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePoint {
    /// Observation date.
    pub date: NaiveDate,
    /// Per-unit rate (source value divided by its nominal).
    pub value: Decimal,
}

/// Canonical per-instrument rate series.
///
/// An instrument with zero records in range yields an empty series that
/// still carries the display symbol, so later joins have a well-defined
/// column identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSeries {
    /// Display symbol used as the value-column name in the combined table.
    pub symbol: String,
    /// Observations in source order.
    pub points: Vec<RatePoint>,
}

impl RateSeries {
    /// An empty series carrying only its column identity.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    /// True when the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One normalized OHLCV candle.
///
/// Price fields stay optional: the source can serve partial rows, and the
/// resampler drops buckets that never see a complete OHLC set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket begin timestamp (exchange-local, naive).
    pub begin: NaiveDateTime,
    /// Opening price.
    pub open: Option<f64>,
    /// High price.
    pub high: Option<f64>,
    /// Low price.
    pub low: Option<f64>,
    /// Closing price.
    pub close: Option<f64>,
    /// Traded value (turnover).
    pub value: Option<f64>,
    /// Traded volume.
    pub volume: Option<f64>,
}

/// One row of the combined rate table: a date plus one optional value per
/// selected instrument, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRow {
    /// Observation date.
    pub date: NaiveDate,
    /// One cell per column; `None` where the instrument has no value.
    pub values: Vec<Option<Decimal>>,
}

/// Cross-instrument rate result: one row per distinct date across all
/// selected instruments, one column per instrument, sorted by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// Value-column names (instrument display symbols) in selection order.
    pub columns: Vec<String>,
    /// Rows sorted by date ascending.
    pub rows: Vec<RateRow>,
}

impl RateTable {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One row of the combined candle table: an instrument code plus its candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleRow {
    /// Source security identifier the candle belongs to.
    pub secid: String,
    /// The candle itself.
    pub candle: Candle,
}

/// Cross-instrument candle result: every per-instrument series concatenated
/// and sorted by (secid, begin), plus the non-empty per-instrument series in
/// selection order for per-sheet export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleTable {
    /// All rows sorted by (secid, begin) ascending.
    pub rows: Vec<CandleRow>,
    /// Non-empty per-instrument series, in selection order.
    pub per_instrument: Vec<(Instrument, Vec<Candle>)>,
}

impl CandleTable {
    /// Number of rows in the combined sheet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
