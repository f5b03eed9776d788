use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::BirzhaError;
use crate::types::{Candle, Instrument, RatePoint, RateSeries, RawCandleRecord, RawRateRecord};

const RECORD_DATE_FORMAT: &str = "%d.%m.%Y";
const BEGIN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a decimal-comma numeric string and divide it by an integer nominal.
///
/// This is the unit adjustment for low-value currencies quoted per 100 or
/// per 10_000 units. Arithmetic is exact: `"1234,5678"` over a nominal of
/// `100` yields precisely `12.345678`.
///
/// # Errors
/// Returns `BirzhaError::Data` when the text is not a decimal number or the
/// nominal is zero.
pub fn parse_decimal_comma(text: &str, nominal: i64) -> Result<Decimal, BirzhaError> {
    let cleaned = text.trim().replace(',', ".");
    let value: Decimal = cleaned
        .parse()
        .map_err(|_| BirzhaError::Data(format!("unparseable decimal value '{text}'")))?;
    if nominal == 0 {
        return Err(BirzhaError::Data(format!(
            "zero nominal for value '{text}'"
        )));
    }
    Ok(value / Decimal::from(nominal))
}

/// Normalize raw rate records into a canonical per-instrument series.
///
/// An empty record set yields an empty series that still carries the
/// instrument's display symbol, so downstream joins keep a well-defined
/// column identity.
///
/// # Errors
/// Returns `BirzhaError::Data` when a present record carries an unparseable
/// date, nominal, or value.
pub fn normalize_rates(
    instrument: &Instrument,
    raw: &[RawRateRecord],
) -> Result<RateSeries, BirzhaError> {
    let mut points = Vec::with_capacity(raw.len());
    for record in raw {
        let date = NaiveDate::parse_from_str(record.date.trim(), RECORD_DATE_FORMAT)
            .map_err(|_| BirzhaError::Data(format!("unparseable record date '{}'", record.date)))?;
        let nominal: i64 = record
            .nominal
            .trim()
            .parse()
            .map_err(|_| BirzhaError::Data(format!("unparseable nominal '{}'", record.nominal)))?;
        let value = parse_decimal_comma(&record.value, nominal)?;
        points.push(RatePoint { date, value });
    }
    Ok(RateSeries {
        symbol: instrument.symbol().to_string(),
        points,
    })
}

/// Normalize raw candle rows into typed candles sorted by begin timestamp.
///
/// Numeric fields arrive already coerced (`None` where the source sent null
/// or garbage); only the begin timestamp is strict.
///
/// # Errors
/// Returns `BirzhaError::Data` when a begin timestamp does not parse.
pub fn normalize_candles(raw: &[RawCandleRecord]) -> Result<Vec<Candle>, BirzhaError> {
    let mut out = Vec::with_capacity(raw.len());
    for record in raw {
        let begin = NaiveDateTime::parse_from_str(record.begin.trim(), BEGIN_FORMAT)
            .map_err(|_| BirzhaError::Data(format!("unparseable begin timestamp '{}'", record.begin)))?;
        out.push(Candle {
            begin,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            value: record.value,
            volume: record.volume,
        });
    }
    out.sort_by_key(|c| c.begin);
    Ok(out)
}
