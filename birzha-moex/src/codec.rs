//! Deserialization of one page of the ISS candles envelope.
//!
//! The envelope carries a `columns` array naming each position of the data
//! rows; cells are mapped by name, never by position, because the server is
//! free to reorder columns regardless of what the request asked for.

use birzha_core::{BirzhaError, RawCandleRecord};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct CandlesEnvelope {
    candles: Option<CandlesBlock>,
}

#[derive(Debug, Deserialize)]
struct CandlesBlock {
    columns: Vec<String>,
    data: Vec<Vec<Value>>,
}

fn number_at(row: &[Value], idx: usize) -> Option<f64> {
    match row.get(idx) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decode one page of candle rows. A missing `candles` block or an empty
/// `data` array is an empty page, which ends the pagination loop upstream.
pub(crate) fn decode_page(envelope: &CandlesEnvelope) -> Result<Vec<RawCandleRecord>, BirzhaError> {
    let Some(block) = &envelope.candles else {
        return Ok(Vec::new());
    };
    let position = |name: &str| {
        block
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| BirzhaError::Data(format!("candles response missing column '{name}'")))
    };
    let begin = position("begin")?;
    let open = position("open")?;
    let high = position("high")?;
    let low = position("low")?;
    let close = position("close")?;
    let value = position("value")?;
    let volume = position("volume")?;

    let mut out = Vec::with_capacity(block.data.len());
    for row in &block.data {
        let begin = row
            .get(begin)
            .and_then(Value::as_str)
            .ok_or_else(|| BirzhaError::Data("candle row missing begin timestamp".into()))?
            .to_string();
        out.push(RawCandleRecord {
            begin,
            open: number_at(row, open),
            high: number_at(row, high),
            low: number_at(row, low),
            close: number_at(row, close),
            value: number_at(row, value),
            volume: number_at(row, volume),
        });
    }
    Ok(out)
}
