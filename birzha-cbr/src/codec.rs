//! Deserialization of the `XML_dynamic` rates document.

use birzha_core::{BirzhaError, RawRateRecord};
use serde::Deserialize;

/// `<ValCurs ID="…" DateRange1="…" DateRange2="…"><Record …/>…</ValCurs>`
#[derive(Debug, Deserialize)]
struct ValCurs {
    #[serde(rename = "Record", default)]
    records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct Record {
    #[serde(rename = "@Date")]
    date: String,
    #[serde(rename = "Nominal")]
    nominal: String,
    #[serde(rename = "Value")]
    value: String,
}

/// Parse a rates document into raw records, preserving source order.
///
/// A well-formed document with zero `<Record>` elements yields an empty
/// vector; that is the source's way of saying "no rates in range".
pub(crate) fn parse_val_curs(xml: &str) -> Result<Vec<RawRateRecord>, BirzhaError> {
    let doc: ValCurs = quick_xml::de::from_str(xml)
        .map_err(|e| BirzhaError::Data(format!("malformed rates document: {e}")))?;
    Ok(doc
        .records
        .into_iter()
        .map(|r| RawRateRecord {
            date: r.date,
            nominal: r.nominal,
            value: r.value,
        })
        .collect())
}
