use birzha_core::RawRateRecord;

/// Deterministic raw rate records keyed by display symbol.
///
/// "USD" and "EUR" overlap on two dates so join tests can observe the outer
/// union; "NODATA" exists in no fixture and yields an empty result.
pub fn by_symbol(symbol: &str) -> Option<Vec<RawRateRecord>> {
    match symbol {
        "USD" => Some(build(&[
            ("09.01.2024", "1", "91,1000"),
            ("10.01.2024", "1", "91,2500"),
            ("11.01.2024", "1", "90,9800"),
        ])),
        "EUR" => Some(build(&[
            ("10.01.2024", "1", "99,5000"),
            ("11.01.2024", "1", "99,7500"),
            ("12.01.2024", "1", "100,0200"),
        ])),
        // A low-value currency quoted per 10 000 units.
        "VND" => Some(build(&[("10.01.2024", "10000", "37,1234")])),
        _ => None,
    }
}

fn build(rows: &[(&str, &str, &str)]) -> Vec<RawRateRecord> {
    rows.iter()
        .map(|(date, nominal, value)| RawRateRecord {
            date: (*date).to_string(),
            nominal: (*nominal).to_string(),
            value: (*value).to_string(),
        })
        .collect()
}
