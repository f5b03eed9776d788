use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::BirzhaError;
use crate::types::{Candle, CandleRow, CandleTable, Instrument, RateRow, RateSeries, RateTable};

/// Combine per-instrument rate series into one wide table via successive
/// outer joins on the date key.
///
/// - The result's date set is the union of all per-instrument date sets.
/// - Columns appear in input order; an instrument lacking a value on a date
///   leaves its cell `None`.
/// - Rows come out sorted by date ascending.
/// - An instrument that repeats a date keeps the later record.
///
/// # Errors
/// - `BirzhaError::InvalidArg` when no series are supplied at all.
/// - `BirzhaError::NoData` when every supplied series is empty — an all-empty
///   load is a failure, never an empty success.
pub fn combine_rates<I>(series: I) -> Result<RateTable, BirzhaError>
where
    I: IntoIterator<Item = RateSeries>,
{
    let series: Vec<RateSeries> = series.into_iter().collect();
    if series.is_empty() {
        return Err(BirzhaError::InvalidArg("no series to combine".into()));
    }
    if series.iter().all(RateSeries::is_empty) {
        return Err(BirzhaError::NoData);
    }

    let columns: Vec<String> = series.iter().map(|s| s.symbol.clone()).collect();
    let width = columns.len();

    let mut by_date: BTreeMap<NaiveDate, Vec<Option<Decimal>>> = BTreeMap::new();
    for (idx, s) in series.iter().enumerate() {
        for point in &s.points {
            let cells = by_date.entry(point.date).or_insert_with(|| vec![None; width]);
            cells[idx] = Some(point.value);
        }
    }

    let rows = by_date
        .into_iter()
        .map(|(date, values)| RateRow { date, values })
        .collect();
    Ok(RateTable { columns, rows })
}

/// Combine per-instrument candle series into one long table.
///
/// Each row is annotated with its instrument's source code and the result is
/// sorted by (secid, begin) ascending. Empty series contribute nothing and
/// are excluded from the retained per-instrument list.
///
/// # Errors
/// - `BirzhaError::InvalidArg` when no series are supplied at all.
/// - `BirzhaError::NoData` when every supplied series is empty.
pub fn combine_candles(
    per_instrument: Vec<(Instrument, Vec<Candle>)>,
) -> Result<CandleTable, BirzhaError> {
    if per_instrument.is_empty() {
        return Err(BirzhaError::InvalidArg("no series to combine".into()));
    }
    let kept: Vec<(Instrument, Vec<Candle>)> = per_instrument
        .into_iter()
        .filter(|(_, candles)| !candles.is_empty())
        .collect();
    if kept.is_empty() {
        return Err(BirzhaError::NoData);
    }

    let mut rows: Vec<CandleRow> = kept
        .iter()
        .flat_map(|(instrument, candles)| {
            candles.iter().map(|candle| CandleRow {
                secid: instrument.code().to_string(),
                candle: candle.clone(),
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        a.secid
            .cmp(&b.secid)
            .then(a.candle.begin.cmp(&b.candle.begin))
    });

    Ok(CandleTable {
        rows,
        per_instrument: kept,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RatePoint;
    use rust_decimal::Decimal;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn series(symbol: &str, days: &[u32]) -> RateSeries {
        RateSeries {
            symbol: symbol.to_string(),
            points: days
                .iter()
                .map(|d| RatePoint {
                    date: day(*d),
                    value: Decimal::from(*d),
                })
                .collect(),
        }
    }

    #[test]
    fn outer_join_takes_the_union_of_dates() {
        let table = combine_rates([series("A", &[1, 2, 3]), series("B", &[2, 3, 4])]).unwrap();
        assert_eq!(table.columns, vec!["A", "B"]);
        let dates: Vec<NaiveDate> = table.rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3), day(4)]);
        // A absent on the last date, B absent on the first.
        assert_eq!(table.rows[3].values[0], None);
        assert_eq!(table.rows[0].values[1], None);
        assert_eq!(table.rows[1].values[0], Some(Decimal::from(2)));
        assert_eq!(table.rows[1].values[1], Some(Decimal::from(2)));
    }

    #[test]
    fn empty_series_still_claims_a_column() {
        let table = combine_rates([series("A", &[1]), RateSeries::empty("B")]).unwrap();
        assert_eq!(table.columns, vec!["A", "B"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].values, vec![Some(Decimal::from(1)), None]);
    }

    #[test]
    fn all_empty_is_no_data_not_an_empty_table() {
        let err = combine_rates([RateSeries::empty("A"), RateSeries::empty("B")]).unwrap_err();
        assert_eq!(err, BirzhaError::NoData);
        assert!(combine_rates(std::iter::empty()).is_err());
    }

    fn one_candle(minute: u32) -> Candle {
        Candle {
            begin: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(10, minute, 0)
                .unwrap(),
            open: Some(1.0),
            high: Some(1.0),
            low: Some(1.0),
            close: Some(1.0),
            value: Some(1.0),
            volume: Some(1.0),
        }
    }

    #[test]
    fn candle_rows_sort_by_secid_then_begin() {
        let zzz = Instrument::pair("ZZZRUB_TOM", "ZZZ/RUB TOM");
        let aaa = Instrument::pair("AAARUB_TOM", "AAA/RUB TOM");
        let table = combine_candles(vec![
            (zzz, vec![one_candle(1), one_candle(0)]),
            (aaa, vec![one_candle(5)]),
        ])
        .unwrap();
        let keys: Vec<(&str, u32)> = table
            .rows
            .iter()
            .map(|r| (r.secid.as_str(), chrono::Timelike::minute(&r.candle.begin)))
            .collect();
        assert_eq!(
            keys,
            vec![("AAARUB_TOM", 5), ("ZZZRUB_TOM", 0), ("ZZZRUB_TOM", 1)]
        );
    }

    #[test]
    fn empty_candle_series_are_excluded_and_all_empty_fails() {
        let cny = Instrument::pair("CNYRUB_TOM", "CNY/RUB TOM");
        let byn = Instrument::pair("BYNRUB_TOM", "BYN/RUB TOM");
        let table =
            combine_candles(vec![(cny.clone(), vec![one_candle(0)]), (byn.clone(), vec![])])
                .unwrap();
        assert_eq!(table.per_instrument.len(), 1);
        assert_eq!(table.per_instrument[0].0.code(), "CNYRUB_TOM");

        let err = combine_candles(vec![(cny, vec![]), (byn, vec![])]).unwrap_err();
        assert_eq!(err, BirzhaError::NoData);
    }
}
