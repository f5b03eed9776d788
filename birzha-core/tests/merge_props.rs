use birzha_core::{BirzhaError, Candle, Instrument, RatePoint, RateSeries, combine_candles, combine_rates};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

fn day(offset: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i64::from(offset))
}

fn arb_series(symbol: &'static str) -> impl Strategy<Value = RateSeries> {
    proptest::collection::btree_map(0i32..60, 0i64..1_000_000i64, 0..40).prop_map(move |points| {
        RateSeries {
            symbol: symbol.to_string(),
            points: points
                .into_iter()
                .map(|(d, v)| RatePoint {
                    date: day(d),
                    value: Decimal::new(v, 4),
                })
                .collect(),
        }
    })
}

proptest! {
    #[test]
    fn join_covers_the_union_and_stays_sorted(
        a in arb_series("A"),
        b in arb_series("B"),
        c in arb_series("C"),
    ) {
        let series = vec![a, b, c];
        let union: BTreeSet<NaiveDate> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.date))
            .collect();
        let by_series: Vec<BTreeMap<NaiveDate, Decimal>> = series
            .iter()
            .map(|s| s.points.iter().map(|p| (p.date, p.value)).collect())
            .collect();

        match combine_rates(series) {
            Ok(table) => {
                prop_assert_eq!(table.columns.len(), 3);
                let dates: Vec<NaiveDate> = table.rows.iter().map(|r| r.date).collect();
                let expected: Vec<NaiveDate> = union.iter().copied().collect();
                prop_assert_eq!(dates, expected);
                for row in &table.rows {
                    prop_assert_eq!(row.values.len(), 3);
                    for (idx, cell) in row.values.iter().enumerate() {
                        prop_assert_eq!(*cell, by_series[idx].get(&row.date).copied());
                    }
                }
            }
            Err(err) => {
                // Only an all-empty input may fail, and only with NoData.
                prop_assert!(union.is_empty());
                prop_assert_eq!(err, BirzhaError::NoData);
            }
        }
    }
}

fn arb_candles() -> impl Strategy<Value = Vec<Candle>> {
    proptest::collection::vec((0i64..100_000i64, 0i64..10_000i64), 0..30).prop_map(|rows| {
        rows.into_iter()
            .map(|(minute_offset, cents)| {
                let px = cents as f64 / 100.0;
                Candle {
                    begin: day(0).and_hms_opt(0, 0, 0).unwrap()
                        + chrono::Duration::minutes(minute_offset),
                    open: Some(px),
                    high: Some(px),
                    low: Some(px),
                    close: Some(px),
                    value: Some(px),
                    volume: Some(1.0),
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn concat_sorts_by_secid_then_begin(
        a in arb_candles(),
        b in arb_candles(),
    ) {
        let total = a.len() + b.len();
        let input = vec![
            (Instrument::pair("CNYRUB_TOM", "CNY/RUB TOM"), a),
            (Instrument::pair("BYNRUB_TOM", "BYN/RUB TOM"), b),
        ];
        match combine_candles(input) {
            Ok(table) => {
                prop_assert_eq!(table.rows.len(), total);
                for pair in table.rows.windows(2) {
                    let key0 = (&pair[0].secid, pair[0].candle.begin);
                    let key1 = (&pair[1].secid, pair[1].candle.begin);
                    prop_assert!(key0 <= key1);
                }
            }
            Err(err) => {
                prop_assert_eq!(total, 0);
                prop_assert_eq!(err, BirzhaError::NoData);
            }
        }
    }
}
