use std::sync::Arc;

use birzha::{Birzha, BirzhaError, DateRange, Instrument, LoadEvent};
use birzha_mock::{MockCandles, MockRates};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn usd() -> Instrument {
    Instrument::currency("R01235", "USD (US Dollar)")
}

fn eur() -> Instrument {
    Instrument::currency("R01239", "EUR (Euro)")
}

fn range() -> DateRange {
    DateRange::parse("09/01/2024", "12/01/2024").unwrap()
}

fn orchestrator() -> Birzha {
    Birzha::builder()
        .with_connector(Arc::new(MockRates::new()))
        .build()
        .unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[tokio::test]
async fn outer_join_unions_dates_across_instruments() {
    let table = orchestrator()
        .rates()
        .instruments(&[usd(), eur()])
        .unwrap()
        .date_range(range())
        .run()
        .await
        .unwrap();

    assert_eq!(table.columns, vec!["USD", "EUR"]);
    let dates: Vec<NaiveDate> = table.rows.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
        ]
    );
    // USD has no value on the 12th, EUR none on the 9th.
    assert_eq!(table.rows[0].values, vec![Some(dec("91.1000")), None]);
    assert_eq!(table.rows[3].values, vec![None, Some(dec("100.0200"))]);
}

#[tokio::test]
async fn nominal_divides_into_a_per_unit_rate() {
    let vnd = Instrument::currency("R01150", "VND (Vietnamese Dong)");
    let table = orchestrator()
        .rates()
        .instruments(&[vnd])
        .unwrap()
        .date_range(range())
        .run()
        .await
        .unwrap();
    assert_eq!(table.rows[0].values[0], Some(dec("0.00371234")));
}

#[tokio::test]
async fn instrument_without_rows_contributes_an_empty_column() {
    let none = Instrument::currency("R99999", "NONE (Empty Fixture)");
    let table = orchestrator()
        .rates()
        .instruments(&[usd(), none])
        .unwrap()
        .date_range(range())
        .run()
        .await
        .unwrap();
    assert_eq!(table.columns, vec!["USD", "NONE"]);
    assert!(table.rows.iter().all(|r| r.values[1].is_none()));
}

#[tokio::test]
async fn all_empty_instruments_signal_no_data() {
    let none = Instrument::currency("R99999", "NONE (Empty Fixture)");
    let err = orchestrator()
        .rates()
        .instruments(&[none])
        .unwrap()
        .date_range(range())
        .run()
        .await
        .unwrap_err();
    assert_eq!(err, BirzhaError::NoData);
}

#[tokio::test]
async fn transport_failure_aborts_the_whole_run() {
    let failing = Instrument::currency("R00000", "FAIL (Forced Failure)");
    let err = orchestrator()
        .rates()
        .instruments(&[usd(), failing])
        .unwrap()
        .date_range(range())
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, BirzhaError::Connector { .. }));
}

#[tokio::test]
async fn validation_rejects_bad_input_before_any_work() {
    // Empty selection.
    let err = orchestrator().rates().date_range(range()).run().await.unwrap_err();
    assert!(matches!(err, BirzhaError::InvalidArg(_)));

    // Missing date range.
    let err = orchestrator()
        .rates()
        .instruments(&[usd()])
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, BirzhaError::InvalidArg(_)));

    // Duplicate symbols.
    let err = orchestrator()
        .rates()
        .instruments(&[usd(), usd()])
        .err()
        .unwrap();
    assert!(matches!(err, BirzhaError::InvalidArg(_)));

    // spawn() surfaces validation synchronously, without a task.
    let birzha = orchestrator();
    let err = birzha.rates().date_range(range()).spawn().err().unwrap();
    assert!(matches!(err, BirzhaError::InvalidArg(_)));
}

#[tokio::test]
async fn missing_capability_is_unsupported() {
    let birzha = Birzha::builder()
        .with_connector(Arc::new(MockCandles::new()))
        .build()
        .unwrap();
    let err = birzha
        .rates()
        .instruments(&[usd()])
        .unwrap()
        .date_range(range())
        .run()
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BirzhaError::Unsupported {
            capability: "rate_history".into()
        }
    );
}

#[tokio::test]
async fn spawned_run_reports_progress_then_finishes() {
    let birzha = orchestrator();
    let (handle, mut rx) = birzha
        .rates()
        .instruments(&[usd(), eur()])
        .unwrap()
        .date_range(range())
        .spawn()
        .unwrap();

    let mut fetched = Vec::new();
    let mut finished = None;
    while let Some(event) = rx.recv().await {
        match event {
            LoadEvent::Fetched { symbol, rows } => fetched.push((symbol, rows)),
            LoadEvent::Finished(result) => {
                finished = Some(result);
                break;
            }
        }
    }
    handle.join().await;

    // Instruments are processed in selection order.
    assert_eq!(
        fetched,
        vec![("USD".to_string(), 3), ("EUR".to_string(), 3)]
    );
    let table = finished.unwrap().unwrap();
    assert_eq!(table.len(), 4);
}
