use birzha_core::connector::CandleHistoryProvider;
use birzha_core::{BirzhaError, DateRange, FetchInterval, Instrument};
use birzha_moex::MoexConnector;
use httpmock::prelude::*;

fn cny() -> Instrument {
    Instrument::pair("CNYRUB_TOM", "CNY/RUB TOM")
}

fn range() -> DateRange {
    DateRange::parse("15/01/2024", "16/01/2024").unwrap()
}

fn page_body(rows: &[(&str, f64)]) -> String {
    let data: Vec<String> = rows
        .iter()
        .map(|(begin, px)| format!(r#"["{begin}",{px},{px},{px},{px},100.0,10]"#))
        .collect();
    format!(
        r#"{{"candles":{{"columns":["begin","open","high","low","close","value","volume"],"data":[{}]}}}}"#,
        data.join(",")
    )
}

#[tokio::test]
async fn follows_the_offset_cursor_until_an_empty_page() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/securities/CNYRUB_TOM/candles.json")
                .query_param("interval", "1")
                .query_param("iss.only", "candles")
                .query_param("from", "2024-01-15")
                .query_param("till", "2024-01-16")
                .query_param("start", "0");
            then.status(200).body(page_body(&[
                ("2024-01-15 10:00:00", 12.50),
                ("2024-01-15 10:01:00", 12.51),
            ]));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/securities/CNYRUB_TOM/candles.json")
                .query_param("start", "2");
            then.status(200)
                .body(page_body(&[("2024-01-15 10:02:00", 12.52)]));
        })
        .await;
    let last = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/securities/CNYRUB_TOM/candles.json")
                .query_param("start", "3");
            then.status(200).body(page_body(&[]));
        })
        .await;

    let connector = MoexConnector::with_base_url(server.base_url());
    let rows = connector
        .candle_history(&cny(), &range(), FetchInterval::Min1)
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    last.assert_async().await;
    assert_eq!(rows.len(), 3);
    // Pages concatenated in request order.
    assert_eq!(rows[0].begin, "2024-01-15 10:00:00");
    assert_eq!(rows[2].begin, "2024-01-15 10:02:00");
    assert_eq!(rows[2].open, Some(12.52));
}

#[tokio::test]
async fn empty_first_page_yields_no_rows() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/securities/CNYRUB_TOM/candles.json");
            then.status(200).body(page_body(&[]));
        })
        .await;

    let connector = MoexConnector::with_base_url(server.base_url());
    let rows = connector
        .candle_history(&cny(), &range(), FetchInterval::Hour1)
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn non_success_status_aborts_without_partial_pages() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/securities/CNYRUB_TOM/candles.json")
                .query_param("start", "0");
            then.status(200)
                .body(page_body(&[("2024-01-15 10:00:00", 12.50)]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/securities/CNYRUB_TOM/candles.json")
                .query_param("start", "1");
            then.status(500).body("boom");
        })
        .await;

    let connector = MoexConnector::with_base_url(server.base_url());
    let err = connector
        .candle_history(&cny(), &range(), FetchInterval::Min1)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BirzhaError::Status {
            connector: "birzha-moex".into(),
            status: 500,
        }
    );
}

#[tokio::test]
async fn daily_interval_goes_on_the_wire_as_24() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/securities/CNYRUB_TOM/candles.json")
                .query_param("interval", "24");
            then.status(200).body(page_body(&[]));
        })
        .await;

    let connector = MoexConnector::with_base_url(server.base_url());
    connector
        .candle_history(&cny(), &range(), FetchInterval::Day1)
        .await
        .unwrap();
    mock.assert_async().await;
}
