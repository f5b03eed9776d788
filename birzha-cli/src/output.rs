//! Plain-text rendering of combined tables.

use birzha::{CandleTable, RateTable};

fn num(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

pub fn render_rates(table: &RateTable) {
    print!("{:<12}", "Date");
    for column in &table.columns {
        print!(" {column:>14}");
    }
    println!();
    for row in &table.rows {
        print!("{:<12}", row.date.format("%Y-%m-%d"));
        for cell in &row.values {
            match cell {
                Some(value) => print!(" {value:>14.6}"),
                None => print!(" {:>14}", ""),
            }
        }
        println!();
    }
    println!("{} rows", table.len());
}

pub fn render_candles(table: &CandleTable) {
    println!(
        "{:<20} {:<12} {:>12} {:>12} {:>12} {:>12} {:>16} {:>12}",
        "datetime", "SECID", "open", "high", "low", "close", "value", "volume"
    );
    for row in &table.rows {
        let candle = &row.candle;
        println!(
            "{:<20} {:<12} {:>12} {:>12} {:>12} {:>12} {:>16} {:>12}",
            candle.begin.format("%Y-%m-%d %H:%M:%S"),
            row.secid,
            num(candle.open),
            num(candle.high),
            num(candle.low),
            num(candle.close),
            num(candle.value),
            num(candle.volume),
        );
    }
    println!("{} rows", table.len());
}
