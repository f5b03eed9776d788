//! Spreadsheet export for combined tables.
//!
//! One sheet for the combined result; the candle workbook additionally gets
//! one sheet per instrument. Numeric cells are rounded to six decimal
//! places and column widths are sized to content, capped at 50 characters.

use std::path::Path;

use birzha_core::{BirzhaError, Candle, CandleTable, RateTable};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

const MAX_COLUMN_WIDTH: usize = 50;
const NUMBER_FORMAT: &str = "0.000000";
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const CANDLE_HEADERS: [&str; 6] = ["open", "high", "low", "close", "value", "volume"];
const SHEET_NAME_LIMIT: usize = 31;

fn export_err(e: XlsxError) -> BirzhaError {
    BirzhaError::Export(e.to_string())
}

fn col(index: usize) -> Result<u16, BirzhaError> {
    u16::try_from(index).map_err(|_| BirzhaError::Export("too many columns".into()))
}

fn row(index: usize) -> Result<u32, BirzhaError> {
    u32::try_from(index).map_err(|_| BirzhaError::Export("too many rows".into()))
}

/// Track the widest cell per column while rows are written.
struct Widths(Vec<usize>);

impl Widths {
    fn new(headers: &[&str]) -> Self {
        Self(headers.iter().map(|h| h.len()).collect())
    }

    fn observe(&mut self, index: usize, text_len: usize) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = (*slot).max(text_len);
        }
    }

    fn apply(&self, sheet: &mut Worksheet) -> Result<(), BirzhaError> {
        for (index, width) in self.0.iter().enumerate() {
            let clamped = (*width + 2).min(MAX_COLUMN_WIDTH);
            sheet
                .set_column_width(col(index)?, clamped as f64)
                .map_err(export_err)?;
        }
        Ok(())
    }
}

/// Write the combined rate table to `path` as a single-sheet workbook.
///
/// # Errors
/// Returns `BirzhaError::Export` when the workbook cannot be assembled or
/// saved.
pub fn write_rates(table: &RateTable, path: &Path) -> Result<(), BirzhaError> {
    let mut workbook = Workbook::new();
    let number = Format::new().set_num_format(NUMBER_FORMAT);
    let sheet = workbook.add_worksheet();
    sheet.set_name("rates").map_err(export_err)?;

    let mut headers = vec!["Date"];
    headers.extend(table.columns.iter().map(String::as_str));
    let mut widths = Widths::new(&headers);
    for (index, header) in headers.iter().enumerate() {
        sheet
            .write_string(0, col(index)?, *header)
            .map_err(export_err)?;
    }

    for (row_index, table_row) in table.rows.iter().enumerate() {
        let r = row(row_index + 1)?;
        let date = table_row.date.format(DATE_FORMAT).to_string();
        widths.observe(0, date.len());
        sheet.write_string(r, 0, &date).map_err(export_err)?;
        for (value_index, cell) in table_row.values.iter().enumerate() {
            let Some(value) = cell else {
                continue;
            };
            let rounded = value.round_dp(6);
            let as_f64 = rounded.to_f64().unwrap_or_default();
            widths.observe(value_index + 1, format!("{as_f64:.6}").len());
            sheet
                .write_number_with_format(r, col(value_index + 1)?, as_f64, &number)
                .map_err(export_err)?;
        }
    }

    widths.apply(sheet)?;
    workbook.save(path).map_err(export_err)?;
    tracing::info!(path = %path.display(), rows = table.len(), "rates exported");
    Ok(())
}

fn write_candle_cells(
    sheet: &mut Worksheet,
    r: u32,
    start: usize,
    candle: &Candle,
    number: &Format,
    widths: &mut Widths,
) -> Result<(), BirzhaError> {
    let fields = [
        candle.open,
        candle.high,
        candle.low,
        candle.close,
        candle.value,
        candle.volume,
    ];
    for (offset, field) in fields.iter().enumerate() {
        let Some(value) = field else {
            continue;
        };
        let rounded = (value * 1e6).round() / 1e6;
        widths.observe(start + offset, format!("{rounded:.6}").len());
        sheet
            .write_number_with_format(r, col(start + offset)?, rounded, number)
            .map_err(export_err)?;
    }
    Ok(())
}

fn write_candle_sheet(
    sheet: &mut Worksheet,
    name: &str,
    rows: &[(Option<&str>, &Candle)],
    number: &Format,
) -> Result<(), BirzhaError> {
    let truncated: String = name.chars().take(SHEET_NAME_LIMIT).collect();
    sheet.set_name(&truncated).map_err(export_err)?;

    let with_secid = rows.iter().any(|(secid, _)| secid.is_some());
    let mut headers = vec!["datetime"];
    if with_secid {
        headers.push("SECID");
    }
    headers.extend(CANDLE_HEADERS);
    let mut widths = Widths::new(&headers);
    for (index, header) in headers.iter().enumerate() {
        sheet
            .write_string(0, col(index)?, *header)
            .map_err(export_err)?;
    }

    for (row_index, (secid, candle)) in rows.iter().enumerate() {
        let r = row(row_index + 1)?;
        let begin = candle.begin.format(DATETIME_FORMAT).to_string();
        widths.observe(0, begin.len());
        sheet.write_string(r, 0, &begin).map_err(export_err)?;
        let mut start = 1;
        if with_secid {
            if let Some(secid) = secid {
                widths.observe(1, secid.len());
                sheet.write_string(r, 1, *secid).map_err(export_err)?;
            }
            start = 2;
        }
        write_candle_cells(sheet, r, start, candle, number, &mut widths)?;
    }

    widths.apply(sheet)
}

/// Write the combined candle table to `path`: an `ALL` sheet with every row
/// plus one sheet per instrument with that instrument's own series.
///
/// # Errors
/// Returns `BirzhaError::Export` when the workbook cannot be assembled or
/// saved.
pub fn write_candles(table: &CandleTable, path: &Path) -> Result<(), BirzhaError> {
    let mut workbook = Workbook::new();
    let number = Format::new().set_num_format(NUMBER_FORMAT);

    let all_rows: Vec<(Option<&str>, &Candle)> = table
        .rows
        .iter()
        .map(|row| (Some(row.secid.as_str()), &row.candle))
        .collect();
    write_candle_sheet(workbook.add_worksheet(), "ALL", &all_rows, &number)?;

    for (instrument, candles) in &table.per_instrument {
        let rows: Vec<(Option<&str>, &Candle)> = candles.iter().map(|c| (None, c)).collect();
        write_candle_sheet(workbook.add_worksheet(), instrument.code(), &rows, &number)?;
    }

    workbook.save(path).map_err(export_err)?;
    tracing::info!(path = %path.display(), rows = table.len(), "candles exported");
    Ok(())
}
