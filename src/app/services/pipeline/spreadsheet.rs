//! Spreadsheet decode stage
//!
//! Workbooks (xlsx and legacy xls) are read with calamine from an in-memory
//! cursor. The first row of the first sheet supplies the headers. Binary
//! containers have no text encoding to detect, so the metrics record the
//! `binary` label with no fallback.

use crate::app::models::{ParseMetrics, RawTable};
use crate::constants::{encodings, CANONICAL_DATE_FORMAT};
use crate::{Error, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use tracing::debug;

/// Decode workbook bytes into a raw table
pub fn decode(bytes: &[u8], filename: &str, metrics: &mut ParseMetrics) -> Result<RawTable> {
    metrics.encoding_detected = encodings::BINARY.to_string();
    metrics.encoding_fallback = false;

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| Error::parse(filename, format!("Unreadable workbook: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::parse(filename, "Workbook has no sheets"))?;

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        Error::parse(filename, format!("Failed to read sheet '{sheet_name}': {e}"))
    })?;

    let mut row_iter = range.rows();
    let headers: Vec<String> = row_iter
        .next()
        .ok_or_else(|| Error::parse(filename, format!("Sheet '{sheet_name}' is empty")))?
        .iter()
        .map(cell_to_string)
        .collect();

    let rows: Vec<Vec<String>> = row_iter
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>())
        .filter(|row| row.iter().any(|v| !v.is_empty()))
        .collect();

    debug!(
        filename = %filename,
        sheet = %sheet_name,
        rows = rows.len(),
        "Spreadsheet decode complete"
    );

    Ok(RawTable { headers, rows })
}

/// Render one workbook cell as the string the canonicalizer will cast
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Excel stores integers as floats; render them without the .0
            if f.fract() == 0.0 && f.abs() < 9.0e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => if *b { "Y" } else { "N" }.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format(CANONICAL_DATE_FORMAT).to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{e:?}"),
    }
}
