//! Three-stage value casting
//!
//! Stage 1 cleans the raw string (trim, collapse internal whitespace,
//! blank -> missing). Stage 2 coerces to the schema-declared type. Stage 3
//! quantizes to the canonical form: decimals rescaled to the declared scale,
//! booleans through the explicit spelling enumeration, dates re-serialized
//! as `YYYY-MM-DD`. Failures return a reason string for the BLOCK finding;
//! they never panic and never abort the parse.

use crate::app::models::{CellValue, ColumnType};
use crate::app::services::schema_registry::ColumnSpec;
use crate::constants::{BOOLEAN_FALSE_VALUES, BOOLEAN_TRUE_VALUES, DATE_FORMATS};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Stage 1: clean a raw string value
///
/// Returns `None` for blank cells (the missing-value signal); otherwise the
/// trimmed value with internal whitespace runs collapsed to single spaces.
pub fn clean_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut cleaned = String::with_capacity(trimmed.len());
    let mut last_was_space = false;
    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                cleaned.push(' ');
                last_was_space = true;
            }
        } else {
            cleaned.push(ch);
            last_was_space = false;
        }
    }
    Some(cleaned)
}

/// Stages 2 and 3: coerce a cleaned string to the column's declared type
/// and quantize to canonical form
pub fn cast_value(cleaned: &str, column: &ColumnSpec) -> Result<CellValue, String> {
    match column.ctype {
        ColumnType::Text => Ok(CellValue::Text(cleaned.to_string())),
        ColumnType::Integer => cast_integer(cleaned),
        ColumnType::Decimal { scale } => cast_decimal(cleaned, scale),
        ColumnType::Boolean => cast_boolean(cleaned),
        ColumnType::Date => cast_date(cleaned),
    }
}

fn cast_integer(cleaned: &str) -> Result<CellValue, String> {
    cleaned
        .parse::<i64>()
        .map(CellValue::Integer)
        .map_err(|_| "not a whole number".to_string())
}

fn cast_decimal(cleaned: &str, scale: u32) -> Result<CellValue, String> {
    let mut value =
        Decimal::from_str(cleaned).map_err(|_| "not a decimal number".to_string())?;
    // Quantize to the declared scale so equal quantities hash identically.
    // Midpoints round away from zero, not to even.
    if value.scale() > scale {
        value = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    }
    value.rescale(scale);
    Ok(CellValue::Decimal(value))
}

fn cast_boolean(cleaned: &str) -> Result<CellValue, String> {
    let upper = cleaned.to_ascii_uppercase();
    if BOOLEAN_TRUE_VALUES.contains(&upper.as_str()) {
        Ok(CellValue::Boolean(true))
    } else if BOOLEAN_FALSE_VALUES.contains(&upper.as_str()) {
        Ok(CellValue::Boolean(false))
    } else {
        Err(format!(
            "not one of the accepted boolean spellings {BOOLEAN_TRUE_VALUES:?}/{BOOLEAN_FALSE_VALUES:?}"
        ))
    }
}

fn cast_date(cleaned: &str) -> Result<CellValue, String> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, format) {
            return Ok(CellValue::Date(date));
        }
    }
    Err(format!("matched none of the date formats {DATE_FORMATS:?}"))
}
