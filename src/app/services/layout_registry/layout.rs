//! Fixed-width layout types, span decoding, and the schema coverage guard
//!
//! A layout declares the character spans of each column for one dataset and
//! period. Spans use half-open `[start, end)` intervals: `end` is always
//! exclusive, columns are sorted by `start`, and no two spans overlap. The
//! header/data boundary is located dynamically by `data_start_pattern`
//! because publishers change header row counts between releases without
//! notice — never by a fixed row-count skip.

use crate::app::models::{ColumnType, RawTable};
use crate::app::services::schema_registry::SchemaContract;
use crate::{Error, Result};
use regex::Regex;
use tracing::debug;

/// One fixed-width column span
#[derive(Debug, Clone)]
pub struct LayoutColumn {
    /// Column name (run through the alias table like any other header)
    pub name: String,

    /// Zero-based start offset, inclusive
    pub start: usize,

    /// Zero-based end offset, exclusive
    pub end: usize,

    /// Declared type (diagnostic only; casting follows the schema contract)
    pub ctype: ColumnType,

    /// Whether blank values are permitted
    pub nullable: bool,
}

/// Versioned fixed-width layout for one dataset/period
#[derive(Debug, Clone)]
pub struct Layout {
    /// Layout version string (`YEAR.QUARTER.PATCH`)
    pub version: String,

    /// Minimum character length of a data line; shorter lines after the
    /// data boundary are trailers, not data
    pub min_line_length: usize,

    /// Pattern identifying the first data row
    pub data_start_pattern: Regex,

    /// Column spans sorted by `start`
    pub columns: Vec<LayoutColumn>,
}

/// Outcome of one fixed-width decode
#[derive(Debug)]
pub struct FixedWidthDecode {
    /// Decoded rows keyed by the layout's column names
    pub table: RawTable,

    /// Lines after the data boundary skipped as trailers (shorter than
    /// `min_line_length`)
    pub short_lines_skipped: Vec<String>,
}

impl Layout {
    /// Validate span invariants; invoked by the loader after decode
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::invalid_layout(name, "Layout declares no columns"));
        }

        let mut previous_end = 0usize;
        let mut previous_name = "";
        for (i, column) in self.columns.iter().enumerate() {
            if column.end <= column.start {
                return Err(Error::invalid_layout(
                    name,
                    format!(
                        "Column '{}' has empty or inverted span [{}, {})",
                        column.name, column.start, column.end
                    ),
                ));
            }
            if i > 0 {
                if column.start < previous_end {
                    return Err(Error::invalid_layout(
                        name,
                        format!(
                            "Column '{}' span [{}, {}) overlaps '{}' ending at {}",
                            column.name, column.start, column.end, previous_name, previous_end
                        ),
                    ));
                }
            }
            previous_end = column.end;
            previous_name = &column.name;
        }

        validate_layout_version(&self.version, name)?;
        Ok(())
    }

    /// Decode the data section of a fixed-width file
    ///
    /// Locates the first line matching `data_start_pattern`, then slices
    /// every subsequent line by the column spans. Lines shorter than
    /// `min_line_length` are skipped as trailers and reported back. A file
    /// with no data boundary is a layout mismatch carrying a sample line.
    pub fn decode(&self, text: &str, dataset: &str) -> Result<FixedWidthDecode> {
        let lines: Vec<&str> = text.lines().collect();

        let data_start = lines
            .iter()
            .position(|line| self.data_start_pattern.is_match(line))
            .ok_or_else(|| {
                let sample = lines.first().copied().unwrap_or_default();
                Error::layout_mismatch(
                    dataset,
                    vec![],
                    format!(
                        "no line matched data start pattern '{}'; first line: '{}'",
                        self.data_start_pattern.as_str(),
                        crate::constants::sample_value(sample)
                    ),
                )
            })?;

        let headers: Vec<String> = self.columns.iter().map(|c| c.name.clone()).collect();
        let mut rows = Vec::new();
        let mut short_lines_skipped = Vec::new();

        for line in &lines[data_start..] {
            if line.trim().is_empty() {
                continue;
            }
            let chars: Vec<char> = line.chars().collect();
            if chars.len() < self.min_line_length {
                short_lines_skipped.push(crate::constants::sample_value(line));
                continue;
            }
            rows.push(self.decode_line(&chars));
        }

        debug!(
            rows = rows.len(),
            skipped = short_lines_skipped.len(),
            data_start_line = data_start,
            "Fixed-width decode complete"
        );

        Ok(FixedWidthDecode {
            table: RawTable { headers, rows },
            short_lines_skipped,
        })
    }

    /// Slice one line by the column spans
    ///
    /// `end` is exclusive, so a character at offset `end - 1` belongs to
    /// this column and the character at `end` to the next. Spans past the
    /// end of the line decode to empty strings.
    fn decode_line(&self, chars: &[char]) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| {
                let start = column.start.min(chars.len());
                let end = column.end.min(chars.len());
                chars[start..end].iter().collect::<String>()
            })
            .collect()
    }

    /// Layout column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Verify a layout covers the schema's required columns
///
/// Invoked after every fixed-width decode, before the pipeline returns:
/// the set of schema-required (non-nullable) columns must be a subset of
/// the layout's declared columns. Violations carry the missing-column set
/// and a sample decoded row for diagnosis.
pub fn check_schema_coverage(
    layout: &Layout,
    schema: &SchemaContract,
    dataset: &str,
    sample_row: Option<&[String]>,
) -> Result<()> {
    let layout_columns: std::collections::HashSet<&str> =
        layout.columns.iter().map(|c| c.name.as_str()).collect();

    let missing: Vec<String> = schema
        .required_columns()
        .into_iter()
        .filter(|name| !layout_columns.contains(name))
        .map(String::from)
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    let sample = sample_row
        .map(|row| row.join("|"))
        .unwrap_or_else(|| "<no data rows decoded>".to_string());
    Err(Error::layout_mismatch(
        dataset,
        missing,
        crate::constants::sample_value(&sample),
    ))
}

/// Layout versions are `YEAR.QUARTER.PATCH` (e.g. `2024.1.0`)
fn validate_layout_version(version: &str, name: &str) -> Result<()> {
    let parts: Vec<&str> = version.split('.').collect();
    let valid = parts.len() == 3
        && parts[0].len() == 4
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_layout(
            name,
            format!("Version '{version}' is not YEAR.QUARTER.PATCH"),
        ))
    }
}
