//! Canonicalizer: header aliasing and three-stage type casting
//!
//! Turns a decoded [`RawTable`] into typed rows aligned to the schema's
//! column order. Header resolution is case-, punctuation-, and
//! year-prefix-insensitive against the contract's alias table; unmapped
//! headers are logged and counted, never silently dropped. Cast failures
//! become BLOCK findings attached to the row rather than hard errors, so a
//! single bad cell quarantines one row instead of aborting the parse.

pub mod aliases;
pub mod casting;

#[cfg(test)]
pub mod tests;

use crate::app::models::{CellValue, Finding, ParseMetrics, RawTable, TypedRow};
use crate::app::services::schema_registry::SchemaContract;
use crate::constants::{rules, sample_value};
use crate::{Error, Result};
use tracing::{debug, warn};

pub use aliases::{map_headers, normalize_header, HeaderMapping};

/// All rows after canonicalization, typed and schema-aligned
#[derive(Debug, Clone, Default)]
pub struct TypedTable {
    pub rows: Vec<TypedRow>,
}

/// Canonicalize a raw table against a schema contract
///
/// Fails with [`Error::SchemaRegression`] when the source headers cover
/// none of the schema's required columns, which signals contract-wide
/// header drift rather than a per-row data problem.
pub fn canonicalize(
    contract: &SchemaContract,
    table: &RawTable,
    metrics: &mut ParseMetrics,
) -> Result<TypedTable> {
    let mapping = map_headers(contract, &table.headers);

    let required_mapped = contract.columns.iter().enumerate().any(|(i, column)| {
        !column.nullable && mapping.source_for_column[i].is_some()
    });
    if !required_mapped {
        return Err(Error::schema_regression(
            &contract.dataset_name,
            format!(
                "None of the required columns map to the source headers {:?}",
                table.headers
            ),
        ));
    }

    for header in &mapping.unmapped {
        warn!(
            dataset = %contract.dataset_name,
            header = %header,
            "Source header has no canonical mapping"
        );
        metrics.record_guardrail(rules::UNMAPPED_HEADER, header.clone());
    }

    let mut rows = Vec::with_capacity(table.rows.len());
    for (input_index, source_row) in table.rows.iter().enumerate() {
        rows.push(canonicalize_row(
            contract,
            &mapping,
            input_index,
            source_row,
            metrics,
        ));
    }

    debug!(
        dataset = %contract.dataset_name,
        rows = rows.len(),
        unmapped_headers = mapping.unmapped.len(),
        "Canonicalization complete"
    );

    Ok(TypedTable { rows })
}

/// Canonicalize one source row into schema column order
fn canonicalize_row(
    contract: &SchemaContract,
    mapping: &HeaderMapping,
    input_index: usize,
    source_row: &[String],
    metrics: &mut ParseMetrics,
) -> TypedRow {
    let mut cells = Vec::with_capacity(contract.columns.len());
    let mut raw = Vec::with_capacity(contract.columns.len());
    let mut findings = Vec::new();

    for (column_index, column) in contract.columns.iter().enumerate() {
        let source_value = mapping.source_for_column[column_index]
            .and_then(|i| source_row.get(i))
            .map(String::as_str)
            .unwrap_or("");
        raw.push(source_value.to_string());

        // Stage 1: cleanup (trim, collapse internal whitespace, blank -> Null)
        let cleaned = match casting::clean_value(source_value) {
            Some(cleaned) => cleaned,
            None => {
                if !column.nullable {
                    findings.push(Finding::block(
                        rules::REQUIRED_VALUE,
                        format!(
                            "Required column '{}' is blank (raw value '{}')",
                            column.name,
                            sample_value(source_value)
                        ),
                        sample_value(source_value),
                    ));
                }
                cells.push(CellValue::Null);
                continue;
            }
        };

        // Allow-listed transforms run between cleanup and coercion
        let transformed = column
            .transforms
            .iter()
            .fold(cleaned, |value, transform| transform.apply(&value));

        // Stages 2 and 3: coercion and canonical quantization
        match casting::cast_value(&transformed, column) {
            Ok(cell) => cells.push(cell),
            Err(reason) => {
                let sample = sample_value(&transformed);
                findings.push(Finding::block(
                    rules::TYPE_COERCION,
                    format!(
                        "Column '{}' value '{sample}' is not a valid {}: {reason}",
                        column.name,
                        column.ctype.name()
                    ),
                    sample.clone(),
                ));
                metrics.record_guardrail(rules::cast_failure(&column.name), sample);
                cells.push(CellValue::Null);
            }
        }
    }

    TypedRow {
        input_index,
        cells,
        raw,
        findings,
    }
}
