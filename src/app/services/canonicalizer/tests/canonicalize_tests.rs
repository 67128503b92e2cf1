//! Tests for full-table canonicalization

use super::premium_raw_table;
use crate::app::models::{CellValue, ParseMetrics, RawTable};
use crate::app::services::canonicalizer::canonicalize;
use crate::app::services::schema_registry::tests::premium_contract;
use crate::constants::rules;
use crate::Error;

#[test]
fn test_rows_align_to_schema_column_order() {
    let contract = premium_contract();
    let mut metrics = ParseMetrics::default();
    let typed = canonicalize(&contract, &premium_raw_table(), &mut metrics).unwrap();

    assert_eq!(typed.rows.len(), 2);
    let first = &typed.rows[0];
    assert_eq!(first.input_index, 0);
    assert_eq!(first.cells.len(), 6);
    assert_eq!(first.cells[0], CellValue::Text("01".to_string()));
    assert_eq!(first.cells[1], CellValue::Text("H1000-001".to_string()));
    assert_eq!(first.cells[2].canonical_string(), "12.50");
    assert_eq!(first.cells[3], CellValue::Integer(1200));
    assert_eq!(first.cells[5], CellValue::Boolean(true));
    assert!(first.findings.is_empty());
}

#[test]
fn test_zero_pad_transform_runs_before_coercion() {
    let contract = premium_contract();
    let mut metrics = ParseMetrics::default();
    let typed = canonicalize(&contract, &premium_raw_table(), &mut metrics).unwrap();

    // Second row carries state "2"; the contract zero-pads state_code to 2
    assert_eq!(typed.rows[1].cells[0], CellValue::Text("02".to_string()));
}

#[test]
fn test_nullable_blank_becomes_null_without_findings() {
    let contract = premium_contract();
    let mut metrics = ParseMetrics::default();
    let typed = canonicalize(&contract, &premium_raw_table(), &mut metrics).unwrap();

    assert_eq!(typed.rows[1].cells[3], CellValue::Null);
    assert!(typed.rows[1].findings.is_empty());
}

#[test]
fn test_required_blank_is_a_block_finding() {
    let contract = premium_contract();
    let mut metrics = ParseMetrics::default();
    let mut table = premium_raw_table();
    table.rows[0][1] = String::new();

    let typed = canonicalize(&contract, &table, &mut metrics).unwrap();
    let row = &typed.rows[0];
    assert!(row.is_blocked());
    let finding = row.first_block().unwrap();
    assert_eq!(finding.rule, rules::REQUIRED_VALUE);
    assert!(finding.message.contains("plan_id"));
}

#[test]
fn test_cast_failure_blocks_row_and_samples_guardrail() {
    let contract = premium_contract();
    let mut metrics = ParseMetrics::default();
    let mut table = premium_raw_table();
    table.rows[0][2] = "$12.50".to_string();

    let typed = canonicalize(&contract, &table, &mut metrics).unwrap();
    let row = &typed.rows[0];
    assert!(row.is_blocked());
    let finding = row.first_block().unwrap();
    assert_eq!(finding.rule, rules::TYPE_COERCION);
    assert!(finding.message.contains("$12.50"));

    let warning = &metrics.guardrail_warnings[&rules::cast_failure("premium")];
    assert_eq!(warning.count, 1);
    assert_eq!(warning.examples, vec!["$12.50".to_string()]);
}

#[test]
fn test_unmapped_header_is_a_guardrail_not_an_error() {
    let contract = premium_contract();
    let mut metrics = ParseMetrics::default();
    canonicalize(&contract, &premium_raw_table(), &mut metrics).unwrap();

    let warning = &metrics.guardrail_warnings[rules::UNMAPPED_HEADER];
    assert_eq!(warning.count, 1);
    assert_eq!(warning.examples, vec!["internal_note".to_string()]);
}

#[test]
fn test_no_required_headers_is_schema_regression() {
    let contract = premium_contract();
    let mut metrics = ParseMetrics::default();
    let table = RawTable {
        headers: vec!["alpha".to_string(), "beta".to_string()],
        rows: vec![vec!["1".to_string(), "2".to_string()]],
    };

    let err = canonicalize(&contract, &table, &mut metrics).unwrap_err();
    assert!(matches!(err, Error::SchemaRegression { .. }));
}

#[test]
fn test_raw_values_preserved_for_reject_diagnostics() {
    let contract = premium_contract();
    let mut metrics = ParseMetrics::default();
    let mut table = premium_raw_table();
    table.rows[0][2] = "  12.5  ".to_string();

    let typed = canonicalize(&contract, &table, &mut metrics).unwrap();
    // Raw keeps the source text before cleanup
    assert_eq!(typed.rows[0].raw[2], "  12.5  ");
    assert_eq!(typed.rows[0].cells[2].canonical_string(), "12.50");
}
