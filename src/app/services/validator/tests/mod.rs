//! Shared test fixtures for validator tests


use crate::app::models::{ParseMetrics, RawTable};
use crate::app::services::canonicalizer::{canonicalize, TypedTable};
use crate::app::services::schema_registry::tests::premium_contract;
use crate::app::services::schema_registry::SchemaContract;

/// Canonical headers for the premium fixture contract
pub fn premium_headers() -> Vec<String> {
    premium_contract().column_names()
}

/// Build a typed table from raw row values aligned to the canonical headers
pub fn typed_table(contract: &SchemaContract, rows: &[[&str; 6]]) -> TypedTable {
    let table = RawTable {
        headers: premium_headers(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect(),
    };
    let mut metrics = ParseMetrics::default();
    canonicalize(contract, &table, &mut metrics).unwrap()
}

/// A well-formed premium row with overridable key columns and premium
pub fn premium_row<'a>(state: &'a str, plan: &'a str, premium: &'a str) -> [&'a str; 6] {
    [state, plan, premium, "1200", "2024-01-01", "Y"]
}
