//! Header normalization and alias resolution
//!
//! Source headers drift across release periods: casing changes, spacing and
//! punctuation vary, and some releases prefix column names with the product
//! year. Resolution normalizes both sides and consults the contract's
//! per-dataset alias table, so a header matches when it normalizes to a
//! canonical column name or to any declared alias of one.

use crate::app::services::schema_registry::SchemaContract;
use std::collections::HashMap;

/// Resolution of source headers against a contract
#[derive(Debug, Clone)]
pub struct HeaderMapping {
    /// For each schema column (in declared order), the index of the source
    /// header that supplies it, if any
    pub source_for_column: Vec<Option<usize>>,

    /// Source headers that resolved to no canonical column, in source order
    pub unmapped: Vec<String>,
}

/// Normalize a header for alias lookup
///
/// Lowercases, collapses every run of non-alphanumeric characters to a
/// single underscore, trims leading/trailing underscores, and strips a
/// leading four-digit-year prefix ("2024_premium" -> "premium").
pub fn normalize_header(header: &str) -> String {
    let mut normalized = String::with_capacity(header.len());
    let mut last_was_separator = true;
    for ch in header.chars() {
        if ch.is_alphanumeric() {
            normalized.extend(ch.to_lowercase());
            last_was_separator = false;
        } else if !last_was_separator {
            normalized.push('_');
            last_was_separator = true;
        }
    }
    while normalized.ends_with('_') {
        normalized.pop();
    }

    strip_year_prefix(&normalized).to_string()
}

/// Strip a leading "YYYY_" product-year prefix when one is present
fn strip_year_prefix(normalized: &str) -> &str {
    if normalized.len() > 5 && normalized.as_bytes()[4] == b'_' {
        let (prefix, rest) = normalized.split_at(5);
        if prefix[..4].bytes().all(|b| b.is_ascii_digit()) {
            return rest;
        }
    }
    normalized
}

/// Resolve source headers against a contract's columns and alias table
pub fn map_headers(contract: &SchemaContract, headers: &[String]) -> HeaderMapping {
    // normalized form -> canonical column index
    let mut lookup: HashMap<String, usize> = HashMap::new();
    for (index, column) in contract.columns.iter().enumerate() {
        lookup.insert(normalize_header(&column.name), index);
    }
    for (canonical, variants) in &contract.column_aliases {
        if let Some(&index) = lookup.get(&normalize_header(canonical)) {
            for variant in variants {
                lookup.insert(normalize_header(variant), index);
            }
        }
    }

    let mut source_for_column: Vec<Option<usize>> = vec![None; contract.columns.len()];
    let mut unmapped = Vec::new();

    for (source_index, header) in headers.iter().enumerate() {
        match lookup.get(&normalize_header(header)) {
            // First source occurrence wins when a file repeats a header
            Some(&column_index) if source_for_column[column_index].is_none() => {
                source_for_column[column_index] = Some(source_index);
            }
            Some(_) => {}
            None => unmapped.push(header.clone()),
        }
    }

    HeaderMapping {
        source_for_column,
        unmapped,
    }
}
