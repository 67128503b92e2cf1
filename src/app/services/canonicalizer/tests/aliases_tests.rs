//! Tests for header normalization and alias resolution

use crate::app::services::canonicalizer::{map_headers, normalize_header};
use crate::app::services::schema_registry::tests::premium_contract;

#[test]
fn test_normalize_lowercases_and_collapses_punctuation() {
    assert_eq!(normalize_header("State Code"), "state_code");
    assert_eq!(normalize_header("Contract-Plan ID"), "contract_plan_id");
    assert_eq!(normalize_header("  premium  (monthly)  "), "premium_monthly");
}

#[test]
fn test_normalize_strips_year_prefix() {
    assert_eq!(normalize_header("2024 Premium"), "premium");
    assert_eq!(normalize_header("2024_state_code"), "state_code");
    // Non-year numeric prefixes survive
    assert_eq!(normalize_header("123 Premium"), "123_premium");
}

#[test]
fn test_normalize_trims_edge_underscores() {
    assert_eq!(normalize_header("__premium__"), "premium");
    assert_eq!(normalize_header("***"), "");
}

#[test]
fn test_exact_canonical_names_map() {
    let contract = premium_contract();
    let headers = vec!["state_code".to_string(), "plan_id".to_string()];
    let mapping = map_headers(&contract, &headers);
    assert_eq!(mapping.source_for_column[0], Some(0));
    assert_eq!(mapping.source_for_column[1], Some(1));
    assert!(mapping.unmapped.is_empty());
}

#[test]
fn test_aliases_map_through_normalization() {
    let contract = premium_contract();
    let headers = vec![
        "ST_CD".to_string(),
        "Contract-Plan ID".to_string(),
        "MONTHLY PREMIUM".to_string(),
    ];
    let mapping = map_headers(&contract, &headers);
    assert_eq!(mapping.source_for_column[0], Some(0));
    assert_eq!(mapping.source_for_column[1], Some(1));
    assert_eq!(mapping.source_for_column[2], Some(2));
}

#[test]
fn test_year_prefixed_alias_maps() {
    let contract = premium_contract();
    // The alias table lists "2024 State"; a later release shifts the year
    let headers = vec!["2025 State".to_string()];
    let mapping = map_headers(&contract, &headers);
    assert_eq!(mapping.source_for_column[0], Some(0));
}

#[test]
fn test_unknown_headers_surface_as_unmapped() {
    let contract = premium_contract();
    let headers = vec!["state_code".to_string(), "secret_sauce".to_string()];
    let mapping = map_headers(&contract, &headers);
    assert_eq!(mapping.unmapped, vec!["secret_sauce".to_string()]);
}

#[test]
fn test_repeated_header_first_occurrence_wins() {
    let contract = premium_contract();
    let headers = vec!["state_code".to_string(), "State Code".to_string()];
    let mapping = map_headers(&contract, &headers);
    assert_eq!(mapping.source_for_column[0], Some(0));
    assert!(mapping.unmapped.is_empty());
}
