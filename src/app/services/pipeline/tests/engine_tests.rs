//! End-to-end tests for the parser pipeline

use super::{premium_engine, premium_run};
use crate::app::services::format_router::tests::build_zip;
use crate::app::services::layout_registry::tests::premium_fixed_width_content;
use crate::constants::{rules, ROW_HASH_HEX_LEN};
use crate::Error;

#[test]
fn test_fixed_width_end_to_end() {
    let engine = premium_engine();
    let content = premium_fixed_width_content();

    let result = engine
        .parse(content.as_bytes(), "premiums_2024_q1.txt", &premium_run())
        .unwrap();

    assert_eq!(result.metrics.total_rows, 3);
    assert_eq!(result.data.len(), 3);
    assert!(result.rejects.is_empty());
    assert_eq!(result.metrics.encoding_detected, "utf-8");
    assert!(!result.metrics.encoding_fallback);

    // Sorted by (state_code, plan_id)
    let states: Vec<String> = result
        .data
        .iter()
        .map(|r| r.values[0].canonical_string())
        .collect();
    assert_eq!(states, vec!["01", "06", "48"]);
    assert_eq!(result.data[0].row_content_hash.len(), ROW_HASH_HEX_LEN);

    // The EOF trailer surfaced as a guardrail, not a reject
    let warning = &result.metrics.guardrail_warnings[rules::SHORT_LINE_SKIPPED];
    assert_eq!(warning.count, 1);
    assert!(warning.examples[0].contains("EOF"));
}

#[test]
fn test_delimited_end_to_end() {
    let engine = premium_engine();
    let content = "State Code,Plan ID,Monthly Premium,enrollment,effective_date,snp_flag\n\
                   01,H1000-001,12.50,1200,2024-01-01,Y\n\
                   06,H2000-001,99.99,80,,N\n";

    let result = engine
        .parse(content.as_bytes(), "premiums_2024_q1.csv", &premium_run())
        .unwrap();

    assert_eq!(result.data.len(), 2);
    assert_eq!(result.data[0].values[1].canonical_string(), "H1000-001");
    assert_eq!(result.data[0].values[2].canonical_string(), "12.50");
}

#[test]
fn test_delimited_doubled_quotes_unescape() {
    use crate::app::models::ParseMetrics;
    use crate::app::services::pipeline::delimited;

    let content = "plan_id,plan_name\n\
                   H1000-001,\"the \"\"best\"\" plan\"\n";
    let mut metrics = ParseMetrics::default();
    let table = delimited::decode(content.as_bytes(), "names.csv", &mut metrics).unwrap();

    assert_eq!(table.rows[0][1], "the \"best\" plan");
}

#[test]
fn test_txt_with_delimited_content_falls_back() {
    let engine = premium_engine();
    // The layout exists for this dataset so routing says fixed-width, but
    // the content is a plain CSV with no fixed-width data boundary
    let content = "state_code,plan_id,premium,enrollment,effective_date,snp_flag\n\
                   aa,H1000-001,12.50,1200,2024-01-01,Y\n";

    let result = engine
        .parse(content.as_bytes(), "premiums_2024_q1.txt", &premium_run())
        .unwrap();

    assert_eq!(result.metrics.total_rows, 1);
    // "aa" fails the state pattern, proving the delimited path ran fully
    assert_eq!(result.rejects.len(), 1);
    assert_eq!(result.rejects[0].validation_rule, rules::PATTERN_MISMATCH);
}

#[test]
fn test_archive_members_merge_and_resort() {
    let engine = premium_engine();
    // Members deliberately ordered so the merged set needs a re-sort
    let member_b = "state_code,plan_id,premium\n48,H3000-001,150.00\n";
    let member_a = "state_code,plan_id,premium\n01,H1000-001,12.50\n";
    let zip = build_zip(&[
        ("premiums_2024_b.csv", member_b.as_bytes()),
        ("premiums_2024_a.csv", member_a.as_bytes()),
    ]);

    let result = engine
        .parse(&zip, "premiums_2024_q1.zip", &premium_run())
        .unwrap();

    assert_eq!(result.metrics.total_rows, 2);
    assert_eq!(result.data.len(), 2);
    let states: Vec<String> = result
        .data
        .iter()
        .map(|r| r.values[0].canonical_string())
        .collect();
    assert_eq!(states, vec!["01", "48"]);
}

#[test]
fn test_archive_encoding_metrics_merge() {
    let engine = premium_engine();
    let utf8_member = "state_code,plan_id,premium\n01,H1000-001,12.50\n";
    // 0xE9 makes this member invalid UTF-8 but valid CP1252
    let cp1252_member = b"state_code,plan_id,premium\n06,caf\xE9-plan,99.99\n".to_vec();
    let zip = build_zip(&[
        ("premiums_2024_a.csv", utf8_member.as_bytes()),
        ("premiums_2024_b.csv", &cp1252_member),
    ]);

    let result = engine
        .parse(&zip, "premiums_2024_q1.zip", &premium_run())
        .unwrap();

    assert_eq!(result.metrics.encoding_detected, "mixed");
    assert!(result.metrics.encoding_fallback);
}

#[test]
fn test_zero_data_rows_is_fatal() {
    let engine = premium_engine();
    let content = "state_code,plan_id,premium\n";

    let err = engine
        .parse(content.as_bytes(), "premiums_2024_q1.csv", &premium_run())
        .unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn test_unknown_schema_is_fatal() {
    use crate::app::services::format_router::{DatasetPattern, FormatRouter, PatternTable};
    use crate::app::services::layout_registry::LayoutRegistry;
    use crate::app::services::pipeline::ParserEngine;
    use crate::app::services::schema_registry::SchemaRegistry;
    use std::sync::Arc;

    let router = FormatRouter::new(PatternTable::new(vec![DatasetPattern::new(
        r"^premiums_",
        "plan-premiums",
        "missing-schema",
    )
    .unwrap()]));
    let engine = ParserEngine::new(
        Arc::new(SchemaRegistry::new()),
        Arc::new(LayoutRegistry::new()),
        router,
    );

    let err = engine
        .parse(b"a,b\n1,2\n", "premiums_2024.csv", &premium_run())
        .unwrap_err();
    assert!(matches!(err, Error::SchemaNotFound { .. }));
}

#[test]
fn test_count_invariant_holds_with_rejects() {
    let engine = premium_engine();
    let content = "state_code,plan_id,premium\n\
                   01,H1000-001,12.50\n\
                   01,H1000-001,99.00\n\
                   XX,H2000-001,45.00\n";

    let result = engine
        .parse(content.as_bytes(), "premiums_2024_q1.csv", &premium_run())
        .unwrap();

    assert_eq!(
        result.data.len() + result.rejects.len(),
        result.metrics.total_rows
    );
    assert_eq!(result.metrics.valid_rows, result.data.len());
    assert_eq!(result.metrics.reject_rows, result.rejects.len());
}
