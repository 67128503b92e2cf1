//! Shared test fixtures for pipeline tests

pub mod engine_tests;

use crate::app::models::{QuarterVintage, RunMetadata};
use crate::app::services::format_router::{DatasetPattern, FormatRouter, PatternTable};
use crate::app::services::layout_registry::tests::registry_with_premium_layout;
use crate::app::services::pipeline::ParserEngine;
use crate::app::services::schema_registry::tests::premium_contract;
use crate::app::services::schema_registry::SchemaRegistry;
use chrono::NaiveDate;
use std::sync::Arc;

/// Engine wired with the premium contract, layout, and filename pattern
pub fn premium_engine() -> ParserEngine {
    let mut schemas = SchemaRegistry::new();
    schemas.insert("plan-premiums-v2", premium_contract());

    let layouts = registry_with_premium_layout(2024, QuarterVintage::Q1);

    let router = FormatRouter::new(PatternTable::new(vec![DatasetPattern::new(
        r"(^|/)premiums_",
        "plan-premiums",
        "plan-premiums-v2",
    )
    .unwrap()]));

    ParserEngine::new(Arc::new(schemas), Arc::new(layouts), router)
}

/// Run metadata for the fixture release
pub fn premium_run() -> RunMetadata {
    RunMetadata {
        dataset_id: "plan-premiums".to_string(),
        release_id: "2024-q1-r1".to_string(),
        vintage_date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
        product_year: 2024,
        quarter_vintage: QuarterVintage::Q1,
        source_uri: "https://data.example.gov/premiums_2024_q1.txt".to_string(),
        file_sha256: "ab".repeat(32),
        parser_version: "1.0.0".to_string(),
        schema_id: "plan-premiums-v2".to_string(),
        layout_version: "2024.1.0".to_string(),
    }
}
