//! Shared test fixtures for finalizer tests


use crate::app::models::{QuarterVintage, RowMetadata, RunMetadata};
use chrono::{NaiveDate, Utc};

/// Run metadata for a fixture release
pub fn fixture_metadata() -> RowMetadata {
    RowMetadata {
        run: RunMetadata {
            dataset_id: "plan-premiums".to_string(),
            release_id: "2024-q1-r1".to_string(),
            vintage_date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            product_year: 2024,
            quarter_vintage: QuarterVintage::Q1,
            source_uri: "https://data.example.gov/premiums_2024q1.txt".to_string(),
            file_sha256: "ab".repeat(32),
            parser_version: "1.0.0".to_string(),
            schema_id: "plan-premiums-v2".to_string(),
            layout_version: "2024.1.0".to_string(),
        },
        parsed_at: Utc::now(),
    }
}
