//! Shared test fixtures for layout registry tests

use super::layout::Layout;
use super::{LayoutKey, LayoutRegistry};
use crate::app::models::QuarterVintage;

pub mod registry_tests;

/// A representative fixed-width layout for a plan-premium dataset:
/// state_code[0,2) plan_id[2,11) premium[11,17) enrollment[17,23)
pub const PREMIUM_LAYOUT_JSON: &str = r#"{
  "version": "2024.1.0",
  "min_line_length": 17,
  "data_start_pattern": "^[0-9]{2}[A-Z]",
  "columns": {
    "state_code": { "start": 0, "end": 2, "type": "string", "nullable": false },
    "plan_id": { "start": 2, "end": 11, "type": "string", "nullable": false },
    "premium": { "start": 11, "end": 17, "type": "decimal", "scale": 2, "nullable": false },
    "enrollment": { "start": 17, "end": 23, "type": "integer", "nullable": true }
  }
}"#;

/// Parse the shared fixture layout
pub fn premium_layout() -> Layout {
    crate::app::services::layout_registry::loader::parse_layout(
        PREMIUM_LAYOUT_JSON,
        "premium_layout_fixture",
    )
    .unwrap()
}

/// Build a registry holding the fixture layout under the given period
pub fn registry_with_premium_layout(year: u16, quarter: QuarterVintage) -> LayoutRegistry {
    let mut registry = LayoutRegistry::new();
    registry.insert(
        LayoutKey {
            dataset_id: "plan-premiums".to_string(),
            product_year: year,
            quarter_vintage: quarter,
        },
        premium_layout(),
    );
    registry
}

/// A fixed-width file body matching the fixture layout: a two-line header,
/// three data rows, and a short trailer line
pub fn premium_fixed_width_content() -> String {
    [
        "PLAN PREMIUM RELEASE 2024 Q1",
        "STPLAN_ID  PREMIUENROLL",
        "01H1000-001 12.50  1200",
        "06H2000-001 99.99    80",
        "48H3000-001150.00     5",
        "EOF 3",
    ]
    .join("\n")
}
