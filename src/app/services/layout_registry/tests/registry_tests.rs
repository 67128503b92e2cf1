//! Tests for layout registry lookup order and loading

use super::{premium_layout, registry_with_premium_layout, PREMIUM_LAYOUT_JSON};
use crate::app::models::QuarterVintage;
use crate::app::services::layout_registry::{loader, LayoutKey, LayoutRegistry};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_exact_period_lookup() {
    let registry = registry_with_premium_layout(2024, QuarterVintage::Q1);
    let layout = registry.get_layout(&LayoutKey {
        dataset_id: "plan-premiums".to_string(),
        product_year: 2024,
        quarter_vintage: QuarterVintage::Q1,
    });
    assert!(layout.is_some());
    assert_eq!(layout.unwrap().version, "2024.1.0");
}

#[test]
fn test_quarter_falls_back_to_annual() {
    let registry = registry_with_premium_layout(2024, QuarterVintage::Annual);
    let layout = registry.get_layout(&LayoutKey {
        dataset_id: "plan-premiums".to_string(),
        product_year: 2024,
        quarter_vintage: QuarterVintage::Q3,
    });
    assert!(layout.is_some());
}

#[test]
fn test_exact_quarter_preferred_over_annual() {
    let mut registry = registry_with_premium_layout(2024, QuarterVintage::Annual);
    let mut q2_layout = premium_layout();
    q2_layout.version = "2024.2.0".to_string();
    registry.insert(
        LayoutKey {
            dataset_id: "plan-premiums".to_string(),
            product_year: 2024,
            quarter_vintage: QuarterVintage::Q2,
        },
        q2_layout,
    );

    let layout = registry
        .get_layout(&LayoutKey {
            dataset_id: "plan-premiums".to_string(),
            product_year: 2024,
            quarter_vintage: QuarterVintage::Q2,
        })
        .unwrap();
    assert_eq!(layout.version, "2024.2.0");
}

#[test]
fn test_wrong_year_is_not_found() {
    let registry = registry_with_premium_layout(2024, QuarterVintage::Q1);
    let missing = registry.get_layout(&LayoutKey {
        dataset_id: "plan-premiums".to_string(),
        product_year: 2023,
        quarter_vintage: QuarterVintage::Q1,
    });
    assert!(missing.is_none());
}

#[test]
fn test_require_layout_yields_typed_error() {
    let registry = LayoutRegistry::new();
    let err = registry
        .require_layout(&LayoutKey {
            dataset_id: "plan-premiums".to_string(),
            product_year: 2024,
            quarter_vintage: QuarterVintage::Q1,
        })
        .unwrap_err();
    assert!(err.to_string().contains("plan-premiums"));
    assert!(err.to_string().contains("2024"));
}

#[test]
fn test_has_dataset_probe() {
    let registry = registry_with_premium_layout(2024, QuarterVintage::Q1);
    assert!(registry.has_dataset("plan-premiums"));
    assert!(!registry.has_dataset("provider-directory"));
}

#[test]
fn test_load_dir_parses_key_from_file_stem() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("plan-premiums_2024_q1.json"),
        PREMIUM_LAYOUT_JSON,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("plan-premiums_2024_annual.json"),
        PREMIUM_LAYOUT_JSON,
    )
    .unwrap();

    let registry = loader::load_dir(temp_dir.path()).unwrap();
    assert_eq!(registry.layout_count(), 2);
    assert!(registry
        .get_layout(&LayoutKey {
            dataset_id: "plan-premiums".to_string(),
            product_year: 2024,
            quarter_vintage: QuarterVintage::Q1,
        })
        .is_some());
}

#[test]
fn test_load_dir_rejects_malformed_stem() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("noperiod.json"), PREMIUM_LAYOUT_JSON).unwrap();
    assert!(loader::load_dir(temp_dir.path()).is_err());
}

#[test]
fn test_columns_sorted_by_start_regardless_of_file_order() {
    // Columns deliberately out of order in the file
    let content = r#"{
      "version": "2024.1.0",
      "min_line_length": 7,
      "data_start_pattern": "^.",
      "columns": {
        "b": { "start": 5, "end": 7, "type": "string" },
        "a": { "start": 0, "end": 5, "type": "string" }
      }
    }"#;
    let layout = loader::parse_layout(content, "unordered.json").unwrap();
    assert_eq!(layout.column_names(), vec!["a", "b"]);
}
