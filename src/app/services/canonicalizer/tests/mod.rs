//! Shared test fixtures for canonicalizer tests

pub mod aliases_tests;
pub mod canonicalize_tests;

use crate::app::models::RawTable;

/// A raw table whose headers exercise casing, aliasing, and an unmapped
/// trailing column
pub fn premium_raw_table() -> RawTable {
    RawTable {
        headers: vec![
            "State Code".to_string(),
            "Plan ID".to_string(),
            "Monthly Premium".to_string(),
            "ENROLLMENT".to_string(),
            "effective_date".to_string(),
            "snp_flag".to_string(),
            "internal_note".to_string(),
        ],
        rows: vec![
            vec![
                "01".to_string(),
                "H1000-001".to_string(),
                "12.5".to_string(),
                "1200".to_string(),
                "2024-01-01".to_string(),
                "Y".to_string(),
                "ignore me".to_string(),
            ],
            vec![
                "2".to_string(),
                "H2000-001".to_string(),
                "45.00".to_string(),
                "".to_string(),
                "01/15/2024".to_string(),
                "N".to_string(),
                "".to_string(),
            ],
        ],
    }
}
