//! Tiered row-count plausibility checks
//!
//! Zero data rows is handled upstream as a fatal parse error. Counts below
//! the expected minimum are WARN guardrails; counts above the expected
//! maximum are INFO guardrails. Both log and continue, so fixture-sized
//! inputs and production releases share one code path.

use crate::app::models::ParseMetrics;
use crate::app::services::schema_registry::SchemaContract;
use crate::constants::rules;
use tracing::{info, warn};

/// Check the total data row count against the contract's thresholds
pub fn check_row_count(contract: &SchemaContract, total_rows: usize, metrics: &mut ParseMetrics) {
    let thresholds = &contract.quality_thresholds;

    if let Some(min) = thresholds.expected_min_rows {
        if (total_rows as u64) < min {
            warn!(
                dataset = %contract.dataset_name,
                total_rows,
                expected_min = min,
                "Row count below the expected production range"
            );
            metrics.record_guardrail(
                rules::ROW_COUNT_LOW,
                format!("{total_rows} rows (expected at least {min})"),
            );
            return;
        }
    }

    if let Some(max) = thresholds.expected_max_rows {
        if (total_rows as u64) > max {
            info!(
                dataset = %contract.dataset_name,
                total_rows,
                expected_max = max,
                "Row count above the expected production range"
            );
            metrics.record_guardrail(
                rules::ROW_COUNT_HIGH,
                format!("{total_rows} rows (expected at most {max})"),
            );
        }
    }
}
