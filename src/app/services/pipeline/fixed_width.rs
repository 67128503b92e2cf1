//! Fixed-width decode stage
//!
//! Resolves the layout for the run's period, decodes the data section by
//! character spans, and runs the schema coverage guard before any rows move
//! downstream. Trailer lines skipped during decode surface as a guardrail
//! warning with samples.

use crate::app::models::{ParseMetrics, RawTable, RunMetadata};
use crate::app::services::codec::decode_bytes;
use crate::app::services::layout_registry::layout::check_schema_coverage;
use crate::app::services::layout_registry::{LayoutKey, LayoutRegistry};
use crate::app::services::schema_registry::SchemaContract;
use crate::constants::rules;
use crate::Result;
use tracing::warn;

/// Decode fixed-width bytes into a raw table
pub fn decode(
    bytes: &[u8],
    contract: &SchemaContract,
    layouts: &LayoutRegistry,
    dataset_id: &str,
    run: &RunMetadata,
    metrics: &mut ParseMetrics,
) -> Result<RawTable> {
    let decoded = decode_bytes(bytes);
    metrics.encoding_detected = decoded.encoding.to_string();
    metrics.encoding_fallback = decoded.fallback;

    let key = LayoutKey {
        dataset_id: dataset_id.to_string(),
        product_year: run.product_year,
        quarter_vintage: run.quarter_vintage,
    };
    let layout = layouts.require_layout(&key)?;

    let decode = layout.decode(&decoded.text, dataset_id)?;
    check_schema_coverage(
        layout,
        contract,
        dataset_id,
        decode.table.rows.first().map(Vec::as_slice),
    )?;

    if !decode.short_lines_skipped.is_empty() {
        warn!(
            dataset = %dataset_id,
            skipped = decode.short_lines_skipped.len(),
            "Short lines skipped as trailers"
        );
        for line in &decode.short_lines_skipped {
            metrics.record_guardrail(rules::SHORT_LINE_SKIPPED, line.clone());
        }
    }

    Ok(decode.table)
}
