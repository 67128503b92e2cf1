//! Finalization: row-content hashing, metadata injection, stable sort
//!
//! Hashing covers only the business columns in schema order; metadata
//! columns (including the wall-clock `parsed_at`) are injected after the
//! digest is computed and never participate in it. The output sort is
//! deterministic: natural-key tuple ascending, ties broken by the schema's
//! tiebreaker column, then by input position.

pub mod hashing;
pub mod sorting;

#[cfg(test)]
pub mod tests;

use crate::app::models::{CanonicalRow, RowMetadata, TypedRow};
use crate::app::services::schema_registry::SchemaContract;
use tracing::debug;

pub use hashing::row_content_hash;
pub use sorting::sort_canonical_rows;

/// Hash, stamp, and sort the valid rows into canonical output order
pub fn finalize(
    contract: &SchemaContract,
    metadata: &RowMetadata,
    valid_rows: Vec<TypedRow>,
) -> Vec<CanonicalRow> {
    let mut rows: Vec<CanonicalRow> = valid_rows
        .into_iter()
        .map(|row| CanonicalRow {
            input_index: row.input_index,
            row_content_hash: row_content_hash(&row.cells),
            values: row.cells,
            metadata: metadata.clone(),
        })
        .collect();

    sort_canonical_rows(contract, &mut rows);

    debug!(
        dataset = %contract.dataset_name,
        rows = rows.len(),
        "Finalization complete"
    );

    rows
}
