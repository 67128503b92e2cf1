//! Stable canonical output ordering
//!
//! Rows sort by the natural-key canonical tuple ascending. Ties fall to the
//! schema's declared tiebreaker column when one exists, then to input
//! position, so the output order is a pure function of the input.

use crate::app::models::CanonicalRow;
use crate::app::services::schema_registry::SchemaContract;

/// Sort canonical rows into their stable output order
pub fn sort_canonical_rows(contract: &SchemaContract, rows: &mut [CanonicalRow]) {
    let key_indices = contract.natural_key_indices();
    let tiebreaker_index = contract
        .sort_tiebreaker
        .as_deref()
        .and_then(|name| contract.column_index(name));

    rows.sort_by(|a, b| {
        for &index in &key_indices {
            let ordering = a.values[index]
                .canonical_string()
                .cmp(&b.values[index].canonical_string());
            if ordering != std::cmp::Ordering::Equal {
                return ordering;
            }
        }
        if let Some(index) = tiebreaker_index {
            let ordering = a.values[index]
                .canonical_string()
                .cmp(&b.values[index].canonical_string());
            if ordering != std::cmp::Ordering::Equal {
                return ordering;
            }
        }
        a.input_index.cmp(&b.input_index)
    });
}
