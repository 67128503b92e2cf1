//! Natural-key uniqueness under the schema's precedence policy
//!
//! Keys are the canonical string tuple of the natural-key columns. Rows
//! already blocked by earlier phases never claim a key, so a row rejected
//! for a bad cast cannot shadow a well-formed row sharing its key.

use crate::app::models::{Finding, TypedRow};
use crate::app::services::schema_registry::{KeyPrecedence, SchemaContract};
use crate::constants::rules;
use std::collections::HashMap;
use tracing::debug;

/// Attach BLOCK findings to rows violating natural-key uniqueness
pub fn mark_duplicate_keys(contract: &SchemaContract, rows: &mut [TypedRow]) {
    let key_indices = contract.natural_key_indices();
    if key_indices.is_empty() {
        return;
    }

    // key tuple -> row positions claiming it, in input order
    let mut claims: HashMap<Vec<String>, Vec<usize>> = HashMap::new();
    for (position, row) in rows.iter().enumerate() {
        if row.is_blocked() {
            continue;
        }
        let key: Vec<String> = key_indices
            .iter()
            .map(|&i| row.cells[i].canonical_string())
            .collect();
        claims.entry(key).or_default().push(position);
    }

    let mut duplicates = 0usize;
    for (key, positions) in claims {
        if positions.len() < 2 {
            continue;
        }

        let losers: &[usize] = match contract.key_precedence {
            KeyPrecedence::FirstWins => &positions[1..],
            KeyPrecedence::RejectAll => &positions[..],
        };
        for &position in losers {
            duplicates += 1;
            let key_display = key.join(", ");
            rows[position].findings.push(Finding::block(
                rules::DUPLICATE_NATURAL_KEY,
                format!(
                    "Natural key ({}) = ({key_display}) appears {} times in this release",
                    contract.natural_keys.join(", "),
                    positions.len()
                ),
                key_display,
            ));
        }
    }

    if duplicates > 0 {
        debug!(
            dataset = %contract.dataset_name,
            duplicates,
            policy = ?contract.key_precedence,
            "Duplicate natural keys quarantined"
        );
    }
}
