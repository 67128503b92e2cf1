//! Tiered validation: BLOCK quarantines rows, WARN/INFO only log and count
//!
//! Phases run in a fixed order: type-coercion findings carried in from the
//! canonicalizer, declared range/business rules on the typed numeric values,
//! categorical and pattern checks, then natural-key uniqueness under the
//! schema's precedence policy. Every finding carries a concrete offending
//! value; a reject with no example value cannot be triaged and is treated as
//! a defect.

pub mod row_count;
pub mod rules;
pub mod uniqueness;

#[cfg(test)]
pub mod tests;

use crate::app::models::{Finding, ParseMetrics, RejectRow, Severity, TypedRow};
use crate::app::services::canonicalizer::TypedTable;
use crate::app::services::schema_registry::SchemaContract;
use tracing::{debug, warn};

pub use row_count::check_row_count;

/// Partition produced by one validation pass
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    /// Rows with no BLOCK-tier finding, in input order
    pub valid: Vec<TypedRow>,

    /// Quarantined rows with full diagnostics, in input order
    pub rejects: Vec<RejectRow>,
}

/// Run all validation phases and partition the table
pub fn validate(
    contract: &SchemaContract,
    table: TypedTable,
    metrics: &mut ParseMetrics,
) -> ValidationOutcome {
    let mut rows = table.rows;

    for row in &mut rows {
        rules::apply_column_checks(contract, row);
        rules::apply_business_rules(contract, row);
    }

    uniqueness::mark_duplicate_keys(contract, &mut rows);

    let mut outcome = ValidationOutcome::default();
    for row in rows {
        // WARN/INFO findings are counted even on rows that pass
        for finding in &row.findings {
            match finding.severity {
                Severity::Warn => {
                    warn!(rule = %finding.rule, "{}", finding.message);
                    metrics.record_guardrail(&finding.rule, finding.context.clone());
                }
                Severity::Info => {
                    debug!(rule = %finding.rule, "{}", finding.message);
                    metrics.record_guardrail(&finding.rule, finding.context.clone());
                }
                Severity::Block => {}
            }
        }

        match row.first_block().cloned() {
            Some(blocking) => outcome.rejects.push(to_reject(contract, row, blocking)),
            None => outcome.valid.push(row),
        }
    }

    debug!(
        dataset = %contract.dataset_name,
        valid = outcome.valid.len(),
        rejects = outcome.rejects.len(),
        "Validation complete"
    );

    outcome
}

/// Convert a blocked row into a reject record
fn to_reject(contract: &SchemaContract, row: TypedRow, blocking: Finding) -> RejectRow {
    let raw = contract
        .column_names()
        .into_iter()
        .zip(row.raw)
        .collect();

    RejectRow {
        input_index: row.input_index,
        raw,
        validation_error: blocking.message,
        validation_severity: blocking.severity,
        validation_rule: blocking.rule,
        validation_context: blocking.context,
    }
}
