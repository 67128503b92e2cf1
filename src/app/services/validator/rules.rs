//! Column bound, pattern, and declared business-rule checks
//!
//! All numeric comparisons run on the typed `Integer`/`Decimal` values,
//! never on string forms. Pattern and domain checks run on the canonical
//! string form. Null cells are skipped; required-value enforcement already
//! happened during canonicalization.

use crate::app::models::{CellValue, Finding, Severity, TypedRow};
use crate::app::services::schema_registry::{
    BusinessRule, RuleKind, SchemaContract,
};
use crate::constants::rules as rule_ids;
use rust_decimal::Decimal;

/// Apply per-column bound and pattern checks from the column specs
pub fn apply_column_checks(contract: &SchemaContract, row: &mut TypedRow) {
    for (index, column) in contract.columns.iter().enumerate() {
        let cell = &row.cells[index];
        if cell.is_null() {
            continue;
        }

        if let Some(value) = cell.as_decimal() {
            if let Some(message) = bound_violation(
                value,
                column.min,
                column.max,
                column.min_exclusive,
                column.max_exclusive,
            ) {
                row.findings.push(Finding::block(
                    rule_ids::range_check(&column.name),
                    format!("Column '{}' value {message}", column.name),
                    cell.canonical_string(),
                ));
            }
        }

        if let Some(pattern) = &column.pattern {
            let canonical = cell.canonical_string();
            if !pattern.is_match(&canonical) {
                row.findings.push(Finding::block(
                    rule_ids::PATTERN_MISMATCH,
                    format!(
                        "Column '{}' value '{canonical}' does not match pattern '{}'",
                        column.name,
                        pattern.as_str()
                    ),
                    canonical,
                ));
            }
        }
    }
}

/// Apply the contract's declared business rules
pub fn apply_business_rules(contract: &SchemaContract, row: &mut TypedRow) {
    for rule in &contract.business_rules {
        let Some(index) = contract.column_index(&rule.column) else {
            continue; // load-time validation guarantees this never fires
        };
        let cell = &row.cells[index];
        if cell.is_null() {
            continue;
        }

        if let Some(finding) = check_rule(rule, cell) {
            row.findings.push(finding);
        }
    }
}

/// Evaluate one business rule against one typed cell
fn check_rule(rule: &BusinessRule, cell: &CellValue) -> Option<Finding> {
    match &rule.kind {
        RuleKind::Range {
            min,
            max,
            min_exclusive,
            max_exclusive,
        } => {
            let value = cell.as_decimal()?;
            let message =
                bound_violation(value, *min, *max, *min_exclusive, *max_exclusive)?;
            Some(make_finding(
                rule,
                format!("Column '{}' value {message}", rule.column),
                cell.canonical_string(),
            ))
        }
        RuleKind::Domain { values } => {
            let canonical = cell.canonical_string();
            if values.iter().any(|v| v == &canonical) {
                return None;
            }
            Some(make_finding(
                rule,
                format!(
                    "Column '{}' value '{canonical}' is not in the allowed domain ({} values)",
                    rule.column,
                    values.len()
                ),
                canonical,
            ))
        }
        RuleKind::NonNegative => {
            let value = cell.as_decimal()?;
            if value >= Decimal::ZERO {
                return None;
            }
            Some(make_finding(
                rule,
                format!("Column '{}' value {value} is negative", rule.column),
                cell.canonical_string(),
            ))
        }
    }
}

/// Build a finding at the rule's declared severity; advisory rules warn
/// instead of blocking
fn make_finding(rule: &BusinessRule, message: String, context: String) -> Finding {
    let severity = if rule.advisory {
        Severity::Warn
    } else {
        rule.severity
    };
    Finding {
        rule: rule.rule_id.clone(),
        severity,
        message,
        context,
    }
}

/// Describe a bound violation, if any, with the offending value embedded
fn bound_violation(
    value: Decimal,
    min: Option<Decimal>,
    max: Option<Decimal>,
    min_exclusive: bool,
    max_exclusive: bool,
) -> Option<String> {
    if let Some(min) = min {
        let violated = if min_exclusive {
            value <= min
        } else {
            value < min
        };
        if violated {
            let bound = if min_exclusive { "exclusive" } else { "inclusive" };
            return Some(format!("{value} is below the {bound} minimum {min}"));
        }
    }
    if let Some(max) = max {
        let violated = if max_exclusive {
            value >= max
        } else {
            value > max
        };
        if violated {
            let bound = if max_exclusive { "exclusive" } else { "inclusive" };
            return Some(format!("{value} is above the {bound} maximum {max}"));
        }
    }
    None
}
