//! Schema contract types and load-time validation
//!
//! A contract declares a dataset's columns (with types, nullability, and
//! bounds), natural keys, business rules, quality thresholds, and the
//! per-dataset header alias table. Contracts are immutable once published;
//! any breaking change (column removal, type change, key-order change)
//! requires a new MAJOR version.

use crate::app::models::{ColumnType, Severity};
use crate::{Error, Result};
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

/// Explicit per-column allow-list of permitted in-parser transforms
///
/// Anything beyond these is business transformation and belongs downstream;
/// a transform runs only when the contract names it for the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Left-pad with zeros to the given width (e.g., state code "0" -> "00")
    ZeroPad(usize),

    /// Uppercase the value
    Uppercase,
}

impl FromStr for Transform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Some(width) = trimmed.strip_prefix("zero_pad:") {
            let width = width.parse::<usize>().map_err(|_| {
                Error::invalid_contract(
                    "transform",
                    format!("Invalid zero_pad width in transform '{trimmed}'"),
                )
            })?;
            return Ok(Transform::ZeroPad(width));
        }
        match trimmed {
            "uppercase" => Ok(Transform::Uppercase),
            other => Err(Error::invalid_contract(
                "transform",
                format!("Unknown transform '{other}': allowed are zero_pad:<width>, uppercase"),
            )),
        }
    }
}

impl Transform {
    /// Apply the transform to a cleaned string value
    pub fn apply(&self, value: &str) -> String {
        match self {
            Transform::ZeroPad(width) => {
                if value.len() < *width && value.chars().all(|c| c.is_ascii_digit()) {
                    format!("{value:0>width$}", width = width)
                } else {
                    value.to_string()
                }
            }
            Transform::Uppercase => value.to_ascii_uppercase(),
        }
    }
}

/// One schema-declared column
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    /// Canonical column name
    pub name: String,

    /// Declared type (decimal columns carry their scale)
    pub ctype: ColumnType,

    /// Whether blank values are permitted
    pub nullable: bool,

    /// Optional pattern the canonical string form must match
    pub pattern: Option<Regex>,

    /// Optional lower bound for numeric columns
    pub min: Option<Decimal>,

    /// Optional upper bound for numeric columns
    pub max: Option<Decimal>,

    /// Whether the lower bound is exclusive
    pub min_exclusive: bool,

    /// Whether the upper bound is exclusive
    pub max_exclusive: bool,

    /// Allow-listed normalizations applied before type coercion
    pub transforms: Vec<Transform>,
}

/// Kind of a declared business rule
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Numeric bound check on the typed value
    Range {
        min: Option<Decimal>,
        max: Option<Decimal>,
        min_exclusive: bool,
        max_exclusive: bool,
    },

    /// Value must belong to an enumerated domain
    Domain { values: Vec<String> },

    /// Value must be zero or greater
    NonNegative,
}

/// One declared business rule bound to a column
#[derive(Debug, Clone)]
pub struct BusinessRule {
    /// Stable rule identifier carried on findings and rejects
    pub rule_id: String,

    /// Canonical column the rule applies to
    pub column: String,

    /// Rule kind and parameters
    pub kind: RuleKind,

    /// Severity of a violation
    pub severity: Severity,

    /// Advisory rules warn instead of blocking (domain rules only)
    pub advisory: bool,
}

/// Tiered row-count plausibility thresholds
///
/// Zero rows is always a fatal error regardless of these values; counts
/// outside the expected range are WARN/INFO guardrails, logged and
/// continued, so the same code path serves test fixtures and production.
#[derive(Debug, Clone, Default)]
pub struct QualityThresholds {
    /// Counts below this are WARN
    pub expected_min_rows: Option<u64>,

    /// Counts above this are INFO
    pub expected_max_rows: Option<u64>,
}

/// Duplicate natural-key precedence policy, configured per schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPrecedence {
    /// First row encountered in input order wins; the rest are quarantined
    #[default]
    FirstWins,

    /// Every row sharing a duplicated key is quarantined
    RejectAll,
}

impl FromStr for KeyPrecedence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_wins" => Ok(KeyPrecedence::FirstWins),
            "reject_all" => Ok(KeyPrecedence::RejectAll),
            other => Err(Error::invalid_contract(
                "key_precedence",
                format!("Unknown key precedence '{other}': must be first_wins or reject_all"),
            )),
        }
    }
}

/// Versioned schema contract for one dataset
#[derive(Debug, Clone)]
pub struct SchemaContract {
    /// Dataset name the contract describes
    pub dataset_name: String,

    /// Contract version (SemVer; MAJOR on breaking column change)
    pub version: String,

    /// Ordered columns; this order is the hash and output column order
    pub columns: Vec<ColumnSpec>,

    /// Ordered column subset forming the dedup/sort key
    pub natural_keys: Vec<String>,

    /// Declared business rules
    pub business_rules: Vec<BusinessRule>,

    /// Row-count plausibility thresholds
    pub quality_thresholds: QualityThresholds,

    /// Per-dataset header alias table: canonical name -> observed variants
    pub column_aliases: HashMap<String, Vec<String>>,

    /// Duplicate natural-key precedence policy
    pub key_precedence: KeyPrecedence,

    /// Optional tiebreaker column for the stable output sort
    pub sort_tiebreaker: Option<String>,
}

impl SchemaContract {
    /// Validate internal consistency; invoked by the loader after decode
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::invalid_contract(
                &self.dataset_name,
                "Contract declares no columns",
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::invalid_contract(
                    &self.dataset_name,
                    format!("Duplicate column declaration '{}'", column.name),
                ));
            }
        }

        if self.natural_keys.is_empty() {
            return Err(Error::invalid_contract(
                &self.dataset_name,
                "Contract declares no natural keys",
            ));
        }
        for key in &self.natural_keys {
            if self.column_index(key).is_none() {
                return Err(Error::invalid_contract(
                    &self.dataset_name,
                    format!("Natural key '{key}' is not a declared column"),
                ));
            }
        }

        for rule in &self.business_rules {
            if self.column_index(&rule.column).is_none() {
                return Err(Error::invalid_contract(
                    &self.dataset_name,
                    format!(
                        "Business rule '{}' references undeclared column '{}'",
                        rule.rule_id, rule.column
                    ),
                ));
            }
        }

        if let Some(tiebreaker) = &self.sort_tiebreaker {
            if self.column_index(tiebreaker).is_none() {
                return Err(Error::invalid_contract(
                    &self.dataset_name,
                    format!("Sort tiebreaker '{tiebreaker}' is not a declared column"),
                ));
            }
        }

        for canonical in self.column_aliases.keys() {
            if self.column_index(canonical).is_none() {
                return Err(Error::invalid_contract(
                    &self.dataset_name,
                    format!("Alias table maps to undeclared column '{canonical}'"),
                ));
            }
        }

        Ok(())
    }

    /// Index of a column by canonical name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column spec by canonical name
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Canonical column names in declared order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Columns that must be present in a fixed-width layout (non-nullable)
    pub fn required_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| !c.nullable)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Indices of the natural-key columns in declared key order
    pub fn natural_key_indices(&self) -> Vec<usize> {
        self.natural_keys
            .iter()
            .filter_map(|k| self.column_index(k))
            .collect()
    }
}
