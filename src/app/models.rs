//! Data models for release parsing
//!
//! This module contains the core data structures for representing source
//! tables, typed cell values, run provenance, validation findings, and the
//! `(data, rejects, metrics)` triple returned by every parse call.

use crate::constants::{
    self, BOOLEAN_FALSE_CANONICAL, BOOLEAN_TRUE_CANONICAL, CANONICAL_DATE_FORMAT,
    MAX_GUARDRAIL_EXAMPLES,
};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

// =============================================================================
// Column Types and Cell Values
// =============================================================================

/// Schema-declared column types
///
/// Decimal columns carry their scale so that values can be quantized to the
/// declared precision before hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Decimal { scale: u32 },
    Boolean,
    Date,
}

impl ColumnType {
    /// Human-readable name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Text => "string",
            ColumnType::Integer => "integer",
            ColumnType::Decimal { .. } => "decimal",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
        }
    }
}

/// Tagged cell value produced by the canonicalizer and carried through
/// validation and finalization
///
/// Validation and hashing always operate on these concrete typed values,
/// never on the source text.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing value (blank source cell in a nullable column)
    Null,

    /// Trimmed text with case preserved
    Text(String),

    /// Whole number
    Integer(i64),

    /// Exact decimal, already rescaled to the schema-declared precision
    Decimal(Decimal),

    /// Boolean mapped through the explicit Y/N/1/0 enumeration
    Boolean(bool),

    /// Calendar date
    Date(NaiveDate),
}

impl CellValue {
    /// Check whether this cell holds no value
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Canonical string form used for hashing and natural-key sorting
    ///
    /// Null maps to the empty string, decimals render at their fixed scale
    /// with no scientific notation, dates as `YYYY-MM-DD`, and booleans as
    /// the literals `True`/`False`.
    pub fn canonical_string(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Decimal(d) => d.to_string(),
            CellValue::Boolean(true) => BOOLEAN_TRUE_CANONICAL.to_string(),
            CellValue::Boolean(false) => BOOLEAN_FALSE_CANONICAL.to_string(),
            CellValue::Date(d) => d.format(CANONICAL_DATE_FORMAT).to_string(),
        }
    }

    /// Numeric view for range checks, re-derived from the typed value
    /// (never from the string form)
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            CellValue::Integer(i) => Some(Decimal::from(*i)),
            CellValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }
}

// =============================================================================
// Validation Severity and Findings
// =============================================================================

/// Severity tiers for validation findings
///
/// BLOCK findings quarantine the row; WARN and INFO findings are logged and
/// counted but never remove rows from the valid partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Block,
    Warn,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Block => "BLOCK",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BLOCK" => Ok(Severity::Block),
            "WARN" => Ok(Severity::Warn),
            "INFO" => Ok(Severity::Info),
            other => Err(Error::invalid_contract(
                "severity",
                format!("Invalid severity '{other}': must be BLOCK, WARN, or INFO"),
            )),
        }
    }
}

/// One typed validation finding against a single row
///
/// The message must carry at least one concrete offending value; generic
/// counts are treated as a defect because they cannot be triaged.
#[derive(Debug, Clone)]
pub struct Finding {
    /// Stable rule identifier (see [`crate::constants::rules`])
    pub rule: String,

    /// Severity tier
    pub severity: Severity,

    /// Human-readable description including an example offending value
    pub message: String,

    /// Serialized offending values for triage
    pub context: String,
}

impl Finding {
    /// Create a BLOCK-tier finding
    pub fn block(
        rule: impl Into<String>,
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity: Severity::Block,
            message: message.into(),
            context: context.into(),
        }
    }

    /// Create a WARN-tier finding
    pub fn warn(
        rule: impl Into<String>,
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity: Severity::Warn,
            message: message.into(),
            context: context.into(),
        }
    }

    /// Create an INFO-tier finding
    pub fn info(
        rule: impl Into<String>,
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity: Severity::Info,
            message: message.into(),
            context: context.into(),
        }
    }
}

// =============================================================================
// Run Metadata
// =============================================================================

/// Quarter vintage of a release period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuarterVintage {
    Q1,
    Q2,
    Q3,
    Q4,
    Annual,
}

impl std::fmt::Display for QuarterVintage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            QuarterVintage::Q1 => "Q1",
            QuarterVintage::Q2 => "Q2",
            QuarterVintage::Q3 => "Q3",
            QuarterVintage::Q4 => "Q4",
            QuarterVintage::Annual => "annual",
        };
        write!(f, "{label}")
    }
}

impl FromStr for QuarterVintage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Q1" | "1" => Ok(QuarterVintage::Q1),
            "Q2" | "2" => Ok(QuarterVintage::Q2),
            "Q3" | "3" => Ok(QuarterVintage::Q3),
            "Q4" | "4" => Ok(QuarterVintage::Q4),
            "ANNUAL" | "A" => Ok(QuarterVintage::Annual),
            other => Err(Error::invalid_layout(
                "quarter_vintage",
                format!("Invalid quarter vintage '{other}': must be Q1-Q4 or annual"),
            )),
        }
    }
}

/// Caller-supplied run provenance, immutable for the duration of one parse
///
/// Every field is injected into output rows as a metadata column; none of
/// them participate in row-content hashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Dataset identifier (e.g., "plan-premiums")
    pub dataset_id: String,

    /// Release identifier assigned by the discovery component
    pub release_id: String,

    /// Date the release was published
    pub vintage_date: NaiveDate,

    /// Product year the release describes
    pub product_year: u16,

    /// Quarter vintage of the release period
    pub quarter_vintage: QuarterVintage,

    /// URI the source file was fetched from
    pub source_uri: String,

    /// SHA-256 of the source file, as computed upstream
    pub file_sha256: String,

    /// Parser version pinned for this run
    pub parser_version: String,

    /// Schema contract identifier pinned for this run
    pub schema_id: String,

    /// Layout version pinned for this run (empty for non-fixed-width input)
    pub layout_version: String,
}

/// Metadata columns injected into one output row: the run provenance plus
/// the parse timestamp
///
/// `parsed_at` is the only wall-clock value in the output and is excluded
/// from hashing, preserving full determinism of `row_content_hash`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowMetadata {
    pub run: RunMetadata,
    pub parsed_at: DateTime<Utc>,
}

impl RowMetadata {
    /// Flatten into (column name, value) pairs in the injection order
    pub fn to_columns(&self) -> Vec<(String, String)> {
        use constants::metadata_columns as cols;
        vec![
            (cols::DATASET_ID.into(), self.run.dataset_id.clone()),
            (cols::RELEASE_ID.into(), self.run.release_id.clone()),
            (
                cols::VINTAGE_DATE.into(),
                self.run.vintage_date.format(CANONICAL_DATE_FORMAT).to_string(),
            ),
            (cols::PRODUCT_YEAR.into(), self.run.product_year.to_string()),
            (
                cols::QUARTER_VINTAGE.into(),
                self.run.quarter_vintage.to_string(),
            ),
            (cols::SOURCE_URI.into(), self.run.source_uri.clone()),
            (cols::FILE_SHA256.into(), self.run.file_sha256.clone()),
            (cols::PARSER_VERSION.into(), self.run.parser_version.clone()),
            (cols::SCHEMA_ID.into(), self.run.schema_id.clone()),
            (cols::LAYOUT_VERSION.into(), self.run.layout_version.clone()),
            (cols::PARSED_AT.into(), self.parsed_at.to_rfc3339()),
        ]
    }
}

// =============================================================================
// Intermediate Tables
// =============================================================================

/// Raw decoded table: source headers and untyped string rows
///
/// Produced by the format-specific decoders (fixed-width, delimited,
/// spreadsheet) and consumed by the canonicalizer.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Source header names as observed in the file
    pub headers: Vec<String>,

    /// Data rows, each aligned to `headers`
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// One row after canonicalization: typed cells aligned to the schema's
/// column order, plus the raw values and any findings accumulated so far
#[derive(Debug, Clone)]
pub struct TypedRow {
    /// Zero-based position in the decoded input (duplicate precedence and
    /// sort tie-breaking both depend on it)
    pub input_index: usize,

    /// Typed cells in schema column order
    pub cells: Vec<CellValue>,

    /// Raw source values in schema column order (for reject diagnostics)
    pub raw: Vec<String>,

    /// Findings attached during casting and validation
    pub findings: Vec<Finding>,
}

impl TypedRow {
    /// Check whether any BLOCK-tier finding is attached
    pub fn is_blocked(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.severity == Severity::Block)
    }

    /// First BLOCK-tier finding, if any
    pub fn first_block(&self) -> Option<&Finding> {
        self.findings
            .iter()
            .find(|f| f.severity == Severity::Block)
    }
}

// =============================================================================
// Output Rows
// =============================================================================

/// One valid canonical output row
#[derive(Debug, Clone)]
pub struct CanonicalRow {
    /// Zero-based position in the decoded input
    pub input_index: usize,

    /// Business column values in schema column order
    pub values: Vec<CellValue>,

    /// 64-character hex SHA-256 over the canonicalized business columns
    pub row_content_hash: String,

    /// Injected provenance columns (never hashed)
    pub metadata: RowMetadata,
}

impl CanonicalRow {
    /// Flatten into (column name, canonical value) pairs: business columns
    /// in schema order, then metadata columns, then the row hash
    pub fn to_record(&self, column_names: &[String]) -> Vec<(String, String)> {
        let mut record: Vec<(String, String)> = column_names
            .iter()
            .zip(self.values.iter())
            .map(|(name, value)| (name.clone(), value.canonical_string()))
            .collect();
        record.extend(self.metadata.to_columns());
        record.push(("row_content_hash".into(), self.row_content_hash.clone()));
        record
    }
}

/// One quarantined row that failed BLOCK-tier validation
#[derive(Debug, Clone)]
pub struct RejectRow {
    /// Zero-based position in the decoded input
    pub input_index: usize,

    /// Raw source values keyed by canonical column name
    pub raw: Vec<(String, String)>,

    /// Human-readable description including at least one offending value
    pub validation_error: String,

    /// Severity tier of the blocking finding
    pub validation_severity: Severity,

    /// Stable rule identifier of the blocking finding
    pub validation_rule: String,

    /// Serialized offending values for triage
    pub validation_context: String,
}

// =============================================================================
// Metrics
// =============================================================================

/// Aggregated warning structure for one guardrail rule
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuardrailWarning {
    /// Number of occurrences observed
    pub count: u64,

    /// Up to [`MAX_GUARDRAIL_EXAMPLES`] example values
    pub examples: Vec<String>,
}

impl GuardrailWarning {
    /// Record one occurrence with an example value
    pub fn record(&mut self, example: impl Into<String>) {
        self.count += 1;
        if self.examples.len() < MAX_GUARDRAIL_EXAMPLES {
            self.examples.push(example.into());
        }
    }
}

/// Parse metrics returned to the caller (never persisted by this engine)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseMetrics {
    /// Total data rows encountered (valid + rejected)
    pub total_rows: usize,

    /// Rows that passed all BLOCK-tier validation
    pub valid_rows: usize,

    /// Rows quarantined by BLOCK-tier validation
    pub reject_rows: usize,

    /// Wall-clock duration of the parse call in seconds
    pub parse_duration_secs: f64,

    /// Encoding label selected by the codec cascade
    pub encoding_detected: String,

    /// True whenever anything but plain UTF-8 was used
    pub encoding_fallback: bool,

    /// WARN/INFO guardrail findings keyed by rule identifier
    pub guardrail_warnings: HashMap<String, GuardrailWarning>,
}

impl ParseMetrics {
    /// Record one guardrail occurrence under a rule identifier
    pub fn record_guardrail(&mut self, rule: impl Into<String>, example: impl Into<String>) {
        self.guardrail_warnings
            .entry(rule.into())
            .or_default()
            .record(example);
    }

    /// Fold metrics from one archive member into this aggregate
    ///
    /// Counts are summed, encoding labels collapse to `mixed` when members
    /// differ, and the fallback flag is OR-ed.
    pub fn absorb(&mut self, member: ParseMetrics) {
        self.total_rows += member.total_rows;
        self.valid_rows += member.valid_rows;
        self.reject_rows += member.reject_rows;

        if self.encoding_detected.is_empty() {
            self.encoding_detected = member.encoding_detected;
        } else if self.encoding_detected != member.encoding_detected {
            self.encoding_detected = constants::encodings::MIXED.to_string();
        }
        self.encoding_fallback |= member.encoding_fallback;

        for (rule, warning) in member.guardrail_warnings {
            let entry = self.guardrail_warnings.entry(rule).or_default();
            entry.count += warning.count;
            for example in warning.examples {
                if entry.examples.len() < MAX_GUARDRAIL_EXAMPLES {
                    entry.examples.push(example);
                }
            }
        }
    }
}

// =============================================================================
// Parse Result
// =============================================================================

/// The `(data, rejects, metrics)` triple returned by every parse call
///
/// The caller (ingestor) is solely responsible for persisting these; this
/// engine performs zero persistence.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Valid canonical rows: metadata injected, hashed, sorted
    pub data: Vec<CanonicalRow>,

    /// Rows that failed BLOCK-tier validation, with full diagnostics
    pub rejects: Vec<RejectRow>,

    /// Counts, timings, encoding, and guardrail warnings
    pub metrics: ParseMetrics,
}
