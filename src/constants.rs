//! Application constants for the release parser
//!
//! This module contains rule identifiers, encoding labels, format markers,
//! and default values used throughout the parsing engine.

// =============================================================================
// Hashing
// =============================================================================

/// Field separator for row-content hashing (ASCII unit separator)
pub const HASH_FIELD_SEPARATOR: u8 = 0x1F;

/// Expected length of a row content hash (hex-encoded SHA-256)
pub const ROW_HASH_HEX_LEN: usize = 64;

// =============================================================================
// Encoding Labels
// =============================================================================

/// Encoding labels recorded in parse metrics, in cascade priority order
pub mod encodings {
    pub const UTF8: &str = "utf-8";
    pub const UTF8_SIG: &str = "utf-8-sig";
    pub const UTF16_LE: &str = "utf-16-le";
    pub const UTF16_BE: &str = "utf-16-be";
    pub const CP1252: &str = "cp1252";
    pub const LATIN1: &str = "latin-1";

    /// Binary container formats (xlsx/xls) have no text encoding to detect
    pub const BINARY: &str = "binary";

    /// Archive members decoded with differing encodings
    pub const MIXED: &str = "mixed";
}

// =============================================================================
// Validation Rule Identifiers
// =============================================================================

/// Stable rule identifiers carried on findings and reject rows
pub mod rules {
    /// Value could not be coerced to the schema-declared type
    pub const TYPE_COERCION: &str = "type_coercion";

    /// Non-nullable column held a blank value
    pub const REQUIRED_VALUE: &str = "required_value";

    /// Duplicate natural key within one parse
    pub const DUPLICATE_NATURAL_KEY: &str = "duplicate_natural_key";

    /// Value failed the column's declared pattern
    pub const PATTERN_MISMATCH: &str = "pattern_mismatch";

    /// Row count below the historically observed production range
    pub const ROW_COUNT_LOW: &str = "row_count_low";

    /// Row count above the historically observed production range
    pub const ROW_COUNT_HIGH: &str = "row_count_high";

    /// Source header had no alias mapping to a canonical column
    pub const UNMAPPED_HEADER: &str = "unmapped_header";

    /// Fixed-width line shorter than the layout's minimum, skipped as trailer
    pub const SHORT_LINE_SKIPPED: &str = "short_line_skipped";

    /// Prefix for per-column range checks derived from column min/max bounds
    pub fn range_check(column: &str) -> String {
        format!("range_check:{column}")
    }

    /// Prefix for per-column cast-failure guardrail warnings
    pub fn cast_failure(column: &str) -> String {
        format!("cast_failure:{column}")
    }
}

// =============================================================================
// Type Casting
// =============================================================================

/// Accepted truthy spellings for boolean columns (case-insensitive)
pub const BOOLEAN_TRUE_VALUES: &[&str] = &["Y", "YES", "TRUE", "1"];

/// Accepted falsy spellings for boolean columns (case-insensitive)
pub const BOOLEAN_FALSE_VALUES: &[&str] = &["N", "NO", "FALSE", "0"];

/// Date formats attempted during coercion, most common first
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y%m%d"];

/// Canonical output format for date values
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical serializations for boolean values
pub const BOOLEAN_TRUE_CANONICAL: &str = "True";
pub const BOOLEAN_FALSE_CANONICAL: &str = "False";

// =============================================================================
// Format Detection
// =============================================================================

/// Number of bytes sampled for content sniffing and dialect detection.
/// Smaller samples cause false negatives on multi-row headers.
pub const SNIFF_SAMPLE_BYTES: usize = 1024;

/// Candidate delimiters for content-based dialect detection
pub const CANDIDATE_DELIMITERS: &[u8] = &[b',', b'\t', b'|'];

/// ZIP local file header magic
pub const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// OLE compound document magic (legacy .xls)
pub const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

/// Archive member extensions that are never tabular data
pub const NON_TABULAR_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "md", "html", "htm", "jpg", "jpeg", "png", "gif",
];

// =============================================================================
// Metadata Column Names
// =============================================================================

/// Names of the metadata columns injected into every output row, in output
/// order. These never participate in row-content hashing.
pub mod metadata_columns {
    pub const DATASET_ID: &str = "dataset_id";
    pub const RELEASE_ID: &str = "release_id";
    pub const VINTAGE_DATE: &str = "vintage_date";
    pub const PRODUCT_YEAR: &str = "product_year";
    pub const QUARTER_VINTAGE: &str = "quarter_vintage";
    pub const SOURCE_URI: &str = "source_uri";
    pub const FILE_SHA256: &str = "file_sha256";
    pub const PARSER_VERSION: &str = "parser_version";
    pub const SCHEMA_ID: &str = "schema_id";
    pub const LAYOUT_VERSION: &str = "layout_version";
    pub const PARSED_AT: &str = "parsed_at";
}

// =============================================================================
// Guardrails
// =============================================================================

/// Maximum example values retained per guardrail warning
pub const MAX_GUARDRAIL_EXAMPLES: usize = 5;

/// Maximum raw-value sample length embedded in error messages
pub const MAX_SAMPLE_VALUE_LEN: usize = 120;

// =============================================================================
// Helper Functions
// =============================================================================

/// Truncate a raw value for safe embedding in diagnostics
pub fn sample_value(raw: &str) -> String {
    if raw.len() <= MAX_SAMPLE_VALUE_LEN {
        raw.to_string()
    } else {
        let mut end = MAX_SAMPLE_VALUE_LEN;
        while !raw.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &raw[..end])
    }
}

/// Check if an archive member extension is known to be non-tabular
pub fn is_non_tabular_extension(extension: &str) -> bool {
    let lowered = extension.to_ascii_lowercase();
    NON_TABULAR_EXTENSIONS.contains(&lowered.as_str())
}
