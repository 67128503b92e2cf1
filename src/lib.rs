//! Release Parser Library
//!
//! A Rust library for converting heterogeneous government data releases
//! (fixed-width text, delimited text, spreadsheets, ZIP archives) into
//! schema-conformant tabular data with byte-for-byte reproducibility.
//!
//! This library provides tools for:
//! - Content-based format detection and routing with extension fast paths
//! - Versioned fixed-width layout lookup keyed by dataset and period
//! - Encoding detection with a BOM/UTF-8/CP1252/Latin-1 cascade
//! - Column-name canonicalization and explicit, hash-stable type casting
//! - Tiered validation (BLOCK/WARN/INFO) with full reject diagnostics
//! - Deterministic row-content hashing and stable natural-key sorting
//!
//! A parse invocation is a pure function over the supplied byte buffer:
//! no network or disk I/O, no hidden mutable state. Registries are loaded
//! once at process start and shared read-only across concurrent callers.

pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod canonicalizer;
        pub mod codec;
        pub mod finalizer;
        pub mod format_router;
        pub mod layout_registry;
        pub mod pipeline;
        pub mod schema_registry;
        pub mod validator;
    }
}

// Re-export commonly used types
pub use app::models::{
    CanonicalRow, CellValue, ParseMetrics, ParseResult, QuarterVintage, RejectRow, RunMetadata,
    Severity,
};
pub use app::services::format_router::FormatRouter;
pub use app::services::layout_registry::{Layout, LayoutKey, LayoutRegistry};
pub use app::services::pipeline::ParserEngine;
pub use app::services::schema_registry::{SchemaContract, SchemaRegistry};

/// Result type alias for the release parser
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for release parsing operations
///
/// These are file-level, fatal failures only. Row-level problems never
/// surface here; they are partitioned into [`RejectRow`] values with full
/// diagnostic context while the remaining rows proceed.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No parser/format match could be found for a file
    #[error("Routing error for file '{filename}': {reason}")]
    Routing { filename: String, reason: String },

    /// Layout columns do not cover the schema's required columns, or a
    /// fixed-width decode failed mid-stream
    #[error(
        "Layout mismatch for dataset '{dataset}': missing columns {missing_columns:?}; sample row: '{sample_row}'"
    )]
    LayoutMismatch {
        dataset: String,
        missing_columns: Vec<String>,
        sample_row: String,
    },

    /// No layout is registered for the requested dataset/period
    #[error("No layout found for dataset '{dataset}' period {product_year}/{quarter}")]
    LayoutNotFound {
        dataset: String,
        product_year: u16,
        quarter: String,
    },

    /// No schema contract is registered under the requested identifier
    #[error("No schema contract registered for schema id '{schema_id}'")]
    SchemaNotFound { schema_id: String },

    /// Critical structural failure in file content (e.g., zero data rows)
    #[error("Parse error for file '{filename}': {reason}")]
    Parse { filename: String, reason: String },

    /// Contract-wide drift between observed headers and the schema
    #[error("Schema regression for '{schema_id}': {details}")]
    SchemaRegression { schema_id: String, details: String },

    /// Archive expansion failure
    #[error("Archive error for file '{filename}': {reason}")]
    Archive { filename: String, reason: String },

    /// Registry file could not be read
    #[error("Registry I/O error: {message}")]
    RegistryIo {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Registry file contained invalid JSON
    #[error("Registry JSON error in '{file}': {message}")]
    RegistryJson {
        file: String,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Schema contract failed load-time validation
    #[error("Invalid schema contract '{schema_id}': {reason}")]
    InvalidContract { schema_id: String, reason: String },

    /// Fixed-width layout failed load-time validation
    #[error("Invalid layout '{name}': {reason}")]
    InvalidLayout { name: String, reason: String },
}

impl Error {
    /// Create a routing error with context
    pub fn routing(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Routing {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    /// Create a layout mismatch error carrying the missing-column set and a
    /// sample decoded row for diagnosis
    pub fn layout_mismatch(
        dataset: impl Into<String>,
        missing_columns: Vec<String>,
        sample_row: impl Into<String>,
    ) -> Self {
        Self::LayoutMismatch {
            dataset: dataset.into(),
            missing_columns,
            sample_row: sample_row.into(),
        }
    }

    /// Create a layout-not-found error
    pub fn layout_not_found(
        dataset: impl Into<String>,
        product_year: u16,
        quarter: impl Into<String>,
    ) -> Self {
        Self::LayoutNotFound {
            dataset: dataset.into(),
            product_year,
            quarter: quarter.into(),
        }
    }

    /// Create a schema-not-found error
    pub fn schema_not_found(schema_id: impl Into<String>) -> Self {
        Self::SchemaNotFound {
            schema_id: schema_id.into(),
        }
    }

    /// Create a parse error with context
    pub fn parse(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    /// Create a schema regression error
    pub fn schema_regression(schema_id: impl Into<String>, details: impl Into<String>) -> Self {
        Self::SchemaRegression {
            schema_id: schema_id.into(),
            details: details.into(),
        }
    }

    /// Create an archive error with context
    pub fn archive(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Archive {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    /// Create a registry I/O error with context
    pub fn registry_io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::RegistryIo {
            message: message.into(),
            source,
        }
    }

    /// Create a registry JSON error with context
    pub fn registry_json(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<serde_json::Error>,
    ) -> Self {
        Self::RegistryJson {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid contract error
    pub fn invalid_contract(schema_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidContract {
            schema_id: schema_id.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid layout error
    pub fn invalid_layout(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLayout {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::RegistryIo {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
