//! Priority-ordered dataset pattern table
//!
//! Filenames resolve to a dataset and schema through anchored regex
//! patterns checked in declaration order, most specific first. The first
//! match wins, so overlapping patterns must be declared narrow-to-broad.

use crate::{Error, Result};
use regex::Regex;

/// One filename pattern bound to a dataset and its schema contract
#[derive(Debug, Clone)]
pub struct DatasetPattern {
    pub pattern: Regex,
    pub dataset_id: String,
    pub schema_id: String,
}

impl DatasetPattern {
    /// Compile a pattern entry, failing on an invalid regex
    pub fn new(
        pattern: &str,
        dataset_id: impl Into<String>,
        schema_id: impl Into<String>,
    ) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            Error::routing(pattern, format!("Invalid dataset pattern: {e}"))
        })?;
        Ok(Self {
            pattern,
            dataset_id: dataset_id.into(),
            schema_id: schema_id.into(),
        })
    }
}

/// Ordered collection of dataset patterns
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    patterns: Vec<DatasetPattern>,
}

impl PatternTable {
    pub fn new(patterns: Vec<DatasetPattern>) -> Self {
        Self { patterns }
    }

    /// First pattern matching the filename, in declaration order
    pub fn resolve(&self, filename: &str) -> Option<&DatasetPattern> {
        self.patterns.iter().find(|p| p.pattern.is_match(filename))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
