//! Parser pipeline: route, decode, canonicalize, validate, finalize
//!
//! `ParserEngine::parse` is a pure function over the byte buffer it is
//! given: no filesystem or network I/O, no mutable shared state. Registries
//! are `Arc`-shared read-only, so one engine serves any number of
//! concurrent parse calls. Archives recurse member by member with the same
//! run metadata, and the merged output is re-sorted so member ordering
//! inside the archive cannot leak into the result.

pub mod delimited;
pub mod fixed_width;
pub mod spreadsheet;

#[cfg(test)]
pub mod tests;

use crate::app::models::{ParseMetrics, ParseResult, RawTable, RowMetadata, RunMetadata};
use crate::app::services::canonicalizer::canonicalize;
use crate::app::services::codec::detect_delimiter;
use crate::app::services::finalizer::{finalize, sort_canonical_rows};
use crate::app::services::format_router::{
    expand_archive, FormatRouter, RouteDecision, SourceFormat,
};
use crate::app::services::layout_registry::LayoutRegistry;
use crate::app::services::schema_registry::{SchemaContract, SchemaRegistry};
use crate::app::services::validator::{check_row_count, validate};
use crate::{Error, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The parsing engine: registries plus the format router
#[derive(Debug, Clone)]
pub struct ParserEngine {
    schemas: Arc<SchemaRegistry>,
    layouts: Arc<LayoutRegistry>,
    router: FormatRouter,
}

impl ParserEngine {
    pub fn new(
        schemas: Arc<SchemaRegistry>,
        layouts: Arc<LayoutRegistry>,
        router: FormatRouter,
    ) -> Self {
        Self {
            schemas,
            layouts,
            router,
        }
    }

    /// Parse one source file into the `(data, rejects, metrics)` triple
    pub fn parse(
        &self,
        bytes: &[u8],
        filename: &str,
        run: &RunMetadata,
    ) -> Result<ParseResult> {
        let started = Instant::now();
        let decision = self.router.route(filename, bytes, &self.layouts)?;
        let contract = self.schemas.require(&decision.schema_id)?;

        let mut result = match decision.format {
            SourceFormat::Archive => self.parse_archive(bytes, filename, run, contract)?,
            format => self.parse_member(bytes, filename, run, &decision, contract, format)?,
        };
        result.metrics.parse_duration_secs = started.elapsed().as_secs_f64();

        info!(
            filename = %filename,
            dataset = %decision.dataset_id,
            total = result.metrics.total_rows,
            valid = result.metrics.valid_rows,
            rejects = result.metrics.reject_rows,
            encoding = %result.metrics.encoding_detected,
            "Parse complete"
        );

        Ok(result)
    }

    /// Parse one non-archive file or archive member
    fn parse_member(
        &self,
        bytes: &[u8],
        filename: &str,
        run: &RunMetadata,
        decision: &RouteDecision,
        contract: &SchemaContract,
        format: SourceFormat,
    ) -> Result<ParseResult> {
        let mut metrics = ParseMetrics::default();

        let table = match format {
            SourceFormat::FixedWidth => {
                match fixed_width::decode(
                    bytes,
                    contract,
                    &self.layouts,
                    &decision.dataset_id,
                    run,
                    &mut metrics,
                ) {
                    Ok(table) => table,
                    Err(err) if is_layout_failure(&err) && detect_delimiter(bytes).is_some() => {
                        // Ambiguous text that failed the layout may really
                        // be delimited content under a .txt name
                        warn!(
                            filename = %filename,
                            error = %err,
                            "Fixed-width decode failed, retrying as delimited"
                        );
                        metrics = ParseMetrics::default();
                        delimited::decode(bytes, filename, &mut metrics)?
                    }
                    Err(err) => return Err(err),
                }
            }
            SourceFormat::Delimited => delimited::decode(bytes, filename, &mut metrics)?,
            SourceFormat::Spreadsheet => spreadsheet::decode(bytes, filename, &mut metrics)?,
            SourceFormat::Archive => {
                return Err(Error::archive(
                    filename,
                    "Nested archive dispatch must go through parse()",
                ))
            }
        };

        self.finish(contract, table, filename, run, metrics)
    }

    /// Shared tail of the pipeline: canonicalize, validate, finalize
    fn finish(
        &self,
        contract: &SchemaContract,
        table: RawTable,
        filename: &str,
        run: &RunMetadata,
        mut metrics: ParseMetrics,
    ) -> Result<ParseResult> {
        if table.row_count() == 0 {
            return Err(Error::parse(filename, "No data rows decoded"));
        }

        let typed = canonicalize(contract, &table, &mut metrics)?;
        let total_rows = typed.rows.len();
        check_row_count(contract, total_rows, &mut metrics);

        let outcome = validate(contract, typed, &mut metrics);

        // parsed_at is stamped exactly once per parse call
        let metadata = RowMetadata {
            run: run.clone(),
            parsed_at: Utc::now(),
        };
        let data = finalize(contract, &metadata, outcome.valid);

        metrics.total_rows = total_rows;
        metrics.valid_rows = data.len();
        metrics.reject_rows = outcome.rejects.len();

        Ok(ParseResult {
            data,
            rejects: outcome.rejects,
            metrics,
        })
    }

    /// Expand an archive in memory and recurse over its members
    fn parse_archive(
        &self,
        bytes: &[u8],
        filename: &str,
        run: &RunMetadata,
        contract: &SchemaContract,
    ) -> Result<ParseResult> {
        let members = expand_archive(bytes, filename)?;
        debug!(filename = %filename, members = members.len(), "Parsing archive members");

        let mut data = Vec::new();
        let mut rejects = Vec::new();
        let mut metrics = ParseMetrics::default();

        for (member_name, member_bytes) in members {
            let member = self.parse(&member_bytes, &member_name, run)?;
            data.extend(member.data);
            rejects.extend(member.rejects);
            metrics.absorb(member.metrics);
        }

        // Member boundaries must not leak into the output order
        sort_canonical_rows(contract, &mut data);

        Ok(ParseResult {
            data,
            rejects,
            metrics,
        })
    }
}

/// Failures that justify the delimited retry on ambiguous text files
fn is_layout_failure(err: &Error) -> bool {
    matches!(
        err,
        Error::LayoutMismatch { .. } | Error::LayoutNotFound { .. }
    )
}
