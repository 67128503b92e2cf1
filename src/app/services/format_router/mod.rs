//! Format routing: filename patterns plus content sniffing
//!
//! Routing runs in two phases. The priority-ordered pattern table resolves
//! the dataset and schema from the filename; the extension fast path then
//! claims unambiguous formats (`.zip`, `.xlsx`, `.xls`, `.csv`, `.tsv`).
//! Everything else, `.txt` above all, is sniffed: magic bytes first, then
//! fixed-width when a layout exists for the dataset, then delimiter
//! counting. A `.txt` extension is never trusted on its own.

pub mod archive;
pub mod patterns;
pub mod sniffer;

#[cfg(test)]
pub mod tests;

use crate::app::services::layout_registry::LayoutRegistry;
use crate::{Error, Result};
use tracing::debug;

pub use archive::expand_archive;
pub use patterns::{DatasetPattern, PatternTable};
pub use sniffer::sniff_format;

/// Physical source format, in dispatch order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    FixedWidth,
    Delimited,
    Spreadsheet,
    Archive,
}

/// Routing verdict for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub dataset_id: String,
    pub schema_id: String,
    pub format: SourceFormat,
}

/// Router over a priority-ordered dataset pattern table
#[derive(Debug, Clone, Default)]
pub struct FormatRouter {
    table: PatternTable,
}

impl FormatRouter {
    pub fn new(table: PatternTable) -> Self {
        Self { table }
    }

    /// Route a file from its name and a prefix of its content
    pub fn route(
        &self,
        filename: &str,
        byte_prefix: &[u8],
        layouts: &LayoutRegistry,
    ) -> Result<RouteDecision> {
        let pattern = self.table.resolve(filename).ok_or_else(|| {
            Error::routing(
                filename,
                format!(
                    "No dataset pattern matched (tried {} patterns)",
                    self.table.len()
                ),
            )
        })?;

        let ext = extension(filename).map(|e| e.to_ascii_lowercase());
        let format = match ext.as_deref() {
            Some("zip") => SourceFormat::Archive,
            Some("xlsx") | Some("xls") => SourceFormat::Spreadsheet,
            Some("csv") | Some("tsv") => SourceFormat::Delimited,
            _ => {
                let has_layout = layouts.has_dataset(&pattern.dataset_id);
                sniff_format(byte_prefix, has_layout).ok_or_else(|| {
                    Error::routing(
                        filename,
                        format!(
                            "Extension gave no verdict and content sniffing failed \
                             (prefix {:02x?})",
                            &byte_prefix[..byte_prefix.len().min(8)]
                        ),
                    )
                })?
            }
        };

        debug!(
            filename = %filename,
            dataset = %pattern.dataset_id,
            format = ?format,
            "Routed"
        );

        Ok(RouteDecision {
            dataset_id: pattern.dataset_id.clone(),
            schema_id: pattern.schema_id.clone(),
            format,
        })
    }
}

/// Final extension of a filename, if any
fn extension(filename: &str) -> Option<&str> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(ext.trim())
}
