//! Content-based format sniffing for ambiguous extensions
//!
//! Magic bytes settle containers (ZIP, OLE compound documents) regardless
//! of what the filename claims. For plain text, fixed-width is preferred
//! whenever a layout exists for the dataset; delimiter counting is the
//! last resort.

use crate::app::services::codec::detect_delimiter;
use crate::app::services::format_router::SourceFormat;
use crate::constants::{OLE_MAGIC, ZIP_MAGIC};

/// Sniff the format of a content prefix
pub fn sniff_format(byte_prefix: &[u8], has_layout: bool) -> Option<SourceFormat> {
    if byte_prefix.starts_with(ZIP_MAGIC) {
        return Some(SourceFormat::Archive);
    }
    if byte_prefix.starts_with(OLE_MAGIC) {
        return Some(SourceFormat::Spreadsheet);
    }
    if has_layout {
        return Some(SourceFormat::FixedWidth);
    }
    detect_delimiter(byte_prefix).map(|_| SourceFormat::Delimited)
}
