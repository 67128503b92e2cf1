//! In-memory ZIP expansion
//!
//! Archives are expanded strictly in memory; nothing is ever written to
//! disk. Directory entries and known non-tabular members (PDFs, images,
//! documentation) are skipped. Members come back in archive order so that
//! downstream merging stays deterministic.

use crate::constants::is_non_tabular_extension;
use crate::{Error, Result};
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// Expand a ZIP archive into (member name, member bytes) pairs
pub fn expand_archive(bytes: &[u8], filename: &str) -> Result<Vec<(String, Vec<u8>)>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::archive(filename, format!("Not a readable ZIP archive: {e}")))?;

    let mut members = Vec::new();
    for index in 0..archive.len() {
        let mut member = archive.by_index(index).map_err(|e| {
            Error::archive(filename, format!("Failed to open member {index}: {e}"))
        })?;
        if member.is_dir() {
            continue;
        }

        let name = member.name().to_string();
        if let Some((_, ext)) = name.rsplit_once('.') {
            if is_non_tabular_extension(ext) {
                debug!(member = %name, "Skipping non-tabular archive member");
                continue;
            }
        }

        let mut content = Vec::with_capacity(member.size() as usize);
        member.read_to_end(&mut content).map_err(|e| {
            Error::archive(filename, format!("Failed to read member '{name}': {e}"))
        })?;
        members.push((name, content));
    }

    if members.is_empty() {
        return Err(Error::archive(
            filename,
            "Archive contains no tabular members",
        ));
    }

    debug!(filename = %filename, members = members.len(), "Archive expanded in memory");
    Ok(members)
}
