//! Deterministic row-content hashing
//!
//! The recipe is frozen: canonical string forms of the business columns in
//! schema order, joined with the ASCII unit separator, UTF-8 encoded,
//! SHA-256, full lowercase hex digest. Any change to this recipe is a
//! parser MAJOR version bump because it breaks cross-release row identity.

use crate::app::models::CellValue;
use crate::constants::HASH_FIELD_SEPARATOR;
use sha2::{Digest, Sha256};

/// Compute the 64-character hex content hash over typed cells
pub fn row_content_hash(cells: &[CellValue]) -> String {
    let mut hasher = Sha256::new();
    for (index, cell) in cells.iter().enumerate() {
        if index > 0 {
            hasher.update([HASH_FIELD_SEPARATOR]);
        }
        hasher.update(cell.canonical_string().as_bytes());
    }
    hex::encode(hasher.finalize())
}
