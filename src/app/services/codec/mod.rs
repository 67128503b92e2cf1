//! Codec layer: encoding detection and CSV dialect sniffing
//!
//! This module owns all byte-level concerns: the BOM/charset decode cascade
//! and content-based delimiter/quote detection. It depends on nothing but
//! the raw bytes it is given and performs no I/O.

pub mod dialect;
pub mod encoding;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use dialect::{detect_delimiter, sniff_dialect, Dialect};
pub use encoding::{decode_bytes, DecodedText};
