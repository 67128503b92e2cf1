//! Delimited-text decode stage
//!
//! Decodes bytes through the encoding cascade, sniffs the dialect from the
//! decoded content, and reads records with a csv reader configured to that
//! dialect. The reader is flexible about field counts; row/schema alignment
//! problems surface later as canonicalizer findings, not reader errors.

use crate::app::models::{ParseMetrics, RawTable};
use crate::app::services::codec::{decode_bytes, sniff_dialect};
use crate::{Error, Result};
use tracing::debug;

/// Decode delimited bytes into a raw table
pub fn decode(bytes: &[u8], filename: &str, metrics: &mut ParseMetrics) -> Result<RawTable> {
    let decoded = decode_bytes(bytes);
    metrics.encoding_detected = decoded.encoding.to_string();
    metrics.encoding_fallback = decoded.fallback;

    let dialect = sniff_dialect(decoded.text.as_bytes()).ok_or_else(|| {
        Error::parse(filename, "No consistent delimiter found in the content")
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(dialect.delimiter)
        .quote(dialect.quote)
        .double_quote(dialect.doubled_quote_escape)
        .flexible(true)
        .has_headers(true)
        .from_reader(decoded.text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::parse(filename, format!("Unreadable header row: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record
            .map_err(|e| Error::parse(filename, format!("Malformed delimited record: {e}")))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(
        filename = %filename,
        delimiter = dialect.delimiter as char as u32,
        rows = rows.len(),
        "Delimited decode complete"
    );

    Ok(RawTable { headers, rows })
}
