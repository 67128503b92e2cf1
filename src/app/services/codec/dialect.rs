//! CSV dialect detection over a bounded content sample
//!
//! Delimiter detection counts candidate occurrences outside quoted regions,
//! line by line, and requires a consistent count across sampled lines. The
//! sample must be at least [`SNIFF_SAMPLE_BYTES`]; sniffing a smaller
//! window causes false negatives on files with multi-row headers.

use crate::constants::{CANDIDATE_DELIMITERS, SNIFF_SAMPLE_BYTES};
use tracing::debug;

/// Detected delimited-text dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Field delimiter (comma, tab, or pipe)
    pub delimiter: u8,

    /// Quote character
    pub quote: u8,

    /// Whether quotes inside fields are escaped by doubling
    pub doubled_quote_escape: bool,
}

/// Detect the most plausible delimiter over a byte sample
///
/// Operates on raw bytes (all candidates are ASCII) so the router can sniff
/// before any decode. Returns `None` when no candidate appears consistently
/// on every sampled line.
pub fn detect_delimiter(sample: &[u8]) -> Option<u8> {
    let window = &sample[..sample.len().min(SNIFF_SAMPLE_BYTES)];
    let lines: Vec<&[u8]> = split_sample_lines(window);
    if lines.is_empty() {
        return None;
    }

    let mut best: Option<(u8, usize)> = None;
    for &candidate in CANDIDATE_DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_outside_quotes(line, candidate))
            .collect();

        let first = counts[0];
        if first == 0 {
            continue;
        }
        // Header rows and data rows must agree on the field count
        if counts.iter().any(|&c| c != first) {
            continue;
        }
        if best.map(|(_, n)| first > n).unwrap_or(true) {
            best = Some((candidate, first));
        }
    }

    if let Some((delimiter, count)) = best {
        debug!(
            delimiter = delimiter as char as u32,
            per_line = count,
            lines = lines.len(),
            "Delimiter detected"
        );
        Some(delimiter)
    } else {
        None
    }
}

/// Sniff the full dialect (delimiter, quote, escape convention)
pub fn sniff_dialect(sample: &[u8]) -> Option<Dialect> {
    let delimiter = detect_delimiter(sample)?;
    let window = &sample[..sample.len().min(SNIFF_SAMPLE_BYTES)];

    let quote = b'"';
    let doubled_quote_escape = window.windows(2).any(|pair| pair == [b'"', b'"']);

    Some(Dialect {
        delimiter,
        quote,
        doubled_quote_escape,
    })
}

/// Split a sample into complete lines, discarding a trailing partial line
/// so a truncated sample window cannot skew the counts
fn split_sample_lines(window: &[u8]) -> Vec<&[u8]> {
    let mut lines: Vec<&[u8]> = window.split(|&b| b == b'\n').collect();
    // Whatever follows the last newline in the window may be cut off
    if !window.ends_with(b"\n") && lines.len() > 1 {
        lines.pop();
    }
    lines
        .into_iter()
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Count delimiter occurrences outside double-quoted regions
fn count_outside_quotes(line: &[u8], delimiter: u8) -> usize {
    let mut count = 0;
    let mut in_quotes = false;
    for &byte in line {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}
