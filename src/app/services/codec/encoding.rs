//! Encoding detection and byte-level decoding
//!
//! The cascade runs in priority order, each attempt recorded: BOM sniff
//! (UTF-8 signature, UTF-16 LE/BE), strict UTF-8, CP1252, and finally
//! Latin-1, which accepts any byte sequence. Anything but plain UTF-8 sets
//! the fallback flag so downstream alerting can catch corruption risk.

use crate::constants::encodings;
use tracing::debug;

/// CP1252 leaves five code points undefined; their presence means the file
/// is not CP1252 and must fall through to Latin-1
const CP1252_UNDEFINED: &[u8] = &[0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Result of the decode cascade
#[derive(Debug, Clone)]
pub struct DecodedText {
    /// Decoded text with any BOM removed
    pub text: String,

    /// Label of the encoding that succeeded (see [`encodings`])
    pub encoding: &'static str,

    /// True whenever anything but plain UTF-8 was used
    pub fallback: bool,
}

/// Decode raw bytes through the priority cascade
pub fn decode_bytes(bytes: &[u8]) -> DecodedText {
    // (1) BOM sniff
    if let Some((encoding, _bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        let (text, _, had_errors) = encoding.decode(bytes);
        let label = match encoding.name() {
            "UTF-8" => encodings::UTF8_SIG,
            "UTF-16LE" => encodings::UTF16_LE,
            "UTF-16BE" => encodings::UTF16_BE,
            other => {
                debug!(encoding = other, "Unexpected BOM encoding");
                encodings::UTF8_SIG
            }
        };
        if !had_errors {
            debug!(encoding = label, "Decoded via BOM sniff");
            return DecodedText {
                text: text.into_owned(),
                encoding: label,
                fallback: true,
            };
        }
        debug!(encoding = label, "BOM present but decode had errors, continuing cascade");
    }

    // (2) strict UTF-8
    if let Ok(text) = std::str::from_utf8(bytes) {
        debug!(encoding = encodings::UTF8, "Decoded as strict UTF-8");
        return DecodedText {
            text: text.to_string(),
            encoding: encodings::UTF8,
            fallback: false,
        };
    }
    debug!("Strict UTF-8 decode failed, continuing cascade");

    // (3) CP1252, rejected when undefined bytes are present
    if !bytes.iter().any(|b| CP1252_UNDEFINED.contains(b)) {
        let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
        debug!(encoding = encodings::CP1252, "Decoded as CP1252");
        return DecodedText {
            text: text.into_owned(),
            encoding: encodings::CP1252,
            fallback: true,
        };
    }
    debug!("CP1252 rejected (undefined bytes present), falling back to Latin-1");

    // (4) Latin-1: total, every byte maps to the code point of its value
    let text: String = bytes.iter().map(|&b| b as char).collect();
    DecodedText {
        text,
        encoding: encodings::LATIN1,
        fallback: true,
    }
}
