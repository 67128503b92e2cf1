//! Shared test fixtures for codec tests


/// Bytes that are invalid UTF-8 but valid CP1252 ("café" with 0xE9,
/// plus a Windows smart quote 0x93)
pub fn cp1252_bytes() -> Vec<u8> {
    b"plan_name\n\x93caf\xE9 plan\x93\n".to_vec()
}

/// Bytes containing a CP1252-undefined code point (0x90), decodable only
/// as Latin-1
pub fn latin1_only_bytes() -> Vec<u8> {
    b"code\n\x90X\n".to_vec()
}
