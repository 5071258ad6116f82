//! Body decoding for the upstream feeds.
//!
//! The upstream switches between UTF-16LE and UTF-8, sometimes with a BOM,
//! sometimes with stray NULs, and occasionally answers 200 with an HTML error
//! page. Steps run in a fixed order: status, error page, BOM, decode, strip.

use crate::error::{AlertsError, Result};
use crate::feed::types::RawFeedPayload;

const ERROR_PAGE_MARKER: &str = "/errorpage_adom/";
const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// Codepoint that intermittently corrupts the feed.
const STRAY_CODEPOINT: char = '\u{0A7B}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
}

/// Sniff the BOM. Returns the encoding and the BOM length to skip.
pub fn detect_encoding(bytes: &[u8]) -> (TextEncoding, usize) {
    if bytes.starts_with(&UTF16LE_BOM) {
        (TextEncoding::Utf16Le, UTF16LE_BOM.len())
    } else if bytes.starts_with(&UTF8_BOM) {
        (TextEncoding::Utf8, UTF8_BOM.len())
    } else {
        (TextEncoding::Utf8, 0)
    }
}

fn decode_utf16le(bytes: &[u8]) -> String {
    // A dangling odd byte cannot form a code unit; drop it.
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Turn a raw payload into feed text. An empty string means "no data".
pub fn decode_payload(payload: &RawFeedPayload) -> Result<String> {
    if payload.status != 200 {
        return Err(AlertsError::transport(format!(
            "unexpected HTTP status {}",
            payload.status
        )));
    }

    if String::from_utf8_lossy(&payload.bytes).contains(ERROR_PAGE_MARKER) {
        return Err(AlertsError::TransientUpstream);
    }

    let (encoding, bom_len) = detect_encoding(&payload.bytes);
    let body = &payload.bytes[bom_len..];
    let text = match encoding {
        TextEncoding::Utf16Le => decode_utf16le(body),
        TextEncoding::Utf8 => String::from_utf8_lossy(body).into_owned(),
    };

    let cleaned: String = text
        .chars()
        .filter(|c| *c != '\0' && *c != STRAY_CODEPOINT)
        .collect();

    Ok(cleaned.trim().to_string())
}
