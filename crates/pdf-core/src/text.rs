//! PDF text string encoding
//!
//! Field names (`/T`) and values (`/V`) are PDF "text strings": either
//! PDFDocEncoding bytes or UTF-16BE prefixed with a byte order mark.

use lopdf::{Object, StringFormat};

/// UTF-16BE byte order mark
const UTF16_BOM: [u8; 2] = [0xFE, 0xFF];

/// UTF-8 byte order mark (PDF 2.0)
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Decode a PDF text string into a Rust string
///
/// UTF-16BE and UTF-8 strings are recognized by their byte order mark.
/// Anything else is treated as PDFDocEncoding, which agrees with Latin-1
/// for every character a form field name realistically uses.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&UTF16_BOM) {
        let units = rest
            .chunks(2)
            .map(|pair| match pair {
                [hi, lo] => u16::from_be_bytes([*hi, *lo]),
                [hi] => u16::from_be_bytes([*hi, 0]),
                _ => 0,
            })
            .collect::<Vec<_>>();
        return char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
    }

    if let Some(rest) = bytes.strip_prefix(&UTF8_BOM) {
        return String::from_utf8_lossy(rest).into_owned();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Encode a Rust string as a PDF text string object
///
/// ASCII text is written as a literal string, everything else as a
/// hexadecimal UTF-16BE string with byte order mark.
pub fn encode_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }

    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&UTF16_BOM);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
