//! Program images: conversions between machine words, little-endian byte
//! streams and hex listings, plus the label entries exchanged between the
//! assembler and disassembler tools.

use serde::{Deserialize, Serialize};

use crate::error::ListingError;

/// One `address → name` binding, as exported by the assembler and imported
/// by the disassembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub addr: u32,
    pub name: String,
}

/// Pair bytes little-endian into words. A trailing odd byte is dropped.
pub fn words_from_le_bytes(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

pub fn words_to_le_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Render one `0xNNNN` word per line.
pub fn to_hex_listing(words: &[u16]) -> String {
    words
        .iter()
        .map(|w| format!("0x{w:04X}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a hex listing: one word per line, `0x` prefix optional, blank
/// lines and lines starting with `;` or `#` ignored.
pub fn parse_hex_listing(text: &str) -> Result<Vec<u16>, ListingError> {
    let mut words = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        let digits = line
            .strip_prefix("0x")
            .or_else(|| line.strip_prefix("0X"))
            .unwrap_or(line);
        let word = u16::from_str_radix(digits, 16).map_err(|_| ListingError {
            line: idx + 1,
            text: line.to_string(),
        })?;
        words.push(word);
    }
    Ok(words)
}
