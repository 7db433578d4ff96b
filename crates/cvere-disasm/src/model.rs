use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::Path;

use cvere_rs::image::{parse_hex_listing, words_from_le_bytes};
use cvere_rs::LabelEntry;

/// How a program file on disk is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Concatenated little-endian words, no header
    Bin,
    /// One hex word per line
    Hex,
}

pub fn load_program(path: &Path, format: InputFormat) -> Result<Vec<u16>> {
    match format {
        InputFormat::Bin => {
            let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            if bytes.len() % 2 != 0 {
                tracing::warn!(len = bytes.len(), "odd byte count, dropping trailing byte");
            }
            Ok(words_from_le_bytes(&bytes))
        }
        InputFormat::Hex => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(parse_hex_listing(&text).with_context(|| format!("parsing {}", path.display()))?)
        }
    }
}

/// Read a JSON label file (`[{ "addr": .., "name": .. }]`).
pub fn load_labels(path: &Path) -> Result<Vec<LabelEntry>> {
    let txt = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&txt).with_context(|| format!("parsing labels in {}", path.display()))
}

pub fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

/// Parse an `ADDR=NAME` label argument.
pub fn parse_label_arg(s: &str) -> Result<LabelEntry> {
    let (addr, name) = s.split_once('=').context("expected ADDR=NAME")?;
    let name = name.trim();
    anyhow::ensure!(!name.is_empty(), "empty label name in `{s}`");
    Ok(LabelEntry { addr: parse_u32(addr)?, name: name.to_string() })
}
