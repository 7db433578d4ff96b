//! Two-pass CVERE assembler.
//!
//! The first pass assigns byte addresses and records labels; the second
//! pass encodes every instruction against the completed label table, so
//! forward references resolve.

pub mod encode;
pub mod lexer;
pub mod operand;

use tracing::{debug, trace, warn};

use crate::error::AsmError;
use crate::image::{self, LabelEntry};
use crate::instructions;

pub use encode::LabelTable;
pub use lexer::{tokenize_line, Line};

/// An instruction collected by the first pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub label: Option<String>,
    pub mnemonic: String,
    pub operands: Vec<String>,
    /// 1-based source line.
    pub line: usize,
    pub address: u32,
}

/// Assembler state for one run. Every call to [`Assembler::assemble`] (or
/// [`Assembler::first_pass`]) starts from empty tables.
#[derive(Debug, Default)]
pub struct Assembler {
    labels: LabelTable,
    instructions: Vec<Instruction>,
    current_address: u32,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect labels and instructions, assigning addresses.
    pub fn first_pass(&mut self, source: &str) {
        self.labels.clear();
        self.instructions.clear();
        self.current_address = 0;

        for (idx, text) in source.lines().enumerate() {
            let Line { label, mnemonic, operands } = tokenize_line(text);

            if let Some(name) = label {
                if let Some(prev) = self.labels.insert(name.to_string(), self.current_address) {
                    warn!(label = name, prev, addr = self.current_address, "label redefined");
                }
            }

            let Some(mnemonic) = mnemonic else { continue };
            // Unknown mnemonics take one word here and fail in the second pass.
            let width = instructions::lookup(&mnemonic).map_or(2, |d| d.width());
            self.instructions.push(Instruction {
                label: label.map(str::to_string),
                mnemonic,
                operands: operands.into_iter().map(str::to_string).collect(),
                line: idx + 1,
                address: self.current_address,
            });
            self.current_address += width;
        }
        debug!(
            instructions = self.instructions.len(),
            labels = self.labels.len(),
            end = self.current_address,
            "first pass complete"
        );
    }

    /// Encode the collected instructions. Any error aborts the whole run.
    pub fn second_pass(&self) -> Result<Vec<u16>, AsmError> {
        let mut words = Vec::with_capacity(self.instructions.len());
        for ins in &self.instructions {
            let desc = instructions::lookup(&ins.mnemonic).ok_or_else(|| {
                AsmError::UnknownMnemonic { line: ins.line, mnemonic: ins.mnemonic.clone() }
            })?;
            let before = words.len();
            encode::encode(desc, ins, &self.labels, &mut words)?;
            trace!(addr = ins.address, words = ?&words[before..], "{}", ins.mnemonic);
        }
        debug!(words = words.len(), "second pass complete");
        Ok(words)
    }

    pub fn assemble(&mut self, source: &str) -> Result<Vec<u16>, AsmError> {
        self.first_pass(source);
        self.second_pass()
    }

    /// Assemble and render one `0xNNNN` line per word.
    pub fn assemble_to_hex(&mut self, source: &str) -> Result<String, AsmError> {
        Ok(image::to_hex_listing(&self.assemble(source)?))
    }

    /// Assemble to a little-endian byte stream.
    pub fn assemble_to_bytes(&mut self, source: &str) -> Result<Vec<u8>, AsmError> {
        Ok(image::words_to_le_bytes(&self.assemble(source)?))
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Address counter after the last first pass.
    pub fn end_address(&self) -> u32 {
        self.current_address
    }

    /// Labels ordered by address, then name.
    pub fn symbol_table(&self) -> Vec<LabelEntry> {
        let mut v: Vec<LabelEntry> = self
            .labels
            .iter()
            .map(|(name, &addr)| LabelEntry { addr, name: name.clone() })
            .collect();
        v.sort_by(|a, b| a.addr.cmp(&b.addr).then_with(|| a.name.cmp(&b.name)));
        v
    }
}
