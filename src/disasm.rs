use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decoder::{Decoded, Decoder, Op};
use crate::image::{self, LabelEntry};
use crate::instructions::Family;
use crate::isa::cvere::CvereDecoder;

bitflags! {
/// Optional columns of a text listing. Address and assembly are always shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Columns: u8 {
const RAW = 1 << 0;        // machine word(s) in hex
const ANNOTATION = 1 << 1; // `; Rd=.., Rs=..`
}
}

impl Default for Columns {
    fn default() -> Self {
        Columns::all()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisasmConfig {
    pub columns: Columns,
    /// Advance exactly one word per record, decoding the reserved word of an
    /// extended instruction as its own record. Off by default: the reserved
    /// word is folded into the extended record and the address advances by 4.
    pub word_stride: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisassembledInstruction {
    pub address: u32,
    pub raw: u16,
    /// Reserved second word of an extended instruction, when consumed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved: Option<u16>,
    pub mnemonic: String,
    pub operands: String,
    pub annotation: String,
}

impl DisassembledInstruction {
    pub fn width(&self) -> u32 {
        if self.reserved.is_some() { 4 } else { 2 }
    }

    /// `AAAA:  WWWW  MNEMON operands  ; annotation`
    pub fn render(&self, columns: Columns) -> String {
        let mut parts = vec![format!("{:04X}:", self.address)];
        if columns.contains(Columns::RAW) {
            match self.reserved {
                Some(second) => parts.push(format!("{:04X} {second:04X}", self.raw)),
                None => parts.push(format!("{:04X}", self.raw)),
            }
        }
        let mut asm = format!("{:<6}", self.mnemonic);
        if !self.operands.is_empty() {
            asm.push(' ');
            asm.push_str(&self.operands);
        }
        parts.push(asm);
        if columns.contains(Columns::ANNOTATION) && !self.annotation.is_empty() {
            parts.push(format!("; {}", self.annotation));
        }
        // padding of a bare mnemonic is not kept at end of line
        parts.join("  ").trim_end().to_string()
    }
}

pub fn fmt_register(n: u8) -> String {
    match n {
        0..=15 => format!("R{n:X}"),
        16 => "PC".to_string(),
        17 => "SP".to_string(),
        18 => "LR".to_string(),
        19 => "SR".to_string(),
        _ => format!("R?{n}"),
    }
}

/// Mnemonic, operand text and annotation for a decoded word at `address`.
pub fn fmt_decoded(d: &Decoded, address: u32, labels: &BTreeMap<u32, String>) -> (String, String, String) {
    let mn = d.desc.mnemonic.to_string();
    let (operands, annotation) = match d.desc.family {
        Family::R if d.desc.is_unary() => (
            format!("{}, {}", fmt_register(d.rd), fmt_register(d.rs)),
            format!("Rd={:X}, Rs={:X}", d.rd, d.rs),
        ),
        Family::R => (
            format!("{}, {}, {}", fmt_register(d.rd), fmt_register(d.rs), fmt_register(d.rt)),
            format!("Rd={:X}, Rs={:X}, Rt={:X}", d.rd, d.rs, d.rt),
        ),
        Family::I => (
            format!("{}, 0x{:02X}", fmt_register(d.rd), d.imm),
            format!("Rd={:X}, Imm={:02X}", d.rd, d.imm),
        ),
        Family::M => (
            format!("{}, {}, 0x{:X}", fmt_register(d.rd), fmt_register(d.rs), d.imm),
            format!("Rd={:X}, Rs={:X}, Off={:X}", d.rd, d.rs, d.imm),
        ),
        Family::J => {
            let target = u32::from(d.imm);
            let shown = labels.get(&target).cloned().unwrap_or_else(|| format!("0x{target:03X}"));
            (shown, format!("Target=0x{target:03X}"))
        }
        Family::B => {
            let target = branch_target(address, d.branch_disp());
            let shown = labels.get(&target).cloned().unwrap_or_else(|| format!("0x{target:04X}"));
            (
                format!("{}, {shown}", fmt_register(d.rd)),
                format!("Rc={:X}, Target=0x{target:04X}", d.rd),
            )
        }
        Family::Extended => (String::new(), "Extended instruction".to_string()),
        Family::Special if d.op() == Op::Halt => (String::new(), "Stop execution".to_string()),
        Family::Special => (String::new(), "No operation".to_string()),
    };
    (mn, operands, annotation)
}

/// Byte address reached by a branch at `address` with word displacement
/// `disp`, wrapped into the 16-bit address space.
pub fn branch_target(address: u32, disp: i16) -> u32 {
    address.wrapping_add(2).wrapping_add_signed(i32::from(disp) * 2) & 0xFFFF
}

/// Word-stream disassembler. Decoding never fails: words no family claims
/// become `UNKNOWN_<nibble>` records.
#[derive(Debug, Default)]
pub struct Disassembler<D = CvereDecoder> {
    decoder: D,
    labels: BTreeMap<u32, String>,
    config: DisasmConfig,
}

impl Disassembler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: Decoder> Disassembler<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Self { decoder, labels: BTreeMap::new(), config: DisasmConfig::default() }
    }

    pub fn with_config(mut self, config: DisasmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DisasmConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut DisasmConfig {
        &mut self.config
    }

    /// Register a symbolic name for `address`. A later call for the same
    /// address replaces the name.
    pub fn add_label(&mut self, address: u32, name: impl Into<String>) {
        self.labels.insert(address, name.into());
    }

    pub fn extend_labels<I: IntoIterator<Item = LabelEntry>>(&mut self, entries: I) {
        for e in entries {
            self.labels.insert(e.addr, e.name);
        }
    }

    pub fn labels(&self) -> &BTreeMap<u32, String> {
        &self.labels
    }

    /// Decode a single word at `address`.
    pub fn disassemble_instruction(&self, raw: u16, address: u32) -> DisassembledInstruction {
        let (mnemonic, operands, annotation) = match self.decoder.decode(raw) {
            Some(d) => fmt_decoded(&d, address, &self.labels),
            None => {
                let nibble = raw >> 12;
                (format!("UNKNOWN_{nibble:X}"), String::new(), format!("Unknown opcode: 0x{nibble:X}"))
            }
        };
        DisassembledInstruction { address, raw, reserved: None, mnemonic, operands, annotation }
    }

    pub fn disassemble(&self, words: &[u16], start: u32) -> Vec<DisassembledInstruction> {
        let mut out = Vec::with_capacity(words.len());
        let mut address = start;
        let mut idx = 0;
        while idx < words.len() {
            let mut ins = self.disassemble_instruction(words[idx], address);
            idx += 1;
            if !self.config.word_stride && self.is_extended(words[idx - 1]) {
                if let Some(&second) = words.get(idx) {
                    ins.reserved = Some(second);
                    idx += 1;
                }
            }
            address = address.wrapping_add(ins.width());
            out.push(ins);
        }
        debug!(words = words.len(), records = out.len(), start, "disassembled");
        out
    }

    /// Disassemble a little-endian byte stream; a trailing odd byte is ignored.
    pub fn disassemble_bytes(&self, bytes: &[u8], start: u32) -> Vec<DisassembledInstruction> {
        self.disassemble(&image::words_from_le_bytes(bytes), start)
    }

    /// Multi-line listing using the configured columns.
    pub fn disassemble_to_string(&self, words: &[u16], start: u32) -> String {
        render_listing(&self.disassemble(words, start), self.config.columns)
    }

    fn is_extended(&self, raw: u16) -> bool {
        self.decoder
            .decode(raw)
            .is_some_and(|d| d.desc.family == Family::Extended)
    }
}

pub fn render_listing(records: &[DisassembledInstruction], columns: Columns) -> String {
    records
        .iter()
        .map(|r| r.render(columns))
        .collect::<Vec<_>>()
        .join("\n")
}
