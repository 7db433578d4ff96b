use std::collections::HashMap;

use tracing::warn;

use crate::asm::operand::{looks_like_label, parse_immediate, parse_register};
use crate::asm::Instruction;
use crate::decoder::Op;
use crate::error::AsmError;
use crate::instructions::{self, Family, InstrDesc, HALT_WORD, NOP_WORD};

/// Label name → byte address.
pub type LabelTable = HashMap<String, u32>;

impl Instruction {
    fn operand(&self, idx: usize) -> Result<&str, AsmError> {
        self.operands
            .get(idx)
            .map(String::as_str)
            .ok_or_else(|| AsmError::MissingOperand {
                line: self.line,
                mnemonic: self.mnemonic.clone(),
                position: idx + 1,
            })
    }

    /// A register that must fit a 4-bit field.
    fn register(&self, idx: usize) -> Result<u16, AsmError> {
        let token = self.operand(idx)?;
        let reg = parse_register(token).ok_or_else(|| AsmError::InvalidRegister {
            line: self.line,
            token: token.to_string(),
        })?;
        if reg > 0xF {
            return Err(AsmError::RegisterOutOfRange { line: self.line, token: token.to_string() });
        }
        Ok(reg as u16)
    }

    fn immediate(&self, idx: usize) -> Result<i64, AsmError> {
        let token = self.operand(idx)?;
        parse_immediate(token).ok_or_else(|| AsmError::InvalidImmediate {
            line: self.line,
            token: token.to_string(),
        })
    }

    /// Label address if `token` names one, else the literal value.
    fn target(&self, idx: usize, labels: &LabelTable) -> Result<Target, AsmError> {
        let token = self.operand(idx)?;
        if let Some(&addr) = labels.get(token) {
            return Ok(Target::Label(addr));
        }
        match parse_immediate(token) {
            Some(v) => Ok(Target::Literal(v)),
            None if looks_like_label(token) => Err(AsmError::UndefinedLabel {
                line: self.line,
                name: token.to_string(),
            }),
            None => Err(AsmError::InvalidImmediate { line: self.line, token: token.to_string() }),
        }
    }
}

enum Target {
    Label(u32),
    Literal(i64),
}

fn opcode(desc: &InstrDesc) -> u16 {
    u16::from(desc.opcode) << 12
}

fn encode_r(desc: &InstrDesc, ins: &Instruction) -> Result<u16, AsmError> {
    let rd = ins.register(0)?;
    let rs = ins.register(1)?;
    let rt = if desc.is_unary() { 0 } else { ins.register(2)? };
    Ok(opcode(desc) | rd << 8 | rs << 4 | rt)
}

fn encode_i(desc: &InstrDesc, ins: &Instruction) -> Result<u16, AsmError> {
    let rd = ins.register(0)?;
    let imm = (ins.immediate(1)? & 0xFF) as u16;
    Ok(opcode(desc) | rd << 8 | imm)
}

fn encode_m(desc: &InstrDesc, ins: &Instruction) -> Result<u16, AsmError> {
    let rd = ins.register(0)?;
    let rs = ins.register(1)?;
    let off = (ins.immediate(2)? & 0xF) as u16;
    Ok(opcode(desc) | rd << 8 | rs << 4 | off)
}

fn encode_j(desc: &InstrDesc, ins: &Instruction, labels: &LabelTable) -> Result<u16, AsmError> {
    let addr = match ins.target(0, labels)? {
        Target::Label(a) => i64::from(a),
        Target::Literal(v) => v,
    };
    Ok(opcode(desc) | (addr & 0xFFF) as u16)
}

fn encode_b(desc: &InstrDesc, ins: &Instruction, labels: &LabelTable) -> Result<u16, AsmError> {
    let rc = ins.register(0)?;
    let disp = match ins.target(1, labels)? {
        // word displacement from the address after this instruction
        Target::Label(a) => (i64::from(a) - (i64::from(ins.address) + 2)).div_euclid(2),
        Target::Literal(v) => v,
    };
    let word = opcode(desc) | rc << 8 | (disp & 0xFF) as u16;
    if word == HALT_WORD || instructions::extended((word >> 8) as u8).is_some() {
        warn!(
            line = ins.line,
            word,
            "branch encoding collides with a fixed form and will not decode back as {}",
            desc.mnemonic
        );
    }
    Ok(word)
}

/// Encode one instruction, appending its word(s) to `out`.
pub fn encode(
    desc: &InstrDesc,
    ins: &Instruction,
    labels: &LabelTable,
    out: &mut Vec<u16>,
) -> Result<(), AsmError> {
    let word = match desc.family {
        Family::R => encode_r(desc, ins)?,
        Family::I => encode_i(desc, ins)?,
        Family::M => encode_m(desc, ins)?,
        Family::J => encode_j(desc, ins, labels)?,
        Family::B => encode_b(desc, ins, labels)?,
        Family::Special if desc.op == Op::Halt => HALT_WORD,
        Family::Special => NOP_WORD,
        Family::Extended => {
            // second word reserved for operands
            out.extend([u16::from(desc.opcode) << 8, 0x0000]);
            return Ok(());
        }
    };
    out.push(word);
    Ok(())
}
