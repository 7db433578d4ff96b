use serde::{Deserialize, Serialize};

use crate::decoder::Op;

/// Operand layout of an instruction, which decides how its word is packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    /// `op rd, rs, rt` (NOT drops rt)
    R,
    /// `op rd, imm8`
    I,
    /// `op rd, rs, off4`
    M,
    /// `op target12`
    J,
    /// `op rc, disp8`, relative to the following word
    B,
    /// Selector byte in bits 15..8, followed by a reserved word
    Extended,
    /// Fixed whole-word encodings
    Special,
}

impl Family {
    /// Size in bytes of an instruction of this family.
    pub fn width(self) -> u32 {
        match self {
            Family::Extended => 4,
            _ => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrDesc {
    pub op: Op,
    pub mnemonic: &'static str,
    /// Top nibble for single-word families, full selector byte for
    /// `Extended` and `Special`.
    pub opcode: u8,
    pub family: Family,
}

impl InstrDesc {
    pub fn width(&self) -> u32 {
        self.family.width()
    }

    /// The unary R-family form, which encodes only two registers.
    pub fn is_unary(&self) -> bool {
        self.op == Op::Not
    }
}

const fn d(op: Op, mnemonic: &'static str, opcode: u8, family: Family) -> InstrDesc {
    InstrDesc { op, mnemonic, opcode, family }
}

/// Fixed encodings of the special forms.
pub const NOP_WORD: u16 = 0x0000;
pub const HALT_WORD: u16 = 0xFFFF;

/// Top nibble shared by BNE and the extended selector bytes.
pub const SHARED_NIBBLE: u8 = 0xF;

pub const TABLE: &[InstrDesc] = &[
    d(Op::Nop, "NOP", 0x0, Family::Special),
    d(Op::Add, "ADD", 0x1, Family::R),
    d(Op::Addi, "ADDI", 0x2, Family::I),
    d(Op::Sub, "SUB", 0x3, Family::R),
    d(Op::And, "AND", 0x4, Family::R),
    d(Op::Or, "OR", 0x5, Family::R),
    d(Op::Xor, "XOR", 0x6, Family::R),
    d(Op::Not, "NOT", 0x7, Family::R),
    d(Op::Shl, "SHL", 0x8, Family::R),
    d(Op::Shr, "SHR", 0x9, Family::R),
    d(Op::Load, "LOAD", 0xA, Family::M),
    d(Op::Store, "STORE", 0xB, Family::M),
    d(Op::Loadi, "LOADI", 0xC, Family::I),
    d(Op::Jmp, "JMP", 0xD, Family::J),
    d(Op::Beq, "BEQ", 0xE, Family::B),
    d(Op::Bne, "BNE", 0xF, Family::B),
    d(Op::Call, "CALL", 0xFA, Family::Extended),
    d(Op::Ret, "RET", 0xFB, Family::Extended),
    d(Op::Push, "PUSH", 0xFC, Family::Extended),
    d(Op::Pop, "POP", 0xFD, Family::Extended),
    d(Op::Halt, "HALT", 0xFF, Family::Special),
];

/// Look up an upper-case mnemonic.
pub fn lookup(mnemonic: &str) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.mnemonic == mnemonic)
}

pub fn by_op(op: Op) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.op == op)
}

/// Inverse lookup of a top nibble. Extended selectors are never returned;
/// use [`extended`] for those.
pub fn by_nibble(nibble: u8) -> Option<&'static InstrDesc> {
    TABLE
        .iter()
        .find(|d| d.family != Family::Extended && d.opcode == nibble)
}

/// Inverse lookup of an extended selector byte (bits 15..8 of the first word).
pub fn extended(selector: u8) -> Option<&'static InstrDesc> {
    TABLE
        .iter()
        .find(|d| d.family == Family::Extended && d.opcode == selector)
}
