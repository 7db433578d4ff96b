use serde::{Deserialize, Serialize};

use crate::instructions::InstrDesc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    Nop,
    Add,
    Addi,
    Sub,
    And,
    Or,
    Xor,
    Not,
    Shl,
    Shr,
    Load,
    Store,
    Loadi,
    Jmp,
    Beq,
    Bne,
    // Extended (two-word) ops
    Call,
    Ret,
    Push,
    Pop,
    Halt,
}

/// Fields unpacked from one machine word. Which fields are meaningful
/// depends on `desc.family`; unused ones are zero.
#[derive(Debug, Clone, Copy)]
pub struct Decoded {
    pub desc: &'static InstrDesc,
    pub raw: u16,
    pub rd: u8, // also Rc for branches
    pub rs: u8,
    pub rt: u8,
    pub imm: u16, // imm8, offset4, target12 or disp8, unmasked by sign
}

impl Decoded {
    pub fn bare(desc: &'static InstrDesc, raw: u16) -> Self {
        Self { desc, raw, rd: 0, rs: 0, rt: 0, imm: 0 }
    }

    pub fn op(&self) -> Op {
        self.desc.op
    }

    /// Branch displacement in words, sign-extended from the 8-bit field.
    pub fn branch_disp(&self) -> i16 {
        i16::from(self.imm as u8 as i8)
    }
}

pub trait Decoder {
    /// Decode one word. `None` means no family claims the word; callers
    /// render those as unknown rather than failing.
    fn decode(&self, raw: u16) -> Option<Decoded>;
}
