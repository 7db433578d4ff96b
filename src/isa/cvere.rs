use crate::decoder::{Decoded, Decoder, Op};
use crate::instructions::{self, Family, HALT_WORD, NOP_WORD, SHARED_NIBBLE};

/// CVERE word decoder.
///
/// Decoding order: the two fixed special words, then the extended selector
/// byte under the shared 0xF nibble, then the family of the top nibble.
#[derive(Debug, Default, Clone, Copy)]
pub struct CvereDecoder;

impl CvereDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for CvereDecoder {
    fn decode(&self, raw: u16) -> Option<Decoded> {
        match raw {
            NOP_WORD => return Some(Decoded::bare(instructions::by_op(Op::Nop)?, raw)),
            HALT_WORD => return Some(Decoded::bare(instructions::by_op(Op::Halt)?, raw)),
            _ => {}
        }

        let nibble = (raw >> 12) as u8;
        if nibble == SHARED_NIBBLE {
            if let Some(desc) = instructions::extended((raw >> 8) as u8) {
                return Some(Decoded::bare(desc, raw));
            }
        }

        let desc = instructions::by_nibble(nibble)?;
        let rd = ((raw >> 8) & 0xF) as u8;
        let rs = ((raw >> 4) & 0xF) as u8;
        let rt = (raw & 0xF) as u8;
        let d = match desc.family {
            Family::R => Decoded { desc, raw, rd, rs, rt, imm: 0 },
            Family::I => Decoded { desc, raw, rd, rs: 0, rt: 0, imm: raw & 0xFF },
            Family::M => Decoded { desc, raw, rd, rs, rt: 0, imm: raw & 0xF },
            Family::J => Decoded { imm: raw & 0xFFF, ..Decoded::bare(desc, raw) },
            Family::B => Decoded { desc, raw, rd, rs: 0, rt: 0, imm: raw & 0xFF },
            // Special forms only exist as whole fixed words, handled above.
            Family::Special | Family::Extended => return None,
        };
        Some(d)
    }
}
