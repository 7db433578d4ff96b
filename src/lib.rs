pub mod asm;
pub mod decoder;
pub mod disasm;
pub mod error;
pub mod image;
pub mod instructions;

pub mod isa {
    pub mod cvere; // CVERE 16-bit word decoder
}

pub use asm::{Assembler, Instruction};
pub use decoder::{Decoded, Decoder, Op};
pub use disasm::{Columns, DisasmConfig, DisassembledInstruction, Disassembler};
pub use error::{AsmError, ErrorKind, ListingError};
pub use image::LabelEntry;
pub use instructions::{Family, InstrDesc};
