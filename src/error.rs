use serde::Serialize;

/// Broad category of an assembly failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// The mnemonic is not in the format table.
    Syntax,
    /// A register or immediate operand is malformed or missing.
    Operand,
    /// A symbolic target names a label that was never defined.
    Reference,
}

/// Fatal assembly error. `line` is 1-based.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("line {line}: unknown mnemonic `{mnemonic}`")]
    UnknownMnemonic { line: usize, mnemonic: String },
    #[error("line {line}: invalid register `{token}`")]
    InvalidRegister { line: usize, token: String },
    #[error("line {line}: register `{token}` does not fit a 4-bit field")]
    RegisterOutOfRange { line: usize, token: String },
    #[error("line {line}: invalid immediate `{token}`")]
    InvalidImmediate { line: usize, token: String },
    #[error("line {line}: {mnemonic} is missing operand #{position}")]
    MissingOperand { line: usize, mnemonic: String, position: usize },
    #[error("line {line}: undefined label `{name}`")]
    UndefinedLabel { line: usize, name: String },
}

impl AsmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AsmError::UnknownMnemonic { .. } => ErrorKind::Syntax,
            AsmError::InvalidRegister { .. }
            | AsmError::RegisterOutOfRange { .. }
            | AsmError::InvalidImmediate { .. }
            | AsmError::MissingOperand { .. } => ErrorKind::Operand,
            AsmError::UndefinedLabel { .. } => ErrorKind::Reference,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            AsmError::UnknownMnemonic { line, .. }
            | AsmError::InvalidRegister { line, .. }
            | AsmError::RegisterOutOfRange { line, .. }
            | AsmError::InvalidImmediate { line, .. }
            | AsmError::MissingOperand { line, .. }
            | AsmError::UndefinedLabel { line, .. } => *line,
        }
    }
}

/// A hex listing line that is not a 16-bit hex word.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: invalid hex word `{text}`")]
pub struct ListingError {
    pub line: usize,
    pub text: String,
}
