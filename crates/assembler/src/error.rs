//! Error types for the NXSL assembler.

use thiserror::Error;

/// Errors produced while assembling text into a program.
///
/// Every variant carries the 1-based line of the assembly text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// A directive other than `.line` or `.resolve`.
    #[error("line {line}: unknown directive '{token}'")]
    UnknownDirective { line: usize, token: String },

    /// An opcode or directive is missing its operand.
    #[error("line {line}: {opcode} expects {expected}")]
    MissingArgument {
        line: usize,
        opcode: &'static str,
        expected: &'static str,
    },

    /// A numeric literal could not be parsed or is out of range.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A code address that is not a hexadecimal number.
    #[error("line {line}: invalid address '{token}'")]
    InvalidAddress { line: usize, token: String },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },

    /// A label names a function that is already defined.
    #[error("line {line}: duplicate function name \"{name}\"")]
    DuplicateFunction { line: usize, name: String },

    /// `.resolve` found no unresolved jump of that kind.
    #[error("line {line}: no unresolved {opcode} to resolve")]
    NothingToResolve { line: usize, opcode: &'static str },
}

impl AsmError {
    /// Line of the assembly text the error was found on.
    pub fn line(&self) -> usize {
        match self {
            AsmError::UnknownOpcode { line, .. }
            | AsmError::UnknownDirective { line, .. }
            | AsmError::MissingArgument { line, .. }
            | AsmError::InvalidNumber { line, .. }
            | AsmError::InvalidAddress { line, .. }
            | AsmError::UnexpectedToken { line, .. }
            | AsmError::UnterminatedString { line }
            | AsmError::DuplicateFunction { line, .. }
            | AsmError::NothingToResolve { line, .. } => *line,
        }
    }
}
