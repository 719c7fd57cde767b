//! Errors raised while building a program.

use thiserror::Error;

/// Errors from the compilation-side program contracts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// A function with this name is already registered.
    #[error("Duplicate function name: \"{0}\"")]
    DuplicateFunction(String),

    /// Byte does not name an opcode.
    #[error("invalid opcode: {0}")]
    InvalidOpcode(u8),
}
