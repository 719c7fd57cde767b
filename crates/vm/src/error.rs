//! Runtime errors for the NXSL VM.
//!
//! Every runtime error is fatal: it halts the script. The rendered form,
//! `Error <code> in line <N>: <message>`, is what the host shows the user.

use thiserror::Error;

/// What went wrong. Codes 1-8 are the core set; the rest cover external
/// calls, the extended arithmetic table and the instruction budget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("Data stack underflow")]
    DataStackUnderflow,

    /// A return found no saved frame.
    #[error("Control stack underflow")]
    ControlStackUnderflow,

    #[error("Condition value is not a number")]
    ConditionNotNumeric,

    /// An arithmetic operator got operands it cannot combine.
    #[error("Bad arithmetic conversion")]
    BadArithmeticConversion,

    #[error("Invalid operation with NULL value")]
    NullOperandInvalid,

    /// Malformed instruction: code generation bug, not a script error.
    #[error("Internal error")]
    InternalError,

    #[error("main() function not present")]
    MissingEntryPoint,

    #[error("Control stack overflow")]
    ControlStackOverflow,

    #[error("Division by zero")]
    DivisionByZero,

    /// Integer-only operator applied to a real number.
    #[error("Invalid operation with real numbers")]
    RealOperandInvalid,

    #[error("Function not found: {0}")]
    FunctionNotFound(String),

    #[error("Invalid number of arguments for {0}")]
    BadArgumentCount(String),

    #[error("Function {name} failed: {message}")]
    ExternalFunctionFailed { name: String, message: String },

    #[error("Instruction budget exhausted")]
    InstructionBudgetExhausted,
}

impl ErrorKind {
    /// Stable numeric code shown in error texts.
    pub fn code(&self) -> u32 {
        match self {
            ErrorKind::DataStackUnderflow => 1,
            ErrorKind::ControlStackUnderflow => 2,
            ErrorKind::ConditionNotNumeric => 3,
            ErrorKind::BadArithmeticConversion => 4,
            ErrorKind::NullOperandInvalid => 5,
            ErrorKind::InternalError => 6,
            ErrorKind::MissingEntryPoint => 7,
            ErrorKind::ControlStackOverflow => 8,
            ErrorKind::DivisionByZero => 9,
            ErrorKind::RealOperandInvalid => 10,
            ErrorKind::FunctionNotFound(_) => 11,
            ErrorKind::BadArgumentCount(_) => 12,
            ErrorKind::ExternalFunctionFailed { .. } => 13,
            ErrorKind::InstructionBudgetExhausted => 14,
        }
    }

    /// Attach the source line of the failing instruction.
    pub fn at(self, line: u32) -> RuntimeError {
        RuntimeError { kind: self, line }
    }
}

/// A fatal error together with the source line it was raised on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error {} in line {}: {}", .kind.code(), .line, .kind)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    /// Source line of the failing instruction; 0 if none was executing.
    pub line: u32,
}

impl RuntimeError {
    /// Numeric error code.
    pub fn code(&self) -> u32 {
        self.kind.code()
    }
}

/// Error returned by a host-supplied function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ExternalError(pub String);

impl ExternalError {
    /// Failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
