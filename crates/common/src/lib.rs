//! NXSL common types.
//!
//! This crate provides the data structures shared by the interpreter and the
//! assembler:
//!
//! - [`Value`]: the dynamic runtime value (null, number, string)
//! - [`Opcode`]: the 33 instruction opcodes
//! - [`Instruction`]: opcode, operand, item count and source line
//! - [`Program`]: instruction sequence plus function table
//! - [`ProgramError`]: errors from building a program

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod value;

// Re-export commonly used types at the crate root.
pub use error::ProgramError;
pub use instruction::{Instruction, Operand};
pub use opcode::Opcode;
pub use program::Program;
pub use value::{Number, Value};
