//! NXSL virtual machine: executes compiled NXSL programs.
//!
//! The VM is a stack machine with:
//! - A data stack of dynamic [`Value`]s
//! - A control stack of call frames, each saving the caller's locals
//! - Three variable scopes looked up in order: constants, globals, locals
//! - A registry of host functions for calls the program does not define
//!
//! # Usage
//!
//! ```
//! use nxsl_common::{Instruction, Opcode, Program, Value};
//! use nxsl_vm::VM;
//!
//! let mut program = Program::new();
//! program.add_function("main", None).unwrap();
//! program.add_instruction(Instruction::push_constant(Value::from(40), 1));
//! program.add_instruction(Instruction::push_constant(Value::from(2), 1));
//! program.add_instruction(Instruction::new(Opcode::Add, 1));
//! program.add_instruction(Instruction::new(Opcode::Return, 1));
//!
//! let mut vm = VM::new(&program);
//! vm.run().unwrap();
//! assert_eq!(vm.result(), Some(&Value::from(42)));
//! assert!(vm.error_text().is_none());
//! ```

mod binary;
pub mod config;
pub mod error;
pub mod execute;
pub mod external;
pub mod machine;
pub mod stack;
pub mod variables;

pub use binary::binary_operation;
pub use config::VmConfig;
pub use error::{ErrorKind, ExternalError, RuntimeError};
pub use execute::ENTRY_POINT;
pub use external::FunctionRegistry;
pub use machine::VM;
pub use variables::VariableTable;

use nxsl_common::{Program, Value};

/// Run a program with default limits and return its result.
///
/// PRINT output goes to stdout. The result is the EXIT operand or the value
/// `main` returned, `None` if execution ran off the end of the code.
///
/// # Errors
///
/// Returns [`RuntimeError`] if the script halts on an error.
pub fn run(program: &Program) -> Result<Option<Value>, RuntimeError> {
    let mut vm = VM::new(program);
    vm.run()?;
    Ok(vm.result().cloned())
}
