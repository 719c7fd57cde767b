//! Decoded NXSL instructions.
//!
//! An instruction is an opcode, at most one operand, an item count used by
//! POP and the call opcodes, and the source line it was compiled from.

use crate::opcode::Opcode;
use crate::value::Value;

/// Longest identifier kept for variables and functions, in bytes.
pub const MAX_NAME_LEN: usize = 63;

/// Clip an identifier to [`MAX_NAME_LEN`] bytes on a char boundary.
pub fn bounded_name(name: &str) -> &str {
    if name.len() <= MAX_NAME_LEN {
        return name;
    }
    let mut end = MAX_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// The single datum an instruction carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand.
    None,
    /// Code address. `None` marks a forward jump that is not patched yet.
    Address(Option<usize>),
    /// Variable or function name.
    Name(String),
    /// Embedded constant.
    Constant(Value),
}

/// A single NXSL instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Operand; its kind depends on the opcode.
    pub operand: Operand,
    /// Values consumed by POP, or argument count for CALL.
    pub stack_items: usize,
    /// Source line this instruction was compiled from.
    pub source_line: u32,
}

impl Instruction {
    /// Create an instruction with no operand.
    pub fn new(opcode: Opcode, source_line: u32) -> Self {
        Self {
            opcode,
            operand: Operand::None,
            stack_items: 0,
            source_line,
        }
    }

    /// PUSH of a constant value.
    pub fn push_constant(value: Value, source_line: u32) -> Self {
        Self {
            operand: Operand::Constant(value),
            ..Self::new(Opcode::PushConstant, source_line)
        }
    }

    /// Instruction with a name operand (PUSH variable, SET, BIND).
    pub fn with_name(opcode: Opcode, name: &str, source_line: u32) -> Self {
        Self {
            operand: Operand::Name(bounded_name(name).to_string()),
            ..Self::new(opcode, source_line)
        }
    }

    /// JMP or JZ. Pass `None` to leave the target unresolved.
    pub fn jump(opcode: Opcode, target: Option<usize>, source_line: u32) -> Self {
        Self {
            operand: Operand::Address(target),
            ..Self::new(opcode, source_line)
        }
    }

    /// CALL of a resolved address with `arg_count` arguments.
    pub fn call(address: usize, arg_count: usize, source_line: u32) -> Self {
        Self {
            operand: Operand::Address(Some(address)),
            stack_items: arg_count,
            ..Self::new(Opcode::Call, source_line)
        }
    }

    /// CALL by name with `arg_count` arguments.
    pub fn call_external(name: &str, arg_count: usize, source_line: u32) -> Self {
        Self {
            operand: Operand::Name(bounded_name(name).to_string()),
            stack_items: arg_count,
            ..Self::new(Opcode::CallExternal, source_line)
        }
    }

    /// POP of `count` values.
    pub fn pop(count: usize, source_line: u32) -> Self {
        Self {
            stack_items: count,
            ..Self::new(Opcode::Pop, source_line)
        }
    }

    /// The address operand, if this instruction has one and it is resolved.
    pub fn address(&self) -> Option<usize> {
        match self.operand {
            Operand::Address(addr) => addr,
            _ => None,
        }
    }

    /// The name operand, if any.
    pub fn name(&self) -> Option<&str> {
        match &self.operand {
            Operand::Name(name) => Some(name),
            _ => None,
        }
    }

    /// The embedded constant, if any.
    pub fn constant(&self) -> Option<&Value> {
        match &self.operand {
            Operand::Constant(value) => Some(value),
            _ => None,
        }
    }

    /// True for a JMP/JZ whose target has not been patched.
    pub fn is_unresolved_jump(&self) -> bool {
        self.opcode.is_jump() && matches!(self.operand, Operand::Address(None))
    }
}
