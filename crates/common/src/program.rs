//! Program representation: the instruction sequence and its function table.
//!
//! Addresses are positions in the instruction vector. The only way to assign
//! one is [`Program::add_instruction`], so an address never moves once handed
//! out.

use std::collections::BTreeMap;

use crate::error::ProgramError;
use crate::instruction::{bounded_name, Instruction, Operand};
use crate::opcode::Opcode;

/// A compiled NXSL program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    instructions: Vec<Instruction>,
    functions: BTreeMap<String, usize>,
    /// Addresses of jumps still waiting for a target, oldest first.
    pending_jumps: Vec<usize>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a program from an instruction sequence with an empty function
    /// table.
    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        let mut program = Self::new();
        for instr in instructions {
            program.add_instruction(instr);
        }
        program
    }

    /// Append an instruction and return its address.
    pub fn add_instruction(&mut self, instr: Instruction) -> usize {
        let address = self.instructions.len();
        if instr.is_unresolved_jump() {
            self.pending_jumps.push(address);
        }
        self.instructions.push(instr);
        address
    }

    /// Patch the most recent unresolved jump with the given opcode to the
    /// current end of the sequence.
    ///
    /// Returns `false` if no such jump is pending.
    pub fn resolve_last_jump(&mut self, opcode: Opcode) -> bool {
        let end = self.end_address();
        let Some(pos) = self
            .pending_jumps
            .iter()
            .rposition(|&addr| self.instructions[addr].opcode == opcode)
        else {
            return false;
        };
        let addr = self.pending_jumps.remove(pos);
        self.instructions[addr].operand = Operand::Address(Some(end));
        true
    }

    /// Register a function entry point.
    ///
    /// `None` uses the current end of the sequence, i.e. the address of the
    /// next instruction to be added.
    pub fn add_function(&mut self, name: &str, address: Option<usize>) -> Result<(), ProgramError> {
        let name = bounded_name(name);
        if self.functions.contains_key(name) {
            return Err(ProgramError::DuplicateFunction(name.to_string()));
        }
        let address = address.unwrap_or(self.instructions.len());
        self.functions.insert(name.to_string(), address);
        Ok(())
    }

    /// Rewrite every call-by-name that matches a registered function into a
    /// direct call. Unmatched names are left for the host to supply.
    pub fn resolve_functions(&mut self) {
        for instr in &mut self.instructions {
            if instr.opcode != Opcode::CallExternal {
                continue;
            }
            let target = match &instr.operand {
                Operand::Name(name) => self.functions.get(name).copied(),
                _ => None,
            };
            if let Some(address) = target {
                instr.opcode = Opcode::Call;
                instr.operand = Operand::Address(Some(address));
            }
        }
    }

    /// Start address of a registered function.
    pub fn function_address(&self, name: &str) -> Option<usize> {
        self.functions.get(bounded_name(name)).copied()
    }

    /// Function table, ordered by name.
    pub fn functions(&self) -> impl Iterator<Item = (&str, usize)> {
        self.functions.iter().map(|(name, &addr)| (name.as_str(), addr))
    }

    /// The instruction sequence.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Instruction at `address`.
    pub fn instruction(&self, address: usize) -> Option<&Instruction> {
        self.instructions.get(address)
    }

    /// Address one past the last instruction.
    pub fn end_address(&self) -> usize {
        self.instructions.len()
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
