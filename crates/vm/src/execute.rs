//! Run loop and opcode dispatch for the NXSL VM.

use std::io::Write;

use nxsl_common::{Instruction, Opcode, Operand, Value};
use tracing::{debug, trace, warn};

use crate::error::{ErrorKind, RuntimeError};
use crate::machine::{CallFrame, VM};

/// Name of the function execution starts at.
pub const ENTRY_POINT: &str = "main";

impl<'a> VM<'a> {
    /// Run the program from `main` until it returns, exits, runs off the end
    /// of the code, or fails.
    ///
    /// `Ok(())` means the script halted cleanly; the error text of a failed
    /// run is also kept for [`error_text`](Self::error_text).
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        self.reset();

        let Some(entry) = self.program.function_address(ENTRY_POINT) else {
            self.fail(ErrorKind::MissingEntryPoint);
            return Err(self.last_error());
        };

        debug!(entry, code_size = self.program.len(), "script started");
        self.pc = Some(entry);
        let end = self.program.end_address();

        while let Some(pc) = self.pc {
            if pc >= end {
                break;
            }
            if let Some(budget) = self.config.instruction_budget {
                if self.steps >= budget {
                    self.fail(ErrorKind::InstructionBudgetExhausted);
                    break;
                }
            }
            self.execute();
        }

        match self.pc {
            Some(_) => {
                debug!(steps = self.steps, "script finished");
                Ok(())
            }
            None => Err(self.last_error()),
        }
    }

    fn last_error(&self) -> RuntimeError {
        self.error
            .clone()
            .unwrap_or_else(|| ErrorKind::InternalError.at(0))
    }

    /// Execute the instruction at the pointer and advance it.
    ///
    /// A failing instruction leaves the pointer at the halt sentinel; the run
    /// loop sees that and stops.
    pub fn execute(&mut self) {
        let (Some(pc), Some(instr)) = (self.pc, self.fetch()) else {
            return;
        };
        self.steps += 1;
        trace!(pc, op = instr.opcode.mnemonic(), depth = self.depth, "exec");

        match self.step(pc, instr) {
            Ok(next) => {
                if self.pc.is_some() {
                    self.pc = Some(next);
                }
            }
            Err(kind) => self.fail(kind),
        }
    }

    /// Dispatch one instruction. Returns the address to continue at.
    fn step(&mut self, pc: usize, instr: &Instruction) -> Result<usize, ErrorKind> {
        let mut next = pc + 1;

        match instr.opcode {
            Opcode::Nop => {}
            Opcode::PushConstant => {
                let value = instr.constant().ok_or(ErrorKind::InternalError)?;
                self.data_stack.push(value.clone());
            }
            Opcode::PushVariable => {
                let name = instr.name().ok_or(ErrorKind::InternalError)?;
                let value = self.load_variable(name);
                self.data_stack.push(value);
            }
            Opcode::Set => self.exec_set(instr)?,
            Opcode::Pop => {
                for _ in 0..instr.stack_items {
                    self.pop()?;
                }
            }
            Opcode::Jmp => next = jump_target(instr)?,
            Opcode::Jz => {
                let cond = self.pop()?;
                let target = jump_target(instr)?;
                let n = cond.number().ok_or(ErrorKind::ConditionNotNumeric)?;
                if n.as_int() == 0 {
                    next = target;
                }
            }
            Opcode::Call => {
                let target = instr.address().ok_or(ErrorKind::InternalError)?;
                next = self.exec_call(pc, target, instr.stack_items)?;
            }
            Opcode::CallExternal => self.exec_call_external(instr)?,
            Opcode::Bind => self.exec_bind(instr)?,
            Opcode::RetNull => {
                self.data_stack.push(Value::Null);
                next = self.exec_return()?;
            }
            Opcode::Return => next = self.exec_return()?,
            Opcode::Print => {
                let value = self.pop()?;
                if let Err(e) = self.output.write_all(value.as_string().as_bytes()) {
                    warn!(error = %e, "PRINT output failed");
                }
            }
            Opcode::Exit => {
                let value = self.pop()?;
                self.result = Some(value);
                next = self.program.end_address();
            }
            op if op.is_binary() => self.exec_binary(op)?,
            _ => return Err(ErrorKind::InternalError),
        }

        Ok(next)
    }

    fn exec_set(&mut self, instr: &Instruction) -> Result<(), ErrorKind> {
        let name = instr.name().ok_or(ErrorKind::InternalError)?;
        match self.data_stack.peek() {
            Some(value) => {
                let value = value.clone();
                self.store_variable(name, value);
                Ok(())
            }
            None => {
                self.load_variable(name);
                Err(ErrorKind::DataStackUnderflow)
            }
        }
    }

    /// Enter a script function. Arguments are popped into `$1..$N` of a fresh
    /// locals table; the last pushed argument becomes `$N`.
    fn exec_call(&mut self, pc: usize, target: usize, arg_count: usize) -> Result<usize, ErrorKind> {
        if self.depth >= self.config.control_stack_limit {
            return Err(ErrorKind::ControlStackOverflow);
        }

        self.depth += 1;
        let caller_locals = std::mem::take(&mut self.locals);
        self.control_stack.push(CallFrame {
            return_address: pc + 1,
            saved_locals: caller_locals,
        });
        self.bind_pos = 1;
        trace!(target, arg_count, depth = self.depth, "call");

        for i in (1..=arg_count).rev() {
            let value = self.pop()?;
            self.locals.create(&format!("${i}"), value);
        }

        Ok(target)
    }

    /// Leave the current function, or halt if this is `main`.
    fn exec_return(&mut self) -> Result<usize, ErrorKind> {
        if self.depth == 0 {
            self.result = self.data_stack.pop();
            return Ok(self.program.end_address());
        }

        let frame = self
            .control_stack
            .pop()
            .ok_or(ErrorKind::ControlStackUnderflow)?;
        self.depth -= 1;
        self.locals = frame.saved_locals;
        trace!(to = frame.return_address, depth = self.depth, "return");
        Ok(frame.return_address)
    }

    /// Alias the next positional argument to a named local. Missing
    /// arguments bind as null.
    fn exec_bind(&mut self, instr: &Instruction) -> Result<(), ErrorKind> {
        let name = instr.name().ok_or(ErrorKind::InternalError)?;
        let positional = format!("${}", self.bind_pos);
        self.bind_pos += 1;

        let value = self.locals.get(&positional).cloned().unwrap_or_default();
        self.locals.set(name, value);
        Ok(())
    }

    fn exec_call_external(&mut self, instr: &Instruction) -> Result<(), ErrorKind> {
        let name = instr.name().ok_or(ErrorKind::InternalError)?;
        let arg_count = instr.stack_items;

        let func = self
            .externals
            .get(name)
            .ok_or_else(|| ErrorKind::FunctionNotFound(name.to_string()))?;
        if func.arg_count.is_some_and(|n| n != arg_count) {
            return Err(ErrorKind::BadArgumentCount(name.to_string()));
        }

        let mut args = Vec::with_capacity(arg_count);
        for _ in 0..arg_count {
            args.push(self.data_stack.pop().ok_or(ErrorKind::DataStackUnderflow)?);
        }
        args.reverse();

        let value = (func.handler)(&args).map_err(|e| ErrorKind::ExternalFunctionFailed {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        trace!(name, arg_count, "external call");
        self.data_stack.push(value);
        Ok(())
    }
}

/// The address operand of a jump or call.
fn jump_target(instr: &Instruction) -> Result<usize, ErrorKind> {
    match instr.operand {
        Operand::Address(Some(addr)) => Ok(addr),
        _ => Err(ErrorKind::InternalError),
    }
}
