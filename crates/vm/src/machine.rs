//! VM state management: variable tables, stacks, call frames, host functions.

use std::io::{self, Write};

use nxsl_common::{Instruction, Program, Value};

use crate::config::VmConfig;
use crate::error::{ErrorKind, ExternalError, RuntimeError};
use crate::external::FunctionRegistry;
use crate::stack::Stack;
use crate::variables::VariableTable;

/// Saved state of a caller, pushed by CALL and popped by RET.
#[derive(Debug)]
pub struct CallFrame {
    /// Instruction index to continue at after the callee returns.
    pub return_address: usize,
    /// The caller's locals, restored on return.
    pub saved_locals: VariableTable,
}

/// The NXSL virtual machine.
///
/// Borrows a compiled [`Program`] and owns everything that changes while it
/// runs. Independent VMs share no state, so several can run the same program
/// on different threads.
pub struct VM<'a> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    pub(crate) config: VmConfig,
    pub(crate) constants: VariableTable,
    pub(crate) globals: VariableTable,
    /// Locals of the active call frame.
    pub(crate) locals: VariableTable,
    /// Expression evaluation stack.
    pub(crate) data_stack: Stack<Value>,
    /// One frame per active call.
    pub(crate) control_stack: Stack<CallFrame>,
    pub(crate) externals: FunctionRegistry,
    /// Instruction pointer. `None` once a fatal error halted the run.
    pub(crate) pc: Option<usize>,
    /// Current call depth (0 inside `main`).
    pub(crate) depth: usize,
    /// Next positional argument BIND will alias (`$1`, `$2`, ...).
    pub(crate) bind_pos: usize,
    /// Instructions executed in the current run.
    pub(crate) steps: u64,
    pub(crate) error: Option<RuntimeError>,
    pub(crate) result: Option<Value>,
    /// Sink for PRINT.
    pub(crate) output: Box<dyn Write + 'a>,
}

impl<'a> VM<'a> {
    /// Create a VM for `program` with default limits, printing to stdout.
    pub fn new(program: &'a Program) -> Self {
        Self::with_config(program, VmConfig::default())
    }

    /// Create a VM with explicit limits.
    pub fn with_config(program: &'a Program, config: VmConfig) -> Self {
        Self {
            program,
            config,
            constants: VariableTable::new(),
            globals: VariableTable::new(),
            locals: VariableTable::new(),
            data_stack: Stack::new(),
            control_stack: Stack::new(),
            externals: FunctionRegistry::new(),
            pc: None,
            depth: 0,
            bind_pos: 1,
            steps: 0,
            error: None,
            result: None,
            output: Box::new(io::stdout()),
        }
    }

    /// Redirect PRINT output.
    pub fn with_output<W: Write + 'a>(mut self, output: W) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Register a host function callable by name from scripts.
    pub fn register_function<F>(&mut self, name: &str, arg_count: Option<usize>, handler: F)
    where
        F: Fn(&[Value]) -> Result<Value, ExternalError> + 'static,
    {
        self.externals.register(name, arg_count, handler);
    }

    /// Constants table. Fill it before [`run`](Self::run).
    pub fn constants_mut(&mut self) -> &mut VariableTable {
        &mut self.constants
    }

    /// Constants table.
    pub fn constants(&self) -> &VariableTable {
        &self.constants
    }

    /// Globals table; persists across runs.
    pub fn globals(&self) -> &VariableTable {
        &self.globals
    }

    /// Globals table, for preloading before [`run`](Self::run).
    pub fn globals_mut(&mut self) -> &mut VariableTable {
        &mut self.globals
    }

    /// Locals of the active frame; after a run, those of `main`.
    pub fn locals(&self) -> &VariableTable {
        &self.locals
    }

    /// Limits this VM runs under.
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Text of the last runtime error, e.g.
    /// `Error 1 in line 3: Data stack underflow`.
    pub fn error_text(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// The last runtime error.
    pub fn error(&self) -> Option<&RuntimeError> {
        self.error.as_ref()
    }

    /// Final value of the last successful run: the EXIT operand, or the
    /// value `main` returned.
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Values currently on the data stack.
    pub fn data_stack_len(&self) -> usize {
        self.data_stack.len()
    }

    /// Current call depth.
    pub fn call_depth(&self) -> usize {
        self.depth
    }

    /// Instructions executed by the last run.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Clear per-run state. Constants and globals persist.
    pub(crate) fn reset(&mut self) {
        self.data_stack.clear();
        self.control_stack.clear();
        self.locals = VariableTable::new();
        self.pc = None;
        self.depth = 0;
        self.bind_pos = 1;
        self.steps = 0;
        self.error = None;
        self.result = None;
    }

    /// Record a fatal error and force the halt sentinel.
    pub(crate) fn fail(&mut self, kind: ErrorKind) {
        let err = kind.at(self.current_line());
        tracing::debug!(code = err.code(), error = %err, "script halted");
        self.error = Some(err);
        self.pc = None;
    }

    /// Source line of the instruction at the pointer, 0 if there is none.
    pub(crate) fn current_line(&self) -> u32 {
        self.pc
            .and_then(|pc| self.program.instruction(pc))
            .map_or(0, |instr| instr.source_line)
    }

    /// Fetch the instruction at the pointer.
    pub(crate) fn fetch(&self) -> Option<&'a Instruction> {
        let program: &'a Program = self.program;
        self.pc.and_then(|pc| program.instruction(pc))
    }

    pub(crate) fn pop(&mut self) -> Result<Value, ErrorKind> {
        self.data_stack.pop().ok_or(ErrorKind::DataStackUnderflow)
    }

    /// The table a bare name resolves to: constants, then globals, then the
    /// active locals (where unknown names get created).
    fn scope_of(&mut self, name: &str) -> &mut VariableTable {
        if self.constants.find(name).is_some() {
            &mut self.constants
        } else if self.globals.find(name).is_some() {
            &mut self.globals
        } else {
            &mut self.locals
        }
    }

    /// Read a variable, creating it as null in locals if it does not exist.
    pub(crate) fn load_variable(&mut self, name: &str) -> Value {
        let table = self.scope_of(name);
        match table.get(name) {
            Some(value) => value.clone(),
            None => {
                table.create(name, Value::Null);
                Value::Null
            }
        }
    }

    /// Assign a variable found through the lookup chain.
    pub(crate) fn store_variable(&mut self, name: &str, value: Value) {
        self.scope_of(name).set(name, value);
    }
}
