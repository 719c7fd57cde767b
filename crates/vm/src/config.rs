//! VM configuration.
//!
//! Limits only; the VM enforces them.

/// Default maximum call nesting.
pub const CONTROL_STACK_LIMIT: usize = 32_768;

/// Runtime limits for a [`VM`](crate::VM).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    /// Maximum call depth. A CALL made at this depth fails with
    /// control stack overflow.
    pub control_stack_limit: usize,

    /// Maximum number of instructions a single run may execute.
    /// `None` means unbounded.
    pub instruction_budget: Option<u64>,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            control_stack_limit: CONTROL_STACK_LIMIT,
            instruction_budget: None,
        }
    }
}

impl VmConfig {
    /// Configuration with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum call depth.
    pub fn with_control_stack_limit(mut self, limit: usize) -> Self {
        self.control_stack_limit = limit;
        self
    }

    /// Cap the number of instructions per run.
    pub fn with_instruction_budget(mut self, budget: u64) -> Self {
        self.instruction_budget = Some(budget);
        self
    }
}
