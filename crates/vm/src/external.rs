//! Host-supplied functions callable from scripts.
//!
//! A call whose name does not match a script function stays a by-name call
//! and is dispatched here at run time.

use std::collections::HashMap;
use std::fmt;

use nxsl_common::instruction::bounded_name;
use nxsl_common::Value;

use crate::error::ExternalError;

/// Signature of a host function: arguments in call order, one result.
pub type Handler = Box<dyn Fn(&[Value]) -> Result<Value, ExternalError>>;

/// A registered host function.
pub struct ExternalFunction {
    /// Required argument count; `None` accepts any number.
    pub arg_count: Option<usize>,
    pub handler: Handler,
}

impl fmt::Debug for ExternalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalFunction")
            .field("arg_count", &self.arg_count)
            .finish_non_exhaustive()
    }
}

/// Name → host function registry. Empty by default.
///
/// Names are clipped to the script identifier length, so a host function is
/// found under the same name a CALL instruction carries.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, ExternalFunction>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a host function.
    pub fn register<F>(&mut self, name: &str, arg_count: Option<usize>, handler: F)
    where
        F: Fn(&[Value]) -> Result<Value, ExternalError> + 'static,
    {
        self.functions.insert(
            bounded_name(name).to_string(),
            ExternalFunction {
                arg_count,
                handler: Box::new(handler),
            },
        );
    }

    /// Look up a host function by name.
    pub fn get(&self, name: &str) -> Option<&ExternalFunction> {
        self.functions.get(bounded_name(name))
    }
}
