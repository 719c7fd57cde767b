//! Named variables and the scoped tables that hold them.

use std::collections::HashMap;

use nxsl_common::instruction::bounded_name;
use nxsl_common::Value;

/// A named, mutable value container.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    value: Value,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replace the value. The old value is dropped.
    pub fn set(&mut self, value: Value) {
        self.value = value;
    }
}

/// Insertion-ordered mapping from name to [`Variable`].
///
/// A running VM holds three: constants, globals and the locals of the
/// active call frame.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    variables: Vec<Variable>,
    index: HashMap<String, usize>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a variable by name.
    pub fn find(&self, name: &str) -> Option<&Variable> {
        self.index
            .get(bounded_name(name))
            .map(|&i| &self.variables[i])
    }

    /// Mutable lookup by name.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Variable> {
        match self.index.get(bounded_name(name)) {
            Some(&i) => Some(&mut self.variables[i]),
            None => None,
        }
    }

    /// Value of a variable, if it exists.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.find(name).map(Variable::value)
    }

    /// Create a new variable.
    ///
    /// Callers check [`find`](Self::find) first; creating a name twice
    /// replaces the earlier binding's value rather than adding a second entry.
    pub fn create(&mut self, name: &str, value: Value) -> &mut Variable {
        let name = bounded_name(name);
        if let Some(&i) = self.index.get(name) {
            let var = &mut self.variables[i];
            var.set(value);
            return var;
        }
        let i = self.variables.len();
        self.index.insert(name.to_string(), i);
        self.variables.push(Variable {
            name: name.to_string(),
            value,
        });
        &mut self.variables[i]
    }

    /// Assign to a variable, creating it if needed.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.find_mut(name) {
            Some(var) => var.set(value),
            None => {
                self.create(name, value);
            }
        }
    }

    /// Variables in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
