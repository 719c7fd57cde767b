//! CLI command implementations.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use nxsl_common::{Number, Program, Value};
use nxsl_vm::{VmConfig, VM};
use tracing::debug;

/// A `NAME=VALUE` pair from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: Value,
}

/// Parse `NAME=VALUE`. Numeric text becomes a number, `<null>` becomes
/// null, anything else is a string.
pub fn parse_binding(text: &str) -> Result<Binding, String> {
    let (name, raw) = text
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{text}'"))?;
    if name.is_empty() {
        return Err(format!("missing name in '{text}'"));
    }

    let value = match raw {
        "<null>" => Value::Null,
        _ => match Number::parse(raw) {
            Some(n) => Value::Number(n),
            None => Value::from(raw),
        },
    };
    Ok(Binding {
        name: name.to_string(),
        value,
    })
}

/// Options of the `run` command.
#[derive(Debug)]
pub struct RunOptions {
    pub file: PathBuf,
    pub defines: Vec<Binding>,
    pub globals: Vec<Binding>,
    pub max_depth: Option<usize>,
    pub budget: Option<u64>,
    pub print_result: bool,
}

/// Read and assemble a source file. Errors are reported on stderr.
fn load(path: &Path) -> Result<Program, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{}': {e}", path.display());
        1
    })?;

    let program = nxsl_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {}: {e}", path.display());
        1
    })?;

    debug!(
        file = %path.display(),
        instructions = program.len(),
        "assembled"
    );
    Ok(program)
}

/// Assemble and execute a program.
pub fn run(options: &RunOptions) -> Result<(), i32> {
    let program = load(&options.file)?;

    let mut config = VmConfig::new();
    if let Some(depth) = options.max_depth {
        config = config.with_control_stack_limit(depth);
    }
    if let Some(budget) = options.budget {
        config = config.with_instruction_budget(budget);
    }

    let mut vm = VM::with_config(&program, config);
    for binding in &options.defines {
        vm.constants_mut().create(&binding.name, binding.value.clone());
    }
    for binding in &options.globals {
        vm.globals_mut().create(&binding.name, binding.value.clone());
    }

    match vm.run() {
        Ok(()) => {
            if options.print_result {
                match vm.result() {
                    Some(value) if !value.is_null() => println!("{value}"),
                    _ => println!("<null>"),
                }
            }
            Ok(())
        }
        Err(e) => {
            let _ = io::stdout().flush();
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

/// Print the disassembly listing of a program.
pub fn dump(file: &Path) -> Result<(), i32> {
    let program = load(file)?;
    let stdout = io::stdout();
    nxsl_assembler::dump(&program, &mut stdout.lock()).map_err(|e| {
        eprintln!("error: cannot write listing: {e}");
        1
    })
}

/// Assemble a program without running it.
pub fn check(file: &Path) -> Result<(), i32> {
    let program = load(file)?;
    println!(
        "OK: {} ({} instructions, {} functions)",
        file.display(),
        program.len(),
        program.functions().count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_numbers_and_strings() {
        assert_eq!(
            parse_binding("LIMIT=100").unwrap(),
            Binding {
                name: "LIMIT".to_string(),
                value: Value::from(100),
            }
        );
        assert_eq!(parse_binding("ratio=0.5").unwrap().value, Value::from(0.5));
        assert_eq!(parse_binding("greeting=hi there").unwrap().value, Value::from("hi there"));
        assert_eq!(parse_binding("empty=").unwrap().value, Value::from(""));
        assert_eq!(parse_binding("nothing=<null>").unwrap().value, Value::Null);
    }

    #[test]
    fn binding_value_may_contain_equals() {
        assert_eq!(parse_binding("expr=a=b").unwrap().value, Value::from("a=b"));
    }

    #[test]
    fn binding_errors() {
        assert!(parse_binding("LIMIT").is_err());
        assert!(parse_binding("=5").is_err());
    }
}
