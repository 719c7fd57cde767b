//! NXSL assembler: text → [`Program`], and program → listing.
//!
//! The text form is one instruction per line, the way a compiler front end
//! would emit it. Labels register functions; `.resolve` patches forward
//! jumps the way a compiler closes an `if` or a loop.
//!
//! # Usage
//!
//! ```
//! use nxsl_assembler::{assemble, disassemble};
//!
//! let text = "\
//! main:
//!     PUSH \"hello\"
//!     EXIT
//! ";
//! let program = assemble(text).unwrap();
//! assert_eq!(program.function_address("main"), Some(0));
//! assert_eq!(disassemble(&program), "0000  PUSH    \"hello\"\n0001  EXIT\n");
//! ```
//!
//! # Syntax
//!
//! | Line | Meaning |
//! |------|---------|
//! | `name:` | function `name` starts at the next instruction |
//! | `.line N` | record source line `N` on the following instructions |
//! | `.resolve JMP` / `.resolve JZ` | point the last unresolved jump of that kind here |
//! | `PUSH "text"`, `PUSH 42`, `PUSH -1.5`, `PUSH <null>` | push a constant |
//! | `PUSH name` | push a variable |
//! | `JMP 001F`, `JZ ?` | jump to a hex address, or leave unresolved |
//! | `CALL 001F, 2` / `CALL name, 2` | direct call, or call by name |
//! | `POP 2`, `SET name`, `BIND name` | |
//!
//! Everything after `;` is a comment. Mnemonics are case-insensitive.
//! Calls by name that match a label are turned into direct calls once the
//! whole text has been read; the rest are left for the host.

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use disassembler::{disassemble, dump, format_instruction};
pub use error::AsmError;

use lexer::tokenize_line;
use nxsl_common::Program;
use parser::{parse_line, Line};

/// Assemble text into a program.
///
/// Returns the first error encountered. Fix one error at a time.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    let mut program = Program::new();
    let mut source_line: Option<u32> = None;

    for (idx, text_line) in text.lines().enumerate() {
        let line = idx + 1;
        let tokens = tokenize_line(text_line, line)?;
        let recorded = source_line.unwrap_or(line as u32);

        match parse_line(&tokens, line, recorded)? {
            Line::Empty => {}
            Line::Label(name) => {
                // add_function only fails on a name that is already taken.
                if program.add_function(&name, None).is_err() {
                    return Err(AsmError::DuplicateFunction { line, name });
                }
            }
            Line::SourceLine(n) => source_line = Some(n),
            Line::Resolve(opcode) => {
                if !program.resolve_last_jump(opcode) {
                    return Err(AsmError::NothingToResolve {
                        line,
                        opcode: opcode.mnemonic(),
                    });
                }
            }
            Line::Instruction(instr) => {
                program.add_instruction(instr);
            }
        }
    }

    program.resolve_functions();
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nxsl_common::{Opcode, Value};

    #[test]
    fn assemble_minimal() {
        let program = assemble("main:\nPUSH 42\nEXIT\n").unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(program.function_address("main"), Some(0));
        assert_eq!(program.instructions()[0].constant(), Some(&Value::from(42)));
        assert_eq!(program.instructions()[1].opcode, Opcode::Exit);
    }

    #[test]
    fn source_lines_default_to_text_lines() {
        let program = assemble("main:\n\n  PUSH 1\n  EXIT\n").unwrap();
        assert_eq!(program.instructions()[0].source_line, 3);
        assert_eq!(program.instructions()[1].source_line, 4);
    }

    #[test]
    fn line_directive_overrides() {
        let program = assemble("main:\n.line 10\nPUSH 1\nEXIT\n").unwrap();
        assert_eq!(program.instructions()[0].source_line, 10);
        assert_eq!(program.instructions()[1].source_line, 10);
    }

    #[test]
    fn assemble_with_comments_and_blanks() {
        let text = "\
; a comment
main:        ; entry point
  PUSH 42    ; the answer

  EXIT
";
        assert_eq!(assemble(text).unwrap().len(), 2);
    }

    #[test]
    fn resolve_patches_forward_jump() {
        let text = "\
main:
  PUSH 0
  JZ ?
  PUSH 1
.resolve JZ
  EXIT
";
        let program = assemble(text).unwrap();
        assert_eq!(program.instructions()[1].address(), Some(3));
    }

    #[test]
    fn calls_by_name_resolve_to_labels() {
        let text = "\
main:
  CALL helper, 0
  CALL host_fn, 0
  EXIT
helper:
  NRET
";
        let program = assemble(text).unwrap();
        let instrs = program.instructions();
        assert_eq!(instrs[0].opcode, Opcode::Call);
        assert_eq!(instrs[0].address(), Some(3));
        assert_eq!(instrs[1].opcode, Opcode::CallExternal);
        assert_eq!(instrs[1].name(), Some("host_fn"));
    }

    #[test]
    fn error_duplicate_label() {
        let err = assemble("f:\nNRET\nf:\nNRET\n").unwrap_err();
        assert_eq!(
            err,
            AsmError::DuplicateFunction {
                line: 3,
                name: "f".to_string()
            }
        );
    }

    #[test]
    fn error_nothing_to_resolve() {
        let err = assemble("main:\nJMP ?\n.resolve JZ\n").unwrap_err();
        assert_eq!(
            err,
            AsmError::NothingToResolve {
                line: 3,
                opcode: "JZ"
            }
        );
    }

    #[test]
    fn error_reports_correct_line() {
        let err = assemble("main:\nEXIT\nFOOBAR\n").unwrap_err();
        assert!(matches!(err, AsmError::UnknownOpcode { line: 3, .. }));
    }
}
