//! Integration tests for the NXSL assembler.
//!
//! Tests cover:
//! - The sample programs under `tests/programs/` (assemble and execute)
//! - Listing format of assembled programs
//! - Error cases with their line numbers

use nxsl_assembler::{assemble, disassemble, AsmError};
use nxsl_common::{Opcode, Program, Value};
use nxsl_vm::{ErrorKind, RuntimeError, VM};

// ---- Test helpers ----

const HELLO: &str = include_str!("../../../tests/programs/hello.nxa");
const FACTORIAL: &str = include_str!("../../../tests/programs/factorial.nxa");
const SUM: &str = include_str!("../../../tests/programs/sum.nxa");
const DIV_ZERO: &str = include_str!("../../../tests/programs/div_zero.nxa");
const NO_MAIN: &str = include_str!("../../../tests/programs/no_main.nxa");
const BAD_OPCODE: &str = include_str!("../../../tests/programs/bad_opcode.nxa");

/// Outcome of running a program: result or error, plus everything printed.
struct Outcome {
    result: Result<Option<Value>, RuntimeError>,
    output: String,
}

fn execute(program: &Program, setup: impl FnOnce(&mut VM<'_>)) -> Outcome {
    let mut output = Vec::new();
    let result = {
        let mut vm = VM::new(program).with_output(&mut output);
        setup(&mut vm);
        vm.run().map(|()| vm.result().cloned())
    };
    Outcome {
        result,
        output: String::from_utf8(output).unwrap(),
    }
}

fn assemble_and_run(text: &str) -> Outcome {
    let program = assemble(text).unwrap();
    execute(&program, |_| {})
}

// ---- Sample programs ----

#[test]
fn hello_prints_greeting() {
    let outcome = assemble_and_run(HELLO);
    assert_eq!(outcome.result, Ok(Some(Value::from(0))));
    assert_eq!(outcome.output, "Hello, world!\n");
}

#[test]
fn factorial_of_ten() {
    let outcome = assemble_and_run(FACTORIAL);
    assert_eq!(outcome.result, Ok(Some(Value::from(3_628_800))));
    assert_eq!(outcome.output, "3628800\n");
}

#[test]
fn factorial_calls_are_direct() {
    let program = assemble(FACTORIAL).unwrap();
    let fact = program.function_address("fact").unwrap();
    let calls: Vec<_> = program
        .instructions()
        .iter()
        .filter(|i| i.opcode == Opcode::Call)
        .collect();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|i| i.address() == Some(fact)));
}

#[test]
fn sum_uses_host_constant() {
    let program = assemble(SUM).unwrap();
    let outcome = execute(&program, |vm| {
        vm.constants_mut().create("LIMIT", Value::from(100));
    });
    assert_eq!(outcome.result, Ok(Some(Value::from(5050))));
    assert_eq!(outcome.output, "sum=5050\n");
}

#[test]
fn sum_without_constant_fails_on_null() {
    let outcome = assemble_and_run(SUM);
    let err = outcome.result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NullOperandInvalid);
    // The LE at the loop head.
    assert_eq!(err.line, 11);
}

#[test]
fn runtime_error_carries_line_directive() {
    let outcome = assemble_and_run(DIV_ZERO);
    assert_eq!(
        outcome.result.unwrap_err().to_string(),
        "Error 9 in line 42: Division by zero"
    );
}

#[test]
fn program_without_main() {
    let outcome = assemble_and_run(NO_MAIN);
    assert_eq!(
        outcome.result.unwrap_err().kind,
        ErrorKind::MissingEntryPoint
    );
}

#[test]
fn unknown_opcode_in_sample() {
    assert_eq!(
        assemble(BAD_OPCODE).unwrap_err(),
        AsmError::UnknownOpcode {
            line: 3,
            token: "FROB".to_string()
        }
    );
}

// ---- Scenarios ----

#[test]
fn assignment_scenario() {
    let text = "\
main:
    PUSH 1
    PUSH 0
    ADD
    SET a
    POP 1
    PUSH a
    RET
";
    let program = assemble(text).unwrap();
    let mut vm = VM::new(&program);
    assert_eq!(vm.run(), Ok(()));
    assert_eq!(vm.locals().get("a"), Some(&Value::from(1)));
}

#[test]
fn jz_on_string_fails() {
    let text = "\
main:
    PUSH \"abc\"
    JZ ?
    PUSH 1
.resolve JZ
    EXIT
";
    let err = assemble_and_run(text).result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ConditionNotNumeric);
    assert_eq!(err.line, 3);
}

#[test]
fn missing_parameters_are_null() {
    let text = "\
main:
    PUSH \"only\"
    CALL pair, 1
    EXIT
pair:
    BIND first
    BIND second
    PUSH second
    PUSH <null>
    EQ
    RET
";
    assert_eq!(assemble_and_run(text).result, Ok(Some(Value::from(1))));
}

#[test]
fn host_function_called_by_name() {
    let text = "\
main:
    PUSH \"abc\"
    CALL strlen, 1
    EXIT
";
    let program = assemble(text).unwrap();
    let outcome = execute(&program, |vm| {
        vm.register_function("strlen", Some(1), |args| {
            Ok(Value::from(args[0].as_string().chars().count() as i64))
        });
    });
    assert_eq!(outcome.result, Ok(Some(Value::from(3))));
}

#[test]
fn nested_forward_jumps_resolve_innermost_first() {
    // Two nested ifs; the outer condition holds, the inner one does not.
    let text = "\
main:
    PUSH 1
    JZ ?
    PUSH 0
    JZ ?
    PUSH \"inner\"
    EXIT
.resolve JZ
    PUSH \"outer\"
    EXIT
.resolve JZ
    PUSH \"none\"
    EXIT
";
    let program = assemble(text).unwrap();
    assert_eq!(program.instructions()[3].address(), Some(6));
    assert_eq!(program.instructions()[1].address(), Some(8));
    assert_eq!(
        assemble_and_run(text).result,
        Ok(Some(Value::from("outer")))
    );
}

// ---- Listing ----

#[test]
fn hello_listing() {
    let program = assemble(HELLO).unwrap();
    assert_eq!(
        disassemble(&program),
        "\
0000  PUSH    \"Hello, world!\\n\"
0001  PRINT
0002  PUSH    \"0\"
0003  EXIT
"
    );
}

#[test]
fn listing_shows_unresolved_jumps() {
    let program = assemble("main:\nJMP ?\nJZ 0000\n").unwrap();
    assert_eq!(
        disassemble(&program),
        "0000  JMP     ????\n0001  JZ      0000\n"
    );
}

#[test]
fn listing_of_factorial_calls() {
    let listing = disassemble(&assemble(FACTORIAL).unwrap());
    assert!(listing.contains("0001  CALL    0008, 1\n"));
    assert!(listing.contains("0008  BIND    n\n"));
}

#[test]
fn listing_lines_have_no_trailing_whitespace() {
    let listing = disassemble(&assemble(SUM).unwrap());
    for line in listing.lines() {
        assert_eq!(line, line.trim_end());
    }
}

// ---- Errors ----

#[test]
fn error_missing_argument() {
    let err = assemble("main:\nPOP\n").unwrap_err();
    assert!(matches!(err, AsmError::MissingArgument { line: 2, opcode: "POP", .. }));
}

#[test]
fn error_invalid_number() {
    let err = assemble("main:\nPOP x1\n").unwrap_err();
    assert!(matches!(err, AsmError::UnexpectedToken { line: 2, .. }));

    let err = assemble("main:\nPOP 1.5\n").unwrap_err();
    assert_eq!(
        err,
        AsmError::InvalidNumber {
            line: 2,
            token: "1.5".to_string()
        }
    );
}

#[test]
fn error_invalid_address() {
    let err = assemble("main:\n\nJMP 12G4\n").unwrap_err();
    assert_eq!(err.line(), 3);
    assert!(matches!(err, AsmError::InvalidAddress { .. }));
}

#[test]
fn error_unterminated_string() {
    let err = assemble("main:\nPUSH \"abc\n").unwrap_err();
    assert_eq!(err, AsmError::UnterminatedString { line: 2 });
}

#[test]
fn error_trailing_tokens() {
    let err = assemble("main:\nEXIT now\n").unwrap_err();
    assert_eq!(
        err,
        AsmError::UnexpectedToken {
            line: 2,
            token: "now".to_string()
        }
    );
}

#[test]
fn error_duplicate_function_is_reported_once() {
    let err = assemble("main:\nNRET\nmain:\nNRET\n").unwrap_err();
    assert_eq!(err.to_string(), "line 3: duplicate function name \"main\"");
}

#[test]
fn mnemonics_are_case_insensitive_names_are_not() {
    let text = "\
main:
    push 1
    set Value
    pop 1
    push value
    exit
";
    assert_eq!(assemble_and_run(text).result, Ok(Some(Value::Null)));
}
