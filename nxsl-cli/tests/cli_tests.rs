//! Integration tests for the NXSL CLI.
//!
//! These tests invoke the `nxsl` binary as a subprocess and check
//! exit codes, stdout, and stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(deprecated)]
fn nxsl() -> Command {
    Command::cargo_bin("nxsl").unwrap()
}

/// Return the workspace root (parent of nxsl-cli/).
fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

/// Return the absolute path to a test program file.
fn test_program(name: &str) -> PathBuf {
    workspace_root().join("tests/programs").join(name)
}

/// Write assembly text to a temp file and return its path.
fn write_source(dir: &TempDir, text: &str) -> PathBuf {
    let path = dir.path().join("test.nxa");
    fs::write(&path, text).unwrap();
    path
}

// ---- No-args / help ----

#[test]
fn no_args_prints_usage_and_exits_1() {
    nxsl()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage: nxsl"));
}

#[test]
fn help_flag_exits_0() {
    nxsl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn unknown_command_exits_1() {
    nxsl().arg("frobnicate").assert().failure().code(1);
}

// ---- Run ----

#[test]
fn run_hello() {
    nxsl()
        .arg("run")
        .arg(test_program("hello.nxa"))
        .assert()
        .success()
        .stdout("Hello, world!\n");
}

#[test]
fn run_factorial_prints_result() {
    nxsl()
        .arg("run")
        .arg(test_program("factorial.nxa"))
        .arg("--print-result")
        .assert()
        .success()
        .stdout("3628800\n3628800\n");
}

#[test]
fn run_with_define() {
    nxsl()
        .arg("run")
        .arg(test_program("sum.nxa"))
        .args(["--define", "LIMIT=10"])
        .assert()
        .success()
        .stdout("sum=55\n");
}

#[test]
fn run_with_global() {
    nxsl()
        .arg("run")
        .arg(test_program("sum.nxa"))
        .args(["--global", "LIMIT=4"])
        .assert()
        .success()
        .stdout("sum=10\n");
}

#[test]
fn run_without_define_is_runtime_error() {
    nxsl()
        .arg("run")
        .arg(test_program("sum.nxa"))
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains(
            "runtime error: Error 5 in line 11: Invalid operation with NULL value",
        ));
}

#[test]
fn run_division_by_zero_exits_3() {
    nxsl()
        .arg("run")
        .arg(test_program("div_zero.nxa"))
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Error 9 in line 42: Division by zero"));
}

#[test]
fn run_without_main_exits_3() {
    nxsl()
        .arg("run")
        .arg(test_program("no_main.nxa"))
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("main() function not present"));
}

#[test]
fn run_bad_assembly_exits_1() {
    nxsl()
        .arg("run")
        .arg(test_program("bad_opcode.nxa"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("line 3: unknown opcode 'FROB'"));
}

#[test]
fn run_missing_file_exits_1() {
    nxsl()
        .args(["run", "nonexistent.nxa"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn run_budget_stops_loop() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "main:\n    JMP 0000\n");

    nxsl()
        .arg("run")
        .arg(&src)
        .args(["--budget", "1000"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Instruction budget exhausted"));
}

#[test]
fn run_max_depth() {
    nxsl()
        .arg("run")
        .arg(test_program("factorial.nxa"))
        .args(["--max-depth", "3"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Control stack overflow"));
}

#[test]
fn run_bad_define_exits_1() {
    nxsl()
        .arg("run")
        .arg(test_program("sum.nxa"))
        .args(["--define", "LIMIT"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("NAME=VALUE"));
}

#[test]
fn print_result_of_null() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "main:\n    NRET\n");

    nxsl()
        .arg("run")
        .arg(&src)
        .arg("--print-result")
        .assert()
        .success()
        .stdout("<null>\n");
}

// ---- Dump ----

#[test]
fn dump_hello() {
    nxsl()
        .arg("dump")
        .arg(test_program("hello.nxa"))
        .assert()
        .success()
        .stdout("0000  PUSH    \"Hello, world!\\n\"\n0001  PRINT\n0002  PUSH    \"0\"\n0003  EXIT\n");
}

#[test]
fn dump_shows_unresolved_jump() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "main:\n    JZ ?\n");

    nxsl()
        .arg("dump")
        .arg(&src)
        .assert()
        .success()
        .stdout("0000  JZ      ????\n");
}

// ---- Check ----

#[test]
fn check_reports_counts() {
    nxsl()
        .arg("check")
        .arg(test_program("factorial.nxa"))
        .assert()
        .success()
        .stdout(predicate::str::contains("22 instructions, 2 functions"));
}

#[test]
fn check_duplicate_function_exits_1() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "main:\n    NRET\nmain:\n    NRET\n");

    nxsl()
        .arg("check")
        .arg(&src)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("duplicate function name \"main\""));
}

// ---- Logging ----

#[test]
fn verbose_logs_to_stderr() {
    nxsl()
        .env_remove("RUST_LOG")
        .arg("-v")
        .arg("run")
        .arg(test_program("hello.nxa"))
        .assert()
        .success()
        .stdout("Hello, world!\n")
        .stderr(predicate::str::contains("script finished"));
}
