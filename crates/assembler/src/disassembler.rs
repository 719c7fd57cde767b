//! Disassembler: program → human-readable listing.
//!
//! One line per instruction: a 4-digit hex address, the mnemonic padded to
//! six columns, then the operand if there is one.

use std::io;

use nxsl_common::{Instruction, Opcode, Operand, Program};

/// Render the whole program as a listing. Every line ends with `\n`.
pub fn disassemble(program: &Program) -> String {
    let mut out = String::new();
    for (addr, instr) in program.instructions().iter().enumerate() {
        out.push_str(&format_instruction(addr, instr));
        out.push('\n');
    }
    out
}

/// Write the listing to `writer`.
pub fn dump<W: io::Write>(program: &Program, writer: &mut W) -> io::Result<()> {
    for (addr, instr) in program.instructions().iter().enumerate() {
        writeln!(writer, "{}", format_instruction(addr, instr))?;
    }
    Ok(())
}

/// One listing line, without the newline.
pub fn format_instruction(addr: usize, instr: &Instruction) -> String {
    let mnemonic = instr.opcode.mnemonic();
    match operand_text(instr) {
        Some(operand) => format!("{addr:04X}  {mnemonic:<6}  {operand}"),
        None => format!("{addr:04X}  {mnemonic}"),
    }
}

fn operand_text(instr: &Instruction) -> Option<String> {
    match instr.opcode {
        Opcode::Jmp | Opcode::Jz => Some(match instr.operand {
            Operand::Address(Some(target)) => format!("{target:04X}"),
            _ => "????".to_string(),
        }),
        Opcode::Call => Some(match instr.address() {
            Some(target) => format!("{target:04X}, {}", instr.stack_items),
            None => format!("????, {}", instr.stack_items),
        }),
        Opcode::CallExternal => Some(format!(
            "{}, {}",
            instr.name().unwrap_or_default(),
            instr.stack_items
        )),
        Opcode::PushVariable | Opcode::Set | Opcode::Bind => {
            instr.name().map(str::to_string)
        }
        Opcode::PushConstant => Some(match instr.constant() {
            Some(value) if !value.is_null() => quote(&value.as_string()),
            _ => "<null>".to_string(),
        }),
        Opcode::Pop => Some(instr.stack_items.to_string()),
        _ => None,
    }
}

/// Quote a string constant using the escapes the assembler accepts.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
