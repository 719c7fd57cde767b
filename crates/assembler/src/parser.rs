//! Parser for NXSL assembly tokens → lines of a program.
//!
//! Dispatches on the mnemonic to the operand form it takes.

use crate::error::AsmError;
use crate::lexer::Token;
use nxsl_common::opcode::ALL_OPCODES;
use nxsl_common::{Instruction, Number, Opcode, Value};

/// Meaning of a single assembly line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Line {
    /// Blank or comment-only.
    Empty,
    /// `name:` starts a function here.
    Label(String),
    /// `.line N`
    SourceLine(u32),
    /// `.resolve JMP|JZ`
    Resolve(Opcode),
    Instruction(Instruction),
}

/// Opcodes written without an operand. PUSH and CALL are not listed: their
/// opcode depends on the operand.
fn lookup_opcode(mnemonic: &str) -> Option<Opcode> {
    let upper = mnemonic.to_ascii_uppercase();
    ALL_OPCODES
        .iter()
        .find(|op| op.mnemonic() == upper)
        .copied()
}

/// Parse the tokens of one line.
///
/// `source_line` is recorded on the instruction the line produces.
pub(crate) fn parse_line(tokens: &[Token], line: usize, source_line: u32) -> Result<Line, AsmError> {
    let Some(first) = tokens.first() else {
        return Ok(Line::Empty);
    };
    let args = &tokens[1..];

    let mnemonic = match first {
        Token::Ident(s) => s.as_str(),
        Token::Directive(name) => return parse_directive(name, args, line),
        other => return Err(unexpected(other, line)),
    };

    if let Some(Token::Colon) = args.first() {
        expect_end(&args[1..], line)?;
        return Ok(Line::Label(mnemonic.to_string()));
    }

    let instr = match mnemonic.to_ascii_uppercase().as_str() {
        "PUSH" => {
            let instr = match args.first() {
                Some(Token::Ident(name)) => {
                    Instruction::with_name(Opcode::PushVariable, name, source_line)
                }
                Some(Token::Str(text)) => {
                    Instruction::push_constant(Value::from(text.as_str()), source_line)
                }
                Some(Token::Null) => Instruction::push_constant(Value::Null, source_line),
                Some(Token::Number(text)) => {
                    let n = Number::parse(text).ok_or_else(|| AsmError::InvalidNumber {
                        line,
                        token: text.clone(),
                    })?;
                    Instruction::push_constant(Value::Number(n), source_line)
                }
                Some(other) => return Err(unexpected(other, line)),
                None => return Err(missing(line, "PUSH", "a value or a name")),
            };
            expect_end(&args[1..], line)?;
            instr
        }

        "CALL" => {
            let target = args
                .first()
                .ok_or_else(|| missing(line, "CALL", "a target and an argument count"))?;
            expect_token(args.get(1), &Token::Comma, line, "CALL")?;
            let arg_count = expect_count(args.get(2), line, "CALL")?;
            expect_end(&args[3..], line)?;
            match target {
                Token::Ident(name) => Instruction::call_external(name, arg_count, source_line),
                Token::Number(text) => {
                    Instruction::call(parse_address(text, line)?, arg_count, source_line)
                }
                other => return Err(unexpected(other, line)),
            }
        }

        _ => {
            let opcode = lookup_opcode(mnemonic).ok_or_else(|| AsmError::UnknownOpcode {
                line,
                token: mnemonic.to_string(),
            })?;
            let name = opcode.mnemonic();

            match opcode {
                Opcode::Jmp | Opcode::Jz => {
                    let target = match args.first() {
                        Some(Token::Question) => None,
                        Some(Token::Number(text) | Token::Ident(text)) => {
                            Some(parse_address(text, line)?)
                        }
                        Some(other) => return Err(unexpected(other, line)),
                        None => return Err(missing(line, name, "an address or '?'")),
                    };
                    expect_end(&args[1..], line)?;
                    Instruction::jump(opcode, target, source_line)
                }

                Opcode::Pop => {
                    let count = expect_count(args.first(), line, name)?;
                    expect_end(&args[1..], line)?;
                    Instruction::pop(count, source_line)
                }

                Opcode::Set | Opcode::Bind => {
                    let var = match args.first() {
                        Some(Token::Ident(var)) => var,
                        Some(other) => return Err(unexpected(other, line)),
                        None => return Err(missing(line, name, "a name")),
                    };
                    expect_end(&args[1..], line)?;
                    Instruction::with_name(opcode, var, source_line)
                }

                _ => {
                    expect_end(args, line)?;
                    Instruction::new(opcode, source_line)
                }
            }
        }
    };

    Ok(Line::Instruction(instr))
}

fn parse_directive(name: &str, args: &[Token], line: usize) -> Result<Line, AsmError> {
    match name {
        "line" => {
            let n = match args.first() {
                Some(Token::Number(text)) => text.parse::<u32>().map_err(|_| {
                    AsmError::InvalidNumber {
                        line,
                        token: text.clone(),
                    }
                })?,
                Some(other) => return Err(unexpected(other, line)),
                None => return Err(missing(line, ".line", "a line number")),
            };
            expect_end(&args[1..], line)?;
            Ok(Line::SourceLine(n))
        }
        "resolve" => {
            let opcode = match args.first() {
                Some(Token::Ident(s)) if s.eq_ignore_ascii_case("JMP") => Opcode::Jmp,
                Some(Token::Ident(s)) if s.eq_ignore_ascii_case("JZ") => Opcode::Jz,
                Some(other) => return Err(unexpected(other, line)),
                None => return Err(missing(line, ".resolve", "JMP or JZ")),
            };
            expect_end(&args[1..], line)?;
            Ok(Line::Resolve(opcode))
        }
        _ => Err(AsmError::UnknownDirective {
            line,
            token: format!(".{name}"),
        }),
    }
}

/// Parse a hexadecimal code address.
fn parse_address(text: &str, line: usize) -> Result<usize, AsmError> {
    usize::from_str_radix(text, 16).map_err(|_| AsmError::InvalidAddress {
        line,
        token: text.to_string(),
    })
}

/// A decimal count (POP count, CALL argument count).
fn expect_count(token: Option<&Token>, line: usize, opcode: &'static str) -> Result<usize, AsmError> {
    match token {
        Some(Token::Number(text)) => text.parse().map_err(|_| AsmError::InvalidNumber {
            line,
            token: text.clone(),
        }),
        Some(other) => Err(unexpected(other, line)),
        None => Err(missing(line, opcode, "a count")),
    }
}

fn expect_token(
    token: Option<&Token>,
    expected: &Token,
    line: usize,
    opcode: &'static str,
) -> Result<(), AsmError> {
    match token {
        Some(t) if t == expected => Ok(()),
        Some(other) => Err(unexpected(other, line)),
        None => Err(missing(line, opcode, "a target and an argument count")),
    }
}

/// Check that there are no extra tokens.
fn expect_end(remaining: &[Token], line: usize) -> Result<(), AsmError> {
    match remaining.first() {
        Some(tok) => Err(unexpected(tok, line)),
        None => Ok(()),
    }
}

fn unexpected(token: &Token, line: usize) -> AsmError {
    AsmError::UnexpectedToken {
        line,
        token: token.to_string(),
    }
}

fn missing(line: usize, opcode: &'static str, expected: &'static str) -> AsmError {
    AsmError::MissingArgument {
        line,
        opcode,
        expected,
    }
}
