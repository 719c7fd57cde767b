//! Tokenizer for NXSL assembly text.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::AsmError;

/// A single token from an assembly line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// Mnemonic or name, case preserved.
    Ident(String),
    /// Numeric literal, kept as written. Its meaning (hex address, count,
    /// constant) depends on the instruction.
    Number(String),
    /// String literal with escapes already applied.
    Str(String),
    /// `<null>`
    Null,
    Comma,
    Colon,
    /// `?`, an unresolved jump target.
    Question,
    /// `.name`, without the dot.
    Directive(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) | Token::Number(s) => f.write_str(s),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Null => f.write_str("<null>"),
            Token::Comma => f.write_str(","),
            Token::Colon => f.write_str(":"),
            Token::Question => f.write_str("?"),
            Token::Directive(s) => write!(f, ".{s}"),
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Tokenize a single line of assembly text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `;` outside a string and extend to end of line.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            ';' => break,
            c if c.is_whitespace() => {
                chars.next();
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            ':' => {
                chars.next();
                tokens.push(Token::Colon);
            }
            '?' => {
                chars.next();
                tokens.push(Token::Question);
            }
            '"' => {
                chars.next();
                tokens.push(Token::Str(read_string(&mut chars, line_num)?));
            }
            '<' => {
                let rest = &line[start..];
                if rest.starts_with("<null>") {
                    tokens.push(Token::Null);
                    for _ in 0.."<null>".len() {
                        chars.next();
                    }
                } else {
                    return Err(unexpected(rest, line_num));
                }
            }
            '.' => {
                chars.next();
                let name = take_while(&mut chars, line, is_name_char);
                if name.is_empty() {
                    return Err(unexpected(&line[start..], line_num));
                }
                tokens.push(Token::Directive(name.to_string()));
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' => {
                chars.next();
                let rest = take_while(&mut chars, line, |c| {
                    c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '+'
                });
                tokens.push(Token::Number(format!("{c}{rest}")));
            }
            c if is_name_start(c) => {
                let name = take_while(&mut chars, line, is_name_char);
                tokens.push(Token::Ident(name.to_string()));
            }
            _ => return Err(unexpected(&line[start..], line_num)),
        }
    }

    Ok(tokens)
}

/// Consume characters while `pred` holds and return them as a slice of `line`.
fn take_while<'l>(
    chars: &mut Peekable<CharIndices<'_>>,
    line: &'l str,
    pred: impl Fn(char) -> bool,
) -> &'l str {
    let start = match chars.peek() {
        Some(&(i, _)) => i,
        None => return "",
    };
    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if !pred(c) {
            break;
        }
        end = i + c.len_utf8();
        chars.next();
    }
    &line[start..end]
}

/// Read a string literal body; the opening quote is already consumed.
fn read_string(chars: &mut Peekable<CharIndices<'_>>, line_num: usize) -> Result<String, AsmError> {
    let mut text = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            '"' => return Ok(text),
            '\\' => match chars.next() {
                Some((_, '"')) => text.push('"'),
                Some((_, '\\')) => text.push('\\'),
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, other)) => {
                    return Err(AsmError::UnexpectedToken {
                        line: line_num,
                        token: format!("\\{other}"),
                    })
                }
                None => break,
            },
            c => text.push(c),
        }
    }
    Err(AsmError::UnterminatedString { line: line_num })
}

/// Error for the first whitespace-delimited word of `rest`.
fn unexpected(rest: &str, line_num: usize) -> AsmError {
    let token = rest.split_whitespace().next().unwrap_or(rest);
    AsmError::UnexpectedToken {
        line: line_num,
        token: token.to_string(),
    }
}
