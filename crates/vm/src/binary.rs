//! Binary operators: null handling, numeric dispatch and string fallbacks.

use nxsl_common::{Number, Opcode, Value};

use crate::error::ErrorKind;
use crate::machine::VM;

impl<'a> VM<'a> {
    /// Pop right then left operand, apply `op`, push the result.
    pub(crate) fn exec_binary(&mut self, op: Opcode) -> Result<(), ErrorKind> {
        let right = self.data_stack.pop();
        let left = self.data_stack.pop();
        let (Some(left), Some(right)) = (left, right) else {
            return Err(ErrorKind::DataStackUnderflow);
        };

        let result = binary_operation(op, left, right)?;
        self.data_stack.push(result);
        Ok(())
    }
}

/// Apply a binary operator to two values.
///
/// Null operands are only allowed for EQ and NE. When both operands are
/// numeric the numeric table applies; otherwise only EQ, NE and CONCAT are
/// defined and work on the string forms. Any other operator on text is an
/// internal error.
pub fn binary_operation(op: Opcode, left: Value, right: Value) -> Result<Value, ErrorKind> {
    if !op.is_binary() {
        return Err(ErrorKind::InternalError);
    }

    if left.is_null() || right.is_null() {
        let equal = left.is_null() && right.is_null();
        return match op {
            Opcode::Eq => Ok(Value::from(equal)),
            Opcode::Ne => Ok(Value::from(!equal)),
            _ => Err(ErrorKind::NullOperandInvalid),
        };
    }

    match (left.number(), right.number()) {
        (Some(a), Some(b)) if op != Opcode::Concat => numeric_operation(op, a, b),
        _ => match op {
            Opcode::Eq => Ok(Value::from(left.as_string() == right.as_string())),
            Opcode::Ne => Ok(Value::from(left.as_string() != right.as_string())),
            Opcode::Concat => {
                let mut result = left;
                result.concatenate(&right.as_string());
                Ok(result)
            }
            _ => Err(ErrorKind::InternalError),
        },
    }
}

fn numeric_operation(op: Opcode, a: Number, b: Number) -> Result<Value, ErrorKind> {
    use Number::Int;

    let value = match op {
        Opcode::Add => arith(a, b, i64::wrapping_add, |x, y| x + y),
        Opcode::Sub => arith(a, b, i64::wrapping_sub, |x, y| x - y),
        Opcode::Mul => arith(a, b, i64::wrapping_mul, |x, y| x * y),
        Opcode::Div => match (a, b) {
            (Int(_), Int(0)) => return Err(ErrorKind::DivisionByZero),
            (Int(x), Int(y)) => Value::from(x.wrapping_div(y)),
            _ if b.as_real() == 0.0 => return Err(ErrorKind::DivisionByZero),
            _ => Value::from(a.as_real() / b.as_real()),
        },
        Opcode::Rem => match (a, b) {
            (Int(_), Int(0)) => return Err(ErrorKind::DivisionByZero),
            (Int(x), Int(y)) => Value::from(x.wrapping_rem(y)),
            _ => return Err(ErrorKind::RealOperandInvalid),
        },

        Opcode::Eq => Value::from(a == b),
        Opcode::Ne => Value::from(a != b),
        Opcode::Lt => Value::from(compare(a, b) == Some(std::cmp::Ordering::Less)),
        Opcode::Le => Value::from(matches!(
            compare(a, b),
            Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
        )),
        Opcode::Gt => Value::from(compare(a, b) == Some(std::cmp::Ordering::Greater)),
        Opcode::Ge => Value::from(matches!(
            compare(a, b),
            Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
        )),

        Opcode::BitAnd => {
            let (x, y) = ints(a, b)?;
            Value::from(x & y)
        }
        Opcode::BitOr => {
            let (x, y) = ints(a, b)?;
            Value::from(x | y)
        }
        Opcode::BitXor => {
            let (x, y) = ints(a, b)?;
            Value::from(x ^ y)
        }
        Opcode::LShift => {
            let (x, y) = ints(a, b)?;
            Value::from(x.wrapping_shl(y as u32))
        }
        // Arithmetic shift.
        Opcode::RShift => {
            let (x, y) = ints(a, b)?;
            Value::from(x.wrapping_shr(y as u32))
        }

        Opcode::And => Value::from(a.is_true() && b.is_true()),
        Opcode::Or => Value::from(a.is_true() || b.is_true()),

        _ => return Err(ErrorKind::InternalError),
    };

    Ok(value)
}

/// Int op Int stays integer (wrapping); anything involving a real is real.
fn arith(a: Number, b: Number, int_op: fn(i64, i64) -> i64, real_op: fn(f64, f64) -> f64) -> Value {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Value::from(int_op(x, y)),
        _ => Value::from(real_op(a.as_real(), b.as_real())),
    }
}

fn compare(a: Number, b: Number) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Some(x.cmp(&y)),
        _ => a.as_real().partial_cmp(&b.as_real()),
    }
}

/// Both operands as integers; integer-only operators reject reals.
fn ints(a: Number, b: Number) -> Result<(i64, i64), ErrorKind> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Ok((x, y)),
        _ => Err(ErrorKind::RealOperandInvalid),
    }
}
