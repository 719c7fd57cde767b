//! Runtime value representation for the NXSL VM.
//!
//! Values live on the data stack and inside variables. A value is null, a
//! number, or a string. Strings whose whole text reads as a number are
//! numeric too, so script constants such as `"42"` take part in arithmetic.

use std::borrow::Cow;
use std::fmt;

/// Numeric payload of a [`Value`].
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// Signed 64-bit integer.
    Int(i64),
    /// IEEE 754 64-bit float.
    Real(f64),
}

impl Number {
    /// Integer view. Reals truncate toward zero (saturating at the i64 range).
    pub fn as_int(self) -> i64 {
        match self {
            Number::Int(i) => i,
            Number::Real(r) => r as i64,
        }
    }

    /// Floating-point view.
    pub fn as_real(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Real(r) => r,
        }
    }

    /// True for any non-zero number.
    pub fn is_true(self) -> bool {
        match self {
            Number::Int(i) => i != 0,
            Number::Real(r) => r != 0.0,
        }
    }

    /// Parse the whole of `text` as a decimal integer or real.
    ///
    /// Only digits, signs, `.` and exponent markers are accepted, so words
    /// like `inf` or `NaN` stay non-numeric.
    pub fn parse(text: &str) -> Option<Number> {
        if let Ok(i) = text.parse::<i64>() {
            return Some(Number::Int(i));
        }
        let plausible = text.bytes().any(|b| b.is_ascii_digit())
            && text
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
        if !plausible {
            return None;
        }
        text.parse::<f64>().ok().map(Number::Real)
    }
}

// Int and Real compare by numeric value so that `1` and `1.0` are equal.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            _ => self.as_real() == other.as_real(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Real(r) => write!(f, "{r}"),
        }
    }
}

/// A single runtime datum.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// Integer or real number.
    Number(Number),
    /// Text. May still be numeric, see [`Value::number`].
    String(String),
}

impl Value {
    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if the value has a numeric view.
    pub fn is_numeric(&self) -> bool {
        self.number().is_some()
    }

    /// Numeric view of the value, `None` for null and non-numeric text.
    pub fn number(&self) -> Option<Number> {
        match self {
            Value::Null => None,
            Value::Number(n) => Some(*n),
            Value::String(s) => Number::parse(s),
        }
    }

    /// Integer view, `None` if the value is not numeric.
    pub fn as_int(&self) -> Option<i64> {
        self.number().map(Number::as_int)
    }

    /// Floating-point view, `None` if the value is not numeric.
    pub fn as_real(&self) -> Option<f64> {
        self.number().map(Number::as_real)
    }

    /// String form. Numbers are formatted on demand; null renders empty.
    pub fn as_string(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Number(n) => Cow::Owned(n.to_string()),
            Value::String(s) => Cow::Borrowed(s),
        }
    }

    /// Append `text` to this value's string form, turning it into a string.
    pub fn concatenate(&mut self, text: &str) {
        match self {
            Value::String(s) => s.push_str(text),
            other => {
                let mut s = other.as_string().into_owned();
                s.push_str(text);
                *other = Value::String(s);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(Number::Int(i))
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Number(Number::Real(r))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Number(Number::Int(b as i64))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
