//! Numeric values.

use core::fmt;

/// A numeric value, either integral or floating point.
///
/// The two variants are distinct: `Number::Int(20)` and `Number::Float(20.0)`
/// are not equal. Parsers decide which variant they produce.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// A signed 64-bit integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
}

impl Number {
    /// The value as an `f64`, converting integers lossily if needed.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// The value truncated to an `i64`.
    pub fn as_i64(&self) -> i64 {
        match *self {
            Number::Int(i) => i,
            Number::Float(f) => f as i64,
        }
    }

    /// True for `Float(NaN)`.
    pub fn is_nan(&self) -> bool {
        matches!(self, Number::Float(f) if f.is_nan())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Number::Int(i as i64)
    }
}

impl From<u32> for Number {
    fn from(i: u32) -> Self {
        Number::Int(i as i64)
    }
}

impl From<usize> for Number {
    fn from(i: usize) -> Self {
        Number::Int(i as i64)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

impl From<f32> for Number {
    fn from(f: f32) -> Self {
        Number::Float(f as f64)
    }
}
