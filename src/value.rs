//! The evaluator's dynamically typed value.

use crate::bigint::BigInt;
use crate::bigint::tenpow::TenPowers;
use crate::error::Result;
use crate::format::{render_rational, to_decimal};
use crate::rational::BigRational;
use crate::{String, ToString};
use core::fmt;

bitflags::bitflags! {
    /// Kinds of [`Value`], combinable to describe what an operator or argument slot accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ValueKind: u8 {
        const INT      = 0b001;
        const RATIONAL = 0b010;
        const STRING   = 0b100;
        const NUMBER   = Self::INT.bits() | Self::RATIONAL.bits();
    }
}

impl ValueKind {
    /// Wording used when an operand of this kind is rejected.
    pub fn describe(self) -> &'static str {
        if self.contains(ValueKind::RATIONAL) {
            "floating-point value"
        } else {
            "non-numeric string"
        }
    }

    /// Result kind code of the C ABI: 0 int, 1 rational, 2 string.
    pub fn code(self) -> i32 {
        if self.contains(ValueKind::INT) {
            0
        } else if self.contains(ValueKind::RATIONAL) {
            1
        } else {
            2
        }
    }
}

/// Result of evaluating an expression or sub-expression.
///
/// `Rational` is the "floating-point" kind of the expression language: an exact fraction
/// that is rounded to the context precision only when it is turned into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(BigInt),
    Rational(BigRational),
    Str(String),
}

impl Default for Value {
    fn default() -> Self {
        Value::Int(BigInt::zero())
    }
}

impl Value {
    /// The integer 1 or 0.
    pub fn from_bool(b: bool) -> Value {
        Value::Int(if b { BigInt::one() } else { BigInt::zero() })
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::INT,
            Value::Rational(_) => ValueKind::RATIONAL,
            Value::Str(_) => ValueKind::STRING,
        }
    }

    pub fn is_numeric(&self) -> bool {
        ValueKind::NUMBER.contains(self.kind())
    }

    /// The value as a rational, promoting an integer. `None` for a string.
    pub fn to_rational(&self) -> Option<BigRational> {
        match self {
            Value::Int(z) => Some(BigRational::from_int(z.clone())),
            Value::Rational(q) => Some(q.clone()),
            Value::Str(_) => None,
        }
    }

    /// The value as an integer, truncating a rational toward zero. `None` for a string.
    pub fn to_int(&self) -> Option<BigInt> {
        match self {
            Value::Int(z) => Some(z.clone()),
            Value::Rational(q) => Some(q.to_int()),
            Value::Str(_) => None,
        }
    }

    /// Nonzero test. `None` for a string.
    pub fn truthy(&self) -> Option<bool> {
        match self {
            Value::Int(z) => Some(!z.is_zero()),
            Value::Rational(q) => Some(!q.is_zero()),
            Value::Str(_) => None,
        }
    }

    /// Text of the value: an int in decimal, a rational rounded to `precision` places,
    /// a string as is.
    pub fn render(&self, precision: usize, cache: &mut TenPowers) -> Result<String> {
        match self {
            Value::Int(z) => Ok(to_decimal(z, cache)),
            Value::Rational(q) => render_rational(q, precision, cache),
            Value::Str(s) => Ok(s.clone()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(z) => write!(f, "{}", z),
            Value::Rational(q) => write!(f, "{}", q),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<BigInt> for Value {
    fn from(z: BigInt) -> Value {
        Value::Int(z)
    }
}

impl From<BigRational> for Value {
    fn from(q: BigRational) -> Value {
        Value::Rational(q)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Int(BigInt::from_i64(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(Value::from(3).kind(), ValueKind::INT);
        assert!(Value::from(BigRational::one()).is_numeric());
        assert!(!Value::from("x").is_numeric());
        assert_eq!(ValueKind::RATIONAL.describe(), "floating-point value");
        assert_eq!(ValueKind::STRING.describe(), "non-numeric string");
        assert_eq!(ValueKind::STRING.code(), 2);
    }

    #[test]
    fn test_coercions() {
        let half = BigRational::new(BigInt::from_i64(-7), BigInt::from_i64(2)).unwrap();
        let v = Value::Rational(half.clone());
        assert_eq!(v.to_int(), Some(BigInt::from_i64(-3)));
        assert_eq!(v.to_rational(), Some(half));
        assert_eq!(Value::from(4).to_rational(), Some(BigRational::from_i64(4)));
        assert_eq!(Value::from("4").to_int(), None);
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(Value::from(0).truthy(), Some(false));
        assert_eq!(Value::Rational(BigRational::one()).truthy(), Some(true));
        assert_eq!(Value::from("").truthy(), None);
        assert_eq!(Value::Rational(BigRational::zero()).truthy(), Some(false));
    }

    #[test]
    fn test_render() {
        let mut cache = TenPowers::new();
        let third = BigRational::new(BigInt::one(), BigInt::from_i64(3)).unwrap();
        assert_eq!(Value::Rational(third).render(5, &mut cache).unwrap(), ".33333");
        assert_eq!(Value::from(-12).render(5, &mut cache).unwrap(), "-12");
        assert_eq!(Value::from("abc").render(5, &mut cache).unwrap(), "abc");
    }
}
