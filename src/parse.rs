//! Number parsing.
//!
//! Two scanners read a number from the front of a string and report how many bytes
//! they used, so the lexer can continue after them:
//!
//! - [`scan_integer`] reads decimal, `0x` hex, `0b` binary and leading-`0` octal,
//!   stopping at the first character that is not a digit of the radix.
//! - [`scan_decimal`] reads `digits[.digits][e[sign]digits]`.
//!
//! [`looks_like_int`] decides which of the two applies. [`classify`] turns a complete
//! string into a [`Value`], falling back to a string when it is not a number.

use crate::bigint::BigInt;
use crate::bigint::tenpow::ten_pow;
use crate::error::{ExprError, Result};
use crate::rational::BigRational;
use crate::value::Value;
use crate::{String, ToString};
use core::str::FromStr;

/// Largest decimal exponent accepted in a literal.
pub const MAX_EXPONENT: u64 = 1_000_000;

/// True when the text starts like an integer: optional whitespace and sign, digits,
/// and then something other than `.`, `e` or `E`.
pub fn looks_like_int(text: &str) -> bool {
    let bytes = text.trim_start().as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    if !bytes.get(i).is_some_and(u8::is_ascii_digit) {
        return false;
    }
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    !matches!(bytes.get(i), Some(b'.') | Some(b'e') | Some(b'E'))
}

/// Accumulates digits of `radix`, several at a time so that each step is one
/// small multiply and one small add.
fn accumulate(digits: &[u8], radix: u32) -> BigInt {
    let per_chunk = match radix {
        2 => 31,
        8 => 10,
        16 => 7,
        _ => 9,
    };
    let mut value = BigInt::zero();
    for chunk in digits.chunks(per_chunk) {
        let mut word: u32 = 0;
        for &d in chunk {
            word = word * radix + (d as char).to_digit(radix).unwrap_or(0);
        }
        value = value.mul_small(radix.pow(chunk.len() as u32)).add_small(word as i64);
    }
    value
}

/// Reads an integer from the front of `text`.
///
/// Accepts an optional sign, blanks after the sign, and a radix prefix. Returns the
/// value and the number of bytes consumed; nothing is consumed when no digit is found.
pub fn scan_integer(text: &str) -> (BigInt, usize) {
    let bytes = text.as_bytes();
    let mut i = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };
    while matches!(bytes.get(i), Some(b' ') | Some(b'\t')) {
        i += 1;
    }
    let body_start = i;
    let mut radix = 10;
    if bytes.get(i) == Some(&b'0') {
        i += 1;
        match bytes.get(i) {
            Some(b'0'..=b'9') => radix = 8,
            Some(b'x') | Some(b'X') => {
                radix = 16;
                i += 1;
            }
            Some(b'b') | Some(b'B') => {
                radix = 2;
                i += 1;
            }
            _ => {}
        }
    }
    let digits_start = i;
    while bytes.get(i).is_some_and(|b| (*b as char).is_digit(radix)) {
        i += 1;
    }
    if i == body_start {
        return (BigInt::zero(), 0);
    }
    let value = accumulate(&bytes[digits_start..i], radix);
    (value.with_sign(negative), i)
}

/// Reads a decimal number with optional fraction and exponent from the front of `text`.
///
/// At least one mantissa digit is required, and the exponent is only taken when it
/// has digits. Returns the reduced value and the number of bytes consumed, which is
/// zero when the text does not start with a number.
pub fn scan_decimal(text: &str) -> Result<(BigRational, usize)> {
    let bytes = text.as_bytes();
    let mut i = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let int_digits = &bytes[int_start..i];

    let mut frac_digits: &[u8] = &[];
    if bytes.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        frac_digits = &bytes[frac_start..j];
        i = j;
    }
    if int_digits.is_empty() && frac_digits.is_empty() {
        return Ok((BigRational::zero(), 0));
    }

    let mut exponent: u64 = 0;
    let mut negative_exponent = false;
    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        let sign_negative = match bytes.get(j) {
            Some(b'-') => {
                j += 1;
                true
            }
            Some(b'+') => {
                j += 1;
                false
            }
            _ => false,
        };
        if bytes.get(j).is_some_and(u8::is_ascii_digit) {
            while let Some(d) = bytes.get(j).filter(|b| b.is_ascii_digit()) {
                exponent = exponent * 10 + (d - b'0') as u64;
                if exponent > MAX_EXPONENT {
                    return Err(ExprError::math("Exponent too large"));
                }
                j += 1;
            }
            negative_exponent = sign_negative;
            i = j;
        }
    }

    let mut mantissa = accumulate(int_digits, 10);
    if !frac_digits.is_empty() {
        mantissa = &(&mantissa * &ten_pow(frac_digits.len() as u64)) + &accumulate(frac_digits, 10);
    }
    if mantissa.is_zero() {
        return Ok((BigRational::zero(), i));
    }
    let mut num = mantissa.with_sign(negative);
    let mut den = ten_pow(frac_digits.len() as u64);
    if exponent != 0 {
        if negative_exponent {
            den = &den * &ten_pow(exponent);
        } else {
            num = &num * &ten_pow(exponent);
        }
    }
    Ok((BigRational::new(num, den)?, i))
}

/// Reads a number from the front of `text` the way a formatting argument is read:
/// leading blanks are skipped, trailing text is ignored, and no number at all is zero.
pub fn scan_number(text: &str) -> Result<BigRational> {
    let text = text.trim_start();
    if looks_like_int(text) {
        Ok(BigRational::from_int(scan_integer(text).0))
    } else {
        Ok(scan_decimal(text)?.0)
    }
}

/// Parses a complete integer literal, with optional sign and radix prefix.
pub fn parse_integer(text: &str) -> Result<BigInt> {
    let trimmed = text.trim();
    let (value, used) = scan_integer(trimmed);
    if used == 0 || used != trimmed.len() {
        return Err(ExprError::Syntax {
            expr: text.to_string(),
        });
    }
    Ok(value)
}

/// Parses a complete rational literal: an integer, a decimal with fraction or
/// exponent, or `num/den`.
pub fn parse_rational(text: &str) -> Result<BigRational> {
    let trimmed = text.trim();
    if let Some((num, den)) = trimmed.split_once('/') {
        return BigRational::new(parse_integer(num)?, parse_integer(den)?);
    }
    if looks_like_int(trimmed) {
        return Ok(BigRational::from_int(parse_integer(trimmed)?));
    }
    let (value, used) = scan_decimal(trimmed)?;
    if used == 0 || used != trimmed.len() {
        return Err(ExprError::Syntax {
            expr: text.to_string(),
        });
    }
    Ok(value)
}

/// Turns a substituted or quoted string into a value.
///
/// A string that is entirely an integer literal becomes [`Value::Int`], one that is
/// entirely a decimal literal becomes [`Value::Rational`], and anything else is kept
/// as [`Value::Str`]. Leading blanks are allowed before a number.
pub fn classify(text: &str) -> Result<Value> {
    let trimmed = text.trim_start();
    if !trimmed.is_empty() {
        if looks_like_int(trimmed) {
            let (value, used) = scan_integer(trimmed);
            if used == trimmed.len() {
                return Ok(Value::Int(value));
            }
        } else {
            let (value, used) = scan_decimal(trimmed)?;
            if used != 0 && used == trimmed.len() {
                return Ok(Value::Rational(value));
            }
        }
    }
    Ok(Value::Str(String::from(text)))
}

impl FromStr for BigInt {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self> {
        parse_integer(s)
    }
}

impl FromStr for BigRational {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self> {
        parse_rational(s)
    }
}
