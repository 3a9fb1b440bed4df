//! Number formatting.
//!
//! Decimal output of a [`BigInt`] is produced by splitting the magnitude against the
//! cached powers `10^(2^k)`: the high half is written first with leading zeros
//! suppressed and the low half is zero padded to its full width. Rationals are written
//! in fixed point, exponential or fraction form, and in hex, octal or binary as
//! `num/den`.
//!
//! [`OutputSink`] is the caller owned diversion stack that [`format_numbers`] writes to.

use crate::bigint::BigInt;
use crate::bigint::tenpow::TenPowers;
use crate::context::EvalContext;
use crate::error::Result;
use crate::parse;
use crate::rational::BigRational;
use crate::{String, ToString, Vec, format};
use core::fmt::{self, Write};

/// Precision used by `%f` and `%e` when the format gives none.
pub const DEFAULT_FORMAT_PRECISION: i64 = 8;

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut digits = String::new();
        write_magnitude(&mut digits, &self.abs(), &mut TenPowers::new())?;
        f.pad_integral(!self.is_negative(), "", &digits)
    }
}

impl fmt::Display for BigRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_int() {
            write!(f, "{}", self.numer())
        } else {
            write!(f, "{}/{}", self.numer(), self.denom())
        }
    }
}

/// Writes the signed decimal form of `z`.
pub fn write_decimal<W: Write>(out: &mut W, z: &BigInt, cache: &mut TenPowers) -> fmt::Result {
    if z.is_negative() {
        out.write_char('-')?;
    }
    write_magnitude(out, &z.abs(), cache)
}

fn write_magnitude<W: Write>(out: &mut W, z: &BigInt, cache: &mut TenPowers) -> fmt::Result {
    let depth = cache.depth_for(z);
    write_digits(out, z, depth, false, cache)
}

/// Writes `z < 10^(2^depth)`, zero padded to `2^depth` digits when `pad` is set.
fn write_digits<W: Write>(
    out: &mut W,
    z: &BigInt,
    depth: usize,
    pad: bool,
    cache: &mut TenPowers,
) -> fmt::Result {
    if let Some(small) = z.to_u64() {
        let mut buf = [0u8; 20];
        let digits = u64_digits(small, &mut buf);
        if pad {
            write_zeros(out, (1usize << depth).saturating_sub(digits.len()))?;
        }
        let text = core::str::from_utf8(digits).map_err(|_| fmt::Error)?;
        return out.write_str(text);
    }
    let (hi, lo) = z.div_rem(cache.get(depth - 1)).map_err(|_| fmt::Error)?;
    if pad || !hi.is_zero() {
        write_digits(out, &hi, depth - 1, pad, cache)?;
        write_digits(out, &lo, depth - 1, true, cache)
    } else {
        write_digits(out, &lo, depth - 1, false, cache)
    }
}

/// Decimal digits of a machine word, most significant first, in the tail of `buf`.
fn u64_digits(mut n: u64, buf: &mut [u8; 20]) -> &[u8] {
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    &buf[start..]
}

fn write_zeros<W: Write>(out: &mut W, mut count: usize) -> fmt::Result {
    const ZEROS: &str = "0000000000000000000000000000000000000000000000000000000000000000";
    while count > 0 {
        let n = count.min(ZEROS.len());
        out.write_str(&ZEROS[..n])?;
        count -= n;
    }
    Ok(())
}

/// Signed decimal string of `z`.
pub fn to_decimal(z: &BigInt, cache: &mut TenPowers) -> String {
    let mut out = String::new();
    // Writing into a String only fails if the division table is inconsistent.
    if write_decimal(&mut out, z, cache).is_err() {
        out.clear();
    }
    out
}

/// Decimal form of `z` with a point inserted `decimals` digits from the right.
///
/// With `leading_zero` unset a value below one is written as `.00345`, otherwise
/// as `0.00345`.
pub fn print_val(z: &BigInt, decimals: usize, leading_zero: bool, cache: &mut TenPowers) -> String {
    let digits = to_decimal(&z.abs(), cache);
    let mut out = String::with_capacity(digits.len() + decimals + 3);
    if z.is_negative() {
        out.push('-');
    }
    if decimals == 0 {
        out.push_str(&digits);
    } else if digits.len() > decimals {
        let (int_part, frac_part) = digits.split_at(digits.len() - decimals);
        out.push_str(int_part);
        out.push('.');
        out.push_str(frac_part);
    } else {
        if leading_zero {
            out.push('0');
        }
        out.push('.');
        for _ in digits.len()..decimals {
            out.push('0');
        }
        out.push_str(&digits);
    }
    out
}

/// Hex form: a lone digit stays bare, anything larger gets a `0x` prefix.
pub fn to_hex(z: &BigInt) -> String {
    let mut out = String::new();
    if z.is_negative() {
        out.push('-');
    }
    let words = z.words();
    if words.len() <= 1 && z.low_word() <= 9 {
        out.push(char::from(b'0' + z.low_word() as u8));
        return out;
    }
    let mut iter = words.iter().rev();
    if let Some(top) = iter.next() {
        out.push_str(&format!("0x{:x}", top));
    }
    for w in iter {
        out.push_str(&format!("{:08x}", w));
    }
    out
}

/// Binary form: zero and one stay bare, anything larger gets a `0b` prefix.
pub fn to_binary(z: &BigInt) -> String {
    let mut out = String::new();
    if z.is_negative() {
        out.push('-');
    }
    let mag = z.abs();
    if mag.is_zero() || mag.is_one() {
        out.push(if mag.is_one() { '1' } else { '0' });
        return out;
    }
    out.push_str("0b");
    for bit in (0..mag.bit_length()).rev() {
        out.push(if mag.test_bit(bit) { '1' } else { '0' });
    }
    out
}

/// Octal form: a lone digit stays bare, anything larger gets a leading `0`.
pub fn to_octal(z: &BigInt) -> String {
    const CHUNK_BITS: usize = 30;
    const CHUNK_MASK: u32 = (1 << CHUNK_BITS) - 1;

    let mut out = String::new();
    if z.is_negative() {
        out.push('-');
    }
    let mut rest = z.abs();
    if rest.is_small(7) {
        out.push(char::from(b'0' + rest.low_word() as u8));
        return out;
    }
    let mut chunks = Vec::new();
    while !rest.is_zero() {
        chunks.push(rest.low_word() & CHUNK_MASK);
        rest = rest.shr(CHUNK_BITS);
    }
    out.push('0');
    let mut iter = chunks.iter().rev();
    if let Some(top) = iter.next() {
        out.push_str(&format!("{:o}", top));
    }
    for c in iter {
        out.push_str(&format!("{:010o}", c));
    }
    out
}

/// Fixed point with exactly `places` decimals, truncating the rest.
///
/// A negative value that truncates to zero keeps its sign: `-.00`.
pub fn fixed(q: &BigRational, places: usize, leading_zero: bool, cache: &mut TenPowers) -> String {
    let scaled = q.numer() * &cache.ten_pow(places as u64);
    let z = if q.is_int() {
        scaled
    } else {
        scaled.quo(q.denom()).unwrap_or_default()
    };
    let mut out = String::new();
    if q.is_negative() && z.is_zero() {
        out.push('-');
    }
    out.push_str(&print_val(&z, places, leading_zero, cache));
    out
}

/// Exponential form `d.ddd` followed by `e<exp>` when the exponent is nonzero.
///
/// The mantissa is rounded to `precision` places; a carry into a second integer digit
/// moves the exponent up by one.
pub fn exponential(q: &BigRational, precision: usize, cache: &mut TenPowers) -> Result<String> {
    if q.is_zero() {
        return Ok("0.0".to_string());
    }
    let mut num = q.numer().abs();
    let mut den = q.denom().clone();
    let mut exponent = num.digits(cache) as i64 - den.digits(cache) as i64;
    if exponent > 0 {
        den = &den * &cache.ten_pow(exponent as u64);
    } else if exponent < 0 {
        num = &num * &cache.ten_pow(exponent.unsigned_abs());
    }
    if num < den {
        num = num.mul_small(10);
        exponent -= 1;
    }
    let mantissa = BigRational::new(num.with_sign(q.is_negative()), den)?;
    let mut mantissa = mantissa.round(precision as i64)?;
    let ten = BigRational::from_i64(10);
    if mantissa.abs() >= ten {
        mantissa = mantissa.checked_div(&ten)?;
        exponent += 1;
    }
    let mut out = fixed(&mantissa, precision, false, cache);
    if exponent != 0 {
        out.push_str(&format!("e{}", exponent));
    }
    Ok(out)
}

/// `num/den`, or just `num` for an integer unless `force` is set.
pub fn fraction(q: &BigRational, force: bool, cache: &mut TenPowers) -> String {
    let mut out = to_decimal(q.numer(), cache);
    if force || !q.is_int() {
        out.push('/');
        out.push_str(&to_decimal(q.denom(), cache));
    }
    out
}

/// The integer part, truncated toward zero.
pub fn integer_part(q: &BigRational, cache: &mut TenPowers) -> String {
    to_decimal(&q.to_int(), cache)
}

/// Numerator in a radix, followed by `/den` in the same radix for a fraction.
pub fn radix(q: &BigRational, digits: fn(&BigInt) -> String) -> String {
    let mut out = digits(q.numer());
    if !q.is_int() {
        out.push('/');
        out.push_str(&digits(q.denom()));
    }
    out
}

/// Pads `text` with spaces to `|width|` columns: on the left for a positive width,
/// on the right for a negative one.
pub fn fill(text: &str, width: i64) -> String {
    let columns = text.chars().count();
    let target = width.unsigned_abs() as usize;
    if target <= columns {
        return text.to_string();
    }
    let padding = " ".repeat(target - columns);
    if width > 0 {
        format!("{}{}", padding, text)
    } else {
        format!("{}{}", text, padding)
    }
}

/// Text of a rational result at the given precision.
///
/// The value is rounded to `precision` places and then written with as many places as
/// its exact expansion needs, at least one and at most `precision`. There is no zero
/// before the point: `.33333`, `-.5`, `6.0`.
pub fn render_rational(q: &BigRational, precision: usize, cache: &mut TenPowers) -> Result<String> {
    let rounded = q.round(precision as i64)?;
    let places = match rounded.places() {
        p if p < 0 => precision,
        0 => 1,
        p => (p as usize).min(precision).max(1),
    };
    Ok(fixed(&rounded, places, false, cache))
}

/// Stack of diversion buffers.
///
/// Output always goes to the most recently opened buffer. Writing while no buffer is
/// open opens one.
#[derive(Debug, Default, Clone)]
pub struct OutputSink {
    buffers: Vec<String>,
}

impl OutputSink {
    pub fn new() -> Self {
        OutputSink {
            buffers: Vec::new(),
        }
    }

    /// Opens a new buffer on top of the stack.
    pub fn divert(&mut self) {
        self.buffers.push(String::new());
    }

    /// Closes the top buffer and returns what was written to it.
    pub fn undivert(&mut self) -> Option<String> {
        self.buffers.pop()
    }

    /// Drops every open buffer.
    pub fn clear(&mut self) {
        self.buffers.clear();
    }

    /// Number of open buffers.
    pub fn depth(&self) -> usize {
        self.buffers.len()
    }

    pub fn write_char(&mut self, c: char) {
        self.top().push(c);
    }

    pub fn write_str(&mut self, s: &str) {
        self.top().push_str(s);
    }

    fn top(&mut self) -> &mut String {
        if self.buffers.is_empty() {
            self.buffers.push(String::new());
        }
        let last = self.buffers.len() - 1;
        &mut self.buffers[last]
    }
}

impl Write for OutputSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        OutputSink::write_str(self, s);
        Ok(())
    }
}

/// C `atoi`: optional sign then digits, zero when there are none.
fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for b in body.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add((b - b'0') as i64);
    }
    if negative { -value } else { value }
}

fn escape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'f' => '\u{0c}',
        'v' => '\u{0b}',
        'b' => '\u{08}',
        other => other,
    }
}

/// Formats `args` according to the printf-style `fmt` into the top buffer of `sink`.
///
/// Numeric conversions read their argument with the literal syntax of the lexer and
/// treat a missing argument as zero. `%s` and `%c` write nothing when the arguments are
/// used up.
pub fn format_numbers(sink: &mut OutputSink, fmt: &str, args: &[&str], ctx: &EvalContext) -> Result<()> {
    let mut chars = fmt.chars();
    let mut args = args.iter().copied();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('\0') | None => return Ok(()),
                Some(c) => sink.write_char(escape(c)),
            }
            continue;
        }
        if ch != '%' {
            sink.write_char(ch);
            continue;
        }

        let mut width: i64 = 0;
        let mut precision: i64 = DEFAULT_FORMAT_PRECISION;
        let mut sign: i64 = 1;
        let Some(mut ch) = chars.next() else {
            return Ok(());
        };

        loop {
            match ch {
                'd' | 'f' | 'e' | 'r' | 'R' | 'N' | 'D' | 'o' | 'x' | 'b' => {
                    let q = match args.next() {
                        Some(text) => parse::scan_number(text)?,
                        None => BigRational::zero(),
                    };
                    let places = precision.max(0) as usize;
                    let text = ctx.with_ten_powers(|cache| -> Result<String> {
                        Ok(match ch {
                            'd' => integer_part(&q, cache),
                            'f' => fixed(&q.round(places as i64)?, places, true, cache),
                            'e' => exponential(&q, places, cache)?,
                            'r' => fraction(&q, false, cache),
                            'R' => fraction(&q, true, cache),
                            'N' => to_decimal(q.numer(), cache),
                            'D' => to_decimal(q.denom(), cache),
                            'o' => radix(&q, to_octal),
                            'x' => radix(&q, to_hex),
                            _ => radix(&q, to_binary),
                        })
                    })?;
                    sink.write_str(&fill(&text, width));
                    break;
                }
                's' => {
                    if let Some(text) = args.next() {
                        sink.write_str(text);
                    }
                    break;
                }
                'c' => {
                    if let Some(c) = args.next().and_then(|text| text.chars().next()) {
                        sink.write_char(c);
                    }
                    break;
                }
                '%' => {
                    sink.write_char('%');
                    break;
                }
                _ => {
                    if ch == '-' {
                        sign = -1;
                        let Some(next) = chars.next() else {
                            return Ok(());
                        };
                        ch = next;
                    }
                    if !(ch.is_ascii_digit() || ch == '.' || ch == '*') {
                        break;
                    }
                    if ch == '*' {
                        width = sign * args.next().map(leading_int).unwrap_or(0);
                        let Some(next) = chars.next() else {
                            return Ok(());
                        };
                        ch = next;
                    } else if ch != '.' {
                        width = 0;
                        while let Some(d) = ch.to_digit(10) {
                            width = width.saturating_mul(10).saturating_add(d as i64);
                            let Some(next) = chars.next() else {
                                return Ok(());
                            };
                            ch = next;
                        }
                        width *= sign;
                    }
                    if ch == '.' {
                        let Some(next) = chars.next() else {
                            return Ok(());
                        };
                        ch = next;
                        if ch == '*' {
                            precision = args.next().map(leading_int).unwrap_or(DEFAULT_FORMAT_PRECISION);
                            let Some(next) = chars.next() else {
                                return Ok(());
                            };
                            ch = next;
                        } else if ch.is_ascii_digit() {
                            precision = 0;
                            while let Some(d) = ch.to_digit(10) {
                                precision = precision.saturating_mul(10).saturating_add(d as i64);
                                let Some(next) = chars.next() else {
                                    return Ok(());
                                };
                                ch = next;
                            }
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
