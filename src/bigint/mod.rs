//! Arbitrary precision sign-magnitude integers.
//!
//! A [`BigInt`] is a vector of 32-bit words, least significant first, plus a sign flag.
//! Intermediate products and quotients are formed in 64-bit double words. The magnitude
//! never carries a most significant zero word, and zero is never negative, so two equal
//! values always have identical representations.
//!
//! Values are immutable once produced: every operation returns a new value and the
//! operands are only borrowed.

pub mod number_theory;
pub mod tenpow;

use crate::error::{ExprError, Result};
use crate::{Vec, vec};
use core::cmp::Ordering;
use core::ops::{Add, Mul, Neg, Sub};

/// Width of a digit word in bits.
pub const WORD_BITS: u32 = 32;

const WORD_BASE: u64 = 1 << WORD_BITS;
const WORD_MASK: u64 = WORD_BASE - 1;

/// Operands at least this many words long are multiplied with Karatsuba splitting.
pub const KARATSUBA_THRESHOLD: usize = 40;

/// Arbitrary precision signed integer.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BigInt {
    negative: bool,
    mag: Vec<u32>,
}

impl core::fmt::Debug for BigInt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "BigInt({})", self)
    }
}

impl BigInt {
    /// The canonical zero. It owns no words, so producing it never allocates.
    pub const fn zero() -> Self {
        BigInt {
            negative: false,
            mag: Vec::new(),
        }
    }

    pub fn one() -> Self {
        BigInt::from_u32(1)
    }

    pub fn two() -> Self {
        BigInt::from_u32(2)
    }

    pub fn ten() -> Self {
        BigInt::from_u32(10)
    }

    pub fn from_u32(value: u32) -> Self {
        if value == 0 {
            BigInt::zero()
        } else {
            BigInt {
                negative: false,
                mag: vec![value],
            }
        }
    }

    pub fn from_u64(value: u64) -> Self {
        BigInt::from_parts(false, vec![value as u32, (value >> WORD_BITS) as u32])
    }

    pub fn from_i64(value: i64) -> Self {
        let mut z = BigInt::from_u64(value.unsigned_abs());
        z.negative = value < 0 && !z.is_zero();
        z
    }

    pub fn from_i128(value: i128) -> Self {
        let m = value.unsigned_abs();
        let mag = vec![m as u32, (m >> 32) as u32, (m >> 64) as u32, (m >> 96) as u32];
        BigInt::from_parts(value < 0, mag)
    }

    /// Builds a value from raw words, trimming high zero words and normalizing negative zero.
    pub fn from_parts(negative: bool, mut mag: Vec<u32>) -> Self {
        trim(&mut mag);
        let negative = negative && !mag.is_empty();
        BigInt { negative, mag }
    }

    /// `2^bit`.
    pub fn pow2(bit: usize) -> Self {
        let mut mag = vec![0u32; bit / WORD_BITS as usize + 1];
        let top = mag.len() - 1;
        mag[top] = 1 << (bit % WORD_BITS as usize);
        BigInt {
            negative: false,
            mag,
        }
    }

    /// Magnitude words, least significant first.
    pub fn words(&self) -> &[u32] {
        &self.mag
    }

    /// Number of significant words. Zero has none.
    pub fn len_words(&self) -> usize {
        self.mag.len()
    }

    pub fn is_zero(&self) -> bool {
        self.mag.is_empty()
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_positive(&self) -> bool {
        !self.negative && !self.mag.is_empty()
    }

    pub fn is_one(&self) -> bool {
        !self.negative && self.mag.len() == 1 && self.mag[0] == 1
    }

    /// True for 1 and -1.
    pub fn is_unit(&self) -> bool {
        self.mag.len() == 1 && self.mag[0] == 1
    }

    pub fn is_even(&self) -> bool {
        self.mag.first().is_none_or(|w| w & 1 == 0)
    }

    pub fn is_odd(&self) -> bool {
        !self.is_even()
    }

    /// True when the magnitude fits one word and is at most `limit`.
    pub fn is_small(&self, limit: u32) -> bool {
        self.mag.len() <= 1 && self.low_word() <= limit
    }

    /// Least significant word of the magnitude.
    pub fn low_word(&self) -> u32 {
        self.mag.first().copied().unwrap_or(0)
    }

    pub fn signum(&self) -> i32 {
        if self.is_zero() {
            0
        } else if self.negative {
            -1
        } else {
            1
        }
    }

    pub fn abs(&self) -> BigInt {
        BigInt {
            negative: false,
            mag: self.mag.clone(),
        }
    }

    pub fn into_abs(mut self) -> BigInt {
        self.negative = false;
        self
    }

    /// Same magnitude with the given sign.
    pub fn with_sign(mut self, negative: bool) -> BigInt {
        self.negative = negative && !self.mag.is_empty();
        self
    }

    pub fn to_i64(&self) -> Option<i64> {
        let m = self.to_u64_abs()?;
        if self.negative {
            if m <= i64::MAX as u64 + 1 {
                Some((m as i64).wrapping_neg())
            } else {
                None
            }
        } else {
            i64::try_from(m).ok()
        }
    }

    pub fn to_u64(&self) -> Option<u64> {
        if self.negative {
            return None;
        }
        self.to_u64_abs()
    }

    fn to_u64_abs(&self) -> Option<u64> {
        match self.mag.len() {
            0 => Some(0),
            1 => Some(self.mag[0] as u64),
            2 => Some(self.mag[0] as u64 | (self.mag[1] as u64) << WORD_BITS),
            _ => None,
        }
    }

    /// Index of the highest set bit of the magnitude. Zero reports 0.
    pub fn high_bit(&self) -> usize {
        match self.mag.last() {
            None => 0,
            Some(top) => {
                (self.mag.len() - 1) * WORD_BITS as usize + (31 - top.leading_zeros() as usize)
            }
        }
    }

    /// Number of bits in the magnitude. Zero has none.
    pub fn bit_length(&self) -> usize {
        if self.is_zero() { 0 } else { self.high_bit() + 1 }
    }

    /// Index of the lowest set bit of the magnitude. Zero reports 0.
    pub fn low_bit(&self) -> usize {
        for (i, w) in self.mag.iter().enumerate() {
            if *w != 0 {
                return i * WORD_BITS as usize + w.trailing_zeros() as usize;
            }
        }
        0
    }

    /// True when the magnitude is a power of two.
    pub fn is_one_bit(&self) -> bool {
        !self.is_zero() && self.high_bit() == self.low_bit()
    }

    pub fn test_bit(&self, bit: usize) -> bool {
        let word = bit / WORD_BITS as usize;
        word < self.mag.len() && (self.mag[word] >> (bit % WORD_BITS as usize)) & 1 == 1
    }

    /// Compares magnitudes, ignoring sign.
    pub fn cmp_abs(&self, other: &BigInt) -> Ordering {
        mag_cmp(&self.mag, &other.mag)
    }

    pub fn square(&self) -> BigInt {
        BigInt {
            negative: false,
            mag: mag_mul(&self.mag, &self.mag),
        }
    }

    /// Multiplies by a single word.
    pub fn mul_small(&self, m: u32) -> BigInt {
        BigInt::from_parts(self.negative, mag_mul_small(&self.mag, m))
    }

    /// Adds a signed machine integer.
    pub fn add_small(&self, n: i64) -> BigInt {
        self + &BigInt::from_i64(n)
    }

    /// Truncating division with remainder.
    ///
    /// The quotient rounds toward zero and the remainder carries the sign of the dividend.
    pub fn div_rem(&self, divisor: &BigInt) -> Result<(BigInt, BigInt)> {
        if divisor.is_zero() {
            return Err(ExprError::DivideByZero);
        }
        let (q, r) = mag_divrem(&self.mag, &divisor.mag);
        Ok((
            BigInt::from_parts(self.negative != divisor.negative, q),
            BigInt::from_parts(self.negative, r),
        ))
    }

    /// Truncating quotient by a divisor the caller has already checked is nonzero.
    pub(crate) fn quo_nonzero(&self, divisor: &BigInt) -> BigInt {
        debug_assert!(!divisor.is_zero(), "quotient by zero");
        BigInt::from_parts(self.negative != divisor.negative, mag_divrem(&self.mag, &divisor.mag).0)
    }

    /// Truncating quotient.
    pub fn quo(&self, divisor: &BigInt) -> Result<BigInt> {
        Ok(self.div_rem(divisor)?.0)
    }

    /// Remainder of truncating division.
    pub fn rem(&self, divisor: &BigInt) -> Result<BigInt> {
        Ok(self.div_rem(divisor)?.1)
    }

    /// Divides by a single word, returning the quotient and the magnitude of the remainder.
    pub fn div_rem_small(&self, d: u32) -> Result<(BigInt, u32)> {
        if d == 0 {
            return Err(ExprError::DivideByZero);
        }
        let (q, r) = mag_divrem_small(&self.mag, d);
        Ok((BigInt::from_parts(self.negative, q), r))
    }

    /// Magnitude modulo a single word.
    pub fn mod_small(&self, d: u32) -> u32 {
        if d == 0 {
            return 0;
        }
        let mut r: u64 = 0;
        for w in self.mag.iter().rev() {
            r = ((r << WORD_BITS) | *w as u64) % d as u64;
        }
        r as u32
    }

    /// True when `divisor` divides `self` exactly.
    pub fn divides_by(&self, divisor: &BigInt) -> bool {
        if divisor.is_zero() {
            return self.is_zero();
        }
        mag_divrem(&self.mag, &divisor.mag).1.is_empty()
    }

    /// Shift of the magnitude: positive counts shift left, negative counts shift right.
    /// The sign is kept, so right shifts truncate toward zero.
    pub fn shift(&self, bits: i64) -> BigInt {
        if bits >= 0 {
            self.shl(bits as usize)
        } else {
            self.shr(bits.unsigned_abs() as usize)
        }
    }

    pub fn shl(&self, bits: usize) -> BigInt {
        if self.is_zero() {
            return BigInt::zero();
        }
        BigInt::from_parts(self.negative, mag_shl(&self.mag, bits))
    }

    pub fn shr(&self, bits: usize) -> BigInt {
        BigInt::from_parts(self.negative, mag_shr(&self.mag, bits))
    }

    /// Bitwise and of the magnitudes. The result is non-negative.
    pub fn and(&self, other: &BigInt) -> BigInt {
        let mag = self
            .mag
            .iter()
            .zip(other.mag.iter())
            .map(|(a, b)| a & b)
            .collect();
        BigInt::from_parts(false, mag)
    }

    /// Bitwise or of the magnitudes. The result is non-negative.
    pub fn or(&self, other: &BigInt) -> BigInt {
        BigInt::from_parts(false, mag_zip_longest(&self.mag, &other.mag, |a, b| a | b))
    }

    /// Bitwise exclusive or of the magnitudes. The result is non-negative.
    pub fn xor(&self, other: &BigInt) -> BigInt {
        BigInt::from_parts(false, mag_zip_longest(&self.mag, &other.mag, |a, b| a ^ b))
    }

    /// Approximate value as a float, saturating to infinity for huge magnitudes.
    pub fn to_f64(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        let bits = self.bit_length();
        let shift = bits.saturating_sub(64);
        let top = self.abs().shr(shift).to_u64().unwrap_or(u64::MAX) as f64;
        let value = scale_by_pow2(top, shift as i32);
        if self.negative { -value } else { value }
    }
}

/// `value * 2^exp` without relying on `std`.
pub(crate) fn scale_by_pow2(value: f64, exp: i32) -> f64 {
    #[cfg(feature = "libm")]
    {
        libm::ldexp(value, exp)
    }
    #[cfg(not(feature = "libm"))]
    {
        let mut v = value;
        if exp >= 0 {
            for _ in 0..exp {
                v *= 2.0;
                if v.is_infinite() {
                    break;
                }
            }
        } else {
            for _ in 0..exp.unsigned_abs() {
                v *= 0.5;
                if v == 0.0 {
                    break;
                }
            }
        }
        v
    }
}

impl From<i64> for BigInt {
    fn from(value: i64) -> Self {
        BigInt::from_i64(value)
    }
}

impl From<i32> for BigInt {
    fn from(value: i32) -> Self {
        BigInt::from_i64(value as i64)
    }
}

impl From<u64> for BigInt {
    fn from(value: u64) -> Self {
        BigInt::from_u64(value)
    }
}

impl From<u32> for BigInt {
    fn from(value: u32) -> Self {
        BigInt::from_u32(value)
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => mag_cmp(&self.mag, &other.mag),
            (true, true) => mag_cmp(&other.mag, &self.mag),
        }
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Neg for BigInt {
    type Output = BigInt;
    fn neg(mut self) -> BigInt {
        self.negative = !self.negative && !self.mag.is_empty();
        self
    }
}

impl Neg for &BigInt {
    type Output = BigInt;
    fn neg(self) -> BigInt {
        -(self.clone())
    }
}

fn signed_add(a_neg: bool, a: &[u32], b_neg: bool, b: &[u32]) -> BigInt {
    if a_neg == b_neg {
        return BigInt::from_parts(a_neg, mag_add(a, b));
    }
    match mag_cmp(a, b) {
        Ordering::Equal => BigInt::zero(),
        Ordering::Greater => BigInt::from_parts(a_neg, mag_sub(a, b)),
        Ordering::Less => BigInt::from_parts(b_neg, mag_sub(b, a)),
    }
}

impl Add<&BigInt> for &BigInt {
    type Output = BigInt;
    fn add(self, rhs: &BigInt) -> BigInt {
        signed_add(self.negative, &self.mag, rhs.negative, &rhs.mag)
    }
}

impl Sub<&BigInt> for &BigInt {
    type Output = BigInt;
    fn sub(self, rhs: &BigInt) -> BigInt {
        signed_add(self.negative, &self.mag, !rhs.negative, &rhs.mag)
    }
}

impl Mul<&BigInt> for &BigInt {
    type Output = BigInt;
    fn mul(self, rhs: &BigInt) -> BigInt {
        BigInt::from_parts(self.negative != rhs.negative, mag_mul(&self.mag, &rhs.mag))
    }
}

macro_rules! forward_owned_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<BigInt> for BigInt {
            type Output = BigInt;
            fn $method(self, rhs: BigInt) -> BigInt {
                (&self).$method(&rhs)
            }
        }
        impl $imp<&BigInt> for BigInt {
            type Output = BigInt;
            fn $method(self, rhs: &BigInt) -> BigInt {
                (&self).$method(rhs)
            }
        }
        impl $imp<BigInt> for &BigInt {
            type Output = BigInt;
            fn $method(self, rhs: BigInt) -> BigInt {
                self.$method(&rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);

// ---------------------------------------------------------------------------
// Magnitude primitives
// ---------------------------------------------------------------------------

fn trim(mag: &mut Vec<u32>) {
    while mag.last() == Some(&0) {
        mag.pop();
    }
}

pub(crate) fn mag_cmp(a: &[u32], b: &[u32]) -> Ordering {
    if a.len() != b.len() {
        return a.len().cmp(&b.len());
    }
    for (x, y) in a.iter().rev().zip(b.iter().rev()) {
        if x != y {
            return x.cmp(y);
        }
    }
    Ordering::Equal
}

fn mag_zip_longest(a: &[u32], b: &[u32], op: impl Fn(u32, u32) -> u32) -> Vec<u32> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| op(a.get(i).copied().unwrap_or(0), b.get(i).copied().unwrap_or(0)))
        .collect()
}

fn mag_add(a: &[u32], b: &[u32]) -> Vec<u32> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = Vec::with_capacity(long.len() + 1);
    let mut carry = 0u64;
    for (i, w) in long.iter().enumerate() {
        let sum = *w as u64 + short.get(i).copied().unwrap_or(0) as u64 + carry;
        out.push(sum as u32);
        carry = sum >> WORD_BITS;
    }
    if carry != 0 {
        out.push(carry as u32);
    }
    out
}

/// `a - b`, requires `a >= b`.
fn mag_sub(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len());
    let mut borrow = 0i64;
    for (i, w) in a.iter().enumerate() {
        let diff = *w as i64 - b.get(i).copied().unwrap_or(0) as i64 - borrow;
        if diff < 0 {
            out.push((diff + WORD_BASE as i64) as u32);
            borrow = 1;
        } else {
            out.push(diff as u32);
            borrow = 0;
        }
    }
    trim(&mut out);
    out
}

fn mag_mul_small(a: &[u32], m: u32) -> Vec<u32> {
    if m == 0 || a.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(a.len() + 1);
    let mut carry = 0u64;
    for w in a {
        let p = *w as u64 * m as u64 + carry;
        out.push(p as u32);
        carry = p >> WORD_BITS;
    }
    if carry != 0 {
        out.push(carry as u32);
    }
    out
}

fn mag_mul(a: &[u32], b: &[u32]) -> Vec<u32> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    if a.len().min(b.len()) < KARATSUBA_THRESHOLD {
        return mag_mul_schoolbook(a, b);
    }
    let mut out = mag_mul_karatsuba(a, b);
    trim(&mut out);
    out
}

fn mag_mul_schoolbook(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = vec![0u32; a.len() + b.len()];
    for (i, x) in a.iter().enumerate() {
        if *x == 0 {
            continue;
        }
        let mut carry = 0u64;
        for (j, y) in b.iter().enumerate() {
            let t = *x as u64 * *y as u64 + out[i + j] as u64 + carry;
            out[i + j] = t as u32;
            carry = t >> WORD_BITS;
        }
        let mut k = i + b.len();
        while carry != 0 {
            let t = out[k] as u64 + carry;
            out[k] = t as u32;
            carry = t >> WORD_BITS;
            k += 1;
        }
    }
    trim(&mut out);
    out
}

/// Adds `src` into `dst` starting at word `offset`. `dst` must be long enough.
fn add_into(dst: &mut [u32], src: &[u32], offset: usize) {
    let mut carry = 0u64;
    let mut i = 0;
    while i < src.len() || carry != 0 {
        let t = dst[offset + i] as u64 + src.get(i).copied().unwrap_or(0) as u64 + carry;
        dst[offset + i] = t as u32;
        carry = t >> WORD_BITS;
        i += 1;
    }
}

fn split_trimmed(a: &[u32], at: usize) -> (Vec<u32>, Vec<u32>) {
    let at = at.min(a.len());
    let mut low = a[..at].to_vec();
    trim(&mut low);
    (low, a[at..].to_vec())
}

fn mag_mul_karatsuba(a: &[u32], b: &[u32]) -> Vec<u32> {
    let half = a.len().max(b.len()) / 2;
    let mut out = vec![0u32; a.len() + b.len() + 1];

    // Unbalanced operands: split only the longer one.
    if a.len().min(b.len()) <= half {
        let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
        let (lo, hi) = split_trimmed(long, half);
        add_into(&mut out, &mag_mul(&lo, short), 0);
        add_into(&mut out, &mag_mul(&hi, short), half);
        return out;
    }

    let (a0, a1) = split_trimmed(a, half);
    let (b0, b1) = split_trimmed(b, half);
    let z0 = mag_mul(&a0, &b0);
    let z2 = mag_mul(&a1, &b1);
    let z1 = mag_mul(&mag_add(&a0, &a1), &mag_add(&b0, &b1));
    let z1 = mag_sub(&mag_sub(&z1, &z0), &z2);

    add_into(&mut out, &z0, 0);
    add_into(&mut out, &z1, half);
    add_into(&mut out, &z2, 2 * half);
    out
}

fn mag_shl(a: &[u32], bits: usize) -> Vec<u32> {
    if a.is_empty() {
        return Vec::new();
    }
    let words = bits / WORD_BITS as usize;
    let rem = (bits % WORD_BITS as usize) as u32;
    let mut out = vec![0u32; words];
    out.reserve(a.len() + 1);
    if rem == 0 {
        out.extend_from_slice(a);
    } else {
        let mut carry = 0u32;
        for w in a {
            out.push((w << rem) | carry);
            carry = w >> (WORD_BITS - rem);
        }
        if carry != 0 {
            out.push(carry);
        }
    }
    out
}

fn mag_shr(a: &[u32], bits: usize) -> Vec<u32> {
    let words = bits / WORD_BITS as usize;
    if words >= a.len() {
        return Vec::new();
    }
    let rem = (bits % WORD_BITS as usize) as u32;
    let src = &a[words..];
    let mut out = Vec::with_capacity(src.len());
    if rem == 0 {
        out.extend_from_slice(src);
    } else {
        for i in 0..src.len() {
            let hi = src.get(i + 1).copied().unwrap_or(0);
            out.push((src[i] >> rem) | (hi << (WORD_BITS - rem)));
        }
    }
    trim(&mut out);
    out
}

fn mag_divrem_small(a: &[u32], d: u32) -> (Vec<u32>, u32) {
    let mut q = vec![0u32; a.len()];
    let mut r = 0u64;
    for i in (0..a.len()).rev() {
        let cur = (r << WORD_BITS) | a[i] as u64;
        q[i] = (cur / d as u64) as u32;
        r = cur % d as u64;
    }
    trim(&mut q);
    (q, r as u32)
}

/// Knuth algorithm D. `b` must be non-empty.
fn mag_divrem(a: &[u32], b: &[u32]) -> (Vec<u32>, Vec<u32>) {
    if mag_cmp(a, b) == Ordering::Less {
        return (Vec::new(), a.to_vec());
    }
    if b.len() == 1 {
        let (q, r) = mag_divrem_small(a, b[0]);
        let r = if r == 0 { Vec::new() } else { vec![r] };
        return (q, r);
    }

    let s = b[b.len() - 1].leading_zeros() as usize;
    let vn = mag_shl(b, s);
    let mut un = mag_shl(a, s);
    un.resize(a.len() + 1, 0);

    let n = vn.len();
    let m = a.len() - n;
    let mut q = vec![0u32; m + 1];
    let v_top = vn[n - 1] as u64;
    let v_next = vn[n - 2] as u64;

    for j in (0..=m).rev() {
        let num = ((un[j + n] as u64) << WORD_BITS) | un[j + n - 1] as u64;
        let mut qhat = num / v_top;
        let mut rhat = num % v_top;
        while qhat >= WORD_BASE || qhat * v_next > ((rhat << WORD_BITS) | un[j + n - 2] as u64) {
            qhat -= 1;
            rhat += v_top;
            if rhat >= WORD_BASE {
                break;
            }
        }

        let mut borrow = 0i64;
        let mut carry = 0u64;
        for i in 0..n {
            let p = qhat * vn[i] as u64 + carry;
            carry = p >> WORD_BITS;
            let t = un[i + j] as i64 - borrow - (p & WORD_MASK) as i64;
            un[i + j] = t as u32;
            borrow = (t < 0) as i64;
        }
        let t = un[j + n] as i64 - borrow - carry as i64;
        un[j + n] = t as u32;

        if t < 0 {
            qhat -= 1;
            let mut c = 0u64;
            for i in 0..n {
                let sum = un[i + j] as u64 + vn[i] as u64 + c;
                un[i + j] = sum as u32;
                c = sum >> WORD_BITS;
            }
            un[j + n] = un[j + n].wrapping_add(c as u32);
        }
        q[j] = qhat as u32;
    }

    trim(&mut q);
    let r = mag_shr(&un[..n], s);
    (q, r)
}
