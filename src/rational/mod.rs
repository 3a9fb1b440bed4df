//! Exact fractions of [`BigInt`]s.
//!
//! A [`BigRational`] is always stored in lowest terms with a positive denominator, so
//! structural equality is numeric equality. Values are owned and cloned rather than
//! shared through a reference count. Zero is `0/1`, whose numerator owns no words.

use crate::bigint::BigInt;
use crate::bigint::tenpow::{TenPowers, ten_pow};
use crate::error::{ExprError, Result};
use core::cmp::Ordering;
use core::ops::{Add, Mul, Neg, Sub};

/// Reduced fraction with a positive denominator.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BigRational {
    num: BigInt,
    den: BigInt,
}

impl core::fmt::Debug for BigRational {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "BigRational({}/{})", self.num, self.den)
    }
}

impl Default for BigRational {
    fn default() -> Self {
        BigRational::zero()
    }
}

impl BigRational {
    pub fn zero() -> Self {
        BigRational {
            num: BigInt::zero(),
            den: BigInt::one(),
        }
    }

    pub fn one() -> Self {
        BigRational::from_int(BigInt::one())
    }

    pub fn from_int(num: BigInt) -> Self {
        BigRational {
            num,
            den: BigInt::one(),
        }
    }

    pub fn from_i64(value: i64) -> Self {
        BigRational::from_int(BigInt::from_i64(value))
    }

    /// `num / den` reduced to lowest terms.
    pub fn new(num: BigInt, den: BigInt) -> Result<Self> {
        if den.is_zero() {
            return Err(ExprError::DivideByZero);
        }
        Ok(BigRational::reduce(num, den))
    }

    /// `den` must be nonzero.
    fn reduce(num: BigInt, den: BigInt) -> Self {
        if num.is_zero() {
            return BigRational::zero();
        }
        let negative = num.is_negative() != den.is_negative();
        let g = num.gcd(&den);
        let (num, den) = if g.is_one() {
            (num.into_abs(), den.into_abs())
        } else {
            (quo_nonzero(&num.into_abs(), &g), quo_nonzero(&den.into_abs(), &g))
        };
        BigRational {
            num: num.with_sign(negative),
            den,
        }
    }

    /// `10^-power`.
    pub fn ten_pow_inverse(power: u64) -> Self {
        BigRational {
            num: BigInt::one(),
            den: ten_pow(power),
        }
    }

    /// `num / 2^bits`, reduced.
    pub fn from_scaled(num: BigInt, bits: usize) -> Self {
        if num.is_zero() {
            return BigRational::zero();
        }
        let shift = num.low_bit().min(bits);
        BigRational {
            num: num.shr(shift),
            den: BigInt::pow2(bits - shift),
        }
    }

    pub fn numer(&self) -> &BigInt {
        &self.num
    }

    pub fn denom(&self) -> &BigInt {
        &self.den
    }

    pub fn into_parts(self) -> (BigInt, BigInt) {
        (self.num, self.den)
    }

    pub fn is_int(&self) -> bool {
        self.den.is_one()
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.num.is_one() && self.den.is_one()
    }

    pub fn is_negative(&self) -> bool {
        self.num.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.num.is_positive()
    }

    pub fn signum(&self) -> i32 {
        self.num.signum()
    }

    pub fn abs(&self) -> BigRational {
        BigRational {
            num: self.num.abs(),
            den: self.den.clone(),
        }
    }

    pub fn square(&self) -> BigRational {
        BigRational {
            num: self.num.square(),
            den: self.den.square(),
        }
    }

    /// `1 / self`.
    pub fn inverse(&self) -> Result<BigRational> {
        if self.is_zero() {
            return Err(ExprError::DivideByZero);
        }
        Ok(BigRational {
            num: self.den.clone().with_sign(self.is_negative()),
            den: self.num.abs(),
        })
    }

    pub fn checked_div(&self, other: &BigRational) -> Result<BigRational> {
        if other.is_zero() {
            return Err(ExprError::DivideByZero);
        }
        Ok(BigRational::reduce(&self.num * &other.den, &self.den * &other.num))
    }

    /// Integer part, truncated toward zero.
    pub fn to_int(&self) -> BigInt {
        if self.is_int() {
            return self.num.clone();
        }
        quo_nonzero(&self.num, &self.den)
    }

    /// Integer part as a rational.
    pub fn trunc(&self) -> BigRational {
        BigRational::from_int(self.to_int())
    }

    pub fn floor(&self) -> BigRational {
        let t = self.to_int();
        if !self.is_int() && self.is_negative() {
            BigRational::from_int(t.add_small(-1))
        } else {
            BigRational::from_int(t)
        }
    }

    pub fn ceil(&self) -> BigRational {
        let t = self.to_int();
        if !self.is_int() && self.is_positive() {
            BigRational::from_int(t.add_small(1))
        } else {
            BigRational::from_int(t)
        }
    }

    /// Raises to an integral power. Negative powers invert.
    pub fn powi(&self, exp: &BigRational) -> Result<BigRational> {
        if !exp.is_int() {
            return Err(ExprError::math("Raising number to fractional power"));
        }
        self.powi_int(&exp.num)
    }

    pub fn powi_int(&self, exp: &BigInt) -> Result<BigRational> {
        let invert = exp.is_negative();
        if self.is_zero() && !exp.is_zero() {
            if invert {
                return Err(ExprError::math("Zero raised to negative power"));
            }
            return Ok(BigRational::zero());
        }
        let e = exp.abs();
        let num = self.num.powi(&e)?;
        let den = self.den.powi(&e)?;
        if invert {
            let negative = num.is_negative();
            Ok(BigRational {
                num: den.with_sign(negative),
                den: num.into_abs(),
            })
        } else {
            Ok(BigRational { num, den })
        }
    }

    /// Rounds to `places` decimal places, ties to even.
    ///
    /// Ties are broken on the magnitude, so `round(-x) == -round(x)`.
    pub fn round(&self, places: i64) -> Result<BigRational> {
        if places < 0 {
            return Err(ExprError::math("Negative places for qround"));
        }
        if self.is_int() {
            return Ok(self.clone());
        }
        let scale = ten_pow(places as u64);
        let half = self.den.shr(1);
        let scaled = &(&self.num.abs() * &scale) + &half;
        let (mut q, r) = scaled.div_rem(&self.den)?;
        if r.is_zero() && q.is_odd() && self.den.is_even() {
            q = q.add_small(-1);
        }
        BigRational::new(q.with_sign(self.is_negative()), scale)
    }

    /// Rounds to `places` binary places, ties away from zero.
    pub fn bround(&self, places: usize) -> BigRational {
        if self.is_int() {
            return self.clone();
        }
        let half = self.den.shr(1);
        let scaled = &self.num.abs().shl(places) + &half;
        let q = quo_nonzero(&scaled, &self.den);
        BigRational::from_scaled(q.with_sign(self.is_negative()), places)
    }

    /// Decimal places needed to write the value exactly, or -1 when the
    /// expansion does not terminate.
    pub fn places(&self) -> i64 {
        if self.is_int() {
            return 0;
        }
        let Ok((fives, rest)) = self.den.facrem(&BigInt::from_u32(5)) else {
            return -1;
        };
        if !rest.is_one_bit() {
            return -1;
        }
        (rest.low_bit() as i64).max(fives as i64)
    }

    /// Decimal digits of the integer part.
    pub fn digits(&self, cache: &mut TenPowers) -> u64 {
        self.to_int().digits(cache)
    }

    pub fn gcd(&self, other: &BigRational) -> BigRational {
        if !self.is_int() || !other.is_int() {
            return BigRational::reduce(self.num.gcd(&other.num), self.den.lcm(&other.den));
        }
        BigRational::from_int(self.num.gcd(&other.num))
    }

    pub fn lcm(&self, other: &BigRational) -> BigRational {
        if self.is_zero() || other.is_zero() {
            return BigRational::zero();
        }
        if !self.is_int() || !other.is_int() {
            return BigRational::reduce(self.num.lcm(&other.num), self.den.gcd(&other.den));
        }
        BigRational::from_int(self.num.lcm(&other.num))
    }

    /// Removes every factor `other` from `self`. Both must be integers.
    pub fn facrem(&self, other: &BigRational) -> Result<BigRational> {
        if !self.is_int() || !other.is_int() {
            return Err(ExprError::math("Non-integers for factor removal"));
        }
        let (count, rem) = self.num.facrem(&other.num)?;
        if rem.is_unit() {
            return Ok(BigRational::one());
        }
        if count == 0 {
            return Ok(self.clone());
        }
        Ok(BigRational::from_int(rem))
    }

    /// Modular inverse over integers, zero when none exists.
    pub fn minv(&self, modulus: &BigRational) -> Result<BigRational> {
        if !self.is_int() || !modulus.is_int() {
            return Err(ExprError::math("Non-integers for minv"));
        }
        Ok(BigRational::from_int(self.num.modinv(&modulus.num).unwrap_or_default()))
    }

    /// `self - int(self / modulus) * modulus`, normalized into `[0, modulus)`.
    pub fn fmod(&self, modulus: &BigRational) -> Result<BigRational> {
        if !modulus.is_positive() {
            return Err(ExprError::math("Non-positive modulus"));
        }
        if self.is_int() && modulus.is_int() {
            return Ok(BigRational::from_int(self.num.modulo(&modulus.num)?));
        }
        let q = self.checked_div(modulus)?.trunc();
        let r = self - &(&q * modulus);
        if r.is_negative() {
            Ok(&r + modulus)
        } else {
            Ok(r)
        }
    }

    /// Square root within `epsilon`. Exact squares come back exact.
    pub fn sqrt(&self, epsilon: &BigRational) -> Result<BigRational> {
        if self.is_negative() {
            return Err(ExprError::math("Square root of negative number"));
        }
        if !epsilon.is_positive() {
            return Err(ExprError::math("Bad epsilon value for sqrt"));
        }
        if self.is_zero() || self.is_one() {
            return Ok(self.clone());
        }
        let mut bits = epsilon.bits_for();
        let magnitude = self.num.high_bit() as i64 - self.den.high_bit() as i64 + 1;
        if magnitude > 0 {
            bits += magnitude as usize;
        }
        let radicand = &self.den * &self.num.shl(2 * bits);
        let (root, exact) = radicand.sqrt()?;
        if exact {
            return BigRational::new(root, self.den.shl(bits));
        }
        Ok(BigRational::from_scaled(quo_nonzero(&root, &self.den), bits))
    }

    /// `sqrt(self^2 + other^2)` within `epsilon`.
    pub fn hypot(&self, other: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
        if !epsilon.is_positive() {
            return Err(ExprError::math("Bad epsilon value for hypot"));
        }
        if self.is_zero() {
            return Ok(other.abs());
        }
        if other.is_zero() {
            return Ok(self.abs());
        }
        (&self.square() + &other.square()).sqrt(epsilon)
    }

    /// Binary places needed to resolve a quantity as small as `self`.
    ///
    /// Used to turn an epsilon into a working precision. Never less than zero.
    pub fn bits_for(&self) -> usize {
        let b = self.den.high_bit() as i64 - self.num.high_bit() as i64 + 1;
        b.max(0) as usize
    }

    pub fn to_f64(&self) -> f64 {
        if self.is_int() {
            return self.num.to_f64();
        }
        // Keep 64 significant bits in the quotient before converting.
        let shift = (self.den.bit_length() as i64 - self.num.bit_length() as i64 + 64).max(0) as usize;
        let q = quo_nonzero(&self.num.shl(shift), &self.den);
        crate::bigint::scale_by_pow2(q.to_f64(), -(shift as i32))
    }
}

/// Truncating quotient by a divisor known to be nonzero: a denominator or a gcd of
/// values that are not both zero.
fn quo_nonzero(a: &BigInt, b: &BigInt) -> BigInt {
    a.quo_nonzero(b)
}

impl From<BigInt> for BigRational {
    fn from(value: BigInt) -> Self {
        BigRational::from_int(value)
    }
}

impl From<i64> for BigRational {
    fn from(value: i64) -> Self {
        BigRational::from_i64(value)
    }
}

impl Ord for BigRational {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.signum().cmp(&other.signum()) {
            Ordering::Equal => {}
            ord => return ord,
        }
        if self.den == other.den {
            return self.num.cmp(&other.num);
        }
        (&self.num * &other.den).cmp(&(&other.num * &self.den))
    }
}

impl PartialOrd for BigRational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Neg for BigRational {
    type Output = BigRational;
    fn neg(self) -> BigRational {
        BigRational {
            num: -self.num,
            den: self.den,
        }
    }
}

impl Neg for &BigRational {
    type Output = BigRational;
    fn neg(self) -> BigRational {
        -(self.clone())
    }
}

impl Add<&BigRational> for &BigRational {
    type Output = BigRational;
    fn add(self, rhs: &BigRational) -> BigRational {
        if self.den == rhs.den {
            return BigRational::reduce(&self.num + &rhs.num, self.den.clone());
        }
        BigRational::reduce(
            &(&self.num * &rhs.den) + &(&rhs.num * &self.den),
            &self.den * &rhs.den,
        )
    }
}

impl Sub<&BigRational> for &BigRational {
    type Output = BigRational;
    fn sub(self, rhs: &BigRational) -> BigRational {
        self + &(-rhs)
    }
}

impl Mul<&BigRational> for &BigRational {
    type Output = BigRational;
    fn mul(self, rhs: &BigRational) -> BigRational {
        if self.is_int() && rhs.is_int() {
            return BigRational::from_int(&self.num * &rhs.num);
        }
        BigRational::reduce(&self.num * &rhs.num, &self.den * &rhs.den)
    }
}
