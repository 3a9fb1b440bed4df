//! Transcendental functions over [`BigRational`], accurate to a caller supplied epsilon.
//!
//! Each function turns epsilon into a number of binary places, then runs its series in
//! fixed point: a [`BigInt`] `X` at scale `b` stands for `X / 2^b`. A block of guard bits
//! absorbs the truncation error of the series and of argument reduction, and the result is
//! rounded back to the target number of places as an exact fraction over a power of two.

use crate::bigint::BigInt;
use crate::error::{ExprError, Result};
use crate::rational::BigRational;
use alloc::format;

/// Extra binary places carried through every computation.
const GUARD_BITS: usize = 32;

/// Squarings used to undo the argument halving in [`exp_fixed`].
const EXP_HALVINGS: usize = 8;

/// Halvings of the argument before the arctangent series.
const ATAN_HALVINGS: usize = 3;

/// Positive arguments to `exp` whose integer part needs more bits than this are refused.
const MAX_EXP_ARGUMENT_BITS: usize = 20;

fn target_bits(epsilon: &BigRational, what: &str) -> Result<usize> {
    if !epsilon.is_positive() {
        return Err(ExprError::Math(format!("Bad epsilon value for {}", what)));
    }
    Ok(epsilon.bits_for() + 2)
}

/// Truncating division by a divisor known to be nonzero.
fn quo(a: &BigInt, b: &BigInt) -> BigInt {
    a.quo(b).unwrap_or_default()
}

fn to_fixed(q: &BigRational, bits: usize) -> BigInt {
    quo(&q.numer().shl(bits), q.denom())
}

fn fmul(a: &BigInt, b: &BigInt, bits: usize) -> BigInt {
    (a * b).shr(bits)
}

fn fdiv(a: &BigInt, b: &BigInt, bits: usize) -> BigInt {
    quo(&a.shl(bits), b)
}

/// Square root of a non-negative fixed point value.
fn fsqrt(a: &BigInt, bits: usize) -> BigInt {
    a.shl(bits).sqrt().map(|(r, _)| r).unwrap_or_default()
}

fn divide_small(a: &BigInt, d: u64) -> BigInt {
    quo(a, &BigInt::from_u64(d))
}

/// Shift right with rounding to nearest, symmetric in sign.
fn round_shr(x: &BigInt, shift: usize) -> BigInt {
    if shift == 0 {
        return x.clone();
    }
    (&x.abs() + &BigInt::pow2(shift - 1)).shr(shift).with_sign(x.is_negative())
}

fn finish(x: &BigInt, bits: usize, target: usize) -> BigRational {
    BigRational::from_scaled(round_shr(x, bits - target), target)
}

/// `atan(1/n)` or `atanh(1/n)` at scale `bits`.
fn arctan_inverse(n: u32, bits: usize, hyperbolic: bool) -> BigInt {
    let n2 = n as u64 * n as u64;
    let mut power = divide_small(&BigInt::pow2(bits), n as u64);
    let mut sum = power.clone();
    let mut k: u64 = 1;
    loop {
        power = divide_small(&power, n2);
        if power.is_zero() {
            break;
        }
        let term = divide_small(&power, 2 * k + 1);
        sum = if hyperbolic || k % 2 == 0 { &sum + &term } else { &sum - &term };
        k += 1;
    }
    sum
}

/// pi at scale `bits`, by Machin's formula.
fn pi_fixed(bits: usize) -> BigInt {
    let w = bits + 8;
    let a = arctan_inverse(5, w, false).shl(4);
    let b = arctan_inverse(239, w, false).shl(2);
    (&a - &b).shr(8)
}

/// ln 2 at scale `bits`, as `2 atanh(1/3)`.
fn ln2_fixed(bits: usize) -> BigInt {
    arctan_inverse(3, bits + 8, true).shl(1).shr(8)
}

/// `exp(r)` for a fixed point `r` of magnitude below one.
fn exp_fixed(r: &BigInt, bits: usize) -> BigInt {
    // The same integer at a larger scale is r / 2^EXP_HALVINGS.
    let w = bits + EXP_HALVINGS;
    let one = BigInt::pow2(w);
    let mut term = one.clone();
    let mut sum = one;
    let mut n: u64 = 1;
    loop {
        term = divide_small(&fmul(&term, r, w), n);
        if term.is_zero() {
            break;
        }
        sum = &sum + &term;
        n += 1;
    }
    for _ in 0..EXP_HALVINGS {
        sum = fmul(&sum, &sum, w);
    }
    sum.shr(EXP_HALVINGS)
}

/// `atanh(z)` for a fixed point `|z| <= 1/3`.
fn atanh_fixed(z: &BigInt, bits: usize) -> BigInt {
    let z2 = fmul(z, z, bits);
    let mut power = z.clone();
    let mut sum = z.clone();
    let mut k: u64 = 1;
    loop {
        power = fmul(&power, &z2, bits);
        if power.is_zero() {
            break;
        }
        sum = &sum + &divide_small(&power, 2 * k + 1);
        k += 1;
    }
    sum
}

/// Natural logarithm of a positive rational at scale `bits`.
fn ln_fixed(x: &BigRational, bits: usize) -> BigInt {
    let k = x.numer().high_bit() as i64 - x.denom().high_bit() as i64;
    let (num, den) = if k >= 0 {
        (x.numer().clone(), x.denom().shl(k as usize))
    } else {
        (x.numer().shl(k.unsigned_abs() as usize), x.denom().clone())
    };
    // x = m 2^k with m = num/den in (1/2, 2), and ln m = 2 atanh((m-1)/(m+1)).
    let z = BigRational::new(&num - &den, &num + &den).unwrap_or_default();
    let w = bits + 64 - (k.unsigned_abs() | 1).leading_zeros() as usize + 8;
    let a = atanh_fixed(&to_fixed(&z, w), w).shl(1);
    let l = &a + &(&ln2_fixed(w) * &BigInt::from_i64(k));
    l.shr(w - bits)
}

/// Arctangent of a fixed point value at scale `bits`.
fn atan_fixed(t: &BigInt, bits: usize) -> BigInt {
    let one = BigInt::pow2(bits);
    let negative = t.is_negative();
    let mut t = t.abs();
    let invert = t > one;
    if invert {
        t = fdiv(&one, &t, bits);
    }
    for _ in 0..ATAN_HALVINGS {
        let s = fsqrt(&(&one + &fmul(&t, &t, bits)), bits);
        t = fdiv(&t, &(&one + &s), bits);
    }
    let t2 = fmul(&t, &t, bits);
    let mut power = t.clone();
    let mut sum = t;
    let mut k: u64 = 1;
    loop {
        power = fmul(&power, &t2, bits);
        if power.is_zero() {
            break;
        }
        let term = divide_small(&power, 2 * k + 1);
        sum = if k % 2 == 0 { &sum + &term } else { &sum - &term };
        k += 1;
    }
    let mut result = sum.shl(ATAN_HALVINGS);
    if invert {
        result = &pi_fixed(bits).shr(1) - &result;
    }
    result.with_sign(negative)
}

/// `sin(x + quarter_turns * pi/2)` at scale `bits`.
fn sin_fixed(x: &BigRational, bits: usize, quarter_turns: i64) -> BigInt {
    let w = bits + x.to_int().bit_length() + 8;
    let xf = to_fixed(x, w);
    let half_pi = pi_fixed(w).shr(1);
    let (q, r) = (&xf + &half_pi.shr(1))
        .div_mod_floor(&half_pi)
        .unwrap_or_default();
    let r = &r - &half_pi.shr(1);
    let quadrant = q.add_small(quarter_turns).modulo(&BigInt::from_u32(4)).unwrap_or_default();

    let r2 = fmul(&r, &r, w);
    let use_cos = quadrant.is_odd();
    let mut term = if use_cos { BigInt::pow2(w) } else { r.clone() };
    let mut sum = term.clone();
    let mut n: u64 = if use_cos { 1 } else { 2 };
    loop {
        term = -divide_small(&fmul(&term, &r2, w), n * (n + 1));
        if term.is_zero() {
            break;
        }
        sum = &sum + &term;
        n += 2;
    }
    let sum = if quadrant.low_word() >= 2 { -sum } else { sum };
    sum.shr(w - bits)
}

/// pi within epsilon.
pub fn pi(epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "pi")?;
    let bits = target + GUARD_BITS;
    Ok(finish(&pi_fixed(bits), bits, target))
}

/// e^x within epsilon.
pub fn exp(x: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "exp")?;
    if x.is_zero() {
        return Ok(BigRational::one());
    }
    let whole = x.to_int();
    if x.is_negative() {
        // e^x < 2^-target
        if whole.abs() > BigInt::from_u64(target as u64) {
            return Ok(BigRational::zero());
        }
    } else if whole.bit_length() > MAX_EXP_ARGUMENT_BITS {
        return Err(ExprError::math("Argument too large for exp"));
    }

    let coarse = 64;
    let k = round_div(&to_fixed(x, coarse), &ln2_fixed(coarse));
    let k = k.to_i64().unwrap_or(0);
    let kbits = 64 - k.unsigned_abs().leading_zeros() as usize;
    let bits = target + k.max(0) as usize + kbits + GUARD_BITS;
    let r = &to_fixed(x, bits) - &(&ln2_fixed(bits) * &BigInt::from_i64(k));
    let e = exp_fixed(&r, bits);
    let shift = (bits as i64 - target as i64 - k) as usize;
    Ok(BigRational::from_scaled(round_shr(&e, shift), target))
}

/// Nearest integer to `a / b`.
fn round_div(a: &BigInt, b: &BigInt) -> BigInt {
    let (q, _) = (&a.shl(1) + b).div_mod_floor(&b.shl(1)).unwrap_or_default();
    q
}

/// Natural logarithm within epsilon.
pub fn ln(x: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "ln")?;
    if !x.is_positive() {
        return Err(ExprError::math("Log of non-positive number"));
    }
    if x.is_one() {
        return Ok(BigRational::zero());
    }
    let bits = target + GUARD_BITS;
    Ok(finish(&ln_fixed(x, bits), bits, target))
}

/// Base 10 logarithm within epsilon.
pub fn log10(x: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "log10")?;
    if !x.is_positive() {
        return Err(ExprError::math("Log of non-positive number"));
    }
    let bits = target + GUARD_BITS;
    let l = ln_fixed(x, bits);
    let ten = ln_fixed(&BigRational::from_i64(10), bits);
    Ok(finish(&fdiv(&l, &ten, bits), bits, target))
}

pub fn sin(x: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "sin")?;
    if x.is_zero() {
        return Ok(BigRational::zero());
    }
    let bits = target + GUARD_BITS;
    Ok(finish(&sin_fixed(x, bits, 0), bits, target))
}

pub fn cos(x: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "cos")?;
    if x.is_zero() {
        return Ok(BigRational::one());
    }
    let bits = target + GUARD_BITS;
    Ok(finish(&sin_fixed(x, bits, 1), bits, target))
}

pub fn tan(x: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "tan")?;
    if x.is_zero() {
        return Ok(BigRational::zero());
    }
    let bits = target + 2 * GUARD_BITS;
    let s = sin_fixed(x, bits, 0);
    let c = sin_fixed(x, bits, 1);
    if c.is_zero() {
        return Err(ExprError::math("Tangent of odd multiple of pi/2"));
    }
    Ok(finish(&fdiv(&s, &c, bits), bits, target))
}

pub fn atan(x: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "atan")?;
    if x.is_zero() {
        return Ok(BigRational::zero());
    }
    let bits = target + GUARD_BITS;
    Ok(finish(&atan_fixed(&to_fixed(x, bits), bits), bits, target))
}

/// `asin` at scale `bits`. `|x| <= 1` is checked by the callers.
fn asin_fixed(x: &BigRational, bits: usize) -> BigInt {
    if x.abs().is_one() {
        return pi_fixed(bits).shr(1).with_sign(x.is_negative());
    }
    let rest = &BigRational::one() - &x.square();
    let w = bits + rest.bits_for();
    let s = fsqrt(&to_fixed(&rest, w), w);
    let t = fdiv(&to_fixed(x, w), &s, w);
    atan_fixed(&t, w).shr(w - bits)
}

pub fn asin(x: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "asin")?;
    if x.abs() > BigRational::one() {
        return Err(ExprError::math("Argument too large for asin"));
    }
    if x.is_zero() {
        return Ok(BigRational::zero());
    }
    let bits = target + GUARD_BITS;
    Ok(finish(&asin_fixed(x, bits), bits, target))
}

pub fn acos(x: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "acos")?;
    if x.abs() > BigRational::one() {
        return Err(ExprError::math("Argument too large for acos"));
    }
    if x.is_one() {
        return Ok(BigRational::zero());
    }
    let bits = target + GUARD_BITS;
    let a = &pi_fixed(bits).shr(1) - &asin_fixed(x, bits);
    Ok(finish(&a, bits, target))
}

/// Angle of the point `(x, y)`, in `(-pi, pi]`. The origin gives zero.
pub fn atan2(y: &BigRational, x: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "atan2")?;
    let bits = target + GUARD_BITS;
    let angle = if x.is_zero() {
        if y.is_zero() {
            return Ok(BigRational::zero());
        }
        pi_fixed(bits).shr(1).with_sign(y.is_negative())
    } else {
        let a = atan_fixed(&to_fixed(&y.checked_div(x)?, bits), bits);
        if x.is_positive() {
            a
        } else if y.is_negative() {
            &a - &pi_fixed(bits)
        } else {
            &a + &pi_fixed(bits)
        }
    };
    Ok(finish(&angle, bits, target))
}

/// `e^|x|` with half the error budget, for the hyperbolic functions.
fn exp_abs(x: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let tight = epsilon.checked_div(&BigRational::from_i64(4))?;
    exp(&x.abs(), &tight)
}

pub fn sinh(x: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "sinh")?;
    if x.is_zero() {
        return Ok(BigRational::zero());
    }
    let e = exp_abs(x, epsilon)?;
    let half = BigRational::from_i64(2);
    let s = (&e - &e.inverse()?).checked_div(&half)?.bround(target);
    Ok(if x.is_negative() { -s } else { s })
}

pub fn cosh(x: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "cosh")?;
    if x.is_zero() {
        return Ok(BigRational::one());
    }
    let e = exp_abs(x, epsilon)?;
    Ok((&e + &e.inverse()?).checked_div(&BigRational::from_i64(2))?.bround(target))
}

pub fn tanh(x: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "tanh")?;
    if x.is_zero() {
        return Ok(BigRational::zero());
    }
    let t = if x.abs() > BigRational::from_i64(target as i64) {
        BigRational::one()
    } else {
        let e2 = exp_abs(x, epsilon)?.square();
        let one = BigRational::one();
        (&e2 - &one).checked_div(&(&e2 + &one))?.bround(target)
    };
    Ok(if x.is_negative() { -t } else { t })
}

/// Rough base 2 logarithm of a positive rational.
fn log2_estimate(x: &BigRational) -> f64 {
    #[cfg(feature = "libm")]
    {
        let f = x.to_f64();
        if f.is_finite() && f > 0.0 {
            return libm::log2(f);
        }
    }
    x.numer().high_bit() as f64 - x.denom().high_bit() as f64
}

/// `x^y` within epsilon. Integral powers are exact.
pub fn pow(x: &BigRational, y: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "power")?;
    if y.is_int() {
        return x.powi(y);
    }
    if x.is_zero() {
        if y.is_negative() {
            return Err(ExprError::math("Zero raised to negative power"));
        }
        return Ok(BigRational::zero());
    }
    if x.is_negative() {
        return Err(ExprError::math("Negative number raised to non-integral power"));
    }
    if x.is_one() {
        return Ok(BigRational::one());
    }
    let result_bits = y.to_f64() * log2_estimate(x);
    if result_bits > (1u64 << MAX_EXP_ARGUMENT_BITS) as f64 {
        return Err(ExprError::math("Argument too large for exp"));
    }
    let extra = result_bits.max(0.0) as usize + y.to_int().bit_length() + 8;
    let bits = target + extra + GUARD_BITS;
    let l = BigRational::from_scaled(ln_fixed(x, bits), bits);
    exp(&(y * &l), epsilon)
}

/// Real `n`-th root within epsilon. Odd roots of negative numbers are negative.
pub fn root(x: &BigRational, n: &BigRational, epsilon: &BigRational) -> Result<BigRational> {
    let target = target_bits(epsilon, "root")?;
    if !n.is_int() {
        return Err(ExprError::math("Non-integral root"));
    }
    if !n.is_positive() {
        return Err(ExprError::math("Non-positive root"));
    }
    if x.is_zero() || n.is_one() {
        return Ok(x.clone());
    }
    if x.is_negative() && n.numer().is_even() {
        return Err(ExprError::math("Even root of negative number"));
    }
    let Some(k) = n.numer().to_u64().filter(|k| *k <= u16::MAX as u64) else {
        // Beyond this every root is within epsilon of exp(ln|x| / n).
        let l = ln(&x.abs(), &epsilon.checked_div(&BigRational::from_i64(4))?)?;
        let r = exp(&l.checked_div(n)?, epsilon)?;
        return Ok(if x.is_negative() { -r } else { r });
    };
    let mut bits = target + 2;
    let magnitude = x.numer().high_bit() as i64 - x.denom().high_bit() as i64 + 1;
    if magnitude > 0 {
        bits += magnitude as usize / k as usize + 1;
    }
    let den = x.denom();
    let radicand = (&x.numer().abs() * &den.powi(&BigInt::from_u64(k - 1))?).shl(k as usize * bits);
    let r = radicand.root(&BigInt::from_u64(k))?;
    let exact = r.powi(&BigInt::from_u64(k))? == radicand;
    let result = if exact {
        BigRational::new(r, den.shl(bits))?
    } else {
        BigRational::from_scaled(quo(&r, den), bits)
    };
    Ok(if x.is_negative() { -result } else { result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigint::tenpow::ten_pow;

    fn eps(places: u64) -> BigRational {
        BigRational::new(BigInt::one(), ten_pow(places)).unwrap()
    }

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from_i64(n), BigInt::from_i64(d)).unwrap()
    }

    fn decimal(s: &str) -> BigRational {
        crate::parse::parse_rational(s).unwrap()
    }

    fn assert_close(actual: &BigRational, expected: &BigRational, places: u64) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= eps(places),
            "{:?} differs from {:?} by {:?}",
            actual,
            expected,
            diff
        );
    }

    #[test]
    fn test_pi() {
        let p = pi(&eps(40)).unwrap();
        assert_close(&p, &decimal("3.1415926535897932384626433832795028841971693993751"), 40);
        assert!(pi(&BigRational::zero()).is_err());
    }

    #[test]
    fn test_exp_and_ln() {
        let e = exp(&BigRational::one(), &eps(30)).unwrap();
        assert_close(&e, &decimal("2.718281828459045235360287471352662497757"), 30);
        let small = exp(&q(-1, 2), &eps(20)).unwrap();
        assert_close(&small, &decimal("0.60653065971263342360379953499118045344"), 20);
        let big = exp(&BigRational::from_i64(50), &eps(10)).unwrap();
        assert_close(&big, &decimal("5184705528587072464087.45332293348538"), 10);
        assert_eq!(exp(&BigRational::from_i64(-100000), &eps(10)).unwrap(), BigRational::zero());
        assert!(exp(&BigRational::from_i64(1 << 22), &eps(10)).is_err());

        let l = ln(&BigRational::from_i64(2), &eps(30)).unwrap();
        assert_close(&l, &decimal("0.693147180559945309417232121458176568"), 30);
        let l = ln(&q(1, 10), &eps(20)).unwrap();
        assert_close(&l, &decimal("-2.302585092994045684017991454684364208"), 20);
        assert_eq!(ln(&BigRational::one(), &eps(20)).unwrap(), BigRational::zero());
        assert_eq!(
            ln(&BigRational::zero(), &eps(20)).unwrap_err(),
            ExprError::math("Log of non-positive number")
        );
        let l = log10(&BigRational::from_i64(1000), &eps(20)).unwrap();
        assert_close(&l, &BigRational::from_i64(3), 20);
    }

    #[test]
    fn test_trig() {
        let s = sin(&BigRational::one(), &eps(25)).unwrap();
        assert_close(&s, &decimal("0.8414709848078965066525023216302989996"), 25);
        let c = cos(&BigRational::one(), &eps(25)).unwrap();
        assert_close(&c, &decimal("0.5403023058681397174009366074429766037"), 25);
        let s = sin(&BigRational::from_i64(100), &eps(20)).unwrap();
        assert_close(&s, &decimal("-0.50636564110975879365655761045978543206"), 20);
        let t = tan(&q(1, 2), &eps(20)).unwrap();
        assert_close(&t, &decimal("0.54630248984379051325517946578028538329"), 20);
        let c = cos(&q(-3, 1), &eps(20)).unwrap();
        assert_close(&c, &decimal("-0.98999249660044545727157279473126130239"), 20);
    }

    #[test]
    fn test_inverse_trig() {
        let quarter = decimal("0.78539816339744830961566084581987572105");
        assert_close(&atan(&BigRational::one(), &eps(25)).unwrap(), &quarter, 25);
        let a = atan(&BigRational::from_i64(-10), &eps(20)).unwrap();
        assert_close(&a, &decimal("-1.47112767430373459185287557176173085186"), 20);
        let half = q(1, 2);
        let a = asin(&half, &eps(20)).unwrap();
        assert_close(&a, &decimal("0.52359877559829887307710723054658381403"), 20);
        let a = acos(&half, &eps(20)).unwrap();
        assert_close(&a, &decimal("1.0471975511965977461542144610931676281"), 20);
        assert!(asin(&q(3, 2), &eps(10)).is_err());
        let a = atan2(&BigRational::one(), &BigRational::from_i64(-1), &eps(20)).unwrap();
        assert_close(&a, &decimal("2.35619449019234492884698253745962716315"), 20);
        assert_eq!(
            atan2(&BigRational::zero(), &BigRational::zero(), &eps(20)).unwrap(),
            BigRational::zero()
        );
    }

    #[test]
    fn test_hyperbolic() {
        let s = sinh(&BigRational::one(), &eps(20)).unwrap();
        assert_close(&s, &decimal("1.17520119364380145688238185059560081516"), 20);
        let c = cosh(&BigRational::from_i64(-1), &eps(20)).unwrap();
        assert_close(&c, &decimal("1.54308063481524377847790562075706168260"), 20);
        let t = tanh(&q(-1, 2), &eps(20)).unwrap();
        assert_close(&t, &decimal("-0.46211715726000975850231848364367254873"), 20);
    }

    #[test]
    fn test_pow_and_root() {
        assert_eq!(pow(&q(2, 3), &BigRational::from_i64(2), &eps(10)).unwrap(), q(4, 9));
        let p = pow(&BigRational::from_i64(2), &q(1, 2), &eps(25)).unwrap();
        assert_close(&p, &decimal("1.4142135623730950488016887242096980786"), 25);
        let p = pow(&BigRational::from_i64(10), &q(5, 2), &eps(15)).unwrap();
        assert_close(&p, &decimal("316.22776601683793319988935444327185337"), 15);
        assert!(pow(&BigRational::from_i64(-2), &q(1, 2), &eps(10)).is_err());

        assert_eq!(root(&BigRational::from_i64(27), &BigRational::from_i64(3), &eps(10)).unwrap(), q(3, 1));
        assert_eq!(root(&q(-8, 27), &BigRational::from_i64(3), &eps(10)).unwrap(), q(-2, 3));
        let r = root(&BigRational::from_i64(2), &BigRational::from_i64(3), &eps(25)).unwrap();
        assert_close(&r, &decimal("1.2599210498948731647672106072782283506"), 25);
        assert!(root(&BigRational::from_i64(-4), &BigRational::from_i64(2), &eps(10)).is_err());
        assert!(root(&BigRational::from_i64(4), &q(1, 2), &eps(10)).is_err());
    }
}
