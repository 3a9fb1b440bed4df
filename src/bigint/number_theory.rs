//! Number theoretic functions on [`BigInt`].
//!
//! Everything here is built on the word-level primitives of the parent module. Domain
//! violations come back as [`ExprError::Math`] carrying a fixed message, so that the
//! evaluator can report them to the user unchanged.

use super::tenpow::TenPowers;
use super::{BigInt, mag_divrem};
use crate::error::{ExprError, Result};
use crate::vec;
use core::cmp::Ordering;

/// Word-length difference above which gcd reduces by long division before going binary.
pub const GCD_REDUCE_THRESHOLD: usize = 5;

/// Default ceiling for factorial-like arguments.
pub const MAX_FACTORIAL: u64 = 1 << 24;

/// Values up to this bound are tested for primality by trial division alone.
const TRIAL_DIVISION_LIMIT: u32 = 101 * 101 - 1;

/// 3 * 5 * 7 * 11 * 13
const SMALL_ODD_PRIMORIAL: u32 = 15015;

/// 17 * 19 * 23
const NEXT_PRIMORIAL: u32 = 7429;

/// Remainder of a division whose divisor is known to be nonzero.
fn rem_nonzero(a: &BigInt, b: &BigInt) -> BigInt {
    debug_assert!(!b.is_zero(), "remainder by zero");
    BigInt::from_parts(a.negative, mag_divrem(&a.mag, &b.mag).1)
}

/// Quotient of a division whose divisor is known to be nonzero.
fn quo_nonzero(a: &BigInt, b: &BigInt) -> BigInt {
    a.quo_nonzero(b)
}

/// Product of all primes up to `n`.
fn primorial(n: u32) -> BigInt {
    if n < 2 {
        return BigInt::one();
    }
    let limit = n as usize;
    let mut composite = vec![false; limit + 1];
    let mut result = BigInt::one();
    let mut batch: u64 = 2;
    let mut p = 3;
    while p <= limit {
        if !composite[p] {
            let mut multiple = p * p;
            while multiple <= limit {
                composite[multiple] = true;
                multiple += 2 * p;
            }
            if batch * p as u64 > u32::MAX as u64 {
                result = result.mul_small(batch as u32);
                batch = p as u64;
            } else {
                batch *= p as u64;
            }
        }
        p += 2;
    }
    result.mul_small(batch as u32)
}

fn is_small_prime(p: u64) -> bool {
    if p < 2 {
        return false;
    }
    if p % 2 == 0 {
        return p == 2;
    }
    let mut d = 3;
    while d * d <= p {
        if p % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

impl BigInt {
    /// Floor division: the remainder takes the sign of the divisor.
    ///
    /// This is the convention of the evaluator's integer `/` and `%`:
    /// `-7 / 3 == -3`, `-7 % 3 == 2`, `7 % -3 == -2`.
    pub fn div_mod_floor(&self, divisor: &BigInt) -> Result<(BigInt, BigInt)> {
        let (q, r) = self.div_rem(divisor)?;
        if !r.is_zero() && self.negative != divisor.negative {
            Ok((q.add_small(-1), &r + divisor))
        } else {
            Ok((q, r))
        }
    }

    /// Remainder in `[0, |modulus|)`.
    pub fn modulo(&self, modulus: &BigInt) -> Result<BigInt> {
        let r = self.rem(modulus)?;
        if r.is_negative() {
            Ok(&r + &modulus.abs())
        } else {
            Ok(r)
        }
    }

    /// Greatest common divisor, always non-negative.
    pub fn gcd(&self, other: &BigInt) -> BigInt {
        self.gcd_with_threshold(other, GCD_REDUCE_THRESHOLD)
    }

    /// Hybrid gcd: long division while the operands differ by more than `threshold`
    /// words, then the binary algorithm.
    pub fn gcd_with_threshold(&self, other: &BigInt, threshold: usize) -> BigInt {
        let mut a = self.abs();
        let mut b = other.abs();
        if a.is_zero() {
            return b;
        }
        if b.is_zero() {
            return a;
        }
        if a.is_one() || b.is_one() {
            return BigInt::one();
        }
        if a.len_words() < b.len_words() {
            core::mem::swap(&mut a, &mut b);
        }
        while a.len_words() > b.len_words() + threshold {
            let r = rem_nonzero(&a, &b);
            if r.is_zero() {
                return b;
            }
            a = b;
            b = r;
        }

        let k = a.low_bit().min(b.low_bit());
        let mut u = a.shr(k);
        let mut v = b.shr(k);
        let mut t = if u.is_odd() { -&v } else { u.clone() };
        while !t.is_zero() {
            t = t.shr(t.low_bit());
            if t.is_positive() {
                u = t;
            } else {
                v = -t;
            }
            t = &u - &v;
        }
        u.shl(k)
    }

    /// Least common multiple, always non-negative. Zero if either operand is zero.
    pub fn lcm(&self, other: &BigInt) -> BigInt {
        if self.is_zero() || other.is_zero() {
            return BigInt::zero();
        }
        let g = self.gcd(other);
        &quo_nonzero(&self.abs(), &g) * &other.abs()
    }

    /// True when the only common divisor is 1.
    pub fn relprime(&self, other: &BigInt) -> bool {
        if self.is_even() && other.is_even() {
            return false;
        }
        if self.is_unit() || other.is_unit() {
            return true;
        }
        if self.is_zero() || other.is_zero() {
            return false;
        }
        if self.abs() == BigInt::two() || other.abs() == BigInt::two() {
            return true;
        }
        let (ra, rb) = (self.mod_small(SMALL_ODD_PRIMORIAL), other.mod_small(SMALL_ODD_PRIMORIAL));
        if [3, 5, 7, 11, 13].iter().any(|p| ra % p == 0 && rb % p == 0) {
            return false;
        }
        let (ra, rb) = (self.mod_small(NEXT_PRIMORIAL), other.mod_small(NEXT_PRIMORIAL));
        if [17, 19, 23].iter().any(|p| ra % p == 0 && rb % p == 0) {
            return false;
        }
        self.gcd(other).is_one()
    }

    /// Inverse of `self` modulo `modulus`, in `[0, |modulus|)`.
    ///
    /// Extended Euclid with Lehmer acceleration: while the remainders are long, the
    /// quotient sequence is simulated on their leading 63 bits and applied to the full
    /// values as one 2x2 matrix. Returns `None` when the operands share a factor.
    pub fn modinv(&self, modulus: &BigInt) -> Option<BigInt> {
        let m = modulus.abs();
        if m.is_zero() {
            return None;
        }
        if m.is_one() {
            return Some(BigInt::zero());
        }
        let mut u3 = m.clone();
        let mut v3 = self.modulo(&m).ok()?;
        let mut u2 = BigInt::zero();
        let mut v2 = BigInt::one();

        while !v3.is_zero() {
            let bits = u3.bit_length();
            if bits > 64 {
                let shift = bits - 63;
                let mut uh = u3.shr(shift).to_i64().unwrap_or(0) as i128;
                let mut vh = v3.shr(shift).to_i64().unwrap_or(0) as i128;
                let (mut a, mut b, mut c, mut d) = (1i128, 0i128, 0i128, 1i128);
                loop {
                    let (den1, den2) = (vh + c, vh + d);
                    if den1 <= 0 || den2 <= 0 || uh + a < 0 || uh + b < 0 {
                        break;
                    }
                    let q = (uh + a) / den1;
                    if q != (uh + b) / den2 {
                        break;
                    }
                    (a, c) = (c, a - q * c);
                    (b, d) = (d, b - q * d);
                    (uh, vh) = (vh, uh - q * vh);
                }
                if b != 0 {
                    let (ba, bb, bc, bd) = (
                        BigInt::from_i128(a),
                        BigInt::from_i128(b),
                        BigInt::from_i128(c),
                        BigInt::from_i128(d),
                    );
                    (u3, v3) = (&(&ba * &u3) + &(&bb * &v3), &(&bc * &u3) + &(&bd * &v3));
                    (u2, v2) = (&(&ba * &u2) + &(&bb * &v2), &(&bc * &u2) + &(&bd * &v2));
                    continue;
                }
            }
            let (q, r) = (quo_nonzero(&u3, &v3), rem_nonzero(&u3, &v3));
            let next = &u2 - &(&q * &v2);
            (u3, v3) = (v3, r);
            (u2, v2) = (v2, next);
        }

        if !u3.is_one() {
            return None;
        }
        u2.modulo(&m).ok()
    }

    /// `self^exp` for a non-negative integer exponent.
    ///
    /// Powers of two in the base are split off and restored by a shift at the end.
    pub fn powi(&self, exp: &BigInt) -> Result<BigInt> {
        if exp.is_negative() {
            return Err(ExprError::math("Negative power for integer power"));
        }
        let negative = self.negative && exp.is_odd();
        if exp.is_zero() {
            return Ok(BigInt::one());
        }
        if self.is_zero() {
            return Ok(BigInt::zero());
        }
        if self.is_unit() {
            return Ok(BigInt::one().with_sign(negative));
        }
        let power = exp
            .to_u64()
            .filter(|p| *p <= u32::MAX as u64)
            .ok_or_else(|| ExprError::math("Raising to very large power"))?;
        Ok(self.abs().pow_u64(power).with_sign(negative))
    }

    fn pow_u64(&self, power: u64) -> BigInt {
        if power == 0 {
            return BigInt::one();
        }
        if self.is_one_bit() {
            return BigInt::pow2(self.high_bit() * power as usize);
        }
        if self.mag == [10] {
            return TenPowers::new().ten_pow(power);
        }
        let low = self.low_bit();
        let twos = low * power as usize;
        let base = self.shr(low);
        let result = match power {
            1 => base,
            2 => base.square(),
            3 => &base.square() * &base,
            4 => base.square().square(),
            _ => {
                let mut acc = base.clone();
                for bit in (0..63 - power.leading_zeros()).rev() {
                    acc = acc.square();
                    if (power >> bit) & 1 == 1 {
                        acc = &acc * &base;
                    }
                }
                acc
            }
        };
        result.shl(twos)
    }

    /// `self^exp mod modulus`, in `[0, modulus)`.
    pub fn powermod(&self, exp: &BigInt, modulus: &BigInt) -> Result<BigInt> {
        if !modulus.is_positive() {
            return Err(ExprError::math("Non-positive modulus for pmod"));
        }
        if exp.is_negative() {
            return Err(ExprError::math("Negative power for pmod"));
        }
        Ok(self.modulo(modulus)?.powermod_unchecked(exp, modulus))
    }

    /// `self` must already be reduced and `modulus` positive.
    fn powermod_unchecked(&self, exp: &BigInt, modulus: &BigInt) -> BigInt {
        if modulus.is_one() {
            return BigInt::zero();
        }
        let mut result = BigInt::one();
        for bit in (0..exp.bit_length()).rev() {
            result = rem_nonzero(&result.square(), modulus);
            if exp.test_bit(bit) {
                result = rem_nonzero(&(&result * self), modulus);
            }
        }
        result
    }

    /// `n!`, refusing arguments above `limit`.
    pub fn fact(&self, limit: u64) -> Result<BigInt> {
        if self.is_negative() {
            return Err(ExprError::math("Negative argument for factorial"));
        }
        let n = self
            .to_u64()
            .filter(|n| *n <= limit)
            .ok_or_else(|| ExprError::math("Very large factorial"))?;
        let mut twos = 0usize;
        let mut result = BigInt::one();
        let mut batch: u64 = 1;
        for i in 2..=n {
            let tz = i.trailing_zeros();
            twos += tz as usize;
            let m = i >> tz;
            if batch * m > u32::MAX as u64 {
                result = result.mul_small(batch as u32);
                batch = m;
            } else {
                batch *= m;
            }
        }
        Ok(result.mul_small(batch as u32).shl(twos))
    }

    /// Product of the primes not exceeding `n`.
    pub fn pfact(&self, limit: u64) -> Result<BigInt> {
        if self.is_negative() {
            return Err(ExprError::math("Negative argument for factorial"));
        }
        let n = self
            .to_u64()
            .filter(|n| *n <= limit && *n <= u32::MAX as u64)
            .ok_or_else(|| ExprError::math("Very large factorial"))?;
        Ok(primorial(n as u32))
    }

    /// Number of ordered selections of `k` items out of `self`.
    pub fn perm(&self, k: &BigInt, limit: u64) -> Result<BigInt> {
        if self.is_negative() || k.is_negative() {
            return Err(ExprError::math("Negative argument for permutation"));
        }
        if k > self {
            return Err(ExprError::math("Second arg larger than first in permutation"));
        }
        let count = k
            .to_u64()
            .filter(|c| *c <= limit)
            .ok_or_else(|| ExprError::math("Very large permutation"))?;
        let mut result = BigInt::one();
        let mut factor = self.clone();
        for _ in 0..count {
            result = match factor.to_u64().filter(|f| *f <= u32::MAX as u64) {
                Some(f) => result.mul_small(f as u32),
                None => &result * &factor,
            };
            factor = factor.add_small(-1);
        }
        Ok(result)
    }

    /// Binomial coefficient `self` choose `k`.
    pub fn comb(&self, k: &BigInt, limit: u64) -> Result<BigInt> {
        if self.is_negative() || k.is_negative() {
            return Err(ExprError::math("Negative argument for combinatorial"));
        }
        if k > self {
            return Err(ExprError::math("Second arg larger than first for combinatorial"));
        }
        let other = self - k;
        let smaller = if &other < k { &other } else { k };
        let count = smaller
            .to_u64()
            .filter(|c| *c <= limit)
            .ok_or_else(|| ExprError::math("Very large combinatorial"))?;
        let mut result = BigInt::one();
        let mut factor = self.clone();
        for i in 1..=count {
            result = quo_nonzero(&(&result * &factor), &BigInt::from_u64(i));
            factor = factor.add_small(-1);
        }
        Ok(result)
    }

    /// Fibonacci number, extended to negative indices by `F(-n) = (-1)^(n+1) F(n)`.
    pub fn fib(&self, limit: u64) -> Result<BigInt> {
        let n = self
            .abs()
            .to_u64()
            .filter(|n| *n <= limit)
            .ok_or_else(|| ExprError::math("Very large Fibonacci number"))?;
        if n == 0 {
            return Ok(BigInt::zero());
        }
        let negative = self.is_negative() && n % 2 == 0;
        if n <= 2 {
            return Ok(BigInt::one().with_sign(negative));
        }
        let (mut fnm1, mut fnn, mut fnp1) = (BigInt::zero(), BigInt::one(), BigInt::one());
        for bit in (0..63 - n.leading_zeros()).rev() {
            let t1 = fnm1.square();
            let t2 = fnn.square();
            let t3 = fnp1.square();
            fnp1 = &t2 + &t3;
            fnn = &t3 - &t1;
            if (n >> bit) & 1 == 1 {
                fnm1 = fnn;
                fnn = fnp1;
                fnp1 = &fnm1 + &fnn;
            } else {
                fnm1 = &fnp1 - &fnn;
            }
        }
        Ok(fnn.with_sign(negative))
    }

    /// Probabilistic primality test on the magnitude of `self`.
    ///
    /// Small values are settled by trial division. Larger ones must survive a cheap
    /// small-factor screen and then `count` strong-pseudoprime rounds with the odd
    /// witnesses 3, 5, 7, ...
    pub fn primetest(&self, count: u64) -> bool {
        let z = self.abs();
        if z.is_even() {
            return z == BigInt::two();
        }
        if z.is_small(TRIAL_DIVISION_LIMIT) {
            return is_small_prime(z.low_word() as u64);
        }
        let r = z.mod_small(SMALL_ODD_PRIMORIAL);
        if [3, 5, 7, 11, 13].iter().any(|p| r % p == 0) {
            return false;
        }
        if !z.gcd(&primorial(101)).is_one() {
            return false;
        }

        let zm1 = z.add_small(-1);
        let twos = zm1.low_bit();
        let odd = zm1.shr(twos);
        let rounds = z.add_small(-3).shr(1).to_u64().map_or(count, |cap| cap.min(count));
        for i in 0..rounds {
            let witness = BigInt::from_u64(3 + 2 * i);
            let mut x = witness.powermod_unchecked(&odd, &z);
            let mut squarings = 0;
            loop {
                if x.is_one() {
                    if squarings > 0 {
                        return false;
                    }
                    break;
                }
                if x == zm1 {
                    break;
                }
                squarings += 1;
                if squarings >= twos {
                    return false;
                }
                x = rem_nonzero(&x.square(), &z);
            }
        }
        true
    }

    /// Removes every factor `factor` from `self`.
    ///
    /// Returns how many times it divided and what is left.
    pub fn facrem(&self, factor: &BigInt) -> Result<(u64, BigInt)> {
        if factor.cmp_abs(&BigInt::one()) != Ordering::Greater {
            return Err(ExprError::math("Bad argument for facrem"));
        }
        if self.is_zero() {
            return Ok((0, BigInt::zero()));
        }
        let f = factor.abs();
        let mut rem = self.abs();
        let mut count: u64;

        if f.is_one_bit() {
            let step = f.low_bit();
            count = (rem.low_bit() / step) as u64;
            rem = rem.shr(count as usize * step);
        } else {
            if !rem.divides_by(&f) {
                return Ok((0, self.clone()));
            }
            rem = quo_nonzero(&rem, &f);
            count = 1;
            let mut squares = vec![f];
            loop {
                let Some(last) = squares.last() else { break };
                if last.len_words() * 2 - 1 > rem.len_words() {
                    break;
                }
                let sq = last.square();
                let (q, r) = mag_divrem(&rem.mag, &sq.mag);
                if !r.is_empty() {
                    break;
                }
                rem = BigInt::from_parts(false, q);
                count += 1 << squares.len();
                squares.push(sq);
            }
            for (i, sq) in squares.iter().enumerate().rev() {
                if sq.len_words() <= rem.len_words() {
                    let (q, r) = mag_divrem(&rem.mag, &sq.mag);
                    if r.is_empty() {
                        rem = BigInt::from_parts(false, q);
                        count += 1 << i;
                    }
                }
            }
        }
        let negative = self.negative != (factor.negative && count % 2 == 1);
        Ok((count, rem.with_sign(negative)))
    }

    /// Divides out of `self` every prime it shares with `other`.
    pub fn gcdrem(&self, other: &BigInt) -> Result<BigInt> {
        if self.is_zero() {
            return Ok(BigInt::zero());
        }
        let mut g = self.gcd(other);
        if g.is_unit() || g.is_zero() {
            return Ok(self.clone());
        }
        let mut z = quo_nonzero(self, &g);
        while !g.is_unit() {
            z = z.facrem(&g)?.1;
            g = z.gcd(&g);
        }
        Ok(z)
    }

    /// Lowest prime factor among the first `count` primes, or 1 when none divides.
    pub fn lowfactor(&self, count: u64) -> u64 {
        if count == 0 || self.is_zero() {
            return 1;
        }
        if self.is_even() {
            return 2;
        }
        let mut remaining = count - 1;
        let mut p: u64 = 3;
        while remaining > 0 && p <= u32::MAX as u64 {
            if is_small_prime(p) {
                if self.mod_small(p as u32) == 0 {
                    return p;
                }
                remaining -= 1;
            }
            p += 2;
        }
        1
    }

    /// Number of decimal digits in the magnitude. Zero has one digit.
    pub fn digits(&self, cache: &mut TenPowers) -> u64 {
        if self.is_small(u32::MAX) {
            let mut count = 1;
            let mut v = self.low_word() as u64;
            while v >= 10 {
                v /= 10;
                count += 1;
            }
            return count;
        }
        self.abs().log10(cache).map_or(1, |l| l + 1)
    }

    /// Integer part of the base 10 logarithm.
    pub fn log10(&self, cache: &mut TenPowers) -> Result<u64> {
        if !self.is_positive() {
            return Err(ExprError::math("Non-positive number for log10"));
        }
        let depth = cache.depth_for(self);
        let mut z = self.clone();
        let mut result = 0u64;
        for k in (0..depth).rev() {
            let p = cache.get(k);
            if z.cmp_abs(p) != Ordering::Less {
                z = quo_nonzero(&z, p);
                result += 1 << k;
            }
        }
        Ok(result)
    }

    /// Floor of the square root, plus whether it is exact.
    pub fn sqrt(&self) -> Result<(BigInt, bool)> {
        if self.is_negative() {
            return Err(ExprError::math("Square root of negative number"));
        }
        if self.is_zero() {
            return Ok((BigInt::zero(), true));
        }
        let mut x = BigInt::pow2(self.bit_length().div_ceil(2));
        loop {
            let y = (&x + &quo_nonzero(self, &x)).shr(1);
            if y >= x {
                break;
            }
            x = y;
        }
        let exact = &x.square() == self;
        Ok((x, exact))
    }

    /// Integer `k`-th root, truncated toward zero.
    pub fn root(&self, k: &BigInt) -> Result<BigInt> {
        if !k.is_positive() {
            return Err(ExprError::math("Non-positive root"));
        }
        if self.is_negative() && k.is_even() {
            return Err(ExprError::math("Even root of negative number"));
        }
        if self.is_zero() {
            return Ok(BigInt::zero());
        }
        if k.is_one() {
            return Ok(self.clone());
        }
        let negative = self.is_negative();
        let Some(k) = k.to_u64().filter(|k| *k <= u32::MAX as u64) else {
            return Ok(BigInt::one().with_sign(negative));
        };
        let n = self.abs();
        if (n.high_bit() as u64) < k {
            return Ok(BigInt::one().with_sign(negative));
        }
        let k1 = k - 1;
        let mut x = BigInt::pow2((n.bit_length() as u64).div_ceil(k) as usize);
        loop {
            let (y, _) = (&x.mul_small(k1 as u32) + &quo_nonzero(&n, &x.pow_u64(k1))).div_rem_small(k as u32)?;
            if y >= x {
                break;
            }
            x = y;
        }
        Ok(x.with_sign(negative))
    }
}
