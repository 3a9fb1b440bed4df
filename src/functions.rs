//! Built-in math functions.
//!
//! Every function here has the [`MathImpl`](crate::types::MathImpl) shape: it receives
//! its arguments already converted to the kinds declared in [`builtin_functions`] and
//! the context supplying epsilon, precision and size limits. Transcendental functions
//! are accurate to within the context epsilon; integer functions are exact.

use crate::bigint::BigInt;
use crate::context::EvalContext;
use crate::error::{ExprError, Result};
use crate::rational::BigRational;
use crate::transcendental as trans;
use crate::types::{ArgKind, MathImpl};
use crate::value::Value;
use crate::Vec;
use alloc::rc::Rc;

use ArgKind::{Double as D, Either as E, Int as I};

fn rational_arg(args: &[Value], i: usize) -> Result<BigRational> {
    args.get(i).and_then(Value::to_rational).ok_or(ExprError::NonNumericArgument)
}

fn int_arg(args: &[Value], i: usize) -> Result<BigInt> {
    args.get(i).and_then(Value::to_int).ok_or(ExprError::NonNumericArgument)
}

/// Repetition counts: negative counts as zero, huge counts saturate.
fn count_arg(args: &[Value], i: usize) -> Result<u64> {
    let z = int_arg(args, i)?;
    Ok(if z.is_negative() {
        0
    } else {
        z.to_u64().unwrap_or(u64::MAX)
    })
}

/// An integral rational becomes an int.
fn int_if_integral(q: BigRational) -> Value {
    if q.is_int() {
        Value::Int(q.to_int())
    } else {
        Value::Rational(q)
    }
}

macro_rules! unary_transcendental {
    ($($(#[$doc:meta])* $name:ident => $kernel:path;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(args: &[Value], ctx: &EvalContext) -> Result<Value> {
                Ok(Value::Rational($kernel(&rational_arg(args, 0)?, ctx.epsilon())?))
            }
        )*
    };
}

unary_transcendental! {
    /// Arc cosine in radians, for arguments in `[-1, 1]`.
    acos => trans::acos;
    /// Arc sine in radians, for arguments in `[-1, 1]`.
    asin => trans::asin;
    /// Arc tangent in radians.
    atan => trans::atan;
    cos => trans::cos;
    cosh => trans::cosh;
    /// `e^x`.
    exp => trans::exp;
    /// Natural logarithm of a positive argument.
    log => trans::ln;
    sin => trans::sin;
    sinh => trans::sinh;
    /// Tangent. Fails at odd multiples of pi/2.
    tan => trans::tan;
    tanh => trans::tanh;
}

/// Base-10 logarithm, rounded to the context precision.
pub fn log10(args: &[Value], ctx: &EvalContext) -> Result<Value> {
    let q = trans::log10(&rational_arg(args, 0)?, ctx.epsilon())?;
    Ok(Value::Rational(q.round(ctx.precision() as i64)?))
}

/// Square root within epsilon. Exact squares come out exact.
pub fn sqrt(args: &[Value], ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Rational(rational_arg(args, 0)?.sqrt(ctx.epsilon())?))
}

pub fn ceil(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Rational(rational_arg(args, 0)?.ceil()))
}

pub fn floor(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Rational(rational_arg(args, 0)?.floor()))
}

/// `atan2(y, x)`: the angle of the point `(x, y)` in `(-pi, pi]`.
pub fn atan2(args: &[Value], ctx: &EvalContext) -> Result<Value> {
    let y = rational_arg(args, 0)?;
    let x = rational_arg(args, 1)?;
    Ok(Value::Rational(trans::atan2(&y, &x, ctx.epsilon())?))
}

/// `x mod m` for a positive modulus, in `[0, m)`.
pub fn fmod(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Rational(rational_arg(args, 0)?.fmod(&rational_arg(args, 1)?)?))
}

/// `sqrt(x^2 + y^2)` within epsilon.
pub fn hypot(args: &[Value], ctx: &EvalContext) -> Result<Value> {
    let x = rational_arg(args, 0)?;
    Ok(Value::Rational(x.hypot(&rational_arg(args, 1)?, ctx.epsilon())?))
}

/// `x^y`. Integral exponents are exact; others go through `exp(y * ln x)`.
pub fn pow(args: &[Value], ctx: &EvalContext) -> Result<Value> {
    let x = rational_arg(args, 0)?;
    let y = rational_arg(args, 1)?;
    Ok(Value::Rational(trans::pow(&x, &y, ctx.epsilon())?))
}

/// `root(x, n)`: the real n-th root of `x`.
pub fn root(args: &[Value], ctx: &EvalContext) -> Result<Value> {
    let x = rational_arg(args, 0)?;
    let n = rational_arg(args, 1)?;
    Ok(Value::Rational(trans::root(&x, &n, ctx.epsilon())?))
}

/// `frem(x, y)`: `x` with every factor `y` divided out.
pub fn frem(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Rational(rational_arg(args, 0)?.facrem(&rational_arg(args, 1)?)?))
}

/// Inverse of `a` modulo `m`, zero when there is none.
pub fn minv(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    Ok(int_if_integral(rational_arg(args, 0)?.minv(&rational_arg(args, 1)?)?))
}

/// Greatest common divisor.
///
/// For two integers this is the ordinary gcd, computed with the context's reduction
/// threshold. For fractions it is `gcd(numerators) / lcm(denominators)`.
pub fn gcd(args: &[Value], ctx: &EvalContext) -> Result<Value> {
    let a = rational_arg(args, 0)?;
    let b = rational_arg(args, 1)?;
    if a.is_int() && b.is_int() {
        return Ok(Value::Int(a.numer().gcd_with_threshold(b.numer(), ctx.gcd_reduce_threshold())));
    }
    Ok(int_if_integral(a.gcd(&b)))
}

/// Least common multiple, with the same treatment of fractions as [`gcd`].
pub fn lcm(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    Ok(int_if_integral(rational_arg(args, 0)?.lcm(&rational_arg(args, 1)?)))
}

/// The larger argument, returned as given.
pub fn max(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    let a = rational_arg(args, 0)?;
    let b = rational_arg(args, 1)?;
    Ok(if a >= b { args[0].clone() } else { args[1].clone() })
}

/// The smaller argument, returned as given.
pub fn min(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    let a = rational_arg(args, 0)?;
    let b = rational_arg(args, 1)?;
    Ok(if a <= b { args[0].clone() } else { args[1].clone() })
}

pub fn abs(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    match args.first() {
        Some(Value::Int(z)) => Ok(Value::Int(z.abs())),
        Some(Value::Rational(q)) => Ok(Value::Rational(q.abs())),
        _ => Err(ExprError::NonNumericArgument),
    }
}

pub fn double(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Rational(rational_arg(args, 0)?))
}

/// Truncation toward zero.
pub fn int(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Int(int_arg(args, 0)?))
}

/// Nearest integer, ties to even.
pub fn round(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    match args.first() {
        Some(Value::Int(z)) => Ok(Value::Int(z.clone())),
        Some(Value::Rational(q)) => Ok(Value::Int(q.round(0)?.to_int())),
        _ => Err(ExprError::NonNumericArgument),
    }
}

pub fn pi(_args: &[Value], ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Rational(trans::pi(ctx.epsilon())?))
}

/// Fibonacci number; negative indices follow `F(-n) = (-1)^(n+1) F(n)`.
pub fn fib(args: &[Value], ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Int(int_arg(args, 0)?.fib(ctx.max_factorial())?))
}

/// `n!`.
///
/// # Errors
///
/// `Negative argument for factorial`, or `Very large factorial` above the context's
/// `max_factorial`.
pub fn fact(args: &[Value], ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Int(int_arg(args, 0)?.fact(ctx.max_factorial())?))
}

/// Product of the primes up to `n`.
pub fn pfact(args: &[Value], ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Int(int_arg(args, 0)?.pfact(ctx.max_factorial())?))
}

/// `lfactor(n, count)`: the smallest prime factor of `n` among the first `count`
/// primes, or 1 when none divides it.
pub fn lfactor(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    let n = int_arg(args, 0)?;
    Ok(Value::Int(BigInt::from_u64(n.lowfactor(count_arg(args, 1)?))))
}

/// `iroot(n, k)`: floor of the k-th root.
pub fn iroot(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Int(int_arg(args, 0)?.root(&int_arg(args, 1)?)?))
}

/// `gcdrem(a, b)`: `a` with every factor it shares with `b` removed.
pub fn gcdrem(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Int(int_arg(args, 0)?.gcdrem(&int_arg(args, 1)?)?))
}

/// `perm(n, k) = n! / (n-k)!`.
pub fn perm(args: &[Value], ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Int(int_arg(args, 0)?.perm(&int_arg(args, 1)?, ctx.max_factorial())?))
}

/// `comb(n, k) = n! / (k! (n-k)!)`.
pub fn comb(args: &[Value], ctx: &EvalContext) -> Result<Value> {
    Ok(Value::Int(int_arg(args, 0)?.comb(&int_arg(args, 1)?, ctx.max_factorial())?))
}

/// `prime(n, count)`: 1 when `n` survives `count` rounds of the witness test.
pub fn prime(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    let n = int_arg(args, 0)?;
    Ok(Value::from_bool(n.primetest(count_arg(args, 1)?)))
}

pub fn relprime(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    Ok(Value::from_bool(int_arg(args, 0)?.relprime(&int_arg(args, 1)?)))
}

/// `pmod(a, b, m) = a^b mod m`.
pub fn pmod(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    let base = int_arg(args, 0)?;
    Ok(Value::Int(base.powermod(&int_arg(args, 1)?, &int_arg(args, 2)?)?))
}

type Builtin = fn(&[Value], &EvalContext) -> Result<Value>;

const BUILTINS: &[(&str, &[ArgKind], Builtin)] = &[
    ("acos", &[D], acos),
    ("asin", &[D], asin),
    ("atan", &[D], atan),
    ("atan2", &[D, D], atan2),
    ("ceil", &[D], ceil),
    ("cos", &[D], cos),
    ("cosh", &[D], cosh),
    ("exp", &[D], exp),
    ("floor", &[D], floor),
    ("fmod", &[D, D], fmod),
    ("hypot", &[D, D], hypot),
    ("log", &[D], log),
    ("log10", &[D], log10),
    ("pow", &[D, D], pow),
    ("sin", &[D], sin),
    ("sinh", &[D], sinh),
    ("sqrt", &[D], sqrt),
    ("tan", &[D], tan),
    ("tanh", &[D], tanh),
    ("abs", &[E], abs),
    ("double", &[E], double),
    ("int", &[E], int),
    ("round", &[E], round),
    ("root", &[D, D], root),
    ("frem", &[D, D], frem),
    ("minv", &[D, D], minv),
    ("gcd", &[D, D], gcd),
    ("lcm", &[D, D], lcm),
    ("max", &[E, E], max),
    ("min", &[E, E], min),
    ("pi", &[], pi),
    ("fib", &[I], fib),
    ("fact", &[I], fact),
    ("pfact", &[I], pfact),
    ("lfactor", &[I, I], lfactor),
    ("iroot", &[I, I], iroot),
    ("gcdrem", &[I, I], gcdrem),
    ("perm", &[I, I], perm),
    ("comb", &[I, I], comb),
    ("prime", &[I, I], prime),
    ("relprime", &[I, I], relprime),
    ("pmod", &[I, I, I], pmod),
];

/// The built-in table: name, argument kinds and implementation.
pub fn builtin_functions() -> Vec<(&'static str, &'static [ArgKind], MathImpl)> {
    BUILTINS
        .iter()
        .map(|&(name, args, f)| (name, args, Rc::new(f) as MathImpl))
        .collect()
}
