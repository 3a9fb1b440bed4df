#![cfg_attr(all(not(test), target_arch = "arm"), no_std)]
#![doc = r#"
# mpexpr-rs

Arbitrary precision integer and rational arithmetic, with an infix expression evaluator
on top.

## Overview

Numbers never overflow and never silently lose precision. Integers are exact
[`BigInt`](bigint::BigInt)s of any size. Fractional values are exact
[`BigRational`](rational::BigRational)s, always kept reduced; they are only rounded
when transcendental functions approximate a result or when a value is turned into
text, and both are controlled by the precision of an [`EvalContext`](context::EvalContext).

Key features:
- Sign-magnitude integers with Karatsuba multiplication and Knuth long division
- Number theory: gcd, lcm, modular inverse and power, factorials, Fibonacci numbers, primality
- Rational `exp`, `ln`, trigonometric and hyperbolic functions accurate to a chosen epsilon
- Decimal, hex, octal and binary printing, and a printf-style formatter
- A C-like expression language with short-circuit `&&`, `||` and `?:`
- `$variable` and `[command]` substitution through a caller supplied hook
- `no_std` + `alloc` on bare-metal ARM, and a C ABI with a generated header

## Quick Start

```rust
use mpexpr_rs::context::EvalContext;
use mpexpr_rs::engine::{eval, eval_string};
use mpexpr_rs::value::Value;

let mut ctx = EvalContext::new();

// Integer arithmetic is exact; integer division rounds toward negative infinity.
assert_eq!(eval("2 + 3 * 4", &ctx).unwrap(), Value::from(14));
assert_eq!(eval("-10 / 3", &ctx).unwrap(), Value::from(-4));
assert_eq!(eval_string("fact(30)", &ctx).unwrap(), "265252859812191058636308480000000");

// A decimal point makes a value rational. Precision applies when it is printed.
ctx.set_precision(5).unwrap();
assert_eq!(eval_string("1 / 3.0", &ctx).unwrap(), ".33333");
```

## Substitutions

```rust
use mpexpr_rs::context::{EvalContext, SubstitutionHook};
use mpexpr_rs::engine::eval_string;
use std::rc::Rc;

struct Vars;

impl SubstitutionHook for Vars {
    fn variable(&self, name: &str, _index: Option<&str>) -> Result<String, String> {
        match name {
            "radius" => Ok("2.5".to_string()),
            _ => Err(format!("no such variable \"{}\"", name)),
        }
    }

    fn command(&self, script: &str, ctx: &EvalContext) -> Result<String, String> {
        eval_string(script, ctx).map_err(|e| e.to_string())
    }
}

let mut ctx = EvalContext::new();
ctx.set_substitution_hook(Rc::new(Vars));
assert_eq!(eval_string("$radius * 4", &ctx).unwrap(), "10.0");
assert_eq!(eval_string("[1 + 1] * 3", &ctx).unwrap(), "6");
// The unreached side of a short circuit never calls the hook.
assert_eq!(eval_string("1 || $missing", &ctx).unwrap(), "1");
```

## Custom Functions

```rust
use mpexpr_rs::context::EvalContext;
use mpexpr_rs::engine::eval;
use mpexpr_rs::types::ArgKind;
use mpexpr_rs::value::Value;

let mut ctx = EvalContext::new();
ctx.register_math_function("sq", &[ArgKind::Either], |args, _ctx| {
    Ok(match &args[0] {
        Value::Int(z) => Value::Int(z.square()),
        Value::Rational(q) => Value::Rational(q.square()),
        other => other.clone(),
    })
})
.unwrap();
assert_eq!(eval("sq(12)", &ctx).unwrap(), Value::from(144));
```

## Expression Syntax

| Precedence | Operators |
|---|---|
| highest | unary `-` `+` `!` `~` |
| | `*` `/` `%` |
| | `+` `-` |
| | `<<` `>>` |
| | `<` `>` `<=` `>=` |
| | `==` `!=` |
| | `&` |
| | `^` |
| | `\|` |
| | `&&` |
| | `\|\|` |
| lowest | `?:` (right associative) |

`%`, shifts and the bitwise operators take integers only. Comparisons between a string
and a number compare text.

## Built-in Functions

- Transcendental: `acos asin atan atan2 cos cosh exp log log10 pow root sin sinh sqrt tan tanh hypot pi`
- Rounding and conversion: `abs ceil floor double int round fmod`
- Number theory: `gcd lcm minv frem fact fib pfact perm comb iroot gcdrem lfactor prime relprime pmod`
- Selection: `max min`

## Feature Flags

- `libm` (default): use floating point estimates to size series evaluations.

## Embedded Systems Support

- `no_std` compatible with the `alloc` crate on ARM targets
- Structured logging through `tracing`; no subscriber is installed by the library
- C FFI with a header generated by `cbindgen`
"#]

extern crate alloc;

pub use alloc::boxed::Box;
pub use alloc::string::{String, ToString};
pub use alloc::vec::Vec;
pub use alloc::{format, vec};

pub mod bigint;
pub mod context;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod format;
pub mod functions;
pub mod lexer;
pub mod parse;
pub mod rational;
pub mod transcendental;
pub mod types;
pub mod value;

pub use bigint::BigInt;
pub use context::{EvalContext, Settings, SubstitutionHook};
pub use engine::{eval, eval_bool, eval_int, eval_rational, eval_string};
pub use error::{ExprError, Result};
pub use rational::BigRational;
pub use value::{Value, ValueKind};
