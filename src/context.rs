//! Evaluation context.
//!
//! An [`EvalContext`] carries everything an evaluation reads besides the expression
//! text: the precision and the epsilon derived from it, the math function table, the
//! powers-of-ten cache used for printing, and the optional [`SubstitutionHook`] that
//! resolves `$variable` and `[command]` references. One context per session; nothing
//! here is global.

use crate::bigint::number_theory::{GCD_REDUCE_THRESHOLD, MAX_FACTORIAL};
use crate::bigint::tenpow::TenPowers;
use crate::error::{ExprError, Result};
use crate::rational::BigRational;
use crate::types::{ArgKind, MathFunction, MathFunctionMap, MathImpl, TryIntoFunctionName};
use crate::value::Value;
use crate::{String, ToString};
use alloc::rc::Rc;
use core::cell::RefCell;
use serde::{Deserialize, Serialize};

/// Default number of decimal places.
pub const DEFAULT_PRECISION: u32 = 17;

/// Largest accepted precision.
pub const MAX_PRECISION: u32 = 10_000;

/// Tunable parameters of a context.
///
/// ```
/// use mpexpr_rs::context::Settings;
///
/// let settings = Settings { precision: 30, ..Settings::default() };
/// assert_eq!(settings.max_factorial, 1 << 24);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Decimal places for rendering and for the epsilon of transcendental functions.
    pub precision: u32,
    /// Word-length difference above which gcd first reduces by long division.
    pub gcd_reduce_threshold: usize,
    /// Ceiling for the arguments of `fact`, `pfact`, `perm`, `comb` and `fib`.
    pub max_factorial: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            precision: DEFAULT_PRECISION,
            gcd_reduce_threshold: GCD_REDUCE_THRESHOLD,
            max_factorial: MAX_FACTORIAL,
        }
    }
}

/// Resolves the substitutions an expression may contain.
///
/// A returned string is classified like a literal: it becomes an int, a rational or a
/// string. An `Err` carries the message reported to the caller. The hook is never
/// called for operands that are only parsed, such as the right side of `0 && $x`.
pub trait SubstitutionHook {
    /// Value of `$name`, or of `$name(index)`.
    fn variable(&self, name: &str, index: Option<&str>) -> core::result::Result<String, String>;

    /// Result of the script inside `[...]`. The context is passed so the script may
    /// evaluate further expressions.
    fn command(&self, script: &str, ctx: &EvalContext) -> core::result::Result<String, String>;
}

/// Evaluation context for expressions.
///
/// ```
/// use mpexpr_rs::context::EvalContext;
/// use mpexpr_rs::engine::eval_string;
///
/// let mut ctx = EvalContext::new();
/// ctx.set_precision(5).unwrap();
/// assert_eq!(eval_string("1/3.0", &ctx).unwrap(), ".33333");
/// ```
pub struct EvalContext {
    settings: Settings,
    epsilon: BigRational,
    functions: MathFunctionMap,
    ten_powers: RefCell<TenPowers>,
    hook: Option<Rc<dyn SubstitutionHook>>,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EvalContext {
    fn clone(&self) -> Self {
        EvalContext {
            settings: self.settings.clone(),
            epsilon: self.epsilon.clone(),
            functions: self.functions.clone(),
            ten_powers: RefCell::new(self.ten_powers.borrow().clone()),
            hook: self.hook.clone(),
        }
    }
}

impl core::fmt::Debug for EvalContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EvalContext")
            .field("settings", &self.settings)
            .field("functions", &self.functions.len())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

/// `10^-precision`.
fn epsilon_for(precision: u32) -> BigRational {
    BigRational::ten_pow_inverse(precision as u64)
}

impl EvalContext {
    /// A context with default settings and the built-in math functions.
    pub fn new() -> Self {
        let mut ctx = EvalContext {
            settings: Settings::default(),
            epsilon: epsilon_for(DEFAULT_PRECISION),
            functions: MathFunctionMap::new(),
            ten_powers: RefCell::new(TenPowers::new()),
            hook: None,
        };
        ctx.register_builtin_functions();
        ctx
    }

    /// A context configured from `settings`, rejecting an out of range precision.
    pub fn with_settings(settings: Settings) -> Result<Self> {
        let mut ctx = EvalContext::new();
        ctx.set_precision(settings.precision)?;
        ctx.settings.gcd_reduce_threshold = settings.gcd_reduce_threshold;
        ctx.settings.max_factorial = settings.max_factorial;
        Ok(ctx)
    }

    fn register_builtin_functions(&mut self) {
        for (name, args, implementation) in crate::functions::builtin_functions() {
            if let Err(err) = self.insert_function(name, args, implementation) {
                tracing::warn!(function = name, %err, "built-in math function not registered");
            }
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn precision(&self) -> u32 {
        self.settings.precision
    }

    /// `10^-precision`, the tolerance of transcendental functions.
    pub fn epsilon(&self) -> &BigRational {
        &self.epsilon
    }

    pub fn gcd_reduce_threshold(&self) -> usize {
        self.settings.gcd_reduce_threshold
    }

    pub fn max_factorial(&self) -> u64 {
        self.settings.max_factorial
    }

    /// Sets the precision and regenerates epsilon. Out of range values are rejected
    /// and the previous precision is kept.
    pub fn set_precision(&mut self, precision: u32) -> Result<()> {
        if precision > MAX_PRECISION {
            tracing::warn!(precision, "rejected precision");
            return Err(ExprError::InvalidPrecision(precision.to_string()));
        }
        self.settings.precision = precision;
        self.epsilon = epsilon_for(precision);
        Ok(())
    }

    /// Sets the precision from text: optional blanks and `+`, then decimal digits and
    /// nothing else.
    pub fn set_precision_str(&mut self, text: &str) -> Result<()> {
        let reject = || {
            tracing::warn!(text, "rejected precision");
            ExprError::InvalidPrecision(text.to_string())
        };
        let body = text.trim_start();
        let body = body.strip_prefix('+').unwrap_or(body);
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
            return Err(reject());
        }
        let precision = body.parse::<u32>().map_err(|_| reject())?;
        if precision > MAX_PRECISION {
            return Err(reject());
        }
        self.set_precision(precision)
    }

    /// Registers or replaces a math function.
    ///
    /// `args` gives the arity and the kind each argument is converted to. Arguments
    /// are never strings: a string argument fails before `implementation` runs.
    pub fn register_math_function<F>(&mut self, name: &str, args: &[ArgKind], implementation: F) -> Result<()>
    where
        F: Fn(&[Value], &EvalContext) -> Result<Value> + 'static,
    {
        self.insert_function(name, args, Rc::new(implementation))
    }

    fn insert_function(&mut self, name: &str, args: &[ArgKind], implementation: MathImpl) -> Result<()> {
        let key = name.try_into_function_name()?;
        let mut kinds = heapless::Vec::new();
        kinds
            .extend_from_slice(args)
            .map_err(|_| ExprError::CapacityExceeded("math function arguments"))?;
        let function = MathFunction {
            name: key.clone(),
            args: kinds,
            implementation,
        };
        match self.functions.insert(key, function) {
            Ok(_) => Ok(()),
            Err(_) => Err(ExprError::CapacityExceeded("math_functions")),
        }
    }

    /// Removes a math function. Returns whether it existed.
    pub fn unregister_math_function(&mut self, name: &str) -> Result<bool> {
        let key = name.try_into_function_name()?;
        Ok(self.functions.remove(&key).is_some())
    }

    pub fn get_math_function(&self, name: &str) -> Option<&MathFunction> {
        let key = name.try_into_function_name().ok()?;
        self.functions.get(&key)
    }

    /// Names of all registered math functions.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(|k| k.as_str())
    }

    pub fn set_substitution_hook(&mut self, hook: Rc<dyn SubstitutionHook>) {
        self.hook = Some(hook);
    }

    pub fn clear_substitution_hook(&mut self) {
        self.hook = None;
    }

    pub fn substitution_hook(&self) -> Option<&Rc<dyn SubstitutionHook>> {
        self.hook.as_ref()
    }

    /// Runs `f` with the powers-of-ten cache.
    ///
    /// The borrow lasts only for the call, so a substitution hook that evaluates
    /// another expression on the same context never finds it taken.
    pub fn with_ten_powers<R>(&self, f: impl FnOnce(&mut TenPowers) -> R) -> R {
        match self.ten_powers.try_borrow_mut() {
            Ok(mut cache) => f(&mut cache),
            Err(_) => f(&mut TenPowers::new()),
        }
    }
}
