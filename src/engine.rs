//! Expression evaluation.
//!
//! A precedence-climbing evaluator that computes while it parses: there is no
//! intermediate tree. Operands of `&&`, `||` and the untaken branch of `?:` are
//! still parsed, so errors in them are reported, but they run in *no-eval* mode:
//! operators are not applied, functions are not called and substitutions are not
//! performed. No-eval is a depth counter so nested short circuits compose.

use crate::bigint::BigInt;
use crate::context::{EvalContext, SubstitutionHook};
use crate::error::{ExprError, Result};
use crate::lexer::{Lexer, Token};
use crate::parse::classify;
use crate::rational::BigRational;
use crate::types::{Operator, TokenKind};
use crate::value::{Value, ValueKind};
use crate::{String, ToString, Vec};
use alloc::rc::Rc;
use core::cmp::Ordering;

/// Binding limit of a complete expression: every operator continues it.
const LOWEST: i32 = -1;

struct Evaluator<'a> {
    lexer: Lexer<'a>,
    current: Token,
    ctx: &'a EvalContext,
    no_eval: usize,
}

impl<'a> Evaluator<'a> {
    fn new(input: &'a str, ctx: &'a EvalContext) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Evaluator {
            lexer,
            current,
            ctx,
            no_eval: 0,
        })
    }

    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(core::mem::replace(&mut self.current, next))
    }

    fn syntax_error(&self) -> ExprError {
        ExprError::Syntax {
            expr: self.lexer.get_original_input().to_string(),
        }
    }

    fn evaluating(&self) -> bool {
        self.no_eval == 0
    }

    /// Parses `f` with operators and substitutions suppressed.
    fn skip<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.no_eval += 1;
        tracing::trace!(depth = self.no_eval, "entering no-eval");
        let result = f(self);
        self.no_eval -= 1;
        tracing::trace!(depth = self.no_eval, "leaving no-eval");
        result
    }

    /// Parses a complete expression.
    fn parse_top(&mut self) -> Result<Value> {
        let value = self.parse_value(LOWEST)?;
        if self.current.kind != TokenKind::End {
            return Err(self.syntax_error());
        }
        Ok(value)
    }

    /// Parses an operand followed by every binary operator that binds tighter
    /// than `prec`. Stops at the first operator that does not, or at `)`, `,` or
    /// the end of input, leaving that token current.
    fn parse_value(&mut self, prec: i32) -> Result<Value> {
        let mut value = self.parse_operand()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Operator(op) if !op.is_unary() => op,
                TokenKind::End | TokenKind::CloseParen | TokenKind::Comma => return Ok(value),
                _ => return Err(self.syntax_error()),
            };
            if op.precedence() <= prec {
                return Ok(value);
            }
            self.advance()?;
            value = match op {
                Operator::And | Operator::Or => self.logical(op, value)?,
                Operator::Question => self.conditional(value)?,
                _ => {
                    let rhs = self.parse_value(op.precedence())?;
                    if self.evaluating() {
                        binary(op, value, rhs, self.ctx)?
                    } else {
                        value
                    }
                }
            };
        }
    }

    /// Condition operand of `&&`, `||` or `?`. A string is only tolerated when
    /// nothing is being evaluated.
    fn condition(&self, op: Operator, value: &Value) -> Result<bool> {
        match value.truthy() {
            Some(b) => Ok(b),
            None if !self.evaluating() => Ok(false),
            None => Err(illegal(op, ValueKind::STRING)),
        }
    }

    fn logical(&mut self, op: Operator, lhs: Value) -> Result<Value> {
        let left = self.condition(op, &lhs)?;
        let prec = op.precedence();
        let decided = match op {
            Operator::And => !left,
            _ => left,
        };
        if decided {
            self.skip(|e| e.parse_value(prec))?;
            return Ok(Value::from_bool(left));
        }
        let rhs = self.parse_value(prec)?;
        if !self.evaluating() {
            return Ok(Value::from_bool(left));
        }
        match rhs.truthy() {
            Some(right) => Ok(Value::from_bool(right)),
            None => Err(illegal(op, ValueKind::STRING)),
        }
    }

    /// After `?`. Both branches bind at the precedence just below `?`, which makes
    /// the operator associate to the right.
    fn conditional(&mut self, cond: Value) -> Result<Value> {
        let taken = self.condition(Operator::Question, &cond)?;
        let prec = Operator::Question.precedence() - 1;
        if taken {
            let value = self.parse_value(prec)?;
            self.expect_colon()?;
            self.skip(|e| e.parse_value(prec))?;
            Ok(value)
        } else {
            self.skip(|e| e.parse_value(prec))?;
            self.expect_colon()?;
            self.parse_value(prec)
        }
    }

    fn expect_colon(&mut self) -> Result<()> {
        if self.current.kind != TokenKind::Operator(Operator::Colon) {
            return Err(self.syntax_error());
        }
        self.advance()?;
        Ok(())
    }

    /// A literal, substitution, function call, parenthesized expression or
    /// prefix operator application.
    fn parse_operand(&mut self) -> Result<Value> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Value(value) => Ok(value),
            TokenKind::OpenParen => {
                let value = self.parse_value(LOWEST)?;
                if self.current.kind != TokenKind::CloseParen {
                    return Err(ExprError::UnmatchedParenthesis {
                        expr: self.lexer.get_original_input().to_string(),
                    });
                }
                self.advance()?;
                Ok(value)
            }
            TokenKind::Operator(op) => {
                let Some(prefix) = op.as_prefix() else {
                    return Err(self.syntax_error());
                };
                let operand = self.parse_value(prefix.precedence())?;
                if self.evaluating() {
                    unary(prefix, operand)
                } else {
                    Ok(operand)
                }
            }
            TokenKind::Function(name) => self.call_function(name),
            TokenKind::Variable { name, index } => {
                if !self.evaluating() {
                    return Ok(Value::default());
                }
                let hook = self.hook()?;
                let text = hook
                    .variable(&name, index.as_deref())
                    .map_err(ExprError::Substitution)?;
                classify(&text)
            }
            TokenKind::Command(script) => {
                if !self.evaluating() {
                    return Ok(Value::default());
                }
                let hook = self.hook()?;
                let text = hook.command(&script, self.ctx).map_err(ExprError::Substitution)?;
                classify(&text)
            }
            TokenKind::CloseParen
            | TokenKind::Comma
            | TokenKind::End
            | TokenKind::Unknown(_) => Err(self.syntax_error()),
        }
    }

    fn hook(&self) -> Result<Rc<dyn SubstitutionHook>> {
        self.ctx
            .substitution_hook()
            .cloned()
            .ok_or_else(|| ExprError::Substitution("no substitution hook configured".to_string()))
    }

    /// The arguments of `name(`, parsed and converted, then the call itself.
    fn call_function(&mut self, name: String) -> Result<Value> {
        let Some(function) = self.ctx.get_math_function(&name).cloned() else {
            return Err(ExprError::UnknownFunction { name });
        };
        let arity = function.arity();
        let mut args = Vec::with_capacity(arity);
        if arity == 0 {
            if self.current.kind != TokenKind::CloseParen {
                return Err(self.syntax_error());
            }
        } else {
            for (i, kind) in function.args.iter().enumerate() {
                let value = self.parse_value(LOWEST)?;
                args.push(kind.coerce(value)?);
                let last = i + 1 == arity;
                match (&self.current.kind, last) {
                    (TokenKind::CloseParen, true) | (TokenKind::Comma, false) => {}
                    (TokenKind::Comma, true) => return Err(ExprError::TooManyArguments),
                    (TokenKind::CloseParen, false) => return Err(ExprError::TooFewArguments),
                    _ => return Err(self.syntax_error()),
                }
                if !last {
                    self.advance()?;
                }
            }
        }
        self.advance()?;
        if !self.evaluating() {
            return Ok(Value::default());
        }
        tracing::trace!(function = %name, args = args.len(), "calling math function");
        (function.implementation)(&args, self.ctx)
    }
}

fn illegal(op: Operator, kind: ValueKind) -> ExprError {
    ExprError::IllegalOperand {
        op: op.symbol().to_string(),
        kind: kind.describe(),
    }
}

fn unary(op: Operator, value: Value) -> Result<Value> {
    match (op, value) {
        (Operator::UnaryMinus, Value::Int(z)) => Ok(Value::Int(-z)),
        (Operator::UnaryMinus, Value::Rational(q)) => Ok(Value::Rational(-q)),
        (Operator::UnaryPlus, v) if v.is_numeric() => Ok(v),
        (Operator::Not, v) if v.is_numeric() => Ok(Value::from_bool(v.truthy() == Some(false))),
        (Operator::BitNot, Value::Int(z)) => Ok(Value::Int((-z).add_small(-1))),
        (op, v) => Err(illegal(op, v.kind())),
    }
}

/// Brings two numeric operands to a common kind: a lone int is promoted.
enum Numeric {
    Ints(BigInt, BigInt),
    Rationals(BigRational, BigRational),
}

fn numeric(op: Operator, lhs: Value, rhs: Value) -> Result<Numeric> {
    match (lhs, rhs) {
        (Value::Str(_), _) | (_, Value::Str(_)) => Err(illegal(op, ValueKind::STRING)),
        (Value::Int(a), Value::Int(b)) => Ok(Numeric::Ints(a, b)),
        (a, b) => match (a.to_rational(), b.to_rational()) {
            (Some(a), Some(b)) => Ok(Numeric::Rationals(a, b)),
            _ => Err(illegal(op, ValueKind::STRING)),
        },
    }
}

fn integers(op: Operator, lhs: Value, rhs: Value) -> Result<(BigInt, BigInt)> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok((a, b)),
        (Value::Int(_), other) | (other, _) => Err(illegal(op, other.kind())),
    }
}

fn shift_count(op: Operator, count: &BigInt) -> Result<i64> {
    let n = count
        .to_i64()
        .ok_or_else(|| ExprError::math("Shift count too large"))?;
    match op {
        Operator::LeftShift => Ok(n),
        _ => n.checked_neg().ok_or_else(|| ExprError::math("Shift count too large")),
    }
}

fn compare(lhs: Value, rhs: Value, ctx: &EvalContext) -> Result<Ordering> {
    if lhs.as_str().is_some() || rhs.as_str().is_some() {
        let precision = ctx.precision() as usize;
        let (a, b) = ctx.with_ten_powers(|cache| -> Result<(String, String)> {
            Ok((lhs.render(precision, cache)?, rhs.render(precision, cache)?))
        })?;
        return Ok(a.as_bytes().cmp(b.as_bytes()));
    }
    Ok(match numeric(Operator::Equal, lhs, rhs)? {
        Numeric::Ints(a, b) => a.cmp(&b),
        Numeric::Rationals(a, b) => a.cmp(&b),
    })
}

fn binary(op: Operator, lhs: Value, rhs: Value, ctx: &EvalContext) -> Result<Value> {
    use Operator::*;
    match op {
        Mult | Divide | Plus | Minus => match numeric(op, lhs, rhs)? {
            Numeric::Ints(a, b) => Ok(Value::Int(match op {
                Mult => &a * &b,
                Plus => &a + &b,
                Minus => &a - &b,
                _ => {
                    if b.is_zero() {
                        return Err(ExprError::DivideByZero);
                    }
                    a.div_mod_floor(&b)?.0
                }
            })),
            Numeric::Rationals(a, b) => Ok(Value::Rational(match op {
                Mult => &a * &b,
                Plus => &a + &b,
                Minus => &a - &b,
                _ => a.checked_div(&b)?,
            })),
        },
        Mod | LeftShift | RightShift | BitAnd | BitXor | BitOr => {
            let (a, b) = integers(op, lhs, rhs)?;
            Ok(Value::Int(match op {
                Mod => {
                    if b.is_zero() {
                        return Err(ExprError::DivideByZero);
                    }
                    a.div_mod_floor(&b)?.1
                }
                LeftShift | RightShift => a.shift(shift_count(op, &b)?),
                BitAnd => a.and(&b),
                BitXor => a.xor(&b),
                _ => a.or(&b),
            }))
        }
        Less | Greater | Leq | Geq | Equal | Neq => {
            let ord = compare(lhs, rhs, ctx)?;
            Ok(Value::from_bool(match op {
                Less => ord == Ordering::Less,
                Greater => ord == Ordering::Greater,
                Leq => ord != Ordering::Greater,
                Geq => ord != Ordering::Less,
                Equal => ord == Ordering::Equal,
                _ => ord != Ordering::Equal,
            }))
        }
        Colon => Err(ExprError::ColonWithoutQuestion),
        _ => Err(ExprError::UnknownOperator),
    }
}

/// Evaluates `expr` and returns its value as computed.
///
/// # Examples
///
/// ```
/// use mpexpr_rs::context::EvalContext;
/// use mpexpr_rs::engine::eval;
/// use mpexpr_rs::value::Value;
///
/// let ctx = EvalContext::new();
/// assert_eq!(eval("2 + 3 * 4", &ctx).unwrap(), Value::from(14));
/// assert_eq!(eval("-10 / 3", &ctx).unwrap(), Value::from(-4));
/// ```
#[tracing::instrument(level = "debug", skip(ctx), err)]
pub fn eval(expr: &str, ctx: &EvalContext) -> Result<Value> {
    let value = Evaluator::new(expr, ctx)?.parse_top()?;
    tracing::debug!(kind = ?value.kind(), "evaluated");
    Ok(value)
}

/// Evaluates `expr` and renders the result as text.
///
/// Integers print in decimal. Rationals are rounded to the context precision and
/// printed with as many places as they need, without a zero before the point.
pub fn eval_string(expr: &str, ctx: &EvalContext) -> Result<String> {
    let value = eval(expr, ctx)?;
    let precision = ctx.precision() as usize;
    ctx.with_ten_powers(|cache| value.render(precision, cache))
}

/// Evaluates `expr` to an integer. A rational result is truncated toward zero.
pub fn eval_int(expr: &str, ctx: &EvalContext) -> Result<BigInt> {
    let value = eval(expr, ctx)?;
    value.to_int().ok_or(ExprError::NonNumericResult)
}

/// Evaluates `expr` to a rational. An integer result is promoted.
pub fn eval_rational(expr: &str, ctx: &EvalContext) -> Result<BigRational> {
    let value = eval(expr, ctx)?;
    value.to_rational().ok_or(ExprError::NonNumericResult)
}

/// Evaluates `expr` as a condition: nonzero is true.
pub fn eval_bool(expr: &str, ctx: &EvalContext) -> Result<bool> {
    let value = eval(expr, ctx)?;
    value.truthy().ok_or(ExprError::NonNumericResult)
}
