//! Type definitions shared by the lexer, the evaluator and the function table.

use crate::context::EvalContext;
use crate::error::{ExprError, Result};
use crate::value::Value;
use crate::String;
use alloc::rc::Rc;
use core::fmt;

/// Longest accepted math function name, in bytes.
pub const MAX_FUNCTION_NAME_LEN: usize = 16;

/// Capacity of the math function table. Must be a power of two.
pub const MAX_MATH_FUNCTIONS: usize = 64;

/// Most arguments a math function may declare.
pub const MAX_MATH_ARGS: usize = 5;

/// cbindgen:ignore
pub type FunctionName = heapless::String<MAX_FUNCTION_NAME_LEN>;

/// Signature of a math function implementation. Arguments arrive already coerced to the
/// declared [`ArgKind`]s.
pub type MathImpl = Rc<dyn Fn(&[Value], &EvalContext) -> Result<Value>>;

/// cbindgen:ignore
pub type MathFunctionMap = heapless::FnvIndexMap<FunctionName, MathFunction, MAX_MATH_FUNCTIONS>;

/// Binary and unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Mult,
    Divide,
    Mod,
    Plus,
    Minus,
    LeftShift,
    RightShift,
    Less,
    Greater,
    Leq,
    Geq,
    Equal,
    Neq,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
    Question,
    Colon,
    UnaryMinus,
    UnaryPlus,
    Not,
    BitNot,
}

impl Operator {
    /// Binding power. An operator only continues an expression whose current
    /// limit is strictly lower.
    pub fn precedence(self) -> i32 {
        use Operator::*;
        match self {
            Mult | Divide | Mod => 12,
            Plus | Minus => 11,
            LeftShift | RightShift => 10,
            Less | Greater | Leq | Geq => 9,
            Equal | Neq => 8,
            BitAnd => 7,
            BitXor => 6,
            BitOr => 5,
            And => 4,
            Or => 3,
            Question => 2,
            Colon => 1,
            UnaryMinus | UnaryPlus | Not | BitNot => 13,
        }
    }

    pub fn is_unary(self) -> bool {
        matches!(
            self,
            Operator::UnaryMinus | Operator::UnaryPlus | Operator::Not | Operator::BitNot
        )
    }

    /// The prefix form of an operator token seen where a value is expected.
    pub fn as_prefix(self) -> Option<Operator> {
        match self {
            Operator::Minus | Operator::UnaryMinus => Some(Operator::UnaryMinus),
            Operator::Plus | Operator::UnaryPlus => Some(Operator::UnaryPlus),
            Operator::Not => Some(Operator::Not),
            Operator::BitNot => Some(Operator::BitNot),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        use Operator::*;
        match self {
            Mult => "*",
            Divide => "/",
            Mod => "%",
            Plus | UnaryPlus => "+",
            Minus | UnaryMinus => "-",
            LeftShift => "<<",
            RightShift => ">>",
            Less => "<",
            Greater => ">",
            Leq => "<=",
            Geq => ">=",
            Equal => "==",
            Neq => "!=",
            BitAnd => "&",
            BitXor => "^",
            BitOr => "|",
            And => "&&",
            Or => "||",
            Question => "?",
            Colon => ":",
            Not => "!",
            BitNot => "~",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Token categories produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A numeric literal, or a quoted or braced string already classified.
    Value(Value),
    /// `$name` or `$name(index)`.
    Variable { name: String, index: Option<String> },
    /// `[script]`.
    Command(String),
    /// A function name; the opening parenthesis has been consumed.
    Function(String),
    Operator(Operator),
    OpenParen,
    CloseParen,
    Comma,
    End,
    /// A character that starts no token.
    Unknown(char),
}

/// Kind a math function argument is converted to before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Truncated toward zero when given a rational.
    Int,
    /// Promoted when given an integer.
    Double,
    /// Passed through.
    Either,
}

impl ArgKind {
    /// Converts a numeric argument. A string is rejected.
    pub fn coerce(self, value: Value) -> Result<Value> {
        match (self, value) {
            (_, Value::Str(_)) => Err(ExprError::NonNumericArgument),
            (ArgKind::Int, Value::Rational(q)) => Ok(Value::Int(q.to_int())),
            (ArgKind::Double, Value::Int(z)) => Ok(Value::Rational(z.into())),
            (_, v) => Ok(v),
        }
    }
}

/// Entry of the math function table.
#[derive(Clone)]
pub struct MathFunction {
    pub name: FunctionName,
    pub args: heapless::Vec<ArgKind, MAX_MATH_ARGS>,
    pub implementation: MathImpl,
}

impl fmt::Debug for MathFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MathFunction")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl MathFunction {
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// Conversion of a `&str` into a fixed capacity [`FunctionName`].
pub trait TryIntoFunctionName {
    fn try_into_function_name(&self) -> Result<FunctionName>;
}

impl TryIntoFunctionName for str {
    fn try_into_function_name(&self) -> Result<FunctionName> {
        let mut name = FunctionName::new();
        name.push_str(self).map_err(|_| ExprError::FunctionNameTooLong)?;
        Ok(name)
    }
}
