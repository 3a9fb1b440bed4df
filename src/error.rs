//! Error types and handling for the mpexpr-rs crate.
//!
//! Every failure in the arithmetic kernel and in the evaluator is reported through
//! [`ExprError`]. Errors are never recovered locally: the first one raised unwinds the
//! whole evaluation back to the caller, and the partially built values along the way are
//! released by ordinary ownership.

use alloc::string::{String, ToString};
use core::fmt;

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, ExprError>;

/// Error type for expression parsing, evaluation and number crunching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// The token stream does not form an expression.
    ///
    /// Raised for a missing operand, a stray token after a complete expression,
    /// an identifier that is not a function call, and similar problems.
    Syntax { expr: String },

    /// A `(` without its `)`, or a `)` that closes nothing.
    UnmatchedParenthesis { expr: String },

    /// An operand kind is not allowed for an operator.
    ///
    /// `kind` is the human readable description of the offending operand,
    /// either `floating-point value` or `non-numeric string`.
    IllegalOperand { op: String, kind: &'static str },

    /// A character sequence that should have been an operator is not one.
    UnknownOperator,

    /// A `:` appeared with no pending `?`.
    ColonWithoutQuestion,

    /// A call names a function that is not in the context's table.
    UnknownFunction { name: String },

    /// A call supplied more arguments than the function takes.
    TooManyArguments,

    /// A call supplied fewer arguments than the function takes.
    TooFewArguments,

    /// A string was passed where a function expects a number.
    NonNumericArgument,

    /// Integer or rational division by zero.
    DivideByZero,

    /// A domain error raised by the arithmetic kernel.
    ///
    /// The message is reported verbatim, for example `Negative argument for factorial`.
    Math(String),

    /// The substitution hook could not resolve a `$variable` or `[command]`.
    Substitution(String),

    /// A precision write was rejected. The text is what the caller tried to store.
    InvalidPrecision(String),

    /// Error when capacity is exceeded for a heapless container.
    ///
    /// The string names the table that overflowed.
    CapacityExceeded(&'static str),

    /// A function name does not fit the heapless name buffer.
    FunctionNameTooLong,

    /// A numeric entry point evaluated an expression whose value is a string.
    NonNumericResult,
}

impl ExprError {
    /// Shorthand for a kernel domain error.
    pub fn math(msg: &str) -> ExprError {
        ExprError::Math(msg.to_string())
    }

    /// Stable positive code per variant, used as the status of the C ABI.
    pub fn error_code(&self) -> i32 {
        match self {
            ExprError::Syntax { .. } => 1,
            ExprError::UnmatchedParenthesis { .. } => 2,
            ExprError::IllegalOperand { .. } => 3,
            ExprError::UnknownOperator => 4,
            ExprError::ColonWithoutQuestion => 5,
            ExprError::UnknownFunction { .. } => 6,
            ExprError::TooManyArguments => 7,
            ExprError::TooFewArguments => 8,
            ExprError::NonNumericArgument => 9,
            ExprError::DivideByZero => 10,
            ExprError::Math(_) => 11,
            ExprError::Substitution(_) => 12,
            ExprError::InvalidPrecision(_) => 13,
            ExprError::CapacityExceeded(_) => 14,
            ExprError::FunctionNameTooLong => 15,
            ExprError::NonNumericResult => 16,
        }
    }
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::Syntax { expr } => write!(f, "syntax error in expression \"{}\"", expr),
            ExprError::UnmatchedParenthesis { expr } => {
                write!(f, "unmatched parentheses in expression \"{}\"", expr)
            }
            ExprError::IllegalOperand { op, kind } => {
                write!(f, "can't use {} as operand of \"{}\"", kind, op)
            }
            ExprError::UnknownOperator => write!(f, "unknown operator in expression"),
            ExprError::ColonWithoutQuestion => write!(f, "can't have : operator without ? first"),
            ExprError::UnknownFunction { name } => write!(f, "unknown math function \"{}\"", name),
            ExprError::TooManyArguments => write!(f, "too many arguments for math function"),
            ExprError::TooFewArguments => write!(f, "too few arguments for math function"),
            ExprError::NonNumericArgument => {
                write!(f, "argument to math function didn't have numeric value")
            }
            ExprError::DivideByZero => write!(f, "divide by zero"),
            ExprError::Math(msg) => write!(f, "{}", msg),
            ExprError::Substitution(msg) => write!(f, "{}", msg),
            ExprError::InvalidPrecision(text) => {
                write!(f, "improper value for precision: \"{}\"", text)
            }
            ExprError::CapacityExceeded(table) => write!(f, "Capacity exceeded for {}", table),
            ExprError::FunctionNameTooLong => write!(f, "function name too long"),
            ExprError::NonNumericResult => write!(f, "expression didn't have numeric value"),
        }
    }
}

impl From<String> for ExprError {
    fn from(err: String) -> ExprError {
        ExprError::Math(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn test_messages() {
        let e = ExprError::IllegalOperand {
            op: "%".to_string(),
            kind: "floating-point value",
        };
        assert_eq!(format!("{}", e), "can't use floating-point value as operand of \"%\"");
        assert_eq!(format!("{}", ExprError::DivideByZero), "divide by zero");
        assert_eq!(
            format!("{}", ExprError::math("Negative argument for factorial")),
            "Negative argument for factorial"
        );
        assert_eq!(
            format!("{}", ExprError::Syntax { expr: "1 +".to_string() }),
            "syntax error in expression \"1 +\""
        );
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            ExprError::Syntax { expr: String::new() },
            ExprError::UnmatchedParenthesis { expr: String::new() },
            ExprError::UnknownOperator,
            ExprError::ColonWithoutQuestion,
            ExprError::TooManyArguments,
            ExprError::TooFewArguments,
            ExprError::NonNumericArgument,
            ExprError::DivideByZero,
            ExprError::Math(String::new()),
            ExprError::FunctionNameTooLong,
            ExprError::NonNumericResult,
        ];
        let mut codes: alloc::vec::Vec<i32> = errors.iter().map(|e| e.error_code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|c| *c > 0));
    }
}
