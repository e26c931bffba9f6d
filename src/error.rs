// ABOUTME: Error types for the lexer, parser, and evaluator

use crate::value::Value;
use thiserror::Error;

// ===== Arity constant strings (eliminates allocations in error paths) =====
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_TWO_OR_THREE: &str = "2-3";
pub const ARITY_AT_LEAST_ONE: &str = "at least 1";
pub const ARITY_AT_LEAST_TWO: &str = "at least 2";

/// Top-level error: one variant per pipeline stage. Each renders as the
/// single line the driver prints before exiting with status 1.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Lex(#[from] LexError),

    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    #[error("Evaluation Error: {0}")]
    Eval(#[from] EvalError),
}

/// Unrecognized or unterminated input in the character stream. Carries the
/// offending character and its 1-based position in the stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Untokenizable input on character '{character}' at {position}: {reason}")]
pub struct LexError {
    pub character: char,
    pub position: usize,
    pub reason: &'static str,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Syntax error: too many close parentheses.")]
    TooManyCloseParens,

    #[error("Syntax error: not enough close parentheses.")]
    NotEnoughCloseParens,

    #[error("Syntax error: quote without a following datum.")]
    DanglingQuote,

    #[error("Syntax error: illegal use of '.'")]
    IllegalDot,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Type mismatch error with function name, expected type, actual type, and position
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
        position: usize,
    },

    /// Arity error with function name, expected count/range, and actual count
    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    Arity {
        function: String,
        expected: String, // "2", "2-3", "at least 1"
        actual: usize,
    },

    /// Structural mistake in a special form
    #[error("{form}: {message}")]
    BadForm { form: &'static str, message: String },

    #[error("Undefined symbol '{0}'")]
    UndefinedSymbol(String),

    #[error("Cannot set! undefined symbol '{0}'")]
    SetUndefined(String),

    #[error("Attempting to call non-function")]
    NotCallable,

    #[error("Unrecognized special form.")]
    UnrecognizedForm,

    #[error("Argument-parameter mismatch!")]
    ArgumentMismatch,

    #[error("Division by 0.")]
    DivisionByZero,

    #[error("else: not allowed outside of cond.")]
    ElseOutsideCond,

    /// User abort via the `error` primitive
    #[error("{0}")]
    Raised(String),
}

impl EvalError {
    /// Create a type mismatch error with full context
    pub fn type_mismatch(function: &str, expected: &str, actual: &Value, position: usize) -> Self {
        EvalError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
            position,
        }
    }

    /// Create an arity error with expected and actual counts
    pub fn arity(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::Arity {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create a malformed-special-form error
    pub fn bad_form(form: &'static str, message: impl Into<String>) -> Self {
        EvalError::BadForm {
            form,
            message: message.into(),
        }
    }
}
