// ABOUTME: Error types surfaced by every stage of the pipeline: reading,
// ABOUTME: expansion, and evaluation.

use crate::value::Value;
use thiserror::Error;

// ===== Arity constant strings (eliminates allocations in error paths) =====
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_THREE: &str = "3";
pub const ARITY_ZERO_OR_ONE: &str = "0-1";
pub const ARITY_ONE_OR_TWO: &str = "1-2";
pub const ARITY_AT_LEAST_ONE: &str = "at least 1";
pub const ARITY_AT_LEAST_TWO: &str = "at least 2";

/// The single error type threaded through read, expand, and eval. The
/// evaluator does not catch its own errors: the first one aborts the current
/// evaluation and surfaces to the host, which decides how to react.
#[derive(Error, Debug, Clone)]
pub enum ActinideError {
    /// Malformed syntax: unbalanced parens, illegal dot placement,
    /// unterminated string, invalid numeric literal, unknown escape, or
    /// end-of-input inside a list.
    #[error("read error: {0}")]
    Read(String),

    /// Macro returned a non-form, `unquote`/`unquote-splicing` appeared
    /// outside quasiquote, or macro expansion failed to reach a fixed point.
    #[error("expansion error: {0}")]
    Expansion(String),

    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),

    /// Wrong argument kind to a builtin.
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    Type {
        function: String,
        expected: String,
        actual: String,
        position: usize,
    },

    /// Argument count mismatch at application.
    #[error("{function}: expected {expected} argument{}, got {actual}", if expected == "1" { "" } else { "s" })]
    Arity {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Index out of range, division policy violated, parse failure in
    /// `integer`/`decimal`, and similar builtin-level domain failures.
    #[error("{function}: {message}")]
    Domain { function: String, message: String },

    /// Non-tail recursion exceeded the host-stack budget.
    #[error("recursion depth exceeded (limit {limit})")]
    RecursionDepthExceeded { limit: usize },

    #[error("value is not callable: {0}")]
    NotCallable(String),
}

impl ActinideError {
    pub fn read(message: impl Into<String>) -> Self {
        ActinideError::Read(message.into())
    }

    pub fn expansion(message: impl Into<String>) -> Self {
        ActinideError::Expansion(message.into())
    }

    pub fn type_error(function: &str, expected: &str, actual: &Value, position: usize) -> Self {
        ActinideError::Type {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name(),
            position,
        }
    }

    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        ActinideError::Arity {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    pub fn domain_error(function: &str, message: impl Into<String>) -> Self {
        ActinideError::Domain {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
