//! Formula error types
//!
//! Two families live here. [`FormulaFormatError`] is raised when formula text
//! is rejected at construction time. [`FormulaError`] is a value produced by
//! evaluation and stored in a cell, so downstream formulas can observe it.

use crate::tokenizer::{LexError, LexErrorKind};
use std::fmt;
use thiserror::Error;

/// Result type for formula evaluation
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Grammar violations detected while constructing a formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaFormatError {
    /// No tokens at all
    #[error("Formula is empty")]
    Empty,

    /// Text that is not a parenthesis, operator, number or identifier
    #[error("Illegal token {0:?}")]
    IllegalToken(String),

    /// Identifier that is malformed or rejected by the validator after normalization
    #[error("Invalid variable {0:?}")]
    InvalidVariable(String),

    /// First token cannot begin an expression
    #[error("Formula cannot start with {0:?}")]
    InvalidStart(String),

    /// Last token cannot end an expression
    #[error("Formula cannot end with {0:?}")]
    InvalidEnd(String),

    /// Token after `(` or an operator is not a number, variable or `(`
    #[error("Expected a number, variable or '(' after {after:?}, found {found:?}")]
    UnexpectedAfterOperator { after: String, found: String },

    /// Token after a number, variable or `)` is not an operator or `)`
    #[error("Expected an operator or ')' after {after:?}, found {found:?}")]
    UnexpectedAfterOperand { after: String, found: String },

    /// A `)` with no matching `(`
    #[error("Unbalanced ')' at token {position}")]
    UnbalancedClosing { position: usize },

    /// Some `(` never closed
    #[error("{unclosed} unclosed '(' at end of formula")]
    UnbalancedOpening { unclosed: usize },

    /// Numeric literal too large to represent
    #[error("Number {0:?} is out of range")]
    NumberOutOfRange(String),
}

impl From<LexError> for FormulaFormatError {
    fn from(err: LexError) -> Self {
        match err.kind {
            LexErrorKind::Unrecognized => FormulaFormatError::IllegalToken(err.text),
            LexErrorKind::OutOfRange => FormulaFormatError::NumberOutOfRange(err.text),
        }
    }
}

impl From<FormulaFormatError> for sheetcalc_core::Error {
    fn from(err: FormulaFormatError) -> Self {
        sheetcalc_core::Error::FormulaFormat(err.to_string())
    }
}

/// Category of an evaluation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormulaErrorKind {
    /// A variable could not be resolved to a number
    Lookup,
    /// Division by zero
    DivideByZero,
    /// Arithmetic produced a non-finite result
    Overflow,
    /// The evaluator reached a state a valid formula cannot produce
    Internal,
}

impl FormulaErrorKind {
    /// Short error code, in the style of spreadsheet error values
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaErrorKind::Lookup => "#REF!",
            FormulaErrorKind::DivideByZero => "#DIV/0!",
            FormulaErrorKind::Overflow => "#NUM!",
            FormulaErrorKind::Internal => "#ERROR!",
        }
    }
}

impl fmt::Display for FormulaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of an evaluation that did not produce a number
///
/// This is a value, stored as a cell's result and compared like any other value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{kind} {reason}")]
pub struct FormulaError {
    kind: FormulaErrorKind,
    reason: String,
}

impl FormulaError {
    /// Create an error of the given kind
    pub fn new<S: Into<String>>(kind: FormulaErrorKind, reason: S) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    /// Division by a value equal to zero
    pub fn divide_by_zero() -> Self {
        Self::new(FormulaErrorKind::DivideByZero, "divide by zero")
    }

    /// Operator `op` produced an infinite or NaN result
    pub fn overflow(op: char) -> Self {
        Self::new(
            FormulaErrorKind::Overflow,
            format!("result of '{}' is not a finite number", op),
        )
    }

    /// Evaluator invariant violation
    pub fn internal<S: Into<String>>(reason: S) -> Self {
        Self::new(FormulaErrorKind::Internal, reason)
    }

    /// Error category
    pub fn kind(&self) -> FormulaErrorKind {
        self.kind
    }

    /// Human-readable explanation
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Why a variable lookup failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No value is defined for the variable
    #[error("undefined variable {0}")]
    Undefined(String),

    /// The variable holds something other than a number
    #[error("variable {0} is not a number")]
    NotNumeric(String),

    /// The variable holds an error from its own evaluation
    #[error("variable {name} has an error: {reason}")]
    Upstream { name: String, reason: String },
}

impl From<LookupError> for FormulaError {
    fn from(err: LookupError) -> Self {
        FormulaError::new(FormulaErrorKind::Lookup, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_conversion() {
        let err = LexError {
            kind: LexErrorKind::Unrecognized,
            text: "$".into(),
            offset: 0,
        };
        assert_eq!(
            FormulaFormatError::from(err),
            FormulaFormatError::IllegalToken("$".into())
        );
    }

    #[test]
    fn test_lookup_error_becomes_value() {
        let err: FormulaError = LookupError::Undefined("A1".into()).into();
        assert_eq!(err.kind(), FormulaErrorKind::Lookup);
        assert_eq!(err.reason(), "undefined variable A1");
        assert_eq!(err.to_string(), "#REF! undefined variable A1");
    }

    #[test]
    fn test_evaluation_error_values() {
        let err = FormulaError::divide_by_zero();
        assert_eq!(err.kind(), FormulaErrorKind::DivideByZero);
        assert_eq!(err.to_string(), "#DIV/0! divide by zero");

        let err = FormulaError::overflow('*');
        assert_eq!(err.kind(), FormulaErrorKind::Overflow);
        assert_eq!(err.reason(), "result of '*' is not a finite number");

        assert_eq!(
            FormulaError::internal("stack").kind(),
            FormulaErrorKind::Internal
        );
    }

    #[test]
    fn test_format_error_into_core_error() {
        let err: sheetcalc_core::Error = FormulaFormatError::Empty.into();
        assert_eq!(
            err,
            sheetcalc_core::Error::FormulaFormat("Formula is empty".into())
        );
    }
}
