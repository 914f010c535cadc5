//! Error types for sheetcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by mutating or reading a spreadsheet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Cell name is malformed or rejected by the configured validator
    #[error("Invalid cell name: {0:?}")]
    InvalidName(String),

    /// Setting a formula would make a cell depend on itself
    #[error("Circular reference detected involving cell {0}")]
    CircularReference(String),

    /// Formula text does not follow the formula grammar
    #[error("Formula format error: {0}")]
    FormulaFormat(String),

    /// Contents that a cell of the requested kind cannot hold
    #[error("Invalid contents for cell {name}: {reason}")]
    InvalidContents { name: String, reason: String },

    /// A persisted cell record could not be applied
    #[error("Invalid cell record {name:?}: {reason}")]
    InvalidRecord { name: String, reason: String },
}

impl Error {
    /// Create an invalid-name error for a raw name
    pub fn invalid_name<S: Into<String>>(name: S) -> Self {
        Error::InvalidName(name.into())
    }

    /// Create an invalid-contents error for a cell
    pub fn invalid_contents<N: Into<String>, S: Into<String>>(name: N, reason: S) -> Self {
        Error::InvalidContents {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error rejected an edit because of a cycle
    pub fn is_circular(&self) -> bool {
        matches!(self, Error::CircularReference(_))
    }
}
