//! # sheetcalc-formula
//!
//! Formula language for the sheetcalc spreadsheet engine.
//!
//! This crate provides:
//! - Tokenizing formula text (text → tokens)
//! - Validation and normalization (tokens → [`Formula`])
//! - Evaluation against a variable lookup ([`Formula`] → number or [`FormulaError`])
//! - A [`DependencyGraph`] for tracking which cells reference which
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc_formula::{Formula, LookupError};
//!
//! let f = Formula::new("(a1 + 3) * b2").unwrap();
//! let value = f.evaluate(|name| match name {
//!     "a1" => Ok(1.0),
//!     "b2" => Ok(2.0),
//!     _ => Err(LookupError::Undefined(name.to_string())),
//! });
//! assert_eq!(value, Ok(8.0));
//! ```

pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod tokenizer;

pub use dependency::DependencyGraph;
pub use error::{FormulaError, FormulaErrorKind, FormulaFormatError, FormulaResult, LookupError};
pub use formula::Formula;
pub use tokenizer::{tokenize, Operator, Token, Tokenizer};
