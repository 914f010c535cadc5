//! # sheetcalc-core
//!
//! Core types for the sheetcalc spreadsheet engine.
//!
//! This crate provides the pieces shared by the formula layer and the
//! spreadsheet layer:
//! - [`NameRules`] - How variable and cell names are normalized and validated
//! - [`is_variable`] and [`is_cell_name`] - The basic name shapes
//! - [`Error`] - Errors surfaced to callers of a spreadsheet
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc_core::{is_cell_name, DefaultRules, NameRules};
//!
//! let name = DefaultRules.normalize("B12");
//! assert!(is_cell_name(&name));
//! ```

pub mod error;
pub mod name;

// Re-exports for convenience
pub use error::{Error, Result};
pub use name::{is_cell_name, is_variable, rules, DefaultRules, FnRules, NameRules};
