//! # sheetcalc
//!
//! An in-memory spreadsheet engine.
//!
//! Cells hold numbers, text, or formulas over the four arithmetic operators.
//! Every edit keeps the dependency graph in sync, rejects circular references
//! without changing anything, and recomputes only the cells that depend on the
//! edited one.
//!
//! ## Features
//!
//! - Formula validation with configurable name normalization
//! - Evaluation errors (undefined cells, division by zero) stored as cell values
//! - Incremental recalculation in dependency order
//! - Save and load through plain [`CellRecord`]s (optional `serde` support)
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc::prelude::*;
//!
//! let mut sheet = Spreadsheet::new();
//! sheet.set_contents_of_cell("A1", "6").unwrap();
//! sheet.set_contents_of_cell("A2", "=A1 / 3").unwrap();
//! sheet.set_contents_of_cell("A3", "=A2 / (A1 - 6)").unwrap();
//!
//! assert_eq!(sheet.cell_value("A2").unwrap(), &CellValue::Number(2.0));
//! assert!(sheet.cell_value("A3").unwrap().is_error());
//!
//! // A circular edit is rejected and leaves the sheet as it was
//! let err = sheet.set_contents_of_cell("A1", "=A3").unwrap_err();
//! assert!(err.is_circular());
//! assert_eq!(sheet.cell_contents("A1").unwrap(), &CellContents::Number(6.0));
//! ```

pub mod calculation;
pub mod cell;
pub mod prelude;
pub mod record;
pub mod spreadsheet;

// Re-export spreadsheet types
pub use calculation::{cells_to_recalculate, RecalcStats, StagedEdit};
pub use cell::{Cell, CellContents, CellValue};
pub use record::CellRecord;
pub use spreadsheet::{Spreadsheet, DEFAULT_VERSION};

// Re-export core types
pub use sheetcalc_core::{
    is_cell_name, is_variable, rules, DefaultRules, Error, FnRules, NameRules, Result,
};

// Re-export formula types
pub use sheetcalc_formula::{
    DependencyGraph, Formula, FormulaError, FormulaErrorKind, FormulaFormatError, FormulaResult,
    LookupError,
};
