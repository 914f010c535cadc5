//! Prelude module - common imports for sheetcalc users
//!
//! ```rust
//! use sheetcalc::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellContents,
    CellRecord,
    CellValue,

    // Error types
    Error,
    Formula,
    FormulaError,
    FormulaErrorKind,
    FormulaFormatError,

    // Configuration
    NameRules,
    RecalcStats,
    Result,

    // Main types
    Spreadsheet,
};
