//! Persisted cell records
//!
//! A [`CellRecord`] is the storage-neutral form of one non-empty cell: its
//! name and its contents as text. Formula contents are written as `=`
//! followed by the canonical formula, so reading a record back through
//! [`Spreadsheet::set_contents_of_cell`](crate::Spreadsheet::set_contents_of_cell)
//! reproduces the cell.

/// One saved cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRecord {
    pub name: String,
    pub contents: String,
}

impl CellRecord {
    pub fn new<N: Into<String>, C: Into<String>>(name: N, contents: C) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    pub fn is_formula(&self) -> bool {
        self.contents.starts_with('=')
    }

    /// Formula text without the leading `=`
    pub fn formula_text(&self) -> Option<&str> {
        self.contents.strip_prefix('=')
    }
}
