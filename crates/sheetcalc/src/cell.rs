//! Cell contents and values

use sheetcalc_formula::{Formula, FormulaError, LookupError};
use std::fmt;

/// What a cell holds: a number, text, or a formula
#[derive(Debug, Clone, PartialEq)]
pub enum CellContents {
    Number(f64),
    Text(String),
    Formula(Formula),
}

/// Contents of a cell that is not stored
pub(crate) static EMPTY_CONTENTS: CellContents = CellContents::Text(String::new());

impl CellContents {
    /// Empty text, the contents of every absent cell
    pub fn is_empty(&self) -> bool {
        matches!(self, CellContents::Text(s) if s.is_empty())
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellContents::Formula(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellContents::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellContents::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_formula(&self) -> Option<&Formula> {
        match self {
            CellContents::Formula(f) => Some(f),
            _ => None,
        }
    }

    /// Names this cell's value is computed from
    pub fn dependees(&self) -> &[String] {
        match self {
            CellContents::Formula(f) => f.variables(),
            _ => &[],
        }
    }

    /// Compute the value of these contents
    pub fn evaluate<F>(&self, lookup: F) -> CellValue
    where
        F: FnMut(&str) -> Result<f64, LookupError>,
    {
        match self {
            CellContents::Number(n) => CellValue::Number(*n),
            CellContents::Text(s) => CellValue::Text(s.clone()),
            CellContents::Formula(f) => match f.evaluate(lookup) {
                Ok(n) => CellValue::Number(n),
                Err(err) => CellValue::Error(err),
            },
        }
    }
}

/// Persisted form: number text, plain text, or `=` followed by the canonical formula
impl fmt::Display for CellContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellContents::Number(n) => write!(f, "{}", n),
            CellContents::Text(s) => write!(f, "{}", s),
            CellContents::Formula(formula) => write!(f, "={}", formula),
        }
    }
}

impl From<f64> for CellContents {
    fn from(n: f64) -> Self {
        CellContents::Number(n)
    }
}

impl From<&str> for CellContents {
    fn from(s: &str) -> Self {
        CellContents::Text(s.to_string())
    }
}

impl From<String> for CellContents {
    fn from(s: String) -> Self {
        CellContents::Text(s)
    }
}

impl From<Formula> for CellContents {
    fn from(f: Formula) -> Self {
        CellContents::Formula(f)
    }
}

/// Computed value of a cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    /// Evaluation of the cell's formula failed
    Error(FormulaError),
}

/// Value of a cell that is not stored
pub(crate) static EMPTY_VALUE: CellValue = CellValue::Text(String::new());

impl CellValue {
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&FormulaError> {
        match self {
            CellValue::Error(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Error(e) => write!(f, "{}", e.kind()),
        }
    }
}

/// A stored cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub(crate) contents: CellContents,
    pub(crate) value: CellValue,
}

impl Cell {
    /// Create a cell whose value has not been computed yet
    pub(crate) fn new(contents: CellContents) -> Self {
        Self {
            contents,
            value: EMPTY_VALUE.clone(),
        }
    }

    pub fn contents(&self) -> &CellContents {
        &self.contents
    }

    pub fn value(&self) -> &CellValue {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetcalc_formula::FormulaErrorKind;

    #[test]
    fn test_persisted_form() {
        assert_eq!(CellContents::Number(2.5).to_string(), "2.5");
        assert_eq!(CellContents::Number(3.0).to_string(), "3");
        assert_eq!(CellContents::from("hello").to_string(), "hello");
        let f = Formula::new("a1 + 2.0").unwrap();
        assert_eq!(CellContents::from(f).to_string(), "=a1+2");
    }

    #[test]
    fn test_empty_contents() {
        assert!(EMPTY_CONTENTS.is_empty());
        assert!(!CellContents::from(" ").is_empty());
        assert!(!CellContents::Number(0.0).is_empty());
    }

    #[test]
    fn test_dependees() {
        let f = Formula::new("b1 * b1 + c2").unwrap();
        assert_eq!(CellContents::from(f).dependees(), ["b1", "c2"]);
        assert!(CellContents::Number(1.0).dependees().is_empty());
    }

    #[test]
    fn test_evaluate() {
        let f = CellContents::from(Formula::new("a1 / 2").unwrap());
        assert_eq!(f.evaluate(|_| Ok(5.0)), CellValue::Number(2.5));

        let value = f.evaluate(|_| Ok(0.0));
        assert_eq!(value, CellValue::Number(0.0));

        let value = CellContents::from(Formula::new("1 / a1").unwrap()).evaluate(|_| Ok(0.0));
        assert!(value.is_error());
        assert_eq!(value.as_error().map(|e| e.kind()), Some(FormulaErrorKind::DivideByZero));
        assert_eq!(value.to_string(), "#DIV/0!");

        assert_eq!(
            CellContents::from("x").evaluate(|_| unreachable!()),
            CellValue::Text("x".into())
        );
    }
}
