//! Spreadsheet
//!
//! A [`Spreadsheet`] owns the cell store and the dependency graph and keeps
//! every cached value consistent with the contents it was computed from.
//! Each edit runs as one sequence: stage the cell's new dependees, compute the
//! recalculation order (rolling the graph back on a cycle), store the new
//! contents, then re-evaluate the affected cells in order.

use crate::calculation::{self, RecalcStats};
use crate::cell::{Cell, CellContents, CellValue, EMPTY_CONTENTS, EMPTY_VALUE};
use crate::record::CellRecord;
use ahash::AHashMap;
use sheetcalc_core::{is_cell_name, DefaultRules, Error, NameRules, Result};
use sheetcalc_formula::{DependencyGraph, Formula, LookupError};

/// Version string of a sheet created without one
pub const DEFAULT_VERSION: &str = "default";

/// An in-memory spreadsheet
///
/// Cell names are one or more letters followed by one or more digits, after
/// normalization by the sheet's [`NameRules`]. The same rules normalize and
/// validate every variable of every formula stored in the sheet.
///
/// # Example
///
/// ```rust
/// use sheetcalc::prelude::*;
///
/// let mut sheet = Spreadsheet::new();
/// sheet.set_contents_of_cell("A1", "10").unwrap();
/// sheet.set_contents_of_cell("B1", "=A1 * 2").unwrap();
///
/// let order = sheet.set_contents_of_cell("A1", "4").unwrap();
/// assert_eq!(order, ["A1", "B1"]);
/// assert_eq!(sheet.cell_value("B1").unwrap(), &CellValue::Number(8.0));
/// ```
#[derive(Debug, Clone)]
pub struct Spreadsheet<R = DefaultRules> {
    cells: AHashMap<String, Cell>,
    graph: DependencyGraph,
    rules: R,
    version: String,
    changed: bool,
    last_recalc: RecalcStats,
}

impl Spreadsheet<DefaultRules> {
    /// Create an empty sheet with identity normalization and no extra validation
    pub fn new() -> Self {
        Self::with_rules(DefaultRules, DEFAULT_VERSION)
    }
}

impl Default for Spreadsheet<DefaultRules> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: NameRules> Spreadsheet<R> {
    /// Create an empty sheet with the given name rules and version string
    pub fn with_rules<V: Into<String>>(rules: R, version: V) -> Self {
        Self {
            cells: AHashMap::new(),
            graph: DependencyGraph::new(),
            rules,
            version: version.into(),
            changed: false,
            last_recalc: RecalcStats::default(),
        }
    }

    /// Rebuild a sheet from saved records
    ///
    /// Records may arrive in any order. Any record that cannot be applied fails
    /// the whole load. The loaded sheet starts out unchanged.
    pub fn from_records<I, V>(records: I, rules: R, version: V) -> Result<Self>
    where
        I: IntoIterator<Item = CellRecord>,
        V: Into<String>,
    {
        let mut sheet = Self::with_rules(rules, version);
        for record in records {
            sheet
                .set_contents_of_cell(&record.name, &record.contents)
                .map_err(|err| Error::InvalidRecord {
                    name: record.name.clone(),
                    reason: err.to_string(),
                })?;
        }
        sheet.changed = false;
        Ok(sheet)
    }

    /// One record per non-empty cell, sorted by name
    pub fn records(&self) -> Vec<CellRecord> {
        let mut records: Vec<CellRecord> = self
            .cells
            .iter()
            .map(|(name, cell)| CellRecord::new(name.as_str(), cell.contents.to_string()))
            .collect();
        records.sort();
        records
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Whether the sheet was modified since it was created, loaded or saved
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Record that the current state has been persisted
    pub fn mark_saved(&mut self) {
        self.changed = false;
    }

    /// Statistics from the most recent successful edit
    pub fn last_recalc(&self) -> &RecalcStats {
        &self.last_recalc
    }

    /// Names of all non-empty cells, in no particular order
    pub fn nonempty_cells(&self) -> impl Iterator<Item = &str> + '_ {
        self.cells.keys().map(String::as_str)
    }

    /// Contents of a cell; an absent cell holds empty text
    pub fn cell_contents(&self, name: &str) -> Result<&CellContents> {
        let name = self.normalize_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map_or(&EMPTY_CONTENTS, |cell| &cell.contents))
    }

    /// Cached value of a cell; an absent cell has empty text as its value
    pub fn cell_value(&self, name: &str) -> Result<&CellValue> {
        let name = self.normalize_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map_or(&EMPTY_VALUE, |cell| &cell.value))
    }

    /// A stored cell, or `None` if the cell is empty
    pub fn cell(&self, name: &str) -> Result<Option<&Cell>> {
        let name = self.normalize_name(name)?;
        Ok(self.cells.get(&name))
    }

    /// Cells whose formulas reference `name` directly, sorted
    pub fn direct_dependents(&self, name: &str) -> Result<Vec<String>> {
        let name = self.normalize_name(name)?;
        let mut dependents: Vec<String> = self.graph.dependents(&name).map(str::to_string).collect();
        dependents.sort();
        Ok(dependents)
    }

    /// Set a cell from text as a user would type it
    ///
    /// Text that parses as a finite number becomes a number, text starting with
    /// `=` becomes a formula over the rest, and anything else is stored as text.
    /// Empty text clears the cell.
    ///
    /// Returns the recomputed cells: the edited cell first, then every cell that
    /// depends on it, each after the cells it references.
    pub fn set_contents_of_cell(&mut self, name: &str, content: &str) -> Result<Vec<String>> {
        let name = self.normalize_name(name)?;

        if let Some(n) = parse_number(content) {
            return self.store(name, Some(CellContents::Number(n)));
        }

        if let Some(text) = content.strip_prefix('=') {
            let formula = Formula::with_rules(text, &CellNameRules(&self.rules))?;
            return self.store(name, Some(CellContents::Formula(formula)));
        }

        self.set_text_normalized(name, content)
    }

    /// Store a number; NaN and infinities are rejected
    pub fn set_cell_number(&mut self, name: &str, number: f64) -> Result<Vec<String>> {
        let name = self.normalize_name(name)?;
        if !number.is_finite() {
            return Err(Error::invalid_contents(name, "number is not finite"));
        }
        self.store(name, Some(CellContents::Number(number)))
    }

    /// Store text verbatim; empty text clears the cell
    ///
    /// Text that would read back as a number or a formula is rejected, so every
    /// text cell survives [`records`](Self::records) and
    /// [`from_records`](Self::from_records) unchanged.
    pub fn set_cell_text(&mut self, name: &str, text: &str) -> Result<Vec<String>> {
        let name = self.normalize_name(name)?;
        if text.starts_with('=') {
            return Err(Error::invalid_contents(name, "text starts with '='"));
        }
        if parse_number(text).is_some() {
            return Err(Error::invalid_contents(name, "text is a number"));
        }
        self.set_text_normalized(name, text)
    }

    /// Store an already-built formula
    ///
    /// The formula is checked again against the sheet's rules, so its
    /// variables are normalized and must be valid cell names.
    pub fn set_cell_formula(&mut self, name: &str, formula: Formula) -> Result<Vec<String>> {
        let name = self.normalize_name(name)?;
        let formula = Formula::with_rules(formula.as_str(), &CellNameRules(&self.rules))?;
        self.store(name, Some(CellContents::Formula(formula)))
    }

    fn set_text_normalized(&mut self, name: String, text: &str) -> Result<Vec<String>> {
        if text.is_empty() {
            self.store(name, None)
        } else {
            self.store(name, Some(CellContents::Text(text.to_string())))
        }
    }

    /// Normalize a cell name and check it against the cell-name shape and the rules
    fn normalize_name(&self, name: &str) -> Result<String> {
        let normalized = self.rules.normalize(name);
        if is_cell_name(&normalized) && self.rules.is_valid(&normalized) {
            Ok(normalized)
        } else {
            Err(Error::invalid_name(name))
        }
    }

    /// Replace a cell's contents (`None` clears it) and bring dependents up to date
    fn store(&mut self, name: String, contents: Option<CellContents>) -> Result<Vec<String>> {
        let dependees: &[String] = match &contents {
            Some(contents) => contents.dependees(),
            None => &[],
        };

        let order = match calculation::apply_dependees(&mut self.graph, &name, dependees) {
            Ok(order) => order,
            Err(err) => {
                tracing::warn!(cell = %name, error = %err, "rejected edit");
                return Err(err);
            }
        };

        let kind = match &contents {
            Some(CellContents::Number(_)) => "number",
            Some(CellContents::Text(_)) => "text",
            Some(CellContents::Formula(_)) => "formula",
            None => "empty",
        };

        match contents {
            Some(contents) => {
                self.cells.insert(name.clone(), Cell::new(contents));
            }
            None => {
                self.cells.remove(&name);
            }
        }
        self.changed = true;

        self.last_recalc = self.recalculate(&order);
        tracing::debug!(
            cell = %name,
            kind,
            recalculated = self.last_recalc.cells_recalculated,
            "cell updated"
        );

        Ok(order)
    }

    /// Re-evaluate cells in order, each seeing the fresh values of earlier ones
    fn recalculate(&mut self, order: &[String]) -> RecalcStats {
        let mut stats = RecalcStats::default();

        for name in order {
            let value = match self.cells.get(name) {
                Some(cell) => cell.contents.evaluate(|var| lookup(&self.cells, var)),
                None => continue,
            };

            tracing::trace!(cell = %name, value = %value, "recalculated");
            stats.cells_recalculated += 1;
            if value.is_error() {
                stats.errors += 1;
            }

            if let Some(cell) = self.cells.get_mut(name) {
                cell.value = value;
            }
        }

        stats
    }
}

/// Resolve a formula variable to the cached numeric value of a cell
fn lookup(cells: &AHashMap<String, Cell>, name: &str) -> std::result::Result<f64, LookupError> {
    match cells.get(name).map(|cell| &cell.value) {
        Some(CellValue::Number(n)) if n.is_finite() => Ok(*n),
        Some(CellValue::Error(err)) => Err(LookupError::Upstream {
            name: name.to_string(),
            reason: err.reason().to_string(),
        }),
        Some(_) => Err(LookupError::NotNumeric(name.to_string())),
        None => Err(LookupError::Undefined(name.to_string())),
    }
}

/// Finite numbers only; `inf`, `NaN` and out-of-range literals stay text
fn parse_number(content: &str) -> Option<f64> {
    content
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Formula variables in a sheet must be cell names accepted by the sheet's rules
struct CellNameRules<'a, R: ?Sized>(&'a R);

impl<R: NameRules + ?Sized> NameRules for CellNameRules<'_, R> {
    fn normalize(&self, name: &str) -> String {
        self.0.normalize(name)
    }

    fn is_valid(&self, name: &str) -> bool {
        is_cell_name(name) && self.0.is_valid(name)
    }
}
