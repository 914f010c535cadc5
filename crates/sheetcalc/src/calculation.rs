//! Incremental recalculation
//!
//! After a cell changes, only the cells that transitively depend on it need
//! new values. [`cells_to_recalculate`] finds them and orders them so that every
//! cell comes after everything it depends on, rejecting the change if the
//! dependents graph reachable from the changed cell contains a cycle.
//!
//! Graph changes go through a [`StagedEdit`]: the new dependees are written
//! first, the order is computed against the updated graph, and the edit is
//! either committed or rolled back when the transaction is dropped.
//!
//! # Example
//!
//! ```rust
//! use sheetcalc::calculation::apply_dependees;
//! use sheetcalc::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! apply_dependees(&mut graph, "B1", ["A1"]).unwrap();
//! apply_dependees(&mut graph, "C1", ["B1"]).unwrap();
//!
//! let order = apply_dependees(&mut graph, "A1", std::iter::empty::<&str>()).unwrap();
//! assert_eq!(order, ["A1", "B1", "C1"]);
//!
//! // A1 = C1 would close a loop; the graph keeps its previous edges
//! assert!(apply_dependees(&mut graph, "A1", ["C1"]).is_err());
//! assert_eq!(graph.dependee_count("A1"), 0);
//! ```

use ahash::AHashSet;
use sheetcalc_core::{Error, Result};
use sheetcalc_formula::DependencyGraph;

/// Statistics from the most recent recalculation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecalcStats {
    /// Number of cells whose value was recomputed
    pub cells_recalculated: usize,
    /// Number of recomputed cells whose value is an error
    pub errors: usize,
}

/// Order in which cells must be recomputed after `seed` changes
///
/// The result starts with `seed` and contains exactly the cells reachable from
/// it through the dependents relation, each after all of its dependees among
/// them. Fails with [`Error::CircularReference`] if that subgraph has a cycle.
pub fn cells_to_recalculate<'g>(graph: &'g DependencyGraph, seed: &'g str) -> Result<Vec<String>> {
    let mut finished: Vec<&str> = Vec::new();
    let mut done: AHashSet<&str> = AHashSet::new();
    let mut on_path: AHashSet<&str> = AHashSet::new();

    on_path.insert(seed);
    let mut stack = vec![Frame::new(graph, seed)];

    while let Some(frame) = stack.last_mut() {
        if let Some(&next) = frame.dependents.get(frame.next) {
            frame.next += 1;
            if on_path.contains(next) {
                return Err(Error::CircularReference(next.to_string()));
            }
            if !done.contains(next) {
                on_path.insert(next);
                stack.push(Frame::new(graph, next));
            }
        } else {
            let name = frame.name;
            stack.pop();
            on_path.remove(name);
            done.insert(name);
            finished.push(name);
        }
    }

    Ok(finished.into_iter().rev().map(str::to_string).collect())
}

/// One node of the depth-first walk
struct Frame<'g> {
    name: &'g str,
    dependents: Vec<&'g str>,
    next: usize,
}

impl<'g> Frame<'g> {
    fn new(graph: &'g DependencyGraph, name: &'g str) -> Self {
        // Sorted so the order is stable across runs
        let mut dependents: Vec<&str> = graph.dependents(name).collect();
        dependents.sort_unstable();
        Self {
            name,
            dependents,
            next: 0,
        }
    }
}

/// A dependee change that is undone unless committed
///
/// Dropping an uncommitted edit restores the dependees the cell had before
/// [`stage`](Self::stage).
#[derive(Debug)]
pub struct StagedEdit<'g> {
    graph: &'g mut DependencyGraph,
    name: String,
    previous: Option<Vec<String>>,
}

impl<'g> StagedEdit<'g> {
    /// Replace the dependees of `name` in `graph`
    pub fn stage<I, S>(graph: &'g mut DependencyGraph, name: &str, dependees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let previous = graph.replace_dependees(name, dependees);
        Self {
            graph,
            name: name.to_string(),
            previous: Some(previous),
        }
    }

    /// Recalculation order against the staged graph
    pub fn recalculation_order(&self) -> Result<Vec<String>> {
        cells_to_recalculate(&*self.graph, &self.name)
    }

    /// Keep the staged dependees
    pub fn commit(mut self) {
        self.previous = None;
    }
}

impl Drop for StagedEdit<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.graph.replace_dependees(&self.name, previous);
        }
    }
}

/// Set the dependees of `name` and return the resulting recalculation order
///
/// On a circular reference the graph is left exactly as it was.
pub fn apply_dependees<I, S>(graph: &mut DependencyGraph, name: &str, dependees: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let edit = StagedEdit::stage(graph, name, dependees);
    let order = edit.recalculation_order()?;
    edit.commit();
    Ok(order)
}
