//! Dependency tracking for formula cells

use ahash::{AHashMap, AHashSet};

/// Dependency graph over cell names
///
/// An edge `(dependee, dependent)` records that the dependent's formula
/// references the dependee. Both directions are indexed so that neither
/// [`dependents`](Self::dependents) nor [`dependees`](Self::dependees) has to
/// scan the graph. Edges are unique; self-edges are allowed and left for the
/// recalculation step to reject.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Name → names whose formulas reference it
    dependents: AHashMap<String, AHashSet<String>>,
    /// Name → names its formula references
    dependees: AHashMap<String, AHashSet<String>>,
    /// Number of distinct edges
    edges: usize,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of edges
    pub fn len(&self) -> usize {
        self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges == 0
    }

    /// Add an edge: `dependent` references `dependee`
    ///
    /// Returns `false` if the edge was already present.
    pub fn add_dependency(&mut self, dependee: &str, dependent: &str) -> bool {
        let inserted = self
            .dependents
            .entry(dependee.to_string())
            .or_default()
            .insert(dependent.to_string());
        if inserted {
            self.dependees
                .entry(dependent.to_string())
                .or_default()
                .insert(dependee.to_string());
            self.edges += 1;
        }
        inserted
    }

    /// Remove an edge if present
    pub fn remove_dependency(&mut self, dependee: &str, dependent: &str) -> bool {
        let removed = remove_from(&mut self.dependents, dependee, dependent);
        if removed {
            remove_from(&mut self.dependees, dependent, dependee);
            self.edges -= 1;
        }
        removed
    }

    /// Names whose formulas directly reference `name`
    pub fn dependents<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.dependents
            .get(name)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Names directly referenced by the formula of `name`
    pub fn dependees<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.dependees
            .get(name)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn has_dependents(&self, name: &str) -> bool {
        self.dependents.contains_key(name)
    }

    pub fn has_dependees(&self, name: &str) -> bool {
        self.dependees.contains_key(name)
    }

    /// Number of names directly referenced by `name`
    pub fn dependee_count(&self, name: &str) -> usize {
        self.dependees.get(name).map_or(0, |set| set.len())
    }

    /// Replace every `(name, *)` edge with edges to `new_dependees`
    ///
    /// Returns the dependees that were replaced, so the change can be undone by
    /// calling this again with them.
    pub fn replace_dependees<I, S>(&mut self, name: &str, new_dependees: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let previous: Vec<String> = self
            .dependees
            .get(name)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();

        for dependee in &previous {
            self.remove_dependency(dependee, name);
        }
        for dependee in new_dependees {
            self.add_dependency(dependee.as_ref(), name);
        }

        previous
    }

    /// Replace every `(*, name)` edge with edges from `new_dependents`
    pub fn replace_dependents<I, S>(&mut self, name: &str, new_dependents: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let previous: Vec<String> = self
            .dependents
            .get(name)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();

        for dependent in &previous {
            self.remove_dependency(name, dependent);
        }
        for dependent in new_dependents {
            self.add_dependency(name, dependent.as_ref());
        }

        previous
    }

    /// Clear all edges
    pub fn clear(&mut self) {
        self.dependents.clear();
        self.dependees.clear();
        self.edges = 0;
    }
}

/// Remove `value` from the set under `key`, dropping the set once it is empty
fn remove_from(map: &mut AHashMap<String, AHashSet<String>>, key: &str, value: &str) -> bool {
    let Some(set) = map.get_mut(key) else {
        return false;
    };
    let removed = set.remove(value);
    if set.is_empty() {
        map.remove(key);
    }
    removed
}
