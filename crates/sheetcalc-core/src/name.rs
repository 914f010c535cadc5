//! Name rules
//!
//! Every variable that appears in a formula and every cell name handed to a
//! spreadsheet goes through a [`NameRules`] strategy: it is first normalized
//! (for example upper-cased) and the normalized form is then validated.
//!
//! # Example
//!
//! ```rust
//! use sheetcalc_core::{rules, NameRules};
//!
//! let upper = rules(|s: &str| s.to_uppercase(), |s: &str| s.len() == 2);
//! assert_eq!(upper.normalize("a1"), "A1");
//! assert!(upper.is_valid("A1"));
//! assert!(!upper.is_valid("A10"));
//! ```

use lazy_regex::regex_is_match;
use std::fmt;

/// Normalization and validation strategy for variable and cell names
pub trait NameRules {
    /// Convert a name into its canonical form
    fn normalize(&self, name: &str) -> String {
        name.to_string()
    }

    /// Extra restrictions on an already-normalized name
    fn is_valid(&self, _name: &str) -> bool {
        true
    }
}

/// Identity normalizer that accepts every name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultRules;

impl NameRules for DefaultRules {}

/// [`NameRules`] built from a pair of closures
#[derive(Clone, Copy)]
pub struct FnRules<N, V> {
    normalize: N,
    validate: V,
}

impl<N, V> FnRules<N, V>
where
    N: Fn(&str) -> String,
    V: Fn(&str) -> bool,
{
    /// Create rules from a normalizer and a validator
    pub fn new(normalize: N, validate: V) -> Self {
        Self {
            normalize,
            validate,
        }
    }
}

impl<N, V> NameRules for FnRules<N, V>
where
    N: Fn(&str) -> String,
    V: Fn(&str) -> bool,
{
    fn normalize(&self, name: &str) -> String {
        (self.normalize)(name)
    }

    fn is_valid(&self, name: &str) -> bool {
        (self.validate)(name)
    }
}

impl<N, V> fmt::Debug for FnRules<N, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRules").finish_non_exhaustive()
    }
}

/// Shorthand for [`FnRules::new`]
pub fn rules<N, V>(normalize: N, validate: V) -> FnRules<N, V>
where
    N: Fn(&str) -> String,
    V: Fn(&str) -> bool,
{
    FnRules::new(normalize, validate)
}

impl<R: NameRules + ?Sized> NameRules for &R {
    fn normalize(&self, name: &str) -> String {
        (**self).normalize(name)
    }

    fn is_valid(&self, name: &str) -> bool {
        (**self).is_valid(name)
    }
}

impl<R: NameRules + ?Sized> NameRules for Box<R> {
    fn normalize(&self, name: &str) -> String {
        (**self).normalize(name)
    }

    fn is_valid(&self, name: &str) -> bool {
        (**self).is_valid(name)
    }
}

/// Check the basic variable shape: a letter or underscore, then letters, digits or underscores
pub fn is_variable(name: &str) -> bool {
    regex_is_match!(r"^[a-zA-Z_][a-zA-Z0-9_]*$", name)
}

/// Check the spreadsheet cell-name shape: one or more letters followed by one or more digits
pub fn is_cell_name(name: &str) -> bool {
    regex_is_match!(r"^[a-zA-Z]+[0-9]+$", name)
}
