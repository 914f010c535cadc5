//! Validated formulas
//!
//! A [`Formula`] is built from text by tokenizing it, normalizing every
//! variable through a [`NameRules`] strategy and checking the token sequence
//! against the formula grammar. What remains is an immutable, canonical token
//! sequence that can be compared, hashed, printed and evaluated.

use crate::error::{FormulaFormatError, FormulaResult, LookupError};
use crate::evaluator;
use crate::tokenizer::{tokenize, Token};
use ahash::AHashSet;
use sheetcalc_core::{is_variable, DefaultRules, NameRules};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A grammar-valid infix formula over numbers, variables, `+ - * /` and parentheses
///
/// Equality and hashing use the canonical text, so `"2.0 + x7"` and
/// `"2.000 + x7"` are the same formula while `"x1+y2"` and `"y2+x1"` are not.
///
/// # Example
/// ```rust
/// use sheetcalc_formula::Formula;
///
/// let f = Formula::new("x1 + 2.50 * (y2 - 1)").unwrap();
/// assert_eq!(f.to_string(), "x1+2.5*(y2-1)");
/// assert_eq!(f.variables(), ["x1", "y2"]);
/// assert_eq!(f.evaluate(|_| Ok(3.0)), Ok(8.0));
/// ```
#[derive(Debug, Clone)]
pub struct Formula {
    canonical: String,
    tokens: Vec<Token>,
    variables: Vec<String>,
}

impl Formula {
    /// Parse a formula, keeping variable names as written
    pub fn new(text: &str) -> Result<Self, FormulaFormatError> {
        Self::with_rules(text, &DefaultRules)
    }

    /// Parse a formula, normalizing and validating every variable with `rules`
    pub fn with_rules<R: NameRules + ?Sized>(
        text: &str,
        rules: &R,
    ) -> Result<Self, FormulaFormatError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut variables = Vec::new();
        let mut seen = AHashSet::new();
        let mut depth = 0usize;

        for (position, item) in tokenize(text).enumerate() {
            let token = match item? {
                Token::Identifier(raw) => {
                    let name = rules.normalize(&raw);
                    if !is_variable(&name) || !rules.is_valid(&name) {
                        return Err(FormulaFormatError::InvalidVariable(raw));
                    }
                    if seen.insert(name.clone()) {
                        variables.push(name.clone());
                    }
                    Token::Identifier(name)
                }
                other => other,
            };

            match tokens.last() {
                None if !token.starts_operand() => {
                    return Err(FormulaFormatError::InvalidStart(token.to_string()));
                }
                Some(prev) if !prev.ends_operand() && !token.starts_operand() => {
                    return Err(FormulaFormatError::UnexpectedAfterOperator {
                        after: prev.to_string(),
                        found: token.to_string(),
                    });
                }
                Some(prev) if prev.ends_operand() && token.starts_operand() => {
                    return Err(FormulaFormatError::UnexpectedAfterOperand {
                        after: prev.to_string(),
                        found: token.to_string(),
                    });
                }
                _ => {}
            }

            match token {
                Token::LeftParen => depth += 1,
                Token::RightParen => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or(FormulaFormatError::UnbalancedClosing { position })?;
                }
                _ => {}
            }

            tokens.push(token);
        }

        match tokens.last() {
            None => return Err(FormulaFormatError::Empty),
            Some(last) if !last.ends_operand() => {
                return Err(FormulaFormatError::InvalidEnd(last.to_string()));
            }
            _ => {}
        }
        if depth != 0 {
            return Err(FormulaFormatError::UnbalancedOpening { unclosed: depth });
        }

        let canonical = tokens.iter().map(Token::to_string).collect();

        Ok(Self {
            canonical,
            tokens,
            variables,
        })
    }

    /// Normalized variable names, deduplicated, in order of first appearance
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// The canonical token sequence
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Canonical text: normalized tokens with no whitespace
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Evaluate the formula, resolving each variable through `lookup`
    ///
    /// Evaluation never fails with anything but a [`FormulaError`](crate::FormulaError)
    /// value: a failed lookup, a division by zero or a non-finite intermediate result
    /// all come back as `Err`.
    pub fn evaluate<F>(&self, lookup: F) -> FormulaResult<f64>
    where
        F: FnMut(&str) -> Result<f64, LookupError>,
    {
        evaluator::evaluate(&self.tokens, lookup)
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for Formula {
    type Err = FormulaFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::new(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Formula {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Formula {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Formula::new(&text).map_err(serde::de::Error::custom)
    }
}
