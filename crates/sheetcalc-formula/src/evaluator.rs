//! Formula evaluator
//!
//! Evaluates a canonical token sequence left to right with a value stack and
//! an operator stack. `*` and `/` are applied as soon as their right operand is
//! known; `+` and `-` wait until the next additive operator, a `)` or the end
//! of input. Every failure is returned as a [`FormulaError`] value.

use crate::error::{FormulaError, FormulaResult, LookupError};
use crate::tokenizer::{Operator, Token};

/// Evaluate a grammar-valid token sequence
///
/// Token sequences that did not come from a [`Formula`](crate::Formula) may
/// leave the machine in a shape no valid formula can reach; those evaluate to
/// an internal [`FormulaError`].
pub fn evaluate<F>(tokens: &[Token], mut lookup: F) -> FormulaResult<f64>
where
    F: FnMut(&str) -> Result<f64, LookupError>,
{
    let mut machine = Machine::default();

    for token in tokens {
        match token {
            Token::Number(n) => machine.push_operand(*n)?,
            Token::Identifier(name) => {
                let value = lookup(name)?;
                if !value.is_finite() {
                    return Err(LookupError::NotNumeric(name.clone()).into());
                }
                machine.push_operand(value)?;
            }
            Token::Operator(op) => machine.push_operator(*op)?,
            Token::LeftParen => machine.pending.push(Pending::Paren),
            Token::RightParen => machine.close_paren()?,
        }
    }

    machine.finish()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pending {
    Operator(Operator),
    Paren,
}

#[derive(Debug, Default)]
struct Machine {
    values: Vec<f64>,
    pending: Vec<Pending>,
}

impl Machine {
    fn push_operand(&mut self, value: f64) -> FormulaResult<()> {
        if let Some(op) = self.pending_operator(Operator::is_multiplicative) {
            self.pending.pop();
            let lhs = self.pop_value()?;
            self.values.push(apply(op, lhs, value)?);
        } else {
            self.values.push(value);
        }
        Ok(())
    }

    fn push_operator(&mut self, op: Operator) -> FormulaResult<()> {
        if op.is_additive() {
            self.reduce(Operator::is_additive)?;
        }
        self.pending.push(Pending::Operator(op));
        Ok(())
    }

    fn close_paren(&mut self) -> FormulaResult<()> {
        self.reduce(Operator::is_additive)?;
        match self.pending.pop() {
            Some(Pending::Paren) => {}
            other => {
                return Err(self.invariant_violation(format!(
                    "expected '(' on the operator stack, found {:?}",
                    other
                )))
            }
        }
        self.reduce(Operator::is_multiplicative)
    }

    /// Apply the top pending operator to the top two values if it matches `class`
    fn reduce(&mut self, class: fn(Operator) -> bool) -> FormulaResult<()> {
        if let Some(op) = self.pending_operator(class) {
            self.pending.pop();
            let rhs = self.pop_value()?;
            let lhs = self.pop_value()?;
            self.values.push(apply(op, lhs, rhs)?);
        }
        Ok(())
    }

    fn pending_operator(&self, class: fn(Operator) -> bool) -> Option<Operator> {
        match self.pending.last() {
            Some(Pending::Operator(op)) if class(*op) => Some(*op),
            _ => None,
        }
    }

    fn pop_value(&mut self) -> FormulaResult<f64> {
        match self.values.pop() {
            Some(value) => Ok(value),
            None => Err(self.invariant_violation("value stack is empty")),
        }
    }

    /// Exactly two terminal shapes are reachable for a valid formula
    fn finish(self) -> FormulaResult<f64> {
        match (self.pending.as_slice(), self.values.as_slice()) {
            ([], [value]) => Ok(*value),
            ([Pending::Operator(op)], [lhs, rhs]) if op.is_additive() => apply(*op, *lhs, *rhs),
            _ => Err(self.invariant_violation("unexpected terminal state")),
        }
    }

    fn invariant_violation<S: Into<String>>(&self, reason: S) -> FormulaError {
        let reason = reason.into();
        tracing::error!(
            values = ?self.values,
            pending = ?self.pending,
            "formula evaluator invariant violated: {}",
            reason
        );
        FormulaError::internal(reason)
    }
}

fn apply(op: Operator, lhs: f64, rhs: f64) -> FormulaResult<f64> {
    let result = match op {
        Operator::Add => lhs + rhs,
        Operator::Subtract => lhs - rhs,
        Operator::Multiply => lhs * rhs,
        Operator::Divide => {
            if rhs == 0.0 {
                return Err(FormulaError::divide_by_zero());
            }
            lhs / rhs
        }
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(FormulaError::overflow(op.symbol()))
    }
}
