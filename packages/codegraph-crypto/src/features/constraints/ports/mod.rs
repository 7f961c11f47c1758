//! Constraint ports
//!
//! Non-built-in predicates are not decided by the constraint feature; they
//! are looked up in whatever fact store the session wires in.

use super::domain::{Evaluation, Truth};
use crate::features::rule_model::domain::Predicate;
use crate::shared::models::ObjectView;

/// Lookup of published predicate facts
pub trait FactLookup: Send + Sync {
    /// Does `predicate` hold for the values the object has bound?
    ///
    /// Negated predicates hold when no matching positive fact is visible.
    /// Returns Imprecise when the object has no usable value identity for
    /// a parameter.
    fn lookup(&self, predicate: &Predicate, view: &ObjectView<'_>) -> Evaluation;
}

/// Fact lookup with an empty store
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFacts;

impl FactLookup for NoFacts {
    fn lookup(&self, predicate: &Predicate, _view: &ObjectView<'_>) -> Evaluation {
        Evaluation::new(Truth::from_bool(predicate.negated))
    }
}
