//! Predicate fact models

mod fact;

pub use fact::{args_match, negation_covers, FactEvent, FactOrigin, PredicateFact, ValueKey};
