/*
 * Predicates Module
 *
 * Cross-object predicate resolution. Objects that reach a generating
 * state publish facts keyed by value identity; objects with requirements
 * look them up through the constraint solver's `FactLookup` port.
 *
 * # Ordering
 * Within one evaluation pass, positive facts are published first and
 * negations are applied afterwards (`apply_negations`), so a negation
 * always overrides a positive fact from the same pass. Across passes the
 * latest event for a binding wins; a negation only hides the bindings it
 * covers (`_` in a negation covers every value at that position).
 */

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::FactResolver;
pub use domain::{FactEvent, FactOrigin, PredicateFact, ValueKey};
pub use infrastructure::PredicateFactStore;
