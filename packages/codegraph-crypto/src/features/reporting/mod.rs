/*
 * Violation Reporting
 *
 * Taxonomy:
 * - Ordering: call not allowed by the usage automaton
 * - ForbiddenCall: call to a forbidden method
 * - Constraint: argument values fail a constraint
 * - MissingPredicate: required predicate never established
 * - ImpreciseValue: advisory, values could not be determined
 * - IncompleteOperation: object ended outside an accepting state
 * - MalformedRule: rule rejected at load time
 *
 * Formatting and output channels are left to the embedding tool; the
 * report serializes with serde.
 */

pub mod domain;

pub use domain::{Violation, ViolationKind, ViolationReport};
