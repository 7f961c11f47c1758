//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure business logic (no external dependencies)
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - External dependency implementations
//!
//! Dependency direction (leaf first):
//! rule_model → typestate → constraints → predicates, with extraction and
//! reporting used by all of them.

pub mod rule_model;

pub mod extraction;
pub mod reporting;

// Usage automaton interpretation
pub mod typestate;

// Direct constraints and required predicates
pub mod constraints;

// Cross-object predicate facts
pub mod predicates;
