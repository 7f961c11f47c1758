/*
 * Rule Model Domain
 *
 * Data-only representation of a usage rule: objects, forbidden methods,
 * usage automaton, constraints and predicates.
 */

mod automaton;
mod constraint;
mod error;
mod method;
mod predicate;
mod rule;

pub use automaton::{StateId, StateNode, Transition, UsageAutomaton};
pub use constraint::{
    ArithOp, ArithmeticConstraint, CompOp, ComparisonConstraint, Constraint,
    ExceptionConstraint, LogOp, LogicalConstraint, Operand, SpecObject, Splitter,
    ValueConstraint,
};
pub use error::MalformedRuleError;
pub use method::{MethodParam, MethodSignature};
pub use predicate::{
    AlternativePredicate, BuiltinPredicate, EnsuredPredicate, Predicate, PredicateParam,
};
pub use rule::{ForbiddenMethod, ObjectDecl, Rule};
