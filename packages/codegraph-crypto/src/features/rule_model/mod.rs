/*
 * Rule Model
 *
 * Declarative usage rules for one type each:
 * - OBJECTS: specification variables and their types
 * - FORBIDDEN: methods never to be called (with suggested replacements)
 * - ORDER: usage automaton over method events
 * - CONSTRAINTS / REQUIRES: value constraints and required predicates
 * - ENSURES / NEGATES: predicates provided to (or withdrawn from) others
 *
 * Architecture:
 * - Domain: Rule, UsageAutomaton, Constraint, Predicate
 * - Application: rule loading into a RuleSet
 * - Infrastructure: RuleBuilder, RuleValidator, JSON rule source
 * - Ports: RuleSource
 *
 * Rules are immutable once loaded and shared as `Arc<Rule>`.
 */

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{load_rules, RuleSet};
pub use domain::{
    AlternativePredicate, ArithOp, ArithmeticConstraint, BuiltinPredicate, CompOp, Constraint,
    EnsuredPredicate, ForbiddenMethod, LogOp, MalformedRuleError, MethodSignature, ObjectDecl,
    Operand, Predicate, PredicateParam, Rule, SpecObject, StateId, UsageAutomaton,
};
pub use infrastructure::{JsonRuleSource, RuleBuilder, RuleValidator};
pub use ports::RuleSource;
