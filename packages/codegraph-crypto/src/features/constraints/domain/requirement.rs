//! Required Predicates
//!
//! What the partitioner hands to predicate resolution: a single predicate
//! or a collapsed disjunction, anchored at the call site that bound its
//! parameters.

use crate::features::rule_model::domain::{AlternativePredicate, Predicate};
use crate::shared::models::CallSiteId;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Single(Predicate),
    Alternative(AlternativePredicate),
}

impl Requirement {
    pub fn members(&self) -> &[Predicate] {
        match self {
            Self::Single(p) => std::slice::from_ref(p),
            Self::Alternative(a) => a.members(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(p) => write!(f, "{}", p),
            Self::Alternative(a) => write!(f, "{}", a),
        }
    }
}

/// Requirement plus the call site a missing-predicate report points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredPredicate {
    pub requirement: Requirement,

    /// Index of the originating constraint in the rule
    pub constraint: usize,

    pub anchor: Option<CallSiteId>,
}

impl RequiredPredicate {
    pub fn is_alternative(&self) -> bool {
        matches!(self.requirement, Requirement::Alternative(_))
    }
}
