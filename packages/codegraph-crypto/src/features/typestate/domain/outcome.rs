/*
 * Advance Outcome
 *
 * Everything one observed call produces on one tracked object: the new
 * state set, the transitions that fired, the binding queries and
 * predicate-generation events they emit, and any violations.
 */

use crate::features::extraction::domain::BindingQuery;
use crate::features::reporting::domain::Violation;
use crate::features::rule_model::domain::{MethodSignature, StateId};
use crate::shared::models::CallSiteId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a call matched a label entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchKind {
    /// Same declaring class, name and parameter types
    Exact,

    /// Same name and parameter types, declaring class a subtype
    Fuzzy,
}

/// Transition fired by a call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredTransition {
    pub from: StateId,
    pub to: StateId,

    /// Label entry the call matched
    pub method: MethodSignature,

    pub kind: MatchKind,
}

/// Ensured predicate eligible for publication
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationEvent {
    /// Index into the rule's predicate list
    pub predicate: usize,

    /// State the predicate is generated in
    pub state: StateId,

    /// Call that led into the state
    pub site: CallSiteId,
}

/// Result of advancing a tracked object by one call
#[derive(Debug, Clone, Default)]
pub struct AdvanceOutcome {
    /// State set after the call
    pub states: BTreeSet<StateId>,

    pub fired: Vec<FiredTransition>,
    pub queries: Vec<BindingQuery>,
    pub generated: Vec<GenerationEvent>,
    pub violations: Vec<Violation>,
}

impl AdvanceOutcome {
    /// Outcome that leaves the state set unchanged
    pub fn unchanged(states: &BTreeSet<StateId>) -> Self {
        Self {
            states: states.clone(),
            ..Self::default()
        }
    }

    /// Strongest match among fired transitions
    pub fn match_kind(&self) -> Option<MatchKind> {
        self.fired.iter().map(|t| t.kind).min()
    }

    /// The call moved the object
    pub fn progressed(&self) -> bool {
        !self.fired.is_empty()
    }
}
