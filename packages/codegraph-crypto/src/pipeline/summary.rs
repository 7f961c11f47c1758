//! Pass summary

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Counters for one evaluation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassSummary {
    /// 1-based pass number within the session
    pub pass: usize,

    pub objects: usize,

    /// Observed calls applied to automata
    pub calls_applied: usize,

    /// Bindings appended to tracked objects
    pub bindings_received: usize,

    /// Binding queries first seen in this pass
    pub queries_registered: usize,

    pub facts_published: usize,
    pub negations_applied: usize,

    /// Generation events held back for unresolved bindings or an imprecise guard
    pub deferred_generations: usize,

    /// Constraints still waiting for bindings after the pass
    pub pending_constraints: usize,

    /// Records in the session report after the pass
    pub violations: usize,

    pub elapsed: Duration,
}

impl PassSummary {
    /// Nothing left that a later pass could change
    pub fn is_settled(&self) -> bool {
        self.pending_constraints == 0 && self.deferred_generations == 0
    }
}
