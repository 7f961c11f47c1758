//! Tracked Object
//!
//! One runtime instance under a rule. Owns its state set, its observed
//! calls, its append-only binding set and its pending constraints, so
//! objects can be advanced and evaluated independently of each other.

use crate::features::rule_model::domain::{Rule, StateId};
use crate::features::typestate::domain::GenerationEvent;
use crate::shared::models::{CallSiteBinding, CallSiteId, ObjectId, ObjectView, ObservedCall, ValueId};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TrackedObject {
    pub id: ObjectId,

    /// Value identity of the object itself (`this` in predicates)
    pub value: ValueId,

    pub rule: Arc<Rule>,

    pub(crate) states: BTreeSet<StateId>,

    /// Calls already applied to the automaton
    pub(crate) calls: Vec<ObservedCall>,

    /// Calls observed but not yet applied
    pub(crate) queued: Vec<ObservedCall>,

    pub(crate) bindings: Vec<CallSiteBinding>,

    /// Constraint indices waiting for bindings
    pub(crate) pending_constraints: BTreeSet<usize>,

    /// Generation events not yet published
    pub(crate) generated: Vec<GenerationEvent>,
}

impl TrackedObject {
    pub fn new(id: ObjectId, value: ValueId, rule: Arc<Rule>, states: BTreeSet<StateId>) -> Self {
        Self {
            id,
            value,
            rule,
            states,
            calls: Vec::new(),
            queued: Vec::new(),
            bindings: Vec::new(),
            pending_constraints: BTreeSet::new(),
            generated: Vec::new(),
        }
    }

    pub fn view(&self) -> ObjectView<'_> {
        ObjectView::new(&self.id, &self.value, &self.bindings, &self.calls)
    }

    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.states
    }

    pub fn calls(&self) -> &[ObservedCall] {
        &self.calls
    }

    pub fn bindings(&self) -> &[CallSiteBinding] {
        &self.bindings
    }

    pub fn pending_constraints(&self) -> &BTreeSet<usize> {
        &self.pending_constraints
    }

    /// Some current state is accepting
    pub fn is_accepting(&self) -> bool {
        self.states
            .iter()
            .any(|s| self.rule.automaton.is_accepting(s))
    }

    pub fn last_site(&self) -> Option<&CallSiteId> {
        self.calls.last().map(|c| &c.site)
    }

    /// Append a binding; an identical `(site, variable, slot)` is kept once
    pub fn add_binding(&mut self, binding: CallSiteBinding) -> bool {
        let duplicate = self.bindings.iter().any(|b| {
            b.site == binding.site && b.var_name == binding.var_name && b.slot == binding.slot
        });
        if duplicate {
            return false;
        }
        self.bindings.push(binding);
        true
    }
}
