//! Predicate Fact Store: value-keyed, append-only, concurrent

use crate::features::predicates::domain::{
    args_match, negation_covers, FactEvent, PredicateFact, ValueKey,
};
use dashmap::DashMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Facts of one predicate name
///
/// Positive and negated events are indexed apart, each argument list
/// keeping the sequence number of its latest event of that polarity.
#[derive(Debug, Default)]
struct NameIndex {
    positives: FxHashMap<Vec<ValueKey>, u64>,
    negations: FxHashMap<Vec<ValueKey>, u64>,

    /// Some positive argument list contains `Any`
    wildcard_positives: bool,

    /// Some negation contains `Any`
    wildcard_negations: bool,
}

impl NameIndex {
    fn record(&mut self, args: &[ValueKey], seq: u64, positive: bool) {
        let wildcard = args.iter().any(ValueKey::is_any);
        let map = if positive {
            self.wildcard_positives |= wildcard;
            &mut self.positives
        } else {
            self.wildcard_negations |= wildcard;
            &mut self.negations
        };
        let slot = map.entry(args.to_vec()).or_insert(seq);
        *slot = (*slot).max(seq);
    }

    /// Is the stored positive binding `args` (published at `seq`) still
    /// visible, i.e. not covered by a later negation?
    fn binding_visible(&self, args: &[ValueKey], seq: u64) -> bool {
        if self.negations.get(args).is_some_and(|&neg| neg > seq) {
            return false;
        }
        if !self.wildcard_negations {
            return true;
        }
        !self
            .negations
            .iter()
            .any(|(negation, &neg)| neg > seq && negation_covers(negation, args))
    }

    /// Some visible binding unifies with `query`
    fn holds(&self, query: &[ValueKey]) -> bool {
        if !self.wildcard_positives && !query.iter().any(ValueKey::is_any) {
            return self
                .positives
                .get(query)
                .is_some_and(|&seq| self.binding_visible(query, seq));
        }
        self.positives
            .iter()
            .any(|(args, &seq)| args_match(args, query) && self.binding_visible(args, seq))
    }
}

/// Predicate Fact Store
///
/// Append-only event log plus an index keyed by predicate name and argument
/// identities. Visibility is decided per stored binding: a positive binding
/// is visible unless a negation covering it was published later. A query
/// holds when some visible binding unifies with it, so a negation never
/// hides a binding it does not cover, and a positive fact published after a
/// negation shows again.
///
/// Publishing is safe from many threads; queries never block publishers of
/// other predicate names.
#[derive(Debug, Default)]
pub struct PredicateFactStore {
    /// Event log (append-only)
    log: RwLock<Vec<FactEvent>>,

    /// name → polarity → argument list → latest event
    index: DashMap<String, NameIndex>,

    /// Publish order
    next_seq: AtomicU64,
}

impl PredicateFactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish one fact (positive or negated), returning its sequence number
    pub fn publish(&self, fact: PredicateFact) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        self.index
            .entry(fact.name.clone())
            .or_default()
            .record(&fact.args, seq, !fact.negated);

        trace!(seq, %fact, "Published fact");
        self.log.write().push(FactEvent { seq, fact });
        seq
    }

    /// Publish a batch of negations after all positive facts of a pass
    pub fn apply_negations(&self, negations: Vec<PredicateFact>) -> usize {
        let mut applied = 0;
        for mut fact in negations {
            fact.negated = true;
            self.publish(fact);
            applied += 1;
        }
        applied
    }

    /// Is `name[args]` visible?
    pub fn query(&self, name: &str, args: &[ValueKey]) -> bool {
        self.index
            .get(name)
            .is_some_and(|entry| entry.holds(args))
    }

    /// Event log snapshot in publish order
    pub fn events(&self) -> Vec<FactEvent> {
        let mut events = self.log.read().clone();
        events.sort_by_key(|e| e.seq);
        events
    }

    /// Currently visible facts of `name`
    pub fn visible(&self, name: &str) -> Vec<Vec<ValueKey>> {
        let Some(entry) = self.index.get(name) else {
            return Vec::new();
        };
        let mut args: Vec<Vec<ValueKey>> = entry
            .positives
            .iter()
            .filter(|(args, seq)| entry.binding_visible(args, **seq))
            .map(|(args, _)| args.clone())
            .collect();
        args.sort();
        args
    }

    /// Number of published events
    pub fn len(&self) -> usize {
        self.log.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
