/*
 * Pending Binding Registry
 *
 * Deferred bindings as data: a query is either waiting (with listener
 * continuations) or resolved (with its values). No thread ever blocks on a
 * query; a listener registered after resolution runs immediately.
 *
 * # Example
 * ```ignore
 * let pending = PendingBindings::new();
 * pending.request(query.clone());
 * pending.on_resolved(query.clone(), Box::new(|binding| reevaluate(binding)));
 * pending.resolve(&query, values); // runs the listener
 * ```
 *
 * Listeners run outside the registry lock, so they may call back into it.
 */

use super::query::BindingQuery;
use crate::shared::models::{CallSiteBinding, ExtractedValue};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// Continuation run once the query's values are known
pub type BindingListener = Box<dyn FnOnce(&CallSiteBinding) + Send>;

enum Slot {
    Waiting(Vec<BindingListener>),
    Resolved(Vec<ExtractedValue>),
}

/// Registry of binding queries
#[derive(Default)]
pub struct PendingBindings {
    slots: Mutex<FxHashMap<BindingQuery, Slot>>,
}

impl PendingBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a query; returns `false` if it was already known
    pub fn request(&self, query: BindingQuery) -> bool {
        let mut slots = self.slots.lock();
        if slots.contains_key(&query) {
            return false;
        }
        slots.insert(query, Slot::Waiting(Vec::new()));
        true
    }

    /// Attach a continuation to a query
    ///
    /// Unknown queries are registered as waiting. If the query is already
    /// resolved the listener runs before this call returns.
    pub fn on_resolved(&self, query: BindingQuery, listener: BindingListener) {
        let resolved = {
            let mut slots = self.slots.lock();
            match slots
                .entry(query.clone())
                .or_insert_with(|| Slot::Waiting(Vec::new()))
            {
                Slot::Waiting(listeners) => {
                    listeners.push(listener);
                    return;
                }
                Slot::Resolved(values) => values.clone(),
            }
        };
        listener(&query.into_binding(resolved));
    }

    /// Record the values of a query and run its listeners
    ///
    /// Resolving twice keeps the first answer. Returns the number of
    /// listeners run.
    pub fn resolve(&self, query: &BindingQuery, values: Vec<ExtractedValue>) -> usize {
        let listeners = {
            let mut slots = self.slots.lock();
            match slots.insert(query.clone(), Slot::Resolved(values.clone())) {
                Some(Slot::Waiting(listeners)) => listeners,
                Some(previous @ Slot::Resolved(_)) => {
                    slots.insert(query.clone(), previous);
                    return 0;
                }
                None => Vec::new(),
            }
        };

        let binding = query.clone().into_binding(values);
        let count = listeners.len();
        for listener in listeners {
            listener(&binding);
        }
        count
    }

    pub fn is_pending(&self, query: &BindingQuery) -> bool {
        matches!(self.slots.lock().get(query), Some(Slot::Waiting(_)))
    }

    pub fn values(&self, query: &BindingQuery) -> Option<Vec<ExtractedValue>> {
        match self.slots.lock().get(query) {
            Some(Slot::Resolved(values)) => Some(values.clone()),
            _ => None,
        }
    }

    /// Queries still waiting, in a stable order
    pub fn pending(&self) -> Vec<BindingQuery> {
        let mut waiting: Vec<BindingQuery> = self
            .slots
            .lock()
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Waiting(_)))
            .map(|(q, _)| q.clone())
            .collect();
        waiting.sort();
        waiting
    }

    pub fn pending_count(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Waiting(_)))
            .count()
    }
}

impl std::fmt::Debug for PendingBindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingBindings")
            .field("pending", &self.pending_count())
            .finish()
    }
}
