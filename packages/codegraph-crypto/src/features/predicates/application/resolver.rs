/*
 * Fact Resolver
 *
 * Bridges tracked objects and the value-keyed fact store:
 * - keys ensured predicates by the values the publishing object bound
 * - answers required-predicate lookups for the constraint solver
 *
 * # Keying
 * - `this` → the object's own value identity
 * - `_` → `Any`
 * - variable → every resolvable value bound to it (after its splitter)
 *
 * A required predicate holds if any combination of its keys is visible.
 * When publishing, a parameter without resolvable values is keyed `Any`,
 * so an undeterminable value never manufactures a missing predicate. A
 * negation with such a parameter is dropped instead: only an explicit `_`
 * retracts every value at a position.
 */

use crate::features::constraints::domain::{Evaluation, Truth};
use crate::features::constraints::ports::FactLookup;
use crate::features::predicates::domain::{FactOrigin, PredicateFact, ValueKey};
use crate::features::predicates::infrastructure::PredicateFactStore;
use crate::features::rule_model::domain::{Predicate, PredicateParam, Rule};
use crate::features::typestate::domain::GenerationEvent;
use crate::shared::constants::partition::DEFAULT_MAX_VALUE_COMBINATIONS;
use crate::shared::models::ObjectView;
use std::sync::Arc;
use tracing::{debug, trace};

pub struct FactResolver {
    store: Arc<PredicateFactStore>,
    max_combinations: usize,
}

impl FactResolver {
    pub fn new(store: Arc<PredicateFactStore>) -> Self {
        Self {
            store,
            max_combinations: DEFAULT_MAX_VALUE_COMBINATIONS,
        }
    }

    pub fn with_max_combinations(mut self, max: usize) -> Self {
        self.max_combinations = max.max(1);
        self
    }

    pub fn store(&self) -> &Arc<PredicateFactStore> {
        &self.store
    }

    /// Facts an ensured predicate produces for one generation event
    ///
    /// Empty if the event does not refer to an ensured predicate of `rule`.
    pub fn generated_facts(
        &self,
        rule: &Rule,
        event: &GenerationEvent,
        view: &ObjectView<'_>,
    ) -> Vec<PredicateFact> {
        let Some(ensured) = rule.predicates.get(event.predicate) else {
            return Vec::new();
        };
        let predicate = &ensured.predicate;

        if predicate.negated {
            return self.negated_facts(predicate, rule, event, view);
        }

        let mut columns: Vec<Vec<ValueKey>> = predicate
            .params
            .iter()
            .map(|param| match param_keys(param, view) {
                Some(keys) if !keys.is_empty() => keys,
                _ => vec![ValueKey::Any],
            })
            .collect();
        if product_len(&columns) > self.max_combinations {
            for column in columns.iter_mut().filter(|c| c.len() > 1) {
                *column = vec![ValueKey::Any];
            }
        }

        facts(predicate, rule, event, view, &columns)
    }

    /// Retractions of a negating event
    ///
    /// Only explicit wildcards may retract every value at a position. When
    /// a bound variable has no resolvable value, or the bindings exceed the
    /// combination cap, the retraction is skipped rather than widened.
    fn negated_facts(
        &self,
        predicate: &Predicate,
        rule: &Rule,
        event: &GenerationEvent,
        view: &ObjectView<'_>,
    ) -> Vec<PredicateFact> {
        let columns: Option<Vec<Vec<ValueKey>>> = predicate
            .params
            .iter()
            .map(|param| param_keys(param, view).filter(|keys| !keys.is_empty()))
            .collect();
        match columns {
            Some(columns) if product_len(&columns) <= self.max_combinations => {
                facts(predicate, rule, event, view, &columns)
            }
            _ => {
                debug!(
                    object = %view.object,
                    predicate = %predicate,
                    "Negation not applied: bindings unresolved or over the combination cap"
                );
                Vec::new()
            }
        }
    }

    /// Argument lists to query for `predicate`; `None` if undeterminable
    fn query_args(
        &self,
        predicate: &Predicate,
        view: &ObjectView<'_>,
    ) -> Option<Vec<Vec<ValueKey>>> {
        let columns = predicate
            .params
            .iter()
            .map(|param| param_keys(param, view).filter(|keys| !keys.is_empty()))
            .collect::<Option<Vec<_>>>()?;
        if product_len(&columns) > self.max_combinations {
            return None;
        }
        Some(cartesian(&columns))
    }
}

impl FactLookup for FactResolver {
    fn lookup(&self, predicate: &Predicate, view: &ObjectView<'_>) -> Evaluation {
        let Some(queries) = self.query_args(predicate, view) else {
            return Evaluation::new(Truth::Imprecise);
        };
        let visible = queries
            .iter()
            .any(|args| self.store.query(&predicate.name, args));
        trace!(
            object = %view.object,
            predicate = %predicate,
            visible,
            "Fact lookup"
        );
        Evaluation::new(Truth::from_bool(visible != predicate.negated))
    }
}

/// One fact per combination of argument keys
fn facts(
    predicate: &Predicate,
    rule: &Rule,
    event: &GenerationEvent,
    view: &ObjectView<'_>,
    columns: &[Vec<ValueKey>],
) -> Vec<PredicateFact> {
    let origin = FactOrigin {
        rule: rule.class_name.clone(),
        object: view.object.clone(),
        state: event.state.clone(),
        site: event.site.clone(),
    };
    cartesian(columns)
        .into_iter()
        .map(|args| PredicateFact {
            name: predicate.name.clone(),
            args,
            negated: predicate.negated,
            origin: origin.clone(),
        })
        .collect()
}

fn param_keys(param: &PredicateParam, view: &ObjectView<'_>) -> Option<Vec<ValueKey>> {
    match param {
        PredicateParam::This => Some(vec![ValueKey::Value(view.this_value.clone())]),
        PredicateParam::Wildcard | PredicateParam::Method(_) | PredicateParam::TypeName(_) => {
            Some(vec![ValueKey::Any])
        }
        PredicateParam::Object(var) => {
            let mut keys: Vec<ValueKey> = view
                .values_of(&var.name)
                .into_iter()
                .filter_map(|(_, value)| ValueKey::of(value, var))
                .collect();
            keys.sort();
            keys.dedup();
            Some(keys)
        }
    }
}

fn product_len(columns: &[Vec<ValueKey>]) -> usize {
    columns
        .iter()
        .fold(1usize, |acc, c| acc.saturating_mul(c.len()))
}

fn cartesian(columns: &[Vec<ValueKey>]) -> Vec<Vec<ValueKey>> {
    columns.iter().fold(vec![Vec::new()], |acc, column| {
        acc.iter()
            .flat_map(|prefix| {
                column.iter().map(move |key| {
                    let mut args = prefix.clone();
                    args.push(key.clone());
                    args
                })
            })
            .collect()
    })
}
