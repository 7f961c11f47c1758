/*
 * Rule Validator
 *
 * Load-time structural checks. A rule failing any check is rejected on its
 * own; other rules are unaffected.
 *
 * # Checks
 * - at least one initial state; every referenced state declared
 * - every state reachable from an initial state
 * - built-in predicates used with their expected parameter shapes
 * - method/type arguments only on built-in predicates
 * - every referenced variable declared (`this` and `_` excepted)
 * - overlapping labels on outgoing transitions of one state
 *   (logged, or rejected in strict mode)
 *
 * # Time Complexity
 * O(states + transitions × label size + constraint tree size)
 */

use crate::features::rule_model::domain::{
    BuiltinPredicate, MalformedRuleError, MethodSignature, Predicate, PredicateParam, Rule,
    StateId,
};
use crate::shared::constants::rule_names::{NO_NAME, THIS};
use std::collections::BTreeSet;
use tracing::warn;

/// Rule validator
#[derive(Debug, Clone, Default)]
pub struct RuleValidator {
    /// Reject (instead of logging) overlapping transition labels
    pub strict_labels: bool,
}

impl RuleValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict_labels: bool) -> Self {
        self.strict_labels = strict_labels;
        self
    }

    /// Validate a rule, returning the first problem found
    pub fn validate(&self, rule: &Rule) -> Result<(), MalformedRuleError> {
        self.check_states(rule)?;
        self.check_labels(rule)?;
        self.check_variables(rule)?;
        for constraint in &rule.constraints {
            for predicate in constraint.predicates() {
                check_predicate_shape(rule, predicate)?;
            }
        }
        for ensured in &rule.predicates {
            check_predicate_shape(rule, &ensured.predicate)?;
        }
        Ok(())
    }

    fn check_states(&self, rule: &Rule) -> Result<(), MalformedRuleError> {
        let automaton = &rule.automaton;
        if automaton.initial.is_empty() {
            return Err(MalformedRuleError::NoInitialState {
                rule: rule.class_name.clone(),
            });
        }

        let referenced = automaton
            .initial
            .iter()
            .chain(automaton.transitions.iter().flat_map(|t| [&t.from, &t.to]))
            .chain(
                rule.predicates
                    .iter()
                    .filter_map(|p| p.states.as_ref())
                    .flatten(),
            );
        for state in referenced {
            if !automaton.contains_state(state) {
                return Err(MalformedRuleError::UnknownState {
                    rule: rule.class_name.clone(),
                    state: state.to_string(),
                });
            }
        }

        let unreachable = automaton.unreachable_states();
        if !unreachable.is_empty() {
            return Err(MalformedRuleError::UnreachableStates {
                rule: rule.class_name.clone(),
                states: unreachable.iter().map(StateId::to_string).collect(),
            });
        }
        Ok(())
    }

    fn check_labels(&self, rule: &Rule) -> Result<(), MalformedRuleError> {
        for state in &rule.automaton.states {
            let mut seen: Vec<(&MethodSignature, &StateId)> = Vec::new();
            for transition in rule.automaton.outgoing(&state.id) {
                for method in &transition.label {
                    let overlaps = seen
                        .iter()
                        .any(|(m, to)| *m == method && *to != &transition.to);
                    if overlaps {
                        if self.strict_labels {
                            return Err(MalformedRuleError::OverlappingLabels {
                                rule: rule.class_name.clone(),
                                state: state.id.to_string(),
                                method: method.short_name().to_string(),
                            });
                        }
                        warn!(
                            "Rule '{}': state '{}' has overlapping labels for '{}'",
                            rule.class_name,
                            state.id,
                            method.short_name()
                        );
                    }
                    seen.push((method, &transition.to));
                }
            }
        }
        Ok(())
    }

    fn check_variables(&self, rule: &Rule) -> Result<(), MalformedRuleError> {
        let mut referenced: BTreeSet<String> = BTreeSet::new();
        for method in rule.automaton.alphabet() {
            referenced.extend(method.bound_params().map(|(_, name)| name.to_string()));
            if method.ret.is_bound() {
                referenced.insert(method.ret.name.clone());
            }
        }
        for constraint in &rule.constraints {
            referenced.extend(constraint.involved_var_names());
        }
        for ensured in &rule.predicates {
            referenced.extend(ensured.predicate.involved_var_names());
            if let Some(guard) = &ensured.predicate.guard {
                referenced.extend(guard.involved_var_names());
            }
        }

        match referenced
            .into_iter()
            .find(|name| name != THIS && name != NO_NAME && !rule.declares(name))
        {
            Some(variable) => Err(MalformedRuleError::UnknownVariable {
                rule: rule.class_name.clone(),
                variable,
            }),
            None => Ok(()),
        }
    }
}

fn check_predicate_shape(rule: &Rule, predicate: &Predicate) -> Result<(), MalformedRuleError> {
    let methods = predicate
        .params
        .iter()
        .filter(|p| matches!(p, PredicateParam::Method(_)))
        .count();
    let types = predicate
        .params
        .iter()
        .filter(|p| matches!(p, PredicateParam::TypeName(_)))
        .count();
    let objects = predicate.params.len() - methods - types;

    let Some(builtin) = predicate.builtin() else {
        if methods + types > 0 {
            return Err(MalformedRuleError::UnknownBuiltin {
                rule: rule.class_name.clone(),
                predicate: predicate.name.clone(),
            });
        }
        return Ok(());
    };

    let (ok, expected) = match builtin {
        BuiltinPredicate::CallTo | BuiltinPredicate::NoCallTo => {
            (methods >= 1 && objects == 0 && types == 0, "one or more methods")
        }
        BuiltinPredicate::NeverTypeOf | BuiltinPredicate::InstanceOf => (
            predicate.params.len() == 2
                && predicate.params[0].as_object().is_some()
                && matches!(predicate.params[1], PredicateParam::TypeName(_)),
            "an object and a type name",
        ),
        BuiltinPredicate::Length | BuiltinPredicate::NotHardCoded => (
            predicate.params.len() == 1 && predicate.params[0].as_object().is_some(),
            "exactly one object",
        ),
    };

    if ok {
        Ok(())
    } else {
        Err(MalformedRuleError::BuiltinArity {
            rule: rule.class_name.clone(),
            predicate: predicate.name.clone(),
            expected: expected.to_string(),
            found: format!(
                "{} object(s), {} method(s), {} type(s)",
                objects, methods, types
            ),
        })
    }
}
