/*
 * Typestate Engine
 *
 * Interprets a rule's usage automaton for one tracked object, one observed
 * call at a time. The object's state is a set of automaton states.
 *
 * # Algorithm (per call)
 * 1. Forbidden-method check (independent of position)
 * 2. For every current state, match the call against every outgoing
 *    transition; per state, exact matches discard fuzzy ones
 * 3. Union the to-states of all fired transitions
 * 4. No transition fired:
 *    - call in the rule's event alphabet → ordering violation, states kept
 *    - otherwise the call is ignored
 * 5. Fired transitions emit binding queries for every named parameter and
 *    the return binding of the matched label entry, and predicate-generation
 *    events for ensured predicates scoped to the reached states
 *
 * # Time Complexity
 * O(|states| × |transitions| × |label|) per call
 *
 * # Example
 * ```rust,ignore
 * let engine = TypestateEngine::new(Arc::new(ClassHierarchy::new()));
 * let mut states = engine.initial_states(&rule);
 * for call in calls {
 *     let outcome = engine.advance(&rule, &object, &states, &call);
 *     states = outcome.states;
 * }
 * ```
 */

use super::matcher::MethodMatcher;
use crate::features::extraction::domain::BindingQuery;
use crate::features::reporting::domain::Violation;
use crate::features::rule_model::domain::{MethodSignature, Rule, StateId};
use crate::features::typestate::domain::{
    AdvanceOutcome, FiredTransition, GenerationEvent, MatchKind,
};
use crate::features::typestate::ports::SubtypeOracle;
use crate::shared::models::{BindingSlot, CallSiteId, ObjectId, ObservedCall};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Typestate engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypestateConfig {
    /// Match calls on subtypes of the specified type
    pub fuzzy_matching: bool,

    /// Report objects whose life ends outside an accepting state
    pub report_incomplete: bool,

    /// Reject rules with overlapping transition labels instead of logging
    pub strict_labels: bool,
}

impl Default for TypestateConfig {
    fn default() -> Self {
        Self {
            fuzzy_matching: true,
            report_incomplete: true,
            strict_labels: false,
        }
    }
}

/// Typestate engine
#[derive(Clone)]
pub struct TypestateEngine {
    oracle: Arc<dyn SubtypeOracle>,
    config: TypestateConfig,
}

impl TypestateEngine {
    pub fn new(oracle: Arc<dyn SubtypeOracle>) -> Self {
        Self {
            oracle,
            config: TypestateConfig::default(),
        }
    }

    /// Set configuration
    pub fn with_config(mut self, config: TypestateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &TypestateConfig {
        &self.config
    }

    fn matcher(&self) -> MethodMatcher<'_> {
        MethodMatcher::new(self.oracle.as_ref(), self.config.fuzzy_matching)
    }

    pub fn initial_states(&self, rule: &Rule) -> BTreeSet<StateId> {
        rule.automaton.initial_states()
    }

    /// Advance a tracked object by one observed call
    pub fn advance(
        &self,
        rule: &Rule,
        object: &ObjectId,
        current: &BTreeSet<StateId>,
        call: &ObservedCall,
    ) -> AdvanceOutcome {
        let matcher = self.matcher();
        let mut outcome = AdvanceOutcome::unchanged(current);

        if let Some(forbidden) = rule
            .reported_forbidden()
            .find(|f| matcher.match_method(&f.method, &call.method).is_some())
        {
            debug!("Forbidden call {} on {}", call.method, object);
            outcome.violations.push(Violation::forbidden(
                rule.class_name.clone(),
                object.clone(),
                call.site.clone(),
                &forbidden.method.to_string(),
                forbidden.alternatives.iter().map(|m| m.to_string()).collect(),
            ));
        }

        let mut fired: Vec<FiredTransition> = Vec::new();
        for state in current {
            let mut exact = Vec::new();
            let mut fuzzy = Vec::new();
            for transition in rule.automaton.outgoing(state) {
                if let Some((entry, kind)) = matcher.best_match(&transition.label, &call.method) {
                    let t = FiredTransition {
                        from: transition.from.clone(),
                        to: transition.to.clone(),
                        method: entry.clone(),
                        kind,
                    };
                    match kind {
                        MatchKind::Exact => exact.push(t),
                        MatchKind::Fuzzy => fuzzy.push(t),
                    }
                }
            }
            if exact.is_empty() {
                for t in &fuzzy {
                    debug!("Fuzzy match: {} as {} from '{}'", call.method, t.method.name, t.from);
                }
                fired.extend(fuzzy);
            } else {
                fired.extend(exact);
            }
        }

        if fired.is_empty() {
            if matcher.in_alphabet(&rule.automaton, &call.method) {
                let expected = expected_method_names(rule, current);
                debug!(
                    "Error transition on {} at {}: {} not allowed from {:?}",
                    object, call.site, call.method, current
                );
                outcome.violations.push(Violation::ordering(
                    rule.class_name.clone(),
                    object.clone(),
                    call.site.clone(),
                    &call.method.to_string(),
                    expected,
                ));
            } else {
                trace!("Ignoring {} on {} (not in alphabet)", call.method, object);
            }
            return outcome;
        }

        outcome.states = fired.iter().map(|t| t.to.clone()).collect();
        outcome.queries = binding_queries(object, &call.site, &fired);
        outcome.generated = generation_events(rule, &call.site, &outcome.states);
        outcome.fired = fired;
        outcome
    }

    /// End-of-life check
    ///
    /// `None` when some state is accepting or incomplete operations are not
    /// reported.
    pub fn check_completion(
        &self,
        rule: &Rule,
        object: &ObjectId,
        states: &BTreeSet<StateId>,
        last_site: Option<&CallSiteId>,
    ) -> Option<Violation> {
        if !self.config.report_incomplete
            || states.iter().any(|s| rule.automaton.is_accepting(s))
        {
            return None;
        }
        Some(Violation::incomplete(
            rule.class_name.clone(),
            object.clone(),
            last_site.cloned(),
            expected_method_names(rule, states),
        ))
    }
}

/// Short names of the methods that can fire from `states`
fn expected_method_names(rule: &Rule, states: &BTreeSet<StateId>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for method in rule.automaton.expected_methods(states) {
        let name = method.short_name().to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn binding_queries(
    object: &ObjectId,
    site: &CallSiteId,
    fired: &[FiredTransition],
) -> Vec<BindingQuery> {
    let mut queries: Vec<BindingQuery> = Vec::new();
    let mut push = |var: &str, slot: BindingSlot| {
        let q = BindingQuery::new(object.clone(), site.clone(), var, slot);
        if !queries.contains(&q) {
            queries.push(q);
        }
    };
    for t in fired {
        let entry: &MethodSignature = &t.method;
        for (index, var) in entry.bound_params() {
            push(var, BindingSlot::Param(index));
        }
        if entry.ret.is_bound() {
            push(&entry.ret.name, BindingSlot::Return);
        }
    }
    queries
}

fn generation_events(
    rule: &Rule,
    site: &CallSiteId,
    reached: &BTreeSet<StateId>,
) -> Vec<GenerationEvent> {
    let mut events = Vec::new();
    for (index, ensured) in rule.predicates.iter().enumerate() {
        for state in reached {
            if ensured.generated_in(state, rule.automaton.is_accepting(state)) {
                events.push(GenerationEvent {
                    predicate: index,
                    state: state.clone(),
                    site: site.clone(),
                });
                break;
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reporting::domain::ViolationKind;
    use crate::features::rule_model::domain::{Predicate, PredicateParam};
    use crate::features::rule_model::infrastructure::RuleBuilder;
    use crate::features::typestate::infrastructure::ClassHierarchy;
    use crate::shared::models::CalledMethod;

    const KG: &str = "javax.crypto.KeyGenerator";

    fn sig(name: &str, params: &[(&str, &str)]) -> MethodSignature {
        MethodSignature::new(format!("{}.{}", KG, name), params)
    }

    /// getInstance → init → generateKey
    fn key_generator() -> Rule {
        RuleBuilder::new(KG)
            .object("alg", "java.lang.String")
            .object("keySize", "int")
            .object("key", "javax.crypto.SecretKey")
            .initial_state("Start")
            .state("Got", false)
            .state("Ready", false)
            .accepting_state("Done")
            .transition(
                "Start",
                vec![sig("getInstance", &[("java.lang.String", "alg")])],
                "Got",
            )
            .transition("Got", vec![sig("init", &[("int", "keySize")])], "Ready")
            .transition(
                "Ready",
                vec![sig("generateKey", &[]).returning("key", "javax.crypto.SecretKey")],
                "Done",
            )
            .forbidden_with_alternatives(
                sig("init", &[("java.security.SecureRandom", "_")]),
                vec![sig("init", &[("int", "keySize")])],
            )
            .ensures_in(
                Predicate::new(
                    "generatedKey",
                    vec![PredicateParam::object("key", "javax.crypto.SecretKey")],
                ),
                &["Done"],
            )
            .build()
    }

    fn engine() -> TypestateEngine {
        TypestateEngine::new(Arc::new(
            ClassHierarchy::new().with("com.acme.FastKeyGenerator", KG),
        ))
    }

    fn call(site: &str, class: &str, name: &str, types: &[&str]) -> ObservedCall {
        ObservedCall::new(
            site,
            CalledMethod::qualified(&format!("{}.{}", class, name), types),
            class,
        )
    }

    fn run(
        engine: &TypestateEngine,
        rule: &Rule,
        calls: &[ObservedCall],
    ) -> (BTreeSet<StateId>, Vec<Violation>) {
        let object = ObjectId::new("kg");
        let mut states = engine.initial_states(rule);
        let mut violations = Vec::new();
        for c in calls {
            let outcome = engine.advance(rule, &object, &states, c);
            states = outcome.states;
            violations.extend(outcome.violations);
        }
        (states, violations)
    }

    #[test]
    fn test_happy_path_reaches_accepting_state() {
        let rule = key_generator();
        let engine = engine();
        let (states, violations) = run(
            &engine,
            &rule,
            &[
                call("s1", KG, "getInstance", &["java.lang.String"]),
                call("s2", KG, "init", &["int"]),
                call("s3", KG, "generateKey", &[]),
            ],
        );
        assert!(violations.is_empty());
        assert_eq!(states, BTreeSet::from([StateId::new("Done")]));
        assert!(engine
            .check_completion(&rule, &ObjectId::new("kg"), &states, None)
            .is_none());
    }

    #[test]
    fn test_error_transition_keeps_states() {
        let rule = key_generator();
        let engine = engine();
        let (states, violations) = run(
            &engine,
            &rule,
            &[
                call("s1", KG, "getInstance", &["java.lang.String"]),
                call("s2", KG, "generateKey", &[]),
            ],
        );
        assert_eq!(states, BTreeSet::from([StateId::new("Got")]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Ordering);
        assert_eq!(violations[0].expected, vec!["init".to_string()]);
    }

    #[test]
    fn test_call_outside_alphabet_ignored() {
        let rule = key_generator();
        let (states, violations) = run(
            &engine(),
            &rule,
            &[
                call("s1", KG, "getInstance", &["java.lang.String"]),
                call("s2", KG, "getAlgorithm", &[]),
            ],
        );
        assert!(violations.is_empty());
        assert_eq!(states, BTreeSet::from([StateId::new("Got")]));
    }

    #[test]
    fn test_forbidden_call_reported_with_alternative() {
        let rule = key_generator();
        let (_, violations) = run(
            &engine(),
            &rule,
            &[
                call("s1", KG, "getInstance", &["java.lang.String"]),
                call("s2", KG, "init", &["java.security.SecureRandom"]),
            ],
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ForbiddenCall);
        assert_eq!(violations[0].expected.len(), 1);
    }

    #[test]
    fn test_fuzzy_match_fires() {
        let rule = key_generator();
        let engine = engine();
        let outcome = engine.advance(
            &rule,
            &ObjectId::new("kg"),
            &engine.initial_states(&rule),
            &call("s1", "com.acme.FastKeyGenerator", "getInstance", &["java.lang.String"]),
        );
        assert_eq!(outcome.match_kind(), Some(MatchKind::Fuzzy));
        assert_eq!(outcome.states, BTreeSet::from([StateId::new("Got")]));
    }

    #[test]
    fn test_queries_and_generation_events() {
        let rule = key_generator();
        let engine = engine();
        let object = ObjectId::new("kg");
        let states = BTreeSet::from([StateId::new("Ready")]);
        let outcome =
            engine.advance(&rule, &object, &states, &call("s3", KG, "generateKey", &[]));

        assert_eq!(outcome.queries.len(), 1);
        assert_eq!(outcome.queries[0].slot, BindingSlot::Return);
        assert_eq!(outcome.queries[0].var_name, "key");
        assert_eq!(outcome.generated.len(), 1);
        assert_eq!(outcome.generated[0].state, StateId::new("Done"));
    }

    #[test]
    fn test_incomplete_operation() {
        let rule = key_generator();
        let engine = engine();
        let states = BTreeSet::from([StateId::new("Ready")]);
        let site = CallSiteId::new("s2");
        let v = engine
            .check_completion(&rule, &ObjectId::new("kg"), &states, Some(&site))
            .unwrap();
        assert_eq!(v.kind, ViolationKind::IncompleteOperation);
        assert_eq!(v.expected, vec!["generateKey".to_string()]);

        let quiet = TypestateEngine::new(Arc::new(ClassHierarchy::new())).with_config(
            TypestateConfig {
                report_incomplete: false,
                ..TypestateConfig::default()
            },
        );
        assert!(quiet
            .check_completion(&rule, &ObjectId::new("kg"), &states, Some(&site))
            .is_none());
    }
}
