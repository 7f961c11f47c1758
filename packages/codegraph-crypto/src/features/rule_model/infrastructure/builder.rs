/*
 * Rule Builder (fluent API)
 *
 * Programmatic construction of rule models, mirroring the sections of a
 * rule file: OBJECTS, FORBIDDEN, ORDER (as an explicit automaton),
 * CONSTRAINTS, REQUIRES, ENSURES, NEGATES.
 *
 * # Example
 * ```rust,ignore
 * let init = MethodSignature::new("javax.crypto.Cipher.init", &[("int", "encmode"), ("java.security.Key", "key")]);
 * let rule = RuleBuilder::new("javax.crypto.Cipher")
 *     .object("encmode", "int")
 *     .object("key", "java.security.Key")
 *     .initial_state("Start")
 *     .accepting_state("Ready")
 *     .transition("Start", vec![init], "Ready")
 *     .constraint(Constraint::value_in(SpecObject::new("encmode", "int"), &["1", "2"]))
 *     .requires(Predicate::new("generatedKey", vec![PredicateParam::object("key", "java.security.Key")]))
 *     .build();
 * ```
 *
 * `ensures_after` / `negates_after` are resolved against the automaton at
 * `build()` time, so they may be declared before the transitions.
 */

use super::validator::RuleValidator;
use crate::features::rule_model::domain::{
    BuiltinPredicate, Constraint, EnsuredPredicate, ExceptionConstraint, ForbiddenMethod,
    MalformedRuleError, MethodSignature, ObjectDecl, Predicate, PredicateParam, Rule, StateId,
    UsageAutomaton,
};
use std::collections::BTreeSet;

/// Ensured predicate whose state scope is still expressed as methods
struct DeferredScope {
    index: usize,
    methods: Vec<MethodSignature>,
}

/// Rule builder
pub struct RuleBuilder {
    rule: Rule,
    deferred: Vec<DeferredScope>,
}

impl RuleBuilder {
    /// Create builder for the given fully-qualified type
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            rule: Rule {
                class_name: class_name.into(),
                objects: Vec::new(),
                forbidden: Vec::new(),
                automaton: UsageAutomaton::new(),
                constraints: Vec::new(),
                predicates: Vec::new(),
            },
            deferred: Vec::new(),
        }
    }

    /// Declare a specification object
    pub fn object(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.rule.objects.push(ObjectDecl {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    pub fn forbidden(self, method: MethodSignature) -> Self {
        self.forbidden_with_alternatives(method, Vec::new())
    }

    /// Forbidden method with suggested replacements
    pub fn forbidden_with_alternatives(
        mut self,
        method: MethodSignature,
        alternatives: Vec<MethodSignature>,
    ) -> Self {
        match self.rule.forbidden.iter_mut().find(|f| f.method == method) {
            Some(existing) => {
                existing.silent = false;
                existing.alternatives.extend(alternatives);
            }
            None => self.rule.forbidden.push(ForbiddenMethod {
                method,
                alternatives,
                silent: false,
            }),
        }
        self
    }

    pub fn state(mut self, id: impl Into<String>, accepting: bool) -> Self {
        self.rule.automaton.add_state(StateId::new(id), accepting);
        self
    }

    /// Declare a non-accepting initial state
    pub fn initial_state(mut self, id: impl Into<String>) -> Self {
        let id = StateId::new(id);
        if !self.rule.automaton.contains_state(&id) {
            self.rule.automaton.add_state(id.clone(), false);
        }
        self.rule.automaton.add_initial(id);
        self
    }

    pub fn accepting_state(self, id: impl Into<String>) -> Self {
        self.state(id, true)
    }

    pub fn transition(
        mut self,
        from: impl Into<String>,
        label: Vec<MethodSignature>,
        to: impl Into<String>,
    ) -> Self {
        self.rule
            .automaton
            .add_transition(StateId::new(from), label, StateId::new(to));
        self
    }

    /// Add a constraint
    ///
    /// Methods named by `noCallTo` anywhere in the constraint are registered
    /// as silent forbidden methods.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        for predicate in constraint.predicates() {
            if predicate.builtin() != Some(BuiltinPredicate::NoCallTo) {
                continue;
            }
            for param in &predicate.params {
                if let PredicateParam::Method(method) = param {
                    if !self.rule.forbidden.iter().any(|f| &f.method == method) {
                        self.rule.forbidden.push(ForbiddenMethod {
                            method: method.clone(),
                            alternatives: Vec::new(),
                            silent: true,
                        });
                    }
                }
            }
        }
        self.rule.constraints.push(constraint);
        self
    }

    /// Required predicate
    pub fn requires(self, predicate: Predicate) -> Self {
        self.constraint(Constraint::Predicate(predicate))
    }

    /// Disjunctive requirement `p1 || p2 || ...`, stored left-nested
    pub fn requires_any(self, alternatives: Vec<Predicate>) -> Self {
        let mut members = alternatives.into_iter().map(Constraint::Predicate);
        let Some(first) = members.next() else {
            return self;
        };
        let chain = members.fold(first, Constraint::or);
        self.constraint(chain)
    }

    /// Ensured predicate generated in any accepting state
    pub fn ensures(mut self, predicate: Predicate) -> Self {
        self.rule.predicates.push(EnsuredPredicate {
            predicate,
            states: None,
        });
        self
    }

    /// Ensured predicate generated in the given states
    pub fn ensures_in(mut self, predicate: Predicate, states: &[&str]) -> Self {
        self.rule.predicates.push(EnsuredPredicate {
            predicate,
            states: Some(states.iter().map(|s| StateId::new(*s)).collect()),
        });
        self
    }

    /// Ensured predicate generated after the given call(s)
    pub fn ensures_after(mut self, predicate: Predicate, methods: Vec<MethodSignature>) -> Self {
        self.deferred.push(DeferredScope {
            index: self.rule.predicates.len(),
            methods,
        });
        self.rule.predicates.push(EnsuredPredicate {
            predicate,
            states: Some(BTreeSet::new()),
        });
        self
    }

    pub fn negates(self, predicate: Predicate) -> Self {
        self.ensures(predicate.negate())
    }

    pub fn negates_after(self, predicate: Predicate, methods: Vec<MethodSignature>) -> Self {
        self.ensures_after(predicate.negate(), methods)
    }

    /// Declared exception for control-flow instrumentation
    pub fn exception(mut self, method: MethodSignature, exception: impl Into<String>) -> Self {
        self.rule
            .constraints
            .push(Constraint::Exception(ExceptionConstraint {
                method,
                exception: exception.into(),
            }));
        self
    }

    /// Build rule without validation
    pub fn build(mut self) -> Rule {
        for scope in self.deferred.drain(..) {
            let states = self.rule.automaton.states_after(&scope.methods);
            if let Some(ensured) = self.rule.predicates.get_mut(scope.index) {
                ensured.states = Some(states);
            }
        }
        self.rule
    }

    /// Build and validate
    pub fn build_validated(self, validator: &RuleValidator) -> Result<Rule, MalformedRuleError> {
        let rule = self.build();
        validator.validate(&rule)?;
        Ok(rule)
    }
}
