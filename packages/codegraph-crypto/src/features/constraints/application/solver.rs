/*
 * Constraint Solver
 *
 * Per-object constraint pass:
 * 1. Partition the rule's constraints (direct / required / pending)
 * 2. Evaluate direct constraints; False → Constraint violation,
 *    Imprecise → ImpreciseValue advisory
 * 3. Resolve required predicates through the fact lookup; unsatisfied →
 *    MissingPredicate anchored at the first binding site
 *
 * Pending constraints are returned to the caller, which re-submits them
 * when new bindings arrive. Every constraint is evaluated even after a
 * failure; violations accumulate.
 */

use super::evaluator::ConstraintEvaluator;
use super::partitioner::ConstraintPartitioner;
use crate::features::constraints::domain::{
    Evaluation, PartitionPolicy, RequiredPredicate, Truth,
};
use crate::features::constraints::ports::FactLookup;
use crate::features::reporting::domain::Violation;
use crate::features::rule_model::domain::Rule;
use crate::features::typestate::ports::SubtypeOracle;
use crate::shared::constants::partition::DEFAULT_MAX_VALUE_COMBINATIONS;
use crate::shared::models::{CallSiteId, ObjectView};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Constraint solving configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintConfig {
    pub policy: PartitionPolicy,

    /// Upper bound on operand value combinations in one comparison
    pub max_value_combinations: usize,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            policy: PartitionPolicy::default(),
            max_value_combinations: DEFAULT_MAX_VALUE_COMBINATIONS,
        }
    }
}

/// Result of one solver pass over one object
#[derive(Debug, Clone, Default)]
pub struct SolverOutcome {
    pub violations: Vec<Violation>,

    /// Constraint indices still waiting for bindings
    pub pending: Vec<usize>,
}

impl SolverOutcome {
    /// Violations that count as misuse
    pub fn hard_failures(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.kind.is_hard_failure())
            .count()
    }
}

pub struct ConstraintSolver {
    config: ConstraintConfig,
    partitioner: ConstraintPartitioner,
    subtypes: Arc<dyn SubtypeOracle>,
}

impl ConstraintSolver {
    pub fn new(config: ConstraintConfig, subtypes: Arc<dyn SubtypeOracle>) -> Self {
        let partitioner = ConstraintPartitioner::new(config.policy.clone());
        Self {
            config,
            partitioner,
            subtypes,
        }
    }

    pub fn config(&self) -> &ConstraintConfig {
        &self.config
    }

    pub fn partitioner(&self) -> &ConstraintPartitioner {
        &self.partitioner
    }

    pub fn evaluator<'a>(
        &'a self,
        view: ObjectView<'a>,
        facts: &'a dyn FactLookup,
    ) -> ConstraintEvaluator<'a> {
        ConstraintEvaluator::new(view, facts, self.subtypes.as_ref())
            .with_max_combinations(self.config.max_value_combinations)
    }

    /// Solve every constraint of `rule`
    pub fn solve(
        &self,
        rule: &Rule,
        view: &ObjectView<'_>,
        facts: &dyn FactLookup,
    ) -> SolverOutcome {
        self.solve_only(rule, 0..rule.constraints.len(), view, facts)
    }

    /// Solve the constraints at `indices`
    pub fn solve_only(
        &self,
        rule: &Rule,
        indices: impl IntoIterator<Item = usize>,
        view: &ObjectView<'_>,
        facts: &dyn FactLookup,
    ) -> SolverOutcome {
        let partition = self.partitioner.partition_only(rule, indices, view);
        let mut outcome = SolverOutcome {
            violations: Vec::new(),
            pending: partition.pending,
        };
        self.evaluate(rule, &partition.direct, view, facts, &mut outcome.violations);
        self.resolve_required(rule, &partition.required, view, facts, &mut outcome.violations);
        outcome
    }

    /// Evaluate direct constraints, returning the number of violated ones
    pub fn evaluate(
        &self,
        rule: &Rule,
        direct: &[usize],
        view: &ObjectView<'_>,
        facts: &dyn FactLookup,
        out: &mut Vec<Violation>,
    ) -> usize {
        let evaluator = self.evaluator(*view, facts);
        let mut violated = 0;

        for &idx in direct {
            let Some(constraint) = rule.constraints.get(idx) else {
                continue;
            };
            let eval = evaluator.evaluate(constraint);
            let subject = constraint.to_string();
            match eval.truth {
                Truth::True => {}
                Truth::False => {
                    violated += 1;
                    debug!(
                        rule = %rule.class_name,
                        object = %view.object,
                        %subject,
                        "Constraint violated"
                    );
                    out.push(Violation::constraint(
                        &rule.class_name,
                        view.object.clone(),
                        &subject,
                        sites_or_last(eval, view),
                    ));
                }
                Truth::Imprecise => {
                    out.push(Violation::imprecise(
                        &rule.class_name,
                        view.object.clone(),
                        &subject,
                        sites_or_last(eval, view),
                    ));
                }
            }
        }
        violated
    }

    /// Resolve required predicates, returning the number left unsatisfied
    pub fn resolve_required(
        &self,
        rule: &Rule,
        required: &[RequiredPredicate],
        view: &ObjectView<'_>,
        facts: &dyn FactLookup,
        out: &mut Vec<Violation>,
    ) -> usize {
        let evaluator = self.evaluator(*view, facts);
        let mut missing = 0;

        for req in required {
            let truths: Vec<Truth> = req
                .requirement
                .members()
                .iter()
                .map(|p| evaluator.predicate(p).truth)
                .collect();
            let subject = req.requirement.to_string();

            if truths.iter().any(|t| t.is_true()) {
                continue;
            }
            if truths.iter().any(|t| *t == Truth::Imprecise) {
                out.push(Violation::imprecise(
                    &rule.class_name,
                    view.object.clone(),
                    &subject,
                    req.anchor.iter().cloned().collect(),
                ));
                continue;
            }

            missing += 1;
            debug!(
                rule = %rule.class_name,
                object = %view.object,
                predicate = %subject,
                "Required predicate missing"
            );
            out.push(Violation::missing_predicate(
                &rule.class_name,
                view.object.clone(),
                &subject,
                req.anchor.clone(),
            ));
        }
        missing
    }
}

fn sites_or_last(eval: Evaluation, view: &ObjectView<'_>) -> Vec<CallSiteId> {
    if eval.sites.is_empty() {
        view.last_call_site().into_iter().cloned().collect()
    } else {
        eval.sites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reporting::domain::ViolationKind;
    use crate::features::rule_model::domain::{
        ArithmeticConstraint, CompOp, Constraint, MethodSignature, Operand, Predicate,
        PredicateParam, SpecObject,
    };
    use crate::features::rule_model::infrastructure::RuleBuilder;
    use crate::features::typestate::ports::ExactTypesOnly;
    use crate::shared::models::{CallSiteBinding, ConstValue, ExtractedValue, ObjectId, ValueId};
    use std::collections::BTreeSet;

    /// Facts holding by predicate name, regardless of values
    struct NamedFacts(BTreeSet<&'static str>);

    impl FactLookup for NamedFacts {
        fn lookup(&self, predicate: &Predicate, _view: &ObjectView<'_>) -> Evaluation {
            let holds = self.0.contains(predicate.name.as_str());
            Evaluation::new(Truth::from_bool(holds != predicate.negated))
        }
    }

    fn key(name: &str) -> Predicate {
        Predicate::new(name, vec![PredicateParam::object("key", "java.security.Key")])
    }

    fn rule() -> Rule {
        let init = MethodSignature::new(
            "javax.crypto.KeyGenerator.init",
            &[("int", "keySize")],
        );
        RuleBuilder::new("javax.crypto.KeyGenerator")
            .object("keySize", "int")
            .object("key", "java.security.Key")
            .initial_state("Start")
            .accepting_state("Done")
            .transition("Start", vec![init], "Done")
            .constraint(Constraint::compare(
                ArithmeticConstraint::operand(Operand::Var(SpecObject::new("keySize", "int"))),
                CompOp::Ge,
                ArithmeticConstraint::operand(Operand::Literal(ConstValue::Int(128))),
            ))
            .requires_any(vec![key("generatedKey"), key("wrappedKey")])
            .build()
    }

    fn solver() -> ConstraintSolver {
        ConstraintSolver::new(ConstraintConfig::default(), Arc::new(ExactTypesOnly))
    }

    #[test]
    fn test_violations_accumulate() {
        let rule = rule();
        let object = ObjectId::new("kg");
        let this = ValueId::new("kg@1");
        let bindings = vec![
            CallSiteBinding::new("init@4", "keySize", 0, vec![ExtractedValue::int(64)]),
            CallSiteBinding::new("use@6", "key", 0, vec![ExtractedValue::object("k@2")]),
        ];
        let view = ObjectView::new(&object, &this, &bindings, &[]);

        let outcome = solver().solve(&rule, &view, &NamedFacts(BTreeSet::new()));
        let kinds: Vec<ViolationKind> = outcome.violations.iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec![ViolationKind::Constraint, ViolationKind::MissingPredicate]);
        assert_eq!(outcome.violations[0].sites, vec![CallSiteId::new("init@4")]);
        assert_eq!(outcome.violations[1].sites, vec![CallSiteId::new("use@6")]);
        assert_eq!(outcome.hard_failures(), 2);
    }

    #[test]
    fn test_any_alternative_satisfies() {
        let rule = rule();
        let object = ObjectId::new("kg");
        let this = ValueId::new("kg@1");
        let bindings = vec![
            CallSiteBinding::new("init@4", "keySize", 0, vec![ExtractedValue::int(256)]),
            CallSiteBinding::new("use@6", "key", 0, vec![ExtractedValue::object("k@2")]),
        ];
        let view = ObjectView::new(&object, &this, &bindings, &[]);

        let outcome = solver().solve(&rule, &view, &NamedFacts(BTreeSet::from(["wrappedKey"])));
        assert!(outcome.violations.is_empty());
    }

    #[test]
    fn test_unbound_requirement_stays_pending() {
        let rule = rule();
        let object = ObjectId::new("kg");
        let this = ValueId::new("kg@1");
        let bindings = vec![CallSiteBinding::new(
            "init@4",
            "keySize",
            0,
            vec![ExtractedValue::int(256)],
        )];
        let view = ObjectView::new(&object, &this, &bindings, &[]);

        let outcome = solver().solve(&rule, &view, &NamedFacts(BTreeSet::new()));
        assert!(outcome.violations.is_empty());
        assert_eq!(outcome.pending, vec![1]);
    }

    #[test]
    fn test_imprecise_is_advisory() {
        let rule = rule();
        let object = ObjectId::new("kg");
        let this = ValueId::new("kg@1");
        let bindings = vec![CallSiteBinding::new(
            "init@4",
            "keySize",
            0,
            vec![ExtractedValue::unresolvable()],
        )];
        let view = ObjectView::new(&object, &this, &bindings, &[]);

        let outcome = solver().solve(&rule, &view, &NamedFacts(BTreeSet::new()));
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].kind, ViolationKind::ImpreciseValue);
        assert_eq!(outcome.hard_failures(), 0);
    }
}
