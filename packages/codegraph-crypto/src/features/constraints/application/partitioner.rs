/*
 * Constraint Partitioner
 *
 * Splits a rule's constraints for one tracked object.
 *
 * # Algorithm
 * For each constraint (exception constraints are skipped):
 * 1. Unbound variables other than keying variables → pending
 * 2. Non-built-in predicate → required (single)
 * 3. OR-chain whose right child is a non-built-in predicate and whose
 *    members are all non-built-in predicates → required (alternative)
 * 4. Everything else → direct
 *
 * The OR-chain walk uses an explicit worklist, so deeply nested chains do
 * not grow the call stack.
 */

use crate::features::constraints::domain::{
    Partition, PartitionPolicy, RequiredPredicate, Requirement,
};
use crate::features::rule_model::domain::{
    AlternativePredicate, Constraint, LogOp, Predicate, Rule,
};
use crate::shared::models::{CallSiteId, ObjectView};
use std::collections::BTreeSet;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct ConstraintPartitioner {
    policy: PartitionPolicy,
}

impl ConstraintPartitioner {
    pub fn new(policy: PartitionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PartitionPolicy {
        &self.policy
    }

    /// Partition all constraints of `rule`
    pub fn partition(&self, rule: &Rule, view: &ObjectView<'_>) -> Partition {
        self.partition_only(rule, 0..rule.constraints.len(), view)
    }

    /// Partition the constraints at `indices` (e.g. previously pending ones)
    pub fn partition_only(
        &self,
        rule: &Rule,
        indices: impl IntoIterator<Item = usize>,
        view: &ObjectView<'_>,
    ) -> Partition {
        let bound = view.bound_names();
        let mut partition = Partition::default();

        for idx in indices {
            let Some(constraint) = rule.constraints.get(idx) else {
                continue;
            };
            if matches!(constraint, Constraint::Exception(_)) {
                continue;
            }
            if !self.is_eligible(constraint, &bound) {
                partition.pending.push(idx);
                continue;
            }

            let requirement = match constraint {
                Constraint::Predicate(p) if !p.is_builtin() => {
                    Some(Requirement::Single(p.clone()))
                }
                Constraint::Logical(l) if is_fact_predicate(&l.right) => {
                    collapse_alternatives(constraint).map(Requirement::Alternative)
                }
                _ => None,
            };

            match requirement {
                Some(requirement) => {
                    let anchor = self.anchor(&requirement, view);
                    partition.required.push(RequiredPredicate {
                        requirement,
                        constraint: idx,
                        anchor,
                    });
                }
                None => partition.direct.push(idx),
            }
        }

        trace!(
            rule = %rule.class_name,
            object = %view.object,
            direct = partition.direct.len(),
            required = partition.required.len(),
            pending = partition.pending.len(),
            "Partitioned constraints"
        );
        partition
    }

    fn is_eligible(&self, constraint: &Constraint, bound: &BTreeSet<String>) -> bool {
        constraint
            .involved_var_names()
            .iter()
            .all(|var| bound.contains(var) || self.policy.is_keying(var))
    }

    /// First call site binding a parameter of any member
    fn anchor(
        &self,
        requirement: &Requirement,
        view: &ObjectView<'_>,
    ) -> Option<CallSiteId> {
        let vars: BTreeSet<String> = requirement
            .members()
            .iter()
            .flat_map(Predicate::involved_var_names)
            .filter(|var| self.policy.may_anchor(var))
            .collect();
        view.first_site_binding(&vars).cloned()
    }
}

fn is_fact_predicate(constraint: &Constraint) -> bool {
    matches!(constraint, Constraint::Predicate(p) if !p.is_builtin())
}

/// Collapse an OR-chain of non-built-in predicates into one alternative
///
/// Returns `None` if the chain contains an AND/implies link or a member
/// that is not a non-built-in predicate.
pub fn collapse_alternatives(constraint: &Constraint) -> Option<AlternativePredicate> {
    let mut alternative: Option<AlternativePredicate> = None;
    let mut worklist = vec![constraint];

    while let Some(node) = worklist.pop() {
        match node {
            Constraint::Logical(l) if l.op == LogOp::Or => {
                // Left first, so members keep source order
                worklist.push(&l.right);
                worklist.push(&l.left);
            }
            Constraint::Predicate(p) if !p.is_builtin() => match alternative.as_mut() {
                Some(alt) => alt.add(p.clone()),
                None => alternative = Some(AlternativePredicate::new(p.clone())),
            },
            _ => return None,
        }
    }
    alternative
}
