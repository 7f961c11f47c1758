/*
 * Analysis Session
 *
 * Owns the loaded rules, the tracked objects and the shared fact store,
 * and evaluates them in passes.
 *
 * # Pass phases
 * 1. Typestate: apply queued calls per object (parallel), register the
 *    binding queries of fired transitions with listener continuations
 * 2. Generation: publish positive facts of reached generating states,
 *    collect negations (parallel, concurrent store)
 * 3. Barrier: apply the collected negations
 * 4. Constraints: partition and solve every object against the store
 *
 * Bindings that arrive between passes (late oracle answers) land in an
 * inbox drained at the start of the next pass. Passes are idempotent:
 * calls and generation events are consumed once, constraint findings are
 * re-derived from scratch each pass.
 *
 * # Example
 * ```rust,ignore
 * let mut session = AnalysisSession::new(EngineConfig::default(), rules, Arc::new(hierarchy))?;
 * session.track(ObjectId::new("c1"), ValueId::new("c1"), "javax.crypto.Cipher")?;
 * session.observe(&ObjectId::new("c1"), call)?;
 * session.run_pass();
 * session.resolve_with(oracle).await;
 * let report = session.finish();
 * ```
 */

use super::summary::PassSummary;
use super::tracked_object::TrackedObject;
use super::worker_pool::WorkerPool;
use crate::config::EngineConfig;
use crate::errors::{CryptoAnalysisError, Result};
use crate::features::constraints::{ConstraintSolver, Truth};
use crate::features::extraction::{BindingQuery, PendingBindings, ProgramAnalysisOracle};
use crate::features::predicates::{FactResolver, PredicateFact, PredicateFactStore};
use crate::features::reporting::{Violation, ViolationReport};
use crate::features::rule_model::{RuleSet, RuleValidator};
use crate::features::typestate::{SubtypeOracle, TypestateEngine};
use crate::shared::models::{CallSiteBinding, ExtractedValue, ObjectId, ObservedCall, ValueId};
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// Bindings delivered by listeners, waiting for the next drain
type BindingInbox = Arc<Mutex<Vec<(ObjectId, CallSiteBinding)>>>;

/// Variables with unanswered queries, per object
type WaitingVars = FxHashMap<ObjectId, FxHashSet<String>>;

/// Typestate phase result for one object
#[derive(Default)]
struct Advanced {
    calls: usize,
    queries: Vec<BindingQuery>,
    violations: Vec<Violation>,
}

/// Generation phase result for one object
#[derive(Default)]
struct Generated {
    published: usize,
    deferred: usize,
    negations: Vec<PredicateFact>,
}

pub struct AnalysisSession {
    id: Uuid,
    config: EngineConfig,
    rules: RuleSet,
    typestate: TypestateEngine,
    solver: ConstraintSolver,
    resolver: FactResolver,
    pending: Arc<PendingBindings>,
    inbox: BindingInbox,
    objects: Vec<TrackedObject>,
    index: FxHashMap<ObjectId, usize>,

    /// Malformed-rule, ordering and forbidden-call records
    permanent: ViolationReport,

    /// Constraint and predicate findings of the latest pass
    findings: ViolationReport,

    pool: WorkerPool,
    passes: usize,
}

impl AnalysisSession {
    /// Create a session over loaded rules
    ///
    /// Rules rejected at load time are recorded as `MalformedRule`.
    pub fn new(
        config: EngineConfig,
        mut rules: RuleSet,
        subtypes: Arc<dyn SubtypeOracle>,
    ) -> Result<Self> {
        config.validate()?;
        if config.typestate.strict_labels {
            rules.revalidate(&RuleValidator::new().strict(true));
        }
        let pool = WorkerPool::new(&config.parallel)?;

        let typestate =
            TypestateEngine::new(Arc::clone(&subtypes)).with_config(config.typestate.clone());
        let solver = ConstraintSolver::new(config.constraints.clone(), subtypes);
        let resolver = FactResolver::new(Arc::new(PredicateFactStore::new()))
            .with_max_combinations(config.constraints.max_value_combinations);

        let mut permanent = ViolationReport::new();
        permanent.extend(rules.rejected.iter().map(Violation::malformed));

        let id = Uuid::new_v4();
        info!(
            session = %id,
            preset = %config.get_preset(),
            rules = rules.len(),
            rejected = rules.rejected.len(),
            threads = pool.threads(),
            "Analysis session created"
        );

        Ok(Self {
            id,
            config,
            rules,
            typestate,
            solver,
            resolver,
            pending: Arc::new(PendingBindings::new()),
            inbox: Arc::new(Mutex::new(Vec::new())),
            objects: Vec::new(),
            index: FxHashMap::default(),
            permanent,
            findings: ViolationReport::new(),
            pool,
            passes: 0,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn store(&self) -> &Arc<PredicateFactStore> {
        self.resolver.store()
    }

    pub fn objects(&self) -> &[TrackedObject] {
        &self.objects
    }

    pub fn object(&self, id: &ObjectId) -> Option<&TrackedObject> {
        self.index.get(id).map(|&idx| &self.objects[idx])
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Start tracking an object under the rule for `class_name`
    pub fn track(&mut self, id: ObjectId, value: ValueId, class_name: &str) -> Result<()> {
        let rule = self
            .rules
            .get(class_name)
            .cloned()
            .ok_or_else(|| CryptoAnalysisError::UnknownRule(class_name.to_string()))?;
        if self.index.contains_key(&id) {
            return Err(CryptoAnalysisError::DuplicateObject(id));
        }

        let states = self.typestate.initial_states(&rule);
        trace!(object = %id, rule = %rule.class_name, "Tracking object");
        self.index.insert(id.clone(), self.objects.len());
        self.objects.push(TrackedObject::new(id, value, rule, states));
        Ok(())
    }

    /// Queue an observed call; applied by the next pass
    pub fn observe(&mut self, object: &ObjectId, call: ObservedCall) -> Result<()> {
        self.object_mut(object)?.queued.push(call);
        Ok(())
    }

    /// Append a binding directly, bypassing the query registry
    pub fn add_binding(&mut self, object: &ObjectId, binding: CallSiteBinding) -> Result<bool> {
        Ok(self.object_mut(object)?.add_binding(binding))
    }

    /// Answer a binding query; picked up by the next pass
    ///
    /// A query may be answered before any pass has asked it.
    pub fn supply_binding(&self, query: &BindingQuery, values: Vec<ExtractedValue>) -> usize {
        self.pending.resolve(query, values)
    }

    /// Queries asked by fired transitions and not yet answered
    pub fn pending_queries(&self) -> Vec<BindingQuery> {
        self.pending.pending()
    }

    /// Answer every pending query through an async oracle
    ///
    /// Queries run concurrently on the current tokio runtime. A failed
    /// query resolves to a single unresolvable value. Returns the number
    /// of queries answered.
    pub async fn resolve_with(&self, oracle: Arc<dyn ProgramAnalysisOracle>) -> usize {
        let mut tasks = JoinSet::new();
        for query in self.pending.pending() {
            let oracle = Arc::clone(&oracle);
            tasks.spawn(async move {
                let answer = oracle.resolve_binding(&query).await;
                (query, answer)
            });
        }

        let mut answered = 0;
        while let Some(joined) = tasks.join_next().await {
            let (query, answer) = match joined {
                Ok(done) => done,
                Err(e) => {
                    warn!("Oracle task aborted: {}", e);
                    continue;
                }
            };
            let values = answer.unwrap_or_else(|e| {
                warn!(query = %query, "Oracle could not resolve binding: {}", e);
                vec![ExtractedValue::unresolvable()]
            });
            self.pending.resolve(&query, values);
            answered += 1;
        }
        debug!(session = %self.id, answered, "Oracle round complete");
        answered
    }

    /// Run one evaluation pass
    pub fn run_pass(&mut self) -> PassSummary {
        let started = Instant::now();
        self.passes += 1;
        let mut summary = PassSummary {
            pass: self.passes,
            objects: self.objects.len(),
            ..PassSummary::default()
        };

        summary.bindings_received += self.drain_inbox();

        let typestate = &self.typestate;
        let advanced = self
            .pool
            .map(&mut self.objects, |obj| advance_queued(typestate, obj));
        let mut queries = Vec::new();
        for step in advanced {
            summary.calls_applied += step.calls;
            self.permanent.extend(step.violations);
            queries.extend(step.queries);
        }
        summary.queries_registered = self.register(queries);
        summary.bindings_received += self.drain_inbox();

        let waiting = self.waiting_vars();
        let solver = &self.solver;
        let resolver = &self.resolver;
        let generated = self
            .pool
            .map(&mut self.objects, |obj| publish_generated(solver, resolver, &waiting, obj));
        let mut negations = Vec::new();
        for step in generated {
            summary.facts_published += step.published;
            summary.deferred_generations += step.deferred;
            negations.extend(step.negations);
        }
        summary.negations_applied = resolver.store().apply_negations(negations);

        let solved = self.pool.map(&mut self.objects, |obj| {
            let outcome = solver.solve(&obj.rule, &obj.view(), resolver);
            obj.pending_constraints = outcome.pending.iter().copied().collect();
            outcome.violations
        });
        let mut findings = ViolationReport::new();
        for violations in solved {
            findings.extend(violations);
        }
        self.findings = findings;

        summary.pending_constraints = self
            .objects
            .iter()
            .map(|o| o.pending_constraints.len())
            .sum();
        summary.violations = self.report().len();
        summary.elapsed = started.elapsed();

        info!(
            session = %self.id,
            pass = summary.pass,
            objects = summary.objects,
            calls = summary.calls_applied,
            bindings = summary.bindings_received,
            facts = summary.facts_published,
            negations = summary.negations_applied,
            pending = summary.pending_constraints,
            violations = summary.violations,
            "Pass complete in {:?}",
            summary.elapsed
        );
        summary
    }

    /// Every record so far
    pub fn report(&self) -> ViolationReport {
        let mut report = self.permanent.clone();
        report.merge(self.findings.clone());
        report
    }

    /// Final pass plus end-of-life checks
    ///
    /// Objects outside an accepting state are reported as incomplete (when
    /// enabled). Constraints still waiting on an unanswered query become
    /// imprecise advisories.
    pub fn finish(mut self) -> ViolationReport {
        self.run_pass();
        let mut report = self.report();
        let waiting = self.waiting_vars();

        for obj in &self.objects {
            if let Some(v) = self.typestate.check_completion(
                &obj.rule,
                &obj.id,
                &obj.states,
                obj.last_site(),
            ) {
                report.record(v);
            }

            let Some(vars) = waiting.get(&obj.id) else {
                continue;
            };
            for &idx in &obj.pending_constraints {
                let Some(constraint) = obj.rule.constraints.get(idx) else {
                    continue;
                };
                if constraint.involved_var_names().iter().any(|v| vars.contains(v)) {
                    report.record(Violation::imprecise(
                        &obj.rule.class_name,
                        obj.id.clone(),
                        &constraint.to_string(),
                        obj.last_site().into_iter().cloned().collect(),
                    ));
                }
            }
        }

        info!(
            session = %self.id,
            passes = self.passes,
            violations = report.len(),
            hard_failures = report.hard_failure_count(),
            unanswered = self.pending.pending_count(),
            "Analysis session finished"
        );
        report
    }

    fn object_mut(&mut self, id: &ObjectId) -> Result<&mut TrackedObject> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| CryptoAnalysisError::UnknownObject(id.clone()))?;
        Ok(&mut self.objects[idx])
    }

    /// Register queries with a listener feeding the inbox
    ///
    /// Already answered queries deliver immediately. Returns the number of
    /// queries not seen before.
    fn register(&self, queries: Vec<BindingQuery>) -> usize {
        let mut new = 0;
        for query in queries {
            if self.pending.request(query.clone()) {
                new += 1;
            }
            let inbox = Arc::clone(&self.inbox);
            let object = query.object.clone();
            self.pending.on_resolved(
                query,
                Box::new(move |binding| inbox.lock().push((object, binding.clone()))),
            );
        }
        new
    }

    /// Move delivered bindings onto their objects
    fn drain_inbox(&mut self) -> usize {
        let arrived = std::mem::take(&mut *self.inbox.lock());
        let mut per_object: BTreeMap<usize, usize> = BTreeMap::new();

        for (object, binding) in arrived {
            let Some(&idx) = self.index.get(&object) else {
                warn!(object = %object, "Dropping binding for untracked object");
                continue;
            };
            if self.objects[idx].add_binding(binding) {
                *per_object.entry(idx).or_default() += 1;
            }
        }

        for (&idx, &bindings) in &per_object {
            let obj = &self.objects[idx];
            debug!(
                object = %obj.id,
                bindings,
                pending = obj.pending_constraints.len(),
                "Bindings arrived"
            );
        }
        per_object.values().sum()
    }

    fn waiting_vars(&self) -> WaitingVars {
        let mut waiting = WaitingVars::default();
        for query in self.pending.pending() {
            waiting
                .entry(query.object)
                .or_default()
                .insert(query.var_name);
        }
        waiting
    }
}

impl std::fmt::Debug for AnalysisSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisSession")
            .field("id", &self.id)
            .field("rules", &self.rules.len())
            .field("objects", &self.objects.len())
            .field("passes", &self.passes)
            .finish()
    }
}

/// Apply an object's queued calls in observation order
fn advance_queued(engine: &TypestateEngine, obj: &mut TrackedObject) -> Advanced {
    let mut step = Advanced::default();
    for call in std::mem::take(&mut obj.queued) {
        let outcome = engine.advance(&obj.rule, &obj.id, &obj.states, &call);
        step.violations.extend(outcome.violations);
        step.queries.extend(outcome.queries);
        obj.generated.extend(outcome.generated);
        obj.states = outcome.states;
        obj.calls.push(call);
        step.calls += 1;
    }
    step
}

/// Publish an object's generation events
///
/// An event waits while a variable of its predicate (or guard) has an
/// unanswered query, or while its guard is imprecise. A false guard drops
/// the event.
fn publish_generated(
    solver: &ConstraintSolver,
    resolver: &FactResolver,
    waiting: &WaitingVars,
    obj: &mut TrackedObject,
) -> Generated {
    let mut step = Generated::default();
    let rule = Arc::clone(&obj.rule);
    let events = std::mem::take(&mut obj.generated);
    let mut kept = Vec::new();

    for event in events {
        let Some(ensured) = rule.predicates.get(event.predicate) else {
            continue;
        };
        let predicate = &ensured.predicate;

        let mut vars = predicate.involved_var_names();
        if let Some(guard) = &predicate.guard {
            vars.extend(guard.involved_var_names());
        }
        if waiting
            .get(&obj.id)
            .is_some_and(|w| vars.iter().any(|v| w.contains(v)))
        {
            kept.push(event);
            continue;
        }

        let view = obj.view();
        let guard = match &predicate.guard {
            Some(guard) => solver.evaluator(view, resolver).evaluate(guard).truth,
            None => Truth::True,
        };
        match guard {
            Truth::True => {}
            Truth::False => {
                trace!(object = %obj.id, predicate = %predicate, "Guard false, not generated");
                continue;
            }
            Truth::Imprecise => {
                kept.push(event);
                continue;
            }
        }

        let facts = resolver.generated_facts(&rule, &event, &view);
        if predicate.negated {
            step.negations.extend(facts);
        } else {
            for fact in facts {
                resolver.store().publish(fact);
                step.published += 1;
            }
        }
    }

    step.deferred = kept.len();
    obj.generated = kept;
    step
}
