//! Session evaluation benchmarks
//!
//! - pass: one evaluation pass over N key generator / cipher pairs
//! - workers: the same workload on one thread vs the rayon pool

use codegraph_crypto::config::ParallelConfig;
use codegraph_crypto::features::extraction::BindingQuery;
use codegraph_crypto::features::rule_model::{
    Constraint, MethodSignature, Predicate, PredicateParam, Rule, RuleBuilder, RuleSet,
    RuleValidator, SpecObject,
};
use codegraph_crypto::shared::models::{
    BindingSlot, CallSiteId, CalledMethod, ExtractedValue, ObjectId, ObservedCall, ValueId,
};
use codegraph_crypto::{AnalysisSession, ClassHierarchy, EngineConfig};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

const KEY_GENERATOR: &str = "javax.crypto.KeyGenerator";
const CIPHER: &str = "javax.crypto.Cipher";

fn generated_key(var: &str) -> Predicate {
    Predicate::new(
        "generatedKey",
        vec![PredicateParam::object(var, "javax.crypto.SecretKey")],
    )
}

fn key_generator_rule() -> Rule {
    RuleBuilder::new(KEY_GENERATOR)
        .object("alg", "java.lang.String")
        .object("key", "javax.crypto.SecretKey")
        .initial_state("Start")
        .state("Created", false)
        .accepting_state("Generated")
        .transition(
            "Start",
            vec![MethodSignature::new(
                "javax.crypto.KeyGenerator.getInstance",
                &[("java.lang.String", "alg")],
            )],
            "Created",
        )
        .transition(
            "Created",
            vec![MethodSignature::new("javax.crypto.KeyGenerator.generateKey", &[])
                .returning("key", "javax.crypto.SecretKey")],
            "Generated",
        )
        .constraint(Constraint::value_in(
            SpecObject::new("alg", "java.lang.String"),
            &["AES"],
        ))
        .ensures(generated_key("key"))
        .build()
}

fn cipher_rule() -> Rule {
    RuleBuilder::new(CIPHER)
        .object("transformation", "java.lang.String")
        .object("key", "javax.crypto.SecretKey")
        .initial_state("Start")
        .state("Created", false)
        .accepting_state("Initialized")
        .transition(
            "Start",
            vec![MethodSignature::new(
                "javax.crypto.Cipher.getInstance",
                &[("java.lang.String", "transformation")],
            )],
            "Created",
        )
        .transition(
            "Created",
            vec![MethodSignature::new(
                "javax.crypto.Cipher.init",
                &[("java.security.Key", "key")],
            )],
            "Initialized",
        )
        .constraint(Constraint::value_in(
            SpecObject::new("transformation", "java.lang.String").alg(),
            &["AES"],
        ))
        .requires(generated_key("key"))
        .build()
}

fn rules() -> RuleSet {
    let validator = RuleValidator::new();
    let mut rules = RuleSet::new();
    for rule in [key_generator_rule(), cipher_rule()] {
        rules.insert(rule, &validator).expect("well formed");
    }
    rules
}

fn observe(session: &mut AnalysisSession, object: &ObjectId, site: &str, fqn: &str, types: &[&str]) {
    let method = CalledMethod::qualified(fqn, types);
    let receiver = method.declaring_class.clone();
    session
        .observe(object, ObservedCall::new(site, method, receiver))
        .expect("tracked");
}

fn answer(session: &AnalysisSession, object: &ObjectId, site: &str, var: &str, slot: BindingSlot, value: ExtractedValue) {
    let query = BindingQuery::new(object.clone(), CallSiteId::new(site), var, slot);
    session.supply_binding(&query, vec![value]);
}

/// `pairs` key generators, each feeding one cipher
fn workload(config: EngineConfig, pairs: usize) -> AnalysisSession {
    let mut session = AnalysisSession::new(config, rules(), Arc::new(ClassHierarchy::new()))
        .expect("valid config");

    for i in 0..pairs {
        let kg = ObjectId::new(format!("kg{i}"));
        let cipher = ObjectId::new(format!("c{i}"));
        let key = format!("key{i}");
        session
            .track(kg.clone(), ValueId::new(format!("kg{i}")), KEY_GENERATOR)
            .expect("tracked");
        session
            .track(cipher.clone(), ValueId::new(format!("c{i}")), CIPHER)
            .expect("tracked");

        let (kg1, kg2) = (format!("kg{i}:1"), format!("kg{i}:2"));
        observe(&mut session, &kg, &kg1, "javax.crypto.KeyGenerator.getInstance", &["java.lang.String"]);
        observe(&mut session, &kg, &kg2, "javax.crypto.KeyGenerator.generateKey", &[]);
        answer(&session, &kg, &kg1, "alg", BindingSlot::Param(0), ExtractedValue::string("AES"));
        answer(&session, &kg, &kg2, "key", BindingSlot::Return, ExtractedValue::object(key.as_str()));

        let (c1, c2) = (format!("c{i}:1"), format!("c{i}:2"));
        observe(&mut session, &cipher, &c1, "javax.crypto.Cipher.getInstance", &["java.lang.String"]);
        observe(&mut session, &cipher, &c2, "javax.crypto.Cipher.init", &["java.security.Key"]);
        answer(&session, &cipher, &c1, "transformation", BindingSlot::Param(0), ExtractedValue::string("AES/GCM/NoPadding"));
        answer(&session, &cipher, &c2, "key", BindingSlot::Param(0), ExtractedValue::object(key.as_str()));
    }
    session
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_pass");

    for pairs in [10, 100, 1000] {
        group.throughput(Throughput::Elements((pairs * 2) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(pairs), &pairs, |b, &pairs| {
            b.iter_batched(
                || workload(EngineConfig::default(), pairs),
                |session| black_box(session.finish()),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_workers(c: &mut Criterion) {
    let mut group = c.benchmark_group("workers");
    let pairs = 1000;

    let configs = [
        ("sequential", EngineConfig::default().parallel(|_| ParallelConfig::sequential())),
        ("pool", EngineConfig::default()),
    ];
    for (name, config) in configs {
        group.bench_function(name, |b| {
            b.iter_batched(
                || workload(config.clone(), pairs),
                |session| black_box(session.finish()),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pass, bench_workers);
criterion_main!(benches);
