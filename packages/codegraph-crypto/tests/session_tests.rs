//! Session behavior: idempotent passes, malformed-rule isolation,
//! parallel evaluation and the pass summary.

mod common;
use common::*;

use codegraph_crypto::config::{ParallelConfig, Preset};
use codegraph_crypto::features::rule_model::{
    JsonRuleSource, MethodSignature, RuleBuilder, RuleValidator,
};
use codegraph_crypto::shared::models::{ExtractedValue, ObjectId, ValueId};
use codegraph_crypto::{load_rules, CryptoAnalysisError, EngineConfig, Violation, ViolationKind};
use pretty_assertions::assert_eq;

fn broken_rule() -> codegraph_crypto::Rule {
    RuleBuilder::new("com.acme.Broken")
        .initial_state("Start")
        .accepting_state("Island")
        .build()
}

/// `n` key generators, every third one with a short key
fn key_generators(mut scenario: Scenario, n: usize) -> Scenario {
    for i in 0..n {
        let kg = format!("kg{i}");
        let size = if i % 3 == 0 { 56 } else { 256 };
        scenario = scenario
            .track(&kg, KEY_GENERATOR)
            .call(&kg, &format!("{kg}:1"), "javax.crypto.KeyGenerator.getInstance", &["java.lang.String"])
            .arg(&kg, &format!("{kg}:1"), "alg", 0, vec![ExtractedValue::string("AES")])
            .call(&kg, &format!("{kg}:2"), "javax.crypto.KeyGenerator.init", &["int"])
            .arg(&kg, &format!("{kg}:2"), "keySize", 0, vec![ExtractedValue::int(size)])
            .call(&kg, &format!("{kg}:3"), "javax.crypto.KeyGenerator.generateKey", &[])
            .ret(&kg, &format!("{kg}:3"), "key", vec![ExtractedValue::object(format!("key{i}"))]);
        let cipher = format!("c{i}");
        scenario = encrypt_with(scenario, &cipher, "AES/CBC/PKCS5Padding", &format!("key{i}"));
    }
    scenario
}

fn owned(records: Vec<&Violation>) -> Vec<Violation> {
    records.into_iter().cloned().collect()
}

#[test]
fn test_repeated_passes_are_idempotent() {
    let mut scenario = key_generators(Scenario::new(), 4);
    scenario.session.run_pass();
    let first = owned(scenario.session.report().sorted());

    for _ in 0..3 {
        let summary = scenario.session.run_pass();
        assert_eq!(summary.calls_applied, 0);
        assert_eq!(summary.facts_published, 0);
        assert_eq!(owned(scenario.session.report().sorted()), first);
    }
    assert_eq!(scenario.session.passes(), 4);
}

#[test]
fn test_parallel_and_sequential_agree() {
    let sequential = key_generators(Scenario::new(), 30).finish();

    let config = EngineConfig::default().parallel(|_| ParallelConfig {
        num_threads: 4,
        parallel_threshold: 2,
    });
    let parallel = key_generators(Scenario::with_config(config, jca_rules()), 30).finish();

    assert_eq!(owned(parallel.sorted()), owned(sequential.sorted()));
    assert_kind_count(&parallel, ViolationKind::Constraint, 10);
    assert_kind_count(&parallel, ViolationKind::MissingPredicate, 0);
}

#[test]
fn test_malformed_rule_disables_only_itself() {
    let mut rules = jca_rules();
    assert!(rules.insert(broken_rule(), &RuleValidator::new()).is_err());

    let mut scenario = Scenario::with_rules(rules);
    let result = scenario.session.track(
        ObjectId::new("b"),
        ValueId::new("b"),
        "com.acme.Broken",
    );
    assert!(matches!(result, Err(CryptoAnalysisError::UnknownRule(_))));

    let scenario = generate_aes_key(scenario, "kg", "key@1");
    let report = encrypt_with(scenario, "c", "AES", "key@1").finish();

    assert_kind_count(&report, ViolationKind::MalformedRule, 1);
    assert_eq!(report.len(), 1);
    assert_no_hard_failures(&report);
}

#[test]
fn test_thorough_preset_rejects_overlapping_labels() {
    let run = MethodSignature::new("com.acme.Ambiguous.run", &[]);
    let ambiguous = RuleBuilder::new("com.acme.Ambiguous")
        .initial_state("Start")
        .accepting_state("Done")
        .accepting_state("Other")
        .transition("Start", vec![run.clone()], "Done")
        .transition("Start", vec![run], "Other")
        .build();
    let mut rules = jca_rules();
    assert!(rules.insert(ambiguous, &RuleValidator::new()).is_ok());

    let config = EngineConfig::preset(Preset::Thorough).parallel(|_| ParallelConfig::sequential());
    let mut scenario = Scenario::with_config(config, rules);
    assert!(scenario.session.rules().get("com.acme.Ambiguous").is_none());
    let result = scenario.session.track(
        ObjectId::new("a"),
        ValueId::new("a"),
        "com.acme.Ambiguous",
    );
    assert!(matches!(result, Err(CryptoAnalysisError::UnknownRule(_))));

    let report = scenario.finish();
    assert_kind_count(&report, ViolationKind::MalformedRule, 1);
}

#[test]
fn test_rules_loaded_from_json() {
    let json = serde_json::to_string(&vec![key_generator_rule(), cipher_rule(), broken_rule()])
        .unwrap();
    let rules = load_rules(&JsonRuleSource::inline("jca.json", json), &RuleValidator::new());
    assert_eq!(rules.len(), 2);
    assert_eq!(rules.rejected.len(), 1);
    assert_eq!(rules.rejected[0].rule_name(), "com.acme.Broken");

    let scenario = generate_aes_key(Scenario::with_rules(rules), "kg", "key@1");
    let report = encrypt_with(scenario, "c", "AES", "key@2").finish();
    assert_kind_count(&report, ViolationKind::MalformedRule, 1);
    assert_kind_count(&report, ViolationKind::MissingPredicate, 1);
}

#[test]
fn test_pass_summary_counts() {
    let mut scenario = Scenario::new()
        .track("kg", KEY_GENERATOR)
        .call("kg", "kg:1", "javax.crypto.KeyGenerator.getInstance", &["java.lang.String"])
        .call("kg", "kg:2", "javax.crypto.KeyGenerator.init", &["int"])
        .call("kg", "kg:3", "javax.crypto.KeyGenerator.generateKey", &[]);

    let summary = scenario.session.run_pass();
    assert_eq!(summary.pass, 1);
    assert_eq!(summary.objects, 1);
    assert_eq!(summary.calls_applied, 3);
    assert_eq!(summary.queries_registered, 3);
    assert_eq!(summary.bindings_received, 0);
    // generatedKey[key] waits for the return value
    assert_eq!(summary.facts_published, 0);
    assert_eq!(summary.deferred_generations, 1);
    assert!(!summary.is_settled());

    for query in scenario.session.pending_queries() {
        let value = match query.var_name.as_str() {
            "alg" => ExtractedValue::string("AES"),
            "keySize" => ExtractedValue::int(128),
            _ => ExtractedValue::object("key@1"),
        };
        scenario.session.supply_binding(&query, vec![value]);
    }

    let summary = scenario.session.run_pass();
    assert_eq!(summary.bindings_received, 3);
    assert_eq!(summary.facts_published, 1);
    assert_eq!(summary.deferred_generations, 0);
    assert_eq!(summary.violations, 0);
}

#[test]
fn test_report_serializes() {
    let report = encrypt_with(Scenario::new(), "c", "AES", "key@9").finish();
    let json = report.to_json().unwrap();
    assert!(json.contains("MissingPredicate"));
    assert!(json.contains("generatedKey"));
}
