//! Rule fixtures
//!
//! Small versions of the JCA rules: a key generator that ensures
//! `generatedKey[key]`, a cipher that requires it, and a secure random
//! that ensures `randomized[this]`.

use codegraph_crypto::features::rule_model::{
    Constraint, MethodSignature, Predicate, PredicateParam, Rule, RuleBuilder, RuleSet,
    RuleValidator, SpecObject,
};
use codegraph_crypto::ClassHierarchy;

pub const KEY_GENERATOR: &str = "javax.crypto.KeyGenerator";
pub const CIPHER: &str = "javax.crypto.Cipher";
pub const SECURE_RANDOM: &str = "java.security.SecureRandom";

pub fn method(fqn: &str, params: &[(&str, &str)]) -> MethodSignature {
    MethodSignature::new(fqn, params)
}

pub fn generated_key(var: &str) -> Predicate {
    Predicate::new(
        "generatedKey",
        vec![PredicateParam::object(var, "javax.crypto.SecretKey")],
    )
}

pub fn randomized(param: PredicateParam) -> Predicate {
    Predicate::new("randomized", vec![param])
}

/// Start -getInstance-> Created -init-> Initialized -generateKey-> Generated
pub fn key_generator_rule() -> Rule {
    let get_instance = method(
        "javax.crypto.KeyGenerator.getInstance",
        &[("java.lang.String", "alg")],
    );
    let init = method("javax.crypto.KeyGenerator.init", &[("int", "keySize")]);
    let init_random = method(
        "javax.crypto.KeyGenerator.init",
        &[("int", "keySize"), ("java.security.SecureRandom", "random")],
    );
    let generate = method("javax.crypto.KeyGenerator.generateKey", &[])
        .returning("key", "javax.crypto.SecretKey");

    RuleBuilder::new(KEY_GENERATOR)
        .object("alg", "java.lang.String")
        .object("keySize", "int")
        .object("random", "java.security.SecureRandom")
        .object("key", "javax.crypto.SecretKey")
        .initial_state("Start")
        .state("Created", false)
        .state("Initialized", false)
        .accepting_state("Generated")
        .transition("Start", vec![get_instance], "Created")
        .transition("Created", vec![init, init_random], "Initialized")
        .transition("Initialized", vec![generate], "Generated")
        .constraint(Constraint::value_in(
            SpecObject::new("alg", "java.lang.String"),
            &["AES", "HmacSHA256"],
        ))
        .constraint(Constraint::value_in(
            SpecObject::new("keySize", "int"),
            &["128", "192", "256"],
        ))
        .requires(randomized(PredicateParam::object(
            "random",
            "java.security.SecureRandom",
        )))
        .ensures(generated_key("key"))
        .build()
}

/// Start -getInstance-> Created -init-> Initialized -doFinal-> Finished
pub fn cipher_rule() -> Rule {
    let get_instance = method(
        "javax.crypto.Cipher.getInstance",
        &[("java.lang.String", "transformation")],
    );
    let init = method(
        "javax.crypto.Cipher.init",
        &[("int", "encmode"), ("java.security.Key", "key")],
    );
    let do_final = method("javax.crypto.Cipher.doFinal", &[("byte[]", "_")]);

    RuleBuilder::new(CIPHER)
        .object("transformation", "java.lang.String")
        .object("encmode", "int")
        .object("key", "java.security.Key")
        .initial_state("Start")
        .state("Created", false)
        .state("Initialized", false)
        .accepting_state("Finished")
        .transition("Start", vec![get_instance], "Created")
        .transition("Created", vec![init], "Initialized")
        .transition("Initialized", vec![do_final.clone()], "Finished")
        .transition("Finished", vec![do_final], "Finished")
        .constraint(Constraint::value_in(
            SpecObject::new("transformation", "java.lang.String").alg(),
            &["AES"],
        ))
        .constraint(Constraint::value_in(
            SpecObject::new("encmode", "int"),
            &["1", "2"],
        ))
        .requires(generated_key("key"))
        .build()
}

/// Start -<init>-> Created -nextBytes-> Created; setSeed(long) forbidden
pub fn secure_random_rule() -> Rule {
    let create = method("java.security.SecureRandom.getInstanceStrong", &[]);
    let next = method("java.security.SecureRandom.nextBytes", &[("byte[]", "_")]);
    let weak_seed = method("java.security.SecureRandom.setSeed", &[("long", "_")]);
    let seed = method("java.security.SecureRandom.setSeed", &[("byte[]", "_")]);

    RuleBuilder::new(SECURE_RANDOM)
        .initial_state("Start")
        .accepting_state("Created")
        .transition("Start", vec![create], "Created")
        .transition("Created", vec![next], "Created")
        .forbidden_with_alternatives(weak_seed, vec![seed])
        .ensures(randomized(PredicateParam::This))
        .build()
}

/// Every fixture rule, validated
pub fn jca_rules() -> RuleSet {
    let validator = RuleValidator::new();
    let mut rules = RuleSet::new();
    for rule in [key_generator_rule(), cipher_rule(), secure_random_rule()] {
        rules
            .insert(rule, &validator)
            .expect("fixture rules are well formed");
    }
    rules
}

/// Vendor subclasses of the JCA types
pub fn vendor_hierarchy() -> ClassHierarchy {
    ClassHierarchy::new()
        .with("com.acme.crypto.LoggingCipher", CIPHER)
        .with("com.acme.crypto.FastKeyGenerator", KEY_GENERATOR)
}
