//! Scenario builder
//!
//! Drives an `AnalysisSession` the way an embedding tool would: track
//! objects, feed observed calls, answer binding queries.

use super::fixtures::{jca_rules, vendor_hierarchy};
use codegraph_crypto::config::ParallelConfig;
use codegraph_crypto::features::rule_model::RuleSet;
use codegraph_crypto::shared::models::{
    BindingSlot, CallSiteId, CalledMethod, ExtractedValue, ObjectId, ObservedCall, ValueId,
};
use codegraph_crypto::{AnalysisSession, BindingQuery, EngineConfig, ViolationReport};
use std::sync::Arc;

pub struct Scenario {
    pub session: AnalysisSession,
}

impl Scenario {
    /// JCA fixture rules, default config, sequential evaluation
    pub fn new() -> Self {
        Self::with_rules(jca_rules())
    }

    pub fn with_rules(rules: RuleSet) -> Self {
        let config = EngineConfig::default().parallel(|_| ParallelConfig::sequential());
        Self::with_config(config, rules)
    }

    pub fn with_config(config: EngineConfig, rules: RuleSet) -> Self {
        let session = AnalysisSession::new(config, rules, Arc::new(vendor_hierarchy()))
            .expect("valid session config");
        Self { session }
    }

    /// Track `object` (its value identity is the same string)
    pub fn track(mut self, object: &str, class_name: &str) -> Self {
        self.session
            .track(ObjectId::new(object), ValueId::new(object), class_name)
            .expect("tracked");
        self
    }

    /// Observe `declaring.method(types)` at `site` on `object`
    pub fn call(mut self, object: &str, site: &str, fqn: &str, types: &[&str]) -> Self {
        let method = CalledMethod::qualified(fqn, types);
        let receiver = method.declaring_class.clone();
        self.session
            .observe(&ObjectId::new(object), ObservedCall::new(site, method, receiver))
            .expect("observed");
        self
    }

    /// Answer the query for argument `index` of the call at `site`
    pub fn arg(self, object: &str, site: &str, var: &str, index: usize, values: Vec<ExtractedValue>) -> Self {
        self.answer(object, site, var, BindingSlot::Param(index), values)
    }

    /// Answer the query for the return value of the call at `site`
    pub fn ret(self, object: &str, site: &str, var: &str, values: Vec<ExtractedValue>) -> Self {
        self.answer(object, site, var, BindingSlot::Return, values)
    }

    fn answer(
        self,
        object: &str,
        site: &str,
        var: &str,
        slot: BindingSlot,
        values: Vec<ExtractedValue>,
    ) -> Self {
        let query = BindingQuery::new(ObjectId::new(object), CallSiteId::new(site), var, slot);
        self.session.supply_binding(&query, values);
        self
    }

    pub fn pass(mut self) -> Self {
        self.session.run_pass();
        self
    }

    pub fn finish(self) -> ViolationReport {
        self.session.finish()
    }
}

/// A fully correct key generation: getInstance("AES"), init(128), generateKey()
pub fn generate_aes_key(scenario: Scenario, kg: &str, key_value: &str) -> Scenario {
    scenario
        .track(kg, super::KEY_GENERATOR)
        .call(kg, &format!("{kg}:1"), "javax.crypto.KeyGenerator.getInstance", &["java.lang.String"])
        .arg(kg, &format!("{kg}:1"), "alg", 0, vec![ExtractedValue::string("AES")])
        .call(kg, &format!("{kg}:2"), "javax.crypto.KeyGenerator.init", &["int"])
        .arg(kg, &format!("{kg}:2"), "keySize", 0, vec![ExtractedValue::int(128)])
        .call(kg, &format!("{kg}:3"), "javax.crypto.KeyGenerator.generateKey", &[])
        .ret(kg, &format!("{kg}:3"), "key", vec![ExtractedValue::object(key_value)])
}

/// Cipher getInstance(transformation), init(1, key), doFinal(bytes)
pub fn encrypt_with(scenario: Scenario, cipher: &str, transformation: &str, key_value: &str) -> Scenario {
    scenario
        .track(cipher, super::CIPHER)
        .call(cipher, &format!("{cipher}:1"), "javax.crypto.Cipher.getInstance", &["java.lang.String"])
        .arg(cipher, &format!("{cipher}:1"), "transformation", 0, vec![ExtractedValue::string(transformation)])
        .call(cipher, &format!("{cipher}:2"), "javax.crypto.Cipher.init", &["int", "java.security.Key"])
        .arg(cipher, &format!("{cipher}:2"), "encmode", 0, vec![ExtractedValue::int(1)])
        .arg(cipher, &format!("{cipher}:2"), "key", 1, vec![ExtractedValue::object(key_value)])
        .call(cipher, &format!("{cipher}:3"), "javax.crypto.Cipher.doFinal", &["byte[]"])
}
