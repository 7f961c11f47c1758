//! Rule loading use case
//!
//! Pulls rules from a [`RuleSource`], validates each one on its own and
//! indexes the accepted rules by their type.

use crate::features::rule_model::domain::{MalformedRuleError, Rule};
use crate::features::rule_model::infrastructure::RuleValidator;
use crate::features::rule_model::ports::RuleSource;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Accepted rules plus the rejections
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Arc<Rule>>,
    by_class: FxHashMap<String, usize>,

    /// Rejected rules; each one disabled only itself
    pub rejected: Vec<MalformedRuleError>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a rule
    ///
    /// A later rule for the same type replaces the earlier one.
    pub fn insert(
        &mut self,
        rule: Rule,
        validator: &RuleValidator,
    ) -> Result<Arc<Rule>, MalformedRuleError> {
        if let Err(e) = validator.validate(&rule) {
            warn!("Rejected rule: {}", e);
            self.rejected.push(e.clone());
            return Err(e);
        }

        let rule = Arc::new(rule);
        match self.by_class.get(&rule.class_name) {
            Some(&idx) => {
                warn!("Rule for '{}' loaded twice; keeping the later one", rule.class_name);
                self.rules[idx] = Arc::clone(&rule);
            }
            None => {
                self.by_class.insert(rule.class_name.clone(), self.rules.len());
                self.rules.push(Arc::clone(&rule));
            }
        }
        Ok(rule)
    }

    /// Re-check accepted rules under a stricter validator
    ///
    /// Rules that now fail move to `rejected`. Returns how many moved.
    pub fn revalidate(&mut self, validator: &RuleValidator) -> usize {
        let before = self.rules.len();
        let mut kept = Vec::with_capacity(before);
        for rule in std::mem::take(&mut self.rules) {
            match validator.validate(&rule) {
                Ok(()) => kept.push(rule),
                Err(e) => {
                    warn!("Rejected rule on revalidation: {}", e);
                    self.rejected.push(e);
                }
            }
        }
        self.by_class = kept
            .iter()
            .enumerate()
            .map(|(idx, rule)| (rule.class_name.clone(), idx))
            .collect();
        self.rules = kept;
        before - self.rules.len()
    }

    pub fn get(&self, class_name: &str) -> Option<&Arc<Rule>> {
        self.by_class.get(class_name).map(|&idx| &self.rules[idx])
    }

    pub fn rules(&self) -> &[Arc<Rule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Load every rule from a source
pub fn load_rules(source: &dyn RuleSource, validator: &RuleValidator) -> RuleSet {
    let mut set = RuleSet::new();
    for loaded in source.load_rules() {
        match loaded {
            Ok(rule) => {
                let _ = set.insert(rule, validator);
            }
            Err(e) => {
                warn!("Rejected rule: {}", e);
                set.rejected.push(e);
            }
        }
    }
    info!(
        "Loaded {} rule(s) from {} ({} rejected)",
        set.len(),
        source.name(),
        set.rejected.len()
    );
    set
}
