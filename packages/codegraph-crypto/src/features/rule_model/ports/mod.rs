/*
 * Rule Model Ports
 *
 * Interface to whatever produces rule models (serialized files, a rule
 * compiler, test fixtures).
 */

use crate::features::rule_model::domain::{MalformedRuleError, Rule};

/// Rule source
///
/// Each entry is loaded independently: a malformed entry must not prevent
/// the others from loading.
pub trait RuleSource: Send + Sync {
    /// Human-readable origin (file name, directory, "builder")
    fn name(&self) -> &str;

    /// Load all rules
    fn load_rules(&self) -> Vec<Result<Rule, MalformedRuleError>>;
}
