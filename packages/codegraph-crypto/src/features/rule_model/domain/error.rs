//! Rule loading errors
//!
//! Fatal to the offending rule only; other rules keep evaluating.

use thiserror::Error;

/// Structural invariant violated in a rule model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRuleError {
    #[error("Rule '{rule}' declares no initial state")]
    NoInitialState { rule: String },

    #[error("Rule '{rule}' references unknown state '{state}'")]
    UnknownState { rule: String, state: String },

    #[error("Rule '{rule}' has states unreachable from the initial states: {}", states.join(", "))]
    UnreachableStates { rule: String, states: Vec<String> },

    #[error("Rule '{rule}' uses '{predicate}' with method or type arguments, but it is not a built-in predicate")]
    UnknownBuiltin { rule: String, predicate: String },

    #[error("Rule '{rule}': built-in '{predicate}' expects {expected}, found {found}")]
    BuiltinArity {
        rule: String,
        predicate: String,
        expected: String,
        found: String,
    },

    #[error("Rule '{rule}' references undeclared object '{variable}'")]
    UnknownVariable { rule: String, variable: String },

    #[error("Rule '{rule}': state '{state}' has overlapping labels for '{method}'")]
    OverlappingLabels {
        rule: String,
        state: String,
        method: String,
    },

    #[error("Cannot read rule model from '{source_name}': {message}")]
    Deserialize { source_name: String, message: String },
}

impl MalformedRuleError {
    /// Name of the rule the error belongs to
    pub fn rule_name(&self) -> &str {
        match self {
            Self::NoInitialState { rule }
            | Self::UnknownState { rule, .. }
            | Self::UnreachableStates { rule, .. }
            | Self::UnknownBuiltin { rule, .. }
            | Self::BuiltinArity { rule, .. }
            | Self::UnknownVariable { rule, .. }
            | Self::OverlappingLabels { rule, .. } => rule,
            Self::Deserialize { source_name, .. } => source_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_message() {
        let err = MalformedRuleError::UnreachableStates {
            rule: "javax.crypto.Cipher".to_string(),
            states: vec!["S3".to_string(), "S4".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("javax.crypto.Cipher"));
        assert!(msg.contains("S3, S4"));
        assert_eq!(err.rule_name(), "javax.crypto.Cipher");
    }

    #[test]
    fn test_deserialize_rule_name() {
        let err = MalformedRuleError::Deserialize {
            source_name: "Cipher.json".to_string(),
            message: "missing field `automaton`".to_string(),
        };
        assert_eq!(err.rule_name(), "Cipher.json");
    }
}
