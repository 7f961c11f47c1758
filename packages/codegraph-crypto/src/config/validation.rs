//! Configuration validation
//!
//! Range checks per stage config, plus cross-stage consistency in
//! [`EngineConfig::validate`](super::EngineConfig::validate).

use super::error::{ConfigError, ConfigResult};
use super::stage_configs::ParallelConfig;
use crate::features::constraints::ConstraintConfig;
use crate::features::typestate::TypestateConfig;
use std::ops::RangeInclusive;

/// Stage config with range checks
///
/// ```rust,ignore
/// let stage = ConstraintConfig { max_value_combinations: 0, ..Default::default() };
/// assert!(stage.validate().is_err());
/// ```
pub trait Validatable {
    fn validate(&self) -> ConfigResult<()>;

    /// Stage name used as the prefix in error messages
    fn config_name(&self) -> &'static str;
}

const THREADS: RangeInclusive<usize> = 0..=256;
const COMBINATIONS: RangeInclusive<usize> = 1..=1_000_000;

impl Validatable for ParallelConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !THREADS.contains(&self.num_threads) {
            return Err(ConfigError::out_of_range(
                self.config_name(),
                "num_threads",
                self.num_threads,
                THREADS,
                "0 sizes the pool from the available cores",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "parallel"
    }
}

impl Validatable for ConstraintConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !COMBINATIONS.contains(&self.max_value_combinations) {
            return Err(ConfigError::out_of_range(
                self.config_name(),
                "max_value_combinations",
                self.max_value_combinations,
                COMBINATIONS,
                "at least one combination must be checked",
            ));
        }
        if let Some(var) = self
            .policy
            .keying_variables
            .iter()
            .find(|v| v.trim().is_empty())
        {
            return Err(ConfigError::Conflict {
                issue: format!("empty keying variable name {:?}", var),
                fix: "remove the entry from policy.keying_variables".to_string(),
            });
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "constraints"
    }
}

impl Validatable for TypestateConfig {
    fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "typestate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_range() {
        let config = ParallelConfig {
            num_threads: 1000,
            ..ParallelConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Range { .. })));
        assert!(ParallelConfig::default().validate().is_ok());
    }

    #[test]
    fn test_constraint_range() {
        let config = ConstraintConfig {
            max_value_combinations: 0,
            ..ConstraintConfig::default()
        };
        assert!(config.validate().is_err());

        let mut blank = ConstraintConfig::default();
        blank.policy.keying_variables.insert("  ".to_string());
        assert!(matches!(blank.validate(), Err(ConfigError::Conflict { .. })));
    }
}
