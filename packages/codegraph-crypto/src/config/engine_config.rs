//! Engine configuration
//!
//! Preset-based defaults with per-stage overrides, from code or YAML.
//!
//! ```yaml
//! version: 1
//! preset: balanced
//! overrides:
//!   typestate:
//!     fuzzy_matching: false
//!   constraints:
//!     max_value_combinations: 1024
//!     policy:
//!       keying_variables: [speccedKey]
//!       skipped_anchors: [transformation]
//! ```

use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigExportV1, ConfigOverrides, SUPPORTED_VERSIONS};
use super::preset::Preset;
use super::stage_configs::{constraint_preset, typestate_preset, ParallelConfig};
use super::validation::Validatable;
use crate::features::constraints::ConstraintConfig;
use crate::features::typestate::TypestateConfig;
use std::path::Path;
use tracing::debug;

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    preset: Preset,
    pub typestate: TypestateConfig,
    pub constraints: ConstraintConfig,
    pub parallel: ParallelConfig,
}

impl EngineConfig {
    /// Start from a preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            typestate: typestate_preset(preset),
            constraints: constraint_preset(preset),
            parallel: ParallelConfig::from_preset(preset),
        }
    }

    pub fn get_preset(&self) -> Preset {
        self.preset
    }

    /// Override typestate settings
    pub fn typestate(mut self, f: impl FnOnce(TypestateConfig) -> TypestateConfig) -> Self {
        self.typestate = f(self.typestate);
        self
    }

    /// Override constraint settings
    pub fn constraints(mut self, f: impl FnOnce(ConstraintConfig) -> ConstraintConfig) -> Self {
        self.constraints = f(self.constraints);
        self
    }

    /// Override worker pool settings
    pub fn parallel(mut self, f: impl FnOnce(ParallelConfig) -> ParallelConfig) -> Self {
        self.parallel = f(self.parallel);
        self
    }

    /// Validate every stage
    pub fn validate(&self) -> ConfigResult<()> {
        self.typestate.validate()?;
        self.constraints.validate()?;
        self.parallel.validate()?;

        let policy = &self.constraints.policy;
        if let Some(var) = policy.keying_variables.intersection(&policy.skipped_anchors).next() {
            return Err(ConfigError::Conflict {
                issue: format!("'{}' is both a keying variable and a skipped anchor", var),
                fix: "list the variable in only one of the two sets".to_string(),
            });
        }
        Ok(())
    }

    /// Load from YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset: Preset = export.preset.parse()?;
        let mut config = Self::preset(preset);

        if let Some(overrides) = export.overrides {
            if let Some(typestate) = overrides.typestate {
                debug!(stage = "typestate", "Applying YAML override");
                config.typestate = typestate;
            }
            if let Some(constraints) = overrides.constraints {
                debug!(stage = "constraints", "Applying YAML override");
                config.constraints = constraints;
            }
            if let Some(parallel) = overrides.parallel {
                debug!(stage = "parallel", "Applying YAML override");
                config.parallel = parallel;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Export as YAML v1 (all stages written out)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            preset: self.preset.to_string(),
            overrides: Some(ConfigOverrides {
                typestate: Some(self.typestate.clone()),
                constraints: Some(self.constraints.clone()),
                parallel: Some(self.parallel.clone()),
            }),
        };
        Ok(serde_yaml::to_string(&export)?)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::preset(Preset::Balanced)
    }
}
