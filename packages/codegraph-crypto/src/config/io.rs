//! Configuration I/O schema (YAML v1)
//!
//! Schema types only; loading lives in engine_config.rs.

use super::stage_configs::ParallelConfig;
use crate::features::constraints::ConstraintConfig;
use crate::features::typestate::TypestateConfig;
use serde::{Deserialize, Serialize};

/// Supported schema versions
pub const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    pub preset: String,

    /// Stage overrides; a present stage replaces the preset's stage config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typestate: Option<TypestateConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<ConstraintConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<ParallelConfig>,
}
