//! Stage configurations owned by the config layer
//!
//! `TypestateConfig` and `ConstraintConfig` live with their features; the
//! session's worker pool settings live here.

use super::preset::Preset;
use crate::features::constraints::ConstraintConfig;
use crate::features::typestate::TypestateConfig;
use crate::shared::constants::thread_pool::PARALLEL_THRESHOLD;
use serde::{Deserialize, Serialize};

/// Worker pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Number of workers (0=auto, 1..=256)
    pub num_threads: usize,

    /// Below this many tracked objects a phase runs on the calling thread
    pub parallel_threshold: usize,
}

impl ParallelConfig {
    /// Get preset configuration
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                num_threads: 0,
                parallel_threshold: PARALLEL_THRESHOLD * 4,
            },
            Preset::Balanced | Preset::Custom | Preset::Thorough => Self {
                num_threads: 0,
                parallel_threshold: PARALLEL_THRESHOLD,
            },
        }
    }

    /// Single-threaded evaluation
    pub fn sequential() -> Self {
        Self {
            num_threads: 1,
            parallel_threshold: usize::MAX,
        }
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

/// Typestate settings for a preset
pub fn typestate_preset(preset: Preset) -> TypestateConfig {
    match preset {
        Preset::Fast => TypestateConfig {
            report_incomplete: false,
            ..TypestateConfig::default()
        },
        Preset::Balanced | Preset::Custom => TypestateConfig::default(),
        Preset::Thorough => TypestateConfig {
            strict_labels: true,
            ..TypestateConfig::default()
        },
    }
}

/// Constraint settings for a preset
pub fn constraint_preset(preset: Preset) -> ConstraintConfig {
    let max_value_combinations = match preset {
        Preset::Fast => 64,
        Preset::Balanced | Preset::Custom => 256,
        Preset::Thorough => 4096,
    };
    ConstraintConfig {
        max_value_combinations,
        ..ConstraintConfig::default()
    }
}
