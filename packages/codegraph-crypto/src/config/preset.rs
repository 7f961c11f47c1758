//! Named starting points for `EngineConfig`

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Evaluation preset
///
/// | Preset     | Incomplete reports | Label overlap | Value combinations |
/// |------------|--------------------|---------------|--------------------|
/// | `fast`     | off                | logged        | 64                 |
/// | `balanced` | on                 | logged        | 256                |
/// | `thorough` | on                 | rejected      | 4096               |
/// | `custom`   | as `balanced`, expected to be overridden from YAML      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Fast,
    #[default]
    Balanced,
    Thorough,
    Custom,
}

const PRESETS: [(&str, Preset); 4] = [
    ("fast", Preset::Fast),
    ("balanced", Preset::Balanced),
    ("thorough", Preset::Thorough),
    ("custom", Preset::Custom),
];

impl Preset {
    pub const NAMES: [&'static str; 4] = ["fast", "balanced", "thorough", "custom"];

    pub fn as_str(&self) -> &'static str {
        PRESETS
            .iter()
            .find(|(_, preset)| preset == self)
            .map_or("custom", |(name, _)| *name)
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PRESETS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s.trim()))
            .map(|(_, preset)| *preset)
            .ok_or_else(|| ConfigError::unknown_preset(s, &Self::NAMES))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
