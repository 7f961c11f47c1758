//! Errors raised while building or loading an `EngineConfig`

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Numeric setting outside its allowed bounds
    #[error("{stage}.{field} = {value} is outside {min}..={max} ({hint})")]
    Range {
        stage: &'static str,
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
        hint: &'static str,
    },

    #[error("configuration file has no 'version' key (expected 'version: 1')")]
    MissingVersion,

    #[error("configuration version {found} is not supported (supported: {supported:?})")]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    #[error("unknown preset '{name}'{}", suggestion.as_ref().map(|s| format!(". Did you mean '{}'?", s)).unwrap_or_default())]
    UnknownPreset {
        name: String,
        suggestion: Option<&'static str>,
    },

    /// Two settings that cannot hold together
    #[error("conflicting settings: {issue}. Fix: {fix}")]
    Conflict { issue: String, fix: String },

    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub fn out_of_range(
        stage: &'static str,
        field: &'static str,
        value: usize,
        bounds: std::ops::RangeInclusive<usize>,
        hint: &'static str,
    ) -> Self {
        Self::Range {
            stage,
            field,
            value,
            min: *bounds.start(),
            max: *bounds.end(),
            hint,
        }
    }

    /// Unknown preset, suggesting the nearest known name when one is close
    pub fn unknown_preset(name: &str, known: &[&'static str]) -> Self {
        let lowered = name.to_lowercase();
        let suggestion = known
            .iter()
            .map(|k| (edit_distance(&lowered, k), *k))
            .filter(|(distance, _)| *distance <= 3)
            .min()
            .map(|(_, k)| k);
        Self::UnknownPreset {
            name: name.to_string(),
            suggestion,
        }
    }
}

/// Levenshtein distance over chars, one row at a time
fn edit_distance(from: &str, to: &str) -> usize {
    let to: Vec<char> = to.chars().collect();
    let mut row: Vec<usize> = (0..=to.len()).collect();

    for (i, a) in from.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, b) in to.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if a == *b {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[to.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("fast", "fast"), 0);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("fsat", "fast"), 2);
    }

    #[test]
    fn test_unknown_preset_suggestion() {
        let known = ["fast", "balanced", "thorough"];
        let msg = ConfigError::unknown_preset("Thorogh", &known).to_string();
        assert!(msg.contains("'Thorogh'"));
        assert!(msg.contains("Did you mean 'thorough'?"));

        let msg = ConfigError::unknown_preset("exhaustive-audit", &known).to_string();
        assert!(!msg.contains("Did you mean"));
    }

    #[test]
    fn test_range_message() {
        let err = ConfigError::out_of_range(
            "constraints",
            "max_value_combinations",
            0,
            1..=1_000_000,
            "at least one combination must be checked",
        );
        let msg = err.to_string();
        assert!(msg.contains("constraints.max_value_combinations = 0"));
        assert!(msg.contains("1..=1000000"));
    }
}
