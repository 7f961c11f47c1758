/*
 * Serialized Rule Source
 *
 * Reads rule models produced by an external rule compiler. Each document
 * holds one rule object or an array of rule objects.
 */

use crate::features::rule_model::domain::{MalformedRuleError, Rule};
use crate::features::rule_model::ports::RuleSource;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleDocument {
    Many(Vec<Rule>),
    One(Box<Rule>),
}

enum Origin {
    Files(Vec<PathBuf>),
    Inline { name: String, json: String },
}

/// JSON rule source
pub struct JsonRuleSource {
    name: String,
    origin: Origin,
}

impl JsonRuleSource {
    /// Source over an in-memory JSON document
    pub fn inline(name: impl Into<String>, json: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            origin: Origin::Inline {
                name: name.clone(),
                json: json.into(),
            },
            name,
        }
    }

    /// Source over every `*.json` file in a directory (sorted by file name)
    pub fn from_dir(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref();
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map(|ext| ext == "json").unwrap_or(false))
            .collect();
        files.sort();
        Ok(Self {
            name: dir.display().to_string(),
            origin: Origin::Files(files),
        })
    }

    pub fn from_files(files: Vec<PathBuf>) -> Self {
        Self {
            name: format!("{} file(s)", files.len()),
            origin: Origin::Files(files),
        }
    }

    fn parse(source_name: &str, json: &str) -> Vec<Result<Rule, MalformedRuleError>> {
        match serde_json::from_str::<RuleDocument>(json) {
            Ok(RuleDocument::Many(rules)) => rules.into_iter().map(Ok).collect(),
            Ok(RuleDocument::One(rule)) => vec![Ok(*rule)],
            Err(e) => vec![Err(MalformedRuleError::Deserialize {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })],
        }
    }
}

impl RuleSource for JsonRuleSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_rules(&self) -> Vec<Result<Rule, MalformedRuleError>> {
        match &self.origin {
            Origin::Inline { name, json } => Self::parse(name, json),
            Origin::Files(files) => files
                .iter()
                .flat_map(|path| {
                    let source_name = path.display().to_string();
                    debug!("Loading rules from {}", source_name);
                    match std::fs::read_to_string(path) {
                        Ok(json) => Self::parse(&source_name, &json),
                        Err(e) => vec![Err(MalformedRuleError::Deserialize {
                            source_name,
                            message: e.to_string(),
                        })],
                    }
                })
                .collect(),
        }
    }
}

/// Serialize rules to pretty JSON (the format this source reads)
pub fn rules_to_json(rules: &[Rule]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(rules)
}
