/*
 * Constraint Partition
 *
 * Result of splitting a rule's constraints for one tracked object.
 *
 * - direct: evaluated against the object's own bindings
 * - required: resolved against facts published by other objects
 * - pending: mention variables not bound yet; re-partitioned later
 *
 * Constraints are referenced by index into `Rule::constraints`.
 */

use super::requirement::RequiredPredicate;
use crate::shared::constants::partition::{
    DEFAULT_KEYING_VARIABLES, DEFAULT_SKIPPED_ANCHORS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Naming policy of the partitioner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionPolicy {
    /// Identity-only variables; leaving one unbound keeps a constraint eligible
    pub keying_variables: BTreeSet<String>,

    /// Variables that never anchor a required predicate
    pub skipped_anchors: BTreeSet<String>,
}

impl Default for PartitionPolicy {
    fn default() -> Self {
        Self {
            keying_variables: DEFAULT_KEYING_VARIABLES.iter().map(|s| s.to_string()).collect(),
            skipped_anchors: DEFAULT_SKIPPED_ANCHORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PartitionPolicy {
    pub fn is_keying(&self, var: &str) -> bool {
        self.keying_variables.contains(var)
    }

    pub fn may_anchor(&self, var: &str) -> bool {
        !self.skipped_anchors.contains(var)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub direct: Vec<usize>,
    pub required: Vec<RequiredPredicate>,
    pub pending: Vec<usize>,
}

impl Partition {
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.required.is_empty() && self.pending.is_empty()
    }
}
