/*
 * Class Hierarchy
 *
 * Explicit supertype table answering subtype queries for fuzzy matching.
 *
 * # Example
 * ```text
 * javax.crypto.spec.SecretKeySpec → javax.crypto.SecretKey → java.security.Key
 * ```
 *
 * # Time Complexity
 * - is_subtype: O(types + edges) worst case (iterative walk)
 */

use crate::features::typestate::ports::SubtypeOracle;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Supertype table: type → direct supertypes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassHierarchy {
    supertypes: FxHashMap<String, Vec<String>>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `child extends/implements parent`
    pub fn add_supertype(&mut self, child: impl Into<String>, parent: impl Into<String>) {
        let parents = self.supertypes.entry(child.into()).or_default();
        let parent = parent.into();
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }

    /// Builder-style [`Self::add_supertype`]
    pub fn with(mut self, child: impl Into<String>, parent: impl Into<String>) -> Self {
        self.add_supertype(child, parent);
        self
    }

    pub fn direct_supertypes(&self, ty: &str) -> &[String] {
        self.supertypes.get(ty).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All transitive supertypes (excluding `ty` itself)
    pub fn all_supertypes(&self, ty: &str) -> Vec<&str> {
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut order = Vec::new();
        let mut worklist: Vec<&str> = self
            .direct_supertypes(ty)
            .iter()
            .map(String::as_str)
            .collect();

        while let Some(current) = worklist.pop() {
            if current == ty || !visited.insert(current) {
                continue;
            }
            order.push(current);
            worklist.extend(self.direct_supertypes(current).iter().map(String::as_str));
        }
        order
    }
}

impl SubtypeOracle for ClassHierarchy {
    fn is_subtype(&self, child: &str, parent: &str) -> bool {
        child == parent || self.all_supertypes(child).contains(&parent)
    }
}
