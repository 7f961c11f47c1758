//! Binding queries
//!
//! A fired transition asks the oracle for the values of every named
//! parameter (and the return binding) of the matched label entry.

use crate::shared::models::{BindingSlot, CallSiteBinding, CallSiteId, ExtractedValue, ObjectId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request for the values of one argument at one call site
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BindingQuery {
    pub object: ObjectId,
    pub site: CallSiteId,
    pub var_name: String,
    pub slot: BindingSlot,
}

impl BindingQuery {
    pub fn new(
        object: ObjectId,
        site: CallSiteId,
        var_name: impl Into<String>,
        slot: BindingSlot,
    ) -> Self {
        Self {
            object,
            site,
            var_name: var_name.into(),
            slot,
        }
    }

    /// Answer the query
    pub fn into_binding(self, values: Vec<ExtractedValue>) -> CallSiteBinding {
        CallSiteBinding {
            site: self.site,
            var_name: self.var_name,
            slot: self.slot,
            values,
        }
    }

    /// Whether a binding answers this query (object aside)
    pub fn answered_by(&self, binding: &CallSiteBinding) -> bool {
        self.site == binding.site && self.var_name == binding.var_name && self.slot == binding.slot
    }
}

impl fmt::Display for BindingQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}[{} -> {}]",
            self.object, self.site, self.slot, self.var_name
        )
    }
}
