//! Read-only view of one tracked object
//!
//! What constraint evaluation and predicate keying may see of an object:
//! its identity, its receiver value, its append-only bindings and the calls
//! observed on it.

use super::call_site::{CallSiteBinding, CallSiteId, ObjectId, ObservedCall};
use super::value::{ExtractedValue, ValueId};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy)]
pub struct ObjectView<'a> {
    pub object: &'a ObjectId,

    /// Value identity of the object itself (`this`)
    pub this_value: &'a ValueId,

    /// Bindings in arrival order
    pub bindings: &'a [CallSiteBinding],

    /// Calls in observation order
    pub calls: &'a [ObservedCall],
}

impl<'a> ObjectView<'a> {
    pub fn new(
        object: &'a ObjectId,
        this_value: &'a ValueId,
        bindings: &'a [CallSiteBinding],
        calls: &'a [ObservedCall],
    ) -> Self {
        Self {
            object,
            this_value,
            bindings,
            calls,
        }
    }

    /// Names of all bound specification variables
    pub fn bound_names(&self) -> BTreeSet<String> {
        self.bindings.iter().map(|b| b.var_name.clone()).collect()
    }

    pub fn is_bound(&self, var: &str) -> bool {
        self.bindings.iter().any(|b| b.var_name == var)
    }

    /// Every value bound to `var`, with the site that bound it
    pub fn values_of(&self, var: &str) -> Vec<(&'a CallSiteId, &'a ExtractedValue)> {
        self.bindings
            .iter()
            .filter(|b| b.var_name == var)
            .flat_map(|b| b.values.iter().map(move |v| (&b.site, v)))
            .collect()
    }

    /// Site of the first binding of any of `vars`
    pub fn first_site_binding(&self, vars: &BTreeSet<String>) -> Option<&'a CallSiteId> {
        self.bindings
            .iter()
            .find(|b| vars.contains(&b.var_name))
            .map(|b| &b.site)
    }

    pub fn last_call_site(&self) -> Option<&'a CallSiteId> {
        self.calls.last().map(|c| &c.site)
    }
}
