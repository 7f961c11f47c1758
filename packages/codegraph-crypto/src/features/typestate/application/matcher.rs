/*
 * Method Matcher
 *
 * Decides whether an observed call is the method a label entry names.
 *
 * # Rules
 * - Exact: same short name, same parameter types, declaring class equal
 *   to the label's declaring class
 * - Fuzzy: same short name and parameter types, called declaring class a
 *   subtype of the label's declaring class (e.g. a method inherited or
 *   overridden by a subclass of the specified type)
 *
 * `AnyType` in a label matches every argument type in both modes.
 */

use crate::features::rule_model::domain::{MethodSignature, UsageAutomaton};
use crate::features::typestate::domain::MatchKind;
use crate::features::typestate::ports::SubtypeOracle;
use crate::shared::models::CalledMethod;

/// Method matcher
pub struct MethodMatcher<'a> {
    oracle: &'a dyn SubtypeOracle,
    fuzzy: bool,
}

impl<'a> MethodMatcher<'a> {
    pub fn new(oracle: &'a dyn SubtypeOracle, fuzzy: bool) -> Self {
        Self { oracle, fuzzy }
    }

    /// Match one label entry
    pub fn match_method(&self, label: &MethodSignature, called: &CalledMethod) -> Option<MatchKind> {
        if label.short_name() != called.name || !label.params_match(&called.param_types) {
            return None;
        }
        if label.declaring_class() == called.declaring_class {
            Some(MatchKind::Exact)
        } else if self.fuzzy
            && self
                .oracle
                .is_subtype(&called.declaring_class, label.declaring_class())
        {
            Some(MatchKind::Fuzzy)
        } else {
            None
        }
    }

    /// Best matching entry of a label (exact before fuzzy, then label order)
    pub fn best_match<'l>(
        &self,
        label: &'l [MethodSignature],
        called: &CalledMethod,
    ) -> Option<(&'l MethodSignature, MatchKind)> {
        label
            .iter()
            .filter_map(|entry| self.match_method(entry, called).map(|kind| (entry, kind)))
            .min_by_key(|(_, kind)| *kind)
    }

    /// Whether the call belongs to the automaton's event alphabet
    pub fn in_alphabet(&self, automaton: &UsageAutomaton, called: &CalledMethod) -> bool {
        automaton
            .alphabet()
            .into_iter()
            .any(|entry| self.match_method(entry, called).is_some())
    }
}
