/*
 * Predicate Facts
 *
 * A fact is a predicate name applied to value identities, not to variable
 * names or object references: `generatedKey[k@12, "AES"]`. Any object that
 * later sees value `k@12` can find the fact.
 */

use crate::features::rule_model::domain::{SpecObject, StateId};
use crate::shared::models::{CallSiteId, ConstValue, ExtractedValue, ObjectId, ValueFact, ValueId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one predicate argument
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueKey {
    /// Runtime object identity
    Value(ValueId),

    /// Literal value
    Const(String),

    /// Matches every value (`_`, or a value that could not be determined)
    Any,
}

impl ValueKey {
    /// Key of an extracted value; `None` if the value is unresolvable
    pub fn of(value: &ExtractedValue, var: &SpecObject) -> Option<Self> {
        match &value.fact {
            ValueFact::Object(id) => Some(Self::Value(id.clone())),
            ValueFact::Constant(c) => {
                let text = const_key(c);
                match &var.splitter {
                    Some(splitter) => splitter.split(&text).map(Self::Const),
                    None => Some(Self::Const(text)),
                }
            }
            ValueFact::Unresolvable => None,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Unification: equal keys, or either side is `Any`
    pub fn matches(&self, other: &ValueKey) -> bool {
        self.is_any() || other.is_any() || self == other
    }
}

fn const_key(value: &ConstValue) -> String {
    match value.as_text() {
        // case-insensitive, like value constraints
        Some(text) => text.to_ascii_lowercase(),
        None => value.to_string(),
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(id) => write!(f, "{}", id),
            Self::Const(c) => write!(f, "\"{}\"", c),
            Self::Any => write!(f, "_"),
        }
    }
}

/// Argument lists unify position by position
pub fn args_match(stored: &[ValueKey], query: &[ValueKey]) -> bool {
    stored.len() == query.len() && stored.iter().zip(query).all(|(s, q)| s.matches(q))
}

/// Does a negation retract the stored binding?
///
/// One-directional: `_` in the negation retracts every value at that
/// position, but a stored `_` is only retracted by a `_`.
pub fn negation_covers(negation: &[ValueKey], stored: &[ValueKey]) -> bool {
    negation.len() == stored.len()
        && negation.iter().zip(stored).all(|(n, s)| n.is_any() || n == s)
}

/// Where a fact came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactOrigin {
    pub rule: String,
    pub object: ObjectId,
    pub state: StateId,
    pub site: CallSiteId,
}

/// Published (or retracted) predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateFact {
    pub name: String,
    pub args: Vec<ValueKey>,

    /// Retraction of an earlier positive fact
    pub negated: bool,

    pub origin: FactOrigin,
}

impl fmt::Display for PredicateFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        if self.negated {
            write!(f, "!")?;
        }
        write!(f, "{}[{}]", self.name, args.join(", "))
    }
}

/// Fact with its position in publish order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactEvent {
    pub seq: u64,
    pub fact: PredicateFact,
}
