//! Predicates
//!
//! Named relations a rule ensures (or negates) for other rules, and requires
//! from them. Six names are reserved for built-ins that are resolved
//! structurally rather than through published facts.

use super::automaton::StateId;
use super::constraint::{Constraint, SpecObject};
use super::method::MethodSignature;
use crate::shared::constants::rule_names::BUILTIN_PREDICATES;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Reserved built-in predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinPredicate {
    CallTo,
    NoCallTo,
    NeverTypeOf,
    Length,
    NotHardCoded,
    InstanceOf,
}

impl BuiltinPredicate {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "callTo" => Some(Self::CallTo),
            "noCallTo" => Some(Self::NoCallTo),
            "neverTypeOf" => Some(Self::NeverTypeOf),
            "length" => Some(Self::Length),
            "notHardCoded" => Some(Self::NotHardCoded),
            "instanceOf" => Some(Self::InstanceOf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CallTo => "callTo",
            Self::NoCallTo => "noCallTo",
            Self::NeverTypeOf => "neverTypeOf",
            Self::Length => "length",
            Self::NotHardCoded => "notHardCoded",
            Self::InstanceOf => "instanceOf",
        }
    }
}

/// Predicate parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredicateParam {
    /// The tracked object itself
    This,

    /// `_`, matches any value
    Wildcard,

    Object(SpecObject),

    /// Method argument of `callTo` / `noCallTo`
    Method(MethodSignature),

    /// Type argument of `neverTypeOf` / `instanceOf`
    TypeName(String),
}

impl PredicateParam {
    pub fn object(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::Object(SpecObject::new(name, ty))
    }

    pub fn as_object(&self) -> Option<&SpecObject> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl fmt::Display for PredicateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::This => write!(f, "this"),
            Self::Wildcard => write!(f, "_"),
            Self::Object(o) => write!(f, "{}", o),
            Self::Method(m) => write!(f, "{}", m.short_name()),
            Self::TypeName(t) => write!(f, "{}", t),
        }
    }
}

/// Named relation over specification variables
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    pub name: String,
    pub params: Vec<PredicateParam>,
    pub negated: bool,

    /// The predicate only applies while this constraint holds
    pub guard: Option<Box<Constraint>>,
}

impl Predicate {
    pub fn new(name: impl Into<String>, params: Vec<PredicateParam>) -> Self {
        Self {
            name: name.into(),
            params,
            negated: false,
            guard: None,
        }
    }

    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn guarded_by(mut self, guard: Constraint) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    /// `callTo[m1, m2, ...]`
    pub fn call_to(methods: Vec<MethodSignature>) -> Self {
        Self::new("callTo", methods.into_iter().map(PredicateParam::Method).collect())
    }

    /// `noCallTo[m1, m2, ...]`
    pub fn no_call_to(methods: Vec<MethodSignature>) -> Self {
        Self::new("noCallTo", methods.into_iter().map(PredicateParam::Method).collect())
    }

    /// `neverTypeOf[x, T]`
    pub fn never_type_of(var: SpecObject, ty: impl Into<String>) -> Self {
        Self::new(
            "neverTypeOf",
            vec![PredicateParam::Object(var), PredicateParam::TypeName(ty.into())],
        )
    }

    /// `instanceOf[x, T]`
    pub fn instance_of(var: SpecObject, ty: impl Into<String>) -> Self {
        Self::new(
            "instanceOf",
            vec![PredicateParam::Object(var), PredicateParam::TypeName(ty.into())],
        )
    }

    /// `length[x]`
    pub fn length(var: SpecObject) -> Self {
        Self::new("length", vec![PredicateParam::Object(var)])
    }

    /// `notHardCoded[x]`
    pub fn not_hard_coded(var: SpecObject) -> Self {
        Self::new("notHardCoded", vec![PredicateParam::Object(var)])
    }

    pub fn builtin(&self) -> Option<BuiltinPredicate> {
        BuiltinPredicate::from_name(&self.name)
    }

    pub fn is_builtin(&self) -> bool {
        BUILTIN_PREDICATES.contains(&self.name.as_str())
    }

    /// Variables this predicate mentions
    ///
    /// `this`, `_`, method and type arguments are not variables.
    pub fn involved_var_names(&self) -> BTreeSet<String> {
        self.params
            .iter()
            .filter_map(PredicateParam::as_object)
            .map(|o| o.name.clone())
            .collect()
    }

    /// Same relation ignoring negation and guard
    pub fn same_relation(&self, other: &Predicate) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        if self.negated {
            write!(f, "!")?;
        }
        write!(f, "{}[{}]", self.name, params.join(", "))
    }
}

/// Disjunctive requirement: any member satisfies it
///
/// Membership is a set: equality ignores member order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativePredicate {
    members: Vec<Predicate>,
}

impl AlternativePredicate {
    pub fn new(first: Predicate) -> Self {
        Self {
            members: vec![first],
        }
    }

    /// Add member (duplicates are ignored)
    pub fn add(&mut self, alternative: Predicate) {
        if !self.members.contains(&alternative) {
            self.members.push(alternative);
        }
    }

    pub fn members(&self) -> &[Predicate] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl PartialEq for AlternativePredicate {
    fn eq(&self, other: &Self) -> bool {
        let mine: HashSet<&Predicate> = self.members.iter().collect();
        let theirs: HashSet<&Predicate> = other.members.iter().collect();
        mine == theirs
    }
}

impl Eq for AlternativePredicate {}

impl fmt::Display for AlternativePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<String> = self.members.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", members.join(" || "))
    }
}

/// Predicate a rule ensures (or negates, if `predicate.negated`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsuredPredicate {
    pub predicate: Predicate,

    /// States the predicate is generated in; `None` means any accepting state
    pub states: Option<BTreeSet<StateId>>,
}

impl EnsuredPredicate {
    pub fn is_negation(&self) -> bool {
        self.predicate.negated
    }

    /// Does landing in `state` (with `accepting` flag) generate this predicate?
    pub fn generated_in(&self, state: &StateId, accepting: bool) -> bool {
        match &self.states {
            Some(states) => states.contains(state),
            None => accepting,
        }
    }
}
