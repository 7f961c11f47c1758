//! Rule
//!
//! One usage specification bound to a target type. Immutable after load and
//! shared by every tracked object of that type.

use super::automaton::UsageAutomaton;
use super::constraint::{Constraint, ExceptionConstraint};
use super::method::MethodSignature;
use super::predicate::EnsuredPredicate;
use serde::{Deserialize, Serialize};

/// Declared specification object (`name: type`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectDecl {
    pub name: String,
    pub ty: String,
}

/// Method that must never be called on the tracked type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenMethod {
    pub method: MethodSignature,

    /// Suggested replacements
    #[serde(default)]
    pub alternatives: Vec<MethodSignature>,

    /// Enforced through a `noCallTo` constraint; never reported on its own
    #[serde(default)]
    pub silent: bool,
}

/// Usage specification for one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Fully-qualified name of the specified type
    pub class_name: String,

    /// Object declarations in declaration order
    pub objects: Vec<ObjectDecl>,

    #[serde(default)]
    pub forbidden: Vec<ForbiddenMethod>,

    pub automaton: UsageAutomaton,

    #[serde(default)]
    pub constraints: Vec<Constraint>,

    /// Ensured and negated predicates
    #[serde(default)]
    pub predicates: Vec<EnsuredPredicate>,
}

impl Rule {
    /// Short class name, for messages
    pub fn simple_name(&self) -> &str {
        match self.class_name.rfind('.') {
            Some(idx) => &self.class_name[idx + 1..],
            None => &self.class_name,
        }
    }

    pub fn object_type(&self, name: &str) -> Option<&str> {
        self.objects
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.ty.as_str())
    }

    pub fn declares(&self, name: &str) -> bool {
        self.object_type(name).is_some()
    }

    /// Forbidden methods reported on their own
    pub fn reported_forbidden(&self) -> impl Iterator<Item = &ForbiddenMethod> {
        self.forbidden.iter().filter(|f| !f.silent)
    }

    pub fn ensured(&self) -> impl Iterator<Item = &EnsuredPredicate> {
        self.predicates.iter().filter(|p| !p.is_negation())
    }

    pub fn negated(&self) -> impl Iterator<Item = &EnsuredPredicate> {
        self.predicates.iter().filter(|p| p.is_negation())
    }

    /// Exception declarations for control-flow instrumentation
    pub fn exception_constraints(&self) -> impl Iterator<Item = &ExceptionConstraint> {
        self.constraints.iter().filter_map(|c| match c {
            Constraint::Exception(e) => Some(e),
            _ => None,
        })
    }
}
