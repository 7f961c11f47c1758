//! Extracted Value Models
//!
//! Values the program analysis oracle resolves for call-site arguments.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Constant value reaching a call-site argument
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstValue {
    Int(i64),
    Bool(bool),
    String(String),
    /// Array literal (e.g. `new byte[] {1, 2, 3}`)
    Array(Vec<ConstValue>),
    Null,
}

impl ConstValue {
    /// Numeric view of the value
    ///
    /// Strings holding a decimal integer are accepted, since constant
    /// folding frequently leaves key sizes as text.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Textual view of the value (strings and integers)
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Int(v) => Some(v.to_string()),
            Self::Bool(v) => Some(v.to_string()),
            _ => None,
        }
    }

    /// Length of a string or array constant
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::Array(items) => Some(items.len()),
            _ => None,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "\"{}\"", v),
            Self::Array(items) => write!(f, "[{} elements]", items.len()),
            Self::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for ConstValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for ConstValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

/// Identity of a program value (allocation site or abstract location)
///
/// Predicate facts are keyed by value identity, so two tracked objects that
/// see the same underlying value share facts regardless of variable names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueId(pub String);

impl ValueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the oracle knows about one argument value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueFact {
    /// Statically known literal (hard-coded in the program)
    Constant(ConstValue),

    /// A runtime object whose content is unknown but whose identity is
    Object(ValueId),

    /// Not statically determinable
    Unresolvable,
}

/// One value extracted for a call-site argument
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractedValue {
    pub fact: ValueFact,

    /// Static type of the value, when the oracle propagated one
    pub value_type: Option<String>,
}

impl ExtractedValue {
    pub fn constant(value: impl Into<ConstValue>) -> Self {
        Self {
            fact: ValueFact::Constant(value.into()),
            value_type: None,
        }
    }

    pub fn int(value: i64) -> Self {
        Self::constant(ConstValue::Int(value))
    }

    pub fn string(value: &str) -> Self {
        Self::constant(ConstValue::from(value))
    }

    pub fn object(id: impl Into<String>) -> Self {
        Self {
            fact: ValueFact::Object(ValueId::new(id)),
            value_type: None,
        }
    }

    pub fn unresolvable() -> Self {
        Self {
            fact: ValueFact::Unresolvable,
            value_type: None,
        }
    }

    /// Attach the propagated static type
    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.value_type = Some(ty.into());
        self
    }

    pub fn as_constant(&self) -> Option<&ConstValue> {
        match &self.fact {
            ValueFact::Constant(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self.fact, ValueFact::Unresolvable)
    }
}
