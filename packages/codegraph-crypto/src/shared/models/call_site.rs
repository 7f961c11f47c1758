//! Call-Site Models
//!
//! Observed calls and call-site bindings produced by the program analysis
//! oracle. The engine only consumes these.

use super::value::ExtractedValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Call site identity (statement in the analyzed program)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallSiteId(pub String);

impl CallSiteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CallSiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tracked object identity within one analysis session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolved target of a call
///
/// `declaring_class` is the class the resolved method is declared on, which
/// for calls through a subtype may differ from the class named in a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalledMethod {
    pub declaring_class: String,
    pub name: String,
    pub param_types: Vec<String>,
}

impl CalledMethod {
    pub fn new(
        declaring_class: impl Into<String>,
        name: impl Into<String>,
        param_types: Vec<String>,
    ) -> Self {
        Self {
            declaring_class: declaring_class.into(),
            name: name.into(),
            param_types,
        }
    }

    /// Build from a fully-qualified name (`javax.crypto.Cipher.init`)
    pub fn qualified(fqn: &str, param_types: &[&str]) -> Self {
        let (class, name) = match fqn.rfind('.') {
            Some(idx) => (&fqn[..idx], &fqn[idx + 1..]),
            None => ("", fqn),
        };
        Self::new(
            class,
            name,
            param_types.iter().map(|t| t.to_string()).collect(),
        )
    }

    pub fn qualified_name(&self) -> String {
        if self.declaring_class.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.declaring_class, self.name)
        }
    }
}

impl fmt::Display for CalledMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.qualified_name(), self.param_types.join(", "))
    }
}

/// One observed call on a tracked object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObservedCall {
    pub site: CallSiteId,
    pub method: CalledMethod,

    /// Runtime/declared type of the receiver
    pub receiver_type: String,
}

impl ObservedCall {
    pub fn new(
        site: impl Into<String>,
        method: CalledMethod,
        receiver_type: impl Into<String>,
    ) -> Self {
        Self {
            site: CallSiteId::new(site),
            method,
            receiver_type: receiver_type.into(),
        }
    }
}

/// Which value of a call a binding refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BindingSlot {
    /// Argument at the given index
    Param(usize),

    /// Return value
    Return,
}

impl fmt::Display for BindingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Param(i) => write!(f, "arg{}", i),
            Self::Return => write!(f, "ret"),
        }
    }
}

/// Values resolved for one argument (or the return value) of one call
///
/// `(site, var_name, slot) → values`. Bindings are appended to a tracked
/// object's working set and never removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSiteBinding {
    pub site: CallSiteId,
    pub var_name: String,
    pub slot: BindingSlot,
    pub values: Vec<ExtractedValue>,
}

impl CallSiteBinding {
    pub fn new(
        site: impl Into<String>,
        var_name: impl Into<String>,
        param_index: usize,
        values: Vec<ExtractedValue>,
    ) -> Self {
        Self {
            site: CallSiteId::new(site),
            var_name: var_name.into(),
            slot: BindingSlot::Param(param_index),
            values,
        }
    }

    /// Binding of a call's return value
    pub fn returned(
        site: impl Into<String>,
        var_name: impl Into<String>,
        values: Vec<ExtractedValue>,
    ) -> Self {
        Self {
            site: CallSiteId::new(site),
            var_name: var_name.into(),
            slot: BindingSlot::Return,
            values,
        }
    }
}
