/*
 * Method Signatures
 *
 * Label entries of the usage automaton and parameters of the call-related
 * built-in predicates.
 *
 * # Example
 * ```text
 * c = javax.crypto.Cipher.getInstance(java.lang.String transformation);
 * ```
 * - name: `javax.crypto.Cipher.getInstance` (declaring class + short name)
 * - params: `[(transformation, java.lang.String)]`, argument 0 binds the
 *   specification variable `transformation`
 * - return binding: `c`
 */

use crate::shared::constants::rule_names::{ANY_TYPE, NO_NAME, VOID};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// One parameter (or return binding) of a method signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodParam {
    /// Specification variable bound by this argument (`_` if unbound)
    pub name: String,

    /// Declared parameter type
    pub ty: String,
}

impl MethodParam {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// Unnamed, untyped binding (`_`)
    pub fn unnamed() -> Self {
        Self::new(NO_NAME, VOID)
    }

    pub fn is_bound(&self) -> bool {
        self.name != NO_NAME
    }
}

/// Method signature as written in a rule
///
/// Equality and hashing ignore the return binding: two labels naming the same
/// method with different result variables denote the same event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSignature {
    /// Fully-qualified method name
    pub name: String,

    pub params: Vec<MethodParam>,

    pub ret: MethodParam,
}

impl MethodSignature {
    /// Create signature from `(type, variable)` pairs
    ///
    /// # Example
    /// ```ignore
    /// let init = MethodSignature::new(
    ///     "javax.crypto.Cipher.init",
    ///     &[("int", "encmode"), ("java.security.Key", "key")],
    /// );
    /// ```
    pub fn new(name: impl Into<String>, params: &[(&str, &str)]) -> Self {
        Self {
            name: name.into(),
            params: params
                .iter()
                .map(|(ty, var)| MethodParam::new(*var, *ty))
                .collect(),
            ret: MethodParam::unnamed(),
        }
    }

    /// Bind the return value to a specification variable
    pub fn returning(mut self, var: impl Into<String>, ty: impl Into<String>) -> Self {
        self.ret = MethodParam::new(var, ty);
        self
    }

    /// Declaring class (prefix up to the last `.`)
    pub fn declaring_class(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) => &self.name[..idx],
            None => "",
        }
    }

    /// Short method name (suffix after the last `.`)
    pub fn short_name(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) => &self.name[idx + 1..],
            None => &self.name,
        }
    }

    pub fn param_types(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.ty.as_str())
    }

    /// Check parameter types against a call's argument types
    ///
    /// `AnyType` in the signature matches every argument type.
    pub fn params_match(&self, arg_types: &[String]) -> bool {
        self.params.len() == arg_types.len()
            && self
                .params
                .iter()
                .zip(arg_types)
                .all(|(p, a)| p.ty == ANY_TYPE || &p.ty == a)
    }

    /// Arguments that bind specification variables: `(index, variable)`
    pub fn bound_params(&self) -> impl Iterator<Item = (usize, &str)> {
        self.params
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_bound())
            .map(|(i, p)| (i, p.name.as_str()))
    }
}

impl PartialEq for MethodSignature {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl Eq for MethodSignature {}

impl Hash for MethodSignature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.params.hash(state);
    }
}

impl std::fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ret.is_bound() {
            write!(f, "{} = ", self.ret.name)?;
        }
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect();
        write!(f, "{}({});", self.name, params.join(", "))
    }
}
