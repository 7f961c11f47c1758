/*
 * Three-Valued Truth
 *
 * Constraint evaluation never collapses "could not determine" into False:
 * an Imprecise result becomes an advisory, a False result a violation.
 *
 * Connectives follow strong Kleene logic and short-circuit on the
 * deciding operand.
 */

use crate::shared::models::CallSiteId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of evaluating one constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Truth {
    True,
    False,
    Imprecise,
}

impl Truth {
    pub fn from_bool(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }

    pub fn is_true(self) -> bool {
        self == Self::True
    }

    pub fn is_false(self) -> bool {
        self == Self::False
    }

    pub fn not(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Imprecise => Self::Imprecise,
        }
    }

    /// `self && rhs`; `rhs` is not evaluated when `self` is False
    pub fn and_then(self, rhs: impl FnOnce() -> Truth) -> Self {
        match self {
            Self::False => Self::False,
            Self::True => rhs(),
            Self::Imprecise => match rhs() {
                Self::False => Self::False,
                _ => Self::Imprecise,
            },
        }
    }

    /// `self || rhs`; `rhs` is not evaluated when `self` is True
    pub fn or_else(self, rhs: impl FnOnce() -> Truth) -> Self {
        match self {
            Self::True => Self::True,
            Self::False => rhs(),
            Self::Imprecise => match rhs() {
                Self::True => Self::True,
                _ => Self::Imprecise,
            },
        }
    }

    /// `self => rhs`; `rhs` is not evaluated when `self` is False
    pub fn implies(self, rhs: impl FnOnce() -> Truth) -> Self {
        self.not().or_else(rhs)
    }

    /// Combine per-value results: all must hold
    pub fn all(results: impl IntoIterator<Item = Truth>) -> Self {
        let mut imprecise = false;
        for r in results {
            match r {
                Self::False => return Self::False,
                Self::Imprecise => imprecise = true,
                Self::True => {}
            }
        }
        if imprecise {
            Self::Imprecise
        } else {
            Self::True
        }
    }
}

impl fmt::Display for Truth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Truth::True => write!(f, "true"),
            Truth::False => write!(f, "false"),
            Truth::Imprecise => write!(f, "imprecise"),
        }
    }
}

/// Truth value plus the call sites that decided it
///
/// For False these are the sites that bound offending values, for
/// Imprecise the sites whose values could not be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub truth: Truth,
    pub sites: Vec<CallSiteId>,
}

impl Evaluation {
    pub fn new(truth: Truth) -> Self {
        Self {
            truth,
            sites: Vec::new(),
        }
    }

    pub fn holds() -> Self {
        Self::new(Truth::True)
    }

    pub fn at(mut self, site: &CallSiteId) -> Self {
        if !self.sites.contains(site) {
            self.sites.push(site.clone());
        }
        self
    }

    pub fn with_sites<'s>(mut self, sites: impl IntoIterator<Item = &'s CallSiteId>) -> Self {
        for site in sites {
            self = self.at(site);
        }
        self
    }
}
