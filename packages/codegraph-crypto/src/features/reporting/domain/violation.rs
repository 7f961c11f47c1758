/*
 * Violation Records
 *
 * One record per detected misuse (or advisory). Records are accumulated,
 * never raised: a failing constraint does not stop its siblings.
 */

use crate::features::rule_model::domain::MalformedRuleError;
use crate::shared::models::{CallSiteId, ObjectId};
use serde::{Deserialize, Serialize};

/// Violation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Call not allowed by the usage automaton in the current state
    Ordering,

    /// Call to a forbidden method
    ForbiddenCall,

    /// Argument values fail a constraint
    Constraint,

    /// Required predicate never established
    MissingPredicate,

    /// Values could not be determined; advisory only
    ImpreciseValue,

    /// Object's life ended outside an accepting state
    IncompleteOperation,

    /// Rule rejected at load time
    MalformedRule,
}

impl ViolationKind {
    /// Counted as a misuse (advisories and load errors are not)
    pub fn is_hard_failure(&self) -> bool {
        !matches!(self, Self::ImpreciseValue | Self::MalformedRule)
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationKind::Ordering => write!(f, "Ordering Violation"),
            ViolationKind::ForbiddenCall => write!(f, "Forbidden Call"),
            ViolationKind::Constraint => write!(f, "Constraint Violation"),
            ViolationKind::MissingPredicate => write!(f, "Missing Predicate"),
            ViolationKind::ImpreciseValue => write!(f, "Imprecise Value"),
            ViolationKind::IncompleteOperation => write!(f, "Incomplete Operation"),
            ViolationKind::MalformedRule => write!(f, "Malformed Rule"),
        }
    }
}

/// Violation record
///
/// # Example
/// ```ignore
/// let v = Violation::ordering(
///     "javax.crypto.Cipher",
///     ObjectId::new("c@3"),
///     CallSiteId::new("Main.java:12"),
///     "doFinal",
///     vec!["init".to_string()],
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,

    /// Rule (type) the record belongs to
    pub rule: String,

    /// Tracked object, if the record concerns one
    pub object: Option<ObjectId>,

    /// Call sites involved, in observation order
    pub sites: Vec<CallSiteId>,

    /// Offending constraint, predicate, transition or method
    pub subject: Option<String>,

    /// Expected methods, or suggested replacements
    pub expected: Vec<String>,

    /// Human-readable message
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            rule: rule.into(),
            object: None,
            sites: Vec::new(),
            subject: None,
            expected: Vec::new(),
            message: message.into(),
        }
    }

    pub fn on_object(mut self, object: ObjectId) -> Self {
        self.object = Some(object);
        self
    }

    pub fn at(mut self, site: CallSiteId) -> Self {
        if !self.sites.contains(&site) {
            self.sites.push(site);
        }
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_expected(mut self, expected: Vec<String>) -> Self {
        self.expected = expected;
        self
    }

    /// Call that the automaton does not allow from the current states
    pub fn ordering(
        rule: impl Into<String>,
        object: ObjectId,
        site: CallSiteId,
        called: &str,
        expected: Vec<String>,
    ) -> Self {
        let message = if expected.is_empty() {
            format!("Unexpected call to {}; no further calls are allowed", called)
        } else {
            format!(
                "Unexpected call to {}; expected one of: {}",
                called,
                expected.join(", ")
            )
        };
        Self::new(ViolationKind::Ordering, rule, message)
            .on_object(object)
            .at(site)
            .with_subject(called)
            .with_expected(expected)
    }

    pub fn forbidden(
        rule: impl Into<String>,
        object: ObjectId,
        site: CallSiteId,
        method: &str,
        alternatives: Vec<String>,
    ) -> Self {
        let message = if alternatives.is_empty() {
            format!("Call to forbidden method {}", method)
        } else {
            format!(
                "Call to forbidden method {}; use {} instead",
                method,
                alternatives.join(" or ")
            )
        };
        Self::new(ViolationKind::ForbiddenCall, rule, message)
            .on_object(object)
            .at(site)
            .with_subject(method)
            .with_expected(alternatives)
    }

    pub fn constraint(
        rule: impl Into<String>,
        object: ObjectId,
        constraint: &str,
        sites: Vec<CallSiteId>,
    ) -> Self {
        let mut v = Self::new(
            ViolationKind::Constraint,
            rule,
            format!("Constraint {} is violated", constraint),
        )
        .on_object(object)
        .with_subject(constraint);
        for site in sites {
            v = v.at(site);
        }
        v
    }

    pub fn missing_predicate(
        rule: impl Into<String>,
        object: ObjectId,
        predicate: &str,
        anchor: Option<CallSiteId>,
    ) -> Self {
        let v = Self::new(
            ViolationKind::MissingPredicate,
            rule,
            format!("Required predicate {} is never established", predicate),
        )
        .on_object(object)
        .with_subject(predicate);
        match anchor {
            Some(site) => v.at(site),
            None => v,
        }
    }

    pub fn imprecise(
        rule: impl Into<String>,
        object: ObjectId,
        subject: &str,
        sites: Vec<CallSiteId>,
    ) -> Self {
        let mut v = Self::new(
            ViolationKind::ImpreciseValue,
            rule,
            format!("Could not determine values to check {}", subject),
        )
        .on_object(object)
        .with_subject(subject);
        for site in sites {
            v = v.at(site);
        }
        v
    }

    pub fn incomplete(
        rule: impl Into<String>,
        object: ObjectId,
        last_site: Option<CallSiteId>,
        expected: Vec<String>,
    ) -> Self {
        let v = Self::new(
            ViolationKind::IncompleteOperation,
            rule,
            format!(
                "Operation not completed; missing call to one of: {}",
                expected.join(", ")
            ),
        )
        .on_object(object)
        .with_expected(expected);
        match last_site {
            Some(site) => v.at(site),
            None => v,
        }
    }

    pub fn malformed(error: &MalformedRuleError) -> Self {
        Self::new(ViolationKind::MalformedRule, error.rule_name(), error.to_string())
    }

    /// Format for display
    pub fn format_message(&self) -> String {
        match (&self.object, self.sites.first()) {
            (Some(object), Some(site)) => format!(
                "[{}] {} on '{}' at {}: {}",
                self.rule, self.kind, object, site, self.message
            ),
            (Some(object), None) => {
                format!("[{}] {} on '{}': {}", self.rule, self.kind, object, self.message)
            }
            _ => format!("[{}] {}: {}", self.rule, self.kind, self.message),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_message())
    }
}
