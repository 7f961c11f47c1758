/*
 * Violation Report
 *
 * The externally observable result of a session: all records, partitioned
 * by kind. Recording is idempotent per (kind, rule, object, subject, sites);
 * advisories are kept once per (rule, object, subject) regardless of site.
 */

use super::violation::{Violation, ViolationKind};
use crate::shared::models::{CallSiteId, ObjectId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RecordKey {
    kind: ViolationKind,
    rule: String,
    object: Option<ObjectId>,
    subject: Option<String>,
    sites: Vec<CallSiteId>,
}

impl RecordKey {
    fn of(v: &Violation) -> Self {
        let sites = if v.kind == ViolationKind::ImpreciseValue {
            Vec::new()
        } else {
            v.sites.clone()
        };
        Self {
            kind: v.kind,
            rule: v.rule.clone(),
            object: v.object.clone(),
            subject: v.subject.clone(),
            sites,
        }
    }
}

/// Accumulated violation records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViolationReport {
    records: Vec<Violation>,

    #[serde(skip)]
    seen: FxHashSet<RecordKey>,
}

impl ViolationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation; returns `false` if an equivalent record exists
    pub fn record(&mut self, violation: Violation) -> bool {
        if self.seen.is_empty() && !self.records.is_empty() {
            // deserialized report: rebuild the index lazily
            self.seen = self.records.iter().map(RecordKey::of).collect();
        }
        if self.seen.insert(RecordKey::of(&violation)) {
            self.records.push(violation);
            true
        } else {
            false
        }
    }

    /// Record many; returns the number of new records
    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) -> usize {
        violations
            .into_iter()
            .map(|v| self.record(v))
            .filter(|added| *added)
            .count()
    }

    /// Merge another report
    pub fn merge(&mut self, other: ViolationReport) -> usize {
        self.extend(other.records)
    }

    pub fn records(&self) -> &[Violation] {
        &self.records
    }

    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.records.iter().filter(move |v| v.kind == kind)
    }

    pub fn count(&self, kind: ViolationKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Records partitioned by kind
    pub fn by_kind(&self) -> BTreeMap<ViolationKind, Vec<&Violation>> {
        let mut partitioned: BTreeMap<ViolationKind, Vec<&Violation>> = BTreeMap::new();
        for v in &self.records {
            partitioned.entry(v.kind).or_default().push(v);
        }
        partitioned
    }

    pub fn for_object<'a>(&'a self, object: &'a ObjectId) -> impl Iterator<Item = &'a Violation> {
        self.records
            .iter()
            .filter(move |v| v.object.as_ref() == Some(object))
    }

    /// Number of misuse records (advisories and load errors excluded)
    pub fn hard_failure_count(&self) -> usize {
        self.records
            .iter()
            .filter(|v| v.kind.is_hard_failure())
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in a stable order (kind, rule, object, first site, subject)
    pub fn sorted(&self) -> Vec<&Violation> {
        let mut sorted: Vec<&Violation> = self.records.iter().collect();
        sorted.sort_by(|a, b| {
            (a.kind, &a.rule, &a.object, a.sites.first(), &a.subject).cmp(&(
                b.kind,
                &b.rule,
                &b.object,
                b.sites.first(),
                &b.subject,
            ))
        });
        sorted
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
