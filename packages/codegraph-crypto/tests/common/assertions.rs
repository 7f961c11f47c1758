//! Custom assertions for violation reports

use codegraph_crypto::shared::models::ObjectId;
use codegraph_crypto::{ViolationKind, ViolationReport};

/// Assert the report holds exactly `expected` records of `kind`
pub fn assert_kind_count(report: &ViolationReport, kind: ViolationKind, expected: usize) {
    assert_eq!(
        report.count(kind),
        expected,
        "Expected {expected} {kind} record(s), got:\n{}",
        describe(report)
    );
}

/// Assert the report holds no hard failures
pub fn assert_no_hard_failures(report: &ViolationReport) {
    assert_eq!(
        report.hard_failure_count(),
        0,
        "Expected no hard failures, got:\n{}",
        describe(report)
    );
}

/// Assert `object` has no records at all
pub fn assert_object_clean(report: &ViolationReport, object: &str) {
    let id = ObjectId::new(object);
    let records: Vec<String> = report.for_object(&id).map(|v| v.to_string()).collect();
    assert!(
        records.is_empty(),
        "Expected no records for {object}, got: {records:?}"
    );
}

pub fn describe(report: &ViolationReport) -> String {
    report
        .sorted()
        .iter()
        .map(|v| format!("  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
