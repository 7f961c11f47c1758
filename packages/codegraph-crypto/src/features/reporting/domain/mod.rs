/*
 * Reporting Domain
 */

mod report;
mod violation;

pub use report::ViolationReport;
pub use violation::{Violation, ViolationKind};
