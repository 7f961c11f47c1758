//! Constraint domain models

mod partition;
mod requirement;
mod truth;

pub use partition::{Partition, PartitionPolicy};
pub use requirement::{RequiredPredicate, Requirement};
pub use truth::{Evaluation, Truth};
