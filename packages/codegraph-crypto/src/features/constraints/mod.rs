//! Constraints Module
//!
//! Partitioning and three-valued evaluation of rule constraints.
//!
//! ## Architecture
//!
//! ```text
//! constraints
//! ├── domain/          # Truth, Evaluation, Partition, RequiredPredicate
//! ├── ports/           # FactLookup (implemented by the predicate store)
//! └── application/     # partitioner, evaluator, solver
//! ```
//!
//! ## Outcome mapping
//!
//! | Direct constraint | Required predicate | Record            |
//! |-------------------|--------------------|-------------------|
//! | False             | no member holds    | Constraint / MissingPredicate |
//! | Imprecise         | no member decidable| ImpreciseValue    |

pub mod application;
pub mod domain;
pub mod ports;

pub use application::{
    collapse_alternatives, ConstraintConfig, ConstraintEvaluator, ConstraintPartitioner,
    ConstraintSolver, SolverOutcome,
};
pub use domain::{Evaluation, Partition, PartitionPolicy, RequiredPredicate, Requirement, Truth};
pub use ports::{FactLookup, NoFacts};
