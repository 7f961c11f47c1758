//! Constraint application layer

mod evaluator;
mod partitioner;
mod solver;

pub use evaluator::ConstraintEvaluator;
pub use partitioner::{collapse_alternatives, ConstraintPartitioner};
pub use solver::{ConstraintConfig, ConstraintSolver, SolverOutcome};
