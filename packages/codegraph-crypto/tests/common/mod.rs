//! Common test utilities for codegraph-crypto
//!
//! Shared rule fixtures, a scenario builder over `AnalysisSession`, and
//! report assertions for the integration tests.

#![allow(dead_code)]

mod assertions;
mod builders;
mod fixtures;

// Re-export all utilities
pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
