//! Shared module - Common types and constants
//!
//! Types shared by every feature: observed calls, call-site bindings and
//! extracted values. No feature depends on another feature through here.

pub mod constants;
pub mod models;

// Re-exports for convenience
pub use models::*;
