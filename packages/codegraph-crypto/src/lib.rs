/*
 * Codegraph Crypto - Cryptographic API Misuse Detection
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (ObjectId, CallSiteBinding, ExtractedValue)
 * - features/    : Vertical slices (rule_model → typestate → constraints → predicates)
 * - pipeline/    : Session orchestration
 * - config/      : Presets, stage configs, YAML
 *
 * Evaluation:
 * - Usage automata per tracked object (ordering, forbidden calls)
 * - Three-valued constraint solving over extracted values
 * - Cross-object predicate facts keyed by value identity
 * - Rayon work-stealing across tracked objects
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Phase helpers take the session's parts by reference
#![allow(clippy::type_complexity)] // Listener and inbox types
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and constants
pub mod shared;

/// Feature modules (rule model, typestate, constraints, predicates)
pub mod features;

/// Session orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{EngineConfig, Preset};
pub use errors::{CryptoAnalysisError, Result};
pub use features::extraction::{BindingQuery, ProgramAnalysisOracle, RecordedOracle};
pub use features::reporting::{Violation, ViolationKind, ViolationReport};
pub use features::rule_model::{load_rules, Rule, RuleBuilder, RuleSet, RuleValidator};
pub use features::typestate::{ClassHierarchy, SubtypeOracle};
pub use pipeline::{AnalysisSession, PassSummary};
