//! Configuration System
//!
//! Three levels, most users stop at the first:
//! - Level 1: Preset - `EngineConfig::preset(Preset::Fast)`
//! - Level 2: Stage override - closures over one stage config
//! - Level 3: YAML v1 - complete control from a file
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_crypto::config::{EngineConfig, Preset};
//!
//! let config = EngineConfig::preset(Preset::Balanced)
//!     .typestate(|mut c| { c.fuzzy_matching = false; c });
//!
//! let config = EngineConfig::from_yaml_file("crypto-audit.yaml")?;
//! ```

pub mod engine_config;
pub mod error;
pub mod io;
pub mod preset;
pub mod stage_configs;
pub mod validation;

// Re-exports
pub use engine_config::EngineConfig;
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigExportV1, ConfigOverrides};
pub use preset::Preset;
pub use stage_configs::ParallelConfig;
pub use validation::Validatable;
