//! Error types for codegraph-crypto
//!
//! Misuse findings are not errors: they are accumulated as violation
//! records. These errors cover misconfiguration and misuse of the session
//! API itself.

use crate::config::ConfigError;
use crate::features::extraction::OracleError;
use crate::features::rule_model::MalformedRuleError;
use crate::shared::models::ObjectId;
use thiserror::Error;

/// Main error type for codegraph-crypto operations
#[derive(Debug, Error)]
pub enum CryptoAnalysisError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rule rejected at load time
    #[error("Malformed rule: {0}")]
    MalformedRule(#[from] MalformedRuleError),

    /// Program analysis oracle failure
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// No loaded rule for the type
    #[error("No rule for type '{0}'")]
    UnknownRule(String),

    /// Object id not tracked in this session
    #[error("Unknown tracked object '{0}'")]
    UnknownObject(ObjectId),

    /// Object id already tracked in this session
    #[error("Object '{0}' is already tracked")]
    DuplicateObject(ObjectId),

    /// Worker pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl CryptoAnalysisError {
    /// Create a thread pool error
    pub fn thread_pool(msg: impl Into<String>) -> Self {
        CryptoAnalysisError::ThreadPool(msg.into())
    }
}

/// Result type alias for codegraph-crypto operations
pub type Result<T> = std::result::Result<T, CryptoAnalysisError>;
