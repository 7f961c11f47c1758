/*
 * Extraction Ports
 *
 * Boundary to the program analysis oracle (points-to / alias analysis and
 * constant extraction). The engine never computes values itself.
 */

use crate::features::extraction::domain::BindingQuery;
use crate::shared::models::ExtractedValue;
use async_trait::async_trait;
use thiserror::Error;

/// Oracle failure for one query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Cannot resolve {query}: {message}")]
    Failed { query: String, message: String },
}

/// Program analysis oracle
///
/// Answers binding queries, possibly asynchronously. A failed query is
/// treated as unresolvable, never as a violation.
#[async_trait]
pub trait ProgramAnalysisOracle: Send + Sync {
    async fn resolve_binding(&self, query: &BindingQuery)
        -> Result<Vec<ExtractedValue>, OracleError>;
}
