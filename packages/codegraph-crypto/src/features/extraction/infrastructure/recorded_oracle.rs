//! Recorded oracle
//!
//! Answers binding queries from precomputed extraction results, e.g. values
//! exported by an external analysis run, or fixtures in tests.

use crate::features::extraction::domain::BindingQuery;
use crate::features::extraction::ports::{OracleError, ProgramAnalysisOracle};
use crate::shared::models::{BindingSlot, CallSiteId, ExtractedValue};
use async_trait::async_trait;
use rustc_hash::FxHashMap;

/// In-memory oracle keyed by (call site, slot)
#[derive(Debug, Clone, Default)]
pub struct RecordedOracle {
    values: FxHashMap<(CallSiteId, BindingSlot), Vec<ExtractedValue>>,
}

impl RecordedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(
        mut self,
        site: impl Into<String>,
        slot: BindingSlot,
        values: Vec<ExtractedValue>,
    ) -> Self {
        self.values.insert((CallSiteId::new(site), slot), values);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl ProgramAnalysisOracle for RecordedOracle {
    async fn resolve_binding(
        &self,
        query: &BindingQuery,
    ) -> Result<Vec<ExtractedValue>, OracleError> {
        tokio::task::yield_now().await;
        self.values
            .get(&(query.site.clone(), query.slot))
            .cloned()
            .ok_or_else(|| OracleError::Failed {
                query: query.to_string(),
                message: "no recorded values".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::ObjectId;

    #[tokio::test]
    async fn test_recorded_values() {
        let oracle = RecordedOracle::new().with_values(
            "s1",
            BindingSlot::Param(0),
            vec![ExtractedValue::int(128)],
        );
        let hit = BindingQuery::new(
            ObjectId::new("kg"),
            CallSiteId::new("s1"),
            "keySize",
            BindingSlot::Param(0),
        );
        assert_eq!(
            oracle.resolve_binding(&hit).await.unwrap(),
            vec![ExtractedValue::int(128)]
        );

        let miss = BindingQuery::new(
            ObjectId::new("kg"),
            CallSiteId::new("s1"),
            "kg",
            BindingSlot::Return,
        );
        assert!(matches!(
            oracle.resolve_binding(&miss).await,
            Err(OracleError::Failed { .. })
        ));
    }
}
