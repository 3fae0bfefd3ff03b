//! Combines one or more named question sets into a single pool.

use futures::future::join_all;

use crate::gateway::Gateway;
use crate::model::{Question, SourceSelection};

/// An assembled pool plus the sources that had to be served from the
/// fallback set.
#[derive(Debug, Clone, Default)]
pub struct Pool {
    pub questions: Vec<Question>,
    pub fallback_sources: Vec<String>,
}

/// Loads pools through a [`Gateway`]. Never fails and never drops a source.
#[derive(Clone)]
pub struct Aggregator {
    gateway: Gateway,
}

impl Aggregator {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Load the questions for `selection`, in source order.
    pub async fn load(&self, selection: &SourceSelection) -> Vec<Question> {
        self.load_pool(selection).await.questions
    }

    /// Load the questions for `selection` and report fallback substitutions.
    ///
    /// For [`SourceSelection::All`] the catalogued sources are fetched
    /// concurrently; the concatenation still follows catalog order.
    pub async fn load_pool(&self, selection: &SourceSelection) -> Pool {
        let names: Vec<&str> = match selection {
            SourceSelection::All => self.gateway.catalog().names().collect(),
            SourceSelection::Named(name) => vec![name.as_str()],
        };

        let sets = join_all(names.iter().map(|name| self.gateway.fetch(name))).await;

        let mut pool = Pool::default();
        for set in sets {
            if set.is_fallback() {
                pool.fallback_sources.push(set.name.clone());
            }
            pool.questions.extend(set.questions);
        }

        tracing::info!(
            selection = %selection,
            questions = pool.questions.len(),
            fallbacks = pool.fallback_sources.len(),
            "question pool assembled"
        );
        pool
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::error::FetchError;
    use crate::model::SourceCatalog;
    use crate::traits::QuestionSource;

    /// Serves `count` questions per known name; unknown names fail. Delays
    /// are inverted relative to catalog order so concurrent completion order
    /// differs from the concatenation order.
    struct Sets(HashMap<String, (usize, u64)>);

    #[async_trait]
    impl QuestionSource for Sets {
        fn name(&self) -> &str {
            "sets"
        }

        async fn fetch_raw(&self, set_name: &str) -> Result<Vec<serde_json::Value>, FetchError> {
            let (count, delay_ms) = self
                .0
                .get(set_name)
                .copied()
                .ok_or_else(|| FetchError::NotFound(set_name.to_string()))?;
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok((0..count)
                .map(|i| json!({"id": format!("{set_name}-{i}"), "question": "?"}))
                .collect())
        }
    }

    fn aggregator(sets: &[(&str, usize, u64)]) -> Aggregator {
        let source = Sets(
            sets.iter()
                .map(|(n, c, d)| (n.to_string(), (*c, *d)))
                .collect(),
        );
        Aggregator::new(Gateway::new(Arc::new(source), SourceCatalog::default()))
    }

    #[tokio::test]
    async fn all_sources_concatenate_in_catalog_order() {
        let agg = aggregator(&[("NI", 2, 30), ("K", 1, 20), ("EX", 3, 0)]);
        let questions = agg.load(&SourceSelection::All).await;
        let ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["NI-0", "NI-1", "K-0", "EX-0", "EX-1", "EX-2"]);
    }

    #[tokio::test]
    async fn failed_source_is_replaced_not_dropped() {
        let agg = aggregator(&[("NI", 2, 0), ("EX", 1, 0)]);
        let pool = agg.load_pool(&SourceSelection::All).await;
        assert_eq!(pool.fallback_sources, vec!["K".to_string()]);
        assert_eq!(pool.questions.len(), 2 + 5 + 1);
        assert_eq!(pool.questions[2].id, "K-001");
        assert_eq!(pool.questions[2].source, "Kelson");
    }

    #[tokio::test]
    async fn single_source_is_returned_in_order() {
        let agg = aggregator(&[("K", 4, 0)]);
        let questions = agg.load(&SourceSelection::Named("K".into())).await;
        let ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["K-0", "K-1", "K-2", "K-3"]);
    }

    #[tokio::test]
    async fn single_failing_source_yields_fallback() {
        let agg = aggregator(&[]);
        let pool = agg.load_pool(&SourceSelection::Named("K".into())).await;
        assert_eq!(pool.questions.len(), 5);
        assert_eq!(pool.fallback_sources, vec!["K".to_string()]);
    }
}
