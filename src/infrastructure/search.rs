//! Filtered nearest-neighbor search over the active collection

use std::sync::Arc;

use tracing::debug;

use crate::domain::normalize::normalize;
use crate::domain::{PipelineError, RetrievalResult, ScopeFilter, VectorStore};
use crate::infrastructure::router::EmbeddingRouter;

/// Candidates requested per result actually wanted. Backend-side score
/// cutoffs behave differently across providers, so the backend is asked for
/// a surplus and the threshold is always applied locally.
const OVERFETCH_FACTOR: usize = 3;

/// Issues scope-filtered similarity searches and applies the quality gate.
#[derive(Debug)]
pub struct VectorSearchEngine {
    router: Arc<EmbeddingRouter>,
    store: Arc<dyn VectorStore>,
}

impl VectorSearchEngine {
    pub fn new(router: Arc<EmbeddingRouter>, store: Arc<dyn VectorStore>) -> Self {
        Self { router, store }
    }

    /// Search the active collection.
    ///
    /// Returns at most `limit` results, all scoring at or above
    /// `score_threshold`, in the backend's relevance order. An empty result
    /// is a normal outcome, not an error.
    pub async fn search(
        &self,
        query: &str,
        scope: &ScopeFilter,
        limit: usize,
        score_threshold: f32,
    ) -> Result<Vec<RetrievalResult>, PipelineError> {
        let normalized = normalize(query);
        let vector = self.router.embed_query(&normalized).await?;
        let binding = self.router.binding().await?;

        let hits = self
            .store
            .search(&binding.collection, vector, scope, limit * OVERFETCH_FACTOR)
            .await?;

        let candidates = hits.len();
        let results: Vec<RetrievalResult> = hits
            .into_iter()
            .filter(|hit| hit.score >= score_threshold)
            .take(limit)
            .map(|hit| RetrievalResult::new(hit.payload, hit.score, normalized.clone()))
            .collect();

        debug!(
            collection = %binding.collection,
            candidates,
            kept = results.len(),
            score_threshold,
            "knowledge search completed"
        );

        Ok(results)
    }
}
