//! Embedding provider trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use super::error::PipelineError;

/// A client for one embedding service (OpenAI or Voyage).
///
/// Query and document embedding are separate calls because some providers
/// embed them asymmetrically.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Embed a single search query.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, PipelineError>;

    /// Embed a batch of document texts, one vector per input in order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
