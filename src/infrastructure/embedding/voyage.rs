//! Voyage AI embedding provider implementation
//!
//! Voyage embeds queries and documents asymmetrically; the `input_type` field
//! tells the API which side of the retrieval pair it is producing.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{EmbeddingProvider, PipelineError};
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_VOYAGE_BASE_URL: &str = "https://api.voyageai.com";

/// Voyage embedding provider, pinned to one model at construction.
#[derive(Debug)]
pub struct VoyageEmbeddings<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> VoyageEmbeddings<C> {
    pub fn new(client: C, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, model, DEFAULT_VOYAGE_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    async fn request_embeddings(
        &self,
        inputs: &[String],
        input_type: &str,
    ) -> Result<Vec<Vec<f32>>, PipelineError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": inputs,
            "input_type": input_type,
        });

        let json = self
            .client
            .post_json(&self.embeddings_url(), self.headers(), &body)
            .await?;

        let response: VoyageEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            PipelineError::transport(format!("Failed to parse embedding response: {}", e))
        })?;

        let mut data = response.data;
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for VoyageEmbeddings<C> {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, PipelineError> {
        let mut vectors = self
            .request_embeddings(&[text.to_string()], "query")
            .await?;

        vectors
            .pop()
            .ok_or_else(|| PipelineError::transport("Voyage returned no embeddings"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self.request_embeddings(texts, "document").await?;

        if vectors.len() != texts.len() {
            return Err(PipelineError::transport(format!(
                "Voyage returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }

        Ok(vectors)
    }

    fn provider_name(&self) -> &'static str {
        "voyage"
    }
}

// Voyage API response types for embeddings

#[derive(Debug, Deserialize)]
struct VoyageEmbeddingResponse {
    data: Vec<VoyageEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct VoyageEmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}
