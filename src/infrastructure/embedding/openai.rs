//! OpenAI embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{EmbeddingProvider, PipelineError};
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// OpenAI embedding provider, pinned to one model at construction.
#[derive(Debug)]
pub struct OpenAiEmbeddings<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> OpenAiEmbeddings<C> {
    pub fn new(client: C, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, model, DEFAULT_OPENAI_BASE_URL)
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
        input: serde_json::Value,
    ) -> Result<Vec<Vec<f32>>, PipelineError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": input,
        });

        let json = self
            .client
            .post_json(&self.embeddings_url(), self.headers(), &body)
            .await?;

        let response: OpenAiEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            PipelineError::transport(format!("Failed to parse embedding response: {}", e))
        })?;

        let mut data = response.data;
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddings<C> {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, PipelineError> {
        let mut vectors = self.request_embeddings(serde_json::json!(text)).await?;

        vectors
            .pop()
            .ok_or_else(|| PipelineError::transport("OpenAI returned no embeddings"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self.request_embeddings(serde_json::json!(texts)).await?;

        if vectors.len() != texts.len() {
            return Err(PipelineError::transport(format!(
                "OpenAI returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }

        Ok(vectors)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

// OpenAI API response types for embeddings

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    const TEST_URL: &str = "https://api.openai.com/v1/embeddings";

    fn mock_response(num_embeddings: usize, dimensions: usize) -> serde_json::Value {
        let data: Vec<serde_json::Value> = (0..num_embeddings)
            .map(|i| {
                let embedding: Vec<f32> = (0..dimensions).map(|j| (i + j) as f32 * 0.001).collect();
                serde_json::json!({"index": i, "embedding": embedding, "object": "embedding"})
            })
            .collect();

        serde_json::json!({
            "model": "text-embedding-3-large",
            "data": data,
            "usage": {"prompt_tokens": 10, "total_tokens": 10}
        })
    }

    #[tokio::test]
    async fn test_embed_query() {
        let client = MockHttpClient::new().with_response("POST", TEST_URL, mock_response(1, 3072));
        let provider = OpenAiEmbeddings::new(client, "test-key", "text-embedding-3-large");

        let vector = provider.embed_query("Hello world").await.unwrap();

        assert_eq!(vector.len(), 3072);
    }

    #[tokio::test]
    async fn test_embed_batch_preserves_input_order() {
        let client = MockHttpClient::new().with_response("POST", TEST_URL, mock_response(3, 8));
        let provider = OpenAiEmbeddings::new(client, "test-key", "text-embedding-3-large");

        let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let vectors = provider.embed_batch(&texts).await.unwrap();

        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0][0], 0.0);
        assert_eq!(vectors[1][0], 0.001);
    }

    #[tokio::test]
    async fn test_embed_batch_empty_input_skips_call() {
        let provider = OpenAiEmbeddings::new(MockHttpClient::new(), "test-key", "text-embedding-3-large");

        let vectors = provider.embed_batch(&[]).await.unwrap();

        assert!(vectors.is_empty());
    }

    #[tokio::test]
    async fn test_embed_error_surfaces() {
        let client = MockHttpClient::new().with_error("POST", TEST_URL, "HTTP 401: invalid key");
        let provider = OpenAiEmbeddings::new(client, "bad-key", "text-embedding-3-large");

        let result = provider.embed_query("Hello").await;

        assert!(matches!(result, Err(PipelineError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_custom_base_url() {
        let custom_url = "http://localhost:8080/v1/embeddings";
        let client = MockHttpClient::new().with_response("POST", custom_url, mock_response(1, 8));
        let provider = OpenAiEmbeddings::with_base_url(
            client,
            "test-key",
            "text-embedding-3-large",
            "http://localhost:8080",
        );

        assert!(provider.embed_query("Test").await.is_ok());
    }
}
