//! Qdrant vector store implementation
//!
//! Talks to Qdrant's REST API through the shared HTTP client seam. Transport
//! failures are folded into `SearchBackendUnavailable`; a turn either gets a
//! complete result set or a clean failure, never a partial one.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{
    CollectionInfo, FragmentPayload, PipelineError, ScopeFilter, SearchHit, VectorRecord,
    VectorStore,
};
use crate::infrastructure::http_client::HttpClientTrait;

/// Qdrant REST client.
#[derive(Debug)]
pub struct QdrantVectorStore<C: HttpClientTrait> {
    client: C,
    base_url: String,
    api_key: Option<String>,
}

impl<C: HttpClientTrait> QdrantVectorStore<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/collections/{}", self.base_url, collection)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];

        if let Some(ref api_key) = self.api_key {
            headers.push(("api-key", api_key.as_str()));
        }

        headers
    }

    fn unavailable(error: PipelineError) -> PipelineError {
        match error {
            PipelineError::Transport { message } => {
                PipelineError::search_backend_unavailable(message)
            }
            other => other,
        }
    }

    fn scope_condition(scope: &ScopeFilter) -> serde_json::Value {
        let (field, value) = scope.field_match();

        serde_json::json!({
            "must": [{"key": field, "match": {"value": value}}]
        })
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorStore for QdrantVectorStore<C> {
    async fn describe_collection(
        &self,
        collection: &str,
    ) -> Result<Option<CollectionInfo>, PipelineError> {
        let json = self
            .client
            .get_json(&self.collection_url(collection), self.headers())
            .await
            .map_err(Self::unavailable)?;

        let Some(json) = json else {
            return Ok(None);
        };

        let described: DescribeResponse = serde_json::from_value(json).map_err(|e| {
            PipelineError::search_backend_unavailable(format!(
                "Failed to parse collection info: {}",
                e
            ))
        })?;

        Ok(Some(CollectionInfo {
            points_count: described.result.points_count.unwrap_or(0),
            dimensions: described.result.config.params.vectors.size,
        }))
    }

    async fn create_collection(
        &self,
        collection: &str,
        dimensions: usize,
    ) -> Result<(), PipelineError> {
        let body = serde_json::json!({
            "vectors": {"size": dimensions, "distance": "Cosine"}
        });

        self.client
            .put_json(&self.collection_url(collection), self.headers(), &body)
            .await
            .map_err(Self::unavailable)?;

        Ok(())
    }

    async fn create_field_index(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<(), PipelineError> {
        let url = format!("{}/index", self.collection_url(collection));
        let body = serde_json::json!({
            "field_name": field,
            "field_schema": "keyword",
        });

        match self.client.put_json(&url, self.headers(), &body).await {
            Ok(_) => Ok(()),
            // Re-provisioning an existing index is a no-op, not a failure.
            Err(e) if e.to_string().to_lowercase().contains("already exists") => Ok(()),
            Err(e) => Err(Self::unavailable(e)),
        }
    }

    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        scope: &ScopeFilter,
        limit: usize,
    ) -> Result<Vec<SearchHit>, PipelineError> {
        let url = format!("{}/points/search", self.collection_url(collection));
        let body = serde_json::json!({
            "vector": vector,
            "filter": Self::scope_condition(scope),
            "limit": limit,
            "with_payload": true,
        });

        let json = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(Self::unavailable)?;

        let response: SearchResponse = serde_json::from_value(json).map_err(|e| {
            PipelineError::search_backend_unavailable(format!(
                "Failed to parse search response: {}",
                e
            ))
        })?;

        let mut hits = Vec::with_capacity(response.result.len());

        for point in response.result {
            let payload: FragmentPayload =
                serde_json::from_value(point.payload).map_err(|e| {
                    PipelineError::search_backend_unavailable(format!(
                        "Malformed fragment payload: {}",
                        e
                    ))
                })?;

            hits.push(SearchHit {
                id: point_id_string(&point.id),
                score: point.score,
                payload,
            });
        }

        Ok(hits)
    }

    async fn upsert(
        &self,
        collection: &str,
        records: Vec<VectorRecord>,
    ) -> Result<(), PipelineError> {
        let points: Vec<serde_json::Value> = records
            .into_iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.id,
                    "vector": r.vector,
                    "payload": r.payload,
                })
            })
            .collect();

        let url = format!("{}/points", self.collection_url(collection));
        let body = serde_json::json!({"points": points});

        self.client
            .put_json(&url, self.headers(), &body)
            .await
            .map_err(Self::unavailable)?;

        Ok(())
    }

    async fn delete_points(
        &self,
        collection: &str,
        ids: Vec<String>,
    ) -> Result<(), PipelineError> {
        let url = format!("{}/points/delete", self.collection_url(collection));
        let body = serde_json::json!({"points": ids});

        self.client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(Self::unavailable)?;

        Ok(())
    }

    async fn delete_by_scope(
        &self,
        collection: &str,
        scope: &ScopeFilter,
    ) -> Result<(), PipelineError> {
        let url = format!("{}/points/delete", self.collection_url(collection));
        let body = serde_json::json!({"filter": Self::scope_condition(scope)});

        self.client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(Self::unavailable)?;

        Ok(())
    }
}

fn point_id_string(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Qdrant REST response types

#[derive(Debug, Deserialize)]
struct DescribeResponse {
    result: DescribeResult,
}

#[derive(Debug, Deserialize)]
struct DescribeResult {
    points_count: Option<usize>,
    config: DescribeConfig,
}

#[derive(Debug, Deserialize)]
struct DescribeConfig {
    params: DescribeParams,
}

#[derive(Debug, Deserialize)]
struct DescribeParams {
    vectors: DescribeVectors,
}

#[derive(Debug, Deserialize)]
struct DescribeVectors {
    size: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    id: serde_json::Value,
    score: f32,
    payload: serde_json::Value,
}
