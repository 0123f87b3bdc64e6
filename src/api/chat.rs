//! Chat and knowledge-search endpoints
//!
//! Deserialize, delegate, serialize - every decision lives in the service
//! layer. The chat endpoint cannot fail at the HTTP level because the
//! service always returns a well-formed response.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::domain::{AiConfig, AiResponse, RetrievalResult};

use super::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatGenerateRequest {
    pub message: String,
    pub widget_id: String,
    pub business_id: Option<String>,
    #[serde(default)]
    pub ai_config: AiConfig,
}

pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<ChatGenerateRequest>,
) -> Json<AiResponse> {
    let response = state
        .chat
        .generate_response(
            &request.message,
            &request.widget_id,
            request.business_id.as_deref(),
            &request.ai_config,
        )
        .await;

    Json(response)
}

fn default_search_limit() -> usize {
    5
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSearchRequest {
    pub query: String,
    pub widget_id: String,
    pub business_id: Option<String>,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSearchResponse {
    pub success: bool,
    pub results: Vec<RetrievalResult>,
    pub query: String,
    pub total_results: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: String,
}

pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<KnowledgeSearchRequest>,
) -> impl IntoResponse {
    let results = state
        .chat
        .retrieve_context(
            &request.widget_id,
            request.business_id.as_deref(),
            &request.query,
            request.limit,
        )
        .await;

    match results {
        Ok(results) => {
            let body = KnowledgeSearchResponse {
                success: true,
                total_results: results.len(),
                results,
                query: request.query,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => {
            let body = ApiErrorResponse {
                success: false,
                error: error.to_string(),
            };
            (StatusCode::BAD_GATEWAY, Json(body)).into_response()
        }
    }
}
