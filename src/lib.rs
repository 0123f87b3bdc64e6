//! Widget RAG API
//!
//! Retrieval-augmented AI backend for customer support chat widgets:
//! - multi-provider embedding routing (OpenAI / Voyage) over Qdrant
//! - filtered similarity search with local score gating
//! - prompt assembly with role presets and a knowledge block
//! - heuristic confidence scoring and human-handoff decisions

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use api::AppState;
use domain::{LlmProvider, VectorStore};
use infrastructure::{
    ChatService, EmbeddingCredentials, EmbeddingRouter, GenerationOrchestrator, HttpClient,
    HttpEmbeddingProviderFactory, OpenRouterProvider, QdrantVectorStore, VectorSearchEngine,
};

/// Timeout for outbound provider calls; the transport layer above owns
/// per-request deadlines.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Wire up the pipeline services and activate the configured embedding
/// provider. Fails when the vector store cannot be provisioned.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let http = HttpClient::with_timeout(PROVIDER_TIMEOUT);

    let store: Arc<dyn VectorStore> = {
        let mut store = QdrantVectorStore::new(http.clone(), &config.retrieval.qdrant_url);

        if let Ok(api_key) = std::env::var("QDRANT_API_KEY") {
            if !api_key.trim().is_empty() {
                store = store.with_api_key(api_key);
            }
        }

        Arc::new(store)
    };

    let factory = Arc::new(HttpEmbeddingProviderFactory::new(
        http.clone(),
        EmbeddingCredentials::from_env(),
    ));

    let router = Arc::new(EmbeddingRouter::new(
        factory,
        store.clone(),
        &config.retrieval.collection,
    ));
    router
        .set_provider(config.retrieval.provider, config.retrieval.model())
        .await
        .context("failed to activate the configured embedding provider")?;

    info!(
        provider = %config.retrieval.provider,
        model = config.retrieval.model(),
        "embedding routing ready"
    );

    let search = Arc::new(VectorSearchEngine::new(router, store));

    let openrouter_key =
        std::env::var("OPENROUTER_API_KEY").context("OPENROUTER_API_KEY is required")?;
    let llm: Arc<dyn LlmProvider> = Arc::new(
        OpenRouterProvider::new(http, openrouter_key)
            .with_attribution(&config.llm.site_url, &config.llm.site_name),
    );
    let generator = Arc::new(GenerationOrchestrator::new(llm));

    let chat = Arc::new(
        ChatService::new(search, generator)
            .with_score_threshold(config.retrieval.score_threshold),
    );

    Ok(AppState::new(chat))
}
