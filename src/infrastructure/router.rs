//! Active embedding provider selection and collection provisioning
//!
//! The router owns the only shared mutable state in the pipeline: which
//! (provider, model, collection) binding is active. Provider switches are
//! rare administrative operations; turns snapshot the binding once and run
//! against that copy.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::{
    EmbeddingBinding, EmbeddingProvider, EmbeddingProviderKind, PipelineError, VectorStore,
};
use crate::infrastructure::embedding::EmbeddingProviderFactory;

/// Payload fields indexed for scope filtering at collection creation.
const SCOPE_INDEX_FIELDS: &[&str] = &["businessId", "widgetId"];

#[derive(Debug)]
struct RouterState {
    binding: EmbeddingBinding,
    /// Lazily constructed on first embed; a switch resets it so an unused
    /// provider never costs a client setup.
    client: Option<Arc<dyn EmbeddingProvider>>,
}

/// Routes embedding calls to the active provider and keeps the bound
/// collection provisioned.
#[derive(Debug)]
pub struct EmbeddingRouter {
    factory: Arc<dyn EmbeddingProviderFactory>,
    store: Arc<dyn VectorStore>,
    base_collection: String,
    state: RwLock<Option<RouterState>>,
}

impl EmbeddingRouter {
    pub fn new(
        factory: Arc<dyn EmbeddingProviderFactory>,
        store: Arc<dyn VectorStore>,
        base_collection: impl Into<String>,
    ) -> Self {
        Self {
            factory,
            store,
            base_collection: base_collection.into(),
            state: RwLock::new(None),
        }
    }

    /// Activate a provider/model pair.
    ///
    /// Idempotent for the already-active pair: no provisioning, no client
    /// reset. Otherwise resolves the target collection, ensures it exists
    /// with the model's dimension, and swaps the binding.
    pub async fn set_provider(
        &self,
        provider: EmbeddingProviderKind,
        model: &str,
    ) -> Result<(), PipelineError> {
        {
            let state = self.state.read().await;
            if let Some(ref active) = *state {
                if active.binding.matches(provider, model) {
                    return Ok(());
                }
            }
        }

        let binding = EmbeddingBinding::resolve(provider, model, &self.base_collection)?;
        self.ensure_collection(&binding).await?;

        let mut state = self.state.write().await;

        // A concurrent switch may have landed the same pair already.
        if let Some(ref active) = *state {
            if active.binding.matches(provider, model) {
                return Ok(());
            }
        }

        info!(
            provider = %binding.provider,
            model = %binding.model,
            collection = %binding.collection,
            "embedding provider activated"
        );
        *state = Some(RouterState {
            binding,
            client: None,
        });

        Ok(())
    }

    /// Immutable snapshot of the active binding for this turn.
    pub async fn binding(&self) -> Result<EmbeddingBinding, PipelineError> {
        let state = self.state.read().await;

        state
            .as_ref()
            .map(|s| s.binding.clone())
            .ok_or_else(|| PipelineError::configuration("no active embedding provider"))
    }

    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, PipelineError> {
        self.client().await?.embed_query(text).await
    }

    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError> {
        self.client().await?.embed_batch(texts).await
    }

    async fn ensure_collection(&self, binding: &EmbeddingBinding) -> Result<(), PipelineError> {
        match self.store.describe_collection(&binding.collection).await? {
            Some(info) => {
                if info.dimensions != binding.dimensions {
                    // Flagged but not fatal: reads against the existing
                    // collection keep working, writes are the admin's problem.
                    let mismatch = PipelineError::dimension_mismatch(
                        &binding.collection,
                        binding.dimensions,
                        info.dimensions,
                    );
                    warn!(error = %mismatch, "collection dimension differs from active model");
                }
            }
            None => {
                info!(
                    collection = %binding.collection,
                    dimensions = binding.dimensions,
                    "creating vector collection"
                );
                self.store
                    .create_collection(&binding.collection, binding.dimensions)
                    .await?;

                for field in SCOPE_INDEX_FIELDS {
                    self.store
                        .create_field_index(&binding.collection, field)
                        .await?;
                }
            }
        }

        Ok(())
    }

    async fn client(&self) -> Result<Arc<dyn EmbeddingProvider>, PipelineError> {
        {
            let state = self.state.read().await;
            match *state {
                Some(ref active) => {
                    if let Some(ref client) = active.client {
                        return Ok(client.clone());
                    }
                }
                None => {
                    return Err(PipelineError::configuration("no active embedding provider"))
                }
            }
        }

        let mut state = self.state.write().await;
        let Some(ref mut active) = *state else {
            return Err(PipelineError::configuration("no active embedding provider"));
        };

        if let Some(ref client) = active.client {
            return Ok(client.clone());
        }

        let client = self
            .factory
            .create(active.binding.provider, &active.binding.model)?;
        active.client = Some(client.clone());

        Ok(client)
    }
}
