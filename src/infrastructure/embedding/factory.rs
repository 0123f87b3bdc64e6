//! Lazy construction of embedding provider clients
//!
//! The router defers client construction to first real use, so a configured
//! but never-queried provider costs nothing. Credentials are checked here:
//! a missing key fails construction, not the whole process.

use std::fmt::Debug;
use std::sync::Arc;

use crate::domain::{EmbeddingProvider, EmbeddingProviderKind, PipelineError};
use crate::infrastructure::http_client::HttpClient;

use super::openai::OpenAiEmbeddings;
use super::voyage::VoyageEmbeddings;

/// Builds an embedding client for a provider/model pair on demand.
pub trait EmbeddingProviderFactory: Send + Sync + Debug {
    fn create(
        &self,
        provider: EmbeddingProviderKind,
        model: &str,
    ) -> Result<Arc<dyn EmbeddingProvider>, PipelineError>;
}

/// Credentials for the embedding providers, usually read from the
/// environment at startup. `None` means the provider is not configured.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingCredentials {
    pub openai_api_key: Option<String>,
    pub voyage_api_key: Option<String>,
}

impl EmbeddingCredentials {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: non_empty(std::env::var("OPENAI_API_KEY").ok()),
            voyage_api_key: non_empty(std::env::var("VOYAGE_API_KEY").ok()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Factory producing real REST clients over a shared HTTP client.
#[derive(Debug)]
pub struct HttpEmbeddingProviderFactory {
    http: HttpClient,
    credentials: EmbeddingCredentials,
}

impl HttpEmbeddingProviderFactory {
    pub fn new(http: HttpClient, credentials: EmbeddingCredentials) -> Self {
        Self { http, credentials }
    }
}

impl EmbeddingProviderFactory for HttpEmbeddingProviderFactory {
    fn create(
        &self,
        provider: EmbeddingProviderKind,
        model: &str,
    ) -> Result<Arc<dyn EmbeddingProvider>, PipelineError> {
        match provider {
            EmbeddingProviderKind::OpenAi => {
                let api_key = self.credentials.openai_api_key.as_ref().ok_or_else(|| {
                    PipelineError::provider_not_configured(
                        "openai",
                        "OPENAI_API_KEY is not set",
                    )
                })?;

                Ok(Arc::new(OpenAiEmbeddings::new(
                    self.http.clone(),
                    api_key,
                    model,
                )))
            }
            EmbeddingProviderKind::Voyage => {
                let api_key = self.credentials.voyage_api_key.as_ref().ok_or_else(|| {
                    PipelineError::provider_not_configured(
                        "voyage",
                        "VOYAGE_API_KEY is not set",
                    )
                })?;

                Ok(Arc::new(VoyageEmbeddings::new(
                    self.http.clone(),
                    api_key,
                    model,
                )))
            }
        }
    }
}
