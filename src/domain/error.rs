use thiserror::Error;

/// Errors produced by the retrieval and generation pipeline.
///
/// Everything here is caught at the chat-turn boundary and converted into a
/// failed [`AiResponse`](crate::domain::AiResponse); callers of the service
/// never see these directly.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Provider not configured: {provider} - {message}")]
    ProviderNotConfigured { provider: String, message: String },

    #[error("Dimension mismatch in collection '{collection}': expected {expected}, found {actual}")]
    DimensionMismatch {
        collection: String,
        expected: usize,
        actual: usize,
    },

    #[error("Search backend unavailable: {message}")]
    SearchBackendUnavailable { message: String },

    #[error("Generation error: {message}")]
    Generation { message: String, rate_limited: bool },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("HTTP transport error: {message}")]
    Transport { message: String },
}

impl PipelineError {
    pub fn provider_not_configured(
        provider: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ProviderNotConfigured {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn dimension_mismatch(
        collection: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::DimensionMismatch {
            collection: collection.into(),
            expected,
            actual,
        }
    }

    pub fn search_backend_unavailable(message: impl Into<String>) -> Self {
        Self::SearchBackendUnavailable {
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            rate_limited: false,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            rate_limited: true,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Whether this error is the rate-limited generation variant.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Self::Generation {
                rate_limited: true,
                ..
            }
        )
    }
}
