use serde::Deserialize;

use crate::domain::EmbeddingProviderKind;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub retrieval: RetrievalConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Vector store and embedding routing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Base collection name; the active provider derives its own from it.
    pub collection: String,
    pub qdrant_url: String,
    /// Embedding provider activated at startup.
    pub provider: EmbeddingProviderKind,
    /// Embedding model; defaults to the provider's default model.
    pub model: Option<String>,
    /// Minimum similarity score a fragment needs to enter the context.
    pub score_threshold: f32,
}

/// Language-model service settings. The API key comes from the environment
/// (`OPENROUTER_API_KEY`), not from config files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Attribution headers sent to OpenRouter.
    pub site_url: String,
    pub site_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            collection: "support_knowledge".to_string(),
            qdrant_url: "http://localhost:6333".to_string(),
            provider: EmbeddingProviderKind::OpenAi,
            model: None,
            score_threshold: 0.3,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:3000".to_string(),
            site_name: "Support Widget".to_string(),
        }
    }
}

impl RetrievalConfig {
    /// The embedding model to activate, falling back to the provider default.
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
