

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use super::embeddings::{EmbeddingError, EmbeddingGenerator, Encoder};
use super::providers::base::{LlmProvider, LlmProviderError};
use super::providers::ollama::OllamaProvider;
use super::providers::openai::OpenAiProvider;
use crate::DEFAULT_OLLAMA_URL;
use crate::core::config::{EmbeddingConfig, LlmConfig};


pub struct LlmProviderFactory;

impl LlmProviderFactory {

    pub fn create(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmProviderError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        match config.provider.to_lowercase().as_str() {
            "ollama" => Ok(Arc::new(OllamaProvider::new(
                config.base_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL),
                config.model.clone(),
                config.temperature,
                timeout,
            )?)),
            "openai" => Ok(Arc::new(OpenAiProvider::new(
                config.api_key.clone().unwrap_or_default(),
                config.base_url.as_deref(),
                config.model.clone(),
                config.temperature,
                timeout,
            )?)),
            other => Err(LlmProviderError::Config(format!(
                "Unknown provider: {other}. Supported: ollama, openai"
            ))),
        }
    }
}


pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {

    pub fn from_config(config: &EmbeddingConfig) -> Result<Arc<dyn Encoder>, EmbeddingError> {
        Ok(Arc::new(EmbeddingGenerator::from_config(config)?))
    }

    /// The configured model followed by each distinct fallback model, all
    /// on the same provider and url.
    pub fn candidates(config: &EmbeddingConfig) -> Result<Vec<Arc<dyn Encoder>>, EmbeddingError> {
        let mut seen = HashSet::new();
        std::iter::once(&config.model)
            .chain(&config.fallback_models)
            .map(|m| m.trim())
            .filter(|m| !m.is_empty() && seen.insert(m.to_string()))
            .map(|model| {
                let config = EmbeddingConfig {
                    model: model.to_string(),
                    ..config.clone()
                };
                Self::from_config(&config)
            })
            .collect()
    }
}
