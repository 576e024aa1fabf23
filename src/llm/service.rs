use crate::llm::anthropic::AnthropicProvider;
use crate::llm::config::{LlmConfig, ProviderKind};
use crate::llm::openai::OpenAiProvider;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur in LLM service
#[derive(Debug, Error)]
pub enum LlmServiceError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Request timeout after {0}s")]
    Timeout(u64),
}

/// A hosted model that turns one prompt into one block of text
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a single user prompt and return the text of the first content block.
    async fn complete(
        &self,
        prompt: &str,
        api_key: &str,
        max_tokens: u32,
    ) -> Result<String, LlmServiceError>;

    /// Get provider name
    fn name(&self) -> &'static str;
}

/// Service for interacting with LLM APIs
pub struct LlmService {
    provider: Arc<dyn Provider>,
    config: LlmConfig,
}

impl LlmService {
    /// Create a new LLM service from configuration
    pub fn new(config: LlmConfig) -> Result<Self, LlmServiceError> {
        let provider: Arc<dyn Provider> = match config.provider {
            ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(&config)?),
            ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(&config)),
        };
        Self::with_provider(config, provider)
    }

    /// Create a service around an already-built provider
    pub fn with_provider(config: LlmConfig, provider: Arc<dyn Provider>) -> Result<Self, LlmServiceError> {
        config.validate().map_err(LlmServiceError::ConfigError)?;
        Ok(Self { provider, config })
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Send a prompt with the configured output bound
    pub async fn complete(&self, prompt: &str, api_key: &str) -> Result<String, LlmServiceError> {
        self.complete_with_limit(prompt, api_key, self.config.max_tokens).await
    }

    /// Send a prompt with an explicit output bound, under the configured timeout
    pub async fn complete_with_limit(
        &self,
        prompt: &str,
        api_key: &str,
        max_tokens: u32,
    ) -> Result<String, LlmServiceError> {
        if self.config.debug {
            tracing::debug!(
                "Sending request to {}: model={}, prompt_chars={}, max_tokens={}",
                self.provider.name(),
                self.config.model,
                prompt.len(),
                max_tokens
            );
        }

        let content = tokio::time::timeout(
            self.config.timeout(),
            self.provider.complete(prompt, api_key, max_tokens),
        )
        .await
        .map_err(|_| LlmServiceError::Timeout(self.config.timeout_secs))??;

        if self.config.debug {
            tracing::debug!("Received response: {} chars", content.len());
        }

        Ok(content)
    }
}
