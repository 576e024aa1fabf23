use crate::llm::config::LlmConfig;
use crate::llm::service::{LlmServiceError, Provider};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;

/// OpenAI chat completions client
pub struct OpenAiProvider {
    model: String,
    api_base: Option<String>,
    temperature: Option<f32>,
}

impl OpenAiProvider {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            api_base: config.api_base.clone(),
            temperature: config.temperature,
        }
    }

    // The key can change between calls, so the client is built per request.
    fn client(&self, api_key: &str) -> Client<OpenAIConfig> {
        let mut openai_config = OpenAIConfig::new().with_api_key(api_key);

        if let Some(api_base) = &self.api_base {
            openai_config = openai_config.with_api_base(api_base);
        }

        // Failures are reported once; async-openai would otherwise retry 5xx and 429.
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Client::with_config(openai_config).with_backoff(no_retry)
    }
}

/// Newer models (gpt-4o, gpt-4-turbo, gpt-5) only accept the default temperature
fn supports_temperature(model: &str) -> bool {
    let model_lower = model.to_lowercase();
    !(model_lower.contains("gpt-4o")
        || model_lower.contains("gpt-4-turbo")
        || model_lower.contains("gpt-5"))
}

fn classify_error(error: OpenAIError) -> LlmServiceError {
    let message = error.to_string();
    match error {
        OpenAIError::ApiError(api_error)
            if api_error.code.as_deref() == Some("invalid_api_key")
                || message.contains("Incorrect API key") =>
        {
            LlmServiceError::AuthError(message)
        }
        _ => LlmServiceError::ApiError(message),
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(
        &self,
        prompt: &str,
        api_key: &str,
        max_tokens: u32,
    ) -> Result<String, LlmServiceError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.to_string())
            .build()
            .map(ChatCompletionRequestMessage::User)
            .map_err(|e| LlmServiceError::ApiError(e.to_string()))?;

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder
            .model(&self.model)
            .messages(vec![message])
            .max_completion_tokens(max_tokens);

        if let Some(temperature) = self.temperature {
            if supports_temperature(&self.model) {
                request_builder.temperature(temperature);
            } else {
                tracing::debug!(
                    "Skipping temperature parameter for model {} (uses default 1.0)",
                    self.model
                );
            }
        }

        let request = request_builder
            .build()
            .map_err(|e| LlmServiceError::ApiError(e.to_string()))?;

        let response = self
            .client(api_key)
            .chat()
            .create(request)
            .await
            .map_err(classify_error)?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmServiceError::ParseError("No response content".to_string()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
