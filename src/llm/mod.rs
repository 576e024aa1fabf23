pub mod anthropic;
pub mod config;
pub mod openai;
pub mod prompts;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use anthropic::AnthropicProvider;
pub use config::{Credential, CredentialError, CredentialMode, LlmConfig, ProviderKind};
pub use openai::OpenAiProvider;
pub use prompts::{ProviderPrompt, DELIMITER};
pub use service::{LlmService, LlmServiceError, Provider};
