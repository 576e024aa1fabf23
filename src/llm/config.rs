use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which hosted LLM answers the analysis prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
}

impl ProviderKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Some(Self::Anthropic),
            "openai" => Some(Self::OpenAi),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Anthropic => "claude-sonnet-4-20250514",
            Self::OpenAi => "gpt-4o",
        }
    }
}

/// Configuration for the LLM provider
///
/// The API key is deliberately not part of this struct; see [`Credential`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider to call
    pub provider: ProviderKind,

    /// Model identifier passed to the provider
    pub model: String,

    /// Optional API base URL for custom endpoints or proxies
    pub api_base: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum tokens the provider may generate
    pub max_tokens: u32,

    /// Sampling temperature (0.0-1.0); provider default when unset
    pub temperature: Option<f32>,

    /// Enable debug logging of provider traffic sizes
    pub debug: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Anthropic,
            model: ProviderKind::Anthropic.default_model().to_string(),
            api_base: None,
            timeout_secs: 120,
            max_tokens: 2048,
            temperature: None,
            debug: false,
        }
    }
}

impl LlmConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self, String> {
        Self::from_env_internal(true)
    }

    #[cfg(test)]
    fn from_env_no_dotenv() -> Result<Self, String> {
        Self::from_env_internal(false)
    }

    fn from_env_internal(load_dotenv: bool) -> Result<Self, String> {
        if load_dotenv {
            let _ = dotenv::dotenv();
        }

        let provider = match env::var("LLM_PROVIDER") {
            Ok(name) if !name.trim().is_empty() => ProviderKind::from_name(&name).ok_or_else(|| {
                format!("Unknown LLM_PROVIDER '{}'; expected 'anthropic' or 'openai'", name)
            })?,
            _ => ProviderKind::Anthropic,
        };

        let mut config = Self {
            provider,
            model: provider.default_model().to_string(),
            ..Default::default()
        };

        if let Ok(model) = env::var("LLM_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }

        if let Ok(api_base) = env::var("LLM_API_BASE") {
            if !api_base.trim().is_empty() {
                config.api_base = Some(api_base);
            }
        }

        if let Ok(timeout) = env::var("LLM_REQUEST_TIMEOUT") {
            if let Ok(timeout_secs) = timeout.parse::<u64>() {
                config.timeout_secs = timeout_secs;
            }
        }

        if let Ok(max_tokens) = env::var("LLM_MAX_TOKENS") {
            if let Ok(tokens) = max_tokens.parse::<u32>() {
                config.max_tokens = tokens;
            }
        }

        if let Ok(temperature) = env::var("LLM_TEMPERATURE") {
            if let Ok(temp) = temperature.parse::<f32>() {
                if (0.0..=1.0).contains(&temp) {
                    config.temperature = Some(temp);
                }
            }
        }

        if let Ok(debug) = env::var("LLM_DEBUG") {
            config.debug = debug.to_lowercase() == "true" || debug == "1";
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model name is empty".to_string());
        }

        if self.max_tokens == 0 {
            return Err("Max tokens must be greater than 0".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                return Err(format!(
                    "Temperature must be between 0.0 and 1.0, got {}",
                    temperature
                ));
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// When the provider credential is read from the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CredentialMode {
    /// Read once at startup; refuse to start without it
    #[default]
    Startup,
    /// Re-read on every provider call; answer "not configured" while absent
    PerRequest,
}

impl fmt::Display for CredentialMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Startup => f.write_str("startup"),
            Self::PerRequest => f.write_str("per-request"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("{var} is not set")]
    Missing { var: &'static str },
}

/// Provider API key, either already resolved or looked up on each use
#[derive(Clone)]
pub enum Credential {
    Resolved(String),
    FromEnv(&'static str),
}

impl Credential {
    /// Build the credential for a provider according to the deployment mode.
    ///
    /// In [`CredentialMode::Startup`] a missing key is an error right away.
    pub fn for_mode(mode: CredentialMode, provider: ProviderKind) -> Result<Self, CredentialError> {
        let var = provider.api_key_var();
        match mode {
            CredentialMode::Startup => read_env(var)
                .map(Self::Resolved)
                .ok_or(CredentialError::Missing { var }),
            CredentialMode::PerRequest => Ok(Self::FromEnv(var)),
        }
    }

    pub fn resolve(&self) -> Result<String, CredentialError> {
        match self {
            Self::Resolved(key) => Ok(key.clone()),
            Self::FromEnv(var) => read_env(var).ok_or(CredentialError::Missing { var: *var }),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(_) => f.write_str("Credential::Resolved(<redacted>)"),
            Self::FromEnv(var) => write!(f, "Credential::FromEnv({})", var),
        }
    }
}

fn read_env(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = LlmConfig::default();

        assert_eq!(config.provider, ProviderKind::Anthropic);
        assert_eq!(config.model, "claude-sonnet-4-20250514");
        assert_eq!(config.api_base, None);
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.temperature, None);
        assert!(!config.debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_max_tokens() {
        let config = LlmConfig {
            max_tokens: 0,
            ..Default::default()
        };

        let result = config.validate();
        assert!(result.unwrap_err().contains("Max tokens must be greater than 0"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = LlmConfig {
            timeout_secs: 0,
            ..Default::default()
        };

        assert!(config.validate().unwrap_err().contains("timeout"));
    }

    #[test]
    fn test_validate_invalid_temperature() {
        let config = LlmConfig {
            temperature: Some(1.5),
            ..Default::default()
        };

        assert!(config.validate().unwrap_err().contains("Temperature must be between"));
    }

    #[test]
    fn test_provider_names() {
        assert_eq!(ProviderKind::from_name("Anthropic"), Some(ProviderKind::Anthropic));
        assert_eq!(ProviderKind::from_name(" openai "), Some(ProviderKind::OpenAi));
        assert_eq!(ProviderKind::from_name("gemini"), None);
        assert_eq!(ProviderKind::OpenAi.api_key_var(), "OPENAI_API_KEY");
    }

    fn setup_clean_env() {
        env::remove_var("LLM_PROVIDER");
        env::remove_var("LLM_MODEL");
        env::remove_var("LLM_API_BASE");
        env::remove_var("LLM_REQUEST_TIMEOUT");
        env::remove_var("LLM_MAX_TOKENS");
        env::remove_var("LLM_TEMPERATURE");
        env::remove_var("LLM_DEBUG");
        env::remove_var("ANTHROPIC_API_KEY");
        env::remove_var("OPENAI_API_KEY");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        setup_clean_env();

        let config = LlmConfig::from_env_no_dotenv().unwrap();
        assert_eq!(config.provider, ProviderKind::Anthropic);
        assert_eq!(config.model, "claude-sonnet-4-20250514");
        assert_eq!(config.max_tokens, 2048);
    }

    #[test]
    #[serial]
    fn test_from_env_with_overrides() {
        setup_clean_env();

        env::set_var("LLM_PROVIDER", "openai");
        env::set_var("LLM_API_BASE", "https://custom.api.com");
        env::set_var("LLM_REQUEST_TIMEOUT", "30");
        env::set_var("LLM_MAX_TOKENS", "1000");
        env::set_var("LLM_TEMPERATURE", "0.7");
        env::set_var("LLM_DEBUG", "1");

        let config = LlmConfig::from_env_no_dotenv().unwrap();
        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.api_base, Some("https://custom.api.com".to_string()));
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_tokens, 1000);
        assert_eq!(config.temperature, Some(0.7));
        assert!(config.debug);

        env::set_var("LLM_MODEL", "gpt-4o-mini");
        let config = LlmConfig::from_env_no_dotenv().unwrap();
        assert_eq!(config.model, "gpt-4o-mini");

        setup_clean_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_values_fall_back() {
        setup_clean_env();

        env::set_var("LLM_REQUEST_TIMEOUT", "soon");
        env::set_var("LLM_MAX_TOKENS", "-5");
        env::set_var("LLM_TEMPERATURE", "1.5");

        let config = LlmConfig::from_env_no_dotenv().unwrap();
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.temperature, None);

        setup_clean_env();
    }

    #[test]
    #[serial]
    fn test_from_env_unknown_provider() {
        setup_clean_env();
        env::set_var("LLM_PROVIDER", "gemini");

        let result = LlmConfig::from_env_no_dotenv();
        assert!(result.unwrap_err().contains("Unknown LLM_PROVIDER"));

        setup_clean_env();
    }

    #[test]
    #[serial]
    fn test_startup_credential_requires_key() {
        setup_clean_env();

        let result = Credential::for_mode(CredentialMode::Startup, ProviderKind::Anthropic);
        assert_eq!(
            result.unwrap_err(),
            CredentialError::Missing { var: "ANTHROPIC_API_KEY" }
        );

        env::set_var("ANTHROPIC_API_KEY", "sk-test");
        let credential = Credential::for_mode(CredentialMode::Startup, ProviderKind::Anthropic).unwrap();

        // Resolved once: later changes to the environment are not observed.
        env::remove_var("ANTHROPIC_API_KEY");
        assert_eq!(credential.resolve().unwrap(), "sk-test");

        setup_clean_env();
    }

    #[test]
    #[serial]
    fn test_per_request_credential_reads_env_each_time() {
        setup_clean_env();

        let credential = Credential::for_mode(CredentialMode::PerRequest, ProviderKind::OpenAi).unwrap();
        assert_eq!(
            credential.resolve().unwrap_err(),
            CredentialError::Missing { var: "OPENAI_API_KEY" }
        );

        env::set_var("OPENAI_API_KEY", "sk-openai");
        assert_eq!(credential.resolve().unwrap(), "sk-openai");

        env::set_var("OPENAI_API_KEY", "  ");
        assert!(credential.resolve().is_err());

        setup_clean_env();
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::Resolved("sk-secret".to_string());
        assert!(!format!("{:?}", credential).contains("sk-secret"));
    }
}
