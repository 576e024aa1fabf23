use anyhow::{Context, Result};
use crate::llm::prompts::CONNECTION_CHECK_PROMPT;
use crate::llm::{Credential, CredentialMode, LlmConfig, LlmService, LlmServiceError};
use colored::Colorize;

const CHECK_MAX_TOKENS: u32 = 20;

/// Send a tiny prompt to the configured provider and report whether the key works.
pub async fn handle_check_command() -> Result<()> {
    let config = LlmConfig::from_env()
        .map_err(anyhow::Error::msg)
        .context("Invalid LLM configuration")?;

    println!("🔍 Budgen provider check");
    println!("═══════════════════════════════════════");
    println!("  • Provider: {}", config.provider.name());
    println!("  • Model:    {}", config.model);
    println!("  • Timeout:  {}s", config.timeout_secs);
    println!();

    let api_key = Credential::for_mode(CredentialMode::Startup, config.provider)?.resolve()?;
    let service = LlmService::new(config).context("Failed to create LLM service")?;

    match service
        .complete_with_limit(CONNECTION_CHECK_PROMPT, &api_key, CHECK_MAX_TOKENS)
        .await
    {
        Ok(reply) => {
            println!("{} Provider answered: {}", "✅".green(), reply.trim());
            Ok(())
        }
        Err(LlmServiceError::AuthError(msg)) => {
            println!("{} The provider rejected the API key", "❌".red());
            Err(anyhow::anyhow!("Authentication failed: {}", msg))
        }
        Err(e) => {
            println!("{} Provider call failed", "❌".red());
            Err(e.into())
        }
    }
}
