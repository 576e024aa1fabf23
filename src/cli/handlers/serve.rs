use anyhow::{Context, Result};
use crate::analysis::AnalysisService;
use crate::llm::{Credential, CredentialMode, LlmConfig, LlmService};
use crate::server;
use tokio::net::TcpListener;
use tracing::info;

pub async fn handle_serve_command(host: String, port: u16, credential_mode: CredentialMode) -> Result<()> {
    let config = LlmConfig::from_env()
        .map_err(anyhow::Error::msg)
        .context("Invalid LLM configuration")?;

    let credential = Credential::for_mode(credential_mode, config.provider).with_context(|| {
        format!(
            "Cannot start in {} credential mode; set the key or use --credential-mode per-request",
            credential_mode
        )
    })?;

    info!(
        provider = config.provider.name(),
        model = %config.model,
        timeout_secs = config.timeout_secs,
        credential_mode = %credential_mode,
        "Configuring analysis service"
    );

    let llm = LlmService::new(config).context("Failed to create LLM service")?;
    let app = server::create_app(AnalysisService::new(llm, credential));

    let address = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    server::serve(listener, app).await.context("Server error")
}
