//! The analysis core: validate, prompt, call the provider, split the answer.

pub mod splitter;

pub use splitter::split_sections;

use crate::expenses::{AnalysisRequest, ExpenseError};
use crate::llm::{Credential, CredentialError, LlmService, LlmServiceError, ProviderPrompt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// The two report sections produced for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "analisis_detallado")]
    pub detailed_analysis: String,

    #[serde(rename = "estrategias_control")]
    pub control_strategies: String,
}

/// Errors that can end an analysis request
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ExpenseError),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(#[from] CredentialError),

    #[error("Provider rejected the credential: {0}")]
    ProviderAuthFailure(String),

    #[error("Provider call failed: {0}")]
    ProviderCallFailure(String),

    #[error("Malformed provider response: expected 1 section delimiter, found {delimiters}")]
    MalformedProviderResponse { delimiters: usize },
}

impl From<LlmServiceError> for AnalysisError {
    fn from(error: LlmServiceError) -> Self {
        match error {
            LlmServiceError::AuthError(message) => Self::ProviderAuthFailure(message),
            other => Self::ProviderCallFailure(other.to_string()),
        }
    }
}

/// Stateless request handler in front of the provider
pub struct AnalysisService {
    llm: LlmService,
    credential: Credential,
}

impl AnalysisService {
    pub fn new(llm: LlmService, credential: Credential) -> Self {
        Self { llm, credential }
    }

    pub fn provider_name(&self) -> &'static str {
        self.llm.provider_name()
    }

    /// Run one analysis. Every call reaches the provider; nothing is cached.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let request_id = Uuid::new_v4();

        let api_key = self.credential.resolve().map_err(|e| {
            warn!(%request_id, error = %e, "Provider credential unavailable");
            AnalysisError::from(e)
        })?;

        let prompt = ProviderPrompt::build(request);
        info!(
            %request_id,
            records = request.len(),
            provider = self.provider_name(),
            prompt_chars = prompt.as_str().len(),
            "Requesting expense analysis"
        );

        let raw = self.llm.complete(prompt.as_str(), &api_key).await.map_err(|e| {
            warn!(%request_id, error = %e, "Provider call failed");
            AnalysisError::from(e)
        })?;

        match split_sections(&raw) {
            Ok(result) => {
                info!(
                    %request_id,
                    detailed_chars = result.detailed_analysis.len(),
                    strategies_chars = result.control_strategies.len(),
                    "Analysis complete"
                );
                Ok(result)
            }
            Err(e) => {
                warn!(%request_id, error = %e, raw_response = %raw, "Provider response rejected");
                Err(e)
            }
        }
    }
}
