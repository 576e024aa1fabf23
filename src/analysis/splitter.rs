use super::{AnalysisError, AnalysisResult};
use crate::llm::prompts::DELIMITER;

/// Split a provider answer into its two sections.
///
/// Succeeds only when the delimiter occurs exactly once. Both halves are
/// trimmed and otherwise passed through untouched.
pub fn split_sections(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let segments: Vec<&str> = raw.split(DELIMITER).collect();

    match segments.as_slice() {
        [detailed, strategies] => Ok(AnalysisResult {
            detailed_analysis: detailed.trim().to_string(),
            control_strategies: strategies.trim().to_string(),
        }),
        _ => Err(AnalysisError::MalformedProviderResponse {
            delimiters: segments.len() - 1,
        }),
    }
}
