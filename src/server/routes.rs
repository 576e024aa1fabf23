use super::error::ApiResult;
use super::AppState;
use crate::analysis::AnalysisResult;
use crate::expenses::AnalysisRequest;
use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Response for the health check endpoint.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct HealthResponse {
    pub status: String,
}

/// GET|HEAD /health - liveness probe, independent of provider health.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// POST /analizar - analyze a list of expenses.
///
/// The body is read raw so malformed input goes through the same error
/// mapping as every other failure instead of axum's extractor rejections.
pub async fn analyze_expenses(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<AnalysisResult>> {
    let request = AnalysisRequest::from_json(&body)?;
    let result = state.analysis.analyze(&request).await?;
    Ok(Json(result))
}

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analizar", post(analyze_expenses))
        .route("/health", get(health_check))
}
