use crate::analysis::AnalysisError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Structured JSON error response for API errors
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Upstream failures reach the caller without provider detail.
impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AnalysisError::InvalidInput(e) => {
                tracing::warn!(error = %e, "Rejected expense data");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_details("Los datos de gastos no son válidos.", e.to_string()),
                )
            }
            AnalysisError::ServiceUnavailable(e) => {
                tracing::error!(error = %e, "Analysis service is not configured");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::with_details(
                        "El servicio de análisis no está disponible.",
                        format!("Error de configuración en el servidor: {}", e),
                    ),
                )
            }
            AnalysisError::ProviderAuthFailure(message) => {
                tracing::error!(message = %message, "Provider rejected the configured credential");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::new("Error al comunicarse con el proveedor de análisis."),
                )
            }
            AnalysisError::ProviderCallFailure(message) => {
                tracing::error!(message = %message, "Provider call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::new("Error al comunicarse con el proveedor de análisis."),
                )
            }
            AnalysisError::MalformedProviderResponse { delimiters } => {
                tracing::error!(delimiters = *delimiters, "Provider response did not have two sections");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::new("La respuesta del proveedor no tuvo el formato esperado."),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AnalysisError>;
