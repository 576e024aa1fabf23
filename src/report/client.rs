use super::{ReportError, ReportResult};
use crate::analysis::AnalysisResult;
use crate::expenses::ExpenseRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000/analizar";

const MISSING_ANALYSIS: &str = "<p>Error: No se recibió análisis.</p>";
const MISSING_STRATEGIES: &str = "<p>Error: No se recibieron estrategias.</p>";

#[derive(Serialize)]
struct Payload<'a> {
    gastos: &'a [ExpenseRecord],
}

#[derive(Deserialize)]
struct Answer {
    analisis_detallado: Option<String>,
    estrategias_control: Option<String>,
}

#[derive(Deserialize)]
struct ServiceFailure {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

/// HTTP client for the `/analizar` endpoint
pub struct AnalysisClient {
    client: reqwest::Client,
    url: String,
}

impl AnalysisClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> ReportResult<Self> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ReportError::Connection {
                url: url.clone(),
                source,
            })?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the expenses and return both report sections.
    ///
    /// A section missing from a successful answer is replaced by an error
    /// paragraph so the report can still be rendered.
    pub async fn analyze(&self, expenses: &[ExpenseRecord]) -> ReportResult<AnalysisResult> {
        let response = self
            .client
            .post(&self.url)
            .json(&Payload { gastos: expenses })
            .send()
            .await
            .map_err(|source| ReportError::Connection {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ServiceFailure>(&body) {
                Ok(ServiceFailure { error, details: Some(details) }) => format!("{} ({})", error, details),
                Ok(ServiceFailure { error, details: None }) => error,
                Err(_) => body,
            };
            return Err(ReportError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let answer: Answer = response
            .json()
            .await
            .map_err(|e| ReportError::InvalidResponse(e.to_string()))?;

        Ok(AnalysisResult {
            detailed_analysis: answer
                .analisis_detallado
                .unwrap_or_else(|| MISSING_ANALYSIS.to_string()),
            control_strategies: answer
                .estrategias_control
                .unwrap_or_else(|| MISSING_STRATEGIES.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn expenses() -> Vec<ExpenseRecord> {
        vec![
            ExpenseRecord::new("Comida", 450.5),
            ExpenseRecord::new("Transporte", 120.0),
        ]
    }

    fn client_for(server: &mockito::ServerGuard) -> AnalysisClient {
        AnalysisClient::new(format!("{}/analizar", server.url()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_sends_expenses_and_reads_sections() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/analizar")
            .match_body(Matcher::Json(serde_json::json!({"gastos": [
                {"categoria": "Comida", "monto": 450.5},
                {"categoria": "Transporte", "monto": 120.0}
            ]})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"analisis_detallado":"<p>A</p>","estrategias_control":"<ol></ol>"}"#)
            .create_async()
            .await;

        let result = client_for(&server).analyze(&expenses()).await.unwrap();

        assert_eq!(result.detailed_analysis, "<p>A</p>");
        assert_eq!(result.control_strategies, "<ol></ol>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_sections_get_placeholders() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/analizar")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"analisis_detallado":"<p>A</p>"}"#)
            .create_async()
            .await;

        let result = client_for(&server).analyze(&expenses()).await.unwrap();

        assert_eq!(result.detailed_analysis, "<p>A</p>");
        assert_eq!(result.control_strategies, MISSING_STRATEGIES);
    }

    #[tokio::test]
    async fn test_service_error_carries_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/analizar")
            .with_status(502)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"La respuesta del proveedor no tuvo el formato esperado."}"#)
            .create_async()
            .await;

        let err = client_for(&server).analyze(&expenses()).await.unwrap_err();

        match err {
            ReportError::Service { status, message } => {
                assert_eq!(status, 502);
                assert!(message.contains("formato esperado"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_is_connection_error() {
        // Bind and drop a listener to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = AnalysisClient::new(
            format!("http://127.0.0.1:{}/analizar", port),
            Duration::from_secs(5),
        )
        .unwrap();

        let err = client.analyze(&expenses()).await.unwrap_err();
        assert!(err.is_connection());
    }
}
