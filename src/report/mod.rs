pub mod client;
pub mod html;
pub mod sheet;

pub use client::{AnalysisClient, DEFAULT_SERVER_URL};
pub use html::HtmlReporter;
pub use sheet::read_expenses;

use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur during report generation
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Could not read expense sheet {path}: {source}")]
    Sheet {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Expense sheet {path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("Row {row}: amount '{value}' is not a number")]
    InvalidAmount { row: usize, value: String },

    #[error("Could not connect to the analysis service at {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Analysis service answered {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Unexpected response from the analysis service: {0}")]
    InvalidResponse(String),

    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ReportError {
    /// True when the analysis service could not be reached at all
    pub fn is_connection(&self) -> bool {
        matches!(self, ReportError::Connection { .. })
    }
}

/// Everything needed to produce one report
#[derive(Debug, Clone)]
pub struct ReportJob {
    pub input: PathBuf,
    pub template: Option<PathBuf>,
    pub output: PathBuf,
    pub server_url: String,
    pub timeout: Duration,
}

/// What a finished report run produced
#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub output: PathBuf,
    pub expense_count: usize,
}

/// Read the sheet, ask the service for analysis, render and write the report.
pub async fn generate_report(job: &ReportJob) -> ReportResult<ReportSummary> {
    // Load the template first so a broken one fails before any network call.
    let reporter = match &job.template {
        Some(path) => HtmlReporter::from_file(path)?,
        None => HtmlReporter::new()?,
    };

    info!(input = %job.input.display(), "Reading expense sheet");
    let expenses = read_expenses(&job.input)?;
    info!(records = expenses.len(), "Expense sheet loaded");

    let client = AnalysisClient::new(&job.server_url, job.timeout)?;
    info!(url = client.url(), "Requesting analysis");
    let analysis = client.analyze(&expenses).await?;
    info!("Analysis received");

    reporter.save_report(&expenses, &analysis, &job.output)?;
    info!(output = %job.output.display(), "Report written");

    Ok(ReportSummary {
        output: job.output.clone(),
        expense_count: expenses.len(),
    })
}
