//! Axum HTTP surface of the analysis service.

pub mod error;
pub mod routes;

pub use error::{ApiResult, ErrorResponse};

use crate::analysis::AnalysisService;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared, read-only state handed to every request
pub struct AppState {
    pub analysis: AnalysisService,
}

/// Create the Axum application with all routes and request tracing.
pub fn create_app(analysis: AnalysisService) -> Router {
    let state = Arc::new(AppState { analysis });

    routes::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the app until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    tracing::info!(address = %listener.local_addr()?, "Analysis service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for Ctrl-C; shutting down");
        return;
    }
    tracing::info!("Shutdown signal received");
}
