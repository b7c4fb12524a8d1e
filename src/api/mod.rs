//! REST API over a completed analysis.
//!
//! Provides four GET endpoints:
//! - `/report`: annual report of the configured heat pump
//! - `/hourly`: simulated hours with optional range filtering
//! - `/heat-pumps`: catalog identifiers
//! - `/analyze?model=X`: fresh analysis of another heat pump

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::config::ScenarioConfig;
use crate::pipeline::{AnalysisInputs, AnalysisRun};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the initial analysis completes and wrapped in
/// `Arc`. All data is read-only.
pub struct AppState {
    /// Deliveries, temperatures, and catalog the analyses read.
    pub inputs: AnalysisInputs,
    /// Scenario used for every analysis.
    pub config: ScenarioConfig,
    /// Analysis of the configured heat pump.
    pub run: AnalysisRun,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/report", get(handlers::get_report))
        .route("/hourly", get(handlers::get_hourly))
        .route("/heat-pumps", get(handlers::get_heat_pumps))
        .route("/analyze", get(handlers::get_analyze))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
