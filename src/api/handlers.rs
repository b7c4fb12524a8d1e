//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{
    AnalyzeQuery, ErrorResponse, HeatPumpSummary, HourRecord, HourlyQuery, ReportResponse,
};
use crate::error::Error;
use crate::pipeline::run_analysis;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// Returns the annual report of the configured heat pump.
///
/// `GET /report` → 200 + `ReportResponse` JSON
pub async fn get_report(State(state): State<Arc<AppState>>) -> Json<ReportResponse> {
    Json(ReportResponse::from(&state.run))
}

/// Returns simulated hours, optionally filtered by position in the window.
///
/// `GET /hourly` → 200 + `Vec<HourRecord>` JSON
/// `GET /hourly?from=N&to=M` → filtered range (inclusive)
/// `GET /hourly?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_hourly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HourlyQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("`from` ({from}) must be <= `to` ({to})"),
        ));
    }

    let hourly = &state.run.simulation.hourly;
    let last = hourly.len().saturating_sub(1).min(to);
    let records: Vec<HourRecord> = (from..=last)
        .filter_map(|hour| HourRecord::from_series(hourly, hour))
        .collect();

    Ok(Json(records))
}

/// Lists the heat pumps in the catalog.
///
/// `GET /heat-pumps` → 200 + `Vec<HeatPumpSummary>` JSON
pub async fn get_heat_pumps(State(state): State<Arc<AppState>>) -> Json<Vec<HeatPumpSummary>> {
    let selected = state.run.heat_pump.model();
    Json(
        state
            .inputs
            .catalog
            .curves()
            .iter()
            .map(|c| HeatPumpSummary::new(c, c.model() == selected))
            .collect(),
    )
}

/// Runs the analysis for another heat pump on a blocking worker.
///
/// `GET /analyze?model=X` → 200 + `ReportResponse` JSON
/// unknown model → 404, analysis failure → 422
pub async fn get_analyze(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<ReportResponse>, ApiError> {
    if let Err(e) = state.inputs.catalog.find(&query.model) {
        return Err(api_error(StatusCode::NOT_FOUND, e.to_string()));
    }

    let worker_state = Arc::clone(&state);
    let outcome = tokio::task::spawn_blocking(move || {
        let mut config = worker_state.config.clone();
        config.heat_pump.model = query.model;
        run_analysis(&worker_state.inputs, &config)
    })
    .await
    .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("analysis task failed: {e}")))?;

    match outcome {
        Ok(run) => Ok(Json(ReportResponse::from(&run))),
        Err(e @ Error::Config(_)) => Err(api_error(StatusCode::BAD_REQUEST, e.to_string())),
        Err(e) => Err(api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())),
    }
}
