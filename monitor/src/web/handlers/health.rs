// Connection health endpoints

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use tracing::{error, info};

use super::common::{ApiResponse, ApiResult, FailureReport};
use crate::health::probes::run_probe_sweep;
use crate::health::{BackendStatus, ProbeOutcome, ProbeTarget, RecoveryAttempt};
use crate::web::AppState;

/// Fresh status snapshot, recomputed from the live handle
pub async fn get_status(State(state): State<AppState>) -> ApiResult<BackendStatus> {
    let status = state.monitor.get_status().await;
    Ok(Json(ApiResponse::success(status)))
}

/// Run a full health check (init hook + confirmatory round-trip)
pub async fn check_health(State(state): State<AppState>) -> ApiResult<BackendStatus> {
    info!("Manual health check requested");
    match state.monitor.check_health().await {
        Ok(status) => Ok(Json(ApiResponse::success(status))),
        Err(e) => {
            error!("Health check failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            ))
        }
    }
}

/// Manually trigger the recovery sequence
pub async fn fix_connection(State(state): State<AppState>) -> ApiResult<RecoveryAttempt> {
    let attempt = state.monitor.fix_connection().await;
    Ok(Json(ApiResponse::success(attempt)))
}

#[derive(Serialize)]
pub struct ProbeReport {
    pub label: String,
    pub url: String,
    pub outcome: ProbeOutcome,
}

/// Run a reachability sweep over the configured probe targets
pub async fn run_probes(State(state): State<AppState>) -> ApiResult<Vec<ProbeReport>> {
    let targets: Vec<ProbeTarget> = state
        .config
        .probes
        .iter()
        .map(|p| ProbeTarget {
            url: p.url.clone(),
            label: p.label.clone(),
        })
        .collect();

    let results = run_probe_sweep(&state.probe_client, &targets).await;

    let reports = results
        .into_iter()
        .map(|(target, outcome)| ProbeReport {
            label: target.label,
            url: target.url,
            outcome,
        })
        .collect();

    Ok(Json(ApiResponse::success(reports)))
}

#[derive(Serialize)]
pub struct FailureReportOutcome {
    pub suppressed: bool,
}

/// Feed an uncaught failure message through the classifier
pub async fn report_failure(
    State(state): State<AppState>,
    Json(report): Json<FailureReport>,
) -> ApiResult<FailureReportOutcome> {
    let suppressed = state.monitor.handle_failure_signal(&report.message);
    Ok(Json(ApiResponse::success(FailureReportOutcome {
        suppressed,
    })))
}
