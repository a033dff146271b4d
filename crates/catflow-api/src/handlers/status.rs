//! Health probes.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::services::health::StatusReport;
use crate::state::AppState;

/// Service status
///
/// 200 while the broker connection is open, 500 otherwise. The body has the
/// same shape either way.
#[utoipa::path(
    get,
    path = "/status",
    tag = "health",
    responses(
        (status = 200, description = "Broker connected", body = StatusReport),
        (status = 500, description = "Broker not connected", body = StatusReport)
    )
)]
pub async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let report = state.health.status();
    let code = if report.is_healthy() {
        StatusCode::OK
    } else {
        tracing::warn!(
            rabbitmq_status = report.rabbitmq_status,
            "Status check reports unhealthy"
        );
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (code, Json(report))
}

/// Liveness probe - process is running.
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}
