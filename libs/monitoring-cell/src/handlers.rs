use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use tracing::{instrument, warn};

use crate::models::{ComponentStatus, HealthResponse, MonitoringState, ReadinessResponse};

#[instrument(skip(state))]
pub async fn health(State(state): State<MonitoringState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Healthcare API is running".to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// 200 while PostgREST answers, 503 otherwise.
#[instrument(skip(state))]
pub async fn readiness(State(state): State<MonitoringState>) -> (StatusCode, Json<ReadinessResponse>) {
    let started = Instant::now();

    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
                database: ComponentStatus::Up,
                latency_ms: Some(started.elapsed().as_millis() as u64),
                error: None,
            }),
        ),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "not_ready".to_string(),
                    database: ComponentStatus::Down,
                    latency_ms: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
