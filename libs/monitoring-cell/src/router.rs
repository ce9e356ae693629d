use std::time::Instant;

use axum::{routing::get, Router};

use shared_database::AppState;

use crate::handlers;
use crate::models::MonitoringState;

/// `/health` and `/health/ready`. Uptime counts from router construction.
pub fn health_routes(state: AppState) -> Router {
    let monitoring = MonitoringState {
        db: state.db.clone(),
        started_at: Instant::now(),
    };

    Router::new()
        .route("/health", get(handlers::health))
        .route("/health/ready", get(handlers::readiness))
        .with_state(monitoring)
}
