use axum::{extract::State, Json};

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::DashboardStats;
use crate::services::DashboardService;

#[axum::debug_handler]
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let stats = DashboardService::new(&state).stats().await?;
    Ok(Json(stats))
}
