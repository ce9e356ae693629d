use axum::{
    extract::{Path, Query, State},
    Json,
};

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{CallbackCreatedResponse, CallbackListQuery, CallbackRequest, CreateCallbackRequest, UpdateCallbackRequest};
use crate::services::CallbackService;

#[axum::debug_handler]
pub async fn create_callback_request(
    State(state): State<AppState>,
    Json(request): Json<CreateCallbackRequest>,
) -> Result<Json<CallbackCreatedResponse>, AppError> {
    let created = CallbackService::new(&state).create_request(request).await?;
    Ok(Json(created))
}

#[axum::debug_handler]
pub async fn list_callback_requests(
    State(state): State<AppState>,
    Query(query): Query<CallbackListQuery>,
) -> Result<Json<Vec<CallbackRequest>>, AppError> {
    let requests = CallbackService::new(&state).list_requests(query.status).await?;
    Ok(Json(requests))
}

#[axum::debug_handler]
pub async fn update_callback_request(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    Json(request): Json<UpdateCallbackRequest>,
) -> Result<Json<CallbackRequest>, AppError> {
    let updated = CallbackService::new(&state).update_request(request_id, request).await?;
    Ok(Json(updated))
}
