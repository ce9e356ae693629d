use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{ChatButton, ChatButtonFilter, CreateChatButtonRequest, UpdateChatButtonRequest};
use crate::services::ChatButtonService;

#[axum::debug_handler]
pub async fn list_chat_buttons(
    State(state): State<AppState>,
    Query(filter): Query<ChatButtonFilter>,
) -> Result<Json<Vec<ChatButton>>, AppError> {
    let buttons = ChatButtonService::new(&state).list_buttons(&filter).await?;
    Ok(Json(buttons))
}

#[axum::debug_handler]
pub async fn list_active_chat_buttons(State(state): State<AppState>) -> Result<Json<Vec<ChatButton>>, AppError> {
    let buttons = ChatButtonService::new(&state).list_active().await?;
    Ok(Json(buttons))
}

#[axum::debug_handler]
pub async fn get_chat_button(
    State(state): State<AppState>,
    Path(button_id): Path<i64>,
) -> Result<Json<ChatButton>, AppError> {
    let button = ChatButtonService::new(&state).get_button(button_id).await?;
    Ok(Json(button))
}

#[axum::debug_handler]
pub async fn create_chat_button(
    State(state): State<AppState>,
    Json(request): Json<CreateChatButtonRequest>,
) -> Result<Json<ChatButton>, AppError> {
    let button = ChatButtonService::new(&state).create_button(request).await?;
    Ok(Json(button))
}

#[axum::debug_handler]
pub async fn update_chat_button(
    State(state): State<AppState>,
    Path(button_id): Path<i64>,
    Json(request): Json<UpdateChatButtonRequest>,
) -> Result<Json<ChatButton>, AppError> {
    let button = ChatButtonService::new(&state).update_button(button_id, request).await?;
    Ok(Json(button))
}

#[axum::debug_handler]
pub async fn toggle_chat_button(
    State(state): State<AppState>,
    Path(button_id): Path<i64>,
) -> Result<Json<ChatButton>, AppError> {
    let button = ChatButtonService::new(&state).toggle_button(button_id).await?;
    Ok(Json(button))
}

#[axum::debug_handler]
pub async fn delete_chat_button(
    State(state): State<AppState>,
    Path(button_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    ChatButtonService::new(&state).delete_button(button_id).await?;
    Ok(Json(json!({ "message": "Chat button deleted successfully" })))
}
