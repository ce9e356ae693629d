use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{CreateSpecialityRequest, Speciality, UpdateSpecialityRequest};
use crate::services::SpecialityService;

#[axum::debug_handler]
pub async fn list_specialities(State(state): State<AppState>) -> Result<Json<Vec<Speciality>>, AppError> {
    let specialities = SpecialityService::new(&state).list_active().await?;
    Ok(Json(specialities))
}

#[axum::debug_handler]
pub async fn get_speciality(
    State(state): State<AppState>,
    Path(speciality_id): Path<i64>,
) -> Result<Json<Speciality>, AppError> {
    let speciality = SpecialityService::new(&state).get_speciality(speciality_id).await?;
    Ok(Json(speciality))
}

// ==============================================================================
// ADMIN HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_all_specialities(State(state): State<AppState>) -> Result<Json<Vec<Speciality>>, AppError> {
    let specialities = SpecialityService::new(&state).list_all().await?;
    Ok(Json(specialities))
}

#[axum::debug_handler]
pub async fn create_speciality(
    State(state): State<AppState>,
    Json(request): Json<CreateSpecialityRequest>,
) -> Result<Json<Speciality>, AppError> {
    let speciality = SpecialityService::new(&state).create_speciality(request).await?;
    Ok(Json(speciality))
}

#[axum::debug_handler]
pub async fn update_speciality(
    State(state): State<AppState>,
    Path(speciality_id): Path<i64>,
    Json(request): Json<UpdateSpecialityRequest>,
) -> Result<Json<Speciality>, AppError> {
    let speciality = SpecialityService::new(&state)
        .update_speciality(speciality_id, request)
        .await?;
    Ok(Json(speciality))
}

#[axum::debug_handler]
pub async fn delete_speciality(
    State(state): State<AppState>,
    Path(speciality_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    SpecialityService::new(&state).delete_speciality(speciality_id).await?;
    Ok(Json(json!({ "message": "Specialty deleted successfully" })))
}
