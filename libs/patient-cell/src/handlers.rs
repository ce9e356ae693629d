use axum::{
    extract::{Path, Query, State},
    Json,
};

use shared_database::AppState;
use shared_models::{error::AppError, pagination::Pagination};

use crate::models::{CreatePatientRequest, PatientResponse, UpdatePatientRequest};
use crate::services::patient::PatientService;

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<Json<PatientResponse>, AppError> {
    let patient = PatientService::new(&state).create_patient(request).await?;
    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<PatientResponse>>, AppError> {
    let patients = PatientService::new(&state).list_patients(page).await?;
    Ok(Json(patients))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
) -> Result<Json<PatientResponse>, AppError> {
    let patient = PatientService::new(&state).get_patient(patient_id).await?;
    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<PatientResponse>, AppError> {
    let patient = PatientService::new(&state).update_patient(patient_id, request).await?;
    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn search_patients(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<PatientResponse>>, AppError> {
    let patients = PatientService::new(&state).search_patients(&query).await?;
    Ok(Json(patients))
}
