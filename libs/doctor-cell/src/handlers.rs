use axum::{
    extract::{Multipart, Path, Query, State},
    response::Response,
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::{error::AppError, pagination::Pagination};
use shared_utils::image::{image_response, read_image_upload};

use crate::models::{
    AvailableSlotsResponse, CreateDoctorRequest, CreateTimeSlotRequest, Doctor, DoctorTimeSlot,
    UpdateDoctorRequest, UpdateTimeSlotRequest,
};
use crate::services::{AvailabilityService, DoctorService, TimeSlotService};

// ==============================================================================
// PUBLIC DOCTOR HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    let doctors = DoctorService::new(&state).list_doctors(page).await?;
    Ok(Json(doctors))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Doctor>, AppError> {
    let doctor = DoctorService::new(&state).get_doctor(doctor_id).await?;
    Ok(Json(doctor))
}

#[axum::debug_handler]
pub async fn list_doctors_by_speciality(
    State(state): State<AppState>,
    Path(speciality_id): Path<i64>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    let doctors = DoctorService::new(&state).list_by_speciality(speciality_id).await?;
    Ok(Json(doctors))
}

#[axum::debug_handler]
pub async fn get_doctor_time_slots(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Vec<DoctorTimeSlot>>, AppError> {
    let slots = TimeSlotService::new(&state).list_for_doctor(doctor_id, true).await?;
    Ok(Json(slots))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<AppState>,
    Path((doctor_id, date)): Path<(i64, String)>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let response = AvailabilityService::new(&state)
        .get_available_slots(doctor_id, &date)
        .await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_doctor_image(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
) -> Result<Response, AppError> {
    let (data, content_type) = DoctorService::new(&state).get_image(doctor_id).await?;
    image_response(&data, &content_type)
}

// ==============================================================================
// ADMIN DOCTOR HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_all_doctors(State(state): State<AppState>) -> Result<Json<Vec<Doctor>>, AppError> {
    let doctors = DoctorService::new(&state).list_all_doctors().await?;
    Ok(Json(doctors))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<AppState>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Doctor>, AppError> {
    let doctor = DoctorService::new(&state).create_doctor(request).await?;
    Ok(Json(doctor))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Doctor>, AppError> {
    let doctor = DoctorService::new(&state).update_doctor(doctor_id, request).await?;
    Ok(Json(doctor))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    DoctorService::new(&state).delete_doctor(doctor_id).await?;
    Ok(Json(json!({ "message": "Doctor deleted successfully" })))
}

#[axum::debug_handler]
pub async fn upload_doctor_image(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let upload = read_image_upload(multipart).await?;
    let image_url = DoctorService::new(&state).upload_image(doctor_id, upload).await?;

    Ok(Json(json!({
        "message": "Image uploaded successfully",
        "image_url": image_url
    })))
}

// ==============================================================================
// TIME SLOT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctor_time_slots_admin(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Vec<DoctorTimeSlot>>, AppError> {
    DoctorService::new(&state).get_doctor(doctor_id).await?;
    let slots = TimeSlotService::new(&state).list_for_doctor(doctor_id, false).await?;
    Ok(Json(slots))
}

#[axum::debug_handler]
pub async fn create_doctor_time_slot(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
    Json(request): Json<CreateTimeSlotRequest>,
) -> Result<Json<DoctorTimeSlot>, AppError> {
    let slot = TimeSlotService::new(&state).create_time_slot(doctor_id, request).await?;
    Ok(Json(slot))
}

#[axum::debug_handler]
pub async fn list_all_time_slots(State(state): State<AppState>) -> Result<Json<Vec<DoctorTimeSlot>>, AppError> {
    let slots = TimeSlotService::new(&state).list_all().await?;
    Ok(Json(slots))
}

/// Flat variant that takes `doctor_id` from the body.
#[axum::debug_handler]
pub async fn create_time_slot(
    State(state): State<AppState>,
    Json(request): Json<CreateTimeSlotRequest>,
) -> Result<Json<DoctorTimeSlot>, AppError> {
    let doctor_id = request
        .doctor_id
        .ok_or_else(|| AppError::ValidationError("doctor_id is required".to_string()))?;
    let slot = TimeSlotService::new(&state).create_time_slot(doctor_id, request).await?;
    Ok(Json(slot))
}

#[axum::debug_handler]
pub async fn update_time_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
    Json(request): Json<UpdateTimeSlotRequest>,
) -> Result<Json<DoctorTimeSlot>, AppError> {
    let slot = TimeSlotService::new(&state).update_time_slot(slot_id, request).await?;
    Ok(Json(slot))
}

#[axum::debug_handler]
pub async fn toggle_time_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
) -> Result<Json<DoctorTimeSlot>, AppError> {
    let slot = TimeSlotService::new(&state).toggle_time_slot(slot_id).await?;
    Ok(Json(slot))
}

#[axum::debug_handler]
pub async fn delete_time_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    TimeSlotService::new(&state).delete_time_slot(slot_id).await?;
    Ok(Json(json!({ "message": "Time slot deleted successfully" })))
}
