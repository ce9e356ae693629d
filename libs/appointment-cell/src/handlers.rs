use axum::{
    extract::{Path, Query, State},
    Json,
};

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{Appointment, AppointmentListQuery, BookAppointmentRequest, BookingResponse, UpdateStatusRequest};
use crate::services::AppointmentBookingService;

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<AppState>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = AppointmentBookingService::new(&state).book_appointment(request).await?;
    Ok(Json(booking))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = AppointmentBookingService::new(&state).list_appointments(&query).await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = AppointmentBookingService::new(&state).get_appointment(appointment_id).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = AppointmentBookingService::new(&state)
        .update_status(appointment_id, request.status)
        .await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = AppointmentBookingService::new(&state).cancel_appointment(appointment_id).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn list_patient_appointments(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = AppointmentBookingService::new(&state)
        .list_patient_appointments(patient_id)
        .await?;
    Ok(Json(appointments))
}
