use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use doctor_cell::DoctorError;
use patient_cell::PatientError;
use shared_database::DbError;
use shared_models::{error::AppError, pagination::Pagination};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Scheduled and confirmed appointments hold their slot.
    pub fn holds_slot(&self) -> bool {
        matches!(self, AppointmentStatus::Scheduled | AppointmentStatus::Confirmed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    /// Clinic-local start time.
    pub date: NaiveDateTime,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub confirmation_number: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: i64,
    pub doctor_id: i64,
    /// `YYYY-MM-DD`
    pub preferred_date: String,
    /// `HH:MM`
    pub preferred_time: String,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub appointment_id: i64,
    pub doctor_name: String,
    pub speciality: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub status: AppointmentStatus,
    pub confirmation_number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentListQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<AppointmentStatus>,
    pub doctor_id: Option<i64>,
}

impl AppointmentListQuery {
    pub fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            skip: self.skip.unwrap_or(defaults.skip),
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor is not available for appointments")]
    DoctorUnavailable,

    #[error("Invalid date or time format")]
    InvalidDateTime,

    #[error("Appointment time must be in the future")]
    InPast,

    #[error("Requested time is outside the doctor's schedule")]
    OutsideSchedule,

    #[error("Time slot already booked")]
    SlotTaken,

    #[error("Cannot change appointment status from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<DoctorError> for AppointmentError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppointmentError::DoctorNotFound,
            DoctorError::Database(e) => AppointmentError::Database(e),
            other => AppointmentError::Validation(other.to_string()),
        }
    }
}

impl From<PatientError> for AppointmentError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppointmentError::PatientNotFound,
            PatientError::Validation(msg) => AppointmentError::Validation(msg),
            PatientError::Database(e) => AppointmentError::Database(e),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound | AppointmentError::DoctorNotFound | AppointmentError::PatientNotFound => {
                AppError::NotFound(err.to_string())
            }
            AppointmentError::SlotTaken => AppError::Conflict(err.to_string()),
            AppointmentError::Validation(msg) => AppError::ValidationError(msg),
            AppointmentError::Database(e) => e.into(),
            AppointmentError::DoctorUnavailable
            | AppointmentError::InvalidDateTime
            | AppointmentError::InPast
            | AppointmentError::OutsideSchedule
            | AppointmentError::InvalidStatusTransition { .. } => AppError::BadRequest(err.to_string()),
        }
    }
}
