use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DbError;
use shared_models::error::AppError;
use shared_utils::time::{flexible_time, flexible_time_option};
use speciality_cell::Speciality;

/// Column list for doctor reads. Leaves out `image_data` and embeds the speciality.
pub const DOCTOR_COLUMNS: &str = "id,name,specialization,speciality_id,qualification,experience_years,contact,image_url,is_available,created_at,speciality:specialities(*)";

// ==============================================================================
// DOCTOR MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    pub speciality_id: Option<i64>,
    pub qualification: Option<String>,
    pub experience_years: Option<i32>,
    pub contact: Option<String>,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub speciality: Option<Speciality>,
}

impl Doctor {
    /// Linked speciality name, or the free-text specialization.
    pub fn speciality_name(&self) -> &str {
        self.speciality
            .as_ref()
            .map(|speciality| speciality.name.as_str())
            .unwrap_or(self.specialization.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    #[serde(default)]
    pub specialization: Option<String>,
    pub speciality_id: Option<i64>,
    pub qualification: Option<String>,
    pub experience_years: Option<i32>,
    pub contact: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub speciality_id: Option<i64>,
    pub qualification: Option<String>,
    pub experience_years: Option<i32>,
    pub contact: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoredImage {
    pub image_data: Option<String>,
    pub image_content_type: Option<String>,
}

// ==============================================================================
// TIME SLOT MODELS
// ==============================================================================

/// Recurring weekly window. `day_of_week` counts from Monday = 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorTimeSlot {
    pub id: i64,
    pub doctor_id: i64,
    pub day_of_week: i32,
    #[serde(with = "flexible_time")]
    pub start_time: NaiveTime,
    #[serde(with = "flexible_time")]
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTimeSlotRequest {
    /// Only read by the flat `/doctor-time-slots` route.
    #[serde(default)]
    pub doctor_id: Option<i64>,
    pub day_of_week: i32,
    #[serde(with = "flexible_time")]
    pub start_time: NaiveTime,
    #[serde(with = "flexible_time")]
    pub end_time: NaiveTime,
    #[serde(default = "default_slot_duration")]
    pub slot_duration_minutes: i32,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTimeSlotRequest {
    pub day_of_week: Option<i32>,
    #[serde(default, with = "flexible_time_option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "flexible_time_option")]
    pub end_time: Option<NaiveTime>,
    pub slot_duration_minutes: Option<i32>,
    pub is_available: Option<bool>,
}

pub const DEFAULT_SLOT_DURATION_MINUTES: i32 = 30;
pub const MAX_SLOT_DURATION_MINUTES: i32 = 240;

fn default_slot_duration() -> i32 {
    DEFAULT_SLOT_DURATION_MINUTES
}

fn default_true() -> bool {
    true
}

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableSlot {
    /// `HH:MM`
    pub time: String,
    pub is_available: bool,
    pub slot_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlotsResponse {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub date: String,
    pub day_of_week: u32,
    pub available_slots: Vec<AvailableSlot>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Specialty not found")]
    SpecialityNotFound,

    #[error("Time slot not found")]
    TimeSlotNotFound,

    #[error("Image not found")]
    ImageNotFound,

    #[error("Invalid date format. Use YYYY-MM-DD")]
    InvalidDate,

    #[error("Cannot delete doctor. {0} appointments are associated with this doctor.")]
    HasAppointments(u64),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Overlap(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound
            | DoctorError::SpecialityNotFound
            | DoctorError::TimeSlotNotFound
            | DoctorError::ImageNotFound => AppError::NotFound(err.to_string()),
            DoctorError::InvalidDate | DoctorError::HasAppointments(_) => AppError::BadRequest(err.to_string()),
            DoctorError::Validation(msg) => AppError::ValidationError(msg),
            DoctorError::Overlap(msg) => AppError::Conflict(msg),
            DoctorError::Database(e) => e.into(),
        }
    }
}
