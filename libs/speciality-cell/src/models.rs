use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DbError;
use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Speciality {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpecialityRequest {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSpecialityRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Error)]
pub enum SpecialityError {
    #[error("Speciality not found")]
    NotFound,

    #[error("Cannot delete specialty. {0} doctors are associated with this specialty.")]
    HasDoctors(u64),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<SpecialityError> for AppError {
    fn from(err: SpecialityError) -> Self {
        match err {
            SpecialityError::NotFound => AppError::NotFound(err.to_string()),
            SpecialityError::HasDoctors(_) => AppError::BadRequest(err.to_string()),
            SpecialityError::Validation(msg) => AppError::ValidationError(msg),
            SpecialityError::Database(e) => e.into(),
        }
    }
}
