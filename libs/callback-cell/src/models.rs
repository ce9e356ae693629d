use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DbError;
use shared_models::error::AppError;

pub const CALLBACK_ACKNOWLEDGEMENT: &str =
    "Thank you for your callback request! Our healthcare executive will contact you shortly.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CallbackStatus {
    Pending,
    Contacted,
    Completed,
    Cancelled,
}

impl CallbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackStatus::Pending => "pending",
            CallbackStatus::Contacted => "contacted",
            CallbackStatus::Completed => "completed",
            CallbackStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackRequest {
    pub id: i64,
    pub mobile_number: String,
    pub status: CallbackStatus,
    pub preferred_time: Option<String>,
    pub notes: Option<String>,
    pub executive_notes: Option<String>,
    pub contacted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCallbackRequest {
    pub mobile_number: String,
    pub preferred_time: Option<String>,
    pub notes: Option<String>,
}

/// What the public form gets back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackCreatedResponse {
    pub id: i64,
    pub mobile_number: String,
    pub status: CallbackStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<CallbackRequest> for CallbackCreatedResponse {
    fn from(request: CallbackRequest) -> Self {
        Self {
            id: request.id,
            mobile_number: request.mobile_number,
            status: request.status,
            message: CALLBACK_ACKNOWLEDGEMENT.to_string(),
            created_at: request.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCallbackRequest {
    pub status: Option<CallbackStatus>,
    pub preferred_time: Option<String>,
    pub notes: Option<String>,
    pub executive_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackListQuery {
    pub status: Option<CallbackStatus>,
}

#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("Callback request not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<CallbackError> for AppError {
    fn from(err: CallbackError) -> Self {
        match err {
            CallbackError::NotFound => AppError::NotFound(err.to_string()),
            CallbackError::Validation(msg) => AppError::ValidationError(msg),
            CallbackError::Database(e) => e.into(),
        }
    }
}
