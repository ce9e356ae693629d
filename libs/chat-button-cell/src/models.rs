use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DbError;
use shared_models::error::AppError;

/// A quick-reply button shown by the patient chat widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatButton {
    pub id: i64,
    pub button_text: String,
    pub button_action: String,
    pub button_value: Option<String>,
    pub button_icon: Option<String>,
    pub button_color: String,
    pub button_variant: String,
    pub display_order: i32,
    pub is_active: bool,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatButtonRequest {
    pub button_text: String,
    pub button_action: String,
    pub button_value: Option<String>,
    pub button_icon: Option<String>,
    #[serde(default = "default_color")]
    pub button_color: String,
    #[serde(default = "default_variant")]
    pub button_variant: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub category: Option<String>,
    pub description: Option<String>,
}

fn default_color() -> String {
    "primary".to_string()
}

fn default_variant() -> String {
    "contained".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateChatButtonRequest {
    pub button_text: Option<String>,
    pub button_action: Option<String>,
    pub button_value: Option<String>,
    pub button_icon: Option<String>,
    pub button_color: Option<String>,
    pub button_variant: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
    pub category: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatButtonFilter {
    pub is_active: Option<bool>,
    pub category: Option<String>,
}

#[derive(Debug, Error)]
pub enum ChatButtonError {
    #[error("Chat button not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<ChatButtonError> for AppError {
    fn from(err: ChatButtonError) -> Self {
        match err {
            ChatButtonError::NotFound => AppError::NotFound(err.to_string()),
            ChatButtonError::Validation(msg) => AppError::ValidationError(msg),
            ChatButtonError::Database(e) => e.into(),
        }
    }
}
