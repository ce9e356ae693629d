use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use shared_database::{AppState, SupabaseClient};
use shared_utils::validation::validate_phone;

use crate::models::{
    CallbackCreatedResponse, CallbackError, CallbackRequest, CallbackStatus, CreateCallbackRequest,
    UpdateCallbackRequest,
};

pub struct CallbackService {
    supabase: Arc<SupabaseClient>,
}

impl CallbackService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.db.clone(),
        }
    }

    pub async fn create_request(&self, request: CreateCallbackRequest) -> Result<CallbackCreatedResponse, CallbackError> {
        validate_phone("Mobile number", &request.mobile_number).map_err(CallbackError::Validation)?;

        let row = json!({
            "mobile_number": request.mobile_number.trim(),
            "status": CallbackStatus::Pending,
            "preferred_time": request.preferred_time,
            "notes": request.notes,
        });

        let created: CallbackRequest = self.supabase.insert("callback_requests", row).await?;
        info!("Received callback request {}", created.id);
        Ok(created.into())
    }

    /// Newest first.
    pub async fn list_requests(&self, status: Option<CallbackStatus>) -> Result<Vec<CallbackRequest>, CallbackError> {
        let mut path = "/rest/v1/callback_requests?order=created_at.desc".to_string();
        if let Some(status) = status {
            path.push_str(&format!("&status=eq.{}", status.as_str()));
        }

        debug!("Listing callback requests: {}", path);
        Ok(self.supabase.select(&path).await?)
    }

    pub async fn get_request(&self, request_id: i64) -> Result<CallbackRequest, CallbackError> {
        let path = format!("/rest/v1/callback_requests?id=eq.{}", request_id);
        self.supabase
            .select_one(&path)
            .await?
            .ok_or(CallbackError::NotFound)
    }

    /// Partial update; the first move to `contacted` stamps `contacted_at`.
    pub async fn update_request(
        &self,
        request_id: i64,
        request: UpdateCallbackRequest,
    ) -> Result<CallbackRequest, CallbackError> {
        let current = self.get_request(request_id).await?;
        let now = Utc::now().to_rfc3339();

        let mut update_data = Map::new();
        if let Some(status) = request.status {
            update_data.insert("status".to_string(), json!(status));
            if status == CallbackStatus::Contacted && current.contacted_at.is_none() {
                update_data.insert("contacted_at".to_string(), json!(now));
            }
        }
        if let Some(preferred_time) = request.preferred_time {
            update_data.insert("preferred_time".to_string(), json!(preferred_time));
        }
        if let Some(notes) = request.notes {
            update_data.insert("notes".to_string(), json!(notes));
        }
        if let Some(executive_notes) = request.executive_notes {
            update_data.insert("executive_notes".to_string(), json!(executive_notes));
        }

        if update_data.is_empty() {
            return Ok(current);
        }
        update_data.insert("updated_at".to_string(), json!(now));

        let path = format!("/rest/v1/callback_requests?id=eq.{}", request_id);
        let updated: CallbackRequest = self
            .supabase
            .update(&path, Value::Object(update_data))
            .await?
            .ok_or(CallbackError::NotFound)?;

        info!("Callback request {} is now {}", request_id, updated.status.as_str());
        Ok(updated)
    }
}
