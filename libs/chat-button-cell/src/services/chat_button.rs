use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use shared_database::{AppState, SupabaseClient};
use shared_utils::validation::require_non_blank;

use crate::models::{ChatButton, ChatButtonError, ChatButtonFilter, CreateChatButtonRequest, UpdateChatButtonRequest};

const BUTTON_ORDER: &str = "order=display_order.asc,created_at.asc";

pub struct ChatButtonService {
    supabase: Arc<SupabaseClient>,
}

impl ChatButtonService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.db.clone(),
        }
    }

    pub async fn list_buttons(&self, filter: &ChatButtonFilter) -> Result<Vec<ChatButton>, ChatButtonError> {
        let mut path = format!("/rest/v1/chat_buttons?{}", BUTTON_ORDER);
        if let Some(is_active) = filter.is_active {
            path.push_str(&format!("&is_active=eq.{}", is_active));
        }
        if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
            path.push_str(&format!("&category=eq.{}", urlencoding::encode(category)));
        }

        debug!("Listing chat buttons with {:?}", filter);
        Ok(self.supabase.select(&path).await?)
    }

    pub async fn list_active(&self) -> Result<Vec<ChatButton>, ChatButtonError> {
        self.list_buttons(&ChatButtonFilter {
            is_active: Some(true),
            category: None,
        })
        .await
    }

    pub async fn get_button(&self, button_id: i64) -> Result<ChatButton, ChatButtonError> {
        let path = format!("/rest/v1/chat_buttons?id=eq.{}", button_id);
        self.supabase
            .select_one(&path)
            .await?
            .ok_or(ChatButtonError::NotFound)
    }

    pub async fn create_button(&self, request: CreateChatButtonRequest) -> Result<ChatButton, ChatButtonError> {
        require_non_blank("Button text", &request.button_text).map_err(ChatButtonError::Validation)?;
        require_non_blank("Button action", &request.button_action).map_err(ChatButtonError::Validation)?;

        let row = json!({
            "button_text": request.button_text.trim(),
            "button_action": request.button_action.trim(),
            "button_value": request.button_value,
            "button_icon": request.button_icon,
            "button_color": request.button_color,
            "button_variant": request.button_variant,
            "display_order": request.display_order,
            "is_active": request.is_active,
            "category": request.category,
            "description": request.description,
        });

        let button: ChatButton = self.supabase.insert("chat_buttons", row).await?;
        info!("Created chat button {} ({})", button.id, button.button_text);
        Ok(button)
    }

    pub async fn update_button(
        &self,
        button_id: i64,
        request: UpdateChatButtonRequest,
    ) -> Result<ChatButton, ChatButtonError> {
        let mut update_data = Map::new();

        if let Some(text) = request.button_text {
            require_non_blank("Button text", &text).map_err(ChatButtonError::Validation)?;
            update_data.insert("button_text".to_string(), json!(text.trim()));
        }
        if let Some(action) = request.button_action {
            require_non_blank("Button action", &action).map_err(ChatButtonError::Validation)?;
            update_data.insert("button_action".to_string(), json!(action.trim()));
        }
        let optional_fields = [
            ("button_value", request.button_value),
            ("button_icon", request.button_icon),
            ("button_color", request.button_color),
            ("button_variant", request.button_variant),
            ("category", request.category),
            ("description", request.description),
        ];
        for (column, value) in optional_fields {
            if let Some(value) = value {
                update_data.insert(column.to_string(), json!(value));
            }
        }
        if let Some(display_order) = request.display_order {
            update_data.insert("display_order".to_string(), json!(display_order));
        }
        if let Some(is_active) = request.is_active {
            update_data.insert("is_active".to_string(), json!(is_active));
        }

        if update_data.is_empty() {
            return self.get_button(button_id).await;
        }

        self.patch(button_id, update_data).await
    }

    pub async fn toggle_button(&self, button_id: i64) -> Result<ChatButton, ChatButtonError> {
        let current = self.get_button(button_id).await?;

        let mut update_data = Map::new();
        update_data.insert("is_active".to_string(), json!(!current.is_active));
        let button = self.patch(button_id, update_data).await?;

        info!("Chat button {} active: {}", button_id, button.is_active);
        Ok(button)
    }

    pub async fn delete_button(&self, button_id: i64) -> Result<(), ChatButtonError> {
        let deleted = self
            .supabase
            .delete(&format!("/rest/v1/chat_buttons?id=eq.{}", button_id))
            .await?;
        if deleted == 0 {
            return Err(ChatButtonError::NotFound);
        }

        info!("Deleted chat button {}", button_id);
        Ok(())
    }

    async fn patch(&self, button_id: i64, mut update_data: Map<String, Value>) -> Result<ChatButton, ChatButtonError> {
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/chat_buttons?id=eq.{}", button_id);
        self.supabase
            .update(&path, Value::Object(update_data))
            .await?
            .ok_or(ChatButtonError::NotFound)
    }
}
