use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, info};

use shared_database::{AppState, SupabaseClient};
use shared_utils::validation::require_non_blank;

use crate::models::{CreateSpecialityRequest, Speciality, SpecialityError, UpdateSpecialityRequest};

pub struct SpecialityService {
    supabase: Arc<SupabaseClient>,
}

impl SpecialityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.db.clone(),
        }
    }

    pub async fn list_active(&self) -> Result<Vec<Speciality>, SpecialityError> {
        debug!("Fetching active specialities");
        Ok(self
            .supabase
            .select("/rest/v1/specialities?is_active=eq.true&order=name.asc")
            .await?)
    }

    pub async fn list_all(&self) -> Result<Vec<Speciality>, SpecialityError> {
        Ok(self.supabase.select("/rest/v1/specialities?order=name.asc").await?)
    }

    pub async fn get_speciality(&self, speciality_id: i64) -> Result<Speciality, SpecialityError> {
        debug!("Fetching speciality {}", speciality_id);
        let path = format!("/rest/v1/specialities?id=eq.{}", speciality_id);
        self.supabase
            .select_one(&path)
            .await?
            .ok_or(SpecialityError::NotFound)
    }

    pub async fn create_speciality(&self, request: CreateSpecialityRequest) -> Result<Speciality, SpecialityError> {
        require_non_blank("Speciality name", &request.name).map_err(SpecialityError::Validation)?;

        let row = json!({
            "name": request.name.trim(),
            "description": request.description,
            "icon": request.icon,
            "is_active": request.is_active,
        });

        let speciality: Speciality = self.supabase.insert("specialities", row).await?;
        info!("Created speciality {} ({})", speciality.id, speciality.name);
        Ok(speciality)
    }

    pub async fn update_speciality(
        &self,
        speciality_id: i64,
        request: UpdateSpecialityRequest,
    ) -> Result<Speciality, SpecialityError> {
        let mut update_data = Map::new();

        if let Some(name) = request.name {
            require_non_blank("Speciality name", &name).map_err(SpecialityError::Validation)?;
            update_data.insert("name".to_string(), json!(name.trim()));
        }
        if let Some(description) = request.description {
            update_data.insert("description".to_string(), json!(description));
        }
        if let Some(icon) = request.icon {
            update_data.insert("icon".to_string(), json!(icon));
        }
        if let Some(is_active) = request.is_active {
            update_data.insert("is_active".to_string(), json!(is_active));
        }

        if update_data.is_empty() {
            return self.get_speciality(speciality_id).await;
        }

        let path = format!("/rest/v1/specialities?id=eq.{}", speciality_id);
        self.supabase
            .update(&path, Value::Object(update_data))
            .await?
            .ok_or(SpecialityError::NotFound)
    }

    /// Refuses while any doctor still points at the speciality.
    pub async fn delete_speciality(&self, speciality_id: i64) -> Result<(), SpecialityError> {
        self.get_speciality(speciality_id).await?;

        let doctors = self
            .supabase
            .count(&format!("/rest/v1/doctors?select=id&speciality_id=eq.{}", speciality_id))
            .await?;
        if doctors > 0 {
            return Err(SpecialityError::HasDoctors(doctors));
        }

        let path = format!("/rest/v1/specialities?id=eq.{}", speciality_id);
        if self.supabase.delete(&path).await? == 0 {
            return Err(SpecialityError::NotFound);
        }

        info!("Deleted speciality {}", speciality_id);
        Ok(())
    }
}
