use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use shared_database::{AppState, SupabaseClient};
use shared_models::pagination::Pagination;
use shared_utils::image::ImageUpload;
use shared_utils::validation::require_non_blank;
use speciality_cell::{Speciality, SpecialityError, SpecialityService};

use crate::models::{CreateDoctorRequest, Doctor, DoctorError, StoredImage, UpdateDoctorRequest, DOCTOR_COLUMNS};

pub struct DoctorService {
    supabase: Arc<SupabaseClient>,
    specialities: SpecialityService,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.db.clone(),
            specialities: SpecialityService::new(state),
        }
    }

    pub async fn list_doctors(&self, page: Pagination) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing doctors ({})", page.to_query());
        let path = format!("/rest/v1/doctors?select={}&order=id.asc&{}", DOCTOR_COLUMNS, page.to_query());
        Ok(self.supabase.select(&path).await?)
    }

    pub async fn list_all_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        let path = format!("/rest/v1/doctors?select={}&order=name.asc", DOCTOR_COLUMNS);
        Ok(self.supabase.select(&path).await?)
    }

    pub async fn list_by_speciality(&self, speciality_id: i64) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing available doctors for speciality {}", speciality_id);
        let path = format!(
            "/rest/v1/doctors?select={}&speciality_id=eq.{}&is_available=eq.true&order=name.asc",
            DOCTOR_COLUMNS, speciality_id
        );
        Ok(self.supabase.select(&path).await?)
    }

    pub async fn get_doctor(&self, doctor_id: i64) -> Result<Doctor, DoctorError> {
        let path = format!("/rest/v1/doctors?select={}&id=eq.{}", DOCTOR_COLUMNS, doctor_id);
        self.supabase
            .select_one(&path)
            .await?
            .ok_or(DoctorError::NotFound)
    }

    async fn require_speciality(&self, speciality_id: i64) -> Result<Speciality, DoctorError> {
        self.specialities
            .get_speciality(speciality_id)
            .await
            .map_err(|e| match e {
                SpecialityError::Database(db) => DoctorError::Database(db),
                _ => DoctorError::SpecialityNotFound,
            })
    }

    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        require_non_blank("Doctor name", &request.name).map_err(DoctorError::Validation)?;

        let speciality = match request.speciality_id {
            Some(id) => Some(self.require_speciality(id).await?),
            None => None,
        };

        let specialization = request
            .specialization
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .or_else(|| speciality.as_ref().map(|s| s.name.clone()))
            .ok_or_else(|| DoctorError::Validation("Specialization or speciality_id is required".to_string()))?;

        let row = json!({
            "name": request.name.trim(),
            "specialization": specialization,
            "speciality_id": request.speciality_id,
            "qualification": request.qualification,
            "experience_years": request.experience_years,
            "contact": request.contact,
            "image_url": request.image_url,
            "is_available": request.is_available,
        });

        let created: Value = self.supabase.insert("doctors", row).await?;
        let doctor_id = created["id"]
            .as_i64()
            .ok_or_else(|| DoctorError::Validation("Doctor insert returned no id".to_string()))?;

        info!("Created doctor {} ({})", doctor_id, request.name.trim());
        self.get_doctor(doctor_id).await
    }

    pub async fn update_doctor(&self, doctor_id: i64, request: UpdateDoctorRequest) -> Result<Doctor, DoctorError> {
        let mut update_data = Map::new();

        if let Some(name) = request.name {
            require_non_blank("Doctor name", &name).map_err(DoctorError::Validation)?;
            update_data.insert("name".to_string(), json!(name.trim()));
        }
        if let Some(speciality_id) = request.speciality_id {
            let speciality = self.require_speciality(speciality_id).await?;
            update_data.insert("speciality_id".to_string(), json!(speciality_id));
            if request.specialization.is_none() {
                update_data.insert("specialization".to_string(), json!(speciality.name));
            }
        }
        if let Some(specialization) = request.specialization {
            update_data.insert("specialization".to_string(), json!(specialization));
        }
        if let Some(qualification) = request.qualification {
            update_data.insert("qualification".to_string(), json!(qualification));
        }
        if let Some(experience_years) = request.experience_years {
            update_data.insert("experience_years".to_string(), json!(experience_years));
        }
        if let Some(contact) = request.contact {
            update_data.insert("contact".to_string(), json!(contact));
        }
        if let Some(image_url) = request.image_url {
            update_data.insert("image_url".to_string(), json!(image_url));
        }
        if let Some(is_available) = request.is_available {
            update_data.insert("is_available".to_string(), json!(is_available));
        }

        if update_data.is_empty() {
            return self.get_doctor(doctor_id).await;
        }

        let path = format!("/rest/v1/doctors?id=eq.{}&select={}", doctor_id, DOCTOR_COLUMNS);
        self.supabase
            .update(&path, Value::Object(update_data))
            .await?
            .ok_or(DoctorError::NotFound)
    }

    /// Refuses while appointments reference the doctor.
    pub async fn delete_doctor(&self, doctor_id: i64) -> Result<(), DoctorError> {
        self.get_doctor(doctor_id).await?;

        let appointments = self
            .supabase
            .count(&format!("/rest/v1/appointments?select=id&doctor_id=eq.{}", doctor_id))
            .await?;
        if appointments > 0 {
            warn!("Refusing to delete doctor {} with {} appointments", doctor_id, appointments);
            return Err(DoctorError::HasAppointments(appointments));
        }

        self.supabase
            .delete(&format!("/rest/v1/doctors?id=eq.{}", doctor_id))
            .await?;

        info!("Deleted doctor {}", doctor_id);
        Ok(())
    }

    pub async fn upload_image(&self, doctor_id: i64, upload: ImageUpload) -> Result<String, DoctorError> {
        debug!("Storing {} byte image for doctor {}", upload.bytes.len(), doctor_id);

        let image_url = format!("/doctors/{}/image", doctor_id);
        let update_data = json!({
            "image_data": upload.to_base64(),
            "image_content_type": upload.content_type,
            "image_url": image_url,
        });

        let path = format!("/rest/v1/doctors?id=eq.{}&select=id", doctor_id);
        let updated: Option<Value> = self.supabase.update(&path, update_data).await?;
        if updated.is_none() {
            return Err(DoctorError::NotFound);
        }

        info!("Updated image for doctor {}", doctor_id);
        Ok(image_url)
    }

    /// Base64 payload and content type of the stored image.
    pub async fn get_image(&self, doctor_id: i64) -> Result<(String, String), DoctorError> {
        let path = format!("/rest/v1/doctors?select=image_data,image_content_type&id=eq.{}", doctor_id);
        let stored: StoredImage = self
            .supabase
            .select_one(&path)
            .await?
            .ok_or(DoctorError::NotFound)?;

        match stored.image_data {
            Some(data) if !data.is_empty() => Ok((
                data,
                stored.image_content_type.unwrap_or_else(|| "image/jpeg".to_string()),
            )),
            _ => Err(DoctorError::ImageNotFound),
        }
    }
}
