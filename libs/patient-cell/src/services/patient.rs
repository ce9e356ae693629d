use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::{AppState, SupabaseClient};
use shared_models::pagination::Pagination;
use shared_utils::time::{clinic_today, DATE_FORMAT};

use crate::models::{CreatePatientRequest, Patient, PatientError, PatientResponse, UpdatePatientRequest};
use crate::services::validation::{sanitize_search_query, validate_new_patient, validate_patient_update};

const SEARCH_LIMIT: u32 = 50;

pub struct PatientService {
    config: Arc<AppConfig>,
    supabase: Arc<SupabaseClient>,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            supabase: state.db.clone(),
        }
    }

    fn today(&self) -> NaiveDate {
        clinic_today(&self.config)
    }

    fn respond(&self, patient: Patient) -> PatientResponse {
        PatientResponse::new(patient, self.today())
    }

    pub async fn create_patient(&self, request: CreatePatientRequest) -> Result<PatientResponse, PatientError> {
        validate_new_patient(&request, self.today())?;

        let patient_data = json!({
            "first_name": request.first_name.trim(),
            "last_name": request.last_name.trim(),
            "email": request.email.as_deref().map(str::trim).filter(|e| !e.is_empty()),
            "phone": request.phone.trim(),
            "address": request.address,
            "city": request.city,
            "state": request.state,
            "postal_code": request.postal_code,
            "date_of_birth": request.date_of_birth.map(|dob| dob.format(DATE_FORMAT).to_string()),
            "gender": request.gender,
            "emergency_contact_name": request.emergency_contact_name,
            "emergency_contact_phone": request.emergency_contact_phone.as_deref().map(str::trim),
            "medical_history": request.medical_history,
            "allergies": request.allergies,
            "current_medications": request.current_medications,
        });

        let patient: Patient = self.supabase.insert("patients", patient_data).await?;
        info!("Registered patient {}", patient.id);
        Ok(self.respond(patient))
    }

    pub async fn list_patients(&self, page: Pagination) -> Result<Vec<PatientResponse>, PatientError> {
        let path = format!("/rest/v1/patients?order=created_at.desc&{}", page.to_query());
        let patients: Vec<Patient> = self.supabase.select(&path).await?;
        Ok(patients.into_iter().map(|p| self.respond(p)).collect())
    }

    pub async fn find_patient(&self, patient_id: i64) -> Result<Patient, PatientError> {
        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        self.supabase
            .select_one(&path)
            .await?
            .ok_or(PatientError::NotFound)
    }

    pub async fn get_patient(&self, patient_id: i64) -> Result<PatientResponse, PatientError> {
        debug!("Fetching patient {}", patient_id);
        let patient = self.find_patient(patient_id).await?;
        Ok(self.respond(patient))
    }

    pub async fn update_patient(
        &self,
        patient_id: i64,
        request: UpdatePatientRequest,
    ) -> Result<PatientResponse, PatientError> {
        validate_patient_update(&request, self.today())?;

        let mut update_data = Map::new();
        let text_fields = [
            ("first_name", request.first_name.map(|v| v.trim().to_string())),
            ("last_name", request.last_name.map(|v| v.trim().to_string())),
            ("email", request.email),
            ("phone", request.phone.map(|v| v.trim().to_string())),
            ("address", request.address),
            ("city", request.city),
            ("state", request.state),
            ("postal_code", request.postal_code),
            ("gender", request.gender),
            ("emergency_contact_name", request.emergency_contact_name),
            ("emergency_contact_phone", request.emergency_contact_phone.map(|v| v.trim().to_string())),
            ("medical_history", request.medical_history),
            ("allergies", request.allergies),
            ("current_medications", request.current_medications),
        ];
        for (column, value) in text_fields {
            if let Some(value) = value {
                update_data.insert(column.to_string(), json!(value));
            }
        }
        if let Some(dob) = request.date_of_birth {
            update_data.insert("date_of_birth".to_string(), json!(dob.format(DATE_FORMAT).to_string()));
        }

        if update_data.is_empty() {
            return self.get_patient(patient_id).await;
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let patient: Patient = self
            .supabase
            .update(&path, Value::Object(update_data))
            .await?
            .ok_or(PatientError::NotFound)?;

        info!("Updated patient {}", patient_id);
        Ok(self.respond(patient))
    }

    /// Case-insensitive substring match over name, e-mail and phone.
    pub async fn search_patients(&self, raw_query: &str) -> Result<Vec<PatientResponse>, PatientError> {
        let query = sanitize_search_query(raw_query);
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = urlencoding::encode(&format!("*{}*", query)).into_owned();
        let path = format!(
            "/rest/v1/patients?or=(first_name.ilike.{p},last_name.ilike.{p},email.ilike.{p},phone.ilike.{p})&order=first_name.asc&limit={limit}",
            p = pattern,
            limit = SEARCH_LIMIT
        );

        debug!("Searching patients for '{}'", query);
        let patients: Vec<Patient> = self.supabase.select(&path).await?;
        Ok(patients.into_iter().map(|p| self.respond(p)).collect())
    }
}
