use chrono::NaiveDate;

use shared_utils::validation::{require_non_blank, validate_email, validate_phone};

use crate::models::{CreatePatientRequest, PatientError, UpdatePatientRequest};

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn check_birth_date(date_of_birth: Option<NaiveDate>, today: NaiveDate) -> Result<(), PatientError> {
    match date_of_birth {
        Some(dob) if dob > today => Err(PatientError::Validation(
            "Date of birth cannot be in the future".to_string(),
        )),
        _ => Ok(()),
    }
}

fn check_optional_contacts(
    email: &Option<String>,
    emergency_contact_phone: &Option<String>,
) -> Result<(), PatientError> {
    if let Some(email) = non_empty(email) {
        validate_email(email).map_err(PatientError::Validation)?;
    }
    if let Some(phone) = non_empty(emergency_contact_phone) {
        validate_phone("Emergency contact phone", phone).map_err(PatientError::Validation)?;
    }
    Ok(())
}

pub fn validate_new_patient(request: &CreatePatientRequest, today: NaiveDate) -> Result<(), PatientError> {
    require_non_blank("First name", &request.first_name).map_err(PatientError::Validation)?;
    require_non_blank("Last name", &request.last_name).map_err(PatientError::Validation)?;
    validate_phone("Phone number", &request.phone).map_err(PatientError::Validation)?;
    check_optional_contacts(&request.email, &request.emergency_contact_phone)?;
    check_birth_date(request.date_of_birth, today)
}

/// Only the supplied fields are checked.
pub fn validate_patient_update(request: &UpdatePatientRequest, today: NaiveDate) -> Result<(), PatientError> {
    if let Some(first_name) = &request.first_name {
        require_non_blank("First name", first_name).map_err(PatientError::Validation)?;
    }
    if let Some(last_name) = &request.last_name {
        require_non_blank("Last name", last_name).map_err(PatientError::Validation)?;
    }
    if let Some(phone) = &request.phone {
        validate_phone("Phone number", phone).map_err(PatientError::Validation)?;
    }
    check_optional_contacts(&request.email, &request.emergency_contact_phone)?;
    check_birth_date(request.date_of_birth, today)
}

/// Strips characters that carry meaning inside a PostgREST `or=(...)` filter.
pub fn sanitize_search_query(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '*' | '"' | '\\'))
        .collect::<String>()
        .trim()
        .to_string()
}
