use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;

use shared_config::AppConfig;
use shared_database::AppState;
use shared_models::auth::User;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub require_admin_auth: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            require_admin_auth: false,
        }
    }
}

impl TestConfig {
    /// Config pointing at a wiremock server.
    pub fn with_backend(uri: &str) -> Self {
        Self {
            supabase_url: uri.to_string(),
            ..Self::default()
        }
    }

    /// Same as default, with admin routes protected.
    pub fn secured() -> Self {
        Self {
            require_admin_auth: true,
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: vec!["http://localhost:3000".to_string()],
            require_admin_auth: self.require_admin_auth,
            // Tests reason in UTC so fixtures need no offset arithmetic.
            clinic_utc_offset_minutes: 0,
            environment: "test".to_string(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    pub fn to_state(&self) -> AppState {
        AppState::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: format!("user-{}", email.split('@').next().unwrap_or("test")),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "patient")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// PostgREST row fixtures shaped like the tables in `001_schema.sql`.
pub struct MockPostgrestResponses;

impl MockPostgrestResponses {
    pub fn speciality_row(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": format!("{} department", name),
            "icon": "local_hospital",
            "is_active": true,
            "created_at": "2024-01-01T00:00:00+00:00"
        })
    }

    pub fn doctor_row(id: i64, name: &str, speciality_id: Option<i64>) -> Value {
        json!({
            "id": id,
            "name": name,
            "specialization": "General Medicine",
            "speciality_id": speciality_id,
            "qualification": "MBBS, MD",
            "experience_years": 12,
            "contact": "+91 98765 43210",
            "image_url": null,
            "is_available": true,
            "created_at": "2024-01-01T00:00:00+00:00",
            "speciality": speciality_id.map(|sid| Self::speciality_row(sid, "Cardiology"))
        })
    }

    pub fn time_slot_row(id: i64, doctor_id: i64, day_of_week: i32, start: &str, end: &str, duration: i32) -> Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "day_of_week": day_of_week,
            "start_time": start,
            "end_time": end,
            "slot_duration_minutes": duration,
            "is_available": true,
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-01T00:00:00+00:00"
        })
    }

    pub fn patient_row(id: i64, first_name: &str, last_name: &str) -> Value {
        json!({
            "id": id,
            "first_name": first_name,
            "last_name": last_name,
            "email": format!("{}@example.com", first_name.to_lowercase()),
            "phone": "+91 98765 43210",
            "address": null,
            "city": "Nagpur",
            "state": "Maharashtra",
            "postal_code": "440001",
            "date_of_birth": "1990-06-15",
            "gender": "Female",
            "emergency_contact_name": null,
            "emergency_contact_phone": null,
            "medical_history": null,
            "allergies": null,
            "current_medications": null,
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-01T00:00:00+00:00"
        })
    }

    pub fn appointment_row(id: i64, patient_id: i64, doctor_id: i64, date: &str, status: &str) -> Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "date": date,
            "status": status,
            "reason": null,
            "notes": null,
            "confirmation_number": "AB12CD34",
            "created_at": "2024-01-01T00:00:00+00:00"
        })
    }

    pub fn health_package_row(id: i64, name: &str, price: i64) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": format!("{} checkup", name),
            "price": price,
            "original_price": price + price / 4,
            "duration_hours": 2,
            "age_group": "18-40",
            "gender_specific": null,
            "fasting_required": true,
            "home_collection_available": true,
            "lab_visit_required": false,
            "report_delivery_days": 1,
            "is_active": true,
            "image_url": null,
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-01T00:00:00+00:00"
        })
    }

    pub fn health_package_test_row(id: i64, package_id: i64, test_name: &str) -> Value {
        json!({
            "id": id,
            "package_id": package_id,
            "test_name": test_name,
            "test_category": "Blood Test",
            "test_description": null,
            "is_optional": false,
            "created_at": "2024-01-01T00:00:00+00:00"
        })
    }

    pub fn health_package_booking_row(id: i64, package_id: i64, confirmation_number: &str) -> Value {
        json!({
            "id": id,
            "package_id": package_id,
            "patient_name": "Asha Rao",
            "patient_email": "asha@example.com",
            "patient_phone": "9876543210",
            "patient_age": 34,
            "patient_gender": "Female",
            "preferred_date": "2035-03-05",
            "preferred_time": "09:00",
            "home_collection": false,
            "address": null,
            "total_amount": 1999,
            "status": "confirmed",
            "confirmation_number": confirmation_number,
            "payment_status": "pending",
            "notes": null,
            "booking_date": "2035-03-05T09:00:00",
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-01T00:00:00+00:00"
        })
    }

    pub fn callback_row(id: i64, mobile_number: &str, status: &str) -> Value {
        json!({
            "id": id,
            "mobile_number": mobile_number,
            "status": status,
            "preferred_time": "Morning",
            "notes": null,
            "executive_notes": null,
            "contacted_at": null,
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-01T00:00:00+00:00"
        })
    }

    pub fn chat_button_row(id: i64, text: &str, is_active: bool) -> Value {
        json!({
            "id": id,
            "button_text": text,
            "button_action": "book_appointment",
            "button_value": null,
            "button_icon": "event",
            "button_color": "primary",
            "button_variant": "contained",
            "display_order": id,
            "is_active": is_active,
            "category": "booking",
            "description": null,
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-01T00:00:00+00:00"
        })
    }
}
