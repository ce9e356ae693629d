use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::{AppState, DbError, SupabaseClient};
use shared_utils::confirmation::generate_confirmation_number;
use shared_utils::time::{clinic_now, format_slot, parse_date, parse_time, DATE_FORMAT};
use shared_utils::validation::{require_non_blank, validate_email, validate_phone};

use crate::models::{
    BookPackageRequest, BookingListQuery, BookingStatus, HealthPackageBooking, HealthPackageError,
    PackageBookingResponse, PaymentStatus, UpdateBookingRequest,
};
use crate::services::package::HealthPackageService;

pub const MAX_CONFIRMATION_ATTEMPTS: usize = 5;
pub const MAX_PATIENT_AGE: i32 = 120;

const STORED_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub struct PackageBookingService {
    config: Arc<AppConfig>,
    supabase: Arc<SupabaseClient>,
    packages: HealthPackageService,
}

impl PackageBookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            supabase: state.db.clone(),
            packages: HealthPackageService::new(state),
        }
    }

    pub async fn book_package(&self, request: BookPackageRequest) -> Result<PackageBookingResponse, HealthPackageError> {
        let (date, time) = validate_booking_request(&request, clinic_now(&self.config))?;

        let package = self.packages.get_active_package(request.package_id).await?;
        if request.home_collection && !package.home_collection_available {
            return Err(HealthPackageError::Validation(
                "Home collection is not available for this package".to_string(),
            ));
        }

        let booking_date = date.and_time(time);
        let mut row = json!({
            "package_id": package.id,
            "patient_name": request.patient_name.trim(),
            "patient_email": request.patient_email.as_deref().map(str::trim).filter(|e| !e.is_empty()),
            "patient_phone": request.patient_phone.trim(),
            "patient_age": request.patient_age,
            "patient_gender": request.patient_gender.trim(),
            "preferred_date": date.format(DATE_FORMAT).to_string(),
            "preferred_time": format_slot(time),
            "home_collection": request.home_collection,
            "address": request.address,
            "total_amount": package.price,
            "status": BookingStatus::Confirmed,
            "payment_status": PaymentStatus::Pending,
            "notes": request.notes,
            "booking_date": booking_date.format(STORED_DATETIME_FORMAT).to_string(),
        });

        // The unique index on confirmation_number decides collisions.
        for attempt in 1..=MAX_CONFIRMATION_ATTEMPTS {
            row["confirmation_number"] = json!(generate_confirmation_number());

            match self.supabase.insert::<HealthPackageBooking>("health_package_bookings", row.clone()).await {
                Ok(booking) => {
                    info!(
                        "Booked health package {} as booking {} ({})",
                        package.id, booking.id, booking.confirmation_number
                    );
                    return Ok(PackageBookingResponse {
                        booking_id: booking.id,
                        package_name: package.name,
                        total_amount: booking.total_amount,
                        booking_date: date.format(DATE_FORMAT).to_string(),
                        booking_time: format_slot(time),
                        status: booking.status,
                        confirmation_number: booking.confirmation_number,
                    });
                }
                Err(DbError::Conflict(detail)) => {
                    warn!("Confirmation number collision on attempt {}: {}", attempt, detail);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(HealthPackageError::ConfirmationExhausted)
    }

    pub async fn list_bookings(&self, query: &BookingListQuery) -> Result<Vec<HealthPackageBooking>, HealthPackageError> {
        let mut path = format!(
            "/rest/v1/health_package_bookings?order=created_at.desc&{}",
            query.pagination().to_query()
        );
        if let Some(status) = query.status {
            path.push_str(&format!("&status=eq.{}", status.as_str()));
        }

        Ok(self.supabase.select(&path).await?)
    }

    pub async fn get_booking(&self, booking_id: i64) -> Result<HealthPackageBooking, HealthPackageError> {
        debug!("Fetching health package booking {}", booking_id);
        let path = format!("/rest/v1/health_package_bookings?id=eq.{}", booking_id);
        self.supabase
            .select_one(&path)
            .await?
            .ok_or(HealthPackageError::BookingNotFound)
    }

    /// Partial update. A new date or time also moves `booking_date`.
    pub async fn update_booking(
        &self,
        booking_id: i64,
        request: UpdateBookingRequest,
    ) -> Result<HealthPackageBooking, HealthPackageError> {
        let current = self.get_booking(booking_id).await?;

        let new_time = match request.preferred_time.as_deref() {
            Some(raw) => Some(parse_time(raw).ok_or(HealthPackageError::InvalidDateTime)?),
            None => None,
        };

        let mut update_data = Map::new();
        if let Some(status) = request.status {
            update_data.insert("status".to_string(), json!(status));
        }
        if let Some(payment_status) = request.payment_status {
            update_data.insert("payment_status".to_string(), json!(payment_status));
        }
        if let Some(notes) = request.notes {
            update_data.insert("notes".to_string(), json!(notes));
        }

        if request.preferred_date.is_some() || new_time.is_some() {
            let date = request.preferred_date.unwrap_or(current.preferred_date);
            let time = match new_time {
                Some(time) => time,
                None => parse_time(&current.preferred_time).unwrap_or(current.booking_date.time()),
            };
            update_data.insert("preferred_date".to_string(), json!(date.format(DATE_FORMAT).to_string()));
            update_data.insert("preferred_time".to_string(), json!(format_slot(time)));
            update_data.insert(
                "booking_date".to_string(),
                json!(date.and_time(time).format(STORED_DATETIME_FORMAT).to_string()),
            );
        }

        if update_data.is_empty() {
            return Ok(current);
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/health_package_bookings?id=eq.{}", booking_id);
        let booking: HealthPackageBooking = self
            .supabase
            .update(&path, Value::Object(update_data))
            .await?
            .ok_or(HealthPackageError::BookingNotFound)?;

        info!("Updated health package booking {}", booking_id);
        Ok(booking)
    }
}

/// Field checks that need no database access. Returns the parsed slot.
pub fn validate_booking_request(
    request: &BookPackageRequest,
    now: NaiveDateTime,
) -> Result<(NaiveDate, NaiveTime), HealthPackageError> {
    require_non_blank("Patient name", &request.patient_name).map_err(HealthPackageError::Validation)?;
    validate_phone("Phone number", &request.patient_phone).map_err(HealthPackageError::Validation)?;

    if let Some(email) = request.patient_email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        validate_email(email).map_err(HealthPackageError::Validation)?;
    }
    if !(0..=MAX_PATIENT_AGE).contains(&request.patient_age) {
        return Err(HealthPackageError::Validation(format!(
            "Patient age must be between 0 and {}",
            MAX_PATIENT_AGE
        )));
    }
    require_non_blank("Patient gender", &request.patient_gender).map_err(HealthPackageError::Validation)?;

    if request.home_collection && request.address.as_deref().map_or(true, |a| a.trim().is_empty()) {
        return Err(HealthPackageError::Validation(
            "Address is required for home collection".to_string(),
        ));
    }

    let date = parse_date(&request.preferred_date).ok_or(HealthPackageError::InvalidDateTime)?;
    let time = parse_time(&request.preferred_time).ok_or(HealthPackageError::InvalidDateTime)?;

    if date.and_time(time) < now {
        return Err(HealthPackageError::Validation(
            "Booking date and time cannot be in the past".to_string(),
        ));
    }

    Ok((date, time))
}
