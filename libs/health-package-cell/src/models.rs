use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DbError;
use shared_models::{error::AppError, pagination::Pagination};

/// Package columns without the stored image payload.
pub const HEALTH_PACKAGE_COLUMNS: &str = "id,name,description,price,original_price,duration_hours,age_group,gender_specific,fasting_required,home_collection_available,lab_visit_required,report_delivery_days,is_active,image_url,created_at,updated_at";

// ==============================================================================
// PACKAGES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthPackage {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub original_price: Option<i64>,
    pub duration_hours: i32,
    pub age_group: String,
    pub gender_specific: Option<String>,
    pub fasting_required: bool,
    pub home_collection_available: bool,
    pub lab_visit_required: bool,
    pub report_delivery_days: i32,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HealthPackage {
    /// Rounded percentage saved against `original_price`, when there is a saving.
    pub fn discount_percent(&self) -> Option<i64> {
        match self.original_price {
            Some(original) if original > self.price && original > 0 => {
                let saved = (original - self.price) as f64;
                Some((saved / original as f64 * 100.0).round() as i64)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthPackageResponse {
    #[serde(flatten)]
    pub package: HealthPackage,
    pub discount_percent: Option<i64>,
}

impl From<HealthPackage> for HealthPackageResponse {
    fn from(package: HealthPackage) -> Self {
        Self {
            discount_percent: package.discount_percent(),
            package,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthPackageWithTests {
    #[serde(flatten)]
    pub package: HealthPackageResponse,
    pub tests: Vec<HealthPackageTest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageFilter {
    pub age_group: Option<String>,
    pub gender: Option<String>,
    pub max_price: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHealthPackageRequest {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub original_price: Option<i64>,
    #[serde(default = "default_duration_hours")]
    pub duration_hours: i32,
    pub age_group: String,
    pub gender_specific: Option<String>,
    #[serde(default)]
    pub fasting_required: bool,
    #[serde(default = "default_true")]
    pub home_collection_available: bool,
    #[serde(default = "default_true")]
    pub lab_visit_required: bool,
    #[serde(default = "default_report_days")]
    pub report_delivery_days: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHealthPackageRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub original_price: Option<i64>,
    pub duration_hours: Option<i32>,
    pub age_group: Option<String>,
    pub gender_specific: Option<String>,
    pub fasting_required: Option<bool>,
    pub home_collection_available: Option<bool>,
    pub lab_visit_required: Option<bool>,
    pub report_delivery_days: Option<i32>,
    pub is_active: Option<bool>,
    pub image_url: Option<String>,
}

fn default_duration_hours() -> i32 {
    2
}

fn default_report_days() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoredImage {
    pub image_data: Option<String>,
    pub image_content_type: Option<String>,
}

// ==============================================================================
// PACKAGE TESTS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthPackageTest {
    pub id: i64,
    pub package_id: i64,
    pub test_name: String,
    pub test_category: String,
    pub test_description: Option<String>,
    pub is_optional: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePackageTestRequest {
    pub test_name: String,
    pub test_category: String,
    pub test_description: Option<String>,
    #[serde(default)]
    pub is_optional: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePackageTestRequest {
    pub test_name: Option<String>,
    pub test_category: Option<String>,
    pub test_description: Option<String>,
    pub is_optional: Option<bool>,
}

// ==============================================================================
// BOOKINGS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Completed,
    Cancelled,
    Rescheduled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Rescheduled => "rescheduled",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthPackageBooking {
    pub id: i64,
    pub package_id: i64,
    pub patient_name: String,
    pub patient_email: Option<String>,
    pub patient_phone: String,
    pub patient_age: i32,
    pub patient_gender: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: String,
    pub home_collection: bool,
    pub address: Option<String>,
    pub total_amount: i64,
    pub status: BookingStatus,
    pub confirmation_number: String,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub booking_date: NaiveDateTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookPackageRequest {
    pub package_id: i64,
    pub patient_name: String,
    pub patient_email: Option<String>,
    pub patient_phone: String,
    pub patient_age: i32,
    pub patient_gender: String,
    /// `YYYY-MM-DD`
    pub preferred_date: String,
    /// `HH:MM`
    pub preferred_time: String,
    #[serde(default)]
    pub home_collection: bool,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageBookingResponse {
    pub booking_id: i64,
    pub package_name: String,
    pub total_amount: i64,
    pub booking_date: String,
    pub booking_time: String,
    pub status: BookingStatus,
    pub confirmation_number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingListQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<BookingStatus>,
}

impl BookingListQuery {
    pub fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            skip: self.skip.unwrap_or(defaults.skip),
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookingRequest {
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<String>,
    pub notes: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error)]
pub enum HealthPackageError {
    #[error("Health package not found")]
    NotFound,

    #[error("Health package booking not found")]
    BookingNotFound,

    #[error("Health package test not found")]
    TestNotFound,

    #[error("Image not found")]
    ImageNotFound,

    #[error("Cannot delete package. {0} bookings are associated with this package.")]
    HasBookings(u64),

    #[error("Invalid date or time format")]
    InvalidDateTime,

    #[error("Could not allocate a unique confirmation number")]
    ConfirmationExhausted,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<HealthPackageError> for AppError {
    fn from(err: HealthPackageError) -> Self {
        match err {
            HealthPackageError::NotFound
            | HealthPackageError::BookingNotFound
            | HealthPackageError::TestNotFound
            | HealthPackageError::ImageNotFound => AppError::NotFound(err.to_string()),
            HealthPackageError::HasBookings(_) | HealthPackageError::InvalidDateTime => {
                AppError::BadRequest(err.to_string())
            }
            HealthPackageError::ConfirmationExhausted => AppError::Internal(err.to_string()),
            HealthPackageError::Validation(msg) => AppError::ValidationError(msg),
            HealthPackageError::Database(e) => e.into(),
        }
    }
}
