use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DbError;
use shared_models::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_doctors: u64,
    pub total_specialities: u64,
    pub total_time_slots: u64,
    pub total_health_packages: u64,
    pub total_appointments: u64,
    pub active_appointments: u64,
    pub completed_appointments: u64,
    pub total_patients: u64,
    pub pending_callbacks: u64,
    pub total_health_package_bookings: u64,
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::Database(e) => e.into(),
        }
    }
}
