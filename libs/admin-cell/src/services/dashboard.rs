use std::sync::Arc;

use tracing::debug;

use shared_database::{AppState, DbError, SupabaseClient};

use crate::models::{AdminError, DashboardStats};

pub struct DashboardService {
    supabase: Arc<SupabaseClient>,
}

impl DashboardService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.db.clone(),
        }
    }

    /// Every counter is an independent `count=exact` request, issued concurrently.
    pub async fn stats(&self) -> Result<DashboardStats, AdminError> {
        debug!("Collecting dashboard counts");

        let (
            total_doctors,
            total_specialities,
            total_time_slots,
            total_health_packages,
            total_appointments,
            active_appointments,
            completed_appointments,
            total_patients,
            pending_callbacks,
            total_health_package_bookings,
        ) = futures::try_join!(
            self.count("doctors", None),
            self.count("specialities", None),
            self.count("doctor_time_slots", None),
            self.count("health_packages", None),
            self.count("appointments", None),
            self.count("appointments", Some("status=in.(scheduled,confirmed)")),
            self.count("appointments", Some("status=eq.completed")),
            self.count("patients", None),
            self.count("callback_requests", Some("status=eq.pending")),
            self.count("health_package_bookings", None),
        )?;

        Ok(DashboardStats {
            total_doctors,
            total_specialities,
            total_time_slots,
            total_health_packages,
            total_appointments,
            active_appointments,
            completed_appointments,
            total_patients,
            pending_callbacks,
            total_health_package_bookings,
        })
    }

    async fn count(&self, table: &str, filter: Option<&str>) -> Result<u64, DbError> {
        let mut path = format!("/rest/v1/{}?select=id", table);
        if let Some(filter) = filter {
            path.push('&');
            path.push_str(filter);
        }
        self.supabase.count(&path).await
    }
}
