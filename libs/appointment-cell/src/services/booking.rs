use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use doctor_cell::{AvailabilityService, DoctorService};
use patient_cell::PatientService;
use shared_config::AppConfig;
use shared_database::{AppState, DbError, SupabaseClient};
use shared_utils::confirmation::generate_confirmation_number;
use shared_utils::time::{clinic_now, format_slot, parse_date, parse_time, to_minute, DATE_FORMAT};

use crate::models::{
    Appointment, AppointmentError, AppointmentListQuery, AppointmentStatus, BookAppointmentRequest, BookingResponse,
};
use crate::services::lifecycle::AppointmentLifecycleService;

const STORED_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub struct AppointmentBookingService {
    config: Arc<AppConfig>,
    supabase: Arc<SupabaseClient>,
    doctors: DoctorService,
    patients: PatientService,
    availability: AvailabilityService,
    lifecycle: AppointmentLifecycleService,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            supabase: state.db.clone(),
            doctors: DoctorService::new(state),
            patients: PatientService::new(state),
            availability: AvailabilityService::new(state),
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    /// Books a generated slot for a patient.
    ///
    /// The request must name a future slot from the doctor's schedule that no
    /// live appointment holds. A unique-index violation on insert means another
    /// booking won the race and is reported the same way as a taken slot.
    pub async fn book_appointment(&self, request: BookAppointmentRequest) -> Result<BookingResponse, AppointmentError> {
        let date = parse_date(&request.preferred_date).ok_or(AppointmentError::InvalidDateTime)?;
        let time = parse_time(&request.preferred_time)
            .map(to_minute)
            .ok_or(AppointmentError::InvalidDateTime)?;
        let starts_at = date.and_time(time);

        if starts_at <= clinic_now(&self.config) {
            return Err(AppointmentError::InPast);
        }

        let doctor = self.doctors.get_doctor(request.doctor_id).await?;
        if !doctor.is_available {
            return Err(AppointmentError::DoctorUnavailable);
        }

        self.patients.find_patient(request.patient_id).await?;

        let slots = self.availability.slots_for(&doctor, date).await?;
        let slot = slots
            .iter()
            .find(|slot| parse_time(&slot.time) == Some(time))
            .ok_or(AppointmentError::OutsideSchedule)?;

        if !slot.is_available {
            warn!("Doctor {} slot {} on {} is already taken", doctor.id, slot.time, date);
            return Err(AppointmentError::SlotTaken);
        }

        let confirmation_number = generate_confirmation_number();
        let row = json!({
            "patient_id": request.patient_id,
            "doctor_id": doctor.id,
            "date": starts_at.format(STORED_DATETIME_FORMAT).to_string(),
            "status": AppointmentStatus::Scheduled,
            "reason": request.reason,
            "notes": request.notes,
            "confirmation_number": confirmation_number,
        });

        let appointment: Appointment = match self.supabase.insert("appointments", row).await {
            Ok(appointment) => appointment,
            Err(DbError::Conflict(detail)) => {
                warn!("Lost booking race for doctor {} at {}: {}", doctor.id, starts_at, detail);
                return Err(AppointmentError::SlotTaken);
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            "Booked appointment {} ({}) for patient {} with doctor {} at {}",
            appointment.id, appointment.confirmation_number, request.patient_id, doctor.id, starts_at
        );

        Ok(BookingResponse {
            appointment_id: appointment.id,
            speciality: doctor.speciality_name().to_string(),
            doctor_name: doctor.name,
            appointment_date: appointment.date.date().format(DATE_FORMAT).to_string(),
            appointment_time: format_slot(appointment.date.time()),
            status: appointment.status,
            confirmation_number: appointment.confirmation_number,
        })
    }

    pub async fn list_appointments(&self, query: &AppointmentListQuery) -> Result<Vec<Appointment>, AppointmentError> {
        let mut path = format!("/rest/v1/appointments?order=date.desc&{}", query.pagination().to_query());
        if let Some(status) = query.status {
            path.push_str(&format!("&status=eq.{}", status));
        }
        if let Some(doctor_id) = query.doctor_id {
            path.push_str(&format!("&doctor_id=eq.{}", doctor_id));
        }

        Ok(self.supabase.select(&path).await?)
    }

    pub async fn get_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        debug!("Fetching appointment {}", appointment_id);
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        self.supabase
            .select_one(&path)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    pub async fn list_patient_appointments(&self, patient_id: i64) -> Result<Vec<Appointment>, AppointmentError> {
        self.patients.find_patient(patient_id).await?;

        let path = format!("/rest/v1/appointments?patient_id=eq.{}&order=date.desc", patient_id);
        Ok(self.supabase.select(&path).await?)
    }

    /// Moves an appointment along the lifecycle. Leaving a live status frees the slot.
    pub async fn update_status(
        &self,
        appointment_id: i64,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let current = self.get_appointment(appointment_id).await?;
        self.lifecycle.validate_status_transition(current.status, new_status)?;

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let appointment: Appointment = self
            .supabase
            .update(&path, json!({ "status": new_status }))
            .await?
            .ok_or(AppointmentError::NotFound)?;

        info!("Appointment {} moved {} -> {}", appointment_id, current.status, new_status);
        Ok(appointment)
    }

    pub async fn cancel_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        self.update_status(appointment_id, AppointmentStatus::Cancelled).await
    }
}
