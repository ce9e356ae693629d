use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{AppState, SupabaseClient};
use shared_utils::time::{clinic_now, format_slot, parse_date, to_minute, DATE_FORMAT};

use crate::models::{AvailableSlot, AvailableSlotsResponse, Doctor, DoctorError, DoctorTimeSlot};
use crate::services::doctor::DoctorService;
use crate::services::time_slot::TimeSlotService;

/// Statuses that hold a slot.
pub const LIVE_STATUSES: &str = "(scheduled,confirmed)";

#[derive(Debug, Deserialize)]
struct BookedAppointment {
    date: NaiveDateTime,
}

pub struct AvailabilityService {
    config: Arc<AppConfig>,
    supabase: Arc<SupabaseClient>,
    doctors: DoctorService,
    time_slots: TimeSlotService,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            supabase: state.db.clone(),
            doctors: DoctorService::new(state),
            time_slots: TimeSlotService::new(state),
        }
    }

    pub async fn get_available_slots(&self, doctor_id: i64, raw_date: &str) -> Result<AvailableSlotsResponse, DoctorError> {
        let date = parse_date(raw_date).ok_or(DoctorError::InvalidDate)?;
        let doctor = self.doctors.get_doctor(doctor_id).await?;

        let available_slots = self.slots_for(&doctor, date).await?;

        Ok(AvailableSlotsResponse {
            doctor_id: doctor.id,
            doctor_name: doctor.name,
            date: date.format(DATE_FORMAT).to_string(),
            day_of_week: date.weekday().num_days_from_monday(),
            available_slots,
        })
    }

    /// Generated slots for `doctor` on `date`, with bookings and the clinic clock applied.
    pub async fn slots_for(&self, doctor: &Doctor, date: NaiveDate) -> Result<Vec<AvailableSlot>, DoctorError> {
        let day_of_week = date.weekday().num_days_from_monday();
        let windows = self.time_slots.list_for_day(doctor.id, day_of_week).await?;

        if windows.is_empty() {
            debug!("Doctor {} has no windows on day {}", doctor.id, day_of_week);
            return Ok(Vec::new());
        }

        let booked = self.booked_times(doctor.id, date).await?;
        Ok(generate_slots(date, &windows, &booked, clinic_now(&self.config)))
    }

    async fn booked_times(&self, doctor_id: i64, date: NaiveDate) -> Result<HashSet<NaiveTime>, DoctorError> {
        let next_day = date.succ_opt().unwrap_or(date);
        let path = format!(
            "/rest/v1/appointments?select=date&doctor_id=eq.{}&date=gte.{}T00:00:00&date=lt.{}T00:00:00&status=in.{}",
            doctor_id,
            date.format(DATE_FORMAT),
            next_day.format(DATE_FORMAT),
            LIVE_STATUSES
        );

        let appointments: Vec<BookedAppointment> = self.supabase.select(&path).await?;
        Ok(appointments
            .into_iter()
            .filter(|appointment| appointment.date.date() == date)
            .map(|appointment| to_minute(appointment.date.time()))
            .collect())
    }
}

/// Expands the windows for `date` into bookable start times.
///
/// Only windows whose `day_of_week` matches `date` and which are enabled are
/// used, in start-time order. Each window yields times from `start_time` in
/// `slot_duration_minutes` steps while the time is still before `end_time`.
/// A slot is unavailable when `booked` holds its start time (compared to the
/// minute) or when it starts at or before `now`.
pub fn generate_slots(
    date: NaiveDate,
    windows: &[DoctorTimeSlot],
    booked: &HashSet<NaiveTime>,
    now: NaiveDateTime,
) -> Vec<AvailableSlot> {
    let day_of_week = date.weekday().num_days_from_monday() as i32;

    let mut matching: Vec<&DoctorTimeSlot> = windows
        .iter()
        .filter(|window| window.is_available && window.day_of_week == day_of_week)
        .collect();
    matching.sort_by_key(|window| window.start_time);

    let mut slots = Vec::new();

    for window in matching {
        if window.slot_duration_minutes <= 0 {
            continue;
        }
        let step = Duration::minutes(i64::from(window.slot_duration_minutes));

        let mut current = window.start_time;
        while current < window.end_time {
            slots.push(AvailableSlot {
                time: format_slot(current),
                is_available: !booked.contains(&to_minute(current)) && date.and_time(current) > now,
                slot_id: window.id,
            });

            let (next, wrapped) = current.overflowing_add_signed(step);
            if wrapped != 0 {
                break;
            }
            current = next;
        }
    }

    slots
}
