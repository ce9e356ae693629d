use std::sync::Arc;

use chrono::{NaiveTime, Utc};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use shared_database::{AppState, SupabaseClient};
use shared_utils::time::{format_slot, to_minute};

use crate::models::{
    CreateTimeSlotRequest, DoctorError, DoctorTimeSlot, UpdateTimeSlotRequest, MAX_SLOT_DURATION_MINUTES,
};
use crate::services::doctor::DoctorService;

const TIME_COLUMN_FORMAT: &str = "%H:%M:%S";

pub struct TimeSlotService {
    supabase: Arc<SupabaseClient>,
    doctors: DoctorService,
}

impl TimeSlotService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.db.clone(),
            doctors: DoctorService::new(state),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<DoctorTimeSlot>, DoctorError> {
        Ok(self
            .supabase
            .select("/rest/v1/doctor_time_slots?order=doctor_id.asc,day_of_week.asc,start_time.asc")
            .await?)
    }

    /// Windows of one doctor; `only_available` hides disabled windows.
    pub async fn list_for_doctor(&self, doctor_id: i64, only_available: bool) -> Result<Vec<DoctorTimeSlot>, DoctorError> {
        debug!("Fetching time slots for doctor {}", doctor_id);
        let mut path = format!(
            "/rest/v1/doctor_time_slots?doctor_id=eq.{}&order=day_of_week.asc,start_time.asc",
            doctor_id
        );
        if only_available {
            path.push_str("&is_available=eq.true");
        }
        Ok(self.supabase.select(&path).await?)
    }

    pub async fn list_for_day(&self, doctor_id: i64, day_of_week: u32) -> Result<Vec<DoctorTimeSlot>, DoctorError> {
        let path = format!(
            "/rest/v1/doctor_time_slots?doctor_id=eq.{}&day_of_week=eq.{}&is_available=eq.true&order=start_time.asc",
            doctor_id, day_of_week
        );
        Ok(self.supabase.select(&path).await?)
    }

    pub async fn get_time_slot(&self, slot_id: i64) -> Result<DoctorTimeSlot, DoctorError> {
        let path = format!("/rest/v1/doctor_time_slots?id=eq.{}", slot_id);
        self.supabase
            .select_one(&path)
            .await?
            .ok_or(DoctorError::TimeSlotNotFound)
    }

    pub async fn create_time_slot(
        &self,
        doctor_id: i64,
        request: CreateTimeSlotRequest,
    ) -> Result<DoctorTimeSlot, DoctorError> {
        let start_time = to_minute(request.start_time);
        let end_time = to_minute(request.end_time);
        validate_window(request.day_of_week, start_time, end_time, request.slot_duration_minutes)?;

        self.doctors.get_doctor(doctor_id).await?;
        self.check_overlap(doctor_id, request.day_of_week, start_time, end_time, None)
            .await?;

        let row = json!({
            "doctor_id": doctor_id,
            "day_of_week": request.day_of_week,
            "start_time": start_time.format(TIME_COLUMN_FORMAT).to_string(),
            "end_time": end_time.format(TIME_COLUMN_FORMAT).to_string(),
            "slot_duration_minutes": request.slot_duration_minutes,
            "is_available": request.is_available,
        });

        let slot: DoctorTimeSlot = self.supabase.insert("doctor_time_slots", row).await?;
        info!(
            "Created time slot {} for doctor {} (day {} {}-{})",
            slot.id,
            doctor_id,
            slot.day_of_week,
            format_slot(slot.start_time),
            format_slot(slot.end_time)
        );
        Ok(slot)
    }

    /// Partial update; the merged window is validated as a whole and
    /// re-checked against the doctor's other windows on that day.
    pub async fn update_time_slot(
        &self,
        slot_id: i64,
        request: UpdateTimeSlotRequest,
    ) -> Result<DoctorTimeSlot, DoctorError> {
        let current = self.get_time_slot(slot_id).await?;

        let day_of_week = request.day_of_week.unwrap_or(current.day_of_week);
        let start_time = request.start_time.map(to_minute).unwrap_or(current.start_time);
        let end_time = request.end_time.map(to_minute).unwrap_or(current.end_time);
        let duration = request.slot_duration_minutes.unwrap_or(current.slot_duration_minutes);

        validate_window(day_of_week, start_time, end_time, duration)?;
        self.check_overlap(current.doctor_id, day_of_week, start_time, end_time, Some(slot_id))
            .await?;

        let mut update_data = Map::new();
        if request.day_of_week.is_some() {
            update_data.insert("day_of_week".to_string(), json!(day_of_week));
        }
        if request.start_time.is_some() {
            update_data.insert("start_time".to_string(), json!(start_time.format(TIME_COLUMN_FORMAT).to_string()));
        }
        if request.end_time.is_some() {
            update_data.insert("end_time".to_string(), json!(end_time.format(TIME_COLUMN_FORMAT).to_string()));
        }
        if request.slot_duration_minutes.is_some() {
            update_data.insert("slot_duration_minutes".to_string(), json!(duration));
        }
        if let Some(is_available) = request.is_available {
            update_data.insert("is_available".to_string(), json!(is_available));
        }

        if update_data.is_empty() {
            return Ok(current);
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/doctor_time_slots?id=eq.{}", slot_id);
        self.supabase
            .update(&path, Value::Object(update_data))
            .await?
            .ok_or(DoctorError::TimeSlotNotFound)
    }

    pub async fn toggle_time_slot(&self, slot_id: i64) -> Result<DoctorTimeSlot, DoctorError> {
        let current = self.get_time_slot(slot_id).await?;

        let update_data = json!({
            "is_available": !current.is_available,
            "updated_at": Utc::now().to_rfc3339(),
        });

        let path = format!("/rest/v1/doctor_time_slots?id=eq.{}", slot_id);
        let slot: DoctorTimeSlot = self
            .supabase
            .update(&path, update_data)
            .await?
            .ok_or(DoctorError::TimeSlotNotFound)?;

        info!("Time slot {} is now {}", slot_id, if slot.is_available { "enabled" } else { "disabled" });
        Ok(slot)
    }

    pub async fn delete_time_slot(&self, slot_id: i64) -> Result<(), DoctorError> {
        let path = format!("/rest/v1/doctor_time_slots?id=eq.{}", slot_id);
        if self.supabase.delete(&path).await? == 0 {
            return Err(DoctorError::TimeSlotNotFound);
        }
        info!("Deleted time slot {}", slot_id);
        Ok(())
    }

    async fn check_overlap(
        &self,
        doctor_id: i64,
        day_of_week: i32,
        start_time: NaiveTime,
        end_time: NaiveTime,
        exclude_id: Option<i64>,
    ) -> Result<(), DoctorError> {
        let path = format!(
            "/rest/v1/doctor_time_slots?doctor_id=eq.{}&day_of_week=eq.{}",
            doctor_id, day_of_week
        );
        let existing: Vec<DoctorTimeSlot> = self.supabase.select(&path).await?;

        if let Some(clash) = existing
            .iter()
            .filter(|slot| Some(slot.id) != exclude_id)
            .find(|slot| windows_overlap(start_time, end_time, slot.start_time, slot.end_time))
        {
            warn!("Time slot for doctor {} overlaps slot {}", doctor_id, clash.id);
            return Err(DoctorError::Overlap(format!(
                "Time slot overlaps with an existing slot ({}-{})",
                format_slot(clash.start_time),
                format_slot(clash.end_time)
            )));
        }

        Ok(())
    }
}

pub fn validate_window(
    day_of_week: i32,
    start_time: NaiveTime,
    end_time: NaiveTime,
    duration_minutes: i32,
) -> Result<(), DoctorError> {
    if !(0..=6).contains(&day_of_week) {
        return Err(DoctorError::Validation(
            "Day of week must be between 0 (Monday) and 6 (Sunday)".to_string(),
        ));
    }
    if start_time >= end_time {
        return Err(DoctorError::Validation("Start time must be before end time".to_string()));
    }
    if duration_minutes <= 0 || duration_minutes > MAX_SLOT_DURATION_MINUTES {
        return Err(DoctorError::Validation(format!(
            "Slot duration must be between 1 and {} minutes",
            MAX_SLOT_DURATION_MINUTES
        )));
    }
    Ok(())
}

/// Half-open windows; touching edges do not overlap.
pub fn windows_overlap(a_start: NaiveTime, a_end: NaiveTime, b_start: NaiveTime, b_end: NaiveTime) -> bool {
    a_start < b_end && b_start < a_end
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn window_validation() {
        assert!(validate_window(0, t(9, 0), t(17, 0), 30).is_ok());
        assert_matches!(validate_window(7, t(9, 0), t(17, 0), 30), Err(DoctorError::Validation(_)));
        assert_matches!(validate_window(-1, t(9, 0), t(17, 0), 30), Err(DoctorError::Validation(_)));
        assert_matches!(validate_window(2, t(17, 0), t(9, 0), 30), Err(DoctorError::Validation(_)));
        assert_matches!(validate_window(2, t(9, 0), t(9, 0), 30), Err(DoctorError::Validation(_)));
        assert_matches!(validate_window(2, t(9, 0), t(17, 0), 0), Err(DoctorError::Validation(_)));
        assert_matches!(validate_window(2, t(9, 0), t(17, 0), 241), Err(DoctorError::Validation(_)));
    }

    #[test]
    fn overlap_is_half_open() {
        assert!(windows_overlap(t(9, 0), t(12, 0), t(11, 0), t(13, 0)));
        assert!(windows_overlap(t(9, 0), t(17, 0), t(10, 0), t(11, 0)));
        assert!(!windows_overlap(t(9, 0), t(12, 0), t(12, 0), t(14, 0)));
        assert!(!windows_overlap(t(14, 0), t(16, 0), t(9, 0), t(12, 0)));
    }
}
