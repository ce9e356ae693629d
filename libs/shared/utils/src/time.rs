//! Clinic-local time and the `HH:MM` formats used on the wire.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Timelike, Utc};

use shared_config::AppConfig;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const SLOT_FORMAT: &str = "%H:%M";

pub fn clinic_offset(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| Utc.fix())
}

/// Wall-clock time at the clinic, which is how appointment times are stored.
pub fn clinic_now(config: &AppConfig) -> NaiveDateTime {
    Utc::now()
        .with_timezone(&clinic_offset(config.clinic_utc_offset_minutes))
        .naive_local()
}

pub fn clinic_today(config: &AppConfig) -> NaiveDate {
    clinic_now(config).date()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, SLOT_FORMAT))
        .ok()
}

/// Drops seconds so times compare at slot resolution.
pub fn to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

pub fn format_slot(time: NaiveTime) -> String {
    time.format(SLOT_FORMAT).to_string()
}

/// Whole years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    today.years_since(birth)
}

/// Serde adapter for `NaiveTime` fields that accept `HH:MM` or `HH:MM:SS`.
pub mod flexible_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time '{}', expected HH:MM", raw)))
    }
}

pub mod flexible_time_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => super::flexible_time::serialize(time, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|raw| {
            super::parse_time(&raw)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid time '{}', expected HH:MM", raw)))
        })
        .transpose()
    }
}
