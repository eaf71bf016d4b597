use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::common::{Dated, Identifiable, RecordId};

/// Clock format used for session start and end times.
pub const TIME_FORMAT: &str = "%H:%M";

/// A logged tutoring session debiting hours from a student's balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: RecordId,
    pub date: NaiveDate,
    pub student_id: RecordId,
    pub course_id: RecordId,
    #[serde(default)]
    pub teacher_id: Option<RecordId>,
    #[serde(with = "clock")]
    pub start_time: NaiveTime,
    #[serde(with = "clock")]
    pub end_time: NaiveTime,
    pub hours: f64,
}

impl Identifiable for Session {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Dated for Session {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Elapsed hours between two clock times on the same day.
///
/// Negative or zero when `end` is not after `start`.
pub fn duration_hours(start: NaiveTime, end: NaiveTime) -> f64 {
    (end - start).num_minutes() as f64 / 60.0
}

pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).ok()
}

mod clock {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock(&raw)
            .or_else(|| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S").ok())
            .ok_or_else(|| de::Error::custom(format!("invalid clock time `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_handles_partial_hours() {
        let start = parse_clock("14:00").unwrap();
        let end = parse_clock("15:30").unwrap();
        assert!((duration_hours(start, end) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn duration_is_negative_when_end_precedes_start() {
        let start = parse_clock("15:00").unwrap();
        let end = parse_clock("14:00").unwrap();
        assert!(duration_hours(start, end) < 0.0);
    }

    #[test]
    fn clock_times_serialize_as_hours_and_minutes() {
        let session = Session {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            student_id: 1,
            course_id: 1,
            teacher_id: Some(1),
            start_time: parse_clock("09:05").unwrap(),
            end_time: parse_clock("10:05").unwrap(),
            hours: 1.0,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["startTime"], "09:05");
        assert_eq!(json["teacherId"], 1);
        let back: Session = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }
}
