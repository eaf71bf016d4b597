use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{DateRange, RecordId};
use crate::store::RecordStore;

/// Label used for sessions whose teacher cannot be resolved.
pub const UNKNOWN_TEACHER: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeacherHours {
    pub teacher_id: Option<RecordId>,
    pub teacher: String,
    pub total_hours: f64,
    /// Current rate from the teacher record, not the rate at session time.
    pub hourly_rate: f64,
    pub salary: f64,
}

/// Sums taught hours and salary per teacher over `range`.
///
/// Idle teachers are omitted. Rows come back in teacher-id order, with
/// sessions lacking a teacher reference grouped last.
pub fn aggregate_teacher_hours(store: &RecordStore, range: Option<DateRange>) -> Vec<TeacherHours> {
    let Some(range) = range else {
        return Vec::new();
    };
    let teachers = store.teacher_index();

    let mut by_teacher: BTreeMap<RecordId, f64> = BTreeMap::new();
    let mut unassigned: Option<f64> = None;
    for session in store.sessions.iter().filter(|s| range.contains(s.date)) {
        match session.teacher_id {
            Some(id) => *by_teacher.entry(id).or_insert(0.0) += session.hours,
            None => *unassigned.get_or_insert(0.0) += session.hours,
        }
    }

    by_teacher
        .into_iter()
        .map(|(id, hours)| (Some(id), hours))
        .chain(unassigned.map(|hours| (None, hours)))
        .map(|(teacher_id, total_hours)| {
            let teacher = teachers
                .get(teacher_id)
                .map_or(UNKNOWN_TEACHER, |teacher| teacher.name.as_str())
                .to_string();
            let hourly_rate = teachers.rate(teacher_id);
            TeacherHours {
                teacher_id,
                teacher,
                total_hours,
                hourly_rate,
                salary: total_hours * hourly_rate,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{session::parse_clock, Session, Teacher};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn log(store: &mut RecordStore, day: u32, teacher_id: Option<RecordId>, hours: f64) {
        store.add_session(Session {
            id: 0,
            date: date(day),
            student_id: 1,
            course_id: 1,
            teacher_id,
            start_time: parse_clock("08:00").unwrap(),
            end_time: parse_clock("09:00").unwrap(),
            hours,
        });
    }

    #[test]
    fn groups_hours_and_skips_idle_teachers() {
        let mut store = RecordStore::new();
        let alice = store.add_teacher(Teacher::new("Alice", 30.0));
        store.add_teacher(Teacher::new("Idle", 99.0));
        let cara = store.add_teacher(Teacher::new("Cara", 10.0));
        log(&mut store, 2, Some(cara), 2.0);
        log(&mut store, 3, Some(alice), 1.0);
        log(&mut store, 4, Some(alice), 0.5);
        log(&mut store, 28, Some(alice), 4.0);

        let rows = aggregate_teacher_hours(&store, Some(DateRange::new(date(1), date(10))));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].teacher, "Alice");
        assert_eq!(rows[0].total_hours, 1.5);
        assert_eq!(rows[0].salary, 45.0);
        assert_eq!(rows[1].teacher, "Cara");
        assert_eq!(rows[1].salary, 20.0);
    }

    #[test]
    fn uses_live_rate_and_unknown_for_missing_teacher() {
        let mut store = RecordStore::new();
        let alice = store.add_teacher(Teacher::new("Alice", 30.0));
        log(&mut store, 5, Some(alice), 2.0);
        log(&mut store, 5, Some(42), 1.0);
        log(&mut store, 6, None, 3.0);
        store.teacher_mut(alice).unwrap().hourly_rate = 50.0;

        let rows = aggregate_teacher_hours(&store, Some(DateRange::new(date(1), date(31))));
        assert_eq!(rows[0].salary, 100.0);
        assert_eq!(rows[1].teacher, UNKNOWN_TEACHER);
        assert_eq!(rows[1].hourly_rate, 0.0);
        assert_eq!(rows[2].teacher_id, None);
        assert_eq!(rows[2].total_hours, 3.0);
    }

    #[test]
    fn missing_range_is_empty() {
        let mut store = RecordStore::new();
        log(&mut store, 5, None, 1.0);
        assert!(aggregate_teacher_hours(&store, None).is_empty());
    }
}
