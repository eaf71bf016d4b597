//! Logging tutoring sessions and debiting taught hours.

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::domain::{session::duration_hours, RecordId, Session};
use crate::store::{balances, RecordStore};

use super::{ServiceError, ServiceResult};

#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub date: NaiveDate,
    pub student_id: RecordId,
    pub course_id: RecordId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

pub struct SessionService;

impl SessionService {
    /// Logs a session and debits its duration from the student's course balance.
    ///
    /// The balance is clamped at zero, so logging more hours than were
    /// purchased is accepted. A session whose end is not after its start is
    /// rejected and nothing is stored.
    pub fn log(store: &mut RecordStore, request: SessionRequest) -> ServiceResult<RecordId> {
        let hours = duration_hours(request.start_time, request.end_time);
        if hours <= 0.0 {
            return Err(ServiceError::Invalid("End must be after start".into()));
        }
        let teacher_id = store
            .course(request.course_id)
            .ok_or_else(|| ServiceError::not_found("Course", request.course_id))?
            .teacher_id;
        if store.student(request.student_id).is_none() {
            return Err(ServiceError::not_found("Student", request.student_id));
        }

        let id = store.add_session(Session {
            id: 0,
            date: request.date,
            student_id: request.student_id,
            course_id: request.course_id,
            teacher_id,
            start_time: request.start_time,
            end_time: request.end_time,
            hours,
        });
        if let Some(student) = store.student_mut(request.student_id) {
            let balance = balances::debit(student, request.course_id, hours);
            debug!(session_id = id, student_id = student.id, hours, balance, "session logged");
        }
        Ok(id)
    }

    /// Deletes the session row only; the debited hours are not restored.
    pub fn remove(store: &mut RecordStore, id: RecordId) -> ServiceResult<Session> {
        let removed = store
            .remove_session(id)
            .ok_or_else(|| ServiceError::not_found("Session", id))?;
        debug!(session_id = id, "session removed");
        Ok(removed)
    }

    pub fn list(store: &RecordStore) -> Vec<&Session> {
        store.sessions.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{session::parse_clock, Course, Gender, Student, Teacher};

    fn request(
        student_id: RecordId,
        course_id: RecordId,
        start: &str,
        end: &str,
    ) -> SessionRequest {
        SessionRequest {
            date: NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
            student_id,
            course_id,
            start_time: parse_clock(start).unwrap(),
            end_time: parse_clock(end).unwrap(),
        }
    }

    fn store_with_balance(hours: f64) -> (RecordStore, RecordId, RecordId) {
        let mut store = RecordStore::new();
        let teacher = store.add_teacher(Teacher::new("Alice", 20.0));
        let course = store.add_course(Course::new("Math", 30.0, Some(teacher)));
        let mut student = Student::new("Charlie", Gender::M);
        student.balances.insert(course, hours);
        let student = store.add_student(student);
        (store, course, student)
    }

    #[test]
    fn log_debits_duration() {
        let (mut store, course, student) = store_with_balance(5.0);
        SessionService::log(&mut store, request(student, course, "14:00", "15:30")).unwrap();
        assert_eq!(store.sessions[0].hours, 1.5);
        assert_eq!(store.sessions[0].teacher_id, Some(1));
        assert_eq!(store.student(student).unwrap().balance(course), 3.5);
    }

    #[test]
    fn overuse_is_capped_at_zero() {
        let (mut store, course, student) = store_with_balance(1.0);
        SessionService::log(&mut store, request(student, course, "09:00", "12:00")).unwrap();
        assert_eq!(store.student(student).unwrap().balance(course), 0.0);
    }

    #[test]
    fn end_before_start_is_rejected_without_mutation() {
        let (mut store, course, student) = store_with_balance(5.0);
        let before = store.clone();
        let err = SessionService::log(&mut store, request(student, course, "15:00", "14:00"))
            .expect_err("reversed times must fail");
        assert!(matches!(
            err,
            ServiceError::Invalid(ref message) if message == "End must be after start"
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn zero_length_session_is_rejected() {
        let (mut store, course, student) = store_with_balance(5.0);
        let result = SessionService::log(&mut store, request(student, course, "10:00", "10:00"));
        assert!(result.is_err());
        assert!(store.sessions.is_empty());
    }
}
