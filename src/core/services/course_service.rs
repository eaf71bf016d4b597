use tracing::debug;

use crate::domain::{Course, RecordId};
use crate::store::RecordStore;

use super::{require_name, require_non_negative, ServiceError, ServiceResult};

pub struct CourseService;

impl CourseService {
    pub fn add(store: &mut RecordStore, mut course: Course) -> ServiceResult<RecordId> {
        Self::validate(store, &course)?;
        course.name = course.name.trim().to_string();
        let id = store.add_course(course);
        debug!(course_id = id, "course added");
        Ok(id)
    }

    /// Updates name, rate, and teacher.
    ///
    /// Balances are keyed by course id, so a rename carries them forward.
    /// Payments and sessions keep the teacher and rate they were recorded with.
    pub fn edit(store: &mut RecordStore, id: RecordId, changes: Course) -> ServiceResult<()> {
        Self::validate(store, &changes)?;
        let course = store
            .course_mut(id)
            .ok_or_else(|| ServiceError::not_found("Course", id))?;
        course.name = changes.name.trim().to_string();
        course.hourly_rate = changes.hourly_rate;
        course.teacher_id = changes.teacher_id;
        debug!(course_id = id, "course updated");
        Ok(())
    }

    pub fn remove(store: &mut RecordStore, id: RecordId) -> ServiceResult<Course> {
        let removed = store
            .remove_course(id)
            .ok_or_else(|| ServiceError::not_found("Course", id))?;
        debug!(course_id = id, "course removed");
        Ok(removed)
    }

    pub fn list(store: &RecordStore) -> Vec<&Course> {
        store.courses.iter().collect()
    }

    fn validate(store: &RecordStore, course: &Course) -> ServiceResult<()> {
        require_name("Course name", &course.name)?;
        require_non_negative("Hourly rate", course.hourly_rate)?;
        if let Some(teacher_id) = course.teacher_id {
            if store.teacher(teacher_id).is_none() {
                return Err(ServiceError::not_found("Teacher", teacher_id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Teacher;

    #[test]
    fn unknown_teacher_is_rejected() {
        let mut store = RecordStore::new();
        let err = CourseService::add(&mut store, Course::new("Math", 30.0, Some(3)))
            .expect_err("teacher must exist");
        assert!(matches!(err, ServiceError::NotFound { kind: "Teacher", id: 3 }));
        assert!(store.courses.is_empty());
    }

    #[test]
    fn unassigned_course_is_allowed() {
        let mut store = RecordStore::new();
        let id = CourseService::add(&mut store, Course::new("Art", 20.0, None)).unwrap();
        assert_eq!(store.course(id).unwrap().teacher_id, None);
    }

    #[test]
    fn edit_reassigns_teacher() {
        let mut store = RecordStore::new();
        let bob = store.add_teacher(Teacher::new("Bob", 35.0));
        let id = CourseService::add(&mut store, Course::new("Art", 20.0, None)).unwrap();
        CourseService::edit(&mut store, id, Course::new("Art II", 25.0, Some(bob))).unwrap();
        let course = store.course(id).unwrap();
        assert_eq!(course.name, "Art II");
        assert_eq!(course.teacher_id, Some(bob));
    }
}
