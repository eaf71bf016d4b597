use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{RecordId, Student};
use crate::store::RecordStore;

use super::{require_name, ServiceError, ServiceResult};

pub struct StudentService;

impl StudentService {
    /// Adds a student with an empty balance sheet and a freshly derived age.
    pub fn add(
        store: &mut RecordStore,
        mut student: Student,
        today: NaiveDate,
    ) -> ServiceResult<RecordId> {
        require_name("Student name", &student.name)?;
        student.name = student.name.trim().to_string();
        student.balances.clear();
        student.refresh_age(today);
        let id = store.add_student(student);
        debug!(student_id = id, "student added");
        Ok(id)
    }

    /// Replaces the profile fields of a student; balances are left untouched.
    pub fn edit(
        store: &mut RecordStore,
        id: RecordId,
        changes: Student,
        today: NaiveDate,
    ) -> ServiceResult<()> {
        require_name("Student name", &changes.name)?;
        let student = store
            .student_mut(id)
            .ok_or_else(|| ServiceError::not_found("Student", id))?;
        student.name = changes.name.trim().to_string();
        student.gender = changes.gender;
        student.birthdate = changes.birthdate;
        student.parent = changes.parent;
        student.contact = changes.contact;
        student.refresh_age(today);
        debug!(student_id = id, "student updated");
        Ok(())
    }

    /// Deletes the student; payment and session history is kept as-is.
    pub fn remove(store: &mut RecordStore, id: RecordId) -> ServiceResult<Student> {
        let removed = store
            .remove_student(id)
            .ok_or_else(|| ServiceError::not_found("Student", id))?;
        debug!(student_id = id, "student removed");
        Ok(removed)
    }

    pub fn list(store: &RecordStore) -> Vec<&Student> {
        store.students.iter().collect()
    }

    /// Course balances of `student` that fall below `threshold` hours.
    pub fn low_balances(student: &Student, threshold: f64) -> Vec<(RecordId, f64)> {
        student
            .balances
            .iter()
            .filter(|(_, hours)| **hours < threshold)
            .map(|(course, hours)| (*course, *hours))
            .collect()
    }
}
