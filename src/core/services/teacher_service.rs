use tracing::debug;

use crate::domain::{RecordId, Teacher};
use crate::store::RecordStore;

use super::{require_name, require_non_negative, ServiceError, ServiceResult};

pub struct TeacherService;

impl TeacherService {
    pub fn add(store: &mut RecordStore, mut teacher: Teacher) -> ServiceResult<RecordId> {
        Self::validate(&teacher)?;
        teacher.name = teacher.name.trim().to_string();
        let id = store.add_teacher(teacher);
        debug!(teacher_id = id, "teacher added");
        Ok(id)
    }

    pub fn edit(store: &mut RecordStore, id: RecordId, changes: Teacher) -> ServiceResult<()> {
        Self::validate(&changes)?;
        let teacher = store
            .teacher_mut(id)
            .ok_or_else(|| ServiceError::not_found("Teacher", id))?;
        teacher.name = changes.name.trim().to_string();
        teacher.hourly_rate = changes.hourly_rate;
        debug!(teacher_id = id, "teacher updated");
        Ok(())
    }

    /// Deletes the teacher and unassigns the courses it taught.
    pub fn remove(store: &mut RecordStore, id: RecordId) -> ServiceResult<Teacher> {
        let orphaned = store
            .courses
            .iter()
            .filter(|course| course.teacher_id == Some(id))
            .count();
        let removed = store
            .remove_teacher(id)
            .ok_or_else(|| ServiceError::not_found("Teacher", id))?;
        debug!(teacher_id = id, orphaned, "teacher removed");
        Ok(removed)
    }

    pub fn list(store: &RecordStore) -> Vec<&Teacher> {
        store.teachers.iter().collect()
    }

    fn validate(teacher: &Teacher) -> ServiceResult<()> {
        require_name("Teacher name", &teacher.name)?;
        require_non_negative("Hourly rate", teacher.hourly_rate)
    }
}
