use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    next_id, Course, Expense, Identifiable, Payment, RecordId, Session, Student, Teacher,
};

/// Names of the six record collections, as they appear in persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Students,
    Teachers,
    Courses,
    Payments,
    Sessions,
    Expenses,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Students,
        Collection::Teachers,
        Collection::Courses,
        Collection::Payments,
        Collection::Sessions,
        Collection::Expenses,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Collection::Students => "students",
            Collection::Teachers => "teachers",
            Collection::Courses => "courses",
            Collection::Payments => "payments",
            Collection::Sessions => "sessions",
            Collection::Expenses => "expenses",
        }
    }
}

/// In-memory collection of every tutoring-center record.
///
/// Serializes as the whole persisted document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordStore {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved: Option<DateTime<Utc>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_student(&mut self, mut student: Student) -> RecordId {
        student.id = next_id(&self.students);
        let id = student.id;
        self.students.push(student);
        id
    }

    pub fn add_teacher(&mut self, mut teacher: Teacher) -> RecordId {
        teacher.id = next_id(&self.teachers);
        let id = teacher.id;
        self.teachers.push(teacher);
        id
    }

    pub fn add_course(&mut self, mut course: Course) -> RecordId {
        course.id = next_id(&self.courses);
        let id = course.id;
        self.courses.push(course);
        id
    }

    pub fn add_payment(&mut self, mut payment: Payment) -> RecordId {
        payment.id = next_id(&self.payments);
        let id = payment.id;
        self.payments.push(payment);
        id
    }

    pub fn add_session(&mut self, mut session: Session) -> RecordId {
        session.id = next_id(&self.sessions);
        let id = session.id;
        self.sessions.push(session);
        id
    }

    pub fn add_expense(&mut self, mut expense: Expense) -> RecordId {
        expense.id = next_id(&self.expenses);
        let id = expense.id;
        self.expenses.push(expense);
        id
    }

    pub fn student(&self, id: RecordId) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    pub fn student_mut(&mut self, id: RecordId) -> Option<&mut Student> {
        self.students.iter_mut().find(|student| student.id == id)
    }

    pub fn teacher(&self, id: RecordId) -> Option<&Teacher> {
        self.teachers.iter().find(|teacher| teacher.id == id)
    }

    pub fn teacher_mut(&mut self, id: RecordId) -> Option<&mut Teacher> {
        self.teachers.iter_mut().find(|teacher| teacher.id == id)
    }

    pub fn course(&self, id: RecordId) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    pub fn course_mut(&mut self, id: RecordId) -> Option<&mut Course> {
        self.courses.iter_mut().find(|course| course.id == id)
    }

    pub fn remove_student(&mut self, id: RecordId) -> Option<Student> {
        remove_by_id(&mut self.students, id)
    }

    /// Removes a teacher and unassigns every course that pointed at it.
    ///
    /// Payments and sessions keep their copied teacher reference.
    pub fn remove_teacher(&mut self, id: RecordId) -> Option<Teacher> {
        let removed = remove_by_id(&mut self.teachers, id)?;
        for course in &mut self.courses {
            if course.teacher_id == Some(id) {
                course.teacher_id = None;
            }
        }
        Some(removed)
    }

    pub fn remove_course(&mut self, id: RecordId) -> Option<Course> {
        remove_by_id(&mut self.courses, id)
    }

    pub fn remove_payment(&mut self, id: RecordId) -> Option<Payment> {
        remove_by_id(&mut self.payments, id)
    }

    pub fn remove_session(&mut self, id: RecordId) -> Option<Session> {
        remove_by_id(&mut self.sessions, id)
    }

    pub fn remove_expense(&mut self, id: RecordId) -> Option<Expense> {
        remove_by_id(&mut self.expenses, id)
    }

    /// Builds an id-indexed view of the teachers for constant-time rate lookups.
    pub fn teacher_index(&self) -> TeacherIndex<'_> {
        TeacherIndex {
            by_id: self
                .teachers
                .iter()
                .map(|teacher| (teacher.id, teacher))
                .collect(),
        }
    }

    pub fn count(&self, collection: Collection) -> usize {
        match collection {
            Collection::Students => self.students.len(),
            Collection::Teachers => self.teachers.len(),
            Collection::Courses => self.courses.len(),
            Collection::Payments => self.payments.len(),
            Collection::Sessions => self.sessions.len(),
            Collection::Expenses => self.expenses.len(),
        }
    }

    pub fn touch(&mut self) {
        self.last_saved = Some(Utc::now());
    }
}

fn remove_by_id<T: Identifiable>(records: &mut Vec<T>, id: RecordId) -> Option<T> {
    let position = records.iter().position(|record| record.id() == id)?;
    Some(records.remove(position))
}

/// Teachers keyed by identifier.
///
/// A missing or unassigned reference resolves to an empty name and a zero
/// rate, keeping every aggregation total.
pub struct TeacherIndex<'a> {
    by_id: HashMap<RecordId, &'a Teacher>,
}

impl<'a> TeacherIndex<'a> {
    pub fn get(&self, id: Option<RecordId>) -> Option<&'a Teacher> {
        id.and_then(|id| self.by_id.get(&id).copied())
    }

    pub fn rate(&self, id: Option<RecordId>) -> f64 {
        self.get(id).map_or(0.0, |teacher| teacher.hourly_rate)
    }

    pub fn name(&self, id: Option<RecordId>) -> &'a str {
        self.get(id).map_or("", |teacher| teacher.name.as_str())
    }
}
