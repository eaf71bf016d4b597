//! Purchased-hour balances per student and course.
//!
//! Payments credit a student's balance for the paid course and sessions debit
//! it. A balance never drops below zero: over-use is capped, not rejected.

use crate::domain::{RecordId, Student};

/// Adds `hours` to the student's balance for `course_id`, creating the bucket if needed.
pub fn credit(student: &mut Student, course_id: RecordId, hours: f64) -> f64 {
    let balance = student.balances.entry(course_id).or_insert(0.0);
    *balance += hours;
    *balance
}

/// Removes `hours` from the student's balance for `course_id`, clamped at zero.
pub fn debit(student: &mut Student, course_id: RecordId, hours: f64) -> f64 {
    let balance = student.balances.entry(course_id).or_insert(0.0);
    *balance = (*balance - hours).max(0.0);
    *balance
}

/// Total remaining hours across all students for one course.
pub fn outstanding_hours(students: &[Student], course_id: RecordId) -> f64 {
    students
        .iter()
        .map(|student| student.balance(course_id))
        .sum()
}
