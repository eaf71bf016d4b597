//! Recording tuition payments and crediting purchased hours.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Payment, PaymentMethod, RecordId};
use crate::store::{balances, RecordStore};

use super::{require_non_negative, require_positive, ServiceError, ServiceResult};

/// User-entered payment fields; teacher and rate are derived from the course.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub date: NaiveDate,
    pub student_id: RecordId,
    pub course_id: RecordId,
    pub purchased_hours: f64,
    pub amount_paid: f64,
    pub payment_method: PaymentMethod,
}

pub struct PaymentService;

impl PaymentService {
    /// Records a payment and credits its hours to the student's course balance.
    ///
    /// Nothing is mutated unless the course and student both resolve and the
    /// amounts are valid.
    pub fn record(store: &mut RecordStore, request: PaymentRequest) -> ServiceResult<RecordId> {
        require_positive("Purchased hours", request.purchased_hours)?;
        require_non_negative("Amount paid", request.amount_paid)?;
        let course = store
            .course(request.course_id)
            .ok_or_else(|| ServiceError::not_found("Course", request.course_id))?;
        let (teacher_id, hourly_rate) = (course.teacher_id, course.hourly_rate);
        if store.student(request.student_id).is_none() {
            return Err(ServiceError::not_found("Student", request.student_id));
        }

        let id = store.add_payment(Payment {
            id: 0,
            date: request.date,
            student_id: request.student_id,
            course_id: request.course_id,
            teacher_id,
            hourly_rate,
            purchased_hours: request.purchased_hours,
            discounted_tuition: 0.0,
            amount_paid: request.amount_paid,
            payment_method: request.payment_method,
        });
        if let Some(student) = store.student_mut(request.student_id) {
            let balance = balances::credit(student, request.course_id, request.purchased_hours);
            debug!(payment_id = id, student_id = student.id, balance, "payment recorded");
        }
        Ok(id)
    }

    /// Deletes the payment row only; balances already credited stay as they are.
    pub fn remove(store: &mut RecordStore, id: RecordId) -> ServiceResult<Payment> {
        let removed = store
            .remove_payment(id)
            .ok_or_else(|| ServiceError::not_found("Payment", id))?;
        debug!(payment_id = id, "payment removed");
        Ok(removed)
    }

    pub fn list(store: &RecordStore) -> Vec<&Payment> {
        store.payments.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Course, Gender, Student, Teacher};

    fn store_with_course() -> (RecordStore, RecordId, RecordId, RecordId) {
        let mut store = RecordStore::new();
        let teacher = store.add_teacher(Teacher::new("Alice", 20.0));
        let course = store.add_course(Course::new("Math", 30.0, Some(teacher)));
        let student = store.add_student(Student::new("Charlie", Gender::M));
        (store, teacher, course, student)
    }

    fn request(student_id: RecordId, course_id: RecordId, hours: f64) -> PaymentRequest {
        PaymentRequest {
            date: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
            student_id,
            course_id,
            purchased_hours: hours,
            amount_paid: hours * 30.0,
            payment_method: PaymentMethod::default(),
        }
    }

    #[test]
    fn record_copies_course_fields_and_credits_balance() {
        let (mut store, teacher, course, student) = store_with_course();
        let id = PaymentService::record(&mut store, request(student, course, 5.0)).unwrap();

        let payment = &store.payments[0];
        assert_eq!(payment.id, id);
        assert_eq!(payment.teacher_id, Some(teacher));
        assert_eq!(payment.hourly_rate, 30.0);
        assert_eq!(payment.discounted_tuition, 0.0);
        assert_eq!(store.student(student).unwrap().balance(course), 5.0);
    }

    #[test]
    fn course_edits_do_not_rewrite_history() {
        let (mut store, teacher, course, student) = store_with_course();
        PaymentService::record(&mut store, request(student, course, 2.0)).unwrap();
        store.course_mut(course).unwrap().hourly_rate = 99.0;
        store.remove_teacher(teacher);
        assert_eq!(store.payments[0].hourly_rate, 30.0);
        assert_eq!(store.payments[0].teacher_id, Some(teacher));
    }

    #[test]
    fn unknown_student_leaves_store_untouched() {
        let (mut store, _, course, _) = store_with_course();
        let before = store.clone();
        let err = PaymentService::record(&mut store, request(42, course, 1.0))
            .expect_err("student must exist");
        assert!(matches!(err, ServiceError::NotFound { kind: "Student", .. }));
        assert_eq!(store, before);
    }

    #[test]
    fn zero_hours_are_rejected() {
        let (mut store, _, course, student) = store_with_course();
        let err = PaymentService::record(&mut store, request(student, course, 0.0))
            .expect_err("hours must be positive");
        assert!(matches!(err, ServiceError::Invalid(_)));
        assert!(store.payments.is_empty());
    }

    #[test]
    fn remove_keeps_balance() {
        let (mut store, _, course, student) = store_with_course();
        let id = PaymentService::record(&mut store, request(student, course, 3.0)).unwrap();
        PaymentService::remove(&mut store, id).unwrap();
        assert!(store.payments.is_empty());
        assert_eq!(store.student(student).unwrap().balance(course), 3.0);
    }
}
