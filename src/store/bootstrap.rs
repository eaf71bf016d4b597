//! Sample dataset used when no readable document exists yet.

use chrono::NaiveDate;

use crate::domain::{
    session::parse_clock, Course, Expense, Gender, Payment, PaymentMethod, Session, Student,
    Teacher,
};

use super::RecordStore;

/// Builds the bootstrap dataset with every dated record placed on `today`.
///
/// Two teachers, two courses, two students with opening balances, one
/// payment of five hours, one logged one-hour session, and one expense.
pub fn sample_store(today: NaiveDate) -> RecordStore {
    let mut store = RecordStore::new();

    let alice = store.add_teacher(Teacher::new("Alice Johnson", 30.0));
    let bob = store.add_teacher(Teacher::new("Bob Smith", 35.0));

    let math = store.add_course(Course::new("Math Level 1", 30.0, Some(alice)));
    let english = store.add_course(Course::new("English Level 1", 35.0, Some(bob)));

    let mut charlie = Student::new("Charlie Brown", Gender::M)
        .with_parent("Lucy Brown")
        .with_contact("charlie@example.com");
    charlie.birthdate = NaiveDate::from_ymd_opt(2010, 3, 15);
    charlie.refresh_age(today);
    charlie.balances.insert(math, 5.0);
    charlie.balances.insert(english, 3.0);
    let charlie = store.add_student(charlie);

    let mut daisy = Student::new("Daisy Miller", Gender::F)
        .with_parent("Ann Miller")
        .with_contact("daisy@example.com");
    daisy.birthdate = NaiveDate::from_ymd_opt(2009, 8, 22);
    daisy.refresh_age(today);
    daisy.balances.insert(english, 2.0);
    store.add_student(daisy);

    store.add_payment(Payment {
        id: 0,
        date: today,
        student_id: charlie,
        course_id: math,
        teacher_id: Some(alice),
        hourly_rate: 30.0,
        purchased_hours: 5.0,
        discounted_tuition: 0.0,
        amount_paid: 150.0,
        payment_method: PaymentMethod::Cash,
    });

    if let (Some(start_time), Some(end_time)) = (parse_clock("14:00"), parse_clock("15:00")) {
        store.add_session(Session {
            id: 0,
            date: today,
            student_id: charlie,
            course_id: math,
            teacher_id: Some(alice),
            start_time,
            end_time,
            hours: 1.0,
        });
    }

    store.add_expense(Expense::new(today, "Office Supplies", 25.50));

    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Collection;

    #[test]
    fn sample_store_populates_every_collection() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let store = sample_store(today);
        for collection in Collection::ALL {
            assert!(store.count(collection) > 0, "{} empty", collection.key());
        }
        let charlie = store.student(1).unwrap();
        assert_eq!(charlie.age, Some(14));
        assert_eq!(charlie.balance(1), 5.0);
    }
}
