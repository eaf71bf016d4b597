use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{DateRange, Dated, Payment, RecordId, Session};
use crate::store::{balances, RecordStore, TeacherIndex};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FinancialReport {
    pub revenue: f64,
    pub salary: f64,
    pub other: f64,
    pub net: f64,
    pub course_details: Vec<CourseDetail>,
    pub teacher_details: Vec<TeacherDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseDetail {
    pub course_id: RecordId,
    pub course: String,
    /// Distinct students with a payment for the course in range.
    pub enrollment: usize,
    pub revenue: f64,
    pub salary: f64,
    /// Remaining hours across all students, independent of the range.
    pub outstanding: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeacherDetail {
    pub teacher_id: RecordId,
    pub teacher: String,
    pub signed: f64,
    pub taught: f64,
    /// `signed - taught`; negative when more was taught than sold.
    pub remaining: f64,
}

/// Headline totals without the per-course and per-teacher breakdown.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct FinancialTotals {
    pub revenue: f64,
    pub salary: f64,
    pub other: f64,
    pub net: f64,
}

impl FinancialTotals {
    fn from_parts(revenue: f64, salary: f64, other: f64) -> Self {
        Self {
            revenue,
            salary,
            other,
            net: revenue - salary - other,
        }
    }
}

impl FinancialReport {
    pub fn totals(&self) -> FinancialTotals {
        FinancialTotals {
            revenue: self.revenue,
            salary: self.salary,
            other: self.other,
            net: self.net,
        }
    }
}

/// Computes revenue, salary cost, other expenses, and net profit over `range`.
///
/// `None` stands for a missing or unparsable range and produces an all-zero
/// report with empty detail lists.
pub fn aggregate_financials(store: &RecordStore, range: Option<DateRange>) -> FinancialReport {
    let Some(range) = range else {
        return FinancialReport::default();
    };
    let teachers = store.teacher_index();

    let payments = in_range(&store.payments, &range);
    let sessions = in_range(&store.sessions, &range);

    let revenue = payment_revenue(&payments);
    let salary = session_salary(&sessions, &teachers);
    let other = store
        .expenses
        .iter()
        .filter(|expense| range.contains(expense.date))
        .map(|expense| expense.amount)
        .sum();
    let totals = FinancialTotals::from_parts(revenue, salary, other);

    let course_details = store
        .courses
        .iter()
        .map(|course| {
            let course_payments: Vec<&Payment> = payments
                .iter()
                .copied()
                .filter(|payment| payment.course_id == course.id)
                .collect();
            let course_sessions: Vec<&Session> = sessions
                .iter()
                .copied()
                .filter(|session| session.course_id == course.id)
                .collect();
            let enrollment = course_payments
                .iter()
                .map(|payment| payment.student_id)
                .collect::<HashSet<_>>()
                .len();
            CourseDetail {
                course_id: course.id,
                course: course.name.clone(),
                enrollment,
                revenue: payment_revenue(&course_payments),
                salary: session_salary(&course_sessions, &teachers),
                outstanding: balances::outstanding_hours(&store.students, course.id),
            }
        })
        .collect();

    let teacher_details = store
        .teachers
        .iter()
        .map(|teacher| {
            let signed: f64 = payments
                .iter()
                .filter(|payment| payment.teacher_id == Some(teacher.id))
                .map(|payment| payment.purchased_hours)
                .sum();
            let taught: f64 = sessions
                .iter()
                .filter(|session| session.teacher_id == Some(teacher.id))
                .map(|session| session.hours)
                .sum();
            TeacherDetail {
                teacher_id: teacher.id,
                teacher: teacher.name.clone(),
                signed,
                taught,
                remaining: signed - taught,
            }
        })
        .collect();

    FinancialReport {
        revenue: totals.revenue,
        salary: totals.salary,
        other: totals.other,
        net: totals.net,
        course_details,
        teacher_details,
    }
}

/// Totals over every record regardless of date, as shown on the dashboard.
pub fn dashboard_totals(store: &RecordStore) -> FinancialTotals {
    let teachers = store.teacher_index();
    let payments: Vec<&Payment> = store.payments.iter().collect();
    let sessions: Vec<&Session> = store.sessions.iter().collect();
    let other = store.expenses.iter().map(|expense| expense.amount).sum();
    FinancialTotals::from_parts(
        payment_revenue(&payments),
        session_salary(&sessions, &teachers),
        other,
    )
}

pub(crate) fn in_range<'a, T: Dated>(records: &'a [T], range: &DateRange) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| range.contains(record.date()))
        .collect()
}

pub(crate) fn payment_revenue(payments: &[&Payment]) -> f64 {
    payments.iter().map(|payment| payment.amount_paid).sum()
}

pub(crate) fn session_salary(sessions: &[&Session], teachers: &TeacherIndex<'_>) -> f64 {
    sessions
        .iter()
        .map(|session| session.hours * teachers.rate(session.teacher_id))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{session::parse_clock, Course, Expense, PaymentMethod, Teacher};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment(
        day: NaiveDate,
        student: RecordId,
        course: &Course,
        hours: f64,
        amount: f64,
    ) -> Payment {
        Payment {
            id: 0,
            date: day,
            student_id: student,
            course_id: course.id,
            teacher_id: course.teacher_id,
            hourly_rate: course.hourly_rate,
            purchased_hours: hours,
            discounted_tuition: 0.0,
            amount_paid: amount,
            payment_method: PaymentMethod::Card,
        }
    }

    fn session(day: NaiveDate, student: RecordId, course: &Course, hours: f64) -> Session {
        Session {
            id: 0,
            date: day,
            student_id: student,
            course_id: course.id,
            teacher_id: course.teacher_id,
            start_time: parse_clock("10:00").unwrap(),
            end_time: parse_clock("11:00").unwrap(),
            hours,
        }
    }

    fn populated_store() -> RecordStore {
        let mut store = RecordStore::new();
        let alice = store.add_teacher(Teacher::new("Alice", 20.0));
        store.add_teacher(Teacher::new("Bob", 25.0));
        let math_id = store.add_course(Course::new("Math", 30.0, Some(alice)));
        let math = store.course(math_id).unwrap().clone();

        store.add_payment(payment(date(2024, 1, 10), 1, &math, 5.0, 150.0));
        store.add_payment(payment(date(2024, 1, 20), 1, &math, 2.0, 60.0));
        store.add_payment(payment(date(2024, 1, 21), 2, &math, 3.0, 90.0));
        store.add_payment(payment(date(2024, 3, 1), 3, &math, 4.0, 120.0));
        store.add_session(session(date(2024, 1, 15), 1, &math, 1.5));
        store.add_session(session(date(2024, 2, 15), 1, &math, 9.0));
        store.add_expense(Expense::new(date(2024, 1, 31), "Rent", 40.0));
        store.add_expense(Expense::new(date(2024, 2, 1), "Paper", 5.0));
        store
    }

    #[test]
    fn filters_every_collection_by_inclusive_range() {
        let store = populated_store();
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 31));
        let report = aggregate_financials(&store, Some(range));

        assert_eq!(report.revenue, 300.0);
        assert_eq!(report.salary, 30.0);
        assert_eq!(report.other, 40.0);
        assert_eq!(report.net, 230.0);

        let math = &report.course_details[0];
        assert_eq!(math.enrollment, 2);
        assert_eq!(math.revenue, 300.0);
        assert_eq!(math.salary, 30.0);
    }

    #[test]
    fn teacher_remaining_is_not_clamped() {
        let store = populated_store();
        let range = DateRange::new(date(2024, 2, 1), date(2024, 2, 29));
        let report = aggregate_financials(&store, Some(range));
        let alice = &report.teacher_details[0];
        assert_eq!(alice.signed, 0.0);
        assert_eq!(alice.taught, 9.0);
        assert_eq!(alice.remaining, -9.0);
        let bob = &report.teacher_details[1];
        assert_eq!((bob.signed, bob.taught), (0.0, 0.0));
    }

    #[test]
    fn missing_range_yields_empty_report() {
        let store = populated_store();
        let report = aggregate_financials(&store, DateRange::parse("", "2024-01-01"));
        assert_eq!(report, FinancialReport::default());
        assert!(report.course_details.is_empty());
        assert!(report.teacher_details.is_empty());
    }

    #[test]
    fn net_identity_holds_for_assorted_ranges() {
        let store = populated_store();
        let ranges = [
            DateRange::everything(),
            DateRange::new(date(2024, 1, 1), date(2024, 1, 1)),
            DateRange::new(date(2024, 2, 1), date(2024, 3, 31)),
            DateRange::new(date(2024, 5, 1), date(2024, 1, 1)),
        ];
        for range in ranges {
            let report = aggregate_financials(&store, Some(range));
            assert_eq!(report.net, report.revenue - report.salary - report.other);
        }
    }

    #[test]
    fn salary_defaults_to_zero_for_unknown_teacher() {
        let mut store = populated_store();
        store.remove_teacher(1);
        let report = aggregate_financials(&store, Some(DateRange::everything()));
        assert_eq!(report.salary, 0.0);
        assert_eq!(report.teacher_details.len(), 1);
    }

    #[test]
    fn dashboard_matches_unbounded_report() {
        let store = populated_store();
        let report = aggregate_financials(&store, Some(DateRange::everything()));
        assert_eq!(dashboard_totals(&store), report.totals());
    }
}
