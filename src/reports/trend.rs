use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::store::RecordStore;

/// Income and cost per calendar month, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthlyTrend {
    pub labels: Vec<String>,
    pub income: Vec<f64>,
    pub costs: Vec<f64>,
}

/// Calendar year-month bucket key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

/// The trailing `month_count` months ending with the month containing `today`.
pub fn trailing_months(today: NaiveDate, month_count: u32) -> Vec<YearMonth> {
    let Some(anchor) = today.with_day(1) else {
        return Vec::new();
    };
    (0..month_count)
        .rev()
        .filter_map(|back| anchor.checked_sub_months(Months::new(back)))
        .map(YearMonth::of)
        .collect()
}

/// Buckets revenue and cost (session salary plus expenses) by calendar month.
pub fn monthly_trend(store: &RecordStore, month_count: u32, today: NaiveDate) -> MonthlyTrend {
    let teachers = store.teacher_index();
    let mut trend = MonthlyTrend::default();

    for bucket in trailing_months(today, month_count) {
        let income: f64 = store
            .payments
            .iter()
            .filter(|payment| YearMonth::of(payment.date) == bucket)
            .map(|payment| payment.amount_paid)
            .sum();
        let salary: f64 = store
            .sessions
            .iter()
            .filter(|session| YearMonth::of(session.date) == bucket)
            .map(|session| session.hours * teachers.rate(session.teacher_id))
            .sum();
        let expenses: f64 = store
            .expenses
            .iter()
            .filter(|expense| YearMonth::of(expense.date) == bucket)
            .map(|expense| expense.amount)
            .sum();

        trend.labels.push(bucket.label());
        trend.income.push(income);
        trend.costs.push(salary + expenses);
    }

    trend
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Expense;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn trailing_months_cross_year_boundary() {
        let labels: Vec<String> = trailing_months(date(2024, 2, 29), 4)
            .iter()
            .map(YearMonth::label)
            .collect();
        assert_eq!(labels, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn zero_months_is_empty() {
        let store = RecordStore::new();
        assert_eq!(monthly_trend(&store, 0, date(2024, 1, 1)), MonthlyTrend::default());
    }

    #[test]
    fn expenses_land_in_their_month_only() {
        let mut store = RecordStore::new();
        store.add_expense(Expense::new(date(2024, 3, 31), "Rent", 100.0));
        store.add_expense(Expense::new(date(2024, 4, 1), "Ink", 7.5));
        store.add_expense(Expense::new(date(2023, 4, 1), "Old", 999.0));
        let trend = monthly_trend(&store, 2, date(2024, 4, 15));
        assert_eq!(trend.labels, vec!["2024-03", "2024-04"]);
        assert_eq!(trend.costs, vec![100.0, 7.5]);
        assert_eq!(trend.income, vec![0.0, 0.0]);
    }
}
