use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::DateRange;
use crate::reports::{
    self, attendance::TeacherHours, FinancialReport, FinancialTotals, MonthlyTrend,
};
use crate::store::RecordStore;

use super::ServiceResult;

/// Headline totals across all records plus the recent income/cost trend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dashboard {
    pub totals: FinancialTotals,
    pub trend: MonthlyTrend,
}

pub struct ReportService;

impl ReportService {
    pub fn financials(store: &RecordStore, range: Option<DateRange>) -> FinancialReport {
        reports::aggregate_financials(store, range)
    }

    /// Same as [`ReportService::financials`] but from raw `YYYY-MM-DD` inputs.
    pub fn financials_between(store: &RecordStore, start: &str, end: &str) -> FinancialReport {
        reports::aggregate_financials(store, DateRange::parse(start, end))
    }

    pub fn attendance(store: &RecordStore, range: Option<DateRange>) -> Vec<TeacherHours> {
        reports::aggregate_teacher_hours(store, range)
    }

    pub fn trend(store: &RecordStore, months: u32, today: NaiveDate) -> MonthlyTrend {
        reports::monthly_trend(store, months, today)
    }

    pub fn dashboard(store: &RecordStore, months: u32, today: NaiveDate) -> Dashboard {
        Dashboard {
            totals: reports::dashboard_totals(store),
            trend: reports::monthly_trend(store, months, today),
        }
    }

    /// Renders the CSV financial report for the raw range inputs.
    ///
    /// An unparsable range renders the layout with zero totals and no rows.
    pub fn financial_csv(
        store: &RecordStore,
        start: &str,
        end: &str,
        currency_symbol: &str,
    ) -> ServiceResult<String> {
        let report = Self::financials_between(store, start, end);
        Ok(reports::render_financial_csv(
            &report,
            start.trim(),
            end.trim(),
            currency_symbol,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::sample_store;

    #[test]
    fn dashboard_reflects_sample_data() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let store = sample_store(today);
        let dashboard = ReportService::dashboard(&store, 6, today);
        assert_eq!(dashboard.totals.revenue, 150.0);
        assert_eq!(dashboard.totals.salary, 30.0);
        assert_eq!(dashboard.totals.other, 25.5);
        assert_eq!(dashboard.totals.net, 94.5);
        assert_eq!(dashboard.trend.labels.last().map(String::as_str), Some("2024-06"));
        assert_eq!(dashboard.trend.income.last(), Some(&150.0));
        assert_eq!(dashboard.trend.costs.last(), Some(&55.5));
    }

    #[test]
    fn csv_for_invalid_range_has_no_rows() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let store = sample_store(today);
        let csv = ReportService::financial_csv(&store, "", "", "$").unwrap();
        assert!(csv.contains("Revenue,$0.00"));
        assert!(csv.ends_with("Teacher,Signed Hours,Taught Hours,Remaining\n"));
    }
}
