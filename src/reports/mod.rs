//! Pure aggregations over a [`RecordStore`](crate::store::RecordStore).
//!
//! Every function here is a read-only view of the store plus a date range;
//! none of them mutate records or fail on dangling references.

pub mod attendance;
pub mod csv_export;
pub mod financials;
pub mod trend;

pub use attendance::{aggregate_teacher_hours, TeacherHours};
pub use csv_export::{render_financial_csv, write_financial_csv};
pub use financials::{
    aggregate_financials, dashboard_totals, CourseDetail, FinancialReport, FinancialTotals,
    TeacherDetail,
};
pub use trend::{monthly_trend, MonthlyTrend, YearMonth};

/// Formats a currency amount with two decimals, e.g. `$150.00`.
pub fn format_money(symbol: &str, value: f64) -> String {
    format!("{}{:.2}", symbol, value)
}

/// Formats an hour count with one decimal, e.g. `4.0`.
pub fn format_hours(value: f64) -> String {
    format!("{:.1}", value)
}
