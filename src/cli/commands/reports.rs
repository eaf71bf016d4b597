use std::{env, path::PathBuf};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{plain, section as output_section};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::ReportService;
use crate::domain::DateRange;
use crate::reports::{csv_export, format_hours, format_money, FinancialTotals, MonthlyTrend};

use super::CommandDefinition;

const GROUP: &str = "Reports";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "dashboard",
            GROUP,
            "All-time totals and the recent monthly trend",
            "dashboard",
            cmd_dashboard,
        ),
        CommandDefinition::new(
            "report",
            GROUP,
            "Financial report for a date range",
            "report [start] [end]",
            cmd_report,
        ),
        CommandDefinition::new(
            "attendance",
            GROUP,
            "Hours taught and salary per teacher",
            "attendance [start] [end]",
            cmd_attendance,
        ),
        CommandDefinition::new(
            "trend",
            GROUP,
            "Monthly income and costs",
            "trend [months]",
            cmd_trend,
        ),
        CommandDefinition::new(
            "report-csv",
            GROUP,
            "Write the financial report as CSV",
            "report-csv [start] [end] [path]",
            cmd_report_csv,
        ),
    ]
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let dashboard =
        ReportService::dashboard(context.store(), context.config.trend_months, context.today());
    let symbol = &context.config.currency_symbol;
    output_section("Dashboard");
    let store = context.store();
    io::print_info(format!(
        "  Students: {}  Teachers: {}  Courses: {}",
        store.students.len(),
        store.teachers.len(),
        store.courses.len()
    ));
    print_totals(symbol, &dashboard.totals);
    print_trend(symbol, &dashboard.trend);
    Ok(())
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (start, end) = context.report_bounds(args);
    warn_if_invalid(&start, &end);
    let report = ReportService::financials_between(context.store(), &start, &end);
    let symbol = &context.config.currency_symbol;

    output_section(format!("Financial Report {} to {}", start, end));
    print_totals(symbol, &report.totals());

    let mut courses = Table::new(vec![
        TableColumn::left("Course"),
        TableColumn::right("Enrollment"),
        TableColumn::right("Revenue"),
        TableColumn::right("Salary"),
        TableColumn::right("Outstanding Hours"),
    ]);
    for detail in &report.course_details {
        courses.push(vec![
            detail.course.clone(),
            detail.enrollment.to_string(),
            format_money(symbol, detail.revenue),
            format_money(symbol, detail.salary),
            format_hours(detail.outstanding),
        ]);
    }
    if !courses.is_empty() {
        output_section("Courses");
        plain(courses.render());
    }

    let mut teachers = Table::new(vec![
        TableColumn::left("Teacher"),
        TableColumn::right("Signed Hours"),
        TableColumn::right("Taught Hours"),
        TableColumn::right("Remaining"),
    ]);
    for detail in &report.teacher_details {
        teachers.push(vec![
            detail.teacher.clone(),
            format_hours(detail.signed),
            format_hours(detail.taught),
            format_hours(detail.remaining),
        ]);
    }
    if !teachers.is_empty() {
        output_section("Teachers");
        plain(teachers.render());
    }
    Ok(())
}

fn cmd_attendance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (start, end) = context.report_bounds(args);
    warn_if_invalid(&start, &end);
    let rows = ReportService::attendance(context.store(), DateRange::parse(&start, &end));
    if rows.is_empty() {
        io::print_info(format!("No sessions between {} and {}.", start, end));
        return Ok(());
    }
    let symbol = &context.config.currency_symbol;
    let mut table = Table::new(vec![
        TableColumn::left("Teacher"),
        TableColumn::right("Hours"),
        TableColumn::right("Rate"),
        TableColumn::right("Salary"),
    ]);
    for row in &rows {
        table.push(vec![
            row.teacher.clone(),
            format_hours(row.total_hours),
            format_money(symbol, row.hourly_rate),
            format_money(symbol, row.salary),
        ]);
    }
    output_section(format!("Attendance {} to {}", start, end));
    plain(table.render());
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let months = match args.first() {
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|months| *months > 0)
            .ok_or_else(|| {
                CommandError::InvalidArguments("months must be a positive whole number".into())
            })?,
        None => context.config.trend_months,
    };
    let trend = ReportService::trend(context.store(), months, context.today());
    output_section(format!("Trend (last {} months)", months));
    print_trend(&context.config.currency_symbol, &trend);
    Ok(())
}

fn cmd_report_csv(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (start, end) = context.report_bounds(args);
    warn_if_invalid(&start, &end);
    let csv = ReportService::financial_csv(
        context.store(),
        &start,
        &end,
        &context.config.currency_symbol,
    )?;
    let path = match args.get(2) {
        Some(raw) => PathBuf::from(raw),
        None => env::current_dir()?.join(csv_export::default_file_name(start.trim(), end.trim())),
    };
    context.manager.storage().write_file(&path, &csv)?;
    io::print_success(format!("Report written to {}.", path.display()));
    Ok(())
}

fn warn_if_invalid(start: &str, end: &str) {
    if DateRange::parse(start, end).is_none() {
        io::print_warning(format!(
            "Invalid date range `{}` to `{}`; the report will be empty.",
            start, end
        ));
    }
}

fn print_totals(symbol: &str, totals: &FinancialTotals) {
    io::print_info(format!("  Revenue        : {}", format_money(symbol, totals.revenue)));
    io::print_info(format!("  Teacher salary : {}", format_money(symbol, totals.salary)));
    io::print_info(format!("  Other expenses : {}", format_money(symbol, totals.other)));
    io::print_info(format!("  Net income     : {}", format_money(symbol, totals.net)));
}

fn print_trend(symbol: &str, trend: &MonthlyTrend) {
    let mut table = Table::new(vec![
        TableColumn::left("Month"),
        TableColumn::right("Income"),
        TableColumn::right("Costs"),
        TableColumn::right("Net"),
    ]);
    for ((label, income), costs) in trend.labels.iter().zip(&trend.income).zip(&trend.costs) {
        table.push(vec![
            label.clone(),
            format_money(symbol, *income),
            format_money(symbol, *costs),
            format_money(symbol, income - costs),
        ]);
    }
    plain(table.render());
}
