use std::io::Write;

use crate::errors::StoreError;

use super::{format_hours, format_money, FinancialReport};

/// File name offered for a report covering `start` to `end`.
pub fn default_file_name(start: &str, end: &str) -> String {
    format!("tutoring_report_{}_to_{}.csv", start, end)
}

/// Writes the financial report as sectioned CSV.
///
/// Layout: title and period, the summary key/value rows, a blank line, the
/// course table, a blank line, and the teacher table.
pub fn write_financial_csv<W: Write>(
    report: &FinancialReport,
    start: &str,
    end: &str,
    currency_symbol: &str,
    mut out: W,
) -> Result<(), StoreError> {
    let money = |value: f64| format_money(currency_symbol, value);

    write_rows(
        &mut out,
        vec![
            vec!["Financial Report Summary".to_string()],
            vec![format!("Period: {} to {}", start, end)],
        ],
    )?;
    out.write_all(b"\n")?;
    write_rows(
        &mut out,
        vec![
            vec!["Revenue".to_string(), money(report.revenue)],
            vec!["Salary Expense".to_string(), money(report.salary)],
            vec!["Other Expenses".to_string(), money(report.other)],
            vec!["Net Profit".to_string(), money(report.net)],
        ],
    )?;
    out.write_all(b"\n")?;

    let mut courses = vec![
        vec!["Course Analysis".to_string()],
        [
            "Course",
            "Enrollments",
            "Revenue",
            "Salary",
            "Outstanding Hours",
        ]
        .map(String::from)
        .to_vec(),
    ];
    courses.extend(report.course_details.iter().map(|course| {
        vec![
            course.course.clone(),
            course.enrollment.to_string(),
            money(course.revenue),
            money(course.salary),
            format_hours(course.outstanding),
        ]
    }));
    write_rows(&mut out, courses)?;
    out.write_all(b"\n")?;

    let mut teachers = vec![
        vec!["Teacher Analysis".to_string()],
        ["Teacher", "Signed Hours", "Taught Hours", "Remaining"]
            .map(String::from)
            .to_vec(),
    ];
    teachers.extend(report.teacher_details.iter().map(|teacher| {
        vec![
            teacher.teacher.clone(),
            format_hours(teacher.signed),
            format_hours(teacher.taught),
            format_hours(teacher.remaining),
        ]
    }));
    write_rows(&mut out, teachers)?;
    out.flush()?;
    Ok(())
}

/// Renders the report into an in-memory string.
pub fn render_financial_csv(
    report: &FinancialReport,
    start: &str,
    end: &str,
    currency_symbol: &str,
) -> Result<String, StoreError> {
    let mut buffer = Vec::new();
    write_financial_csv(report, start, end, currency_symbol, &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| StoreError::Persistence(err.to_string()))
}

fn write_rows<W: Write>(out: &mut W, rows: Vec<Vec<String>>) -> Result<(), StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
