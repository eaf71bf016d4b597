use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{plain, section as output_section};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::{PaymentRequest, PaymentService};
use crate::domain::PaymentMethod;
use crate::reports::{format_hours, format_money};

use super::{
    name_or_blank, parse_date_or, parse_id, parse_number, require_args, CommandDefinition,
};

const GROUP: &str = "Payments";
const ADD_USAGE: &str = "payment-add <student-id> <course-id> <hours> <amount> [method] [date]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("payments", GROUP, "List payments", "payments", cmd_list),
        CommandDefinition::new(
            "payment-add",
            GROUP,
            "Record a payment and credit purchased hours",
            ADD_USAGE,
            cmd_add,
        ),
        CommandDefinition::new(
            "payment-delete",
            GROUP,
            "Delete a payment (balances are not reverted)",
            "payment-delete <id>",
            cmd_delete,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let store = context.store();
    let teachers = store.teacher_index();
    let symbol = &context.config.currency_symbol;
    let mut table = Table::new(vec![
        TableColumn::right("Id"),
        TableColumn::left("Date"),
        TableColumn::left("Student"),
        TableColumn::left("Course"),
        TableColumn::left("Teacher"),
        TableColumn::right("Rate"),
        TableColumn::right("Hours"),
        TableColumn::right("Paid"),
        TableColumn::left("Method"),
    ]);
    for payment in PaymentService::list(store) {
        table.push(vec![
            payment.id.to_string(),
            payment.date.to_string(),
            name_or_blank(store.student(payment.student_id)),
            name_or_blank(store.course(payment.course_id)),
            teachers.name(payment.teacher_id).to_string(),
            format_money(symbol, payment.hourly_rate),
            format_hours(payment.purchased_hours),
            format_money(symbol, payment.amount_paid),
            payment.payment_method.to_string(),
        ]);
    }
    if table.is_empty() {
        io::print_info("No payments yet.");
        return Ok(());
    }
    output_section("Payments");
    plain(table.render());
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 4, ADD_USAGE)?;
    let payment_method = match args.get(4) {
        Some(raw) => raw.parse::<PaymentMethod>().map_err(CommandError::InvalidArguments)?,
        None => PaymentMethod::default(),
    };
    let request = PaymentRequest {
        student_id: parse_id(args[0], "Student id")?,
        course_id: parse_id(args[1], "Course id")?,
        purchased_hours: parse_number(args[2], "Purchased hours")?,
        amount_paid: parse_number(args[3], "Amount paid")?,
        payment_method,
        date: parse_date_or(args.get(5), context.today())?,
    };
    let (student_id, course_id) = (request.student_id, request.course_id);
    let id = context.mutate(|store| PaymentService::record(store, request))?;
    let balance = context
        .store()
        .student(student_id)
        .map(|student| student.balance(course_id))
        .unwrap_or_default();
    io::print_success(format!(
        "Payment {} recorded; balance is now {}h.",
        id,
        format_hours(balance)
    ));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "payment-delete <id>")?;
    let id = parse_id(args[0], "Payment id")?;
    if !context.confirm(&format!("Delete payment {}?", id))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    context.mutate(|store| PaymentService::remove(store, id))?;
    io::print_success(format!("Payment {} deleted.", id));
    Ok(())
}
