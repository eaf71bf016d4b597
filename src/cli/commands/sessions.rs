use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{plain, section as output_section};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::{SessionRequest, SessionService};
use crate::domain::session::{parse_clock, TIME_FORMAT};
use crate::reports::format_hours;

use super::{name_or_blank, parse_date_or, parse_id, require_args, CommandDefinition};

const GROUP: &str = "Sessions";
const ADD_USAGE: &str = "session-add <student-id> <course-id> <HH:MM> <HH:MM> [date]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("sessions", GROUP, "List sessions", "sessions", cmd_list),
        CommandDefinition::new(
            "session-add",
            GROUP,
            "Log a session and debit its hours",
            ADD_USAGE,
            cmd_add,
        ),
        CommandDefinition::new(
            "session-delete",
            GROUP,
            "Delete a session (hours are not restored)",
            "session-delete <id>",
            cmd_delete,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let store = context.store();
    let teachers = store.teacher_index();
    let mut table = Table::new(vec![
        TableColumn::right("Id"),
        TableColumn::left("Date"),
        TableColumn::left("Student"),
        TableColumn::left("Course"),
        TableColumn::left("Teacher"),
        TableColumn::left("Time"),
        TableColumn::right("Hours"),
    ]);
    for session in SessionService::list(store) {
        table.push(vec![
            session.id.to_string(),
            session.date.to_string(),
            name_or_blank(store.student(session.student_id)),
            name_or_blank(store.course(session.course_id)),
            teachers.name(session.teacher_id).to_string(),
            format!(
                "{}-{}",
                session.start_time.format(TIME_FORMAT),
                session.end_time.format(TIME_FORMAT)
            ),
            format_hours(session.hours),
        ]);
    }
    if table.is_empty() {
        io::print_info("No sessions yet.");
        return Ok(());
    }
    output_section("Sessions");
    plain(table.render());
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 4, ADD_USAGE)?;
    let request = SessionRequest {
        student_id: parse_id(args[0], "Student id")?,
        course_id: parse_id(args[1], "Course id")?,
        start_time: parse_time(args[2])?,
        end_time: parse_time(args[3])?,
        date: parse_date_or(args.get(4), context.today())?,
    };
    let (student_id, course_id) = (request.student_id, request.course_id);
    let id = context.mutate(|store| SessionService::log(store, request))?;
    let balance = context
        .store()
        .student(student_id)
        .map(|student| student.balance(course_id))
        .unwrap_or_default();
    io::print_success(format!(
        "Session {} logged; balance is now {}h.",
        id,
        format_hours(balance)
    ));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "session-delete <id>")?;
    let id = parse_id(args[0], "Session id")?;
    if !context.confirm(&format!("Delete session {}?", id))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    context.mutate(|store| SessionService::remove(store, id))?;
    io::print_success(format!("Session {} deleted.", id));
    Ok(())
}

fn parse_time(raw: &str) -> Result<chrono::NaiveTime, CommandError> {
    parse_clock(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!("invalid time `{}` (expected HH:MM)", raw))
    })
}
