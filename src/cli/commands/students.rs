use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{plain, section as output_section};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::StudentService;
use crate::domain::{parse_date, Gender, Student};
use crate::reports::format_hours;

use super::{parse_assignments, parse_id, require_args, unknown_field, CommandDefinition};

const GROUP: &str = "Students";
const EDITABLE: &str = "name, gender, birthdate, parent, contact";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "students",
            GROUP,
            "List students and their balances",
            "students",
            cmd_list,
        ),
        CommandDefinition::new(
            "student-add",
            GROUP,
            "Register a student",
            "student-add <name> <F|M> [birthdate] [parent] [contact]",
            cmd_add,
        ),
        CommandDefinition::new(
            "student-edit",
            GROUP,
            "Update student fields",
            "student-edit <id> <field=value>...",
            cmd_edit,
        ),
        CommandDefinition::new(
            "student-delete",
            GROUP,
            "Delete a student",
            "student-delete <id>",
            cmd_delete,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let store = context.store();
    let threshold = context.config.low_balance_threshold;
    let mut table = Table::new(vec![
        TableColumn::right("Id"),
        TableColumn::left("Name").max_width(24),
        TableColumn::left("Gender"),
        TableColumn::right("Age"),
        TableColumn::left("Parent").max_width(20),
        TableColumn::left("Contact").max_width(20),
        TableColumn::left("Balances"),
    ]);
    let mut low = Vec::new();
    for student in StudentService::list(store) {
        let balances: Vec<String> = student
            .balances
            .iter()
            .map(|(course_id, hours)| {
                let course = store
                    .course(*course_id)
                    .map(|course| course.name.clone())
                    .unwrap_or_else(|| format!("course {}", course_id));
                format!("{}: {}h", course, format_hours(*hours))
            })
            .collect();
        for (course_id, hours) in StudentService::low_balances(student, threshold) {
            let course = store
                .course(course_id)
                .map(|course| course.name.as_str())
                .unwrap_or("unknown course");
            low.push(format!(
                "{} has {}h left for {}",
                student.name,
                format_hours(hours),
                course
            ));
        }
        table.push(vec![
            student.id.to_string(),
            student.name.clone(),
            student.gender.to_string(),
            student.age.map(|age| age.to_string()).unwrap_or_default(),
            student.parent.clone(),
            student.contact.clone(),
            balances.join(", "),
        ]);
    }
    if table.is_empty() {
        io::print_info("No students yet.");
        return Ok(());
    }
    output_section("Students");
    plain(table.render());
    for warning in low {
        io::print_warning(format!("Low balance: {}", warning));
    }
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "student-add <name> <F|M> [birthdate] [parent] [contact]";
    require_args(args, 2, usage)?;
    let gender: Gender = args[1].parse().map_err(CommandError::InvalidArguments)?;
    let mut student = Student::new(args[0], gender);
    if let Some(raw) = args.get(2).filter(|raw| !raw.trim().is_empty()) {
        student = student.with_birthdate(parse_birthdate(raw)?);
    }
    if let Some(parent) = args.get(3) {
        student = student.with_parent(*parent);
    }
    if let Some(contact) = args.get(4) {
        student = student.with_contact(*contact);
    }
    let today = context.today();
    let id = context.mutate(|store| StudentService::add(store, student, today))?;
    io::print_success(format!("Student {} added.", id));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "student-edit <id> <field=value>...")?;
    let id = parse_id(args[0], "Student id")?;
    let mut changes = context
        .store()
        .student(id)
        .cloned()
        .ok_or_else(|| CommandError::Message(format!("Student {} not found", id)))?;
    for (field, value) in parse_assignments(&args[1..])? {
        match field {
            "name" => changes.name = value.to_string(),
            "gender" => changes.gender = value.parse().map_err(CommandError::InvalidArguments)?,
            "birthdate" => {
                changes.birthdate = if value.is_empty() {
                    None
                } else {
                    Some(parse_birthdate(value)?)
                }
            }
            "parent" => changes.parent = value.to_string(),
            "contact" => changes.contact = value.to_string(),
            other => return Err(unknown_field(other, EDITABLE)),
        }
    }
    let today = context.today();
    context.mutate(|store| StudentService::edit(store, id, changes, today))?;
    io::print_success(format!("Student {} updated.", id));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "student-delete <id>")?;
    let id = parse_id(args[0], "Student id")?;
    if !context.confirm(&format!("Delete student {}?", id))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    let removed = context.mutate(|store| StudentService::remove(store, id))?;
    io::print_success(format!("Student `{}` deleted.", removed.name));
    Ok(())
}

fn parse_birthdate(raw: &str) -> Result<chrono::NaiveDate, CommandError> {
    parse_date(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!("invalid birthdate `{}` (expected YYYY-MM-DD)", raw))
    })
}
