use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{plain, section as output_section};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::CourseService;
use crate::domain::Course;
use crate::reports::format_money;

use super::{
    parse_assignments, parse_id, parse_number, require_args, unknown_field, CommandDefinition,
};

const GROUP: &str = "Courses";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("courses", GROUP, "List courses", "courses", cmd_list),
        CommandDefinition::new(
            "course-add",
            GROUP,
            "Create a course",
            "course-add <name> <rate> [teacher-id]",
            cmd_add,
        ),
        CommandDefinition::new(
            "course-edit",
            GROUP,
            "Update course fields (teacher=none unassigns)",
            "course-edit <id> <field=value>...",
            cmd_edit,
        ),
        CommandDefinition::new(
            "course-delete",
            GROUP,
            "Delete a course",
            "course-delete <id>",
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
        TableColumn::left("Name"),
        TableColumn::right("Hourly Rate"),
        TableColumn::left("Teacher"),
    ]);
    for course in CourseService::list(store) {
        table.push(vec![
            course.id.to_string(),
            course.name.clone(),
            format_money(symbol, course.hourly_rate),
            teachers.name(course.teacher_id).to_string(),
        ]);
    }
    if table.is_empty() {
        io::print_info("No courses yet.");
        return Ok(());
    }
    output_section("Courses");
    plain(table.render());
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "course-add <name> <rate> [teacher-id]")?;
    let rate = parse_number(args[1], "Hourly rate")?;
    let teacher_id = args
        .get(2)
        .map(|raw| parse_id(raw, "Teacher id"))
        .transpose()?;
    let course = Course::new(args[0], rate, teacher_id);
    let id = context.mutate(|store| CourseService::add(store, course))?;
    io::print_success(format!("Course {} added.", id));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "course-edit <id> <field=value>...")?;
    let id = parse_id(args[0], "Course id")?;
    let mut changes = context
        .store()
        .course(id)
        .cloned()
        .ok_or_else(|| CommandError::Message(format!("Course {} not found", id)))?;
    for (field, value) in parse_assignments(&args[1..])? {
        match field {
            "name" => changes.name = value.to_string(),
            "rate" | "hourly_rate" => changes.hourly_rate = parse_number(value, "Hourly rate")?,
            "teacher" | "teacher_id" => {
                changes.teacher_id = if value.is_empty() || value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(parse_id(value, "Teacher id")?)
                }
            }
            other => return Err(unknown_field(other, "name, rate, teacher")),
        }
    }
    context.mutate(|store| CourseService::edit(store, id, changes))?;
    io::print_success(format!("Course {} updated.", id));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "course-delete <id>")?;
    let id = parse_id(args[0], "Course id")?;
    if !context.confirm(&format!("Delete course {}?", id))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    let removed = context.mutate(|store| CourseService::remove(store, id))?;
    io::print_success(format!("Course `{}` deleted.", removed.name));
    Ok(())
}
