use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{plain, section as output_section};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::TeacherService;
use crate::domain::Teacher;
use crate::reports::format_money;

use super::{
    parse_assignments, parse_id, parse_number, require_args, unknown_field, CommandDefinition,
};

const GROUP: &str = "Teachers";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("teachers", GROUP, "List teachers", "teachers", cmd_list),
        CommandDefinition::new(
            "teacher-add",
            GROUP,
            "Register a teacher",
            "teacher-add <name> <rate>",
            cmd_add,
        ),
        CommandDefinition::new(
            "teacher-edit",
            GROUP,
            "Update teacher fields",
            "teacher-edit <id> <field=value>...",
            cmd_edit,
        ),
        CommandDefinition::new(
            "teacher-delete",
            GROUP,
            "Delete a teacher and unassign their courses",
            "teacher-delete <id>",
            cmd_delete,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let symbol = &context.config.currency_symbol;
    let mut table = Table::new(vec![
        TableColumn::right("Id"),
        TableColumn::left("Name"),
        TableColumn::right("Hourly Rate"),
    ]);
    for teacher in TeacherService::list(context.store()) {
        table.push(vec![
            teacher.id.to_string(),
            teacher.name.clone(),
            format_money(symbol, teacher.hourly_rate),
        ]);
    }
    if table.is_empty() {
        io::print_info("No teachers yet.");
        return Ok(());
    }
    output_section("Teachers");
    plain(table.render());
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "teacher-add <name> <rate>")?;
    let rate = parse_number(args[1], "Hourly rate")?;
    let teacher = Teacher::new(args[0], rate);
    let id = context.mutate(|store| TeacherService::add(store, teacher))?;
    io::print_success(format!("Teacher {} added.", id));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "teacher-edit <id> <field=value>...")?;
    let id = parse_id(args[0], "Teacher id")?;
    let mut changes = context
        .store()
        .teacher(id)
        .cloned()
        .ok_or_else(|| CommandError::Message(format!("Teacher {} not found", id)))?;
    for (field, value) in parse_assignments(&args[1..])? {
        match field {
            "name" => changes.name = value.to_string(),
            "rate" | "hourly_rate" => changes.hourly_rate = parse_number(value, "Hourly rate")?,
            other => return Err(unknown_field(other, "name, rate")),
        }
    }
    context.mutate(|store| TeacherService::edit(store, id, changes))?;
    io::print_success(format!("Teacher {} updated.", id));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "teacher-delete <id>")?;
    let id = parse_id(args[0], "Teacher id")?;
    if !context.confirm(&format!("Delete teacher {}?", id))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    let removed = context.mutate(|store| TeacherService::remove(store, id))?;
    io::print_success(format!("Teacher `{}` deleted.", removed.name));
    Ok(())
}
