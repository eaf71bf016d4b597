use std::{env, path::Path};

use chrono::Utc;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::store::Collection;

use super::{require_args, CommandDefinition};

const GROUP: &str = "Data";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "status",
            GROUP,
            "Show store location and record counts",
            "status",
            cmd_status,
        ),
        CommandDefinition::new("save", GROUP, "Save the store to disk", "save", cmd_save),
        CommandDefinition::new(
            "export",
            GROUP,
            "Export every collection to a JSON file",
            "export [path]",
            cmd_export,
        ),
        CommandDefinition::new(
            "import",
            GROUP,
            "Replace collections from an exported JSON file",
            "import <path>",
            cmd_import,
        ),
        CommandDefinition::new("backups", GROUP, "List automatic backups", "backups", cmd_backups),
        CommandDefinition::new(
            "restore",
            GROUP,
            "Restore the store from a backup",
            "restore <backup>",
            cmd_restore,
        ),
    ]
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let store = context.store();
    output_section("Status");
    io::print_info(format!(
        "  Document   : {}",
        context.manager.storage().document_path().display()
    ));
    io::print_info(format!(
        "  Last saved : {}",
        store
            .last_saved
            .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "never".into())
    ));
    for collection in Collection::ALL {
        io::print_info(format!(
            "  {:<10} : {}",
            collection.key(),
            store.count(collection)
        ));
    }
    if context.manager.is_dirty() {
        io::print_warning("Unsaved changes pending.");
    }
    Ok(())
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let path = context.manager.save()?;
    io::print_success(format!("Saved to {}.", path.display()));
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = env::current_dir()?;
    let path = context
        .manager
        .export_snapshot(args.first().map(Path::new), &dir, Utc::now())?;
    io::print_success(format!("Exported to {}.", path.display()));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "import <path>")?;
    if !context.confirm("Importing replaces the collections found in the file. Continue?")? {
        io::print_info("Import cancelled.");
        return Ok(());
    }
    let replaced = context.manager.import_snapshot(Path::new(args[0]))?;
    if replaced.is_empty() {
        io::print_warning("The file contained no collections; nothing changed.");
        return Ok(());
    }
    let names: Vec<&str> = replaced.iter().map(Collection::key).collect();
    io::print_success(format!("Imported {}.", names.join(", ")));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.manager.list_backups()?;
    if backups.is_empty() {
        io::print_info("No backups yet.");
        return Ok(());
    }
    output_section("Backups");
    for name in backups {
        io::print_info(format!("  {}", name));
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "restore <backup>")?;
    if !context.confirm(&format!("Restore `{}` over the current data?", args[0]))? {
        io::print_info("Restore cancelled.");
        return Ok(());
    }
    let today = context.today();
    let report = context.manager.restore(args[0], today)?;
    for warning in &report.warnings {
        io::print_warning(warning);
    }
    io::print_success(format!("Restored `{}`.", args[0]));
    Ok(())
}
