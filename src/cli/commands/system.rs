use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::utils::build_info;

use super::CommandDefinition;

const GROUP: &str = "System";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "help",
            GROUP,
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("version", GROUP, "Show build metadata", "version", cmd_version),
        CommandDefinition::new(
            "config",
            GROUP,
            "Show or change settings",
            "config [key value]",
            cmd_config,
        ),
        CommandDefinition::new("exit", GROUP, "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first().map(|name| name.to_lowercase()) {
        match context.command(&name) {
            Some(command) => help::print_command(command),
            None => context.suggest_command(args[0]),
        }
        return Ok(());
    }
    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Tutor Core {}", meta.version));
    io::print_info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    io::print_info(format!("  Built at     : {}", meta.timestamp));
    io::print_info(format!("  Target       : {}", meta.target));
    io::print_info(format!("  Profile      : {}", meta.profile));
    io::print_info(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let config = &context.config;
            output_section("Configuration");
            io::print_info(format!("  currency_symbol       : {}", config.currency_symbol));
            io::print_info(format!("  report_window_days    : {}", config.report_window_days));
            io::print_info(format!("  trend_months          : {}", config.trend_months));
            io::print_info(format!("  backup_retention      : {}", config.backup_retention));
            io::print_info(format!(
                "  low_balance_threshold : {}",
                config.low_balance_threshold
            ));
            Ok(())
        }
        [key, value] => {
            context
                .config
                .set(key, value)
                .map_err(CommandError::InvalidArguments)?;
            context.persist_config()?;
            io::print_success("Configuration updated.");
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [key value]".into(),
        )),
    }
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
