//! Shell context, dispatch, and error types shared by every command.

use std::{io, path::PathBuf};

use chrono::{Local, NaiveDate};
use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    core::{
        services::{ServiceError, ServiceResult},
        StoreManager,
    },
    domain::DateRange,
    errors::StoreError,
    storage::JsonStorage,
    store::RecordStore,
};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::io as cli_io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) manager: StoreManager,
    pub(crate) config: Config,
    config_manager: ConfigManager,
    base_dir: PathBuf,
    theme: ColorfulTheme,
    pub(crate) running: bool,
    pub(crate) last_command: Option<String>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, None)
    }

    /// Opens the store under `base`, or the default application directory.
    pub fn with_base_dir(mode: CliMode, base: Option<PathBuf>) -> Result<Self, CliError> {
        let registry = CommandRegistry::new(commands::all_definitions());
        let base_dir = crate::core::utils::PathResolver::resolve_base(base);
        let config_manager = ConfigManager::with_base_dir(base_dir.clone())?;
        let config = config_manager.load()?;
        let storage = JsonStorage::new(Some(base_dir.clone()), Some(config.backup_retention))?;
        let mut manager = StoreManager::new(Box::new(storage));
        let report = manager.load(today())?;

        let context = ShellContext {
            mode,
            registry,
            manager,
            config,
            config_manager,
            base_dir,
            theme: ColorfulTheme::default(),
            running: true,
            last_command: None,
        };
        if report.bootstrapped {
            cli_io::print_info("Started with sample data.");
        }
        for warning in &report.warnings {
            cli_io::print_warning(warning);
        }
        Ok(context)
    }

    pub(crate) fn today(&self) -> NaiveDate {
        today()
    }

    pub(crate) fn store(&self) -> &RecordStore {
        self.manager.store()
    }

    pub(crate) fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Applies a service mutation and persists the store when it succeeds.
    pub(crate) fn mutate<T>(
        &mut self,
        change: impl FnOnce(&mut RecordStore) -> ServiceResult<T>,
    ) -> Result<T, CommandError> {
        let value = self.manager.apply(change)?;
        self.manager.save()?;
        Ok(value)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Asks before destructive actions; scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    /// Raw `[start] [end]` report arguments, defaulting to the configured window.
    pub(crate) fn report_bounds(&self, args: &[&str]) -> (String, String) {
        let window = DateRange::trailing_days(self.today(), self.config.report_window_days);
        let start = args
            .first()
            .map(|raw| raw.to_string())
            .unwrap_or_else(|| window.start.to_string());
        let end = args
            .get(1)
            .map(|raw| raw.to_string())
            .unwrap_or_else(|| window.end.to_string());
        (start, end)
    }

    pub(crate) fn prompt(&self) -> String {
        if self.manager.is_dirty() {
            "tutor*> ".into()
        } else {
            "tutor> ".into()
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = crate::cli::shell::parse_command_line(line)
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&raw.to_lowercase(), raw, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.closest_command(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn closest_command(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= 3)
            .map(|(_, name)| name)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_info("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Store(err) => CommandError::Store(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
            other @ ServiceError::NotFound { .. } => CommandError::Message(other.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}
