use std::collections::HashMap;

use chrono::NaiveDate;

pub mod courses;
pub mod data;
pub mod expenses;
pub mod payments;
pub mod reports;
pub mod sessions;
pub mod students;
pub mod system;
pub mod teachers;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::domain::{parse_date, NamedEntity, RecordId};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(data::definitions());
    commands.extend(students::definitions());
    commands.extend(teachers::definitions());
    commands.extend(courses::definitions());
    commands.extend(payments::definitions());
    commands.extend(sessions::definitions());
    commands.extend(expenses::definitions());
    commands.extend(reports::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub group: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        group: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            group,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.commands.get(name).map(|definition| definition.handler)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

pub(crate) fn require_args(args: &[&str], count: usize, usage: &str) -> CommandResult {
    if args.len() < count {
        Err(CommandError::InvalidArguments(format!("usage: {}", usage)))
    } else {
        Ok(())
    }
}

/// Display name for an optional lookup; dangling references render blank.
pub(crate) fn name_or_blank<T: NamedEntity>(record: Option<&T>) -> String {
    record.map(|record| record.name().to_string()).unwrap_or_default()
}

pub(crate) fn parse_id(raw: &str, label: &str) -> Result<RecordId, CommandError> {
    raw.trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("{} must be a numeric id", label)))
}

pub(crate) fn parse_number(raw: &str, label: &str) -> Result<f64, CommandError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("{} must be a number", label)))
}

/// Parses an optional `YYYY-MM-DD` argument, defaulting to `today`.
pub(crate) fn parse_date_or(
    raw: Option<&&str>,
    today: NaiveDate,
) -> Result<NaiveDate, CommandError> {
    match raw {
        None => Ok(today),
        Some(raw) => parse_date(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!("invalid date `{}` (expected YYYY-MM-DD)", raw))
        }),
    }
}

/// Splits `field=value` arguments used by the edit commands.
pub(crate) fn parse_assignments<'a>(
    args: &[&'a str],
) -> Result<Vec<(&'a str, &'a str)>, CommandError> {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments(
            "provide at least one field=value pair".into(),
        ));
    }
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(field, value)| (field.trim(), value.trim()))
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!("expected field=value, got `{}`", arg))
                })
        })
        .collect()
}

pub(crate) fn unknown_field(field: &str, allowed: &str) -> CommandError {
    CommandError::InvalidArguments(format!(
        "unknown field `{}` (expected one of: {})",
        field, allowed
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_references_render_blank() {
        use crate::domain::Teacher;
        let teacher = Teacher::new("Alice", 30.0);
        assert_eq!(name_or_blank(Some(&teacher)), "Alice");
        assert_eq!(name_or_blank::<Teacher>(None), "");
    }

    #[test]
    fn registry_keeps_declaration_order() {
        let registry = CommandRegistry::new(all_definitions());
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names.first(), Some(&"help"));
        assert!(names.contains(&"report-csv"));
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn assignments_require_equals_sign() {
        assert_eq!(
            parse_assignments(&["name=Dana Lee", "rate= 40"]).unwrap(),
            vec![("name", "Dana Lee"), ("rate", "40")]
        );
        assert!(parse_assignments(&["name"]).is_err());
        assert!(parse_assignments(&[]).is_err());
    }

    #[test]
    fn numbers_and_ids_are_validated() {
        assert_eq!(parse_id("7", "Student id").unwrap(), 7);
        assert!(parse_id("seven", "Student id").is_err());
        assert!(parse_number("NaN", "Hours").is_err());
        assert_eq!(parse_number("2.5", "Hours").unwrap(), 2.5);
    }
}
