//! Command errors, argument parsing, and record lookup shared by the command handlers.

use std::{
    collections::{HashMap, HashSet},
    io,
};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::ConfigError;
use crate::core::errors::SpendError;
use crate::core::ledger_manager::PersistOutcome;
use crate::core::services::ServiceError;
use crate::domain::{parse_amount, Identifiable};

pub use crate::core::errors::CliError;
pub use crate::cli::shell_context::{CliMode, ShellContext};

use super::output;

/// Shortest id prefix accepted in place of a full record id.
const MIN_ID_PREFIX: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] SpendError),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(err) => CommandError::Core(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownKey(_) | ConfigError::InvalidValue { .. } => {
                CommandError::InvalidArguments(err.to_string())
            }
            other => CommandError::Core(SpendError::from(other)),
        }
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("Usage: {}", usage))
}

/// Positional arguments plus `--name value` options and bare `--switch` flags.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ParsedArgs {
    pub positional: Vec<String>,
    options: HashMap<String, String>,
    switches: HashSet<String>,
}

impl ParsedArgs {
    /// Splits `args`, treating names listed in `switch_names` as value-less flags.
    pub fn parse(args: &[&str], switch_names: &[&str]) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                parsed.positional.push(arg.to_string());
                continue;
            };
            if name.is_empty() {
                parsed
                    .positional
                    .extend(iter.by_ref().map(|rest| rest.to_string()));
                break;
            }
            if switch_names.contains(&name) {
                parsed.switches.insert(name.to_string());
                continue;
            }
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("Option `--{}` needs a value", name))
            })?;
            parsed.options.insert(name.to_string(), value.to_string());
        }
        Ok(parsed)
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    pub fn has(&self, switch: &str) -> bool {
        self.switches.contains(switch)
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }
}

pub(crate) fn parse_date_arg(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!(
            "`{}` is not a valid date (expected YYYY-MM-DD)",
            input
        ))
    })
}

pub(crate) fn parse_amount_arg(input: &str) -> Result<Decimal, CommandError> {
    parse_amount(input).map_err(CommandError::from)
}

/// Finds the record whose id equals `input` or starts with it.
/// `Ok(None)` when nothing matches; an error when a prefix is ambiguous.
pub(crate) fn resolve_id<'a, T: Identifiable>(
    records: &'a [T],
    input: &str,
) -> Result<Option<&'a T>, CommandError> {
    let needle = input.trim();
    if let Some(exact) = records.iter().find(|record| record.id() == needle) {
        return Ok(Some(exact));
    }
    if needle.len() < MIN_ID_PREFIX {
        return Ok(None);
    }
    let mut matches = records.iter().filter(|record| record.id().starts_with(needle));
    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(Some(found)),
        (Some(_), Some(_)) => Err(CommandError::InvalidArguments(format!(
            "Id prefix `{}` matches more than one record; use more characters",
            needle
        ))),
        (None, _) => Ok(None),
    }
}

/// Shortened id used in listings.
pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

pub(crate) fn report_persist(outcome: &PersistOutcome) {
    if let PersistOutcome::Failed(reason) = outcome {
        output::warning(format!("Change kept for this session but not saved: {}", reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Budget;

    #[test]
    fn parsed_args_split_options_and_switches() {
        let parsed = ParsedArgs::parse(
            &["Cafe", "4.50", "--category", "Food", "--suggest", "--", "--odd"],
            &["suggest"],
        )
        .unwrap();
        assert_eq!(parsed.positional, vec!["Cafe", "4.50", "--odd"]);
        assert_eq!(parsed.option("category"), Some("Food"));
        assert!(parsed.has("suggest"));
        assert!(ParsedArgs::parse(&["--date"], &[]).is_err());
    }

    #[test]
    fn resolve_id_accepts_unique_prefix() {
        let mut first = Budget::new("Food", Decimal::from(10));
        first.id = "abcd1234".into();
        let mut second = Budget::new("Fun", Decimal::from(10));
        second.id = "abce9999".into();
        let budgets = vec![first, second];

        assert_eq!(
            resolve_id(&budgets, "abcd").unwrap().map(|b| b.category.as_str()),
            Some("Food")
        );
        assert!(resolve_id(&budgets, "abc").unwrap().is_none());
        assert!(resolve_id(&budgets, "zzzz").unwrap().is_none());

        let mut third = Budget::new("Rent", Decimal::from(10));
        third.id = "abcd5678".into();
        let budgets = vec![budgets[0].clone(), third];
        assert!(resolve_id(&budgets, "abcd").is_err());
    }

    #[test]
    fn dates_must_be_iso() {
        assert!(parse_date_arg("2024-02-29").is_ok());
        assert!(parse_date_arg("02/29/2024").is_err());
    }
}
