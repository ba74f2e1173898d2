pub mod assistant;
pub mod budget;
pub mod config;
pub mod dashboard;
pub mod goal;
pub mod system;
pub mod transaction;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};

/// Registry holding every shell command.
pub fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for entry in all_definitions() {
        registry.register(entry);
    }
    registry
}

fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(dashboard::definitions());
    commands.extend(transaction::definitions());
    commands.extend(budget::definitions());
    commands.extend(goal::definitions());
    commands.extend(assistant::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

/// Splits `<action> rest...`, failing with the command's usage when the action is missing.
pub(crate) fn split_action<'a>(
    args: &'a [&'a str],
    usage: &str,
) -> Result<(String, &'a [&'a str]), CommandError> {
    match args.split_first() {
        Some((action, rest)) => Ok((action.to_lowercase(), rest)),
        None => Err(crate::cli::core::usage_error(usage)),
    }
}
