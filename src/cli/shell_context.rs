use std::env;

use chrono::NaiveDate;
use crate::{
    assistant::{self, Assistant},
    config::{Config, ConfigManager},
    core::{
        ledger_manager::LedgerManager,
        time::{Clock, FixedClock, SystemClock},
        utils::PathResolver,
    },
    presentation::MoneyFormat,
    storage::JsonStorage,
};

use super::commands;
use super::core::{CliError, CommandError, LoopControl};
use super::output;
use super::registry::{CommandEntry, CommandRegistry};

/// Pins "today" to a fixed `YYYY-MM-DD` date, for reproducible sessions.
pub const TODAY_ENV: &str = "SMARTSPEND_TODAY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: LedgerManager,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub money: MoneyFormat,
    pub clock: Box<dyn Clock>,
    pub assistant: Box<dyn Assistant>,
    pub running: bool,
}

impl ShellContext {
    /// Opens the application home (`SMARTSPEND_HOME` or `~/.smartspend`) and loads its data.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base = PathResolver::base_dir();
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let data_dir = config
            .data_dir
            .clone()
            .unwrap_or_else(|| PathResolver::data_dir_in(&base));
        let storage = JsonStorage::at(data_dir)?;
        let manager = LedgerManager::open(Box::new(storage));
        let clock = clock_from_env()?;
        let assistant = assistant::from_config(&config.assistant);

        let context = Self::with_parts(mode, manager, config_manager, config, clock, assistant);
        for warning in context.manager.load_warnings() {
            output::warning(format!("Stored data could not be read and was reset: {}", warning));
        }
        Ok(context)
    }

    pub fn with_parts(
        mode: CliMode,
        manager: LedgerManager,
        config_manager: ConfigManager,
        config: Config,
        clock: Box<dyn Clock>,
        assistant: Box<dyn Assistant>,
    ) -> Self {
        let registry = commands::registry();
        let money = MoneyFormat::from_config(&config);
        Self {
            mode,
            registry,
            manager,
            config_manager,
            config,
            money,
            clock,
            assistant,
            running: true,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn prompt(&self) -> String {
        format!("smartspend [{}]> ", self.manager.ledger().transactions().len())
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    /// Saves the config and rebuilds the pieces derived from it.
    pub(crate) fn apply_config(&mut self, config: Config) -> Result<(), CommandError> {
        self.config_manager.save(&config)?;
        self.money = MoneyFormat::from_config(&config);
        self.assistant = assistant::from_config(&config.assistant);
        self.config = config;
        Ok(())
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

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.closest(input) {
            output::info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }
}

fn clock_from_env() -> Result<Box<dyn Clock>, CliError> {
    match env::var(TODAY_ENV) {
        Ok(value) if !value.trim().is_empty() => {
            let today = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                CliError::Input(format!("{} must be YYYY-MM-DD (got `{}`)", TODAY_ENV, value))
            })?;
            Ok(Box::new(FixedClock::new(today)))
        }
        _ => Ok(Box::new(SystemClock)),
    }
}
