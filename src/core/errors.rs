use std::result::Result as StdResult;

use thiserror::Error;

use crate::assistant::AssistantError;
use crate::config::ConfigError;

/// Unified error type for the domain, service, and storage layers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpendError {
    /// Bad input to a mutation; the ledger is left unchanged.
    #[error("Invalid input: {0}")]
    Validation(String),
    /// A stored record breaks a domain invariant (e.g. a zero budget limit).
    #[error("Invariant violated: {0}")]
    Invariant(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Assistant unavailable: {0}")]
    Assistant(String),
}

pub type Result<T> = StdResult<T, SpendError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] SpendError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for SpendError {
    fn from(err: std::io::Error) -> Self {
        SpendError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for SpendError {
    fn from(err: serde_json::Error) -> Self {
        SpendError::Storage(err.to_string())
    }
}

impl From<ConfigError> for SpendError {
    fn from(err: ConfigError) -> Self {
        SpendError::Config(err.to_string())
    }
}

impl From<AssistantError> for SpendError {
    fn from(err: AssistantError) -> Self {
        SpendError::Assistant(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(SpendError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}
