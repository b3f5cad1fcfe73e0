//! Error types for the CLI application.
//!
//! Every handler returns `Result<(), CliError>`; [`CliError::exit_code`] decides what the
//! process reports.

use std::fmt;

use holdem_engine::errors::ActionError;
use holdem_service::{SessionError, StatsError};

use crate::config::ConfigError;
use crate::exit_code;

#[derive(Debug)]
pub enum CliError {
    /// I/O error (stdin/stdout writes, files)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Table or session rejected the request
    Session(SessionError),

    /// Leaderboard store failure
    Stats(StatsError),

    /// Input closed in the middle of a hand
    Interrupted(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Interrupted(_) => exit_code::INTERRUPTED,
            _ => exit_code::ERROR,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Session(e) => write!(f, "{}", e),
            CliError::Stats(e) => write!(f, "Stats error: {}", e),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Session(e) => Some(e),
            CliError::Stats(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<SessionError> for CliError {
    fn from(error: SessionError) -> Self {
        CliError::Session(error)
    }
}

impl From<StatsError> for CliError {
    fn from(error: StatsError) -> Self {
        CliError::Stats(error)
    }
}

impl From<ActionError> for CliError {
    fn from(error: ActionError) -> Self {
        CliError::InvalidInput(error.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupted_maps_to_its_own_exit_code() {
        assert_eq!(
            CliError::Interrupted("stdin closed".into()).exit_code(),
            exit_code::INTERRUPTED
        );
        assert_eq!(
            CliError::InvalidInput("x".into()).exit_code(),
            exit_code::ERROR
        );
    }

    #[test]
    fn card_errors_become_invalid_input() {
        let err = CliError::from(ActionError::InvalidCard("ZZ".into()));
        assert!(matches!(err, CliError::InvalidInput(_)));
        assert!(err.to_string().starts_with("Invalid input:"));
    }
}
