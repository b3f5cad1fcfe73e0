use holdem_engine::errors::{ActionError, TableError};
use holdem_engine::player::PlayerId;
use thiserror::Error;

use crate::session::SessionKey;
use crate::settings::SettingsError;
use crate::stats::StatsError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No table for session {0}")]
    NotFound(SessionKey),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("Stats store error: {0}")]
    Stats(#[from] StatsError),
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("Player {actor} is not the table host")]
    NotHost { actor: PlayerId },
    #[error("Session storage poisoned")]
    StoragePoisoned,
}

impl From<ActionError> for SessionError {
    fn from(err: ActionError) -> Self {
        SessionError::Table(err.into())
    }
}

/// How loudly an error should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Bad input from a player; expected during normal play
    Client,
    /// Collaborator failure (storage, locks)
    Server,
    /// A broken engine invariant
    Critical,
}

impl SessionError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SessionError::Table(err) if err.is_invariant_violation() => ErrorSeverity::Critical,
            SessionError::Table(_)
            | SessionError::NotFound(_)
            | SessionError::NotHost { .. }
            | SessionError::Settings(_) => ErrorSeverity::Client,
            SessionError::Stats(_) | SessionError::StoragePoisoned => ErrorSeverity::Server,
        }
    }

    /// Machine-readable code for front ends.
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::NotFound(_) => "session_not_found",
            SessionError::NotHost { .. } => "not_host",
            SessionError::Table(TableError::Action(_)) => "invalid_action",
            SessionError::Table(err) if err.is_invariant_violation() => "invariant_violation",
            SessionError::Table(_) => "table_error",
            SessionError::Stats(_) => "stats_error",
            SessionError::Settings(_) => "invalid_settings",
            SessionError::StoragePoisoned => "storage_poisoned",
        }
    }
}

/// Logs `err` at the level its severity calls for.
pub fn log_error(session: &SessionKey, err: &SessionError) {
    match err.severity() {
        ErrorSeverity::Client => {
            tracing::info!(session = %session, code = err.code(), error = %err, "request rejected")
        }
        ErrorSeverity::Server => {
            tracing::warn!(session = %session, code = err.code(), error = %err, "collaborator failure")
        }
        ErrorSeverity::Critical => {
            tracing::error!(session = %session, code = err.code(), error = %err, "engine invariant violated")
        }
    }
}
