use thiserror::Error;

use crate::player::PlayerId;
use crate::stage::Stage;

/// Rejected player input. Never mutates the table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("Player {0} is not seated at this table")]
    NotSeated(PlayerId),
    #[error("Player already folded")]
    PlayerAlreadyFolded,
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    NotPlayersTurn { expected: PlayerId, actual: PlayerId },
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("Hand already complete")]
    HandAlreadyComplete,
    #[error("Invalid raise amount: {0:?}")]
    InvalidAmount(String),
    #[error("Unknown action: {0:?}")]
    UnknownAction(String),
    #[error("Invalid card code: {0:?}")]
    InvalidCard(String),
}

/// Table lifecycle failures and broken engine invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("At least {required} player(s) must be seated to start a hand")]
    NotEnoughPlayers { required: usize },
    #[error("Match finished after {played} hand(s)")]
    MatchFinished { played: u32 },
    #[error("Table is full ({max} seats)")]
    TableFull { max: usize },
    #[error("Player {0} is already seated")]
    AlreadySeated(PlayerId),
    #[error("A hand is still running ({0:?})")]
    HandInProgress(Stage),
    #[error("Invalid table setup: {0}")]
    InvalidConfig(String),
    #[error("Invariant violated: deck exhausted")]
    DeckExhausted,
    #[error("Invariant violated: player {player} would go below zero chips")]
    NegativeStack { player: PlayerId },
}

impl TableError {
    /// Invariant violations indicate a bug elsewhere, not bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            TableError::DeckExhausted | TableError::NegativeStack { .. }
        )
    }
}
