use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::player::PlayerId;
use crate::stage::Stage;

/// What an applied action turned out to be once chips were counted.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTaken {
    Check,
    Call,
    Raise,
    AllIn,
    Fold,
    /// The player had nothing left to bet; nothing moved.
    AlreadyAllIn,
    /// Folded by the AFK watchdog.
    TimedOut,
}

impl fmt::Display for ActionTaken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionTaken::Check => "checks",
            ActionTaken::Call => "calls",
            ActionTaken::Raise => "raises",
            ActionTaken::AllIn => "goes all-in",
            ActionTaken::Fold => "folds",
            ActionTaken::AlreadyAllIn => "is already all-in",
            ActionTaken::TimedOut => "was folded for inactivity",
        };
        f.write_str(s)
    }
}

/// Result row handed to the stats collaborator once per participant.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandResult {
    pub player_id: PlayerId,
    pub chips_won: u32,
    pub won: bool,
}

/// How a hand ended.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandSummary {
    pub hand_number: u32,
    /// `None` when every player folded and the pot was void.
    pub winner: Option<PlayerId>,
    pub winner_name: Option<String>,
    pub pot: u32,
    pub description: String,
    pub best_five: Option<[Card; 5]>,
    pub board: Vec<Card>,
    pub results: Vec<HandResult>,
}

/// Outbound notifications produced by table operations, in the order they happened.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableEvent {
    HandStarted {
        hand_number: u32,
        first_to_act: Option<PlayerId>,
    },
    StageChanged {
        stage: Stage,
        community_cards: Vec<Card>,
    },
    ActionApplied {
        player_id: PlayerId,
        name: String,
        action: ActionTaken,
        amount: u32,
    },
    TurnPassed {
        player_id: PlayerId,
    },
    PlayerWarned {
        player_id: PlayerId,
        name: String,
    },
    PlayerAutoFolded {
        player_id: PlayerId,
        name: String,
    },
    HandComplete(HandSummary),
}

impl TableEvent {
    pub fn summary(&self) -> Option<&HandSummary> {
        match self {
            TableEvent::HandComplete(summary) => Some(summary),
            _ => None,
        }
    }
}
