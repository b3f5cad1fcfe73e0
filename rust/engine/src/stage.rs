use serde::{Deserialize, Serialize};

/// Phase of a hand. `Waiting` only exists before the first hand of a session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

/// One edge of the street machine: leaving `from` burns a card (when `reveal > 0`)
/// and turns `reveal` community cards face up.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct StageTransition {
    pub from: Stage,
    pub to: Stage,
    pub reveal: usize,
}

/// Street progression once a betting round closes with two or more players left.
pub const TRANSITIONS: [StageTransition; 4] = [
    StageTransition {
        from: Stage::Preflop,
        to: Stage::Flop,
        reveal: 3,
    },
    StageTransition {
        from: Stage::Flop,
        to: Stage::Turn,
        reveal: 1,
    },
    StageTransition {
        from: Stage::Turn,
        to: Stage::River,
        reveal: 1,
    },
    StageTransition {
        from: Stage::River,
        to: Stage::Showdown,
        reveal: 0,
    },
];

impl Stage {
    /// The transition taken when the betting round on this stage closes.
    pub fn transition(self) -> Option<StageTransition> {
        TRANSITIONS.iter().copied().find(|t| t.from == self)
    }

    /// A betting street where players may act.
    pub fn is_betting(self) -> bool {
        matches!(
            self,
            Stage::Preflop | Stage::Flop | Stage::Turn | Stage::River
        )
    }

    /// Community cards that must be visible on this street.
    pub fn board_len(self) -> Option<usize> {
        match self {
            Stage::Waiting | Stage::Preflop => Some(0),
            Stage::Flop => Some(3),
            Stage::Turn => Some(4),
            Stage::River => Some(5),
            // a hand can end by default on any street
            Stage::Showdown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streets_chain_to_showdown() {
        let mut stage = Stage::Preflop;
        let mut revealed = 0;
        while let Some(t) = stage.transition() {
            revealed += t.reveal;
            stage = t.to;
            if let Some(len) = stage.board_len() {
                assert_eq!(len, revealed);
            }
        }
        assert_eq!(stage, Stage::Showdown);
        assert_eq!(revealed, 5);
    }

    #[test]
    fn terminal_and_waiting_states_have_no_edges() {
        assert!(Stage::Showdown.transition().is_none());
        assert!(Stage::Waiting.transition().is_none());
        assert!(!Stage::Showdown.is_betting());
        assert!(Stage::River.is_betting());
    }
}
