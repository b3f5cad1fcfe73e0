use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::TableError;

/// Chat-platform user id.
pub type PlayerId = i64;

/// A player action during a betting round.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check if nothing is owed, otherwise call (possibly short, all-in)
    Call,
    /// Raise by the given amount on top of the call
    Raise(u32),
    /// Put the whole remaining stack in
    AllIn,
}

/// Default starting stack size for each player in chips
pub const STARTING_STACK: u32 = 1_000;

/// A seated player. Identity and chips span hands; everything else is rebuilt per hand.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    chips: u32,
    /// Chips put in during the current betting round
    bet: u32,
    folded: bool,
    hole: [Option<Card>; 2],
    last_action: Option<Instant>,
    warned: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, chips: u32) -> Self {
        Self {
            id,
            name: name.into(),
            chips,
            bet: 0,
            folded: false,
            hole: [None, None],
            last_action: None,
            warned: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn chips(&self) -> u32 {
        self.chips
    }
    pub fn bet(&self) -> u32 {
        self.bet
    }
    pub fn is_folded(&self) -> bool {
        self.folded
    }
    pub fn is_warned(&self) -> bool {
        self.warned
    }
    pub fn last_action(&self) -> Option<Instant> {
        self.last_action
    }

    /// Still holding cards and chips, so the turn manager may ask them to act.
    pub fn can_act(&self) -> bool {
        !self.folded && self.chips > 0
    }

    /// Both hole cards, once dealt.
    pub fn hole_cards(&self) -> Option<[Card; 2]> {
        match self.hole {
            [Some(a), Some(b)] => Some([a, b]),
            _ => None,
        }
    }

    pub(crate) fn give_card(&mut self, c: Card) -> Result<(), String> {
        if self.hole[0].is_none() {
            self.hole[0] = Some(c);
            Ok(())
        } else if self.hole[1].is_none() {
            self.hole[1] = Some(c);
            Ok(())
        } else {
            Err("Hole cards already full".to_string())
        }
    }

    pub(crate) fn reset_for_new_hand(&mut self) {
        self.bet = 0;
        self.folded = false;
        self.hole = [None, None];
    }

    pub(crate) fn fold(&mut self) {
        self.folded = true;
    }

    pub(crate) fn clear_bet(&mut self) {
        self.bet = 0;
    }

    /// Moves `amount` from the stack into this round's bet.
    pub(crate) fn commit(&mut self, amount: u32) -> Result<(), TableError> {
        self.chips = self
            .chips
            .checked_sub(amount)
            .ok_or(TableError::NegativeStack { player: self.id })?;
        self.bet += amount;
        Ok(())
    }

    pub(crate) fn add_chips(&mut self, amount: u32) {
        self.chips = self.chips.saturating_add(amount);
    }

    /// Records activity: refreshes the AFK clock and lifts any pending warning.
    pub(crate) fn touch(&mut self, now: Instant) {
        self.last_action = Some(now);
        self.warned = false;
    }

    pub(crate) fn mark_warned(&mut self) {
        self.warned = true;
    }
}
