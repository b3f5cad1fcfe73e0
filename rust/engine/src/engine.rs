use std::time::Instant;

use crate::deck::Deck;
use crate::errors::{ActionError, TableError};
use crate::events::{ActionTaken, TableEvent};
use crate::player::{PlayerAction, PlayerId};
use crate::stage::Stage;
use crate::table::Table;

/// Hand orchestration: starting hands, applying player actions and driving the street
/// machine until a decision is needed or the hand is settled.
///
/// # Examples
///
/// ```
/// use std::time::Instant;
/// use holdem_engine::player::PlayerAction;
/// use holdem_engine::stage::Stage;
/// use holdem_engine::table::{Table, TableConfig};
///
/// let mut table = Table::new(TableConfig { seed: Some(42), ..TableConfig::default() });
/// table.add_player(1, "ann").unwrap();
/// table.add_player(2, "bob").unwrap();
///
/// let now = Instant::now();
/// table.start_hand(now).unwrap();
/// assert_eq!(table.stage(), Stage::Preflop);
///
/// let first = table.current_player().unwrap();
/// let events = table.apply_action(first, PlayerAction::Fold, now).unwrap();
/// assert!(events.iter().any(|e| e.summary().is_some()));
/// assert_eq!(table.stage(), Stage::Showdown);
/// ```
impl Table {
    /// Shuffles a new deck from the table's random source and deals the hand.
    pub fn start_hand(&mut self, now: Instant) -> Result<Vec<TableEvent>, TableError> {
        self.check_can_start()?;
        self.reset_for_new_hand();
        self.begin_hand(now)
    }

    /// Like [`Table::start_hand`] but deals from a prepared deck.
    pub fn start_hand_with_deck(
        &mut self,
        deck: Deck,
        now: Instant,
    ) -> Result<Vec<TableEvent>, TableError> {
        self.check_can_start()?;
        self.reset_with_deck(deck);
        self.begin_hand(now)
    }

    fn check_can_start(&self) -> Result<(), TableError> {
        if self.hand_in_progress() {
            return Err(TableError::HandInProgress(self.stage));
        }
        if self.match_finished() {
            return Err(TableError::MatchFinished {
                played: self.hands_played,
            });
        }
        if self.players.is_empty() {
            return Err(TableError::NotEnoughPlayers { required: 1 });
        }
        Ok(())
    }

    fn begin_hand(&mut self, now: Instant) -> Result<Vec<TableEvent>, TableError> {
        if let Err(err) = self.deal_hole_cards() {
            self.stage = Stage::Waiting;
            return Err(err);
        }
        self.hands_played += 1;
        for p in &mut self.players {
            p.touch(now);
            // busted players are dealt cards but sit the hand out
            if p.chips() == 0 {
                p.fold();
            }
        }
        Ok(vec![
            TableEvent::HandStarted {
                hand_number: self.hands_played,
                first_to_act: self.current_player(),
            },
            TableEvent::StageChanged {
                stage: Stage::Preflop,
                community_cards: Vec::new(),
            },
        ])
    }

    /// Applies one player decision and everything that follows from it: street changes,
    /// an automatic runout when nobody can bet any more, showdown and the next turn.
    ///
    /// Rejected actions leave the table untouched.
    pub fn apply_action(
        &mut self,
        player_id: PlayerId,
        action: PlayerAction,
        now: Instant,
    ) -> Result<Vec<TableEvent>, TableError> {
        self.validate_actor(player_id)?;

        let player = self.player_mut(player_id)?;
        player.touch(now);
        let name = player.name().to_string();
        let broke = player.chips() == 0;

        let (taken, amount) = if broke && action != PlayerAction::AllIn {
            (ActionTaken::AlreadyAllIn, 0)
        } else {
            self.bet(player_id, action)?
        };

        let mut events = vec![TableEvent::ActionApplied {
            player_id,
            name,
            action: taken,
            amount,
        }];
        self.progress(&mut events)?;
        Ok(events)
    }

    fn validate_actor(&mut self, player_id: PlayerId) -> Result<(), ActionError> {
        let Some(player) = self.player(player_id) else {
            return Err(ActionError::NotSeated(player_id));
        };
        let folded = player.is_folded();
        match self.stage {
            Stage::Waiting => return Err(ActionError::NoHandInProgress),
            Stage::Showdown => return Err(ActionError::HandAlreadyComplete),
            _ => {}
        }
        if folded {
            return Err(ActionError::PlayerAlreadyFolded);
        }
        match self.current_player_id() {
            Some(expected) if expected != player_id => Err(ActionError::NotPlayersTurn {
                expected,
                actual: player_id,
            }),
            _ => Ok(()),
        }
    }

    fn bet(
        &mut self,
        player_id: PlayerId,
        action: PlayerAction,
    ) -> Result<(ActionTaken, u32), TableError> {
        let went_all_in = |t: &Table| t.player(player_id).is_some_and(|p| p.chips() == 0);
        Ok(match action {
            PlayerAction::Fold => {
                self.fold(player_id)?;
                (ActionTaken::Fold, 0)
            }
            PlayerAction::Call | PlayerAction::Raise(0) => {
                let moved = self.check_or_call(player_id)?;
                let taken = if moved == 0 {
                    ActionTaken::Check
                } else if went_all_in(self) {
                    ActionTaken::AllIn
                } else {
                    ActionTaken::Call
                };
                (taken, moved)
            }
            PlayerAction::Raise(amount) => {
                let moved = self.raise_bet(player_id, amount)?;
                let taken = if went_all_in(self) {
                    ActionTaken::AllIn
                } else {
                    ActionTaken::Raise
                };
                (taken, moved)
            }
            PlayerAction::AllIn => {
                let chips = self.player(player_id).map_or(0, |p| p.chips());
                let moved = self.raise_bet(player_id, chips)?;
                (ActionTaken::AllIn, moved)
            }
        })
    }

    /// A player who can still bet has not matched the bet level, typically facing an
    /// all-in. The street stays open until they answer.
    fn call_pending(&self) -> bool {
        self.active_players().count() > 1
            && self.betting_players().any(|p| p.bet() < self.current_bet)
    }

    /// Unseats a player. Mid-hand this can close the street or leave a single player,
    /// so the hand is settled the same way as after an action, without moving the turn.
    pub fn leave(&mut self, player_id: PlayerId) -> Result<Vec<TableEvent>, TableError> {
        self.remove_player(player_id)?;
        let mut events = Vec::new();
        if self.hand_in_progress() {
            self.close_streets(&mut events)?;
        }
        Ok(events)
    }

    /// Street progression after the table changed. Runs the board out when at most one
    /// active player can still bet, resolves at SHOWDOWN, otherwise passes the turn.
    pub(crate) fn progress(&mut self, events: &mut Vec<TableEvent>) -> Result<(), TableError> {
        self.close_streets(events)?;
        if self.stage.is_betting() {
            if let Some(next) = self.next_turn() {
                events.push(TableEvent::TurnPassed { player_id: next });
            }
        }
        Ok(())
    }

    pub(crate) fn close_streets(&mut self, events: &mut Vec<TableEvent>) -> Result<(), TableError> {
        if !self.call_pending() {
            if let Some(stage) = self.advance_stage_if_needed()? {
                events.push(self.stage_changed(stage));
            }
            if self.stage.is_betting() && self.betting_players().count() <= 1 {
                while self.stage.is_betting() {
                    match self.advance_stage_if_needed()? {
                        Some(stage) => events.push(self.stage_changed(stage)),
                        None => break,
                    }
                }
            }
        }

        if self.stage == Stage::Showdown {
            let summary = self.resolve_showdown();
            events.push(TableEvent::HandComplete(summary));
        }
        Ok(())
    }

    fn stage_changed(&self, stage: Stage) -> TableEvent {
        TableEvent::StageChanged {
            stage,
            community_cards: self.community.clone(),
        }
    }
}
