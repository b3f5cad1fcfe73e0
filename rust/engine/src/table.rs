use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::{ActionError, TableError};
use crate::player::{Player, PlayerId, STARTING_STACK};
use crate::stage::{Stage, StageTransition};

/// Most players one deck serves: two hole cards each, three burns and five board cards.
pub const MAX_SEATS: usize = 22;

/// Per-table setup chosen by the host. Blinds are declared for display only and never posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub small_blind: u32,
    pub big_blind: u32,
    pub starting_chips: u32,
    /// 0 = unlimited (free play)
    pub max_hands: u32,
    /// 0 = as many as the deck serves ([`MAX_SEATS`])
    pub max_players: usize,
    /// Fixes deck order and seating shuffles for replays
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: 10,
            big_blind: 20,
            starting_chips: STARTING_STACK,
            max_hands: 0,
            max_players: 0,
            seed: None,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), TableError> {
        if self.starting_chips == 0 {
            return Err(TableError::InvalidConfig(
                "starting_chips must be greater than 0".into(),
            ));
        }
        if self.big_blind < self.small_blind {
            return Err(TableError::InvalidConfig(
                "big_blind must not be smaller than small_blind".into(),
            ));
        }
        if self.max_players == 1 || self.max_players > MAX_SEATS {
            return Err(TableError::InvalidConfig(format!(
                "max_players must be 0 (unlimited) or between 2 and {MAX_SEATS}"
            )));
        }
        Ok(())
    }

    /// Seat limit in force: `max_players`, or [`MAX_SEATS`] when unlimited.
    pub fn seat_limit(&self) -> usize {
        match self.max_players {
            0 => MAX_SEATS,
            n => n.min(MAX_SEATS),
        }
    }
}

/// One poker table: seats, pot, board and the betting state of the running hand.
///
/// Players are kept in join order. That order drives hole-card dealing and breaks showdown
/// ties; the acting order is the separately shuffled `turn_order`.
#[derive(Debug)]
pub struct Table {
    pub(crate) config: TableConfig,
    pub(crate) host_id: Option<PlayerId>,
    pub(crate) hands_played: u32,
    pub(crate) players: Vec<Player>,
    pub(crate) deck: Deck,
    pub(crate) community: Vec<Card>,
    pub(crate) pot: u32,
    pub(crate) stage: Stage,
    pub(crate) turn_order: Vec<PlayerId>,
    pub(crate) current_turn: usize,
    pub(crate) current_bet: u32,
    rng: ChaCha20Rng,
}

impl Table {
    pub fn new(config: TableConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            config,
            host_id: None,
            hands_played: 0,
            players: Vec::new(),
            deck: Deck::default(),
            community: Vec::with_capacity(5),
            pot: 0,
            stage: Stage::Waiting,
            turn_order: Vec::new(),
            current_turn: 0,
            current_bet: 0,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }
    pub fn host_id(&self) -> Option<PlayerId> {
        self.host_id
    }
    pub fn set_host(&mut self, host: PlayerId) {
        self.host_id = Some(host);
    }
    pub fn stage(&self) -> Stage {
        self.stage
    }
    pub fn pot(&self) -> u32 {
        self.pot
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn community_cards(&self) -> &[Card] {
        &self.community
    }
    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }
    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }
    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    /// Seated players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, TableError> {
        self.players
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(TableError::Action(ActionError::NotSeated(id)))
    }

    /// Players still holding cards this hand, all-in players included.
    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_folded())
    }

    /// Active players who could still put chips in.
    pub fn betting_players(&self) -> impl Iterator<Item = &Player> {
        self.active_players().filter(|p| p.chips() > 0)
    }

    pub fn hand_in_progress(&self) -> bool {
        self.stage.is_betting()
    }

    pub fn match_finished(&self) -> bool {
        self.config.max_hands > 0 && self.hands_played >= self.config.max_hands
    }

    // ---- seating -------------------------------------------------------

    /// Seats a player with the configured starting stack. Someone joining mid-hand sits
    /// the rest of it out.
    pub fn add_player(&mut self, id: PlayerId, name: impl Into<String>) -> Result<(), TableError> {
        if self.player(id).is_some() {
            return Err(TableError::AlreadySeated(id));
        }
        let max = self.config.seat_limit();
        if self.players.len() >= max {
            return Err(TableError::TableFull { max });
        }
        let mut player = Player::new(id, name, self.config.starting_chips);
        if self.hand_in_progress() {
            player.fold();
        }
        self.players.push(player);
        Ok(())
    }

    /// Unseats a player. Chips already in the pot stay there.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, TableError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id() == id)
            .ok_or(TableError::Action(ActionError::NotSeated(id)))?;
        Ok(self.players.remove(idx))
    }

    fn ensure_between_hands(&self) -> Result<(), TableError> {
        if self.hand_in_progress() {
            return Err(TableError::HandInProgress(self.stage));
        }
        Ok(())
    }

    /// Replaces the setup. Only allowed between hands; existing stacks are kept.
    pub fn reconfigure(&mut self, config: TableConfig) -> Result<(), TableError> {
        self.ensure_between_hands()?;
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Starts a fresh match: the hand counter goes back to zero.
    pub fn restart_match(&mut self) -> Result<(), TableError> {
        self.ensure_between_hands()?;
        self.hands_played = 0;
        Ok(())
    }

    // ---- hand setup ----------------------------------------------------

    /// New shuffled deck, empty pot and board, fresh random turn order, stage PREFLOP.
    pub fn reset_for_new_hand(&mut self) {
        let deck = Deck::shuffled(&mut self.rng);
        self.reset_with_deck(deck);
    }

    pub(crate) fn reset_with_deck(&mut self, deck: Deck) {
        self.deck = deck;
        self.community.clear();
        self.pot = 0;
        self.current_bet = 0;
        for p in &mut self.players {
            p.reset_for_new_hand();
        }
        let mut ids: Vec<PlayerId> = self.players.iter().map(Player::id).collect();
        ids.shuffle(&mut self.rng);
        self.turn_order = ids;
        self.current_turn = 0;
        self.stage = Stage::Preflop;
    }

    fn draw(&mut self) -> Result<Card, TableError> {
        self.deck.deal_card().ok_or(TableError::DeckExhausted)
    }

    /// Two cards to every seated player, in join order.
    pub fn deal_hole_cards(&mut self) -> Result<(), TableError> {
        for i in 0..self.players.len() {
            for _ in 0..2 {
                let c = self.draw()?;
                if self.players[i].give_card(c).is_err() {
                    return Err(TableError::DeckExhausted);
                }
            }
        }
        Ok(())
    }

    fn deal_street(&mut self, reveal: usize, stage: Stage) -> Result<(), TableError> {
        self.deck.burn_card().ok_or(TableError::DeckExhausted)?;
        for _ in 0..reveal {
            let c = self.draw()?;
            self.community.push(c);
        }
        self.stage = stage;
        self.current_bet = 0;
        for p in &mut self.players {
            p.clear_bet();
        }
        Ok(())
    }

    /// Burn + 3 community cards.
    pub fn deal_flop(&mut self) -> Result<(), TableError> {
        self.deal_street(3, Stage::Flop)
    }

    /// Burn + 1 community card.
    pub fn deal_turn(&mut self) -> Result<(), TableError> {
        self.deal_street(1, Stage::Turn)
    }

    /// Burn + 1 community card.
    pub fn deal_river(&mut self) -> Result<(), TableError> {
        self.deal_street(1, Stage::River)
    }

    fn take_transition(&mut self, t: StageTransition) -> Result<(), TableError> {
        if t.reveal > 0 {
            self.deal_street(t.reveal, t.to)
        } else {
            self.stage = t.to;
            Ok(())
        }
    }

    // ---- betting -------------------------------------------------------

    pub fn fold(&mut self, id: PlayerId) -> Result<(), TableError> {
        self.player_mut(id)?.fold();
        Ok(())
    }

    /// Check when nothing is owed, otherwise call as much as the stack allows.
    /// Returns the chips moved into the pot.
    pub fn check_or_call(&mut self, id: PlayerId) -> Result<u32, TableError> {
        let current_bet = self.current_bet;
        let p = self.player_mut(id)?;
        let to_call = current_bet.saturating_sub(p.bet());
        if to_call == 0 {
            return Ok(0);
        }
        let amount = to_call.min(p.chips());
        p.commit(amount)?;
        self.pot += amount;
        Ok(amount)
    }

    /// Raise by `amount` on top of the call, capped at the player's stack.
    ///
    /// There are no side pots: a capped raise only lifts the bet level to what the player
    /// actually put in. Returns the chips moved into the pot.
    pub fn raise_bet(&mut self, id: PlayerId, amount: u32) -> Result<u32, TableError> {
        let current_bet = self.current_bet;
        let p = self.player_mut(id)?;
        let to_call = current_bet.saturating_sub(p.bet());
        let total = to_call.saturating_add(amount).min(p.chips());
        p.commit(total)?;
        let new_bet = p.bet();
        self.pot += total;
        if new_bet > self.current_bet {
            self.current_bet = new_bet;
        }
        Ok(total)
    }

    // ---- round completion ---------------------------------------------

    /// Whether the current betting round is over.
    ///
    /// All-in players are ignored for matching: they may trail the bet level without
    /// holding the round open.
    pub fn everyone_matched_or_folded(&self) -> bool {
        if self.active_players().count() <= 1 {
            return true;
        }
        let mut bets = self.betting_players().map(Player::bet);
        match bets.next() {
            None => true,
            Some(first) => bets.all(|b| b == first),
        }
    }

    /// Closes the betting round if it is complete. Returns the stage entered, if any.
    ///
    /// A lone remaining player goes straight to SHOWDOWN without more board cards.
    pub fn advance_stage_if_needed(&mut self) -> Result<Option<Stage>, TableError> {
        if !self.stage.is_betting() || !self.everyone_matched_or_folded() {
            return Ok(None);
        }
        if self.active_players().count() == 1 {
            self.stage = Stage::Showdown;
            return Ok(Some(Stage::Showdown));
        }
        match self.stage.transition() {
            Some(t) => {
                self.take_transition(t)?;
                Ok(Some(t.to))
            }
            None => Ok(None),
        }
    }

    // ---- views -----------------------------------------------------------

    pub fn snapshot(&self) -> TableView {
        TableView {
            stage: self.stage,
            pot: self.pot,
            current_bet: self.current_bet,
            board: self.community.clone(),
            current_player: self.current_player(),
            hands_played: self.hands_played,
            max_hands: self.config.max_hands,
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    id: p.id(),
                    name: p.name().to_string(),
                    chips: p.chips(),
                    bet: p.bet(),
                    folded: p.is_folded(),
                })
                .collect(),
        }
    }
}

/// Read-only table summary for status messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub stage: Stage,
    pub pot: u32,
    pub current_bet: u32,
    pub board: Vec<Card>,
    pub current_player: Option<PlayerId>,
    pub hands_played: u32,
    pub max_hands: u32,
    pub players: Vec<PlayerView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub chips: u32,
    pub bet: u32,
    pub folded: bool,
}
