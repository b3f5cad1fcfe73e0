use crate::events::{HandResult, HandSummary};
use crate::hand::{evaluate_holdem, BestHand};
use crate::player::PlayerId;
use crate::stage::Stage;
use crate::table::Table;

impl Table {
    /// Settles the pot among non-folded players and ends the hand.
    ///
    /// Players are ranked by hand strength with a stable sort over join order, so identical
    /// hands go to whoever joined first. A lone survivor wins by default without showing
    /// cards. The whole pot goes to one player; there are no split pots. With nobody left
    /// the pot is discarded and nothing is recorded.
    pub fn resolve_showdown(&mut self) -> HandSummary {
        if let [only] = self.active_players().map(|p| p.id()).collect::<Vec<_>>()[..] {
            return self.award_by_default(only);
        }
        let pot = self.pot;
        self.pot = 0;
        self.stage = Stage::Showdown;

        let mut ranked: Vec<(PlayerId, Option<BestHand>)> = self
            .active_players()
            .map(|p| {
                let best = p
                    .hole_cards()
                    .and_then(|hole| evaluate_holdem(hole, &self.community));
                (p.id(), best)
            })
            .collect();

        if ranked.is_empty() {
            return HandSummary {
                hand_number: self.hands_played,
                winner: None,
                winner_name: None,
                pot,
                description: "pot void".to_string(),
                best_five: None,
                board: self.community.clone(),
                results: Vec::new(),
            };
        }

        ranked.sort_by(|(_, a), (_, b)| {
            let a = a.as_ref().map(|h| &h.strength);
            let b = b.as_ref().map(|h| &h.strength);
            b.cmp(&a)
        });
        let (winner, best) = ranked.swap_remove(0);
        let description = match &best {
            Some(best) => best.description.clone(),
            None => "no made hand".to_string(),
        };
        self.award(winner, pot, description, best.map(|b| b.cards))
    }

    /// Hands the pot to `winner` without comparing cards.
    pub(crate) fn award_by_default(&mut self, winner: PlayerId) -> HandSummary {
        let pot = self.pot;
        self.pot = 0;
        self.stage = Stage::Showdown;
        self.award(winner, pot, "uncontested".to_string(), None)
    }

    fn award(
        &mut self,
        winner: PlayerId,
        pot: u32,
        description: String,
        best_five: Option<[crate::cards::Card; 5]>,
    ) -> HandSummary {
        let winner_name = self.players.iter_mut().find(|p| p.id() == winner).map(|p| {
            p.add_chips(pot);
            p.name().to_string()
        });
        HandSummary {
            hand_number: self.hands_played,
            winner: Some(winner),
            winner_name,
            pot,
            description,
            best_five,
            board: self.community.clone(),
            results: self.participant_results(winner, pot),
        }
    }

    /// One row per player dealt into the hand who is still seated, in turn order.
    fn participant_results(&self, winner: PlayerId, pot: u32) -> Vec<HandResult> {
        self.turn_order
            .iter()
            .filter(|&&id| self.player(id).is_some())
            .map(|&id| HandResult {
                player_id: id,
                chips_won: if id == winner { pot } else { 0 },
                won: id == winner,
            })
            .collect()
    }
}
