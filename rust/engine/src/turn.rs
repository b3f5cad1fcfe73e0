use crate::player::PlayerId;
use crate::table::Table;

impl Table {
    fn eligible(&self, id: PlayerId) -> bool {
        self.player(id).is_some_and(|p| p.can_act())
    }

    /// Moves the turn pointer to the next player who can act, scanning at most one full
    /// cycle of the turn order. `None` means nobody is left to ask for a decision.
    pub fn next_turn(&mut self) -> Option<PlayerId> {
        let n = self.turn_order.len();
        for step in 1..=n {
            let idx = (self.current_turn + step) % n;
            let id = self.turn_order[idx];
            if self.eligible(id) {
                self.current_turn = idx;
                return Some(id);
            }
        }
        None
    }

    /// Player whose decision is awaited. Moves the pointer past players who became
    /// ineligible since it last stopped.
    pub fn current_player_id(&mut self) -> Option<PlayerId> {
        let id = *self.turn_order.get(self.current_turn)?;
        if self.eligible(id) {
            return Some(id);
        }
        self.next_turn()
    }

    /// Same answer as [`Table::current_player_id`] without moving the pointer.
    pub fn current_player(&self) -> Option<PlayerId> {
        let n = self.turn_order.len();
        (0..n)
            .map(|step| self.turn_order[(self.current_turn + step) % n])
            .find(|&id| self.eligible(id))
    }
}
