use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};

/// An exhaustible deck. Cards are dealt from the front and never returned within a hand.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
}

impl Deck {
    /// All 52 cards in a random order drawn from `rng`.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards = full_deck();
        cards.shuffle(rng);
        Self { cards, position: 0 }
    }

    pub fn new_with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// A deck that deals `cards` in the given order. Used to replay or stack a hand.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards, position: 0 }
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    pub fn burn_card(&mut self) -> Option<Card> {
        self.deal_card()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::from_cards(Vec::new())
    }
}
