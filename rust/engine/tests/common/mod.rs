#![allow(dead_code)]

use std::time::Instant;

use holdem_engine::cards::{full_deck, parse_cards, Card};
use holdem_engine::deck::Deck;
use holdem_engine::table::{Table, TableConfig};

/// Deck dealing `holes` (in join order) then flop, turn and river from `board`,
/// with burn cards taken from whatever is left.
pub fn stacked_deck(holes: &str, board: &str) -> Deck {
    let holes = parse_cards(holes).expect("hole codes");
    let board = parse_cards(board).expect("board codes");
    let used: Vec<Card> = holes.iter().chain(board.iter()).copied().collect();
    let mut spare = full_deck().into_iter().filter(|c| !used.contains(c));
    let mut burn = || spare.next().expect("spare card");

    let mut cards = holes;
    let mut board = board.into_iter();
    for reveal in [3, 1, 1] {
        cards.push(burn());
        cards.extend(board.by_ref().take(reveal));
    }
    cards.extend(spare);
    Deck::from_cards(cards)
}

pub fn table(chips: u32, players: i64) -> Table {
    let mut t = Table::new(TableConfig {
        starting_chips: chips,
        seed: Some(99),
        ..TableConfig::default()
    });
    for id in 1..=players {
        t.add_player(id, format!("p{id}")).expect("seat");
    }
    t
}

pub fn total_chips(t: &Table) -> u32 {
    t.pot() + t.players().iter().map(|p| p.chips()).sum::<u32>()
}

pub fn started(chips: u32, players: i64) -> (Table, Instant) {
    let mut t = table(chips, players);
    let now = Instant::now();
    t.start_hand(now).expect("start");
    (t, now)
}
