use std::collections::HashSet;

use holdem_engine::deck::Deck;

#[test]
fn deck_has_52_unique_cards() {
    let mut d = Deck::new_with_seed(1);
    let mut seen = HashSet::new();
    while let Some(c) = d.deal_card() {
        assert!(seen.insert(c), "duplicate {c}");
    }
    assert_eq!(seen.len(), 52);
    assert_eq!(d.remaining(), 0);
}

#[test]
fn exhausted_deck_stops_dealing() {
    let mut d = Deck::new_with_seed(2);
    for _ in 0..52 {
        assert!(d.burn_card().is_some());
    }
    assert!(d.deal_card().is_none());
    assert!(d.burn_card().is_none());
}

#[test]
fn same_seed_same_order() {
    let mut a = Deck::new_with_seed(42);
    let mut b = Deck::new_with_seed(42);
    for _ in 0..52 {
        assert_eq!(a.deal_card(), b.deal_card());
    }
}

#[test]
fn different_seeds_differ() {
    let mut a = Deck::new_with_seed(1);
    let mut b = Deck::new_with_seed(2);
    let first: Vec<_> = (0..10).filter_map(|_| a.deal_card()).collect();
    let second: Vec<_> = (0..10).filter_map(|_| b.deal_card()).collect();
    assert_ne!(first, second);
}

#[test]
fn serialized_events_are_tagged() {
    use holdem_engine::events::TableEvent;
    use holdem_engine::stage::Stage;

    let ev = TableEvent::StageChanged {
        stage: Stage::Flop,
        community_cards: Vec::new(),
    };
    let json = serde_json::to_value(&ev).unwrap();
    assert_eq!(json["type"], "stage_changed");
    assert_eq!(json["stage"], "FLOP");
}
