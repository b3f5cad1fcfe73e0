mod common;

use std::time::{Duration, Instant};

use common::{stacked_deck, table, total_chips};
use holdem_engine::events::{HandResult, TableEvent};
use holdem_engine::hand::Category;
use holdem_engine::player::PlayerAction;
use holdem_engine::stage::Stage;
use holdem_engine::watchdog::AfkPolicy;

#[test]
fn identical_hands_go_to_the_first_seated_player() {
    let mut t = table(1000, 2);
    let now = Instant::now();
    // royal flush entirely on the board
    t.start_hand_with_deck(stacked_deck("2C 3D 2H 3S", "AS KS QS JS 10S"), now)
        .unwrap();
    t.raise_bet(1, 200).unwrap();
    t.check_or_call(2).unwrap();
    while t.advance_stage_if_needed().unwrap().is_some() {}
    assert_eq!(t.stage(), Stage::Showdown);

    let summary = t.resolve_showdown();
    assert_eq!(summary.winner, Some(1));
    assert_eq!(summary.pot, 400);
    assert_eq!(summary.description, "a royal flush");
    assert_eq!(t.player(1).unwrap().chips(), 1200);
    assert_eq!(t.player(2).unwrap().chips(), 800);
    assert_eq!(t.pot(), 0);

    let winners: Vec<_> = summary.results.iter().filter(|r| r.won).collect();
    assert_eq!(winners.len(), 1);
    assert_eq!(summary.results.len(), 2);
}

#[test]
fn better_hand_wins_regardless_of_seat() {
    let mut t = table(1000, 2);
    let now = Instant::now();
    t.start_hand_with_deck(stacked_deck("2C 7D KH KD", "KS 9C 4D 8H 3C"), now)
        .unwrap();
    let first = t.current_player().unwrap();
    let second = if first == 1 { 2 } else { 1 };
    t.apply_action(first, PlayerAction::Raise(100), now).unwrap();
    let mut events = t.apply_action(second, PlayerAction::Call, now).unwrap();
    while t.stage() != Stage::Showdown {
        let who = t.current_player().unwrap();
        events = t.apply_action(who, PlayerAction::Call, now).unwrap();
    }
    let summary = events.iter().find_map(TableEvent::summary).unwrap();
    assert_eq!(summary.winner, Some(2));
    assert_eq!(summary.description, "three of a kind (Kings)");
    assert_eq!(t.player(2).unwrap().chips(), 1100);
    assert_eq!(t.player(1).unwrap().chips(), 900);
    assert_eq!(total_chips(&t), 2000);
}

#[test]
fn showdown_summary_names_the_winning_cards() {
    let mut t = table(1000, 3);
    let now = Instant::now();
    t.start_hand_with_deck(
        stacked_deck("2C 7D KH KD 9S 9D", "KS 9C 4D 8H 3C"),
        now,
    )
    .unwrap();
    while t.advance_stage_if_needed().unwrap().is_some() {}
    let summary = t.resolve_showdown();
    assert_eq!(summary.winner, Some(2));
    assert_eq!(summary.winner_name.as_deref(), Some("p2"));
    assert_eq!(summary.description, "three of a kind (Kings)");
    let five = summary.best_five.unwrap();
    assert_eq!(
        five.iter().filter(|c| c.rank as u8 == 13).count(),
        3
    );
    assert_eq!(summary.board.len(), 5);
    let best = holdem_engine::hand::evaluate_best(&five).unwrap();
    assert_eq!(best.strength.category, Category::ThreeOfAKind);
}

#[test]
fn everyone_folded_voids_the_pot() {
    let mut t = table(1000, 2);
    t.start_hand(Instant::now()).unwrap();
    t.raise_bet(1, 30).unwrap();
    t.fold(1).unwrap();
    t.fold(2).unwrap();
    let summary = t.resolve_showdown();
    assert_eq!(summary.winner, None);
    assert_eq!(summary.pot, 30);
    assert!(summary.results.is_empty());
    assert_eq!(t.pot(), 0);
    assert_eq!(t.stage(), Stage::Showdown);
}

#[test]
fn inactive_player_is_folded_and_the_other_wins_by_default() {
    let mut t = table(1000, 2);
    let t0 = Instant::now();
    t.start_hand(t0).unwrap();
    let first = t.current_player().unwrap();
    let idle = if first == 1 { 2 } else { 1 };

    t.apply_action(first, PlayerAction::Raise(60), t0 + Duration::from_secs(200))
        .unwrap();
    let board_before = t.community_cards().len();

    let events = t
        .sweep_inactive(t0 + Duration::from_secs(310), &AfkPolicy::default())
        .unwrap();
    assert_eq!(
        events[0],
        TableEvent::PlayerAutoFolded {
            player_id: idle,
            name: format!("p{idle}"),
        }
    );
    let summary = events.iter().find_map(TableEvent::summary).unwrap();
    assert_eq!(summary.winner, Some(first));
    assert_eq!(summary.pot, 60);
    assert_eq!(
        summary.results,
        t.turn_order()
            .iter()
            .map(|&id| HandResult {
                player_id: id,
                chips_won: if id == first { 60 } else { 0 },
                won: id == first,
            })
            .collect::<Vec<_>>()
    );
    assert_eq!(t.stage(), Stage::Showdown);
    assert_eq!(t.community_cards().len(), board_before);
    assert_eq!(t.player(first).unwrap().chips(), 1000);
}

#[test]
fn default_win_with_an_empty_pot() {
    let mut t = table(1000, 2);
    let t0 = Instant::now();
    t.start_hand(t0).unwrap();
    let first = t.current_player().unwrap();
    // a check closes the preflop round and keeps this player fresh
    t.apply_action(first, PlayerAction::Call, t0 + Duration::from_secs(250))
        .unwrap();
    assert_eq!(t.stage(), Stage::Flop);

    let events = t
        .sweep_inactive(t0 + Duration::from_secs(310), &AfkPolicy::default())
        .unwrap();
    let summary = events.iter().find_map(TableEvent::summary).unwrap();
    assert_eq!(summary.winner, Some(first));
    assert_eq!(summary.pot, 0);
    assert_eq!(summary.description, "uncontested");
    assert_eq!(t.stage(), Stage::Showdown);
    assert_eq!(t.community_cards().len(), 3);
}

#[test]
fn acting_clears_a_pending_warning() {
    let mut t = table(1000, 2);
    let t0 = Instant::now();
    t.start_hand(t0).unwrap();
    let policy = AfkPolicy::default();

    let events = t
        .sweep_inactive(t0 + Duration::from_secs(130), &policy)
        .unwrap();
    assert_eq!(events.len(), 2);
    assert!(t.players().iter().all(|p| p.is_warned()));

    let first = t.current_player().unwrap();
    t.apply_action(first, PlayerAction::Raise(20), t0 + Duration::from_secs(140))
        .unwrap();
    assert!(!t.player(first).unwrap().is_warned());

    // the idle player is not warned twice before being folded
    let events = t
        .sweep_inactive(t0 + Duration::from_secs(200), &policy)
        .unwrap();
    assert!(events.is_empty());
}
