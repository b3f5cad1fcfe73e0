//! Card, board, table and event formatters for terminal display.
//!
//! Cards use Unicode suit symbols where the terminal is known to render them and plain
//! letters otherwise.
//!
//! ```rust
//! use holdem_engine::cards::{Card, Rank, Suit};
//! use holdem_cli::formatters::{format_board, format_card};
//!
//! let ace_spades = Card::new(Rank::Ace, Suit::Spades);
//! assert!(format_card(&ace_spades) == "A♠" || format_card(&ace_spades) == "As");
//! assert!(format_board(&[ace_spades]).starts_with("[A"));
//! ```

use holdem_engine::cards::{Card, Rank, Suit};
use holdem_engine::events::{HandSummary, TableEvent};
use holdem_engine::player::PlayerId;
use holdem_engine::stage::Stage;
use holdem_engine::table::TableView;

/// Windows consoles only render suit symbols inside modern terminals.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_suit(suit: &Suit) -> String {
    if supports_unicode() {
        match suit {
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
            Suit::Spades => "♠",
        }
        .to_string()
    } else {
        match suit {
            Suit::Hearts => "h",
            Suit::Diamonds => "d",
            Suit::Clubs => "c",
            Suit::Spades => "s",
        }
        .to_string()
    }
}

/// Single character rank (2-9, T, J, Q, K, A).
pub fn format_rank(rank: &Rank) -> String {
    match rank {
        Rank::Two => "2",
        Rank::Three => "3",
        Rank::Four => "4",
        Rank::Five => "5",
        Rank::Six => "6",
        Rank::Seven => "7",
        Rank::Eight => "8",
        Rank::Nine => "9",
        Rank::Ten => "T",
        Rank::Jack => "J",
        Rank::Queen => "Q",
        Rank::King => "K",
        Rank::Ace => "A",
    }
    .to_string()
}

pub fn format_card(card: &Card) -> String {
    format!("{}{}", format_rank(&card.rank), format_suit(&card.suit))
}

/// Bracketed card list, `[]` when empty.
pub fn format_board(cards: &[Card]) -> String {
    let formatted_cards: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", formatted_cards.join(" "))
}

pub fn format_stage(stage: Stage) -> &'static str {
    match stage {
        Stage::Waiting => "waiting",
        Stage::Preflop => "preflop",
        Stage::Flop => "flop",
        Stage::Turn => "turn",
        Stage::River => "river",
        Stage::Showdown => "showdown",
    }
}

fn name_of(view: &TableView, id: PlayerId) -> String {
    view.players
        .iter()
        .find(|p| p.id == id)
        .map_or_else(|| format!("player {id}"), |p| p.name.clone())
}

/// Multi-line table status: stage, board, pot and one line per seat.
pub fn format_view(view: &TableView) -> String {
    let mut lines = vec![format!(
        "{} {} pot {} (to call {})",
        format_stage(view.stage),
        format_board(&view.board),
        view.pot,
        view.current_bet
    )];
    for p in &view.players {
        let marker = if view.current_player == Some(p.id) {
            "*"
        } else {
            " "
        };
        let state = if p.folded { " folded" } else { "" };
        lines.push(format!(
            "{marker} {:<12} {:>6} chips  bet {}{state}",
            p.name, p.chips, p.bet
        ));
    }
    lines.join("\n")
}

fn format_summary(summary: &HandSummary) -> String {
    let number = summary.hand_number;
    match (&summary.winner_name, &summary.best_five) {
        (Some(name), Some(cards)) => format!(
            "Hand #{number}: {name} wins {} with {} {}",
            summary.pot,
            summary.description,
            format_board(cards)
        ),
        (Some(name), None) => format!(
            "Hand #{number}: {name} wins {} ({})",
            summary.pot, summary.description
        ),
        (None, _) => format!("Hand #{number}: nobody left, {} chips void", summary.pot),
    }
}

/// One line per event. `view` supplies display names for events that only carry ids.
pub fn format_event(event: &TableEvent, view: &TableView) -> String {
    match event {
        TableEvent::HandStarted {
            hand_number,
            first_to_act,
        } => match first_to_act {
            Some(id) => format!(
                "Hand #{hand_number} dealt, {} acts first",
                name_of(view, *id)
            ),
            None => format!("Hand #{hand_number} dealt"),
        },
        TableEvent::StageChanged {
            stage,
            community_cards,
        } => format!(
            "-- {} {}",
            format_stage(*stage),
            format_board(community_cards)
        ),
        TableEvent::ActionApplied {
            name,
            action,
            amount,
            ..
        } => {
            if *amount > 0 {
                format!("{name} {action} ({amount})")
            } else {
                format!("{name} {action}")
            }
        }
        TableEvent::TurnPassed { player_id } => {
            format!("{} to act", name_of(view, *player_id))
        }
        TableEvent::PlayerWarned { name, .. } => format!("{name}, the table is waiting on you"),
        TableEvent::PlayerAutoFolded { name, .. } => format!("{name} was folded for inactivity"),
        TableEvent::HandComplete(summary) => format_summary(summary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_engine::cards::parse_cards;
    use holdem_engine::events::ActionTaken;
    use holdem_engine::table::PlayerView;

    fn view() -> TableView {
        TableView {
            stage: Stage::Flop,
            pot: 120,
            current_bet: 40,
            board: parse_cards("AS KH 2C").unwrap(),
            current_player: Some(2),
            hands_played: 3,
            max_hands: 0,
            players: vec![
                PlayerView {
                    id: 1,
                    name: "ann".into(),
                    chips: 940,
                    bet: 40,
                    folded: false,
                },
                PlayerView {
                    id: 2,
                    name: "bob".into(),
                    chips: 940,
                    bet: 0,
                    folded: false,
                },
            ],
        }
    }

    #[test]
    fn test_format_rank() {
        assert_eq!(format_rank(&Rank::Two), "2");
        assert_eq!(format_rank(&Rank::Ten), "T");
        assert_eq!(format_rank(&Rank::Ace), "A");
    }

    #[test]
    fn test_format_card_unicode_or_ascii() {
        let formatted = format_card(&Card::new(Rank::Queen, Suit::Hearts));
        assert!(formatted == "Q♥" || formatted == "Qh");
    }

    #[test]
    fn test_format_board_empty() {
        assert_eq!(format_board(&[]), "[]");
    }

    #[test]
    fn view_marks_the_player_to_act() {
        let text = format_view(&view());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("flop [A"));
        assert!(lines[0].ends_with("pot 120 (to call 40)"));
        assert!(lines[2].starts_with("* bob"));
        assert!(lines[1].starts_with("  ann"));
    }

    #[test]
    fn events_use_names_from_the_view() {
        let v = view();
        assert_eq!(
            format_event(&TableEvent::TurnPassed { player_id: 2 }, &v),
            "bob to act"
        );
        assert_eq!(
            format_event(&TableEvent::TurnPassed { player_id: 9 }, &v),
            "player 9 to act"
        );
        let raise = TableEvent::ActionApplied {
            player_id: 1,
            name: "ann".into(),
            action: ActionTaken::Raise,
            amount: 40,
        };
        assert_eq!(format_event(&raise, &v), "ann raises (40)");
    }

    #[test]
    fn void_pot_summary() {
        let summary = HandSummary {
            hand_number: 4,
            winner: None,
            winner_name: None,
            pot: 60,
            description: "pot void".into(),
            best_five: None,
            board: Vec::new(),
            results: Vec::new(),
        };
        assert_eq!(
            format_event(&TableEvent::HandComplete(summary), &view()),
            "Hand #4: nobody left, 60 chips void"
        );
    }
}
