//! # holdem-engine: Texas Hold'em Table Core
//!
//! A multi-player Texas Hold'em table engine: dealing, per-hand betting, street
//! progression, 7-card evaluation, showdown settlement and an inactivity watchdog.
//! Every operation is synchronous and I/O-free; callers receive [`events::TableEvent`]s
//! describing what happened and forward them wherever they need to go.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and short-code parsing
//! - [`deck`] - Exhaustible deck with seedable ChaCha20 shuffling
//! - [`player`] - Player state, actions and stack bookkeeping
//! - [`stage`] - Street state machine and its transition table
//! - [`table`] - Table state and betting mutators
//! - [`engine`] - Hand orchestration (`start_hand`, `apply_action`)
//! - [`turn`] - Turn manager
//! - [`hand`] - Hand evaluation and strength comparison
//! - [`showdown`] - Pot settlement
//! - [`watchdog`] - AFK sweep
//! - [`rules`] - Input parsing for actions and raise amounts
//! - [`events`] - Outbound notifications and hand results
//! - [`errors`] - Error types for table operations
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::cards::parse_cards;
//! use holdem_engine::hand::{evaluate_holdem, Category};
//!
//! let hole = parse_cards("AH 2D").unwrap();
//! let board = parse_cards("3C 4S 5H 9D KC").unwrap();
//!
//! let best = evaluate_holdem([hole[0], hole[1]], &board).unwrap();
//! assert_eq!(best.strength.category, Category::Straight);
//! assert_eq!(best.strength.kickers[0], 5);
//! ```
//!
//! ## Deterministic Play
//!
//! Tables seeded through [`table::TableConfig::seed`] replay the same decks and the same
//! turn orders:
//!
//! ```rust
//! use holdem_engine::deck::Deck;
//!
//! let mut a = Deck::new_with_seed(42);
//! let mut b = Deck::new_with_seed(42);
//! assert_eq!(a.deal_card(), b.deal_card());
//! ```

pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod events;
pub mod hand;
pub mod player;
pub mod rules;
pub mod showdown;
pub mod stage;
pub mod table;
pub mod turn;
pub mod watchdog;
