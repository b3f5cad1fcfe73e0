//! Command handler modules for the holdem CLI.
//!
//! Each command lives in its own file and exposes one `handle_*_command` function.
//! Streams and stores are passed in so handlers run the same against a terminal, a
//! SQLite file or in-memory test doubles.

mod cfg;
mod eval;
mod play;
mod stats;

pub use cfg::handle_cfg_command;
pub use eval::handle_eval_command;
pub use play::{PlayOptions, handle_play_command};
pub use stats::{handle_leaderboard_command, handle_reset_stats_command};
