//! # holdem CLI Library
//!
//! Command-line front end for the Hold'em table engine: hot-seat play on one terminal,
//! hand evaluation, and the persistent leaderboard.
//!
//! ## Example Usage
//!
//! ```
//! use std::io;
//! let args = vec!["holdem", "eval", "AH KH QH JH 10H"];
//! let code = holdem_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Hot-seat hands, actions read from stdin
//! - `eval`: Best five-card hand out of five to seven cards
//! - `leaderboard`: Lifetime results from the stats database
//! - `reset-stats`: Zero (or `--purge`) every player's statistics
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::Write;
use std::sync::Arc;

pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod ui;

use cli::{Commands, HoldemCli};
use commands::{
    PlayOptions, handle_cfg_command, handle_eval_command, handle_leaderboard_command,
    handle_play_command, handle_reset_stats_command,
};
use holdem_service::SqliteStatsStore;

pub use error::CliError;

const COMMANDS: &[&str] = &["play", "eval", "leaderboard", "reset-stats", "cfg"];

/// Parses `args` and runs the subcommand, writing to `out` and `err`.
///
/// Returns the process exit code: `0` on success, `2` on errors, `130` when input ends in
/// the middle of a hand.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match HoldemCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    match execute(cli.cmd, out, err) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            e.exit_code()
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }

    let _ = writeln!(err, "{}", e);
    let _ = writeln!(err, "Usage: holdem <command> [options]\n\nCommands:");
    for c in COMMANDS {
        let _ = writeln!(err, "  {}", c);
    }
    let _ = writeln!(err, "\nFor full help, run: holdem --help");
    exit_code::ERROR
}

fn execute(cmd: Commands, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    match cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Eval { cards } => handle_eval_command(&cards, out),
        Commands::Play {
            players,
            hands,
            seed,
        } => {
            let config = config::load()?;
            let mut table = config.table();
            if seed.is_some() {
                table.seed = seed;
            }
            let store = SqliteStatsStore::open(&config.db_path)?;
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_play_command(
                PlayOptions {
                    players,
                    hands,
                    table,
                },
                Arc::new(store),
                &mut stdin_lock,
                out,
                err,
            )
        }
        Commands::Leaderboard { limit, json } => {
            let config = config::load()?;
            let store = SqliteStatsStore::open(&config.db_path)?;
            handle_leaderboard_command(&store, limit, json, out)
        }
        Commands::ResetStats { purge } => {
            let config = config::load()?;
            let store = SqliteStatsStore::open(&config.db_path)?;
            handle_reset_stats_command(&store, purge, out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(args.iter().copied(), &mut out, &mut err);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn help_goes_to_stdout() {
        let (code, out, err) = run_args(&["holdem", "--help"]);
        assert_eq!(code, exit_code::SUCCESS);
        assert!(out.contains("leaderboard"));
        assert!(err.is_empty());
    }

    #[test]
    fn unknown_command_lists_commands() {
        let (code, _, err) = run_args(&["holdem", "deal"]);
        assert_eq!(code, exit_code::ERROR);
        for c in COMMANDS {
            assert!(err.contains(c), "missing {c} in {err}");
        }
    }

    #[test]
    fn eval_errors_exit_with_two() {
        let (code, out, err) = run_args(&["holdem", "eval", "AS KS"]);
        assert_eq!(code, exit_code::ERROR);
        assert!(out.is_empty());
        assert!(err.starts_with("Error: Invalid input"));
    }
}
