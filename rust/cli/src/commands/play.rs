//! # Play Command
//!
//! Hot-seat play at a single table: every seated player types their own actions on the
//! same terminal. The table runs through the session layer, so finished hands are
//! recorded in the leaderboard store exactly as a chat front end would record them.
//!
//! Input at the prompt:
//!
//! - `fold`, `check`, `call`, `raise 50`, `all-in` (and their short forms)
//! - `t` / `table` shows the table, `?` / `help` lists the actions
//! - `q` / `quit` leaves; an unfinished hand is abandoned and not recorded

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use holdem_engine::errors::TableError;
use holdem_engine::events::TableEvent;
use holdem_engine::player::PlayerId;
use holdem_engine::rules::parse_action;
use holdem_engine::stage::Stage;
use holdem_engine::table::TableConfig;
use holdem_service::{
    EventBus, ServiceSettings, SessionError, SessionKey, SessionManager, SettingsStore,
    StatsStore,
};

use crate::error::CliError;
use crate::formatters::{format_board, format_event, format_view};
use crate::ui;

// hot-seat play is a single local table
const LOCAL_TABLE: SessionKey = SessionKey {
    chat_id: 0,
    thread_id: None,
};

const HELP: &str = "actions: fold | check | call | raise <amount> | all-in    other: table, help, quit";

#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub players: Vec<String>,
    pub hands: Option<u32>,
    pub table: TableConfig,
}

enum HandOutcome {
    Finished,
    Quit,
}

/// Runs hands until the hand limit, a player holding every chip, the table's match limit
/// or `quit`.
pub fn handle_play_command(
    options: PlayOptions,
    stats: Arc<dyn StatsStore>,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let PlayOptions {
        players,
        hands,
        mut table,
    } = options;
    if players.iter().any(|name| name.trim().is_empty()) {
        return Err(CliError::InvalidInput("player names must not be empty".into()));
    }
    // a lone player never loses their chips, so cap the session
    let hands = match (hands, players.len()) {
        (None, 1) => Some(1),
        (limit, _) => limit,
    };

    let seed = *table.seed.get_or_insert_with(rand::random);
    writeln!(out, "seed: {seed}")?;

    let settings = SettingsStore::with_settings(ServiceSettings {
        table,
        ..ServiceSettings::default()
    })
    .map_err(|e| CliError::Config(e.to_string()))?;
    let sessions = SessionManager::new(Arc::new(EventBus::new()), stats, Arc::new(settings));

    for (seat, name) in players.iter().enumerate() {
        sessions.join(LOCAL_TABLE, seat as PlayerId + 1, name.trim())?;
    }

    let mut played = 0u32;
    loop {
        if let Some(limit) = hands
            && played >= limit
        {
            break;
        }
        let view = sessions.snapshot(&LOCAL_TABLE)?;
        if players.len() > 1 && view.players.iter().filter(|p| p.chips > 0).count() < 2 {
            writeln!(out, "Only one player has chips left.")?;
            break;
        }

        let events = match sessions.start_hand(&LOCAL_TABLE, Instant::now()) {
            Err(SessionError::Table(TableError::MatchFinished { played })) => {
                writeln!(out, "Match finished after {played} hands.")?;
                break;
            }
            other => other?,
        };
        render(&sessions, &events, out)?;

        match play_hand(&sessions, stdin, out, err)? {
            HandOutcome::Finished => played += 1,
            HandOutcome::Quit => break,
        }
    }

    writeln!(out, "Final stacks:")?;
    let mut standings = sessions.snapshot(&LOCAL_TABLE)?.players;
    standings.sort_by(|a, b| b.chips.cmp(&a.chips));
    for p in standings {
        writeln!(out, "  {:<12} {:>6}", p.name, p.chips)?;
    }
    Ok(())
}

fn play_hand(
    sessions: &SessionManager,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<HandOutcome, CliError> {
    loop {
        let view = sessions.snapshot(&LOCAL_TABLE)?;
        if view.stage == Stage::Showdown {
            return Ok(HandOutcome::Finished);
        }
        let Some(actor) = view.current_player else {
            return Err(CliError::InvalidInput(
                "hand is running but nobody can act".into(),
            ));
        };
        let name = view
            .players
            .iter()
            .find(|p| p.id == actor)
            .map_or("?", |p| p.name.as_str());
        let label = match sessions.hole_cards(&LOCAL_TABLE, actor)? {
            Some(cards) => format!("{name} {}", format_board(&cards)),
            None => name.to_string(),
        };

        let Some(line) = ui::prompt(out, stdin, &label)? else {
            return Err(CliError::Interrupted("input closed mid-hand".into()));
        };
        match line.to_ascii_lowercase().as_str() {
            "" => continue,
            "q" | "quit" => return Ok(HandOutcome::Quit),
            "?" | "help" => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            "t" | "table" => {
                writeln!(out, "{}", format_view(&view))?;
                continue;
            }
            _ => {}
        }

        let action = match parse_action(&line) {
            Ok(action) => action,
            Err(e) => {
                ui::write_error(err, &e.to_string())?;
                continue;
            }
        };
        match sessions.apply_action(&LOCAL_TABLE, actor, action, Instant::now()) {
            Ok(events) => render(sessions, &events, out)?,
            Err(e) => ui::write_error(err, &e.to_string())?,
        }
    }
}

fn render(
    sessions: &SessionManager,
    events: &[TableEvent],
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let view = sessions.snapshot(&LOCAL_TABLE)?;
    for event in events {
        // the prompt already names the next player
        if matches!(event, TableEvent::TurnPassed { .. }) {
            continue;
        }
        writeln!(out, "{}", format_event(event, &view))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_service::MemoryStatsStore;

    fn options(players: &[&str], hands: Option<u32>) -> PlayOptions {
        PlayOptions {
            players: players.iter().map(|s| s.to_string()).collect(),
            hands,
            table: TableConfig {
                seed: Some(21),
                ..TableConfig::default()
            },
        }
    }

    fn run(opts: PlayOptions, input: &str) -> (Result<(), CliError>, String, String, Arc<MemoryStatsStore>) {
        let stats = Arc::new(MemoryStatsStore::new());
        let mut stdin = input.as_bytes();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = handle_play_command(opts, stats.clone(), &mut stdin, &mut out, &mut err);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
            stats,
        )
    }

    #[test]
    fn fold_ends_a_heads_up_hand() {
        let (result, out, err, stats) = run(options(&["ann", "bob"], Some(1)), "fold\n");
        assert!(result.is_ok(), "{err}");
        assert!(out.contains("seed: 21"));
        assert!(out.contains("folds"));
        assert!(out.contains("Hand #1:"));
        assert!(out.contains("Final stacks:"));
        let board = stats.leaderboard(10).unwrap();
        assert_eq!(board.iter().map(|p| p.hands_played).sum::<u32>(), 2);
        assert_eq!(board.iter().filter(|p| p.hands_won == 1).count(), 1);
    }

    #[test]
    fn bad_input_is_reported_and_reprompted() {
        let (result, out, err, _) = run(
            options(&["ann", "bob"], Some(1)),
            "dance\nraise zero\n\nhelp\nfold\n",
        );
        assert!(result.is_ok());
        assert!(err.contains("Unknown action"));
        assert!(err.contains("Invalid raise amount"));
        assert!(out.contains("actions: fold"));
    }

    #[test]
    fn quitting_skips_recording() {
        let (result, out, _, stats) = run(options(&["ann", "bob"], None), "q\n");
        assert!(result.is_ok());
        assert!(out.contains("Final stacks:"));
        assert!(stats
            .leaderboard(10)
            .unwrap()
            .iter()
            .all(|p| p.hands_played == 0));
    }

    #[test]
    fn eof_mid_hand_is_an_interruption() {
        let (result, _, _, _) = run(options(&["ann", "bob"], Some(1)), "");
        assert!(matches!(result, Err(CliError::Interrupted(_))));
    }

    #[test]
    fn solo_table_plays_a_single_hand() {
        let (result, out, _, stats) = run(options(&["ann"], None), "check\n");
        assert!(result.is_ok());
        assert!(out.contains("ann wins 0 (uncontested)"));
        assert_eq!(stats.player(1).unwrap().unwrap().hands_won, 1);
    }

    #[test]
    fn empty_names_are_rejected() {
        let (result, _, _, _) = run(options(&["ann", " "], None), "");
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
