//! Leaderboard and stats reset handlers.

use std::io::Write;

use holdem_service::StatsStore;

use crate::error::CliError;

pub fn handle_leaderboard_command(
    store: &dyn StatsStore,
    limit: usize,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let board = store.leaderboard(limit)?;
    if json {
        let text = serde_json::to_string_pretty(&board).map_err(std::io::Error::other)?;
        writeln!(out, "{}", text)?;
        return Ok(());
    }
    if board.is_empty() {
        writeln!(out, "No hands recorded yet.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:>3}  {:<16} {:>10} {:>6} {:>5}",
        "#", "player", "chips won", "hands", "wins"
    )?;
    for (rank, p) in board.iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<16} {:>10} {:>6} {:>5}",
            rank + 1,
            p.name,
            p.total_chips_won,
            p.hands_played,
            p.hands_won
        )?;
    }
    Ok(())
}

/// Zeroes counters, or with `purge` deletes every player row.
pub fn handle_reset_stats_command(
    store: &dyn StatsStore,
    purge: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if purge {
        store.reset_stats()?;
        writeln!(out, "All player statistics deleted.")?;
    } else {
        store.reset_all_stats()?;
        writeln!(out, "All player statistics reset to zero.")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_service::MemoryStatsStore;

    fn seeded() -> MemoryStatsStore {
        let store = MemoryStatsStore::new();
        store.ensure_player(1, "ann").unwrap();
        store.ensure_player(2, "bob").unwrap();
        store.record_hand_result(1, 0, false).unwrap();
        store.record_hand_result(2, 250, true).unwrap();
        store
    }

    #[test]
    fn table_lists_richest_first() {
        let store = seeded();
        let mut out = Vec::new();
        handle_leaderboard_command(&store, 10, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("bob") && lines[1].contains("250"));
        assert!(lines[2].contains("ann"));
    }

    #[test]
    fn json_output_parses() {
        let store = seeded();
        let mut out = Vec::new();
        handle_leaderboard_command(&store, 1, true, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(1));
        assert_eq!(json[0]["name"], "bob");
        assert_eq!(json[0]["total_chips_won"], 250);
    }

    #[test]
    fn reset_keeps_names_and_purge_drops_them() {
        let store = seeded();
        let mut out = Vec::new();
        handle_reset_stats_command(&store, false, &mut out).unwrap();
        assert_eq!(store.player(2).unwrap().unwrap().total_chips_won, 0);

        handle_reset_stats_command(&store, true, &mut out).unwrap();
        assert!(store.player(2).unwrap().is_none());

        let mut board = Vec::new();
        handle_leaderboard_command(&store, 10, false, &mut board).unwrap();
        assert_eq!(String::from_utf8(board).unwrap(), "No hands recorded yet.\n");
    }
}
