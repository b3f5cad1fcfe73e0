use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use holdem_engine::player::PlayerId;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Corrupt timestamp for player {player}: {value}")]
    BadTimestamp { player: PlayerId, value: String },
}

/// Lifetime results of one player across all tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    pub user_id: PlayerId,
    pub name: String,
    pub total_chips_won: u64,
    pub hands_played: u32,
    pub hands_won: u32,
    pub last_played_at: Option<DateTime<Utc>>,
}

impl PlayerStats {
    fn new(user_id: PlayerId, name: &str) -> Self {
        Self {
            user_id,
            name: name.to_string(),
            total_chips_won: 0,
            hands_played: 0,
            hands_won: 0,
            last_played_at: None,
        }
    }
}

/// Persistence for the leaderboard.
pub trait StatsStore: Send + Sync {
    /// Creates the row if missing, otherwise refreshes the display name.
    fn ensure_player(&self, user_id: PlayerId, name: &str) -> Result<(), StatsError>;
    /// Adds one hand to the player's record.
    fn record_hand_result(
        &self,
        user_id: PlayerId,
        chips_won: u32,
        won: bool,
    ) -> Result<(), StatsError>;
    /// Top players by total chips won.
    fn leaderboard(&self, limit: usize) -> Result<Vec<PlayerStats>, StatsError>;
    fn player(&self, user_id: PlayerId) -> Result<Option<PlayerStats>, StatsError>;
    /// Deletes every row.
    fn reset_stats(&self) -> Result<(), StatsError>;
    /// Zeroes every counter but keeps players and names.
    fn reset_all_stats(&self) -> Result<(), StatsError>;
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS players (
    user_id         INTEGER PRIMARY KEY,
    name            TEXT    NOT NULL,
    total_chips_won INTEGER NOT NULL DEFAULT 0,
    hands_played    INTEGER NOT NULL DEFAULT 0,
    hands_won       INTEGER NOT NULL DEFAULT 0,
    last_played_at  TEXT
);
CREATE INDEX IF NOT EXISTS idx_players_chips ON players(total_chips_won DESC);
";

/// SQLite-backed store. One connection, serialized behind a mutex.
#[derive(Debug)]
pub struct SqliteStatsStore {
    conn: Mutex<Connection>,
}

impl SqliteStatsStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StatsError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StatsError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StatsError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn row_to_stats(row: &rusqlite::Row<'_>) -> rusqlite::Result<(PlayerStats, Option<String>)> {
        let user_id: PlayerId = row.get(0)?;
        let total: i64 = row.get(2)?;
        Ok((
            PlayerStats {
                user_id,
                name: row.get(1)?,
                total_chips_won: u64::try_from(total).unwrap_or(0),
                hands_played: row.get(3)?,
                hands_won: row.get(4)?,
                last_played_at: None,
            },
            row.get(5)?,
        ))
    }

    fn parse_timestamp(
        (mut stats, raw): (PlayerStats, Option<String>),
    ) -> Result<PlayerStats, StatsError> {
        if let Some(raw) = raw {
            let ts = DateTime::parse_from_rfc3339(&raw).map_err(|_| StatsError::BadTimestamp {
                player: stats.user_id,
                value: raw.clone(),
            })?;
            stats.last_played_at = Some(ts.with_timezone(&Utc));
        }
        Ok(stats)
    }
}

const SELECT_COLUMNS: &str =
    "SELECT user_id, name, total_chips_won, hands_played, hands_won, last_played_at FROM players";

impl StatsStore for SqliteStatsStore {
    fn ensure_player(&self, user_id: PlayerId, name: &str) -> Result<(), StatsError> {
        self.conn().execute(
            "INSERT INTO players (user_id, name) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET name = excluded.name",
            params![user_id, name],
        )?;
        Ok(())
    }

    fn record_hand_result(
        &self,
        user_id: PlayerId,
        chips_won: u32,
        won: bool,
    ) -> Result<(), StatsError> {
        let now = Utc::now().to_rfc3339();
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        // rows normally exist already; an unknown id gets a placeholder name
        tx.execute(
            "INSERT OR IGNORE INTO players (user_id, name) VALUES (?1, ?2)",
            params![user_id, user_id.to_string()],
        )?;
        tx.execute(
            "UPDATE players SET total_chips_won = total_chips_won + ?2,
                                hands_played = hands_played + 1,
                                hands_won = hands_won + ?3,
                                last_played_at = ?4
             WHERE user_id = ?1",
            params![user_id, chips_won, u32::from(won), now],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<PlayerStats>, StatsError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY total_chips_won DESC, hands_won DESC, user_id ASC LIMIT ?1"
        ))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], Self::row_to_stats)?;
        let board = rows
            .map(|row| Self::parse_timestamp(row?))
            .collect::<Result<Vec<_>, StatsError>>()?;
        Ok(board)
    }

    fn player(&self, user_id: PlayerId) -> Result<Option<PlayerStats>, StatsError> {
        let conn = self.conn();
        let row = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE user_id = ?1"),
                params![user_id],
                Self::row_to_stats,
            )
            .optional()?;
        row.map(Self::parse_timestamp).transpose()
    }

    fn reset_stats(&self) -> Result<(), StatsError> {
        self.conn().execute("DELETE FROM players", [])?;
        Ok(())
    }

    fn reset_all_stats(&self) -> Result<(), StatsError> {
        self.conn().execute(
            "UPDATE players SET total_chips_won = 0, hands_played = 0, hands_won = 0,
                                last_played_at = NULL",
            [],
        )?;
        Ok(())
    }
}

/// In-process store for tests and throwaway games.
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    rows: Mutex<HashMap<PlayerId, PlayerStats>>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> MutexGuard<'_, HashMap<PlayerId, PlayerStats>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StatsStore for MemoryStatsStore {
    fn ensure_player(&self, user_id: PlayerId, name: &str) -> Result<(), StatsError> {
        self.rows()
            .entry(user_id)
            .and_modify(|s| s.name = name.to_string())
            .or_insert_with(|| PlayerStats::new(user_id, name));
        Ok(())
    }

    fn record_hand_result(
        &self,
        user_id: PlayerId,
        chips_won: u32,
        won: bool,
    ) -> Result<(), StatsError> {
        let mut rows = self.rows();
        let row = rows
            .entry(user_id)
            .or_insert_with(|| PlayerStats::new(user_id, &user_id.to_string()));
        row.total_chips_won += u64::from(chips_won);
        row.hands_played += 1;
        row.hands_won += u32::from(won);
        row.last_played_at = Some(Utc::now());
        Ok(())
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<PlayerStats>, StatsError> {
        let mut all: Vec<PlayerStats> = self.rows().values().cloned().collect();
        all.sort_by(|a, b| {
            b.total_chips_won
                .cmp(&a.total_chips_won)
                .then(b.hands_won.cmp(&a.hands_won))
                .then(a.user_id.cmp(&b.user_id))
        });
        all.truncate(limit);
        Ok(all)
    }

    fn player(&self, user_id: PlayerId) -> Result<Option<PlayerStats>, StatsError> {
        Ok(self.rows().get(&user_id).cloned())
    }

    fn reset_stats(&self) -> Result<(), StatsError> {
        self.rows().clear();
        Ok(())
    }

    fn reset_all_stats(&self) -> Result<(), StatsError> {
        for row in self.rows().values_mut() {
            let name = std::mem::take(&mut row.name);
            *row = PlayerStats::new(row.user_id, &name);
        }
        Ok(())
    }
}
