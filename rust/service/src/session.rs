use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Instant;

use holdem_engine::cards::Card;
use holdem_engine::errors::{ActionError, TableError};
use holdem_engine::events::TableEvent;
use holdem_engine::player::{PlayerAction, PlayerId};
use holdem_engine::table::{Table, TableConfig, TableView};
use serde::{Deserialize, Serialize};

use crate::errors::{log_error, SessionError};
use crate::events::EventBus;
use crate::settings::SettingsStore;
use crate::stats::StatsStore;

/// A chat, or a thread inside a chat. Each key owns at most one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionKey {
    pub chat_id: i64,
    pub thread_id: Option<i64>,
}

impl SessionKey {
    pub fn new(chat_id: i64, thread_id: Option<i64>) -> Self {
        Self { chat_id, thread_id }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.thread_id {
            Some(thread) => write!(f, "{}/{}", self.chat_id, thread),
            None => write!(f, "{}", self.chat_id),
        }
    }
}

/// One table behind its own lock. Actions and watchdog sweeps on the same table are
/// serialized; different tables never contend.
pub type SharedTable = Arc<Mutex<Table>>;

/// Owns every live table, keyed by session, and routes their events to the event bus and
/// their hand results to the stats store.
pub struct SessionManager {
    tables: RwLock<HashMap<SessionKey, SharedTable>>,
    event_bus: Arc<EventBus>,
    stats: Arc<dyn StatsStore>,
    settings: Arc<SettingsStore>,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("tables", &self.active_sessions().len())
            .finish_non_exhaustive()
    }
}

fn lock(table: &SharedTable) -> MutexGuard<'_, Table> {
    // a poisoned lock is recovered and the table reused as is
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionManager {
    pub fn new(
        event_bus: Arc<EventBus>,
        stats: Arc<dyn StatsStore>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            event_bus,
            stats,
            settings,
        }
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    pub fn stats(&self) -> Arc<dyn StatsStore> {
        Arc::clone(&self.stats)
    }

    pub fn settings(&self) -> Arc<SettingsStore> {
        Arc::clone(&self.settings)
    }

    /// The table for `key`, created from the current settings on first reference.
    pub fn get_or_create(&self, key: SessionKey, host: PlayerId) -> Result<SharedTable, SessionError> {
        if let Ok(table) = self.table(&key) {
            return Ok(table);
        }
        let mut guard = self
            .tables
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?;
        let table = guard.entry(key).or_insert_with(|| {
            let config = self.settings.get().table;
            tracing::info!(
                session = %key,
                host_id = host,
                starting_chips = config.starting_chips,
                max_hands = config.max_hands,
                max_players = config.max_players,
                "creating table"
            );
            let mut table = Table::new(config);
            table.set_host(host);
            Arc::new(Mutex::new(table))
        });
        Ok(Arc::clone(table))
    }

    pub fn table(&self, key: &SessionKey) -> Result<SharedTable, SessionError> {
        let guard = self
            .tables
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(key)
            .cloned()
            .ok_or(SessionError::NotFound(*key))
    }

    pub fn active_sessions(&self) -> Vec<SessionKey> {
        match self.tables.read() {
            Ok(guard) => guard.keys().copied().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Runs `op` on the table under its lock, then publishes whatever it produced.
    fn with_table<F>(&self, key: &SessionKey, op: F) -> Result<Vec<TableEvent>, SessionError>
    where
        F: FnOnce(&mut Table) -> Result<Vec<TableEvent>, TableError>,
    {
        let shared = self.table(key)?;
        let events = {
            let mut table = lock(&shared);
            op(&mut table)
        }
        .map_err(SessionError::from)
        .inspect_err(|err| log_error(key, err))?;
        self.dispatch(key, &events);
        Ok(events)
    }

    /// Seats a player, creating the table if needed. The first joiner becomes host.
    pub fn join(&self, key: SessionKey, player_id: PlayerId, name: &str) -> Result<(), SessionError> {
        let shared = self.get_or_create(key, player_id)?;
        lock(&shared)
            .add_player(player_id, name)
            .map_err(SessionError::from)
            .inspect_err(|err| log_error(&key, err))?;
        if let Err(err) = self.stats.ensure_player(player_id, name) {
            log_error(&key, &err.into());
        }
        tracing::info!(session = %key, player_id, name, "player joined");
        Ok(())
    }

    /// Unseats a player; any chips they bet this hand stay in the pot. Removing a player
    /// can complete a hand in progress, so the usual street logic is applied.
    pub fn leave(&self, key: &SessionKey, player_id: PlayerId) -> Result<Vec<TableEvent>, SessionError> {
        let events = self.with_table(key, |table| table.leave(player_id))?;
        tracing::info!(session = %key, player_id, "player left");
        Ok(events)
    }

    fn ensure_host(key: &SessionKey, table: &Table, actor: PlayerId) -> Result<(), SessionError> {
        if table.host_id() == Some(actor) {
            return Ok(());
        }
        let err = SessionError::NotHost { actor };
        log_error(key, &err);
        Err(err)
    }

    /// Replaces the table setup. Host only, and refused while a hand is running.
    pub fn configure(
        &self,
        key: &SessionKey,
        actor: PlayerId,
        config: TableConfig,
    ) -> Result<(), SessionError> {
        Self::ensure_host(key, &lock(&self.table(key)?), actor)?;
        self.with_table(key, |table| table.reconfigure(config).map(|()| Vec::new()))?;
        tracing::info!(session = %key, actor, "table reconfigured");
        Ok(())
    }

    /// Zeroes the hand counter so a finished match can be played again. Host only.
    pub fn restart_match(&self, key: &SessionKey, actor: PlayerId) -> Result<(), SessionError> {
        Self::ensure_host(key, &lock(&self.table(key)?), actor)?;
        self.with_table(key, |table| table.restart_match().map(|()| Vec::new()))?;
        tracing::info!(session = %key, actor, "match restarted");
        Ok(())
    }

    pub fn start_hand(&self, key: &SessionKey, now: Instant) -> Result<Vec<TableEvent>, SessionError> {
        let events = self.with_table(key, |table| table.start_hand(now))?;
        tracing::info!(session = %key, "hand started");
        Ok(events)
    }

    pub fn apply_action(
        &self,
        key: &SessionKey,
        player_id: PlayerId,
        action: PlayerAction,
        now: Instant,
    ) -> Result<Vec<TableEvent>, SessionError> {
        tracing::debug!(session = %key, player_id, action = ?action, "applying action");
        self.with_table(key, |table| table.apply_action(player_id, action, now))
    }

    pub fn snapshot(&self, key: &SessionKey) -> Result<TableView, SessionError> {
        let shared = self.table(key)?;
        let view = lock(&shared).snapshot();
        Ok(view)
    }

    /// A player's private cards for the running hand, for delivery outside the group chat.
    pub fn hole_cards(
        &self,
        key: &SessionKey,
        player_id: PlayerId,
    ) -> Result<Option<[Card; 2]>, SessionError> {
        let shared = self.table(key)?;
        let table = lock(&shared);
        let player = table
            .player(player_id)
            .ok_or(ActionError::NotSeated(player_id))?;
        Ok(player.hole_cards())
    }

    /// Discards one table. Host only. Returns whether there was one.
    pub fn reset(&self, key: &SessionKey, actor: PlayerId) -> Result<bool, SessionError> {
        let removed = {
            let mut guard = self
                .tables
                .write()
                .map_err(|_| SessionError::StoragePoisoned)?;
            if let Some(shared) = guard.get(key) {
                Self::ensure_host(key, &lock(shared), actor)?;
            }
            guard.remove(key)
        };
        self.event_bus.drop_session(key);
        if removed.is_some() {
            tracing::info!(session = %key, "table reset");
        }
        Ok(removed.is_some())
    }

    /// Discards every table and zeroes all player statistics.
    pub fn full_reset(&self) -> Result<usize, SessionError> {
        let drained: Vec<SessionKey> = {
            let mut guard = self
                .tables
                .write()
                .map_err(|_| SessionError::StoragePoisoned)?;
            guard.drain().map(|(key, _)| key).collect()
        };
        for key in &drained {
            self.event_bus.drop_session(key);
        }
        self.stats.reset_all_stats()?;
        tracing::warn!(tables = drained.len(), "full reset");
        Ok(drained.len())
    }

    /// One watchdog pass over every table. A failing table is logged and skipped.
    /// Returns the number of events produced.
    pub fn tick(&self, now: Instant) -> usize {
        let policy = self.settings.get().watchdog.policy();
        let tables: Vec<(SessionKey, SharedTable)> = match self.tables.read() {
            Ok(guard) => guard.iter().map(|(k, t)| (*k, Arc::clone(t))).collect(),
            Err(_) => {
                tracing::error!("session storage poisoned, skipping watchdog tick");
                return 0;
            }
        };

        let mut produced = 0;
        for (key, shared) in tables {
            let swept = lock(&shared).sweep_inactive(now, &policy);
            match swept {
                Ok(events) => {
                    for event in &events {
                        match event {
                            TableEvent::PlayerWarned { player_id, .. } => {
                                tracing::info!(session = %key, player_id, "inactivity warning")
                            }
                            TableEvent::PlayerAutoFolded { player_id, .. } => {
                                tracing::info!(session = %key, player_id, "folded for inactivity")
                            }
                            _ => {}
                        }
                    }
                    produced += events.len();
                    self.dispatch(&key, &events);
                }
                Err(err) => log_error(&key, &err.into()),
            }
        }
        produced
    }

    /// Publishes events and records finished hands. Store failures are logged only.
    fn dispatch(&self, key: &SessionKey, events: &[TableEvent]) {
        for event in events {
            if let Some(summary) = event.summary() {
                tracing::info!(
                    session = %key,
                    hand_number = summary.hand_number,
                    winner = ?summary.winner,
                    pot = summary.pot,
                    description = %summary.description,
                    "hand complete"
                );
                for result in &summary.results {
                    if let Err(err) =
                        self.stats
                            .record_hand_result(result.player_id, result.chips_won, result.won)
                    {
                        log_error(key, &err.into());
                    }
                }
            }
            self.event_bus.publish(key, event.clone());
        }
    }
}
