//! Session layer around `holdem-engine`: one table per chat or thread, event fan-out,
//! persistent leaderboard statistics and the periodic inactivity watchdog.
//!
//! The engine stays synchronous. This crate owns the locks, the SQLite store and the
//! tokio task that drives [`SessionManager::tick`].

pub mod errors;
pub mod events;
pub mod logging;
pub mod session;
pub mod settings;
pub mod stats;
pub mod watchdog;

pub use errors::{log_error, ErrorSeverity, SessionError};
pub use events::{EventBus, EventSubscription, SessionEvent};
pub use logging::{init_logging, init_test_logging, LogEntry, LogFormat, TestLogSubscriber};
pub use session::{SessionKey, SessionManager, SharedTable};
pub use settings::{ServiceSettings, SettingsError, SettingsStore, WatchdogSettings};
pub use stats::{MemoryStatsStore, PlayerStats, SqliteStatsStore, StatsError, StatsStore};
pub use watchdog::{spawn_watchdog, WatchdogHandle};
