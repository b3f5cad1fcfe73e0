use std::sync::Arc;
use std::time::{Duration, Instant};

use holdem_engine::events::TableEvent;
use holdem_engine::player::PlayerAction;
use holdem_service::{
    spawn_watchdog, EventBus, MemoryStatsStore, ServiceSettings, SessionKey, SessionManager,
    SettingsStore, StatsStore, WatchdogSettings,
};
use tokio::task::JoinSet;
use tokio::time::timeout;

fn fast_settings() -> Arc<SettingsStore> {
    let settings = ServiceSettings {
        watchdog: WatchdogSettings {
            tick_interval_secs: 1,
            warn_after_secs: 0,
            fold_after_secs: 1,
        },
        ..ServiceSettings::default()
    };
    Arc::new(SettingsStore::with_settings(settings).expect("valid settings"))
}

#[tokio::test]
async fn watchdog_task_folds_idle_players() {
    let stats = Arc::new(MemoryStatsStore::new());
    let sessions = Arc::new(SessionManager::new(
        Arc::new(EventBus::new()),
        stats.clone(),
        fast_settings(),
    ));
    let key = SessionKey::new(42, None);
    sessions.join(key, 1, "ann").unwrap();
    sessions.join(key, 2, "bob").unwrap();
    let mut sub = sessions.event_bus().subscribe(key);
    sessions.start_hand(&key, Instant::now()).unwrap();

    let handle = spawn_watchdog(Arc::clone(&sessions), Duration::from_millis(25));

    let mut warned = 0;
    let summary = timeout(Duration::from_secs(5), async {
        loop {
            let ev = sub.receiver.recv().await.expect("bus open");
            match ev.event {
                TableEvent::PlayerWarned { .. } => warned += 1,
                TableEvent::HandComplete(summary) => break summary,
                _ => {}
            }
        }
    })
    .await
    .expect("watchdog settled the hand");

    // both players went idle together, nobody is left to take the pot
    assert_eq!(warned, 2);
    assert_eq!(summary.winner, None);
    assert!(summary.results.is_empty());
    assert!(stats.leaderboard(10).unwrap().iter().all(|p| p.hands_played == 0));

    assert!(handle.shutdown().await >= 1);
}

#[tokio::test]
async fn shutdown_stops_ticking() {
    let sessions = Arc::new(SessionManager::new(
        Arc::new(EventBus::new()),
        Arc::new(MemoryStatsStore::new()),
        Arc::new(SettingsStore::new()),
    ));
    let handle = spawn_watchdog(Arc::clone(&sessions), Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(60)).await;
    let ticks = handle.shutdown().await;
    assert!(ticks >= 1);
    assert_eq!(Arc::strong_count(&sessions), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn tables_play_concurrently_without_interference() {
    let stats = Arc::new(MemoryStatsStore::new());
    let sessions = Arc::new(SessionManager::new(
        Arc::new(EventBus::new()),
        stats.clone(),
        Arc::new(SettingsStore::new()),
    ));
    let table_count: i64 = 8;

    let mut join_set = JoinSet::new();
    for chat in 0..table_count {
        let sessions = Arc::clone(&sessions);
        join_set.spawn(async move {
            let key = SessionKey::new(chat, None);
            let (a, b) = (chat * 2 + 1, chat * 2 + 2);
            sessions.join(key, a, "a").expect("join a");
            sessions.join(key, b, "b").expect("join b");
            let now = Instant::now();
            sessions.start_hand(&key, now).expect("start");
            let first = sessions
                .snapshot(&key)
                .expect("snapshot")
                .current_player
                .expect("someone to act");
            sessions
                .apply_action(&key, first, PlayerAction::Fold, now)
                .expect("fold")
                .iter()
                .find_map(TableEvent::summary)
                .and_then(|s| s.winner)
        });
    }

    let mut winners = Vec::new();
    while let Some(result) = join_set.join_next().await {
        winners.push(result.expect("task completed").expect("hand had a winner"));
    }

    assert_eq!(winners.len(), table_count as usize);
    assert_eq!(sessions.active_sessions().len(), table_count as usize);
    let board = stats.leaderboard(100).unwrap();
    assert_eq!(board.len(), (table_count * 2) as usize);
    assert_eq!(board.iter().filter(|p| p.hands_won == 1).count(), winners.len());
}
