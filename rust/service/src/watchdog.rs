use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::{self, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::session::SessionManager;

/// Background task that sweeps every table for idle players on a fixed interval.
///
/// Dropping the handle stops the task; [`WatchdogHandle::shutdown`] stops it and waits.
pub struct WatchdogHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<u64>>,
}

impl WatchdogHandle {
    /// Signals the task and waits for it. Returns the number of completed ticks.
    pub async fn shutdown(mut self) -> u64 {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.task.take() {
            Some(task) => match task.await {
                Ok(ticks) => ticks,
                Err(err) => {
                    tracing::error!(error = %err, "watchdog task failed");
                    0
                }
            },
            None => 0,
        }
    }
}

impl Drop for WatchdogHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Starts the watchdog on the current tokio runtime.
pub fn spawn_watchdog(sessions: Arc<SessionManager>, interval: Duration) -> WatchdogHandle {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(interval_ms = interval.as_millis() as u64, "watchdog started");

        let mut ticks = 0u64;
        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                at = ticker.tick() => {
                    // sweeps take table locks and write stats synchronously
                    let sweep = Arc::clone(&sessions);
                    let now = at.into_std();
                    match task::spawn_blocking(move || sweep.tick(now)).await {
                        Ok(produced) if produced > 0 => {
                            tracing::debug!(events = produced, "watchdog tick");
                        }
                        Ok(_) => {}
                        Err(err) => tracing::error!(error = %err, "watchdog sweep failed"),
                    }
                    ticks += 1;
                }
            }
        }
        tracing::info!(ticks, "watchdog stopped");
        ticks
    });

    WatchdogHandle {
        shutdown: Some(shutdown_tx),
        task: Some(task),
    }
}
