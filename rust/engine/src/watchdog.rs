use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::errors::TableError;
use crate::events::TableEvent;
use crate::player::PlayerId;
use crate::table::Table;

/// Inactivity before a player is warned.
pub const DEFAULT_WARN_AFTER: Duration = Duration::from_secs(120);
/// Inactivity before a player is folded.
pub const DEFAULT_FOLD_AFTER: Duration = Duration::from_secs(300);
/// Sweep cadence used by the service layer.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Inactivity thresholds for one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfkPolicy {
    pub warn_after: Duration,
    pub fold_after: Duration,
}

impl Default for AfkPolicy {
    fn default() -> Self {
        Self {
            warn_after: DEFAULT_WARN_AFTER,
            fold_after: DEFAULT_FOLD_AFTER,
        }
    }
}

impl Table {
    /// One watchdog pass over the running hand.
    ///
    /// Non-folded players idle for `fold_after` are folded, those idle for `warn_after` are
    /// warned once. If a fold leaves a single player, they take the pot without further
    /// board cards; otherwise the street may close, but the turn only moves when the
    /// awaited player was folded. Tables without a running hand are left alone.
    pub fn sweep_inactive(
        &mut self,
        now: Instant,
        policy: &AfkPolicy,
    ) -> Result<Vec<TableEvent>, TableError> {
        let mut events = Vec::new();
        if !self.stage.is_betting() {
            return Ok(events);
        }

        let awaited = self.current_player();
        let mut folded_any = false;
        for p in self.players.iter_mut().filter(|p| !p.is_folded()) {
            let Some(last) = p.last_action() else {
                continue;
            };
            let idle = now.saturating_duration_since(last);
            if idle >= policy.fold_after {
                p.fold();
                folded_any = true;
                events.push(TableEvent::PlayerAutoFolded {
                    player_id: p.id(),
                    name: p.name().to_string(),
                });
            } else if idle >= policy.warn_after && !p.is_warned() {
                p.mark_warned();
                events.push(TableEvent::PlayerWarned {
                    player_id: p.id(),
                    name: p.name().to_string(),
                });
            }
        }

        if !folded_any {
            return Ok(events);
        }

        let remaining: Vec<PlayerId> = self.active_players().map(|p| p.id()).collect();
        match remaining.as_slice() {
            [winner] => {
                let summary = self.award_by_default(*winner);
                events.push(TableEvent::HandComplete(summary));
            }
            [] => {
                let summary = self.resolve_showdown();
                events.push(TableEvent::HandComplete(summary));
            }
            _ => {
                // the turn stays where it was unless the awaited player was the one folded
                self.close_streets(&mut events)?;
                if self.stage.is_betting() {
                    let next = self.current_player_id();
                    if let Some(player_id) = next.filter(|&id| Some(id) != awaited) {
                        events.push(TableEvent::TurnPassed { player_id });
                    }
                }
            }
        }
        Ok(events)
    }
}
