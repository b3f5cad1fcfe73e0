use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use holdem_engine::table::TableConfig;
use holdem_engine::watchdog::{AfkPolicy, DEFAULT_FOLD_AFTER, DEFAULT_TICK_INTERVAL, DEFAULT_WARN_AFTER};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Setup applied to tables created from now on.
pub type TableSettings = TableConfig;

/// Inactivity watchdog timing, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogSettings {
    pub tick_interval_secs: u64,
    pub warn_after_secs: u64,
    pub fold_after_secs: u64,
}

impl Default for WatchdogSettings {
    fn default() -> Self {
        Self {
            tick_interval_secs: DEFAULT_TICK_INTERVAL.as_secs(),
            warn_after_secs: DEFAULT_WARN_AFTER.as_secs(),
            fold_after_secs: DEFAULT_FOLD_AFTER.as_secs(),
        }
    }
}

impl WatchdogSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_interval_secs == 0 {
            return Err(SettingsError::InvalidValue(
                "tick_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.warn_after_secs >= self.fold_after_secs {
            return Err(SettingsError::InvalidValue(
                "warn_after_secs must be smaller than fold_after_secs".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    pub fn policy(&self) -> AfkPolicy {
        AfkPolicy {
            warn_after: Duration::from_secs(self.warn_after_secs),
            fold_after: Duration::from_secs(self.fold_after_secs),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub table: TableSettings,
    pub watchdog: WatchdogSettings,
}

impl ServiceSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.table
            .validate()
            .map_err(|e| SettingsError::InvalidValue(e.to_string()))?;
        self.watchdog.validate()
    }
}

/// Shared, validated settings.
#[derive(Debug, Default)]
pub struct SettingsStore {
    settings: RwLock<ServiceSettings>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ServiceSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings: RwLock::new(settings),
        })
    }

    pub fn get(&self) -> ServiceSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update(&self, new_settings: ServiceSettings) -> Result<ServiceSettings, SettingsError> {
        new_settings.validate()?;
        *self
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner) = new_settings.clone();
        Ok(new_settings)
    }

    /// Sets one field by name, as typed in a `/setup`-style command.
    pub fn update_field(&self, field: &str, value: &str) -> Result<ServiceSettings, SettingsError> {
        let mut current = self.get();
        let number = || {
            value.trim().parse::<u64>().map_err(|_| {
                SettingsError::InvalidValue(format!("{field} must be a whole number"))
            })
        };
        let narrow = |n: u64| {
            u32::try_from(n)
                .map_err(|_| SettingsError::InvalidValue(format!("{field} is too large")))
        };
        match field {
            "starting_chips" => current.table.starting_chips = narrow(number()?)?,
            "max_hands" => current.table.max_hands = narrow(number()?)?,
            "max_players" => current.table.max_players = number()? as usize,
            "small_blind" => current.table.small_blind = narrow(number()?)?,
            "big_blind" => current.table.big_blind = narrow(number()?)?,
            "warn_after_secs" => current.watchdog.warn_after_secs = number()?,
            "fold_after_secs" => current.watchdog.fold_after_secs = number()?,
            "tick_interval_secs" => current.watchdog.tick_interval_secs = number()?,
            _ => {
                return Err(SettingsError::InvalidValue(format!(
                    "unknown field: {field}"
                )))
            }
        }
        self.update(current)
    }

    pub fn reset(&self) -> ServiceSettings {
        let defaults = ServiceSettings::default();
        *self
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner) = defaults.clone();
        defaults
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let s = ServiceSettings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.watchdog.policy(), AfkPolicy::default());
        assert_eq!(s.watchdog.tick_interval(), Duration::from_secs(5));
        assert_eq!(s.table.starting_chips, 1000);
    }

    #[test]
    fn update_field_validates() {
        let store = SettingsStore::new();
        let s = store.update_field("starting_chips", "2500").unwrap();
        assert_eq!(s.table.starting_chips, 2500);

        assert!(store.update_field("starting_chips", "0").is_err());
        assert!(store.update_field("starting_chips", "lots").is_err());
        assert!(store.update_field("warn_after_secs", "400").is_err());
        assert!(store.update_field("colour", "1").is_err());
        // rejected updates leave the previous value
        assert_eq!(store.get().table.starting_chips, 2500);
    }

    #[test]
    fn reset_restores_defaults() {
        let store = SettingsStore::new();
        store.update_field("max_hands", "10").unwrap();
        assert_eq!(store.reset(), ServiceSettings::default());
    }

    #[test]
    fn parses_from_toml_like_json() {
        let s: ServiceSettings =
            serde_json::from_str(r#"{"table":{"max_players":6},"watchdog":{"fold_after_secs":600}}"#)
                .unwrap();
        assert_eq!(s.table.max_players, 6);
        assert_eq!(s.table.starting_chips, 1000);
        assert_eq!(s.watchdog.fold_after_secs, 600);
        assert_eq!(s.watchdog.warn_after_secs, 120);
    }
}
