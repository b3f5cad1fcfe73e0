use holdem_engine::player::STARTING_STACK;
use holdem_engine::table::TableConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const CONFIG_ENV: &str = "HOLDEM_CONFIG";
pub const SEED_ENV: &str = "HOLDEM_SEED";
pub const STARTING_CHIPS_ENV: &str = "HOLDEM_STARTING_CHIPS";
pub const DB_ENV: &str = "HOLDEM_DB";

const DEFAULT_DB_PATH: &str = "holdem.db";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub starting_chips: u32,
    pub max_hands: u32,
    pub max_players: usize,
    pub seed: Option<u64>,
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_chips: STARTING_STACK,
            max_hands: 0,
            max_players: 0,
            seed: None,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl Config {
    /// Table setup for tables created by this process.
    pub fn table(&self) -> TableConfig {
        TableConfig {
            starting_chips: self.starting_chips,
            max_hands: self.max_hands,
            max_players: self.max_players,
            seed: self.seed,
            ..TableConfig::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub starting_chips: ValueSource,
    pub max_hands: ValueSource,
    pub max_players: ValueSource,
    pub seed: ValueSource,
    pub db_path: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            starting_chips: ValueSource::Default,
            max_hands: ValueSource::Default,
            max_players: ValueSource::Default,
            seed: ValueSource::Default,
            db_path: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the TOML file named by `HOLDEM_CONFIG`, then individual env overrides.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.starting_chips {
            cfg.starting_chips = v;
            sources.starting_chips = ValueSource::File;
        }
        if let Some(v) = f.max_hands {
            cfg.max_hands = v;
            sources.max_hands = ValueSource::File;
        }
        if let Some(v) = f.max_players {
            cfg.max_players = v;
            sources.max_players = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.db_path {
            cfg.db_path = v;
            sources.db_path = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var(SEED_ENV)
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid seed: {seed}")))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(chips) = std::env::var(STARTING_CHIPS_ENV)
        && !chips.is_empty()
    {
        cfg.starting_chips = chips
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid starting chips: {chips}")))?;
        sources.starting_chips = ValueSource::Env;
    }
    if let Ok(db) = std::env::var(DB_ENV)
        && !db.is_empty()
    {
        cfg.db_path = PathBuf::from(db);
        sources.db_path = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    starting_chips: Option<u32>,
    #[serde(default)]
    max_hands: Option<u32>,
    #[serde(default)]
    max_players: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    db_path: Option<PathBuf>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    cfg.table()
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {e}")))
}
