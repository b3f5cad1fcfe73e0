//! Configuration command handler.
//!
//! Prints the resolved configuration as JSON, one `{ "value", "source" }` pair per key:
//!
//! ```json
//! {
//!   "starting_chips": { "value": 1000, "source": "default" },
//!   "seed": { "value": 7, "source": "env" },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::load_with_sources()?;
    if config.seed.is_none() {
        ui::display_warning(err, "no seed configured, every table shuffles differently")?;
    }
    let display = serde_json::json!({
        "starting_chips": {
            "value": config.starting_chips,
            "source": sources.starting_chips,
        },
        "max_hands": {
            "value": config.max_hands,
            "source": sources.max_hands,
        },
        "max_players": {
            "value": config.max_players,
            "source": sources.max_players,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "db_path": {
            "value": config.db_path,
            "source": sources.db_path,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
