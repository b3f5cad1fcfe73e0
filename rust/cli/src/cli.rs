use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "holdem", version, about = "Texas Hold'em table engine CLI")]
pub struct HoldemCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play hot-seat hands at one table, reading actions from stdin
    Play {
        /// Comma separated player names, in seating order
        #[arg(long, value_delimiter = ',', num_args = 1.., required = true)]
        players: Vec<String>,
        /// Stop after this many hands (default: until one player has all the chips)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        hands: Option<u32>,
        /// Seed for deck and turn order shuffles
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Best five-card hand out of five to seven cards
    Eval {
        /// Card codes such as "AH KH QH JH 10H 2C 3D"
        cards: String,
    },
    /// Lifetime results, most chips won first
    Leaderboard {
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Zero every player's statistics
    ResetStats {
        /// Delete players entirely instead of zeroing their counters
        #[arg(long)]
        purge: bool,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}
