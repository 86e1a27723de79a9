//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Shared time-on-ice from normalized game files.
///
/// Reconstructs who was on the ice for every event and how long teammates
/// played together, split by score and strength.
#[derive(Debug, Parser)]
#[command(name = "toi", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Shared time for every pair of teammates across games.
    Shared {
        /// Normalized game files (JSON).
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output the aggregate as JSON.
        #[arg(long)]
        json: bool,

        /// Hide pairs whose total shared time across all games is below this (seconds).
        #[arg(long, default_value_t = 0)]
        min_seconds: u32,
    },

    /// Print the annotated event stream of one game.
    Events {
        /// Normalized game file (JSON).
        file: PathBuf,

        /// Only events with an implausible on-ice count.
        #[arg(long)]
        suspect_only: bool,

        /// Output JSON lines.
        #[arg(long)]
        json: bool,
    },

    /// Print the score and strength timelines of one game.
    Timeline {
        /// Normalized game file (JSON).
        file: PathBuf,
    },
}
