//! Shared utilities for CLI commands.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use toi_core::{ContextSplit, GameRecord, format_clock};

/// Reads one normalized game file.
pub fn load_game(path: &Path) -> Result<GameRecord> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let record: GameRecord = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse game file {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        game = %record.game_id,
        events = record.events.len(),
        shifts = record.shifts.len(),
        "loaded game"
    );
    Ok(record)
}

/// Formats a split as `value clock, value clock`.
pub fn format_split<V: Ord + std::fmt::Display>(split: &ContextSplit<V>) -> String {
    split
        .iter()
        .map(|(value, seconds)| format!("{value} {}", format_clock(seconds)))
        .collect::<Vec<_>>()
        .join(", ")
}
