//! Timeline command: score and strength breakpoints of one game.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use toi_core::{Breakpoint, GameSummary, format_clock};

/// Writes both timelines period by period, from the home team's side.
pub fn run<W: Write>(writer: &mut W, summary: &GameSummary) -> Result<()> {
    writeln!(
        writer,
        "Game {}: {} {} - {} {}",
        summary.game_id,
        summary.home_team,
        summary.final_score.home,
        summary.final_score.away,
        summary.away_team
    )?;

    let timelines = &summary.timelines;
    let periods: BTreeSet<u8> = timelines
        .score
        .periods()
        .chain(timelines.strength.periods())
        .collect();
    for period in periods {
        writeln!(writer, "Period {period}")?;
        writeln!(writer, "  score:    {}", join(timelines.score.breakpoints(period)))?;
        writeln!(writer, "  strength: {}", join(timelines.strength.breakpoints(period)))?;
    }
    Ok(())
}

fn join<V: Display>(breakpoints: &[Breakpoint<V>]) -> String {
    breakpoints
        .iter()
        .map(|bp| format!("{} {}", format_clock(bp.time), bp.value))
        .collect::<Vec<_>>()
        .join(", ")
}
