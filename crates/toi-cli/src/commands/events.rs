//! Events command: the annotated event stream of one game.

use std::io::Write;

use anyhow::Result;
use toi_core::{AnnotatedEvent, GameSummary, format_clock};

/// Writes one line per event, or JSON lines with `json`.
pub fn run<W: Write>(writer: &mut W, summary: &GameSummary, suspect_only: bool, json: bool) -> Result<()> {
    let events = summary
        .events
        .iter()
        .filter(|e| !suspect_only || e.suspect);

    for annotated in events {
        if json {
            writeln!(writer, "{}", serde_json::to_string(annotated)?)?;
        } else {
            writeln!(writer, "{}", format_event(annotated))?;
        }
    }
    Ok(())
}

fn format_event(annotated: &AnnotatedEvent) -> String {
    let event = &annotated.event;
    let mut line = format!(
        "P{} {} {} {} {}",
        event.period,
        format_clock(event.time),
        event.event_type,
        event.team,
        annotated.strength
    );
    if annotated.suspect {
        line.push_str(" SUSPECT");
    }
    line
}
