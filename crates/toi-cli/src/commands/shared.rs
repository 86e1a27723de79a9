//! Shared command: time teammates spent on the ice together.
//!
//! Runs the pipeline over every game file in parallel and reports per-pair
//! totals with their score and strength splits.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use toi_core::{Aggregate, Aggregator, PairContext, PairKey, PipelineConfig, format_clock, process_games};

use super::util::{format_split, load_game};

/// Runs the shared command.
///
/// Games that fail to process are reported after the output of the others.
pub fn run<W: Write>(
    writer: &mut W,
    files: &[PathBuf],
    config: &PipelineConfig,
    json: bool,
    min_seconds: u32,
) -> Result<()> {
    let records = files
        .iter()
        .map(|path| load_game(path))
        .collect::<Result<Vec<_>>>()?;

    let aggregator = Aggregator::new();
    let results = process_games(&records, config, &aggregator);
    let aggregate = aggregator.into_aggregate();

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&filter_json(&aggregate, min_seconds))?)?;
    } else {
        write_report(writer, &aggregate, min_seconds)?;
    }

    let failures: Vec<_> = files
        .iter()
        .zip(results)
        .filter_map(|(path, result)| result.err().map(|err| (path, err)))
        .collect();
    if let Some((path, err)) = failures.first() {
        return Err(err.clone())
            .with_context(|| format!("failed to process {}", path.display()))
            .with_context(|| format!("{} of {} game(s) failed", failures.len(), files.len()));
    }
    Ok(())
}

/// Keeps every game entry of the pairs whose total reaches `min_seconds`.
fn filter_json(aggregate: &Aggregate, min_seconds: u32) -> Aggregate {
    let mut kept = Aggregate::default();
    for (pair, game, context) in aggregate.iter() {
        if aggregate.pair_total(pair).seconds >= min_seconds {
            kept.add(game, pair.clone(), context.clone());
        }
    }
    kept
}

/// Writes per-pair totals, longest shared time first.
pub fn write_report<W: Write>(writer: &mut W, aggregate: &Aggregate, min_seconds: u32) -> Result<()> {
    let games: BTreeSet<_> = aggregate.iter().map(|(_, game, _)| game).collect();
    let pairs: BTreeSet<&PairKey> = aggregate.iter().map(|(pair, _, _)| pair).collect();

    let mut totals: Vec<(&PairKey, PairContext)> = pairs
        .into_iter()
        .map(|pair| (pair, aggregate.pair_total(pair)))
        .filter(|(_, total)| total.seconds >= min_seconds)
        .collect();
    totals.sort_by(|(pa, a), (pb, b)| b.seconds.cmp(&a.seconds).then_with(|| pa.cmp(pb)));

    writeln!(writer, "Shared time-on-ice across {} game(s)", games.len())?;
    if totals.is_empty() {
        writeln!(writer, "No pairs shared the ice.")?;
        return Ok(());
    }
    for (pair, total) in totals {
        writeln!(
            writer,
            "{} + {}  {}  score[{}]  strength[{}]",
            pair.a,
            pair.b,
            format_clock(total.seconds),
            format_split(&total.score),
            format_split(&total.strength)
        )?;
    }
    Ok(())
}
