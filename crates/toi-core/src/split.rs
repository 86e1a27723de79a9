//! Attributes shared time across timeline breakpoints.

use serde::{Deserialize, Serialize};

use crate::clock::TimePoint;
use crate::context::{ContextSplit, Perspective, ScoreDiff};
use crate::error::CoreError;
use crate::overlap::SharedInterval;
use crate::strength::StrengthLabel;
use crate::timeline::{GameTimelines, Timeline};
use crate::types::TeamId;

/// Splits `interval` into the timeline values in effect across it.
///
/// The value at `start` covers time up to the first breakpoint in
/// `(start, end]`, and so on. The returned seconds sum to the interval's
/// duration. With `flip`, each value is taken from the other team's side.
pub fn split_interval<V>(
    interval: &SharedInterval,
    timeline: &Timeline<V>,
    flip: bool,
) -> Result<ContextSplit<V>, CoreError>
where
    V: Clone + Ord + Perspective,
{
    let period = interval.period;
    let orient = |value: &V| if flip { value.flipped() } else { value.clone() };

    let mut split = ContextSplit::default();
    let mut cursor = TimePoint::new(period, interval.start)?;
    let mut current = timeline.value_at(period, interval.start);

    for bp in timeline.breakpoints_within(period, interval.start, interval.end) {
        let at = TimePoint::new(period, bp.time)?;
        split.add(orient(current), elapsed(cursor, at)?);
        cursor = at;
        current = &bp.value;
    }
    split.add(orient(current), elapsed(cursor, TimePoint::new(period, interval.end)?)?);

    debug_assert_eq!(split.total(), interval.duration());
    Ok(split)
}

fn elapsed(from: TimePoint, to: TimePoint) -> Result<u32, CoreError> {
    let seconds = from.seconds_until(to)?;
    Ok(u32::try_from(seconds).unwrap_or(0))
}

/// Shared seconds of a pair, split by score and by strength.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairContext {
    pub seconds: u32,
    pub score: ContextSplit<ScoreDiff>,
    pub strength: ContextSplit<StrengthLabel>,
}

impl PairContext {
    pub fn merge(&mut self, other: Self) {
        self.seconds += other.seconds;
        self.score.merge(other.score);
        self.strength.merge(other.strength);
    }
}

/// Splits `interval` on both game timelines, seen from `team`'s side.
pub fn split_context(
    interval: &SharedInterval,
    timelines: &GameTimelines,
    team: &TeamId,
) -> Result<PairContext, CoreError> {
    let flip = *team != timelines.perspective;
    Ok(PairContext {
        seconds: interval.duration(),
        score: split_interval(interval, &timelines.score, flip)?,
        strength: split_interval(interval, &timelines.strength, flip)?,
    })
}
