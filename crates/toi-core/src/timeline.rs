//! Piecewise-constant score and strength timelines.
//!
//! Each period holds breakpoints with strictly increasing times, the first at
//! second 0 carrying whatever was in effect when the previous period ended.
//! A breakpoint's value holds from its time until the next breakpoint.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::context::ScoreDiff;
use crate::intervals::{StartsAt, last_starting_at_or_before, starting_within};
use crate::strength::{AnnotatedEvent, StrengthLabel};
use crate::types::TeamId;

/// A time at which a timeline takes a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakpoint<V> {
    pub time: u32,
    pub value: V,
}

impl<V> StartsAt for Breakpoint<V> {
    fn starts_at(&self) -> u32 {
        self.time
    }
}

/// Per-period breakpoints of one context value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline<V> {
    initial: V,
    periods: BTreeMap<u8, Vec<Breakpoint<V>>>,
}

impl<V: Clone + PartialEq> Timeline<V> {
    /// An empty timeline holding `initial` everywhere.
    pub fn new(initial: V) -> Self {
        Self {
            initial,
            periods: BTreeMap::new(),
        }
    }

    /// The value in effect at second `t` of `period`.
    ///
    /// Periods without breakpoints inherit the final value of the nearest
    /// earlier period.
    pub fn value_at(&self, period: u8, t: u32) -> &V {
        self.periods
            .get(&period)
            .and_then(|bps| last_starting_at_or_before(bps, t).map(|i| &bps[i].value))
            .unwrap_or_else(|| self.carried_into(period))
    }

    /// Breakpoints of `period` with times in `(after, until]`.
    pub fn breakpoints_within(&self, period: u8, after: u32, until: u32) -> &[Breakpoint<V>] {
        let bps = self.breakpoints(period);
        &bps[starting_within(bps, after, until)]
    }

    /// All breakpoints of `period`.
    pub fn breakpoints(&self, period: u8) -> &[Breakpoint<V>] {
        self.periods.get(&period).map_or(&[], Vec::as_slice)
    }

    /// Periods with breakpoints, ascending.
    pub fn periods(&self) -> impl Iterator<Item = u8> + '_ {
        self.periods.keys().copied()
    }

    /// Breakpoints across all periods.
    pub fn len(&self) -> usize {
        self.periods.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// The value in effect after the last breakpoint of the game.
    pub fn final_value(&self) -> &V {
        self.periods
            .values()
            .next_back()
            .and_then(|bps| bps.last())
            .map_or(&self.initial, |bp| &bp.value)
    }

    /// The value in effect at the end of the last period before `period`.
    fn carried_into(&self, period: u8) -> &V {
        self.periods
            .range(..period)
            .next_back()
            .and_then(|(_, bps)| bps.last())
            .map_or(&self.initial, |bp| &bp.value)
    }
}

/// Builds a [`Timeline`] from values observed in game order.
#[derive(Debug, Clone)]
pub struct TimelineBuilder<V> {
    timeline: Timeline<V>,
    last_seen: Option<(u8, u32)>,
}

impl<V: Clone + PartialEq> TimelineBuilder<V> {
    pub fn new(initial: V) -> Self {
        Self {
            timeline: Timeline::new(initial),
            last_seen: None,
        }
    }

    /// Records the value observed at second `time` of `period`.
    ///
    /// Observations must arrive in (period, time) order; earlier ones are
    /// ignored. Several changes at the same second collapse into one
    /// breakpoint holding the last value.
    pub fn observe(&mut self, period: u8, time: u32, value: V) {
        if self.last_seen.is_some_and(|seen| (period, time) < seen) {
            tracing::warn!(period, time, "out-of-order timeline observation ignored");
            return;
        }
        self.last_seen = Some((period, time));

        if !self.timeline.periods.contains_key(&period) {
            let carried = self.timeline.carried_into(period).clone();
            self.timeline.periods.insert(
                period,
                vec![Breakpoint {
                    time: 0,
                    value: carried,
                }],
            );
        }
        let Some(bps) = self.timeline.periods.get_mut(&period) else {
            return;
        };
        let Some(last) = bps.last_mut() else {
            return;
        };
        if last.value == value {
            return;
        }

        if last.time == time {
            last.value = value;
            let len = bps.len();
            if len >= 2 && bps[len - 2].value == bps[len - 1].value {
                bps.pop();
            }
        } else {
            bps.push(Breakpoint { time, value });
        }
    }

    pub fn finish(self) -> Timeline<V> {
        self.timeline
    }
}

/// Score and strength timelines for one game, from the home team's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameTimelines {
    pub perspective: TeamId,
    pub score: Timeline<ScoreDiff>,
    pub strength: Timeline<StrengthLabel>,
}

/// Builds both timelines from the annotated event stream.
///
/// `events` must be in game order.
pub fn build_timelines(
    events: &[AnnotatedEvent],
    home: &TeamId,
    config: &PipelineConfig,
) -> GameTimelines {
    let mut score = TimelineBuilder::new(ScoreDiff::default());
    let mut strength = TimelineBuilder::new(config.default_strength);

    for annotated in events {
        let event = &annotated.event;
        score.observe(
            event.period,
            event.time,
            ScoreDiff(event.score.home_differential()),
        );
        if !annotated.suspect || config.strength_from_suspect_events {
            strength.observe(event.period, event.time, annotated.strength_for(home));
        }
    }

    let timelines = GameTimelines {
        perspective: home.clone(),
        score: score.finish(),
        strength: strength.finish(),
    };
    tracing::debug!(
        score_breakpoints = timelines.score.len(),
        strength_breakpoints = timelines.strength.len(),
        "built timelines"
    );
    timelines
}
