//! Who was on the ice for an event.
//!
//! A participant is on for an event at time `t` when their candidate shift
//! satisfies one of:
//!
//! 1. `start < t < end`
//! 2. `start == t` and the event did not stop play (they just came on)
//! 3. `end == t` and the event stopped play (they were on through the whistle)
//!
//! The candidate is the last shift starting at or before `t`. When a line
//! change lands exactly on a stoppage, rule 3 applies to the shift before it.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::event::Event;
use crate::shift::Shift;
use crate::shift_index::ShiftIndex;
use crate::types::ParticipantId;

/// Participants on the ice for one event, split by side.
///
/// Goalies stay in `on_for`/`on_against` for auditing and are also listed in
/// `goalies`; strength counts leave them out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterResult {
    pub on_for: BTreeSet<ParticipantId>,
    pub on_against: BTreeSet<ParticipantId>,
    pub goalies: BTreeSet<ParticipantId>,
}

impl RosterResult {
    /// Skaters (goalies excluded) for and against the causing team.
    pub fn skater_counts(&self) -> (usize, usize) {
        let skaters = |side: &BTreeSet<_>| side.difference(&self.goalies).count();
        (skaters(&self.on_for), skaters(&self.on_against))
    }

    /// Skaters on the ice for both teams.
    pub fn total_skaters(&self) -> usize {
        let (for_, against) = self.skater_counts();
        for_ + against
    }
}

/// Whether `shift` puts its participant on the ice at `t`.
#[must_use]
pub const fn on_ice_at(shift: &Shift, t: u32, stoppage: bool) -> bool {
    (shift.start < t && t < shift.end)
        || (shift.start == t && !stoppage)
        || (shift.end == t && stoppage)
}

/// Resolves on-ice rosters against one game's [`ShiftIndex`].
#[derive(Debug, Clone, Copy)]
pub struct RosterResolver<'a> {
    index: &'a ShiftIndex,
    goalies: &'a BTreeSet<ParticipantId>,
    min_skaters: usize,
    max_skaters: usize,
}

impl<'a> RosterResolver<'a> {
    pub fn new(
        index: &'a ShiftIndex,
        goalies: &'a BTreeSet<ParticipantId>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            index,
            goalies,
            min_skaters: config.min_skaters,
            max_skaters: config.max_skaters,
        }
    }

    /// Computes the on-for and on-against sets for `event`.
    ///
    /// Participants without a candidate shift in the event's period are
    /// skipped.
    pub fn resolve(&self, event: &Event) -> RosterResult {
        let stoppage = event.stops_play();
        let mut roster = RosterResult::default();

        for participant in self.index.participants_in(event.period) {
            let Ok(lookup) =
                self.index
                    .lookup_containing_or_preceding(event.period, participant, event.time)
            else {
                continue;
            };

            let on_shift = if on_ice_at(lookup.shift, event.time, stoppage) {
                Some(lookup.shift)
            } else {
                lookup
                    .previous
                    .filter(|prev| on_ice_at(prev, event.time, stoppage))
            };
            let Some(shift) = on_shift else {
                continue;
            };

            if shift.team == event.team {
                roster.on_for.insert(participant.clone());
            } else {
                roster.on_against.insert(participant.clone());
            }
            if self.goalies.contains(participant) {
                roster.goalies.insert(participant.clone());
            }
        }

        tracing::trace!(
            period = event.period,
            time = event.time,
            event_type = %event.event_type,
            on_for = roster.on_for.len(),
            on_against = roster.on_against.len(),
            "resolved roster"
        );
        roster
    }

    /// Whether the skater count falls outside the configured bounds.
    pub fn is_suspect(&self, roster: &RosterResult) -> bool {
        !(self.min_skaters..=self.max_skaters).contains(&roster.total_skaters())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Score;
    use crate::event_type::EventType;
    use crate::types::TeamId;

    fn pid(name: &str) -> ParticipantId {
        ParticipantId::new(name).unwrap()
    }

    fn shift(name: &str, team: &str, start: u32, end: u32) -> Shift {
        Shift::new(pid(name), TeamId::new(team).unwrap(), 1, start, end).unwrap()
    }

    fn event(event_type: EventType, time: u32, team: &str) -> Event {
        Event {
            event_type,
            period: 1,
            time,
            team: TeamId::new(team).unwrap(),
            score: Score::default(),
            causes_stoppage: None,
        }
    }

    fn resolve(shifts: Vec<Shift>, goalies: &[&str], event: &Event) -> RosterResult {
        let index = ShiftIndex::build(shifts);
        let goalies: BTreeSet<_> = goalies.iter().map(|g| pid(g)).collect();
        RosterResolver::new(&index, &goalies, &PipelineConfig::default()).resolve(event)
    }

    #[test]
    fn interior_time_is_on_ice() {
        let s = shift("A", "BUF", 0, 40);
        assert!(on_ice_at(&s, 20, false));
        assert!(on_ice_at(&s, 20, true));
        assert!(!on_ice_at(&s, 41, false));
    }

    #[test]
    fn shift_start_counts_only_without_stoppage() {
        let s = shift("A", "BUF", 10, 40);
        assert!(on_ice_at(&s, 10, false));
        assert!(!on_ice_at(&s, 10, true));
    }

    #[test]
    fn shift_end_counts_only_with_stoppage() {
        let s = shift("A", "BUF", 0, 10);
        assert!(on_ice_at(&s, 10, true));
        assert!(!on_ice_at(&s, 10, false));
    }

    #[test]
    fn faceoff_on_line_change_uses_new_shift() {
        let shifts = vec![shift("A", "BUF", 0, 10), shift("A", "BUF", 10, 40)];
        let faceoff = event(EventType::Faceoff, 10, "BUF");

        let index = ShiftIndex::build(shifts);
        let lookup = index
            .lookup_containing_or_preceding(1, &pid("A"), 10)
            .unwrap();
        assert!(on_ice_at(lookup.shift, faceoff.time, faceoff.stops_play()));
        assert_eq!(lookup.shift.start, 10);

        let goalies = BTreeSet::new();
        let roster = RosterResolver::new(&index, &goalies, &PipelineConfig::default())
            .resolve(&faceoff);
        assert!(roster.on_for.contains(&pid("A")));
    }

    #[test]
    fn penalty_on_line_change_uses_previous_shift() {
        let shifts = vec![shift("A", "BUF", 0, 10), shift("A", "BUF", 10, 40)];
        let penalty = event(EventType::Penalty, 10, "BUF");

        let index = ShiftIndex::build(shifts);
        let lookup = index
            .lookup_containing_or_preceding(1, &pid("A"), 10)
            .unwrap();
        assert!(!on_ice_at(lookup.shift, penalty.time, true));
        assert!(on_ice_at(lookup.previous.unwrap(), penalty.time, true));

        let goalies = BTreeSet::new();
        let roster = RosterResolver::new(&index, &goalies, &PipelineConfig::default())
            .resolve(&penalty);
        assert!(roster.on_for.contains(&pid("A")));
    }

    #[test]
    fn splits_sides_by_causing_team() {
        let roster = resolve(
            vec![shift("A", "BUF", 0, 40), shift("B", "TOR", 0, 40)],
            &[],
            &event(EventType::Hit, 20, "TOR"),
        );
        assert_eq!(roster.on_for, BTreeSet::from([pid("B")]));
        assert_eq!(roster.on_against, BTreeSet::from([pid("A")]));
    }

    #[test]
    fn skips_participants_not_yet_on() {
        let roster = resolve(
            vec![shift("A", "BUF", 0, 40), shift("B", "BUF", 30, 70)],
            &[],
            &event(EventType::Shot, 20, "BUF"),
        );
        assert_eq!(roster.on_for, BTreeSet::from([pid("A")]));
    }

    #[test]
    fn skips_participants_whose_shift_ended() {
        let roster = resolve(
            vec![shift("A", "BUF", 0, 15), shift("B", "BUF", 0, 40)],
            &[],
            &event(EventType::Takeaway, 20, "BUF"),
        );
        assert_eq!(roster.on_for, BTreeSet::from([pid("B")]));
    }

    #[test]
    fn goalies_are_kept_but_not_counted() {
        let roster = resolve(
            vec![shift("G", "BUF", 0, 1200), shift("A", "BUF", 0, 40)],
            &["G"],
            &event(EventType::Giveaway, 20, "BUF"),
        );
        assert!(roster.on_for.contains(&pid("G")));
        assert_eq!(roster.goalies, BTreeSet::from([pid("G")]));
        assert_eq!(roster.skater_counts(), (1, 0));
    }

    #[test]
    fn suspect_outside_bounds() {
        let index = ShiftIndex::default();
        let goalies = BTreeSet::new();
        let resolver = RosterResolver::new(&index, &goalies, &PipelineConfig::default());

        let mut roster = RosterResult::default();
        assert!(resolver.is_suspect(&roster));

        roster.on_for = (0..5).map(|i| pid(&format!("F{i}"))).collect();
        roster.on_against = (0..5).map(|i| pid(&format!("A{i}"))).collect();
        assert!(!resolver.is_suspect(&roster));

        roster.on_for = (0..7).map(|i| pid(&format!("F{i}"))).collect();
        roster.on_against = (0..6).map(|i| pid(&format!("A{i}"))).collect();
        assert!(resolver.is_suspect(&roster));
    }

    #[test]
    fn nested_shift_does_not_hide_longer_one() {
        let roster = resolve(
            vec![
                shift("X", "BUF", 0, 100),
                shift("X", "BUF", 10, 20),
                shift("X", "BUF", 25, 28),
            ],
            &[],
            &event(EventType::Hit, 30, "BUF"),
        );
        assert_eq!(roster.on_for, BTreeSet::from([pid("X")]));
    }
}
