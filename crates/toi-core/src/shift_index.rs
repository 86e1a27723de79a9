//! Shifts grouped by period and participant.

use std::collections::BTreeMap;

use crate::error::LookupError;
use crate::intervals::{StartsAt, last_starting_at_or_before};
use crate::shift::Shift;
use crate::types::{ParticipantId, TeamId};

impl StartsAt for Shift {
    fn starts_at(&self) -> u32 {
        self.start
    }
}

/// Result of a containing-or-preceding lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftLookup<'a> {
    /// The last shift starting at or before the queried time.
    pub shift: &'a Shift,
    /// The shift immediately before it, if any. A stoppage on a line change
    /// can belong to this one.
    pub previous: Option<&'a Shift>,
}

/// Immutable per-game index of shifts, keyed by (period, participant).
///
/// Each list is sorted ascending by start and pairwise disjoint: overlapping
/// shifts of one participant are merged into their union. Shifts that only
/// touch (`end == next start`) stay separate so line changes keep their
/// boundary. Zero-length shifts are dropped.
#[derive(Debug, Clone, Default)]
pub struct ShiftIndex {
    periods: BTreeMap<u8, BTreeMap<ParticipantId, Vec<Shift>>>,
    teams: BTreeMap<ParticipantId, TeamId>,
}

impl ShiftIndex {
    /// Builds the index, taking ownership of the shifts.
    pub fn build(shifts: impl IntoIterator<Item = Shift>) -> Self {
        let mut index = Self::default();
        let mut dropped = 0_usize;

        for shift in shifts {
            if shift.duration() == 0 {
                dropped += 1;
                continue;
            }
            index
                .teams
                .entry(shift.participant.clone())
                .or_insert_with(|| shift.team.clone());
            index
                .periods
                .entry(shift.period)
                .or_default()
                .entry(shift.participant.clone())
                .or_default()
                .push(shift);
        }

        let mut merged = 0_usize;
        for (period, participants) in &mut index.periods {
            for (participant, list) in participants.iter_mut() {
                list.sort_by_key(|s| (s.start, s.end));
                let before = list.len();
                merge_overlapping(list);
                if list.len() < before {
                    merged += before - list.len();
                    tracing::warn!(
                        %participant,
                        period,
                        merged = before - list.len(),
                        "merged overlapping shifts for one participant"
                    );
                }
            }
        }

        tracing::debug!(
            periods = index.periods.len(),
            participants = index.teams.len(),
            dropped_zero_length = dropped,
            merged_overlapping = merged,
            "built shift index"
        );
        index
    }

    /// Finds the last shift starting at or before `t` in `period`.
    pub fn lookup_containing_or_preceding(
        &self,
        period: u8,
        participant: &ParticipantId,
        t: u32,
    ) -> Result<ShiftLookup<'_>, LookupError> {
        let shifts = self.shifts_for(period, participant);
        let idx = last_starting_at_or_before(shifts, t).ok_or_else(|| {
            LookupError::NotPresentThisPeriod {
                period,
                participant: participant.clone(),
            }
        })?;
        Ok(ShiftLookup {
            shift: &shifts[idx],
            previous: idx.checked_sub(1).map(|i| &shifts[i]),
        })
    }

    /// Shifts of one participant in one period, sorted by start.
    pub fn shifts_for(&self, period: u8, participant: &ParticipantId) -> &[Shift] {
        self.periods
            .get(&period)
            .and_then(|participants| participants.get(participant))
            .map_or(&[], Vec::as_slice)
    }

    /// Participants with at least one shift in `period`.
    pub fn participants_in(&self, period: u8) -> impl Iterator<Item = &ParticipantId> {
        self.periods
            .get(&period)
            .into_iter()
            .flat_map(BTreeMap::keys)
    }

    /// Periods with at least one shift, ascending.
    pub fn periods(&self) -> impl Iterator<Item = u8> + '_ {
        self.periods.keys().copied()
    }

    /// Every indexed participant with their team, ordered by id.
    pub fn participants(&self) -> impl Iterator<Item = (&ParticipantId, &TeamId)> {
        self.teams.iter()
    }

    /// The team a participant skated for.
    pub fn team_of(&self, participant: &ParticipantId) -> Option<&TeamId> {
        self.teams.get(participant)
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Merges shifts of a sorted list that overlap into their union, in place.
fn merge_overlapping(list: &mut Vec<Shift>) {
    let mut merged: Vec<Shift> = Vec::with_capacity(list.len());
    for shift in list.drain(..) {
        match merged.last_mut() {
            Some(last) if shift.start < last.end => last.end = last.end.max(shift.end),
            _ => merged.push(shift),
        }
    }
    *list = merged;
}
