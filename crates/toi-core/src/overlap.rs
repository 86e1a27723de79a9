//! Time two participants spent on the ice together.

use serde::Serialize;

use crate::intervals::last_starting_at_or_before;
use crate::shift::Shift;
use crate::shift_index::ShiftIndex;
use crate::types::ParticipantId;

/// The intersection of one shift of each participant, `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedInterval {
    pub participant_a: ParticipantId,
    pub participant_b: ParticipantId,
    pub period: u8,
    pub start: u32,
    pub end: u32,
}

impl SharedInterval {
    #[must_use]
    pub const fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

/// Two-pointer sweep over two sorted shift lists from the same period.
///
/// Yields every pair of shifts whose intersection has positive length, in
/// ascending order. Each list must hold one participant's shifts, which do not
/// overlap one another; lists from [`ShiftIndex::shifts_for`] always qualify.
#[derive(Debug, Clone)]
pub struct OverlapSweep<'a> {
    a: &'a [Shift],
    b: &'a [Shift],
    i: usize,
    j: usize,
}

impl<'a> OverlapSweep<'a> {
    pub fn new(a: &'a [Shift], b: &'a [Shift]) -> Self {
        let mut sweep = Self { a, b, i: 0, j: 0 };
        // Skip shifts that end before the other list begins.
        if let (Some(first_a), Some(_)) = (a.first(), b.first()) {
            sweep.j = last_starting_at_or_before(b, first_a.start).unwrap_or(0);
            sweep.i = last_starting_at_or_before(a, b[sweep.j].start).unwrap_or(0);
        }
        sweep
    }
}

impl<'a> Iterator for OverlapSweep<'a> {
    type Item = (&'a Shift, &'a Shift);

    fn next(&mut self) -> Option<Self::Item> {
        while self.i < self.a.len() && self.j < self.b.len() {
            let (x, y) = (&self.a[self.i], &self.b[self.j]);
            let start = x.start.max(y.start);
            let end = x.end.min(y.end);
            if x.end <= y.end {
                self.i += 1;
            } else {
                self.j += 1;
            }
            if start < end {
                return Some((x, y));
            }
        }
        None
    }
}

/// Every shared interval of `a` and `b` in `period`.
pub fn shared_intervals(
    index: &ShiftIndex,
    period: u8,
    a: &ParticipantId,
    b: &ParticipantId,
) -> Vec<SharedInterval> {
    OverlapSweep::new(index.shifts_for(period, a), index.shifts_for(period, b))
        .map(|(x, y)| SharedInterval {
            participant_a: a.clone(),
            participant_b: b.clone(),
            period,
            start: x.start.max(y.start),
            end: x.end.min(y.end),
        })
        .collect()
}
