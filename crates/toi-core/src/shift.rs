//! Per-participant activity intervals.

use serde::{Deserialize, Serialize};

use crate::clock::deserialize_seconds;
use crate::types::{ParticipantId, TeamId, ValidationError};

/// A continuous stretch one participant spent on the ice within one period.
///
/// Covers `[start, end)` in seconds into the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub participant: ParticipantId,
    pub team: TeamId,
    pub period: u8,
    #[serde(deserialize_with = "deserialize_seconds")]
    pub start: u32,
    #[serde(deserialize_with = "deserialize_seconds")]
    pub end: u32,
}

impl Shift {
    /// Creates a shift, rejecting period 0 and inverted bounds.
    pub fn new(
        participant: ParticipantId,
        team: TeamId,
        period: u8,
        start: u32,
        end: u32,
    ) -> Result<Self, ValidationError> {
        let shift = Self {
            participant,
            team,
            period,
            start,
            end,
        };
        shift.validate()?;
        Ok(shift)
    }

    /// Checks the invariants deserialization cannot.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.period == 0 {
            return Err(ValidationError::InvalidPeriod { value: 0 });
        }
        if self.end < self.start {
            return Err(ValidationError::InvertedShift {
                participant: self.participant.to_string(),
                period: self.period,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(start: u32, end: u32) -> Result<Shift, ValidationError> {
        Shift::new(
            ParticipantId::new("Skinner").unwrap(),
            TeamId::new("BUF").unwrap(),
            1,
            start,
            end,
        )
    }

    #[test]
    fn duration_is_end_minus_start() {
        assert_eq!(shift(20, 65).unwrap().duration(), 45);
        assert_eq!(shift(30, 30).unwrap().duration(), 0);
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(matches!(
            shift(65, 20),
            Err(ValidationError::InvertedShift { start: 65, end: 20, .. })
        ));
    }

    #[test]
    fn deserializes_feed_clock_strings() {
        let json = r#"{"participant": "Skinner", "team": "BUF", "period": 3,
                       "start": "00:45", "end": "01:30"}"#;
        let shift: Shift = serde_json::from_str(json).unwrap();
        assert_eq!((shift.start, shift.end), (45, 90));
    }
}
