//! Normalized play-by-play events.

use serde::{Deserialize, Serialize};

use crate::clock::{TimePoint, deserialize_seconds};
use crate::event_type::EventType;
use crate::types::{TeamId, ValidationError};

/// Goals scored so far, as carried on every feed event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    /// Goal differential from the home team's perspective.
    #[must_use]
    pub fn home_differential(self) -> i32 {
        let home = i64::from(self.home);
        let away = i64::from(self.away);
        i32::try_from(home - away).unwrap_or(if home > away { i32::MAX } else { i32::MIN })
    }
}

/// A tracked event as produced by ingestion.
///
/// Events relate to shifts and teams only through id fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub period: u8,
    /// Seconds into the period. Accepts `MM:SS` on input.
    #[serde(deserialize_with = "deserialize_seconds")]
    pub time: u32,
    /// The team credited with the event.
    pub team: TeamId,
    /// Score including this event (a goal counts at its own timestamp).
    #[serde(default)]
    pub score: Score,
    /// Whether play stopped on this event. Falls back to the event type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub causes_stoppage: Option<bool>,
}

impl Event {
    /// Whether play stopped on this event.
    #[must_use]
    pub fn stops_play(&self) -> bool {
        self.causes_stoppage
            .unwrap_or_else(|| self.event_type.stops_play_by_default())
    }

    /// When the event occurred.
    pub fn at(&self) -> Result<TimePoint, ValidationError> {
        TimePoint::new(self.period, self.time)
    }
}
