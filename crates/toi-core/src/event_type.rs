//! Tracked play-by-play event kinds and their string forms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tracked play-by-play event types.
///
/// Feed bookkeeping entries (period start/end, game official, ...) are not
/// tracked and never reach the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventType {
    Shot,
    Goal,
    Penalty,
    Faceoff,
    Hit,
    Takeaway,
    Giveaway,
    MissedShot,
    BlockedShot,
}

impl EventType {
    /// All tracked types, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Shot,
        Self::Goal,
        Self::Penalty,
        Self::Faceoff,
        Self::Hit,
        Self::Takeaway,
        Self::Giveaway,
        Self::MissedShot,
        Self::BlockedShot,
    ];

    /// Whether this type halts play when ingestion does not say otherwise.
    #[must_use]
    pub const fn stops_play_by_default(self) -> bool {
        matches!(self, Self::Goal | Self::Penalty)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Shot => "shot",
            Self::Goal => "goal",
            Self::Penalty => "penalty",
            Self::Faceoff => "faceoff",
            Self::Hit => "hit",
            Self::Takeaway => "takeaway",
            Self::Giveaway => "giveaway",
            Self::MissedShot => "missed_shot",
            Self::BlockedShot => "blocked_shot",
        };
        write!(f, "{s}")
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shot" | "Shot" => Ok(Self::Shot),
            "goal" | "Goal" => Ok(Self::Goal),
            "penalty" | "Penalty" => Ok(Self::Penalty),
            "faceoff" | "Faceoff" => Ok(Self::Faceoff),
            "hit" | "Hit" => Ok(Self::Hit),
            "takeaway" | "Takeaway" => Ok(Self::Takeaway),
            "giveaway" | "Giveaway" => Ok(Self::Giveaway),
            "missed_shot" | "Missed Shot" => Ok(Self::MissedShot),
            "blocked_shot" | "Blocked Shot" => Ok(Self::BlockedShot),
            _ => Err(UnknownEventType(s.to_string())),
        }
    }
}

impl Serialize for EventType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown event type strings.
#[derive(Debug, Clone)]
pub struct UnknownEventType(String);

impl fmt::Display for UnknownEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event type: {}", self.0)
    }
}

impl std::error::Error for UnknownEventType {}
