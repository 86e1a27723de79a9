//! Skater strength labels and event annotation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::Perspective;
use crate::event::Event;
use crate::roster::{RosterResolver, RosterResult};
use crate::types::{TeamId, ValidationError};

/// Skaters for versus skaters against, goalies excluded (e.g. `5v4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StrengthLabel {
    pub skaters_for: u8,
    pub skaters_against: u8,
}

impl StrengthLabel {
    /// Full strength on both sides.
    pub const EVEN: Self = Self::new(5, 5);

    #[must_use]
    pub const fn new(skaters_for: u8, skaters_against: u8) -> Self {
        Self {
            skaters_for,
            skaters_against,
        }
    }

    /// Label from the causing team's perspective.
    #[must_use]
    pub fn from_roster(roster: &RosterResult) -> Self {
        let (for_, against) = roster.skater_counts();
        let clamp = |n: usize| u8::try_from(n).unwrap_or(u8::MAX);
        Self::new(clamp(for_), clamp(against))
    }
}

impl Perspective for StrengthLabel {
    fn flipped(&self) -> Self {
        Self::new(self.skaters_against, self.skaters_for)
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.skaters_for, self.skaters_against)
    }
}

impl FromStr for StrengthLabel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidStrength {
            value: s.to_string(),
        };
        let (for_, against) = s.split_once('v').ok_or_else(invalid)?;
        Ok(Self::new(
            for_.parse().map_err(|_| invalid())?,
            against.parse().map_err(|_| invalid())?,
        ))
    }
}

impl Serialize for StrengthLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for StrengthLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An event with its on-ice roster and strength attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub roster: RosterResult,
    /// From the causing team's perspective.
    pub strength: StrengthLabel,
    /// The skater count fell outside the plausible range.
    pub suspect: bool,
}

impl AnnotatedEvent {
    /// Strength from `team`'s perspective.
    pub fn strength_for(&self, team: &TeamId) -> StrengthLabel {
        if self.event.team == *team {
            self.strength
        } else {
            self.strength.flipped()
        }
    }
}

/// Resolves and labels one event.
///
/// Suspect events are kept and flagged, never dropped.
pub fn annotate(event: Event, resolver: &RosterResolver<'_>) -> AnnotatedEvent {
    let roster = resolver.resolve(&event);
    let strength = StrengthLabel::from_roster(&roster);
    let suspect = resolver.is_suspect(&roster);
    if suspect {
        tracing::warn!(
            period = event.period,
            time = event.time,
            event_type = %event.event_type,
            %strength,
            skaters = roster.total_skaters(),
            "suspect on-ice count"
        );
    }
    AnnotatedEvent {
        event,
        roster,
        strength,
        suspect,
    }
}
