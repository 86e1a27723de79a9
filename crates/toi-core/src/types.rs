//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Periods are numbered from 1.
    #[error("period must be at least 1, got {value}")]
    InvalidPeriod { value: u8 },

    /// A shift ended before it started.
    #[error("shift for {participant} in period {period} ends ({end}s) before it starts ({start}s)")]
    InvertedShift {
        participant: String,
        period: u8,
        start: u32,
        end: u32,
    },

    /// A period clock string was not `MM:SS`.
    #[error("invalid period clock: {value}")]
    InvalidClock { value: String },

    /// A strength label was not `{for}v{against}`.
    #[error("invalid strength label: {value}")]
    InvalidStrength { value: String },

    /// A shift or event named a team that is not playing in the game.
    #[error("team {team} is neither {home} nor {away}")]
    UnknownTeam {
        team: String,
        home: String,
        away: String,
    },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated participant identifier.
    ///
    /// Participant IDs must be non-empty. They are whatever the ingestion layer
    /// uses to tie shifts to events (a feed player id or a full name).
    ParticipantId, "participant ID"
);

define_string_id!(
    /// A validated team identifier (e.g., "BUF").
    TeamId, "team ID"
);

/// Identifier of a single game in the upstream schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
