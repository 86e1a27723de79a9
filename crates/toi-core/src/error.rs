//! Errors surfaced by the game pipeline.

use thiserror::Error;

use crate::clock::TimePoint;
use crate::types::{GameId, ParticipantId, ValidationError};

/// Fatal errors for a single game or an invalid operation on core values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The game had no tracked events, so no score or timeline exists.
    #[error("game {game_id} has no tracked events")]
    NoEventsInGame { game_id: GameId },

    /// The same game appeared more than once in one batch.
    #[error("game {game_id} appears more than once in the batch")]
    DuplicateGame { game_id: GameId },

    /// Seconds were differenced across a period boundary.
    #[error("cannot compare {from} with {to}: different periods")]
    CrossPeriodComparison { from: TimePoint, to: TimePoint },

    /// An input value failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Non-fatal lookup outcomes. Callers skip the participant for that event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The participant has no shift starting at or before the queried time.
    #[error("{participant} not present in period {period}")]
    NotPresentThisPeriod {
        period: u8,
        participant: ParticipantId,
    },
}
