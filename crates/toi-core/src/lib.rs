//! Core domain logic for shared time-on-ice.
//!
//! This crate reconstructs, for a single game:
//! - Rosters: who was on the ice for every tracked event, and at what strength
//! - Timelines: piecewise-constant score and strength per period
//! - Shared time: how long two teammates were on together, split by the
//!   score and strength in effect
//!
//! Fetching and decoding the upstream feed happens elsewhere; the core
//! consumes normalized [`Event`]s and [`Shift`]s.

mod aggregate;
pub mod clock;
mod config;
pub mod context;
mod error;
mod event;
pub mod event_type;
mod game;
pub mod intervals;
pub mod overlap;
pub mod roster;
mod shift;
pub mod shift_index;
pub mod split;
pub mod strength;
pub mod timeline;
mod types;

pub use aggregate::{Aggregate, Aggregator, PairKey};
pub use clock::{TimePoint, format_clock, parse_clock};
pub use config::PipelineConfig;
pub use context::{ContextSplit, Perspective, ScoreDiff};
pub use error::{CoreError, LookupError};
pub use event::{Event, Score};
pub use event_type::{EventType, UnknownEventType};
pub use game::{GameRecord, GameSummary, OnIceTally, PairShare, process_game, process_games};
pub use overlap::SharedInterval;
pub use roster::{RosterResolver, RosterResult};
pub use shift::Shift;
pub use shift_index::ShiftIndex;
pub use split::PairContext;
pub use strength::{AnnotatedEvent, StrengthLabel};
pub use timeline::{Breakpoint, GameTimelines, Timeline, TimelineBuilder};
pub use types::{GameId, ParticipantId, TeamId, ValidationError};
