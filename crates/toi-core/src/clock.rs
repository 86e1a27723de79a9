//! Period-relative time.
//!
//! Seconds are only comparable within a period. Overtime periods may be
//! shorter than regulation, so nothing here normalizes across periods.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::ValidationError;

/// A point in a game: seconds elapsed into a period.
///
/// Ordered by period, then seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TimePoint {
    period: u8,
    seconds: u32,
}

impl TimePoint {
    /// Creates a time point. Periods are numbered from 1.
    pub fn new(period: u8, seconds: u32) -> Result<Self, ValidationError> {
        if period == 0 {
            return Err(ValidationError::InvalidPeriod { value: period });
        }
        Ok(Self { period, seconds })
    }

    #[must_use]
    pub const fn period(self) -> u8 {
        self.period
    }

    #[must_use]
    pub const fn seconds(self) -> u32 {
        self.seconds
    }

    /// Signed seconds from `self` to `later`, within one period.
    pub fn seconds_until(self, later: Self) -> Result<i64, CoreError> {
        if self.period != later.period {
            return Err(CoreError::CrossPeriodComparison {
                from: self,
                to: later,
            });
        }
        Ok(i64::from(later.seconds) - i64::from(self.seconds))
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{} {}", self.period, format_clock(self.seconds))
    }
}

/// Parses a period clock (`MM:SS`) into seconds.
pub fn parse_clock(value: &str) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::InvalidClock {
        value: value.to_string(),
    };
    // chrono has no minutes-only format; anchor the clock at hour zero.
    let time = NaiveTime::parse_from_str(&format!("00:{}", value.trim()), "%H:%M:%S")
        .map_err(|_| invalid())?;
    Ok(time.num_seconds_from_midnight())
}

/// Formats seconds as a period clock, `M:SS`.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Deserializes period seconds from either an integer or an `MM:SS` string.
pub(crate) fn deserialize_seconds<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u32),
        Clock(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(seconds) => Ok(seconds),
        Raw::Clock(clock) => parse_clock(&clock).map_err(serde::de::Error::custom),
    }
}
