//! Context values attributed to shared time.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A value seen from one team's side that reads differently from the other.
pub trait Perspective {
    /// The same value from the opposing team's side.
    #[must_use]
    fn flipped(&self) -> Self;
}

/// Goal differential from some team's perspective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreDiff(pub i32);

impl Perspective for ScoreDiff {
    fn flipped(&self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl fmt::Display for ScoreDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Seconds attributed to each context value.
///
/// For a single shared interval the seconds sum to its duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextSplit<V: Ord>(BTreeMap<V, u32>);

impl<V: Ord> Default for ContextSplit<V> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<V: Ord> ContextSplit<V> {
    /// Adds `seconds` under `value`. Zero seconds leave no entry.
    pub fn add(&mut self, value: V, seconds: u32) {
        if seconds > 0 {
            *self.0.entry(value).or_insert(0) += seconds;
        }
    }

    /// Adds every entry of `other` into `self`.
    pub fn merge(&mut self, other: Self) {
        for (value, seconds) in other.0 {
            self.add(value, seconds);
        }
    }

    /// Seconds recorded under `value`.
    pub fn get(&self, value: &V) -> u32 {
        self.0.get(value).copied().unwrap_or(0)
    }

    /// Total seconds across all values.
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&V, u32)> {
        self.0.iter().map(|(value, seconds)| (value, *seconds))
    }
}

impl<V: Ord> FromIterator<(V, u32)> for ContextSplit<V> {
    fn from_iter<I: IntoIterator<Item = (V, u32)>>(iter: I) -> Self {
        let mut split = Self::default();
        for (value, seconds) in iter {
            split.add(value, seconds);
        }
        split
    }
}
