//! Cross-game accumulation of shared time per pair.
//!
//! An [`Aggregator`] is built per run and handed by reference to every game
//! worker. It is the only state shared between games.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::split::PairContext;
use crate::types::{GameId, ParticipantId};

/// An unordered pair of participants, stored with the lower id first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PairKey {
    pub a: ParticipantId,
    pub b: ParticipantId,
}

impl PairKey {
    pub fn new(x: ParticipantId, y: ParticipantId) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }
}

/// Merged shared time, keyed by pair and then game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    pairs: BTreeMap<PairKey, BTreeMap<GameId, PairContext>>,
}

impl Aggregate {
    /// Merges `context` into the running total for the pair in `game`.
    pub fn add(&mut self, game: GameId, pair: PairKey, context: PairContext) {
        self.pairs
            .entry(pair)
            .or_default()
            .entry(game)
            .or_default()
            .merge(context);
    }

    /// The pair's total for one game.
    pub fn get(&self, pair: &PairKey, game: GameId) -> Option<&PairContext> {
        self.pairs.get(pair).and_then(|games| games.get(&game))
    }

    /// The pair's total across all games.
    pub fn pair_total(&self, pair: &PairKey) -> PairContext {
        let mut total = PairContext::default();
        for context in self.pairs.get(pair).into_iter().flat_map(BTreeMap::values) {
            total.merge(context.clone());
        }
        total
    }

    /// Entries ordered by pair, then game.
    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, GameId, &PairContext)> {
        self.pairs
            .iter()
            .flat_map(|(pair, games)| games.iter().map(move |(game, ctx)| (pair, *game, ctx)))
    }

    /// Number of (pair, game) entries.
    pub fn len(&self) -> usize {
        self.pairs.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[derive(Serialize)]
struct AggregateEntry<'a> {
    a: &'a ParticipantId,
    b: &'a ParticipantId,
    game_id: GameId,
    #[serde(flatten)]
    context: &'a PairContext,
}

impl Serialize for Aggregate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for (pair, game_id, context) in self.iter() {
            seq.serialize_element(&AggregateEntry {
                a: &pair.a,
                b: &pair.b,
                game_id,
                context,
            })?;
        }
        seq.end()
    }
}

#[derive(Debug, Default)]
struct AggregatorState {
    aggregate: Aggregate,
    finished: BTreeSet<GameId>,
}

/// Thread-safe accumulator shared by per-game workers.
#[derive(Debug, Default)]
pub struct Aggregator {
    state: Mutex<AggregatorState>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AggregatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merges one contribution for the pair `(a, b)` in `game`.
    pub fn add(&self, game: GameId, a: ParticipantId, b: ParticipantId, context: PairContext) {
        self.lock().aggregate.add(game, PairKey::new(a, b), context);
    }

    /// Merges a finished game's contributions under one lock.
    ///
    /// Returns `false` and merges nothing when `game` was already recorded.
    pub fn record_game(
        &self,
        game: GameId,
        contributions: impl IntoIterator<Item = (PairKey, PairContext)>,
    ) -> bool {
        let mut state = self.lock();
        if !state.finished.insert(game) {
            tracing::warn!(%game, "game already aggregated; skipping");
            return false;
        }
        let mut pairs = 0_usize;
        for (pair, context) in contributions {
            state.aggregate.add(game, pair, context);
            pairs += 1;
        }
        tracing::debug!(%game, pairs, "recorded game");
        true
    }

    /// Whether `game` has been recorded.
    pub fn is_finished(&self, game: GameId) -> bool {
        self.lock().finished.contains(&game)
    }

    /// The pair's total across all recorded games.
    pub fn pair_totals(&self, a: ParticipantId, b: ParticipantId) -> PairContext {
        self.lock().aggregate.pair_total(&PairKey::new(a, b))
    }

    /// A copy of the current totals.
    pub fn snapshot(&self) -> Aggregate {
        self.lock().aggregate.clone()
    }

    pub fn into_aggregate(self) -> Aggregate {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .aggregate
    }
}
