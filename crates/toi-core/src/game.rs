//! Per-game pipeline and the parallel multi-game driver.
//!
//! index → resolve → annotate → timelines → overlaps → splits. Each stage
//! consumes the previous one fully; nothing here performs I/O.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregator, PairKey};
use crate::config::PipelineConfig;
use crate::error::CoreError;
use crate::event::{Event, Score};
use crate::event_type::EventType;
use crate::overlap::shared_intervals;
use crate::roster::RosterResolver;
use crate::shift::Shift;
use crate::shift_index::ShiftIndex;
use crate::split::{PairContext, split_context};
use crate::strength::{AnnotatedEvent, annotate};
use crate::timeline::{GameTimelines, build_timelines};
use crate::types::{GameId, ParticipantId, TeamId, ValidationError};

/// Normalized input for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: GameId,
    pub home_team: TeamId,
    pub away_team: TeamId,
    #[serde(default)]
    pub goalies: BTreeSet<ParticipantId>,
    pub events: Vec<Event>,
    pub shifts: Vec<Shift>,
}

impl GameRecord {
    /// Checks the invariants deserialization cannot.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for shift in &self.shifts {
            shift.validate()?;
            self.check_team(&shift.team)?;
        }
        for event in &self.events {
            event.at()?;
            self.check_team(&event.team)?;
        }
        Ok(())
    }

    fn check_team(&self, team: &TeamId) -> Result<(), ValidationError> {
        if *team == self.home_team || *team == self.away_team {
            return Ok(());
        }
        Err(ValidationError::UnknownTeam {
            team: team.to_string(),
            home: self.home_team.to_string(),
            away: self.away_team.to_string(),
        })
    }
}

/// Events a participant was on the ice for, by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OnIceTally {
    /// Events credited to the participant's team.
    #[serde(rename = "for")]
    pub for_team: BTreeMap<EventType, u32>,
    /// Events credited to the opponent.
    pub against: BTreeMap<EventType, u32>,
}

/// One pair's shared time in a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairShare {
    #[serde(flatten)]
    pub pair: PairKey,
    pub team: TeamId,
    #[serde(flatten)]
    pub context: PairContext,
}

/// Everything derived from one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub game_id: GameId,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub final_score: Score,
    /// In game order.
    pub events: Vec<AnnotatedEvent>,
    pub timelines: GameTimelines,
    /// Ordered by pair.
    pub shared: Vec<PairShare>,
    pub on_ice: BTreeMap<ParticipantId, OnIceTally>,
}

impl GameSummary {
    pub fn suspect_events(&self) -> impl Iterator<Item = &AnnotatedEvent> {
        self.events.iter().filter(|e| e.suspect)
    }
}

/// Runs the full per-game pipeline.
pub fn process_game(record: &GameRecord, config: &PipelineConfig) -> Result<GameSummary, CoreError> {
    let span = tracing::debug_span!("game", game = %record.game_id);
    let _guard = span.enter();

    record.validate()?;
    if record.events.is_empty() {
        return Err(CoreError::NoEventsInGame {
            game_id: record.game_id,
        });
    }

    let mut events = record.events.clone();
    // Stable: feed order breaks ties at the same second.
    events.sort_by_key(|e| (e.period, e.time));

    let index = ShiftIndex::build(record.shifts.iter().cloned());
    let resolver = RosterResolver::new(&index, &record.goalies, config);
    let annotated: Vec<_> = events
        .into_iter()
        .map(|event| annotate(event, &resolver))
        .collect();

    let timelines = build_timelines(&annotated, &record.home_team, config);
    let shared = pair_shares(&index, &record.goalies, &timelines, config)?;
    let on_ice = tally_on_ice(&annotated, &index);
    let final_score = annotated
        .last()
        .map(|a| a.event.score)
        .unwrap_or_default();

    tracing::debug!(
        events = annotated.len(),
        suspect = annotated.iter().filter(|a| a.suspect).count(),
        pairs = shared.len(),
        "processed game"
    );

    Ok(GameSummary {
        game_id: record.game_id,
        home_team: record.home_team.clone(),
        away_team: record.away_team.clone(),
        final_score,
        events: annotated,
        timelines,
        shared,
        on_ice,
    })
}

/// Shared time for every pair of teammates, split on both timelines.
fn pair_shares(
    index: &ShiftIndex,
    goalies: &BTreeSet<ParticipantId>,
    timelines: &GameTimelines,
    config: &PipelineConfig,
) -> Result<Vec<PairShare>, CoreError> {
    let mut rosters: BTreeMap<&TeamId, Vec<&ParticipantId>> = BTreeMap::new();
    for (participant, team) in index.participants() {
        if config.include_goalie_pairs || !goalies.contains(participant) {
            rosters.entry(team).or_default().push(participant);
        }
    }

    let periods: Vec<u8> = index.periods().collect();
    let mut shares = Vec::new();

    for (team, members) in rosters {
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                let mut context = PairContext::default();
                for &period in &periods {
                    for interval in shared_intervals(index, period, a, b) {
                        context.merge(split_context(&interval, timelines, team)?);
                    }
                }
                if context.seconds > 0 {
                    shares.push(PairShare {
                        pair: PairKey::new((*a).clone(), (*b).clone()),
                        team: team.clone(),
                        context,
                    });
                }
            }
        }
    }

    shares.sort_by(|x, y| x.pair.cmp(&y.pair));
    Ok(shares)
}

fn tally_on_ice(events: &[AnnotatedEvent], index: &ShiftIndex) -> BTreeMap<ParticipantId, OnIceTally> {
    let mut tallies: BTreeMap<ParticipantId, OnIceTally> = index
        .participants()
        .map(|(participant, _)| (participant.clone(), OnIceTally::default()))
        .collect();

    for annotated in events {
        let event_type = annotated.event.event_type;
        for participant in &annotated.roster.on_for {
            let tally = tallies.entry(participant.clone()).or_default();
            *tally.for_team.entry(event_type).or_insert(0) += 1;
        }
        for participant in &annotated.roster.on_against {
            let tally = tallies.entry(participant.clone()).or_default();
            *tally.against.entry(event_type).or_insert(0) += 1;
        }
    }
    tallies
}

/// Processes games in parallel and records each successful one.
///
/// Results are in input order. A failed game does not stop the others.
/// Within one batch the first record of a game id wins; later records with
/// that id fail with [`CoreError::DuplicateGame`] without being processed.
/// Games already recorded in `aggregator` by an earlier batch are still
/// processed but not merged again.
pub fn process_games(
    records: &[GameRecord],
    config: &PipelineConfig,
    aggregator: &Aggregator,
) -> Vec<Result<GameSummary, CoreError>> {
    let mut seen = BTreeSet::new();
    let first_of_id: Vec<bool> = records.iter().map(|r| seen.insert(r.game_id)).collect();

    records
        .par_iter()
        .zip(first_of_id.par_iter())
        .map(|(record, &first)| -> Result<GameSummary, CoreError> {
            if !first {
                tracing::warn!(game = %record.game_id, "duplicate game in batch; skipping");
                return Err(CoreError::DuplicateGame {
                    game_id: record.game_id,
                });
            }
            let summary = process_game(record, config)?;
            aggregator.record_game(
                summary.game_id,
                summary
                    .shared
                    .iter()
                    .map(|share| (share.pair.clone(), share.context.clone())),
            );
            Ok(summary)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ScoreDiff;
    use crate::strength::StrengthLabel;

    fn pid(name: &str) -> ParticipantId {
        ParticipantId::new(name).unwrap()
    }

    fn team(name: &str) -> TeamId {
        TeamId::new(name).unwrap()
    }

    fn shift(name: &str, team_name: &str, period: u8, start: u32, end: u32) -> Shift {
        Shift::new(pid(name), team(team_name), period, start, end).unwrap()
    }

    fn event(event_type: EventType, period: u8, time: u32, team_name: &str, score: (u32, u32)) -> Event {
        Event {
            event_type,
            period,
            time,
            team: team(team_name),
            score: Score {
                home: score.0,
                away: score.1,
            },
            causes_stoppage: None,
        }
    }

    /// Five skaters and a goalie per side for all of period 1, plus X and Y.
    fn full_strength_game(events: Vec<Event>, mut extra_shifts: Vec<Shift>) -> GameRecord {
        let mut shifts = Vec::new();
        for i in 0..4 {
            shifts.push(shift(&format!("BUF{i}"), "BUF", 1, 0, 1200));
        }
        for i in 0..5 {
            shifts.push(shift(&format!("TOR{i}"), "TOR", 1, 0, 1200));
        }
        shifts.push(shift("BUFG", "BUF", 1, 0, 1200));
        shifts.push(shift("TORG", "TOR", 1, 0, 1200));
        shifts.append(&mut extra_shifts);
        GameRecord {
            game_id: GameId(2_019_020_645),
            home_team: team("BUF"),
            away_team: team("TOR"),
            goalies: BTreeSet::from([pid("BUFG"), pid("TORG")]),
            events,
            shifts,
        }
    }

    fn share<'a>(summary: &'a GameSummary, a: &str, b: &str) -> Option<&'a PairShare> {
        let key = PairKey::new(pid(a), pid(b));
        summary.shared.iter().find(|s| s.pair == key)
    }

    #[test]
    fn goal_splits_shared_time_by_score() {
        let record = full_strength_game(
            vec![
                event(EventType::Faceoff, 1, 0, "BUF", (0, 0)),
                event(EventType::Goal, 1, 40, "BUF", (1, 0)),
            ],
            vec![shift("X", "BUF", 1, 0, 45), shift("Y", "BUF", 1, 20, 60)],
        );

        let summary = process_game(&record, &PipelineConfig::default()).unwrap();
        let xy = share(&summary, "X", "Y").expect("X and Y overlap");

        assert_eq!(xy.context.seconds, 25);
        assert_eq!(xy.context.score.get(&ScoreDiff(0)), 20);
        assert_eq!(xy.context.score.get(&ScoreDiff(1)), 5);
        assert_eq!(xy.context.strength.total(), 25);
        assert_eq!(summary.final_score, Score { home: 1, away: 0 });
    }

    #[test]
    fn away_pairs_see_score_from_their_side() {
        let record = full_strength_game(
            vec![event(EventType::Goal, 1, 40, "BUF", (1, 0))],
            vec![],
        );
        let summary = process_game(&record, &PipelineConfig::default()).unwrap();

        let tor = share(&summary, "TOR0", "TOR1").unwrap();
        assert_eq!(tor.team, team("TOR"));
        assert_eq!(tor.context.score.get(&ScoreDiff(-1)), 1160);
        assert_eq!(tor.context.score.get(&ScoreDiff(0)), 40);
    }

    #[test]
    fn goalies_are_not_paired_by_default() {
        let record = full_strength_game(vec![event(EventType::Hit, 1, 100, "TOR", (0, 0))], vec![]);

        let summary = process_game(&record, &PipelineConfig::default()).unwrap();
        assert!(share(&summary, "BUFG", "BUF0").is_none());
        assert!(share(&summary, "BUF0", "TOR0").is_none());

        let config = PipelineConfig {
            include_goalie_pairs: true,
            ..PipelineConfig::default()
        };
        let summary = process_game(&record, &config).unwrap();
        assert_eq!(share(&summary, "BUFG", "BUF0").unwrap().context.seconds, 1200);
    }

    #[test]
    fn annotates_strength_and_tallies() {
        let record = full_strength_game(
            vec![
                event(EventType::Shot, 1, 30, "TOR", (0, 0)),
                event(EventType::Shot, 1, 50, "BUF", (0, 0)),
            ],
            vec![],
        );
        let summary = process_game(&record, &PipelineConfig::default()).unwrap();

        assert_eq!(summary.events[0].strength, StrengthLabel::new(5, 4));
        assert!(!summary.events[0].suspect);
        assert_eq!(*summary.timelines.strength.value_at(1, 40), StrengthLabel::new(4, 5));

        let tally = &summary.on_ice[&pid("BUF0")];
        assert_eq!(tally.for_team.get(&EventType::Shot), Some(&1));
        assert_eq!(tally.against.get(&EventType::Shot), Some(&1));
    }

    #[test]
    fn sorts_events_stably_by_time() {
        let record = full_strength_game(
            vec![
                event(EventType::Hit, 1, 300, "BUF", (0, 0)),
                event(EventType::Faceoff, 1, 100, "BUF", (0, 0)),
                event(EventType::Giveaway, 1, 100, "TOR", (0, 0)),
            ],
            vec![],
        );
        let summary = process_game(&record, &PipelineConfig::default()).unwrap();
        let order: Vec<_> = summary.events.iter().map(|e| e.event.event_type).collect();
        assert_eq!(order, [EventType::Faceoff, EventType::Giveaway, EventType::Hit]);
    }

    #[test]
    fn game_without_events_is_fatal() {
        let record = full_strength_game(vec![], vec![]);
        assert_eq!(
            process_game(&record, &PipelineConfig::default()),
            Err(CoreError::NoEventsInGame {
                game_id: GameId(2_019_020_645)
            })
        );
    }

    #[test]
    fn inverted_shift_is_rejected() {
        let mut record = full_strength_game(vec![event(EventType::Hit, 1, 10, "BUF", (0, 0))], vec![]);
        record.shifts[0].end = 0;
        record.shifts[0].start = 10;
        assert!(matches!(
            process_game(&record, &PipelineConfig::default()),
            Err(CoreError::Validation(ValidationError::InvertedShift { .. }))
        ));
    }

    #[test]
    fn parallel_driver_is_deterministic_and_skips_finished_games() {
        let mut second = full_strength_game(
            vec![event(EventType::Goal, 1, 600, "TOR", (0, 1))],
            vec![shift("X", "BUF", 1, 500, 700), shift("Y", "BUF", 1, 550, 650)],
        );
        second.game_id = GameId(2);
        let records = vec![
            full_strength_game(
                vec![event(EventType::Goal, 1, 40, "BUF", (1, 0))],
                vec![shift("X", "BUF", 1, 0, 45), shift("Y", "BUF", 1, 20, 60)],
            ),
            second,
            GameRecord {
                game_id: GameId(3),
                ..full_strength_game(vec![], vec![])
            },
        ];
        let config = PipelineConfig::default();

        let first_run = Aggregator::new();
        let results = process_games(&records, &config, &first_run);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(matches!(results[2], Err(CoreError::NoEventsInGame { .. })));

        let second_run = Aggregator::new();
        process_games(&records, &config, &second_run);
        assert_eq!(first_run.snapshot(), second_run.snapshot());

        let before = first_run.snapshot();
        process_games(&records, &config, &first_run);
        assert_eq!(first_run.snapshot(), before);

        let xy = first_run.pair_totals(pid("X"), pid("Y"));
        assert_eq!(xy.seconds, 25 + 100);
        assert_eq!(xy.score.get(&ScoreDiff(-1)), 50);
    }

    #[test]
    fn first_record_of_a_game_id_wins() {
        let goal_at = |time: u32| {
            full_strength_game(
                vec![event(EventType::Goal, 1, time, "BUF", (1, 0))],
                vec![shift("X", "BUF", 1, 0, 45), shift("Y", "BUF", 1, 20, 60)],
            )
        };
        let records = vec![goal_at(40), goal_at(30), goal_at(50)];

        for _ in 0..4 {
            let aggregator = Aggregator::new();
            let results = process_games(&records, &PipelineConfig::default(), &aggregator);
            assert!(results[0].is_ok());
            for duplicate in &results[1..] {
                assert_eq!(
                    duplicate,
                    &Err(CoreError::DuplicateGame {
                        game_id: GameId(2_019_020_645)
                    })
                );
            }
            let xy = aggregator.pair_totals(pid("X"), pid("Y"));
            assert_eq!(xy.score.get(&ScoreDiff(1)), 5);
        }
    }

    #[test]
    fn team_outside_the_game_is_rejected() {
        let mut record = full_strength_game(vec![event(EventType::Hit, 1, 10, "BUF", (0, 0))], vec![]);
        record.shifts.push(shift("Z", "MTL", 1, 0, 60));
        assert_eq!(
            process_game(&record, &PipelineConfig::default()),
            Err(CoreError::Validation(ValidationError::UnknownTeam {
                team: "MTL".to_string(),
                home: "BUF".to_string(),
                away: "TOR".to_string(),
            }))
        );

        let mut record = full_strength_game(vec![event(EventType::Hit, 1, 10, "MTL", (0, 0))], vec![]);
        record.game_id = GameId(4);
        assert!(matches!(
            process_game(&record, &PipelineConfig::default()),
            Err(CoreError::Validation(ValidationError::UnknownTeam { .. }))
        ));
    }
}
