//! Pipeline tuning knobs.

use crate::strength::StrengthLabel;

/// Configuration for per-game processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Fewest skaters (both teams, goalies excluded) before an event is Suspect.
    /// Default: 6.
    pub min_skaters: usize,

    /// Most skaters (both teams, goalies excluded) before an event is Suspect.
    /// Default: 12.
    pub max_skaters: usize,

    /// Strength in effect before the first event of period 1.
    /// Default: 5v5.
    pub default_strength: StrengthLabel,

    /// Whether goalies are paired with teammates for shared time.
    /// Default: false.
    pub include_goalie_pairs: bool,

    /// Whether Suspect events may move the strength timeline.
    /// Default: false. Score always follows every event.
    pub strength_from_suspect_events: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_skaters: 6,
            max_skaters: 12,
            default_strength: StrengthLabel::EVEN,
            include_goalie_pairs: false,
            strength_from_suspect_events: false,
        }
    }
}
