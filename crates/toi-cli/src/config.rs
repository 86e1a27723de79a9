//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use toi_core::{PipelineConfig, StrengthLabel, ValidationError};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Fewest skaters on the ice before an event is flagged Suspect.
    pub min_skaters: usize,
    /// Most skaters on the ice before an event is flagged Suspect.
    pub max_skaters: usize,
    /// Strength assumed before the first event (e.g. "5v5").
    pub default_strength: String,
    /// Pair goalies with their teammates.
    pub include_goalie_pairs: bool,
    /// Let Suspect events move the strength timeline.
    pub strength_from_suspect_events: bool,
}

impl Default for Config {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            min_skaters: pipeline.min_skaters,
            max_skaters: pipeline.max_skaters,
            default_strength: pipeline.default_strength.to_string(),
            include_goalie_pairs: pipeline.include_goalie_pairs,
            strength_from_suspect_events: pipeline.strength_from_suspect_events,
        }
    }
}

impl Config {
    /// Loads configuration from default locations, then `config_path` if given.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // TOI_MIN_SKATERS, TOI_DEFAULT_STRENGTH, ...
        figment = figment.merge(Env::prefixed("TOI_"));

        figment.extract()
    }

    /// Converts into the core pipeline configuration.
    pub fn pipeline(&self) -> Result<PipelineConfig, ValidationError> {
        Ok(PipelineConfig {
            min_skaters: self.min_skaters,
            max_skaters: self.max_skaters,
            default_strength: self.default_strength.parse::<StrengthLabel>()?,
            include_goalie_pairs: self.include_goalie_pairs,
            strength_from_suspect_events: self.strength_from_suspect_events,
        })
    }
}

/// Returns the platform-specific config directory for toi.
///
/// On Linux: `~/.config/toi`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("toi"))
}
