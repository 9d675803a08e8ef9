//! Engine and match configuration.

use crate::collaborators::StaticStats;
use combat::RawStats;
use error::DuelError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Wait used when the attack clip cannot be found.
pub const DEFAULT_FALLBACK_ANIMATION: Duration = Duration::from_secs(1);
/// Short pause for a combatant that has no animator at all.
pub const DEFAULT_UNANIMATED_PAUSE: Duration = Duration::from_millis(500);
pub const DEFAULT_HISTORY_SIZE: usize = 100;

/// Knobs for a [`TurnEngine`](crate::turn_engine::TurnEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds to wait when the presenter reports the clip is missing.
    #[serde(with = "seconds")]
    pub fallback_animation: Duration,
    /// Seconds to wait when the presenter has nothing to animate.
    #[serde(with = "seconds")]
    pub unanimated_pause: Duration,
    /// Fixes who attacks first; random when absent.
    pub seed: Option<u64>,
    pub history_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_animation: DEFAULT_FALLBACK_ANIMATION,
            unanimated_pause: DEFAULT_UNANIMATED_PAUSE,
            seed: None,
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// A whole match: engine settings plus both players' starting stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub player_one: RawStats,
    pub player_two: RawStats,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            player_one: RawStats::typed(30, 10),
            player_two: RawStats::typed(20, 15),
        }
    }
}

impl DuelConfig {
    pub fn from_json(text: &str) -> Result<Self, DuelError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DuelError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn stats_source(&self) -> StaticStats {
        StaticStats::new(self.player_one.clone(), self.player_two.clone())
    }
}

/// Serde adapter storing a `Duration` as fractional seconds.
mod seconds {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|e| D::Error::custom(format!("{secs}: {e}")))
    }
}
