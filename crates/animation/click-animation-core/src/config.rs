//! Core configuration for click-animation-core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::LoopMode;

/// Substring that opts a scene node into click-triggered playback.
pub const DEFAULT_NAME_TAG: &str = "_interactive_animation";

/// Upper bound on how many parent links the context resolver follows.
pub const DEFAULT_MAX_ANCESTOR_DEPTH: usize = 256;

/// Errors produced while loading or validating a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config json parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("name_tag must not be empty")]
    EmptyNameTag,
    #[error("playback.repetitions must be at least 1")]
    ZeroRepetitions,
    #[error("playback.time_scale must be finite and non-negative (got {0})")]
    InvalidTimeScale(f32),
    #[error("max_ancestor_depth must be at least 1")]
    ZeroAncestorDepth,
}

/// How the playback trigger configures each clip action on click.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackCfg {
    #[serde(default = "PlaybackCfg::default_loop_mode")]
    pub loop_mode: LoopMode,
    #[serde(default = "PlaybackCfg::default_repetitions")]
    pub repetitions: u32,
    #[serde(default)]
    pub clamp_when_finished: bool,
    /// Multiplier applied to every dedicated player's frame delta.
    #[serde(default = "PlaybackCfg::default_time_scale")]
    pub time_scale: f32,
}

impl PlaybackCfg {
    fn default_loop_mode() -> LoopMode {
        LoopMode::Once
    }

    fn default_repetitions() -> u32 {
        1
    }

    fn default_time_scale() -> f32 {
        1.0
    }
}

impl Default for PlaybackCfg {
    fn default() -> Self {
        Self {
            loop_mode: Self::default_loop_mode(),
            repetitions: Self::default_repetitions(),
            clamp_when_finished: false,
            time_scale: Self::default_time_scale(),
        }
    }
}

/// Configuration for the click-animation subsystem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Display-name substring the auto-tag scanner looks for. Matched literally.
    #[serde(default = "Config::default_name_tag")]
    pub name_tag: String,
    #[serde(default)]
    pub playback: PlaybackCfg,
    #[serde(default = "Config::default_max_ancestor_depth")]
    pub max_ancestor_depth: usize,
}

impl Config {
    fn default_name_tag() -> String {
        DEFAULT_NAME_TAG.to_string()
    }

    fn default_max_ancestor_depth() -> usize {
        DEFAULT_MAX_ANCESTOR_DEPTH
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Config = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name_tag.is_empty() {
            return Err(ConfigError::EmptyNameTag);
        }
        if self.playback.repetitions == 0 {
            return Err(ConfigError::ZeroRepetitions);
        }
        let ts = self.playback.time_scale;
        if !ts.is_finite() || ts < 0.0 {
            return Err(ConfigError::InvalidTimeScale(ts));
        }
        if self.max_ancestor_depth == 0 {
            return Err(ConfigError::ZeroAncestorDepth);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name_tag: Self::default_name_tag(),
            playback: PlaybackCfg::default(),
            max_ancestor_depth: Self::default_max_ancestor_depth(),
        }
    }
}
