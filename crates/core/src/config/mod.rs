use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, RhythmError};

/// Top-level configuration for a play session. Constant for the lifetime of
/// a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub judgment: JudgmentConfig,
    /// Lives (stars) granted at the start of a session.
    pub num_lives: u32,
    /// Seconds between a terminal outcome and the reset request.
    pub reset_delay: f64,
    /// Lead-in between the begin trigger and the song zero-point.
    pub start_delay: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            judgment: JudgmentConfig::default(),
            num_lives: 5,
            reset_delay: 3.0,
            start_delay: 0.1,
        }
    }
}

impl GameConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_lives == 0 {
            return Err(RhythmError::InvalidConfig(
                "num_lives must be at least 1".to_string(),
            ));
        }
        check_duration("reset_delay", self.reset_delay)?;
        check_duration("start_delay", self.start_delay)?;
        self.judgment.validate()
    }
}

/// Timing windows that decide when a cue becomes judgable and when it
/// expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgmentConfig {
    /// How far before the cue time it becomes active.
    pub early_show: f64,
    /// How far after the cue time input is still accepted.
    pub late_window: f64,
    /// Added to the song clock before judging, in milliseconds.
    pub global_offset_ms: f64,
}

impl Default for JudgmentConfig {
    fn default() -> Self {
        Self {
            early_show: 0.8,
            late_window: 0.8,
            global_offset_ms: 0.0,
        }
    }
}

impl JudgmentConfig {
    pub fn offset_seconds(&self) -> f64 {
        self.global_offset_ms / 1000.0
    }

    pub fn validate(&self) -> Result<()> {
        check_duration("early_show", self.early_show)?;
        check_duration("late_window", self.late_window)?;
        if !self.global_offset_ms.is_finite() {
            return Err(RhythmError::InvalidConfig(
                "global_offset_ms must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_duration(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RhythmError::InvalidConfig(format!(
            "{name} must be a non-negative number of seconds, got {value}"
        )))
    }
}
