use serde::{Deserialize, Serialize};

use crate::{Cue, Lane};

/// How an active cue was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionKind {
    /// Correct lane pressed while the cue was active.
    Hit,
    /// Wrong lane pressed while the cue was active.
    Missed,
    /// No input before the late window closed.
    Expired,
}

impl ResolutionKind {
    /// Whether this resolution consumes a life.
    pub fn costs_life(self) -> bool {
        !matches!(self, Self::Hit)
    }
}

/// Outcome of judging the active cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Lane of the cue that was resolved.
    pub lane: Lane,
    pub kind: ResolutionKind,
}

/// The single cue currently open for judgment.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveCue {
    pub cue: Cue,
}

/// Holds at most one active cue and resolves it from input or timeout.
#[derive(Debug, Default, Clone)]
pub struct JudgmentEngine {
    active: Option<ActiveCue>,
    answered_this_prompt: bool,
}

impl JudgmentEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveCue> {
        self.active.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    pub fn answered_this_prompt(&self) -> bool {
        self.answered_this_prompt
    }

    /// Opens `cue` for judgment. An unresolved cue is replaced without
    /// penalty and returned.
    pub fn activate(&mut self, cue: Cue) -> Option<Cue> {
        self.answered_this_prompt = false;
        let replaced = self.active.replace(ActiveCue { cue });
        if let Some(previous) = &replaced {
            tracing::debug!(
                lane = %previous.cue.lane,
                time = previous.cue.time,
                "unresolved cue replaced"
            );
        }
        replaced.map(|active| active.cue)
    }

    /// Expires the active cue once `song_time` is past its late window.
    pub fn expire(&mut self, song_time: f64, late_window: f64) -> Option<Resolution> {
        let active = self.active.as_ref()?;
        if song_time <= active.cue.time + late_window || self.answered_this_prompt {
            return None;
        }
        let lane = active.cue.lane;
        self.active = None;
        Some(Resolution {
            lane,
            kind: ResolutionKind::Expired,
        })
    }

    /// Judges a lane press against the active cue. Presses while idle are
    /// ignored.
    pub fn submit(&mut self, lane: Lane) -> Option<Resolution> {
        let active = self.active.take()?;
        let kind = if lane == active.cue.lane {
            self.answered_this_prompt = true;
            ResolutionKind::Hit
        } else {
            ResolutionKind::Missed
        };
        Some(Resolution {
            lane: active.cue.lane,
            kind,
        })
    }
}
