use crate::{Cue, CueSequence};

/// Song position derived from an external audio clock.
#[derive(Debug, Default, Clone)]
pub struct SongClock {
    zero_point: Option<f64>,
}

impl SongClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `now + start_delay` as the song's zero-point.
    pub fn schedule(&mut self, now: f64, start_delay: f64) {
        self.zero_point = Some(now + start_delay);
    }

    pub fn is_scheduled(&self) -> bool {
        self.zero_point.is_some()
    }

    /// Seconds since the zero-point, clamped at zero. Always zero before
    /// [`SongClock::schedule`] is called.
    pub fn elapsed(&self, now: f64) -> f64 {
        match self.zero_point {
            Some(zero) => (now - zero).max(0.0),
            None => 0.0,
        }
    }
}

/// Walks a [`CueSequence`] and hands out each cue once it enters the
/// pre-show window.
#[derive(Debug, Default, Clone)]
pub struct PromptScheduler {
    next_cue: usize,
}

impl PromptScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next cue that has not been activated yet.
    pub fn next_index(&self) -> usize {
        self.next_cue
    }

    pub fn is_exhausted(&self, cues: &CueSequence) -> bool {
        self.next_cue >= cues.len()
    }

    /// Activates at most one cue per call.
    pub fn tick(&mut self, song_time: f64, cues: &CueSequence, early_show: f64) -> Option<Cue> {
        let cue = cues.get(self.next_cue)?;
        if cue.time - song_time <= early_show {
            self.next_cue += 1;
            Some(cue.clone())
        } else {
            None
        }
    }
}
