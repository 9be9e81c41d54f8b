use serde::{Deserialize, Serialize};

use crate::{
    CueSequence, FeedbackCue, GameConfig, GameEvent, JudgmentEngine, Lane, LifeOutcome,
    LifeTracker, PromptScheduler, Resolution, Result, SongClock, LANE_COUNT,
};

/// Top-level session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowState {
    NotStarted,
    Playing,
    Won,
    Lost,
}

impl FlowState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One-shot timer checked every tick instead of a suspended wait.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredAction {
    fire_at: f64,
    fired: bool,
}

impl DeferredAction {
    pub fn new(now: f64, delay: f64) -> Self {
        Self {
            fire_at: now + delay,
            fired: false,
        }
    }

    pub fn fire_at(&self) -> f64 {
        self.fire_at
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Returns true on the first poll at or after the fire time, false
    /// otherwise.
    pub fn poll(&mut self, now: f64) -> bool {
        if self.fired || now < self.fire_at {
            return false;
        }
        self.fired = true;
        true
    }
}

/// Per-frame input for [`GameFlowController::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Audio clock reading for this frame, in seconds.
    pub now: f64,
    /// Lanes pressed since the previous frame.
    pub presses: Vec<Lane>,
    /// Whether the song has stopped playing.
    pub playback_finished: bool,
}

impl FrameInput {
    pub fn at(now: f64) -> Self {
        Self {
            now,
            ..Default::default()
        }
    }

    pub fn press(mut self, lane: Lane) -> Self {
        self.presses.push(lane);
        self
    }

    pub fn finished(mut self, playback_finished: bool) -> Self {
        self.playback_finished = playback_finished;
        self
    }
}

/// Mutable state of a single play session.
#[derive(Debug, Clone)]
pub struct Session {
    started: bool,
    scheduled: bool,
    song_clock: SongClock,
    scheduler: PromptScheduler,
    judge: JudgmentEngine,
    lives: LifeTracker,
    pending_reset: Option<DeferredAction>,
}

impl Session {
    pub fn new(num_lives: u32) -> Self {
        Self {
            started: false,
            scheduled: false,
            song_clock: SongClock::new(),
            scheduler: PromptScheduler::new(),
            judge: JudgmentEngine::new(),
            lives: LifeTracker::new(num_lives),
            pending_reset: None,
        }
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn scheduled(&self) -> bool {
        self.scheduled
    }

    /// Index of the next cue that has not been activated.
    pub fn prompt_index(&self) -> usize {
        self.scheduler.next_index()
    }

    pub fn answered_this_prompt(&self) -> bool {
        self.judge.answered_this_prompt()
    }

    pub fn judge(&self) -> &JudgmentEngine {
        &self.judge
    }

    pub fn lives(&self) -> &LifeTracker {
        &self.lives
    }

    pub fn pending_reset(&self) -> Option<&DeferredAction> {
        self.pending_reset.as_ref()
    }
}

/// Composes the clock, scheduler, judge and life tracker into one
/// tick-driven game.
#[derive(Debug, Clone)]
pub struct GameFlowController {
    config: GameConfig,
    cues: CueSequence,
    state: FlowState,
    session: Session,
}

impl GameFlowController {
    /// Builds a controller for a fresh session. Fails if `config` does not
    /// validate, e.g. a session with no lives could never be lost.
    pub fn new(config: GameConfig, cues: CueSequence) -> Result<Self> {
        config.validate()?;
        let session = Session::new(config.num_lives);
        Ok(Self {
            config,
            cues,
            state: FlowState::NotStarted,
            session,
        })
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cues(&self) -> &CueSequence {
        &self.cues
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current song time including the global offset.
    pub fn song_time(&self, now: f64) -> f64 {
        self.session.song_clock.elapsed(now) + self.config.judgment.offset_seconds()
    }

    /// Handles the begin trigger. `now` is the audio clock reading, or
    /// `None` when no playback backend is available, in which case the
    /// session plays without ever scheduling cues.
    pub fn begin(&mut self, now: Option<f64>) -> Vec<GameEvent> {
        if self.state != FlowState::NotStarted {
            return Vec::new();
        }

        self.session.started = true;
        self.state = FlowState::Playing;
        match now {
            Some(now) => {
                self.session.song_clock.schedule(now, self.config.start_delay);
                self.session.scheduled = true;
                tracing::info!(cues = self.cues.len(), "session started");
            }
            None => tracing::warn!("no audio clock available, cues will not be scheduled"),
        }

        vec![GameEvent::Started {
            scheduled: self.session.scheduled,
        }]
    }

    /// Advances the game by one frame.
    ///
    /// Within a frame the order is: activation, expiry, input, win check.
    pub fn tick(&mut self, input: &FrameInput) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if self.state == FlowState::Playing && self.session.scheduled {
            self.play_frame(input, &mut events);
        }

        if let Some(reset) = self.session.pending_reset.as_mut() {
            if reset.poll(input.now) {
                tracing::info!(state = ?self.state, "requesting session reset");
                events.push(GameEvent::ResetRequested);
            }
        }

        events
    }

    fn play_frame(&mut self, input: &FrameInput, events: &mut Vec<GameEvent>) {
        let song_time = self.song_time(input.now);
        let judgment = &self.config.judgment;

        if let Some(cue) = self
            .session
            .scheduler
            .tick(song_time, &self.cues, judgment.early_show)
        {
            tracing::debug!(lane = %cue.lane, time = cue.time, song_time, "cue activated");
            events.push(GameEvent::Activated {
                lane: cue.lane,
                lyric: cue.lyric.clone(),
            });
            self.session.judge.activate(cue);
        }

        if let Some(resolution) = self.session.judge.expire(song_time, judgment.late_window) {
            self.apply_resolution(resolution, input.now, events);
        }

        let mut pressed = [false; LANE_COUNT];
        for lane in &input.presses {
            pressed[lane.index()] = true;
        }
        for lane in Lane::ALL.into_iter().filter(|lane| pressed[lane.index()]) {
            if self.state != FlowState::Playing {
                return;
            }
            if let Some(resolution) = self.session.judge.submit(lane) {
                self.apply_resolution(resolution, input.now, events);
            }
        }

        if self.state == FlowState::Playing
            && input.playback_finished
            && self.session.scheduler.is_exhausted(&self.cues)
        {
            tracing::info!(lives = self.session.lives.remaining(), "song cleared");
            events.push(GameEvent::Won);
            self.finish(FlowState::Won, FeedbackCue::Victory, input.now, events);
        }
    }

    fn apply_resolution(&mut self, resolution: Resolution, now: f64, events: &mut Vec<GameEvent>) {
        tracing::debug!(lane = %resolution.lane, kind = ?resolution.kind, "cue resolved");
        events.push(GameEvent::Resolved {
            lane: resolution.lane,
            kind: resolution.kind,
        });
        if !resolution.kind.costs_life() {
            return;
        }

        match self.session.lives.consume() {
            LifeOutcome::Lost { remaining, .. } => {
                events.push(GameEvent::LifeLost { remaining });
            }
            LifeOutcome::Depleted { .. } => {
                tracing::info!("out of lives");
                events.push(GameEvent::LifeLost { remaining: 0 });
                events.push(GameEvent::GameOver);
                self.finish(FlowState::Lost, FeedbackCue::Defeat, now, events);
            }
            LifeOutcome::AlreadyDepleted => {}
        }
    }

    fn finish(
        &mut self,
        outcome: FlowState,
        feedback: FeedbackCue,
        now: f64,
        events: &mut Vec<GameEvent>,
    ) {
        self.state = outcome;
        self.session.started = false;
        self.session.pending_reset = Some(DeferredAction::new(now, self.config.reset_delay));
        events.push(GameEvent::Feedback(feedback));
    }
}
