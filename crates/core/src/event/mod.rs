use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Lane, ResolutionKind};

/// Audio feedback to switch to when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackCue {
    Victory,
    Defeat,
}

/// Notification produced by the core during a tick, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The begin trigger was accepted. `scheduled` is false when no audio
    /// clock was available.
    Started { scheduled: bool },
    Activated { lane: Lane, lyric: Option<String> },
    Resolved { lane: Lane, kind: ResolutionKind },
    LifeLost { remaining: usize },
    GameOver,
    Won,
    Feedback(FeedbackCue),
    /// The terminal delay elapsed; a fresh session should be constructed.
    ResetRequested,
}

impl GameEvent {
    /// Stable name used for logging and counters.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Activated { .. } => "activated",
            Self::Resolved { .. } => "resolved",
            Self::LifeLost { .. } => "life_lost",
            Self::GameOver => "game_over",
            Self::Won => "won",
            Self::Feedback(_) => "feedback",
            Self::ResetRequested => "reset_requested",
        }
    }
}

/// Observer for core events. Must not feed back into core state.
pub trait PresentationSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Collaborator that builds a fresh session when asked.
pub trait SessionReset {
    fn reset_session(&mut self);
}

/// Forwards `events` to `sink` and invokes `reset` for every reset request.
pub fn dispatch<S, R>(events: &[GameEvent], sink: &mut S, reset: &mut R)
where
    S: PresentationSink + ?Sized,
    R: SessionReset + ?Sized,
{
    for event in events {
        sink.on_event(event);
        if matches!(event, GameEvent::ResetRequested) {
            reset.reset_session();
        }
    }
}

/// Sink that keeps every event it sees.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<GameEvent>,
    resolutions: HashMap<ResolutionKind, usize>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn resolution_count(&self, kind: ResolutionKind) -> usize {
        self.resolutions.get(&kind).copied().unwrap_or(0)
    }

    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name() == name).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.resolutions.clear();
    }
}

impl PresentationSink for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        if let GameEvent::Resolved { kind, .. } = event {
            *self.resolutions.entry(*kind).or_default() += 1;
        }
        self.events.push(event.clone());
    }
}
