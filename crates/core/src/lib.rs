//! Core library for the Lane Rhythm game.
//!
//! Cues loaded from a chart are activated against a song clock, judged
//! against lane presses, and misses drain a small pool of lives. Everything
//! is driven by [`GameFlowController::tick`], one call per frame, which
//! returns the [`GameEvent`]s a presentation layer reacts to.

pub mod audio;
pub mod chart;
pub mod config;
pub mod error;
pub mod event;
pub mod flow;
pub mod judge;
pub mod life;
pub mod timeline;

pub use audio::{AudioClock, ManualClock, SystemClock};
pub use chart::{Chart, Cue, CueSequence, Lane, LANE_COUNT};
pub use config::{GameConfig, JudgmentConfig};
pub use error::{Result, RhythmError};
pub use event::{dispatch, EventLog, FeedbackCue, GameEvent, PresentationSink, SessionReset};
pub use flow::{DeferredAction, FlowState, FrameInput, GameFlowController, Session};
pub use judge::{ActiveCue, JudgmentEngine, Resolution, ResolutionKind};
pub use life::{LifeOutcome, LifeToken, LifeTracker};
pub use timeline::{PromptScheduler, SongClock};
