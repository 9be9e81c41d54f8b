use std::{path::Path, time::Duration};

use lane_rhythm_core::{
    dispatch, AudioClock, Chart, EventLog, FrameInput, GameConfig, GameEvent, GameFlowController,
    Lane, ManualClock, PresentationSink, ResolutionKind, Result, RhythmError, SessionReset,
    SystemClock,
};
use serde::Deserialize;

/// A single scripted key press, in song seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedPress {
    pub time: f64,
    pub lane: Lane,
}

/// Time-ordered presses fed into the simulation.
#[derive(Debug, Clone, Default)]
pub struct PressScript {
    presses: Vec<ScriptedPress>,
    next: usize,
}

impl PressScript {
    pub fn new(mut presses: Vec<ScriptedPress>) -> Self {
        presses.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { presses, next: 0 }
    }

    /// Parses a JSON list of presses. Every press needs a finite,
    /// non-negative time.
    pub fn parse(text: &str) -> Result<Self> {
        let presses: Vec<ScriptedPress> = serde_json::from_str(text)?;
        if let Some((index, press)) = presses
            .iter()
            .enumerate()
            .find(|(_, press)| !press.time.is_finite() || press.time < 0.0)
        {
            return Err(RhythmError::msg(format!(
                "press {index} has invalid time {}",
                press.time
            )));
        }
        Ok(Self::new(presses))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Drains every press due at or before `song_time`.
    fn due(&mut self, song_time: f64) -> Vec<Lane> {
        let mut lanes = Vec::new();
        while let Some(press) = self.presses.get(self.next) {
            if press.time > song_time {
                break;
            }
            lanes.push(press.lane);
            self.next += 1;
        }
        lanes
    }
}

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub autoplay: bool,
    /// Pace frames against the wall clock instead of stepping instantly.
    pub realtime: bool,
    pub fps: u32,
    pub song_length: Option<f64>,
}

/// Frame clock for the simulation loop.
enum FrameClock {
    Stepped(ManualClock),
    RealTime(SystemClock),
}

impl FrameClock {
    fn new(realtime: bool) -> Self {
        if realtime {
            Self::RealTime(SystemClock::start())
        } else {
            Self::Stepped(ManualClock::new())
        }
    }

    /// Moves to the next frame.
    fn step(&mut self, frame: f64) {
        match self {
            Self::Stepped(clock) => clock.advance(frame),
            Self::RealTime(_) => std::thread::sleep(Duration::from_secs_f64(frame)),
        }
    }
}

impl AudioClock for FrameClock {
    fn now(&self) -> f64 {
        match self {
            Self::Stepped(clock) => clock.now(),
            Self::RealTime(clock) => clock.now(),
        }
    }
}

/// Logs every event and keeps a copy for the final summary.
#[derive(Default)]
struct ConsoleSink {
    log: EventLog,
}

impl PresentationSink for ConsoleSink {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Activated { lane, lyric } => {
                tracing::info!(%lane, lyric = lyric.as_deref().unwrap_or(""), "prompt")
            }
            GameEvent::Resolved { lane, kind } => tracing::info!(%lane, ?kind, "resolved"),
            GameEvent::LifeLost { remaining } => tracing::info!(remaining, "life lost"),
            other => tracing::info!(event = other.name(), "game event"),
        }
        self.log.on_event(event);
    }
}

/// Ends the simulation when the game asks for a fresh session.
#[derive(Default)]
struct StopOnReset {
    requested: bool,
}

impl SessionReset for StopOnReset {
    fn reset_session(&mut self) {
        self.requested = true;
    }
}

pub fn run(
    chart_path: &Path,
    config: GameConfig,
    mut script: PressScript,
    options: SimulationOptions,
) -> Result<()> {
    let chart = Chart::from_path_or_empty(chart_path);
    let song_length = options.song_length.unwrap_or_else(|| {
        chart.cues.last_time().unwrap_or(0.0) + config.judgment.late_window + 1.0
    });
    let frame = 1.0 / f64::from(options.fps.max(1));
    let start_delay = config.start_delay;
    let give_up_at = start_delay + song_length + config.reset_delay + 1.0;

    tracing::info!(
        cues = chart.cues.len(),
        song_length,
        autoplay = options.autoplay,
        realtime = options.realtime,
        "starting simulation"
    );

    let mut clock = FrameClock::new(options.realtime);
    let mut flow = GameFlowController::new(config, chart.cues)?;
    let mut sink = ConsoleSink::default();
    let mut reset = StopOnReset::default();

    let events = flow.begin(Some(clock.now()));
    dispatch(&events, &mut sink, &mut reset);

    while !reset.requested && clock.now() <= give_up_at {
        clock.step(frame);
        let now = clock.now();
        let song_time = flow.song_time(now);

        let mut input = FrameInput::at(now).finished(now - start_delay >= song_length);
        input.presses = script.due(song_time);
        if options.autoplay {
            if let Some(active) = flow.session().judge().active() {
                if song_time >= active.cue.time {
                    input.presses.push(active.cue.lane);
                }
            }
        }

        let events = flow.tick(&input);
        dispatch(&events, &mut sink, &mut reset);
    }

    let log = &sink.log;
    println!("hits:       {}", log.resolution_count(ResolutionKind::Hit));
    println!("misses:     {}", log.resolution_count(ResolutionKind::Missed));
    println!("expired:    {}", log.resolution_count(ResolutionKind::Expired));
    println!("lives left: {}", flow.session().lives().remaining());
    println!("outcome:    {:?}", flow.state());
    if !flow.state().is_terminal() {
        tracing::warn!("simulation ended before the session finished");
    }
    Ok(())
}
