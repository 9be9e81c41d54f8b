use std::time::Instant;

/// Monotonic time source exposed by an audio device, in seconds.
///
/// Implementations must never go backward.
pub trait AudioClock {
    fn now(&self) -> f64;
}

/// Clock that only moves when told to. Drives simulations and tests
/// deterministically.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    time_seconds: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.time_seconds = 0.0;
    }

    pub fn advance(&mut self, delta: f64) {
        self.time_seconds += delta.max(0.0);
    }

    /// Jumps to `time_seconds`. Earlier values are ignored.
    pub fn set(&mut self, time_seconds: f64) {
        self.time_seconds = self.time_seconds.max(time_seconds);
    }
}

impl AudioClock for ManualClock {
    fn now(&self) -> f64 {
        self.time_seconds
    }
}

/// Wall clock backed by [`Instant`], measured from construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::start()
    }
}

impl AudioClock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}
