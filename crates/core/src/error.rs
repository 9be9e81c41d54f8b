/// Result alias that carries the custom [`RhythmError`] type.
pub type Result<T> = std::result::Result<T, RhythmError>;

/// Common error type for the core crate.
///
/// Gameplay itself never fails; these errors only surface while loading
/// charts, configuration or input scripts.
#[derive(Debug, thiserror::Error)]
pub enum RhythmError {
    /// Free-form error message, used for input scripts.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON in a chart, config or input script.
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    /// A chart prompt referenced a lane outside `0..=3`.
    #[error("prompt {index} uses lane {lane}, expected 0..=3")]
    InvalidLane { index: usize, lane: i64 },
    /// A chart prompt had a negative or non-finite time.
    #[error("prompt {index} has invalid time {time}")]
    InvalidTime { index: usize, time: f64 },
    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl RhythmError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}
