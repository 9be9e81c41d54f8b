use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Result, RhythmError};

/// Number of input lanes.
pub const LANE_COUNT: usize = 4;

/// One of the four input channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Lane(u8);

impl Lane {
    /// Every lane in ascending order.
    pub const ALL: [Lane; LANE_COUNT] = [Lane(0), Lane(1), Lane(2), Lane(3)];

    pub fn new(index: u8) -> Option<Self> {
        ((index as usize) < LANE_COUNT).then_some(Self(index))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for Lane {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Lane::new(value).ok_or_else(|| format!("lane {value} is outside 0..=3"))
    }
}

impl From<Lane> for u8 {
    fn from(lane: Lane) -> Self {
        lane.0
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A timed prompt requiring a specific lane input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Nominal hit time in song seconds.
    pub time: f64,
    pub lane: Lane,
    pub lyric: Option<String>,
}

impl Cue {
    pub fn new(time: f64, lane: Lane) -> Self {
        Self {
            time,
            lane,
            lyric: None,
        }
    }

    pub fn with_lyric(mut self, lyric: impl Into<String>) -> Self {
        let lyric = lyric.into();
        self.lyric = (!lyric.is_empty()).then_some(lyric);
        self
    }
}

/// Immutable, time-ordered list of cues.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueSequence {
    cues: Vec<Cue>,
}

impl CueSequence {
    /// Builds a sequence, sorting by time. Cues sharing a time keep their
    /// input order.
    pub fn new(mut cues: Vec<Cue>) -> Self {
        cues.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { cues }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Cue> {
        self.cues.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cue> {
        self.cues.iter()
    }

    /// Time of the final cue, if any.
    pub fn last_time(&self) -> Option<f64> {
        self.cues.last().map(|cue| cue.time)
    }

    /// Number of cues per lane, indexed by lane.
    pub fn lane_counts(&self) -> [usize; LANE_COUNT] {
        let mut counts = [0; LANE_COUNT];
        for cue in &self.cues {
            counts[cue.lane.index()] += 1;
        }
        counts
    }
}

/// A loaded chart: tempo metadata plus the cue sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chart {
    pub bpm: f32,
    pub song_offset: f32,
    pub cues: CueSequence,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartFile {
    #[serde(default)]
    bpm: f32,
    #[serde(default)]
    song_offset: f32,
    #[serde(default)]
    prompts: Vec<PromptEntry>,
}

#[derive(Debug, Deserialize)]
struct PromptEntry {
    time: f64,
    lane: i64,
    #[serde(default)]
    lyric: Option<String>,
}

impl Chart {
    /// Strictly parses a JSON chart. Any invalid prompt rejects the whole
    /// chart.
    pub fn parse(text: &str) -> Result<Self> {
        let file: ChartFile = serde_json::from_str(text)?;

        let mut cues = Vec::with_capacity(file.prompts.len());
        for (index, entry) in file.prompts.into_iter().enumerate() {
            if !entry.time.is_finite() || entry.time < 0.0 {
                return Err(RhythmError::InvalidTime {
                    index,
                    time: entry.time,
                });
            }
            let lane = u8::try_from(entry.lane)
                .ok()
                .and_then(Lane::new)
                .ok_or(RhythmError::InvalidLane {
                    index,
                    lane: entry.lane,
                })?;
            let cue = Cue::new(entry.time, lane);
            cues.push(match entry.lyric {
                Some(lyric) => cue.with_lyric(lyric),
                None => cue,
            });
        }

        Ok(Self {
            bpm: file.bpm,
            song_offset: file.song_offset,
            cues: CueSequence::new(cues),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parses a chart, falling back to an empty one on any failure.
    pub fn load_or_empty(text: &str) -> Self {
        Self::parse(text).unwrap_or_else(|err| {
            tracing::warn!(%err, "chart rejected, continuing without cues");
            Self::default()
        })
    }

    /// Reads a chart file, falling back to an empty one on any failure.
    pub fn from_path_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::from_path(path).unwrap_or_else(|err| {
            tracing::warn!(?path, %err, "chart unavailable, continuing without cues");
            Self::default()
        })
    }
}
