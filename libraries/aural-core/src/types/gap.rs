/// Inter-track silence gaps
use serde::{Deserialize, Serialize};

/// Longest silence a gap may hold (one day)
pub const MAX_GAP_SECONDS: f64 = 86_400.0;

/// Clamp a gap or delay length into `[0, MAX_GAP_SECONDS]`; NaN becomes 0
pub fn clamp_gap_seconds(seconds: f64) -> f64 {
    if seconds.is_nan() {
        0.0
    } else {
        seconds.clamp(0.0, MAX_GAP_SECONDS)
    }
}

/// Which side of its track a gap is played on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GapPosition {
    BeforeTrack,
    AfterTrack,
}

/// How long a gap stays attached to its track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GapPersistence {
    /// Removed from the playlist the first time it is played
    OneTime,
    /// Kept until the player shuts down
    TillAppExits,
    /// Kept across restarts
    #[default]
    Persistent,
    /// Derived from preferences, never stored on a track
    Implicit,
}

/// A configured silence inserted before or after a track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackGap {
    /// Silence duration in seconds
    pub duration: f64,

    pub position: GapPosition,

    pub persistence: GapPersistence,
}

impl PlaybackGap {
    /// Create a new gap; the duration is clamped by [`clamp_gap_seconds`]
    pub fn new(duration: f64, position: GapPosition, persistence: GapPersistence) -> Self {
        Self {
            duration: clamp_gap_seconds(duration),
            position,
            persistence,
        }
    }

    /// A persistent gap played before its track
    pub fn before(duration: f64) -> Self {
        Self::new(duration, GapPosition::BeforeTrack, GapPersistence::Persistent)
    }

    /// A persistent gap played after its track
    pub fn after(duration: f64) -> Self {
        Self::new(duration, GapPosition::AfterTrack, GapPersistence::Persistent)
    }

    /// A gap synthesized from the "gap between tracks" preference
    pub fn implicit(duration: f64) -> Self {
        Self::new(duration, GapPosition::BeforeTrack, GapPersistence::Implicit)
    }

    /// Builder-style persistence setter
    pub fn with_persistence(mut self, persistence: GapPersistence) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn is_one_time(&self) -> bool {
        self.persistence == GapPersistence::OneTime
    }
}
