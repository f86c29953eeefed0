/// Playback state types
use crate::types::TrackId;
use serde::{Deserialize, Serialize};

/// Observable state of the player
///
/// Derived from which track slot is occupied: playing/paused track,
/// waiting (gap) track, transcoding track, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackState {
    #[default]
    NoTrack,
    Playing,
    Paused,
    Waiting,
    Transcoding,
}

impl PlaybackState {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoTrack => "noTrack",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Waiting => "waiting",
            Self::Transcoding => "transcoding",
        }
    }

    /// Whether the transport currently holds a track
    pub fn is_playing_or_paused(&self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }

    /// Whether a track is active in any form
    pub fn is_active(&self) -> bool {
        *self != Self::NoTrack
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Repeat mode for sequencing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    Off,
    All,
    One,
}

impl RepeatMode {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::All => "all",
            Self::One => "one",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "all" => Some(Self::All),
            "one" => Some(Self::One),
            _ => None,
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A region of the playing track that the transport repeats
///
/// Incomplete while `end_time` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackLoop {
    pub start_time: f64,
    pub end_time: Option<f64>,
}

impl PlaybackLoop {
    /// A loop with only its start point marked
    pub fn starting_at(start_time: f64) -> Self {
        Self {
            start_time,
            end_time: None,
        }
    }

    /// A complete loop spanning `[start_time, end_time]`
    pub fn complete(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time: Some(end_time),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.end_time.is_some()
    }

    /// Whether `position` lies inside the loop region
    ///
    /// An incomplete loop extends to the end of the track.
    pub fn contains(&self, position: f64) -> bool {
        position >= self.start_time && self.end_time.map_or(true, |end| position <= end)
    }

    /// Length of a complete loop
    pub fn duration(&self) -> Option<f64> {
        self.end_time.map(|end| end - self.start_time)
    }
}

/// Last-known playback position for a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackProfile {
    pub track_id: TrackId,

    /// Position in seconds
    pub last_position: f64,
}

impl PlaybackProfile {
    pub fn new(track_id: TrackId, last_position: f64) -> Self {
        Self {
            track_id,
            last_position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_strings() {
        assert_eq!(PlaybackState::NoTrack.to_string(), "noTrack");
        assert!(PlaybackState::Paused.is_playing_or_paused());
        assert!(!PlaybackState::Waiting.is_playing_or_paused());
        assert!(PlaybackState::Transcoding.is_active());
    }

    #[test]
    fn repeat_mode_round_trip() {
        for mode in [RepeatMode::Off, RepeatMode::All, RepeatMode::One] {
            assert_eq!(RepeatMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(RepeatMode::from_str("sometimes"), None);
    }

    #[test]
    fn incomplete_loop_extends_to_end() {
        let open = PlaybackLoop::starting_at(30.0);
        assert!(!open.is_complete());
        assert!(open.contains(10_000.0));
        assert!(!open.contains(29.0));

        let closed = PlaybackLoop::complete(30.0, 60.0);
        assert!(closed.contains(60.0));
        assert!(!closed.contains(60.5));
        assert_eq!(closed.duration(), Some(30.0));
    }
}
