//! Playback preferences
//!
//! Serde structs with per-field defaults so partial config files and
//! environment overrides deserialize cleanly.

use serde::{Deserialize, Serialize};

/// Which tracks get their last position remembered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RememberPosition {
    /// Never save positions
    Disabled,
    /// Only tracks that already have a profile (saved explicitly by the user)
    #[default]
    IndividualTracks,
    /// Every track that is stopped or finished
    AllTracks,
}

/// How far a seek step moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum SeekLength {
    /// Fixed number of seconds
    Constant(f64),
    /// Percentage of the track's duration
    Percentage(f64),
}

impl SeekLength {
    /// Seek step in seconds for a track of `duration` seconds
    pub fn resolve(&self, duration: f64) -> f64 {
        match *self {
            Self::Constant(seconds) => seconds,
            Self::Percentage(percent) => duration * percent / 100.0,
        }
    }

    pub fn is_valid(&self) -> bool {
        let value = match *self {
            Self::Constant(v) | Self::Percentage(v) => v,
        };
        value.is_finite() && value > 0.0
    }
}

/// Multiplier applied to seek steps while a key or gesture is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeekSensitivity {
    Low,
    #[default]
    Medium,
    High,
}

impl SeekSensitivity {
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Low => 0.5,
            Self::Medium => 1.0,
            Self::High => 2.0,
        }
    }
}

/// Whether a seek came from a discrete action or a held/continuous input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserInputMode {
    #[default]
    Discrete,
    Continuous,
}

/// Preferences consulted by the playback delegate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackPreferences {
    #[serde(default)]
    pub remember_last_position: RememberPosition,

    #[serde(default = "default_primary_seek_length")]
    pub primary_seek_length: SeekLength,

    #[serde(default = "default_secondary_seek_length")]
    pub secondary_seek_length: SeekLength,

    #[serde(default)]
    pub continuous_seek_sensitivity: SeekSensitivity,

    /// Insert silence between tracks that finish naturally
    #[serde(default)]
    pub gap_between_tracks: bool,

    #[serde(default = "default_gap_between_tracks_duration")]
    pub gap_between_tracks_duration: f64,
}

impl PlaybackPreferences {
    /// Primary seek step for `duration`, scaled for continuous input
    pub fn primary_seek_step(&self, duration: f64, mode: UserInputMode) -> f64 {
        let step = self.primary_seek_length.resolve(duration);
        match mode {
            UserInputMode::Discrete => step,
            UserInputMode::Continuous => step * self.continuous_seek_sensitivity.multiplier(),
        }
    }

    pub fn secondary_seek_step(&self, duration: f64) -> f64 {
        self.secondary_seek_length.resolve(duration)
    }

    /// Implicit gap duration, if the preference is on
    pub fn implicit_gap(&self) -> Option<f64> {
        (self.gap_between_tracks && self.gap_between_tracks_duration > 0.0)
            .then_some(self.gap_between_tracks_duration)
    }
}

impl Default for PlaybackPreferences {
    fn default() -> Self {
        Self {
            remember_last_position: RememberPosition::default(),
            primary_seek_length: default_primary_seek_length(),
            secondary_seek_length: default_secondary_seek_length(),
            continuous_seek_sensitivity: SeekSensitivity::default(),
            gap_between_tracks: false,
            gap_between_tracks_duration: default_gap_between_tracks_duration(),
        }
    }
}

// Default values
fn default_primary_seek_length() -> SeekLength {
    SeekLength::Constant(5.0)
}

fn default_secondary_seek_length() -> SeekLength {
    SeekLength::Constant(30.0)
}

fn default_gap_between_tracks_duration() -> f64 {
    5.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let prefs = PlaybackPreferences::default();
        assert_eq!(prefs.primary_seek_step(300.0, UserInputMode::Discrete), 5.0);
        assert_eq!(prefs.secondary_seek_step(300.0), 30.0);
        assert!(prefs.implicit_gap().is_none());
    }

    #[test]
    fn percentage_seek_scales_with_duration() {
        let prefs = PlaybackPreferences {
            primary_seek_length: SeekLength::Percentage(2.0),
            continuous_seek_sensitivity: SeekSensitivity::High,
            ..PlaybackPreferences::default()
        };
        assert_eq!(prefs.primary_seek_step(200.0, UserInputMode::Discrete), 4.0);
        assert_eq!(prefs.primary_seek_step(200.0, UserInputMode::Continuous), 8.0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let prefs: PlaybackPreferences =
            serde_json::from_str(r#"{"gap_between_tracks": true}"#).unwrap();
        assert_eq!(prefs.implicit_gap(), Some(5.0));
        assert_eq!(prefs.remember_last_position, RememberPosition::IndividualTracks);
    }

    #[test]
    fn seek_length_is_tagged() {
        let length: SeekLength =
            serde_json::from_str(r#"{"kind": "percentage", "value": 10.0}"#).unwrap();
        assert_eq!(length, SeekLength::Percentage(10.0));
        assert!(length.is_valid());
        assert!(!SeekLength::Constant(-1.0).is_valid());
    }
}
