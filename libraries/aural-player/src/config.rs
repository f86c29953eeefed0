/// Player configuration
use crate::error::{PlayerError, Result};
use aural_core::MAX_GAP_SECONDS;
use aural_importer::ImportSettings;
use aural_playback::{PlaybackPreferences, NATIVE_FORMATS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound for an explicit batch size
const MAX_BATCH_SIZE: usize = 1024;

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct AuralConfig {
    #[serde(default)]
    pub playback: PlaybackPreferences,

    #[serde(default)]
    pub import: ImportSettings,

    #[serde(default)]
    pub profiles: ProfileSettings,

    #[serde(default)]
    pub transport: TransportSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProfileSettings {
    /// JSON file holding remembered positions; None keeps them in memory only
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_save_on_exit")]
    pub save_on_exit: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TransportSettings {
    /// Playback clock multiplier for the simulated transport
    #[serde(default = "default_speed")]
    pub speed: f64,

    /// Extensions played without transcoding
    #[serde(default = "default_native_formats")]
    pub native_formats: Vec<String>,

    /// Simulated time a pass-through transcode takes
    #[serde(default = "default_transcode_delay_ms")]
    pub transcode_delay_ms: u64,
}

impl AuralConfig {
    /// Load configuration from an optional TOML file, then `AURAL__*` env vars
    ///
    /// Nested keys use a double underscore, e.g.
    /// `AURAL__PLAYBACK__GAP_BETWEEN_TRACKS=true`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(PlayerError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("AURAL")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| PlayerError::Config(e.to_string()))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| PlayerError::Config(e.to_string()))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let playback = &self.playback;
        if !playback.primary_seek_length.is_valid() {
            return Err(PlayerError::Config(format!(
                "Invalid primary seek length: {:?}",
                playback.primary_seek_length
            )));
        }
        if !playback.secondary_seek_length.is_valid() {
            return Err(PlayerError::Config(format!(
                "Invalid secondary seek length: {:?}",
                playback.secondary_seek_length
            )));
        }

        let gap = playback.gap_between_tracks_duration;
        if !gap.is_finite() || gap < 0.0 {
            return Err(PlayerError::Config(format!(
                "Gap between tracks must be a non-negative number of seconds, got {gap}"
            )));
        }
        if gap > MAX_GAP_SECONDS {
            return Err(PlayerError::Config(format!(
                "Gap between tracks must be at most {MAX_GAP_SECONDS} seconds, got {gap}"
            )));
        }

        if self.import.batch_size > MAX_BATCH_SIZE {
            return Err(PlayerError::Config(format!(
                "Batch size {} exceeds {MAX_BATCH_SIZE} (use 0 for automatic)",
                self.import.batch_size
            )));
        }

        let speed = self.transport.speed;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(PlayerError::Config(format!(
                "Transport speed must be positive, got {speed}"
            )));
        }

        Ok(())
    }
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            path: None,
            save_on_exit: default_save_on_exit(),
        }
    }
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            native_formats: default_native_formats(),
            transcode_delay_ms: default_transcode_delay_ms(),
        }
    }
}

// Default values
fn default_save_on_exit() -> bool {
    true
}

fn default_speed() -> f64 {
    1.0
}

fn default_native_formats() -> Vec<String> {
    NATIVE_FORMATS.iter().map(|f| (*f).to_string()).collect()
}

fn default_transcode_delay_ms() -> u64 {
    250
}
