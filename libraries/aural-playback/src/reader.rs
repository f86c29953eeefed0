//! Track reader: validation and preparation before playback

use crate::error::{PlaybackError, Result};
use aural_core::Track;
use std::collections::HashSet;
use std::fs::File;

/// Formats the desktop transport decodes without transcoding
pub const NATIVE_FORMATS: &[&str] = &[
    "aac", "ac3", "aif", "aifc", "aiff", "alac", "caf", "flac", "m4a", "m4b", "mp1", "mp2",
    "mp3", "wav",
];

/// File-level checks performed by the start chain
pub trait TrackReader: Send {
    /// Fail if the track's file cannot be played at all
    fn validate(&self, track: &Track) -> Result<()>;

    /// Whether the transport needs a transcoded copy of the file
    fn needs_transcoding(&self, track: &Track) -> bool;

    /// Load playback info for the track
    fn prepare(&mut self, track: &Track) -> Result<()>;
}

/// Reader that checks the filesystem and classifies formats by extension
#[derive(Debug, Clone)]
pub struct FileTrackReader {
    native_formats: HashSet<String>,
}

impl FileTrackReader {
    pub fn new() -> Self {
        Self::with_native_formats(NATIVE_FORMATS.iter().copied())
    }

    pub fn with_native_formats<'a>(formats: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            native_formats: formats.into_iter().map(str::to_ascii_lowercase).collect(),
        }
    }
}

impl Default for FileTrackReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackReader for FileTrackReader {
    fn validate(&self, track: &Track) -> Result<()> {
        let path = &track.file_path;
        let metadata = std::fs::metadata(path)
            .map_err(|e| PlaybackError::not_readable(path, e.to_string()))?;
        if !metadata.is_file() {
            return Err(PlaybackError::not_readable(path, "not a regular file"));
        }
        File::open(path).map_err(|e| PlaybackError::not_readable(path, e.to_string()))?;
        Ok(())
    }

    fn needs_transcoding(&self, track: &Track) -> bool {
        track
            .format()
            .map_or(true, |format| !self.native_formats.contains(&format))
    }

    fn prepare(&mut self, track: &Track) -> Result<()> {
        if track.duration <= 0.0 {
            tracing::debug!("Preparing {} without a known duration", track.id);
        }
        Ok(())
    }
}
