//! Error types for playback control

use aural_core::AuralError;
use std::path::PathBuf;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The requested track's file is missing or unreadable
    #[error("Track not readable: {}: {reason}", path.display())]
    TrackNotReadable { path: PathBuf, reason: String },

    /// No track is active
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Request parameters violate their invariants
    #[error("Invalid playback parameters: {0}")]
    InvalidParams(String),

    /// The transport refused a command
    #[error("Transport error: {0}")]
    Transport(String),

    /// Transcoding could not produce a playable file
    #[error("Transcoding failed: {0}")]
    Transcoding(String),

    /// Core error
    #[error(transparent)]
    Core(#[from] AuralError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlaybackError {
    pub fn not_readable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::TrackNotReadable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
