//! Player error types

use aural_playback::PlaybackError;
use thiserror::Error;

/// Player errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// The control thread is gone
    #[error("Player control thread is not running")]
    ChannelClosed,

    /// A player thread could not be started
    #[error("Failed to spawn {name} thread: {source}")]
    ThreadSpawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
