/// Core error types for Aural
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using `AuralError`
pub type Result<T> = std::result::Result<T, AuralError>;

/// Core error type for Aural
#[derive(Error, Debug)]
pub enum AuralError {
    /// Metadata parsing errors
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A file referenced by a track or add request does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Playlist mutation was rejected
    #[error("Playlist error: {0}")]
    Playlist(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl AuralError {
    /// Create a metadata error
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        Self::FileNotFound(path.as_ref().to_path_buf())
    }

    /// Create a playlist error
    pub fn playlist(msg: impl Into<String>) -> Self {
        Self::Playlist(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity() {
        let err = AuralError::not_found("Track", "/music/a.flac");
        assert_eq!(err.to_string(), "Track not found: /music/a.flac");
    }

    #[test]
    fn file_not_found_displays_path() {
        let err = AuralError::file_not_found("/tmp/missing.mp3");
        assert_eq!(err.to_string(), "File not found: /tmp/missing.mp3");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: AuralError = io.into();
        assert!(matches!(err, AuralError::Io(_)));
    }
}
