//! Error types for the importer

use std::path::PathBuf;
use thiserror::Error;

/// Why one item could not be added
///
/// Collected per file; an add operation never fails as a whole.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Metadata error for {}: {message}", path.display())]
    Metadata { path: PathBuf, message: String },

    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Playlist file {} unreadable: {message}", path.display())]
    PlaylistFile { path: PathBuf, message: String },

    #[error("IO error at {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl ImportError {
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// The path the error is about
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::FileNotFound(path) | Self::UnsupportedFormat(path) => path,
            Self::Metadata { path, .. } | Self::PlaylistFile { path, .. } | Self::Io { path, .. } => {
                path
            }
        }
    }
}
