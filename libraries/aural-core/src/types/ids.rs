/// ID types for Aural entities
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Track identifier
///
/// Tracks are identified by their file path, so the same file added twice
/// resolves to the same identity (and the same playback profile).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the ID of the track stored at `path`
    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&Path> for TrackId {
    fn from(path: &Path) -> Self {
        Self::from_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn same_path_same_id() {
        let a = TrackId::from_path(&PathBuf::from("/music/a.mp3"));
        let b = TrackId::from(PathBuf::from("/music/a.mp3").as_path());
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "/music/a.mp3");
    }

    #[test]
    fn serializes_transparently() {
        let id = TrackId::new("/music/a.mp3");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"/music/a.mp3\"");
    }
}
