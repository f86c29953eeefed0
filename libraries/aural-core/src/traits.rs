/// Collaborator traits consumed by the playback core
use crate::{
    error::Result,
    types::{GapPosition, PlaybackGap, Track, TrackMetadata},
};
use std::path::Path;
use std::sync::Arc;

/// Metadata loader trait
///
/// Implementers extract the primary info (tags, duration, chapters) needed
/// to list and play a track. Loaders are shared across the worker threads of
/// a metadata batch, so they must be `Sync`.
pub trait MetadataLoader: Send + Sync {
    /// Load primary metadata from an audio file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    fn load_primary(&self, path: &Path) -> Result<TrackMetadata>;

    /// Whether the loader recognizes `path` as an audio file by extension
    fn is_supported(&self, path: &Path) -> bool;
}

/// Result of a successful playlist insertion
#[derive(Debug, Clone)]
pub struct TrackAddResult {
    /// The inserted (now shared) track
    pub track: Arc<Track>,

    /// Index the track was inserted at
    pub index: usize,
}

/// Ordered track repository
///
/// The playlist owns its tracks; the rest of the system holds `Arc` handles.
pub trait Playlist: Send {
    /// Number of tracks
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Track at `index`
    fn track_at(&self, index: usize) -> Option<Arc<Track>>;

    /// Index of `track`, matched by identity
    fn index_of(&self, track: &Track) -> Option<usize>;

    /// Whether a track for the file at `path` is already present
    fn has_track(&self, path: &Path) -> bool;

    /// Find the track for the file at `path`
    fn find_by_path(&self, path: &Path) -> Option<Arc<Track>>;

    /// Append a track, or `None` if an equal track is already present
    fn add_track(&mut self, track: Track) -> Option<TrackAddResult>;

    /// Remove tracks at `indices`, returning the ones actually removed
    fn remove_tracks(&mut self, indices: &[usize]) -> Vec<Arc<Track>>;

    /// Remove all tracks and gaps
    fn clear(&mut self);

    /// Gap configured to play before `track`
    fn gap_before_track(&self, track: &Track) -> Option<PlaybackGap>;

    /// Gap configured to play after `track`
    fn gap_after_track(&self, track: &Track) -> Option<PlaybackGap>;

    /// Attach `gap` to `track` on the side named by `gap.position`
    ///
    /// Returns `false` if the track is not in the playlist.
    fn set_gap(&mut self, track: &Track, gap: PlaybackGap) -> bool;

    /// Detach the gap on `position` side of `track`
    fn remove_gap(&mut self, track: &Track, position: GapPosition) -> Option<PlaybackGap>;

    /// Drop gaps that only live as long as the running player
    fn drop_session_gaps(&mut self);
}
