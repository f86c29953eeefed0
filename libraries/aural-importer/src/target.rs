//! Where added tracks go

use aural_core::{FlatPlaylist, Playlist, Track, TrackAddResult};
use aural_playback::PlaybackDelegate;
use std::path::Path;
use std::sync::Arc;

/// Insertion side of the pipeline
pub trait AddTarget {
    /// The track already present at `path`
    fn find_track(&self, path: &Path) -> Option<Arc<Track>>;

    fn has_track(&self, path: &Path) -> bool {
        self.find_track(path).is_some()
    }

    /// Append `track`; None if the playlist already holds its path
    fn add_track(&mut self, track: Track) -> Option<TrackAddResult>;

    /// Start playback of a freshly inserted track
    fn autoplay(&mut self, track: Arc<Track>, interrupt: bool);
}

impl AddTarget for FlatPlaylist {
    fn find_track(&self, path: &Path) -> Option<Arc<Track>> {
        self.find_by_path(path)
    }

    fn has_track(&self, path: &Path) -> bool {
        Playlist::has_track(self, path)
    }

    fn add_track(&mut self, track: Track) -> Option<TrackAddResult> {
        Playlist::add_track(self, track)
    }

    fn autoplay(&mut self, _track: Arc<Track>, _interrupt: bool) {}
}

impl AddTarget for PlaybackDelegate {
    fn find_track(&self, path: &Path) -> Option<Arc<Track>> {
        self.playlist().find_by_path(path)
    }

    fn has_track(&self, path: &Path) -> bool {
        self.playlist().has_track(path)
    }

    fn add_track(&mut self, track: Track) -> Option<TrackAddResult> {
        self.playlist_mut().add_track(track)
    }

    fn autoplay(&mut self, track: Arc<Track>, interrupt: bool) {
        PlaybackDelegate::autoplay(self, Some(track), interrupt);
    }
}
