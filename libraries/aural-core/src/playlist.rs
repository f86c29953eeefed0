//! In-memory playlist
//!
//! [`FlatPlaylist`] keeps tracks in insertion order and gaps in a side table
//! keyed by track identity.

use crate::{
    traits::{Playlist, TrackAddResult},
    types::{GapPersistence, GapPosition, PlaybackGap, Track, TrackId},
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
struct TrackGaps {
    before: Option<PlaybackGap>,
    after: Option<PlaybackGap>,
}

impl TrackGaps {
    fn slot(&mut self, position: GapPosition) -> &mut Option<PlaybackGap> {
        match position {
            GapPosition::BeforeTrack => &mut self.before,
            GapPosition::AfterTrack => &mut self.after,
        }
    }

    fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }
}

/// Ordered, duplicate-free list of tracks
#[derive(Debug, Default)]
pub struct FlatPlaylist {
    tracks: Vec<Arc<Track>>,
    paths: HashSet<PathBuf>,
    gaps: HashMap<TrackId, TrackGaps>,
}

impl FlatPlaylist {
    /// Create an empty playlist
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a playlist from `tracks`, dropping duplicates
    pub fn from_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut playlist = Self::new();
        for track in tracks {
            playlist.add_track(track);
        }
        playlist
    }

    /// All tracks in order
    pub fn tracks(&self) -> &[Arc<Track>] {
        &self.tracks
    }

    fn contains_id(&self, id: &TrackId) -> bool {
        self.tracks.iter().any(|t| &t.id == id)
    }
}

impl Playlist for FlatPlaylist {
    fn size(&self) -> usize {
        self.tracks.len()
    }

    fn track_at(&self, index: usize) -> Option<Arc<Track>> {
        self.tracks.get(index).cloned()
    }

    fn index_of(&self, track: &Track) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track.id)
    }

    fn has_track(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    fn find_by_path(&self, path: &Path) -> Option<Arc<Track>> {
        if !self.paths.contains(path) {
            return None;
        }
        self.tracks.iter().find(|t| t.is_at(path)).cloned()
    }

    fn add_track(&mut self, track: Track) -> Option<TrackAddResult> {
        if !self.paths.insert(track.file_path.clone()) {
            return None;
        }
        let track = Arc::new(track);
        self.tracks.push(Arc::clone(&track));
        Some(TrackAddResult {
            track,
            index: self.tracks.len() - 1,
        })
    }

    fn remove_tracks(&mut self, indices: &[usize]) -> Vec<Arc<Track>> {
        let mut sorted: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.tracks.len())
            .collect();
        sorted.sort_unstable();
        sorted.dedup();

        let mut removed = Vec::with_capacity(sorted.len());
        for index in sorted.into_iter().rev() {
            let track = self.tracks.remove(index);
            self.paths.remove(&track.file_path);
            self.gaps.remove(&track.id);
            removed.push(track);
        }
        removed.reverse();
        removed
    }

    fn clear(&mut self) {
        self.tracks.clear();
        self.paths.clear();
        self.gaps.clear();
    }

    fn gap_before_track(&self, track: &Track) -> Option<PlaybackGap> {
        self.gaps.get(&track.id).and_then(|g| g.before)
    }

    fn gap_after_track(&self, track: &Track) -> Option<PlaybackGap> {
        self.gaps.get(&track.id).and_then(|g| g.after)
    }

    fn set_gap(&mut self, track: &Track, gap: PlaybackGap) -> bool {
        if !self.contains_id(&track.id) {
            return false;
        }
        *self
            .gaps
            .entry(track.id.clone())
            .or_default()
            .slot(gap.position) = Some(gap);
        true
    }

    fn remove_gap(&mut self, track: &Track, position: GapPosition) -> Option<PlaybackGap> {
        let gaps = self.gaps.get_mut(&track.id)?;
        let removed = gaps.slot(position).take();
        if gaps.is_empty() {
            self.gaps.remove(&track.id);
        }
        removed
    }

    fn drop_session_gaps(&mut self) {
        for gaps in self.gaps.values_mut() {
            for slot in [&mut gaps.before, &mut gaps.after] {
                if slot.is_some_and(|gap| gap.persistence == GapPersistence::TillAppExits) {
                    *slot = None;
                }
            }
        }
        self.gaps.retain(|_, gaps| !gaps.is_empty());
    }
}
