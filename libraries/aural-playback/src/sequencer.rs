//! Sequencing: which playlist track plays next
//!
//! The sequencer only tracks a cursor into the playlist; it never mutates
//! the playlist itself.

use aural_core::{Playlist, RepeatMode, Track};
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::sync::Arc;

/// Track ordering policy consulted by the delegate and completion chain
pub trait Sequencer: Send {
    /// Playlist index of the current track
    fn current_index(&self) -> Option<usize>;

    /// Pick the first track to play when nothing is playing
    fn begin(&mut self, playlist: &dyn Playlist) -> Option<Arc<Track>>;

    /// Make `track` current (user picked it explicitly)
    fn select_track(&mut self, playlist: &dyn Playlist, track: &Track) -> Option<Arc<Track>>;

    /// Advance after natural completion; repeat-one replays
    fn subsequent(&mut self, playlist: &dyn Playlist) -> Option<Arc<Track>>;

    /// Advance on user skip
    fn next(&mut self, playlist: &dyn Playlist) -> Option<Arc<Track>>;

    /// Step back on user skip
    fn previous(&mut self, playlist: &dyn Playlist) -> Option<Arc<Track>>;

    /// Adjust the cursor after tracks at `indices` were removed
    fn tracks_removed(&mut self, playlist: &dyn Playlist, indices: &[usize]);

    fn playlist_cleared(&mut self);

    /// Playback ended; forget the cursor
    fn end(&mut self);
}

/// Sequencer over a flat playlist with repeat and shuffle
#[derive(Debug, Default)]
pub struct PlaylistSequencer {
    repeat: RepeatMode,
    shuffle: bool,
    cursor: Option<usize>,
    // Playlist indices in shuffled order, and our position in it
    order: Vec<usize>,
    order_pos: usize,
}

impl PlaylistSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repeat(mut self, repeat: RepeatMode) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.repeat = repeat;
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
        self.order.clear();
    }

    /// Rebuild the shuffle order, keeping `first` (if any) at the front
    fn reshuffle(&mut self, size: usize, first: Option<usize>) {
        let mut order: Vec<usize> = (0..size).filter(|&i| Some(i) != first).collect();
        order.shuffle(&mut thread_rng());
        if let Some(first) = first.filter(|&i| i < size) {
            order.insert(0, first);
        }
        self.order = order;
        self.order_pos = 0;
    }

    fn ensure_order(&mut self, size: usize) {
        if self.order.len() != size {
            self.reshuffle(size, self.cursor);
        }
    }

    fn select_index(&mut self, playlist: &dyn Playlist, index: usize) -> Option<Arc<Track>> {
        let track = playlist.track_at(index)?;
        self.cursor = Some(index);
        if self.shuffle {
            self.ensure_order(playlist.size());
            if let Some(pos) = self.order.iter().position(|&i| i == index) {
                self.order_pos = pos;
            }
        }
        Some(track)
    }

    fn step(&mut self, playlist: &dyn Playlist, forward: bool) -> Option<Arc<Track>> {
        let size = playlist.size();
        let current = self.cursor?;
        if size == 0 {
            return None;
        }

        let next = if self.shuffle {
            self.ensure_order(size);
            let pos = if forward {
                if self.order_pos + 1 < size {
                    self.order_pos + 1
                } else if self.repeat == RepeatMode::All {
                    // New pass, avoiding an immediate repeat of the current track
                    self.reshuffle(size, None);
                    if size > 1 && self.order[0] == current {
                        self.order.swap(0, 1);
                    }
                    0
                } else {
                    return None;
                }
            } else if self.order_pos > 0 {
                self.order_pos - 1
            } else {
                return None;
            };
            self.order_pos = pos;
            self.order[pos]
        } else if forward {
            if current + 1 < size {
                current + 1
            } else if self.repeat == RepeatMode::All {
                0
            } else {
                return None;
            }
        } else if current > 0 {
            current - 1
        } else if self.repeat == RepeatMode::All {
            size - 1
        } else {
            return None;
        };

        self.cursor = Some(next);
        playlist.track_at(next)
    }
}

impl Sequencer for PlaylistSequencer {
    fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    fn begin(&mut self, playlist: &dyn Playlist) -> Option<Arc<Track>> {
        let size = playlist.size();
        if size == 0 {
            return None;
        }
        let first = if self.shuffle {
            self.reshuffle(size, None);
            self.order[0]
        } else {
            0
        };
        self.select_index(playlist, first)
    }

    fn select_track(&mut self, playlist: &dyn Playlist, track: &Track) -> Option<Arc<Track>> {
        let index = playlist.index_of(track)?;
        self.select_index(playlist, index)
    }

    fn subsequent(&mut self, playlist: &dyn Playlist) -> Option<Arc<Track>> {
        if self.repeat == RepeatMode::One {
            return self.cursor.and_then(|i| playlist.track_at(i));
        }
        self.step(playlist, true)
    }

    fn next(&mut self, playlist: &dyn Playlist) -> Option<Arc<Track>> {
        self.step(playlist, true)
    }

    fn previous(&mut self, playlist: &dyn Playlist) -> Option<Arc<Track>> {
        self.step(playlist, false)
    }

    fn tracks_removed(&mut self, playlist: &dyn Playlist, indices: &[usize]) {
        self.order.clear();
        let Some(cursor) = self.cursor else { return };
        if indices.contains(&cursor) {
            self.cursor = None;
            return;
        }
        let shift = indices.iter().filter(|&&i| i < cursor).count();
        let adjusted = cursor - shift;
        self.cursor = (adjusted < playlist.size()).then_some(adjusted);
    }

    fn playlist_cleared(&mut self) {
        self.end();
    }

    fn end(&mut self) {
        self.cursor = None;
        self.order.clear();
        self.order_pos = 0;
    }
}
