//! Per-operation bookkeeping

use crate::error::ImportError;
use crate::events::AddProgress;
use aural_core::TrackAddResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whether to start playing what gets added
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoplayOptions {
    pub autoplay: bool,

    /// Replace a playing track instead of only starting when idle
    pub interrupt: bool,
}

impl AutoplayOptions {
    pub fn play_now() -> Self {
        Self {
            autoplay: true,
            interrupt: true,
        }
    }

    pub fn when_idle() -> Self {
        Self {
            autoplay: true,
            interrupt: false,
        }
    }
}

/// State of one `add_files` call
#[derive(Debug, Default)]
pub struct TrackAddSession {
    /// Grows as directories and playlist files expand
    pub total_tracks: usize,
    pub tracks_processed: usize,
    pub tracks_added: usize,
    pub results: Vec<TrackAddResult>,
    pub errors: Vec<ImportError>,
    pub autoplay: AutoplayOptions,
    pub added_top_level_items: Vec<PathBuf>,
    autoplay_done: bool,
}

impl TrackAddSession {
    pub fn new(autoplay: AutoplayOptions) -> Self {
        Self {
            autoplay,
            ..Self::default()
        }
    }

    pub fn progress(&self) -> AddProgress {
        AddProgress {
            added: self.tracks_added,
            total: self.total_tracks,
        }
    }

    pub(crate) fn record_error(&mut self, error: ImportError) {
        self.tracks_processed += 1;
        self.errors.push(error);
    }

    /// True exactly once, for the first insertion, when autoplay was asked for
    pub(crate) fn take_autoplay(&mut self) -> bool {
        if self.autoplay.autoplay && !self.autoplay_done {
            self.autoplay_done = true;
            true
        } else {
            false
        }
    }
}
