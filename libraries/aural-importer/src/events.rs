//! Events published by the track-add pipeline

use crate::error::ImportError;
use aural_core::Track;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Running count of an add operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AddProgress {
    pub added: usize,
    pub total: usize,
}

/// Pipeline progress, in publication order
#[derive(Debug, Clone, PartialEq)]
pub enum TrackAddEvent {
    /// Collection is about to start for `items` top-level paths
    StartedAdding { items: usize },

    /// One track was inserted
    TrackAdded {
        track: Arc<Track>,
        index: usize,
        progress: AddProgress,
    },

    /// Top-level paths that contributed at least one track
    ItemsAdded(Vec<PathBuf>),

    /// Every batch has been processed
    DoneAdding(AddProgress),

    /// Items that could not be added
    TracksNotAdded(Vec<ImportError>),
}
