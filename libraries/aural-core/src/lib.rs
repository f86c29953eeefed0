//! Aural Core
//!
//! Platform-agnostic domain types, collaborator traits, and error handling
//! shared by the Aural playback crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Chapter`, `PlaybackGap`, `PlaybackLoop`, `PlaybackState`, ...
//! - **Core Traits**: `Playlist` (ordered track repository), `MetadataLoader`
//! - **Error Handling**: Unified `AuralError` and `Result` types
//!
//! An in-memory [`FlatPlaylist`] implements `Playlist` for headless use and tests.
//!
//! # Example
//!
//! ```rust
//! use aural_core::{FlatPlaylist, Playlist, PlaybackGap, Track};
//! use std::path::PathBuf;
//!
//! let mut playlist = FlatPlaylist::new();
//! let added = playlist
//!     .add_track(Track::new(PathBuf::from("/music/song.mp3")))
//!     .expect("first insert");
//!
//! playlist.set_gap(&added.track, PlaybackGap::before(3.0));
//! assert_eq!(playlist.gap_before_track(&added.track).map(|g| g.duration), Some(3.0));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod playlist;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{AuralError, Result};
pub use playlist::FlatPlaylist;
pub use traits::{MetadataLoader, Playlist, TrackAddResult};

pub use types::{
    clamp_gap_seconds, Chapter, GapPersistence, GapPosition, PlaybackGap, PlaybackLoop,
    PlaybackProfile, PlaybackState, RepeatMode, Track, TrackId, TrackMetadata, MAX_GAP_SECONDS,
};
