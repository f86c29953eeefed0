//! Aural - Playback Control
//!
//! The playback state machine for Aural: which track is active, whether it
//! is playing, paused, waiting out a gap or being transcoded, and the
//! request chains that move between those states.
//!
//! This crate provides:
//! - Start / stop / track-completed request chains built from named steps
//! - Session tokens that invalidate late timer and transcoder callbacks
//! - Gaps before and after tracks, one-time or persistent
//! - Seeking (constant or percentage steps), A-B loops, chapter navigation
//! - Per-track remembered positions
//!
//! # Architecture
//!
//! `aural-playback` does no audio I/O. The [`PlaybackDelegate`] drives
//! collaborators supplied through traits:
//! - [`Transport`] plays a prepared file and reports position
//! - [`Transcoder`] converts formats the transport cannot read
//! - [`TrackReader`] validates and prepares files
//! - [`GapTimer`] schedules the end of a gap
//! - [`Sequencer`] picks the next track from a [`aural_core::Playlist`]
//!
//! Everything runs on one control thread. Timers and transcoders report
//! back as [`PlayerEvent`]s; the delegate publishes
//! [`PlaybackNotification`]s that callers drain after each operation.
//!
//! # Example
//!
//! ```rust
//! use aural_core::Chapter;
//! use aural_playback::{chapter_index_at, PlaybackParams};
//!
//! let chapters: Vec<Chapter> = (0..10)
//!     .map(|i| Chapter::new(format!("Part {i}"), i as f64 * 60.0, (i + 1) as f64 * 60.0))
//!     .collect();
//! assert_eq!(chapter_index_at(&chapters, 245.0), Some(4));
//!
//! let params = PlaybackParams::new().with_segment(60.0, 120.0).expect("valid segment");
//! assert!(params.playback_loop().is_some());
//! ```

#![forbid(unsafe_code)]

mod chain;
mod chapters;
mod context;
mod delegate;
mod seek;

pub mod error;
pub mod events;
pub mod params;
pub mod preferences;
pub mod profiles;
pub mod reader;
pub mod scheduler;
pub mod sequencer;
pub mod session;
pub mod transcoder;
pub mod transport;

pub use chain::ChainOutcome;
pub use chapters::{chapter_index_at, IndexedChapter};
pub use context::{ContextGap, RequestContext};
pub use delegate::{PlaybackComponents, PlaybackDelegate};
pub use error::{PlaybackError, Result};
pub use events::{PlaybackNotification, PlayerEvent, TranscodeResult};
pub use params::PlaybackParams;
pub use preferences::{
    PlaybackPreferences, RememberPosition, SeekLength, SeekSensitivity, UserInputMode,
};
pub use profiles::PlaybackProfiles;
pub use reader::{FileTrackReader, TrackReader, NATIVE_FORMATS};
pub use scheduler::{GapTimer, ThreadGapTimer};
pub use sequencer::{PlaylistSequencer, Sequencer};
pub use session::{PlaybackSession, SessionId, SessionRegistry};
pub use transcoder::{NoTranscoder, TranscodeStatus, Transcoder};
pub use transport::{PlayRequest, SeekResult, Transport};
