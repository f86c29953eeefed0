//! Aural Track Importer
//!
//! Adds files, directories and playlist files to a playlist.
//!
//! # Features
//!
//! - Recursive directory expansion and m3u/m3u8 playlist expansion
//! - Duplicate and missing-file detection before any metadata is read
//! - Metadata loading in bounded batches, one worker thread per file
//! - Ordered insertion with incremental progress events
//! - Autoplay of the first inserted track
//!
//! # Architecture
//!
//! - `collect`: the synchronous collection phase (paths → candidates)
//! - `adder`: batching, metadata loading and insertion
//! - `playlist_file`: m3u parsing
//! - `target`: the [`AddTarget`] the pipeline inserts into
//!
//! # Example
//!
//! ```rust,no_run
//! use aural_core::FlatPlaylist;
//! use aural_importer::{AutoplayOptions, ImportSettings, TrackAdder};
//! # fn loader() -> Box<dyn aural_core::MetadataLoader> { unimplemented!() }
//! use std::path::PathBuf;
//!
//! let adder = TrackAdder::new(loader(), ImportSettings::default());
//! let mut playlist = FlatPlaylist::new();
//! let report = adder.add_files(
//!     &mut playlist,
//!     &[PathBuf::from("/music/albums")],
//!     AutoplayOptions::default(),
//! );
//! println!("added {} of {}", report.added.len(), report.total);
//! ```

mod adder;
mod collect;
mod error;
mod events;
mod session;
mod settings;
mod target;

pub mod playlist_file;

pub use adder::{TrackAddReport, TrackAdder};
pub use error::ImportError;
pub use events::{AddProgress, TrackAddEvent};
pub use session::{AutoplayOptions, TrackAddSession};
pub use settings::ImportSettings;
pub use target::AddTarget;

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, ImportError>;
