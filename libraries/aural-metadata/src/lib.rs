//! Aural Metadata
//!
//! Primary track info for Aural, read with lofty.
//!
//! This crate provides:
//! - Title, artist, album, numbering and duration from embedded tags
//! - Chapter markers from `CHAPTERnnn` / `CHAPTERnnnNAME` comments
//! - Extension-based format detection for the track-add pipeline
//!
//! # Example
//!
//! ```rust,no_run
//! use aural_core::MetadataLoader;
//! use aural_metadata::LoftyMetadataLoader;
//! use std::path::Path;
//!
//! let loader = LoftyMetadataLoader::new();
//! if loader.is_supported(Path::new("/music/book.m4b")) {
//!     let metadata = loader.load_primary(Path::new("/music/book.m4b"))?;
//!     println!("{} chapters", metadata.chapters.len());
//! }
//! # Ok::<(), aural_core::AuralError>(())
//! ```

mod chapters;
mod error;
mod reader;

pub use chapters::{chapters_from_comments, parse_timestamp};
pub use error::{MetadataError, Result};
pub use reader::{LoftyMetadataLoader, SUPPORTED_EXTENSIONS};
