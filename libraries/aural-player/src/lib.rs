//! Aural Player
//!
//! Wires the playback delegate, the track-add pipeline and their
//! collaborators into one control-thread actor.
//!
//! # Architecture
//!
//! - `controller`: the control loop and the [`PlayerHandle`] that drives it
//! - `config`: [`AuralConfig`], loaded from TOML and `AURAL__*` env vars
//! - `transport`: [`SimulatedTransport`], a clock-driven headless transport
//! - `transcoder`: [`PassThroughTranscoder`], a cached stand-in converter
//!
//! # Example
//!
//! ```rust,no_run
//! use aural_importer::AutoplayOptions;
//! use aural_player::{start_player, AuralConfig, PlayerNotification};
//! # fn loader() -> Box<dyn aural_core::MetadataLoader> { unimplemented!() }
//! use std::path::PathBuf;
//!
//! let player = start_player(AuralConfig::default(), loader())?;
//! player.add_files(vec![PathBuf::from("/music/album")], AutoplayOptions::play_now());
//!
//! for notification in player.notifications() {
//!     if let PlayerNotification::Playback(n) = notification {
//!         println!("{}", n.kind());
//!     }
//! }
//! # Ok::<(), aural_player::PlayerError>(())
//! ```

#![forbid(unsafe_code)]

mod command;
mod controller;
mod proxy;

pub mod config;
pub mod error;
pub mod transcoder;
pub mod transport;

pub use command::{PlayerCommand, PlayerNotification, PlayerStatus};
pub use config::{AuralConfig, ProfileSettings, TransportSettings};
pub use controller::{start_player, PlayerHandle};
pub use error::{PlayerError, Result};
pub use transcoder::PassThroughTranscoder;
pub use transport::SimulatedTransport;
