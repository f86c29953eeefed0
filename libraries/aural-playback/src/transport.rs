//! Transport abstraction
//!
//! The transport is the audio engine: it decodes and outputs one track at a
//! time. It never blocks the control thread and reports natural completion
//! by sending [`PlayerEvent::TrackCompleted`](crate::PlayerEvent) with the
//! session it was given in [`PlayRequest`].

use crate::{error::Result, session::PlaybackSession};
use aural_core::{PlaybackLoop, Track};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything the transport needs to start a track
#[derive(Debug, Clone)]
pub struct PlayRequest {
    pub track: Arc<Track>,

    /// File to decode: the track's own file or a transcoded copy
    pub file: PathBuf,

    /// Seconds into the track
    pub start_position: f64,

    pub playback_loop: Option<PlaybackLoop>,

    pub session: PlaybackSession,
}

/// Result of a seek request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeekResult {
    /// The seek target was at or past the end of the track
    pub track_playback_completed: bool,

    /// The seek target fell outside the active loop, which was removed
    pub loop_removed: bool,
}

/// Audio transport consumed by the delegate
pub trait Transport: Send {
    /// Start playing a track
    fn play(&mut self, request: PlayRequest) -> Result<()>;

    fn pause(&mut self);

    fn resume(&mut self);

    /// Stop and unload the current track
    fn stop(&mut self);

    /// Current position in seconds
    fn seek_position(&self) -> f64;

    /// Seek if the transport can honor it now (user skip forward/back)
    fn attempt_seek_to_time(&mut self, track: &Track, time: f64) -> SeekResult;

    /// Seek unconditionally (explicit time, chapters)
    fn force_seek_to_time(&mut self, track: &Track, time: f64) -> SeekResult;

    fn playback_loop(&self) -> Option<PlaybackLoop>;

    /// Cycle none → start marked → complete → none, at the current position
    fn toggle_loop(&mut self) -> Option<PlaybackLoop>;

    /// Replace any loop with a complete one
    fn define_loop(&mut self, start: f64, end: f64);

    fn remove_loop(&mut self);
}
