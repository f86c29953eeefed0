//! Playback sessions
//!
//! A session is the token for "the current intent to play track T from
//! position S". Every asynchronous completion (transport end-of-track,
//! transcoding result, gap expiry) carries the session it was raised for and
//! is discarded unless that session is still the current one.

use aural_core::Track;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Monotonic session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One accepted play request
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub id: SessionId,
    pub track: Arc<Track>,
    pub requested_start_position: f64,
    pub timestamp: Instant,
}

impl PlaybackSession {
    /// Seconds since the session was started
    pub fn age(&self) -> f64 {
        self.timestamp.elapsed().as_secs_f64()
    }
}

/// Owner of the current session
///
/// Starting a session is the only way to invalidate the previous one.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    next_id: u64,
    current: Option<PlaybackSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and install a new current session
    pub fn start(&mut self, track: Arc<Track>, position: f64) -> PlaybackSession {
        self.next_id += 1;
        let session = PlaybackSession {
            id: SessionId(self.next_id),
            track,
            requested_start_position: position,
            timestamp: Instant::now(),
        };
        self.current = Some(session.clone());
        session
    }

    /// Whether `id` names the most recently started session
    pub fn is_current(&self, id: SessionId) -> bool {
        self.current.as_ref().is_some_and(|s| s.id == id)
    }

    pub fn current(&self) -> Option<&PlaybackSession> {
        self.current.as_ref()
    }

    /// Drop the current session so no outstanding event can match
    pub fn end_current(&mut self) -> Option<PlaybackSession> {
        self.current.take()
    }
}
