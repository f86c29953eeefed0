//! Playback events
//!
//! Two directions:
//! - [`PlayerEvent`]: asynchronous completions raised by collaborators
//!   (transport, transcoder, gap timer) and fed back into the delegate on
//!   the control thread.
//! - [`PlaybackNotification`]: what the delegate publishes for the UI and
//!   other subsystems. Notifications are buffered and drained, so state
//!   transitions stay testable without a live subscriber.

use crate::session::{PlaybackSession, SessionId};
use aural_core::{PlaybackLoop, PlaybackState, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome reported by a background transcode
pub type TranscodeResult = std::result::Result<PathBuf, String>;

/// Asynchronous events consumed by the delegate
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// The transport played the session's track to its end
    TrackCompleted(PlaybackSession),

    /// The gap scheduled for a session has elapsed
    GapElapsed(SessionId),

    /// A transcode requested for a session finished
    TranscodingFinished {
        session: SessionId,
        track: TrackId,
        result: TranscodeResult,
    },
}

/// Notifications published by the delegate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlaybackNotification {
    /// Emitted just before the transport starts a different track
    PreTrackPlayback {
        old_track: Option<TrackId>,
        old_state: PlaybackState,
        new_track: TrackId,
    },

    /// Playback moved from one track (or none) to another (or none)
    TrackTransitioned {
        old_track: Option<TrackId>,
        old_state: PlaybackState,
        new_track: Option<TrackId>,
    },

    /// A silence gap started before `next_track`
    GapStarted {
        last_track: Option<TrackId>,
        next_track: TrackId,
        gap_end_time: DateTime<Utc>,
    },

    /// The requested track needs transcoding before it can play
    TranscodingStarted { track: TrackId },

    /// A requested track could not be played
    TrackNotPlayed {
        old_track: Option<TrackId>,
        track: TrackId,
        error: String,
    },

    /// Pause/resume of the active track
    PlaybackStateChanged { state: PlaybackState },

    /// The playback loop was defined, completed, or removed
    PlaybackLoopChanged { playback_loop: Option<PlaybackLoop> },
}

impl PlaybackNotification {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PreTrackPlayback { .. } => "preTrackPlayback",
            Self::TrackTransitioned { .. } => "trackTransitioned",
            Self::GapStarted { .. } => "gapStarted",
            Self::TranscodingStarted { .. } => "transcodingStarted",
            Self::TrackNotPlayed { .. } => "trackNotPlayed",
            Self::PlaybackStateChanged { .. } => "playbackStateChanged",
            Self::PlaybackLoopChanged { .. } => "playbackLoopChanged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_serialize_with_type_tag() {
        let notification = PlaybackNotification::TrackTransitioned {
            old_track: None,
            old_state: PlaybackState::NoTrack,
            new_track: Some(TrackId::new("/music/a.mp3")),
        };
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "trackTransitioned");
        assert_eq!(json["old_state"], "noTrack");
        assert_eq!(json["new_track"], "/music/a.mp3");
    }
}
