//! Transcoding service abstraction

use crate::session::SessionId;
use aural_core::Track;
use std::path::PathBuf;
use std::sync::Arc;

/// Immediate answer to a transcode request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodeStatus {
    /// A playable file already exists (cached output)
    Ready(PathBuf),

    /// Work is underway; `TranscodingFinished` will follow for the session
    InProgress,

    /// Transcoding cannot be attempted
    Failed(String),
}

/// Converts tracks the transport cannot decode natively
pub trait Transcoder: Send {
    /// Produce a playable file for `track` on behalf of `session`
    fn transcode_immediately(&mut self, track: &Arc<Track>, session: SessionId)
        -> TranscodeStatus;

    /// Start low-priority work ahead of need, with no completion event
    fn transcode_in_background(&mut self, _track: &Arc<Track>) {}

    /// Abandon any work for `track`
    fn cancel(&mut self, track: &Track);
}

/// Transcoder for setups where every format is native
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTranscoder;

impl Transcoder for NoTranscoder {
    fn transcode_immediately(&mut self, track: &Arc<Track>, _session: SessionId) -> TranscodeStatus {
        TranscodeStatus::Failed(format!(
            "no transcoder available for format {}",
            track.format().unwrap_or_else(|| "unknown".to_string())
        ))
    }

    fn cancel(&mut self, _track: &Track) {}
}
