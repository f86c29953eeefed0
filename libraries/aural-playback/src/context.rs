//! Request context threaded through one chain execution

use crate::{params::PlaybackParams, session::PlaybackSession};
use aural_core::{PlaybackGap, PlaybackState, Track};
use std::path::PathBuf;
use std::sync::Arc;

/// A gap contributed to a request, with the track it is attached to
#[derive(Debug, Clone)]
pub struct ContextGap {
    pub track: Arc<Track>,
    pub gap: PlaybackGap,
}

/// Snapshot of the player at request time plus what the request asks for
///
/// The snapshot and the request are fixed at construction; chain steps fill
/// in the resolved fields (gaps, delay, session, start position, file).
#[derive(Debug, Clone)]
pub struct RequestContext {
    current_state: PlaybackState,
    current_track: Option<Arc<Track>>,
    current_seek_position: f64,
    requested_track: Option<Arc<Track>>,
    params: PlaybackParams,
    cancel_transcoding: bool,
    completed_track: Option<Arc<Track>>,

    pub(crate) gaps: Vec<ContextGap>,
    pub(crate) delay: Option<f64>,
    pub(crate) start_position: f64,
    pub(crate) session: Option<PlaybackSession>,
    pub(crate) playback_file: Option<PathBuf>,
}

impl RequestContext {
    pub(crate) fn new(
        current_state: PlaybackState,
        current_track: Option<Arc<Track>>,
        current_seek_position: f64,
        requested_track: Option<Arc<Track>>,
        params: PlaybackParams,
        cancel_transcoding: bool,
    ) -> Self {
        let start_position = params.start_position().unwrap_or(0.0);
        Self {
            current_state,
            current_track,
            current_seek_position,
            requested_track,
            params,
            cancel_transcoding,
            completed_track: None,
            gaps: Vec::new(),
            delay: None,
            start_position,
            session: None,
            playback_file: None,
        }
    }

    pub fn current_state(&self) -> PlaybackState {
        self.current_state
    }

    pub fn current_track(&self) -> Option<&Arc<Track>> {
        self.current_track.as_ref()
    }

    pub fn current_seek_position(&self) -> f64 {
        self.current_seek_position
    }

    pub fn requested_track(&self) -> Option<&Arc<Track>> {
        self.requested_track.as_ref()
    }

    pub fn params(&self) -> &PlaybackParams {
        &self.params
    }

    /// Whether an in-flight transcode of another track should be cancelled
    pub fn cancel_transcoding(&self) -> bool {
        self.cancel_transcoding
    }

    /// Track whose natural completion raised this request
    pub fn completed_track(&self) -> Option<&Arc<Track>> {
        self.completed_track.as_ref()
    }

    /// Resolved delay in seconds, once the gap step has run
    pub fn delay(&self) -> Option<f64> {
        self.delay
    }

    pub fn gaps(&self) -> &[ContextGap] {
        &self.gaps
    }

    pub fn start_position(&self) -> f64 {
        self.start_position
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub(crate) fn mark_completed(&mut self, track: Arc<Track>) {
        self.completed_track = Some(track);
    }

    /// Set the track the completion chain resolved, forcing interruption
    pub(crate) fn request_subsequent(&mut self, track: Arc<Track>) {
        self.requested_track = Some(track);
        self.params = self.params.clone().with_interrupt(true);
    }

    pub(crate) fn add_gap(&mut self, track: Arc<Track>, gap: PlaybackGap) {
        self.gaps.push(ContextGap { track, gap });
    }
}
