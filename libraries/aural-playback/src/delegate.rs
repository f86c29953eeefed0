//! Playback delegate - the public façade over the request chains
//!
//! Owns the current state and every collaborator. All methods run on one
//! control thread; asynchronous work reports back through [`PlayerEvent`]s
//! passed to [`PlaybackDelegate::handle_event`].

use crate::{
    chain::{ChainOutcome, COMPLETED, RESUME_AFTER_GAP, RESUME_AFTER_TRANSCODING, START, STOP},
    context::RequestContext,
    events::{PlaybackNotification, PlayerEvent, TranscodeResult},
    params::PlaybackParams,
    preferences::PlaybackPreferences,
    profiles::PlaybackProfiles,
    reader::TrackReader,
    scheduler::GapTimer,
    sequencer::Sequencer,
    session::{PlaybackSession, SessionId, SessionRegistry},
    transcoder::Transcoder,
    transport::Transport,
};
use aural_core::{PlaybackState, Playlist, Track, TrackId};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Collaborators handed to the delegate at construction
pub struct PlaybackComponents {
    pub playlist: Box<dyn Playlist>,
    pub sequencer: Box<dyn Sequencer>,
    pub transport: Box<dyn Transport>,
    pub transcoder: Box<dyn Transcoder>,
    pub reader: Box<dyn TrackReader>,
    pub gap_timer: Box<dyn GapTimer>,
}

/// Which track slot is occupied
///
/// One enum instead of three nullable fields keeps "at most one of playing,
/// waiting, transcoding" true by construction.
#[derive(Debug, Clone, Default)]
pub(crate) enum ActiveTrack {
    #[default]
    None,
    Playing {
        track: Arc<Track>,
        paused: bool,
    },
    Waiting {
        track: Arc<Track>,
        gap_end: DateTime<Utc>,
    },
    Transcoding {
        track: Arc<Track>,
    },
}

impl ActiveTrack {
    fn state(&self) -> PlaybackState {
        match self {
            Self::None => PlaybackState::NoTrack,
            Self::Playing { paused: false, .. } => PlaybackState::Playing,
            Self::Playing { paused: true, .. } => PlaybackState::Paused,
            Self::Waiting { .. } => PlaybackState::Waiting,
            Self::Transcoding { .. } => PlaybackState::Transcoding,
        }
    }

    fn track(&self) -> Option<&Arc<Track>> {
        match self {
            Self::None => None,
            Self::Playing { track, .. } | Self::Waiting { track, .. } | Self::Transcoding { track } => {
                Some(track)
            }
        }
    }
}

/// Playback orchestrator
pub struct PlaybackDelegate {
    pub(crate) playlist: Box<dyn Playlist>,
    pub(crate) sequencer: Box<dyn Sequencer>,
    pub(crate) transport: Box<dyn Transport>,
    pub(crate) transcoder: Box<dyn Transcoder>,
    pub(crate) reader: Box<dyn TrackReader>,
    pub(crate) gap_timer: Box<dyn GapTimer>,

    pub(crate) preferences: PlaybackPreferences,
    pub(crate) profiles: PlaybackProfiles,
    pub(crate) sessions: SessionRegistry,
    pub(crate) active: ActiveTrack,

    /// Context of a request suspended in a gap or transcode
    pub(crate) pending: Option<RequestContext>,

    notifications: Vec<PlaybackNotification>,
}

impl PlaybackDelegate {
    pub fn new(
        components: PlaybackComponents,
        preferences: PlaybackPreferences,
        profiles: PlaybackProfiles,
    ) -> Self {
        let PlaybackComponents {
            playlist,
            sequencer,
            transport,
            transcoder,
            reader,
            gap_timer,
        } = components;

        Self {
            playlist,
            sequencer,
            transport,
            transcoder,
            reader,
            gap_timer,
            preferences,
            profiles,
            sessions: SessionRegistry::new(),
            active: ActiveTrack::None,
            pending: None,
            notifications: Vec::new(),
        }
    }

    // ===== Playback Control =====

    /// Play `track`, subject to `params`
    pub fn play_track(&mut self, track: Arc<Track>, params: PlaybackParams) -> ChainOutcome {
        let mut ctx = self.context_for(Some(track), params);
        START.execute(self, &mut ctx)
    }

    /// Play the playlist track at `index`
    pub fn play_index(&mut self, index: usize, params: PlaybackParams) -> ChainOutcome {
        match self.playlist.track_at(index) {
            Some(track) => self.play_track(track, params),
            None => {
                debug!("No track at index {}", index);
                ChainOutcome::Halted
            }
        }
    }

    /// Start playback from wherever the sequencer begins
    pub fn begin(&mut self) -> ChainOutcome {
        match self.sequencer.begin(self.playlist.as_ref()) {
            Some(track) => self.play_track(track, PlaybackParams::new()),
            None => {
                debug!("Nothing to begin: playlist is empty");
                ChainOutcome::Halted
            }
        }
    }

    pub fn toggle_play_pause(&mut self) {
        match self.state() {
            PlaybackState::NoTrack => {
                self.begin();
            }
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Waiting | PlaybackState::Transcoding => {
                debug!("Play/pause ignored while {}", self.state());
            }
        }
    }

    pub fn pause(&mut self) {
        let paused_now = match &mut self.active {
            ActiveTrack::Playing { paused, .. } if !*paused => {
                *paused = true;
                true
            }
            _ => false,
        };
        if paused_now {
            self.transport.pause();
            self.publish(PlaybackNotification::PlaybackStateChanged {
                state: PlaybackState::Paused,
            });
        }
    }

    pub fn resume(&mut self) {
        let resumed_now = match &mut self.active {
            ActiveTrack::Playing { paused, .. } if *paused => {
                *paused = false;
                true
            }
            _ => false,
        };
        if resumed_now {
            self.transport.resume();
            self.publish(PlaybackNotification::PlaybackStateChanged {
                state: PlaybackState::Playing,
            });
        }
    }

    pub fn resume_if_paused(&mut self) {
        if self.state() == PlaybackState::Paused {
            self.resume();
        }
    }

    /// Stop playback; a no-op when nothing is active
    pub fn stop(&mut self) -> ChainOutcome {
        if !self.state().is_active() {
            return ChainOutcome::Halted;
        }
        let mut ctx = self.context_for(None, PlaybackParams::new());
        STOP.execute(self, &mut ctx)
    }

    /// Skip to the sequencer's next track
    pub fn next(&mut self) -> ChainOutcome {
        if !self.state().is_active() {
            return ChainOutcome::Halted;
        }
        match self.sequencer.next(self.playlist.as_ref()) {
            Some(track) => self.play_track(track, PlaybackParams::new()),
            None => ChainOutcome::Halted,
        }
    }

    /// Skip back to the sequencer's previous track
    pub fn previous(&mut self) -> ChainOutcome {
        if !self.state().is_active() {
            return ChainOutcome::Halted;
        }
        match self.sequencer.previous(self.playlist.as_ref()) {
            Some(track) => self.play_track(track, PlaybackParams::new()),
            None => ChainOutcome::Halted,
        }
    }

    /// Restart the current track from the beginning
    pub fn replay(&mut self) {
        if self.state().is_playing_or_paused() {
            self.seek_to_time(0.0);
            self.resume_if_paused();
        }
    }

    /// Autoplay hook used by the track-add pipeline
    ///
    /// With a track, plays it (interrupting only if asked); without one,
    /// begins playback if nothing is active.
    pub fn autoplay(&mut self, track: Option<Arc<Track>>, interrupt: bool) -> ChainOutcome {
        match track {
            Some(track) => self.play_track(track, PlaybackParams::new().with_interrupt(interrupt)),
            None if !self.state().is_active() => self.begin(),
            None => ChainOutcome::Halted,
        }
    }

    // ===== Events =====

    /// Apply an asynchronous completion raised by a collaborator
    pub fn handle_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::TrackCompleted(session) => self.track_completed(session),
            PlayerEvent::GapElapsed(session) => self.gap_elapsed(session),
            PlayerEvent::TranscodingFinished {
                session,
                track,
                result,
            } => self.transcoding_finished(session, &track, result),
        }
    }

    fn track_completed(&mut self, session: PlaybackSession) {
        if !self.sessions.is_current(session.id) {
            debug!(
                "Discarding completion of {} for stale session {}",
                session.track.id, session.id
            );
            self.save_profile_by_policy(&session.track, 0.0);
            return;
        }
        if !self.state().is_playing_or_paused() {
            debug!("Completion for session {} while {}", session.id, self.state());
            return;
        }

        info!("Track completed: {}", session.track.id);
        let mut ctx = self.context_for(None, PlaybackParams::new());
        ctx.mark_completed(Arc::clone(&session.track));
        COMPLETED.execute(self, &mut ctx);
    }

    fn gap_elapsed(&mut self, session: SessionId) {
        if !self.sessions.is_current(session) || self.state() != PlaybackState::Waiting {
            debug!("Ignoring gap expiry for stale session {}", session);
            return;
        }
        let Some(mut ctx) = self.take_pending(session) else {
            return;
        };
        debug!("Gap elapsed for session {}", session);
        START.execute_from(RESUME_AFTER_GAP, self, &mut ctx);
    }

    fn transcoding_finished(&mut self, session: SessionId, track: &TrackId, result: TranscodeResult) {
        let awaited = self.sessions.is_current(session)
            && self.transcoding_track().is_some_and(|t| &t.id == track);
        if !awaited {
            debug!("Ignoring transcoding result for {} (session {})", track, session);
            return;
        }
        let Some(mut ctx) = self.take_pending(session) else {
            return;
        };

        match result {
            Ok(file) => {
                debug!("Transcoded {} to {}", track, file.display());
                ctx.playback_file = Some(file);
                START.execute_from(RESUME_AFTER_TRANSCODING, self, &mut ctx);
            }
            Err(reason) => {
                warn!("Transcoding {} failed: {}", track, reason);
                self.publish(PlaybackNotification::TrackNotPlayed {
                    old_track: ctx.current_track().map(|t| t.id.clone()),
                    track: track.clone(),
                    error: reason,
                });
                let mut stop_ctx = self.context_for(None, PlaybackParams::new());
                STOP.execute(self, &mut stop_ctx);
            }
        }
    }

    fn take_pending(&mut self, session: SessionId) -> Option<RequestContext> {
        let matches = self
            .pending
            .as_ref()
            .and_then(|ctx| ctx.session())
            .is_some_and(|s| s.id == session);
        if matches {
            self.pending.take()
        } else {
            None
        }
    }

    /// Run completion for the current session without waiting for the transport
    pub(crate) fn complete_current_track(&mut self) {
        if let Some(session) = self.sessions.current().cloned() {
            self.track_completed(session);
        }
    }

    // ===== Profiles =====

    /// Remember the current track's position, creating a profile if needed
    pub fn save_profile(&mut self) {
        if let Some(track) = self.playing_track() {
            let position = self.seek_position();
            let profile = self.profiles.upsert(&track, position);
            info!("Saved profile for {} at {:.1}s", track.id, profile.last_position);
        }
    }

    /// Forget the current track's remembered position
    pub fn delete_profile(&mut self) {
        if let Some(track) = self.playing_track() {
            self.profiles.remove(&track.id);
        }
    }

    /// Persist what must survive and stop without notifying
    pub fn on_app_exit(&mut self) {
        if let Some(track) = self.playing_track() {
            let position = self.seek_position();
            self.save_profile_by_policy(&track, position);
        }
        if let Some(track) = self.cancellable_transcode() {
            self.transcoder.cancel(&track);
        }
        self.halt_playback();
        self.sequencer.end();
        self.playlist.drop_session_gaps();
    }

    pub(crate) fn save_profile_by_policy(&mut self, track: &Track, position: f64) {
        let policy = self.preferences.remember_last_position;
        if self.profiles.save_by_policy(policy, track, position) {
            debug!("Remembered {} at {:.1}s", track.id, position);
        }
    }

    // ===== Playlist Mutations =====

    /// Remove tracks, stopping if the active track was among them
    pub fn remove_tracks(&mut self, indices: &[usize]) -> Vec<Arc<Track>> {
        let active_id = self.active.track().map(|t| t.id.clone());
        let removed = self.playlist.remove_tracks(indices);
        if removed.is_empty() {
            return removed;
        }
        self.sequencer.tracks_removed(self.playlist.as_ref(), indices);

        if active_id.is_some_and(|id| removed.iter().any(|t| t.id == id)) {
            info!("Active track removed from playlist; stopping");
            self.stop();
        }
        removed
    }

    pub fn clear_playlist(&mut self) {
        self.playlist.clear();
        self.sequencer.playlist_cleared();
        if self.state().is_active() {
            info!("Playlist cleared; stopping");
            self.stop();
        }
    }

    pub fn playlist(&self) -> &dyn Playlist {
        self.playlist.as_ref()
    }

    /// Mutable playlist access for insertions and gap edits
    pub fn playlist_mut(&mut self) -> &mut dyn Playlist {
        self.playlist.as_mut()
    }

    pub fn sequencer_mut(&mut self) -> &mut dyn Sequencer {
        self.sequencer.as_mut()
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlaybackState {
        self.active.state()
    }

    /// The track held by the transport (playing or paused)
    pub fn playing_track(&self) -> Option<Arc<Track>> {
        match &self.active {
            ActiveTrack::Playing { track, .. } => Some(Arc::clone(track)),
            _ => None,
        }
    }

    /// The track waiting out a gap
    pub fn waiting_track(&self) -> Option<Arc<Track>> {
        match &self.active {
            ActiveTrack::Waiting { track, .. } => Some(Arc::clone(track)),
            _ => None,
        }
    }

    pub fn transcoding_track(&self) -> Option<Arc<Track>> {
        match &self.active {
            ActiveTrack::Transcoding { track } => Some(Arc::clone(track)),
            _ => None,
        }
    }

    /// Track whose conversion a new request or a stop must cancel: the one
    /// being transcoded, or a waiting track converting in the background
    pub(crate) fn cancellable_transcode(&self) -> Option<Arc<Track>> {
        match &self.active {
            ActiveTrack::Transcoding { track } => Some(Arc::clone(track)),
            ActiveTrack::Waiting { track, .. } if self.reader.needs_transcoding(track) => {
                Some(Arc::clone(track))
            }
            _ => None,
        }
    }

    /// Whichever track occupies the active slot
    pub fn active_track(&self) -> Option<Arc<Track>> {
        self.active.track().cloned()
    }

    /// When the current gap ends, while waiting
    pub fn gap_end_time(&self) -> Option<DateTime<Utc>> {
        match &self.active {
            ActiveTrack::Waiting { gap_end, .. } => Some(*gap_end),
            _ => None,
        }
    }

    /// Position in seconds; zero unless playing or paused
    pub fn seek_position(&self) -> f64 {
        if self.state().is_playing_or_paused() {
            self.transport.seek_position()
        } else {
            0.0
        }
    }

    pub fn current_session(&self) -> Option<&PlaybackSession> {
        self.sessions.current()
    }

    pub fn preferences(&self) -> &PlaybackPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: PlaybackPreferences) {
        self.preferences = preferences;
    }

    pub fn profiles(&self) -> &PlaybackProfiles {
        &self.profiles
    }

    pub fn profiles_mut(&mut self) -> &mut PlaybackProfiles {
        &mut self.profiles
    }

    // ===== Notifications =====

    /// Take every notification published since the last drain
    pub fn drain_notifications(&mut self) -> Vec<PlaybackNotification> {
        std::mem::take(&mut self.notifications)
    }

    pub(crate) fn publish(&mut self, notification: PlaybackNotification) {
        debug!("Notification: {}", notification.kind());
        self.notifications.push(notification);
    }

    // ===== Chain Support =====

    /// Snapshot the player for a new request
    pub(crate) fn context_for(
        &self,
        requested: Option<Arc<Track>>,
        params: PlaybackParams,
    ) -> RequestContext {
        let cancel_transcoding = match (self.cancellable_transcode(), &requested) {
            (Some(transcoding), Some(requested)) => transcoding.id != requested.id,
            (Some(_), None) => true,
            (None, _) => false,
        };
        RequestContext::new(
            self.state(),
            self.active_track(),
            self.seek_position(),
            requested,
            params,
            cancel_transcoding,
        )
    }

    /// Tear down whatever is active without publishing anything
    pub(crate) fn halt_playback(&mut self) {
        if self.state().is_playing_or_paused() {
            self.transport.stop();
        }
        self.gap_timer.cancel();
        self.sessions.end_current();
        self.active = ActiveTrack::None;
        self.pending = None;
    }
}
