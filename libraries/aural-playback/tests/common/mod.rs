//! Shared test doubles for the playback integration tests
//!
//! Every double writes into one [`Log`] so tests can assert on the exact
//! calls the delegate made.

#![allow(dead_code)]

use aural_core::{FlatPlaylist, PlaybackLoop, PlaybackState, Playlist, Track};
use aural_playback::{
    ChainOutcome, GapTimer, PlayRequest, PlaybackComponents, PlaybackDelegate,
    PlaybackNotification, PlaybackParams, PlaybackPreferences, PlaybackProfiles, PlayerEvent,
    PlaybackError, PlaylistSequencer, SeekResult, SessionId, TrackReader, TranscodeStatus,
    Transcoder, Transport,
};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

// ===== Shared Log =====

/// Everything the doubles observed
#[derive(Debug, Default)]
pub struct Log {
    // transport
    pub plays: Vec<PlayRequest>,
    pub position: f64,
    pub paused: bool,
    pub stops: usize,
    pub playback_loop: Option<PlaybackLoop>,
    pub fail_play: bool,

    // transcoder
    pub transcode_requests: Vec<(PathBuf, SessionId)>,
    pub background_transcodes: Vec<PathBuf>,
    pub cancelled_transcodes: Vec<PathBuf>,
    pub transcode_status: HashMap<PathBuf, TranscodeStatus>,

    // reader
    pub unreadable: HashSet<PathBuf>,

    // gap timer
    pub scheduled: Vec<(SessionId, Duration)>,
    pub timer_cancels: usize,
}

pub type SharedLog = Arc<Mutex<Log>>;

fn lock(log: &SharedLog) -> MutexGuard<'_, Log> {
    log.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// ===== Transport =====

pub struct MockTransport {
    log: SharedLog,
    duration: f64,
}

impl MockTransport {
    fn seek(&mut self, track: &Track, time: f64) -> SeekResult {
        let mut log = lock(&self.log);
        let mut result = SeekResult::default();
        if track.duration > 0.0 && time >= track.duration {
            result.track_playback_completed = true;
            return result;
        }
        if log.playback_loop.is_some_and(|l| !l.contains(time)) {
            log.playback_loop = None;
            result.loop_removed = true;
        }
        log.position = time;
        result
    }
}

impl Transport for MockTransport {
    fn play(&mut self, request: PlayRequest) -> aural_playback::Result<()> {
        let mut log = lock(&self.log);
        if log.fail_play {
            return Err(PlaybackError::Transport("device unavailable".to_string()));
        }
        self.duration = request.track.duration;
        log.position = request.start_position;
        log.paused = false;
        log.playback_loop = request.playback_loop;
        log.plays.push(request);
        Ok(())
    }

    fn pause(&mut self) {
        lock(&self.log).paused = true;
    }

    fn resume(&mut self) {
        lock(&self.log).paused = false;
    }

    fn stop(&mut self) {
        let mut log = lock(&self.log);
        log.stops += 1;
        log.position = 0.0;
        log.playback_loop = None;
    }

    fn seek_position(&self) -> f64 {
        lock(&self.log).position
    }

    fn attempt_seek_to_time(&mut self, track: &Track, time: f64) -> SeekResult {
        self.seek(track, time)
    }

    fn force_seek_to_time(&mut self, track: &Track, time: f64) -> SeekResult {
        self.seek(track, time)
    }

    fn playback_loop(&self) -> Option<PlaybackLoop> {
        lock(&self.log).playback_loop
    }

    fn toggle_loop(&mut self) -> Option<PlaybackLoop> {
        let mut log = lock(&self.log);
        let position = log.position;
        log.playback_loop = match log.playback_loop {
            None => Some(PlaybackLoop::starting_at(position)),
            Some(l) if !l.is_complete() && position > l.start_time => {
                Some(PlaybackLoop::complete(l.start_time, position))
            }
            Some(_) => None,
        };
        log.playback_loop
    }

    fn define_loop(&mut self, start: f64, end: f64) {
        lock(&self.log).playback_loop = Some(PlaybackLoop::complete(start, end));
    }

    fn remove_loop(&mut self) {
        lock(&self.log).playback_loop = None;
    }
}

// ===== Transcoder =====

/// Reports In Progress unless a status was configured for the file
pub struct MockTranscoder {
    log: SharedLog,
}

impl Transcoder for MockTranscoder {
    fn transcode_immediately(&mut self, track: &Arc<Track>, session: SessionId) -> TranscodeStatus {
        let mut log = lock(&self.log);
        log.transcode_requests.push((track.file_path.clone(), session));
        log.transcode_status
            .get(&track.file_path)
            .cloned()
            .unwrap_or(TranscodeStatus::InProgress)
    }

    fn transcode_in_background(&mut self, track: &Arc<Track>) {
        lock(&self.log).background_transcodes.push(track.file_path.clone());
    }

    fn cancel(&mut self, track: &Track) {
        lock(&self.log).cancelled_transcodes.push(track.file_path.clone());
    }
}

// ===== Reader =====

/// `.ogg` files need transcoding; files in `unreadable` fail validation
pub struct MockReader {
    log: SharedLog,
}

impl TrackReader for MockReader {
    fn validate(&self, track: &Track) -> aural_playback::Result<()> {
        if lock(&self.log).unreadable.contains(&track.file_path) {
            return Err(PlaybackError::not_readable(&track.file_path, "missing"));
        }
        Ok(())
    }

    fn needs_transcoding(&self, track: &Track) -> bool {
        track.format().as_deref() == Some("ogg")
    }

    fn prepare(&mut self, _track: &Track) -> aural_playback::Result<()> {
        Ok(())
    }
}

// ===== Gap Timer =====

/// Records schedules; tests fire them by hand
pub struct ManualGapTimer {
    log: SharedLog,
}

impl GapTimer for ManualGapTimer {
    fn schedule(&mut self, session: SessionId, delay: Duration) {
        lock(&self.log).scheduled.push((session, delay));
    }

    fn cancel(&mut self) {
        lock(&self.log).timer_cancels += 1;
    }
}

// ===== Harness =====

/// Route delegate logs to the test output; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("aural_playback=debug")
        .with_test_writer()
        .try_init();
}

pub fn track(name: &str, duration: f64) -> Track {
    Track::new(PathBuf::from(format!("/music/{name}"))).with_duration(duration)
}

/// `count` mp3 tracks of `duration` seconds
pub fn album(count: usize, duration: f64) -> Vec<Track> {
    (1..=count)
        .map(|i| track(&format!("{i:02}.mp3"), duration))
        .collect()
}

pub struct Harness {
    pub delegate: PlaybackDelegate,
    pub log: SharedLog,
}

impl Harness {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self::with_preferences(tracks, PlaybackPreferences::default())
    }

    pub fn with_preferences(tracks: Vec<Track>, preferences: PlaybackPreferences) -> Self {
        Self::build(tracks, preferences, PlaylistSequencer::new())
    }

    pub fn with_sequencer(tracks: Vec<Track>, sequencer: PlaylistSequencer) -> Self {
        Self::build(tracks, PlaybackPreferences::default(), sequencer)
    }

    fn build(
        tracks: Vec<Track>,
        preferences: PlaybackPreferences,
        sequencer: PlaylistSequencer,
    ) -> Self {
        let log = SharedLog::default();
        let components = PlaybackComponents {
            playlist: Box::new(FlatPlaylist::from_tracks(tracks)),
            sequencer: Box::new(sequencer),
            transport: Box::new(MockTransport {
                log: Arc::clone(&log),
                duration: 0.0,
            }),
            transcoder: Box::new(MockTranscoder {
                log: Arc::clone(&log),
            }),
            reader: Box::new(MockReader {
                log: Arc::clone(&log),
            }),
            gap_timer: Box::new(ManualGapTimer {
                log: Arc::clone(&log),
            }),
        };
        Self {
            delegate: PlaybackDelegate::new(components, preferences, PlaybackProfiles::new()),
            log,
        }
    }

    pub fn log(&self) -> MutexGuard<'_, Log> {
        lock(&self.log)
    }

    pub fn track(&self, index: usize) -> Arc<Track> {
        self.delegate
            .playlist()
            .track_at(index)
            .expect("track in playlist")
    }

    pub fn play(&mut self, index: usize) -> ChainOutcome {
        self.delegate.play_index(index, PlaybackParams::new())
    }

    pub fn state(&self) -> PlaybackState {
        self.delegate.state()
    }

    /// Move the fake playhead without going through the delegate
    pub fn set_position(&self, seconds: f64) {
        self.log().position = seconds;
    }

    /// Report natural completion of the current session
    pub fn finish_current(&mut self) {
        let session = self
            .delegate
            .current_session()
            .cloned()
            .expect("a current session");
        self.delegate.handle_event(PlayerEvent::TrackCompleted(session));
    }

    /// Fire the most recently scheduled gap timer
    pub fn fire_gap(&mut self) {
        let (session, _) = *self.log().scheduled.last().expect("a scheduled gap");
        self.delegate.handle_event(PlayerEvent::GapElapsed(session));
    }

    pub fn finish_transcode(&mut self, index: usize, result: Result<PathBuf, String>) {
        let track = self.track(index);
        let session = self.delegate.current_session().expect("a session").id;
        self.delegate.handle_event(PlayerEvent::TranscodingFinished {
            session,
            track: track.id.clone(),
            result,
        });
    }

    pub fn notifications(&mut self) -> Vec<PlaybackNotification> {
        self.delegate.drain_notifications()
    }

    pub fn notification_kinds(&mut self) -> Vec<&'static str> {
        self.notifications().iter().map(PlaybackNotification::kind).collect()
    }

    pub fn played_paths(&self) -> Vec<PathBuf> {
        self.log().plays.iter().map(|p| p.track.file_path.clone()).collect()
    }
}
