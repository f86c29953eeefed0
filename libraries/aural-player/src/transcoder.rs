//! Pass-through transcoder
//!
//! Stands in for a real converter in headless setups. "Converting" a file
//! takes a configurable delay on a worker thread and yields the source file
//! itself, which the simulated transport accepts in any format. Finished
//! files are cached, so a second request (for instance after a background
//! transcode during a gap) is answered with `Ready` straight away.

use aural_core::Track;
use aural_playback::{PlayerEvent, SessionId, TranscodeStatus, Transcoder};
use crossbeam_channel::Sender;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct Job {
    token: u64,

    /// Session waiting on the result; None for background work
    notify: Option<SessionId>,
}

#[derive(Debug, Default)]
struct Cache {
    ready: HashSet<PathBuf>,
    in_flight: HashMap<PathBuf, Job>,
    next_token: u64,
}

fn lock(cache: &Mutex<Cache>) -> MutexGuard<'_, Cache> {
    // A panicking worker leaves the cache usable
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct PassThroughTranscoder {
    events: Sender<PlayerEvent>,
    delay: Duration,
    cache: Arc<Mutex<Cache>>,
}

impl PassThroughTranscoder {
    pub fn new(events: Sender<PlayerEvent>, delay: Duration) -> Self {
        Self {
            events,
            delay,
            cache: Arc::new(Mutex::new(Cache::default())),
        }
    }

    /// Whether a finished output exists for `track`
    pub fn is_cached(&self, track: &Track) -> bool {
        lock(&self.cache).ready.contains(&track.file_path)
    }

    fn start_job(&self, track: &Arc<Track>, notify: Option<SessionId>) -> TranscodeStatus {
        let path = track.file_path.clone();
        if !path.is_file() {
            return TranscodeStatus::Failed(format!("source file missing: {}", path.display()));
        }

        let token = {
            let mut cache = lock(&self.cache);
            if cache.ready.contains(&path) {
                return TranscodeStatus::Ready(path);
            }
            if let Some(job) = cache.in_flight.get_mut(&path) {
                // Already converting in the background; just ask to be told
                if notify.is_some() {
                    job.notify = notify;
                }
                return TranscodeStatus::InProgress;
            }
            cache.next_token += 1;
            let token = cache.next_token;
            cache.in_flight.insert(path.clone(), Job { token, notify });
            token
        };

        let cache = Arc::clone(&self.cache);
        let events = self.events.clone();
        let delay = self.delay;
        let track_id = track.id.clone();
        let worker_path = path.clone();

        let spawned = thread::Builder::new()
            .name("aural-transcode".to_string())
            .spawn(move || {
                thread::sleep(delay);
                let notify = {
                    let mut cache = lock(&cache);
                    match cache.in_flight.get(&worker_path) {
                        Some(job) if job.token == token => {}
                        _ => {
                            debug!("Transcode of {} was cancelled", worker_path.display());
                            return;
                        }
                    }
                    let job = cache.in_flight.remove(&worker_path);
                    cache.ready.insert(worker_path.clone());
                    job.and_then(|job| job.notify)
                };

                info!("Transcoded {}", worker_path.display());
                if let Some(session) = notify {
                    let _ = events.send(PlayerEvent::TranscodingFinished {
                        session,
                        track: track_id,
                        result: Ok(worker_path),
                    });
                }
            });

        match spawned {
            Ok(_) => TranscodeStatus::InProgress,
            Err(e) => {
                warn!("Failed to spawn transcode worker: {}", e);
                lock(&self.cache).in_flight.remove(&path);
                TranscodeStatus::Failed(e.to_string())
            }
        }
    }
}

impl Transcoder for PassThroughTranscoder {
    fn transcode_immediately(&mut self, track: &Arc<Track>, session: SessionId) -> TranscodeStatus {
        self.start_job(track, Some(session))
    }

    fn transcode_in_background(&mut self, track: &Arc<Track>) {
        if let TranscodeStatus::Failed(reason) = self.start_job(track, None) {
            debug!("Background transcode of {} skipped: {}", track.id, reason);
        }
    }

    fn cancel(&mut self, track: &Track) {
        if lock(&self.cache).in_flight.remove(&track.file_path).is_some() {
            debug!("Cancelled transcode of {}", track.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aural_playback::SessionRegistry;
    use crossbeam_channel::unbounded;

    fn fixture() -> (tempfile::TempDir, Arc<Track>, SessionId) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.ogg");
        std::fs::write(&path, b"ogg").unwrap();
        let track = Arc::new(Track::new(path));
        let session = SessionRegistry::new().start(Arc::clone(&track), 0.0).id;
        (dir, track, session)
    }

    #[test]
    fn finished_transcode_reports_source_file_then_caches() {
        let (_dir, track, session) = fixture();
        let (tx, rx) = unbounded();
        let mut transcoder = PassThroughTranscoder::new(tx, Duration::from_millis(5));

        assert_eq!(
            transcoder.transcode_immediately(&track, session),
            TranscodeStatus::InProgress
        );
        match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            PlayerEvent::TranscodingFinished {
                session: s,
                track: id,
                result,
            } => {
                assert_eq!(s, session);
                assert_eq!(id, track.id);
                assert_eq!(result, Ok(track.file_path.clone()));
            }
            other => panic!("unexpected event {other:?}"),
        }

        assert!(transcoder.is_cached(&track));
        assert_eq!(
            transcoder.transcode_immediately(&track, session),
            TranscodeStatus::Ready(track.file_path.clone())
        );
    }

    #[test]
    fn cancelled_transcode_sends_nothing() {
        let (_dir, track, session) = fixture();
        let (tx, rx) = unbounded();
        let mut transcoder = PassThroughTranscoder::new(tx, Duration::from_millis(20));

        transcoder.transcode_immediately(&track, session);
        transcoder.cancel(&track);

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert!(!transcoder.is_cached(&track));
    }

    #[test]
    fn background_work_is_silent_until_someone_waits() {
        let (_dir, track, session) = fixture();
        let (tx, rx) = unbounded();
        let mut transcoder = PassThroughTranscoder::new(tx, Duration::from_millis(30));

        transcoder.transcode_in_background(&track);
        assert_eq!(
            transcoder.transcode_immediately(&track, session),
            TranscodeStatus::InProgress
        );

        let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(event, PlayerEvent::TranscodingFinished { session: s, .. } if s == session));
    }

    #[test]
    fn missing_source_fails_immediately() {
        let (tx, _rx) = unbounded();
        let mut transcoder = PassThroughTranscoder::new(tx, Duration::ZERO);
        let track = Arc::new(Track::new(PathBuf::from("/nonexistent/song.ogg")));
        let session = SessionRegistry::new().start(Arc::clone(&track), 0.0).id;

        assert!(matches!(
            transcoder.transcode_immediately(&track, session),
            TranscodeStatus::Failed(_)
        ));
    }
}
