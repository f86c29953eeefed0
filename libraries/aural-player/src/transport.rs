//! Simulated transport
//!
//! Headless stand-in for an audio engine: it keeps a playback clock instead
//! of decoding, and reports natural completion from a timer thread once the
//! clock reaches the track's duration. The clock can run faster than real
//! time, which keeps demos and tests short.

use aural_core::{PlaybackLoop, Track};
use aural_playback::{PlayRequest, PlaybackSession, PlayerEvent, SeekResult, Transport};
use crossbeam_channel::{after, bounded, select, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// The loaded track and its clock
#[derive(Debug)]
struct Loaded {
    session: PlaybackSession,
    duration: f64,

    /// Track position at `since`, or the frozen position while paused
    anchor: f64,
    since: Option<Instant>,

    playback_loop: Option<PlaybackLoop>,
}

impl Loaded {
    fn complete_loop(&self) -> Option<(f64, f64)> {
        self.playback_loop
            .and_then(|l| l.end_time.map(|end| (l.start_time, end)))
            .filter(|(start, end)| end > start)
    }

    fn position(&self, speed: f64) -> f64 {
        let raw = match self.since {
            Some(since) => self.anchor + since.elapsed().as_secs_f64() * speed,
            None => self.anchor,
        };
        let raw = match self.complete_loop() {
            // Looping wraps back to the loop start
            Some((start, end)) if raw >= end && self.anchor < end => {
                start + (raw - start) % (end - start)
            }
            _ => raw,
        };
        if self.duration > 0.0 {
            raw.min(self.duration)
        } else {
            raw
        }
    }

    /// Freeze the clock at its current value
    fn rebase(&mut self, speed: f64) {
        self.anchor = self.position(speed);
        if self.since.is_some() {
            self.since = Some(Instant::now());
        }
    }
}

/// Transport that plays tracks against a simulated clock
pub struct SimulatedTransport {
    events: Sender<PlayerEvent>,
    speed: f64,
    loaded: Option<Loaded>,
    completion: Option<Sender<()>>,
}

impl SimulatedTransport {
    /// Report completions on `events`; `speed` multiplies the clock
    pub fn new(events: Sender<PlayerEvent>, speed: f64) -> Self {
        let speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            1.0
        };
        Self {
            events,
            speed,
            loaded: None,
            completion: None,
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    fn cancel_completion(&mut self) {
        if let Some(cancel) = self.completion.take() {
            cancel.try_send(()).ok();
        }
    }

    /// Re-arm the completion timer from the current clock
    fn schedule_completion(&mut self) {
        self.cancel_completion();

        let Some(loaded) = &self.loaded else {
            return;
        };
        // Unknown durations and active loops never finish on their own
        if loaded.since.is_none() || loaded.duration <= 0.0 || loaded.complete_loop().is_some() {
            return;
        }

        let remaining = (loaded.duration - loaded.position(self.speed)).max(0.0) / self.speed;
        let delay = Duration::from_secs_f64(remaining);
        let session = loaded.session.clone();
        let events = self.events.clone();
        let (cancel_tx, cancel_rx) = bounded::<()>(1);

        let spawned = thread::Builder::new()
            .name(format!("aural-transport-{}", session.id.as_u64()))
            .spawn(move || {
                select! {
                    recv(cancel_rx) -> _ => {
                        trace!("Completion timer for session {} cancelled", session.id);
                    }
                    recv(after(delay)) -> _ => {
                        let id = session.id;
                        if events.send(PlayerEvent::TrackCompleted(session)).is_err() {
                            debug!("Session {} completed after the control loop exited", id);
                        }
                    }
                }
            });

        match spawned {
            Ok(_) => self.completion = Some(cancel_tx),
            Err(e) => warn!("Failed to spawn completion timer: {}", e),
        }
    }

    fn seek(&mut self, track: &Track, time: f64) -> SeekResult {
        let speed = self.speed;
        let Some(loaded) = self.loaded.as_mut() else {
            return SeekResult::default();
        };

        let mut result = SeekResult::default();
        let duration = if track.duration > 0.0 {
            track.duration
        } else {
            loaded.duration
        };
        if duration > 0.0 && time >= duration {
            result.track_playback_completed = true;
            return result;
        }

        if loaded.playback_loop.is_some_and(|l| !l.contains(time)) {
            loaded.playback_loop = None;
            result.loop_removed = true;
        }
        loaded.anchor = time.max(0.0);
        if loaded.since.is_some() {
            loaded.since = Some(Instant::now());
        }
        trace!("Clock moved to {:.2}s at speed {}", loaded.position(speed), speed);

        self.schedule_completion();
        result
    }
}

impl Transport for SimulatedTransport {
    fn play(&mut self, request: PlayRequest) -> aural_playback::Result<()> {
        debug!(
            "Simulating {} from {:.1}s ({})",
            request.track.id,
            request.start_position,
            request.file.display()
        );
        self.loaded = Some(Loaded {
            duration: request.track.duration,
            anchor: request.start_position.max(0.0),
            since: Some(Instant::now()),
            playback_loop: request.playback_loop,
            session: request.session,
        });
        self.schedule_completion();
        Ok(())
    }

    fn pause(&mut self) {
        let speed = self.speed;
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.anchor = loaded.position(speed);
            loaded.since = None;
        }
        self.cancel_completion();
    }

    fn resume(&mut self) {
        if let Some(loaded) = self.loaded.as_mut() {
            if loaded.since.is_none() {
                loaded.since = Some(Instant::now());
            }
        }
        self.schedule_completion();
    }

    fn stop(&mut self) {
        self.cancel_completion();
        self.loaded = None;
    }

    fn seek_position(&self) -> f64 {
        self.loaded
            .as_ref()
            .map_or(0.0, |loaded| loaded.position(self.speed))
    }

    fn attempt_seek_to_time(&mut self, track: &Track, time: f64) -> SeekResult {
        self.seek(track, time)
    }

    fn force_seek_to_time(&mut self, track: &Track, time: f64) -> SeekResult {
        self.seek(track, time)
    }

    fn playback_loop(&self) -> Option<PlaybackLoop> {
        self.loaded.as_ref().and_then(|loaded| loaded.playback_loop)
    }

    fn toggle_loop(&mut self) -> Option<PlaybackLoop> {
        let speed = self.speed;
        let loaded = self.loaded.as_mut()?;
        loaded.rebase(speed);
        let position = loaded.anchor;

        loaded.playback_loop = match loaded.playback_loop {
            None => Some(PlaybackLoop::starting_at(position)),
            Some(l) if !l.is_complete() && position > l.start_time => {
                Some(PlaybackLoop::complete(l.start_time, position))
            }
            // Marking the end at or before the start restarts the mark
            Some(l) if !l.is_complete() => Some(PlaybackLoop::starting_at(position)),
            Some(_) => None,
        };
        let current = loaded.playback_loop;
        self.schedule_completion();
        current
    }

    fn define_loop(&mut self, start: f64, end: f64) {
        let speed = self.speed;
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.rebase(speed);
            loaded.playback_loop = Some(PlaybackLoop::complete(start, end));
        }
        self.schedule_completion();
    }

    fn remove_loop(&mut self) {
        let speed = self.speed;
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.rebase(speed);
            loaded.playback_loop = None;
        }
        self.schedule_completion();
    }
}

impl Drop for SimulatedTransport {
    fn drop(&mut self) {
        self.cancel_completion();
    }
}
