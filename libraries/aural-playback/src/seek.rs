//! Seeking and loop control

use crate::{
    delegate::PlaybackDelegate,
    events::PlaybackNotification,
    preferences::UserInputMode,
    transport::SeekResult,
};
use aural_core::PlaybackLoop;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
enum SeekKind {
    Attempt,
    Force,
}

impl PlaybackDelegate {
    // ===== Seek =====

    /// Seek to `time` seconds; reaching the end completes the track
    pub fn seek_to_time(&mut self, time: f64) {
        self.seek_with(time, SeekKind::Force);
    }

    /// Seek to `percent` (0-100) of the track's duration
    pub fn seek_to_percentage(&mut self, percent: f64) {
        let Some(track) = self.playing_track() else {
            return;
        };
        let time = track.duration * percent.clamp(0.0, 100.0) / 100.0;
        self.seek_with(time, SeekKind::Force);
    }

    pub fn seek_forward(&mut self, mode: UserInputMode) {
        if let Some(track) = self.playing_track() {
            let step = self.preferences.primary_seek_step(track.duration, mode);
            self.seek_relative(step);
        }
    }

    pub fn seek_backward(&mut self, mode: UserInputMode) {
        if let Some(track) = self.playing_track() {
            let step = self.preferences.primary_seek_step(track.duration, mode);
            self.seek_relative(-step);
        }
    }

    pub fn seek_forward_secondary(&mut self) {
        if let Some(track) = self.playing_track() {
            let step = self.preferences.secondary_seek_step(track.duration);
            self.seek_relative(step);
        }
    }

    pub fn seek_backward_secondary(&mut self) {
        if let Some(track) = self.playing_track() {
            let step = self.preferences.secondary_seek_step(track.duration);
            self.seek_relative(-step);
        }
    }

    fn seek_relative(&mut self, delta: f64) {
        let target = self.seek_position() + delta;
        self.seek_with(target, SeekKind::Attempt);
    }

    fn seek_with(&mut self, time: f64, kind: SeekKind) {
        let Some(track) = self.playing_track() else {
            return;
        };
        if !time.is_finite() {
            return;
        }

        // Unknown durations cannot be clamped or completed against
        let known_duration = track.duration > 0.0;
        let target = if known_duration {
            time.clamp(0.0, track.duration)
        } else {
            time.max(0.0)
        };
        if known_duration && target >= track.duration {
            debug!("Seek to end of {}; completing", track.id);
            self.complete_current_track();
            return;
        }

        let result = match kind {
            SeekKind::Attempt => self.transport.attempt_seek_to_time(&track, target),
            SeekKind::Force => self.transport.force_seek_to_time(&track, target),
        };
        self.apply_seek_result(result);
    }

    pub(crate) fn apply_seek_result(&mut self, result: SeekResult) {
        if result.track_playback_completed {
            self.complete_current_track();
            return;
        }
        if result.loop_removed {
            self.publish(PlaybackNotification::PlaybackLoopChanged {
                playback_loop: None,
            });
        }
    }

    // ===== Loop =====

    /// Cycle the loop: none → start marked → complete → none
    pub fn toggle_loop(&mut self) -> Option<PlaybackLoop> {
        if !self.state().is_playing_or_paused() {
            return None;
        }
        let playback_loop = self.transport.toggle_loop();
        self.publish(PlaybackNotification::PlaybackLoopChanged { playback_loop });
        playback_loop
    }

    pub fn playback_loop(&self) -> Option<PlaybackLoop> {
        if self.state().is_playing_or_paused() {
            self.transport.playback_loop()
        } else {
            None
        }
    }
}
