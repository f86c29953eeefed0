//! Request parameters for play requests

use crate::error::{PlaybackError, Result};
use aural_core::PlaybackLoop;
use serde::{Deserialize, Serialize};

/// Parameters attached to a play request
///
/// If `end_position` is set, `start_position` is set too and lies before it;
/// together they define a loop. The segment constructor is the only way to
/// set an end position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackParams {
    interrupt_playback: bool,
    allow_delay: bool,
    delay: Option<f64>,
    start_position: Option<f64>,
    end_position: Option<f64>,
}

impl Default for PlaybackParams {
    fn default() -> Self {
        Self {
            interrupt_playback: true,
            allow_delay: true,
            delay: None,
            start_position: None,
            end_position: None,
        }
    }
}

impl PlaybackParams {
    /// Interrupting, delay-allowing request from the start of the track
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that leaves a playing or paused track alone
    pub fn non_interrupting() -> Self {
        Self::default().with_interrupt(false)
    }

    pub fn with_interrupt(mut self, interrupt: bool) -> Self {
        self.interrupt_playback = interrupt;
        self
    }

    pub fn with_allow_delay(mut self, allow: bool) -> Self {
        self.allow_delay = allow;
        self
    }

    /// Explicit delay in seconds, overriding playlist gaps; clamped to
    /// [`MAX_GAP_SECONDS`](aural_core::MAX_GAP_SECONDS), NaN means no delay
    pub fn with_delay(mut self, seconds: f64) -> Self {
        self.delay = Some(aural_core::clamp_gap_seconds(seconds));
        self
    }

    pub fn with_start_position(mut self, seconds: f64) -> Self {
        self.start_position = Some(seconds.max(0.0));
        self.end_position = None;
        self
    }

    /// Play `[start, end]` as a loop
    pub fn with_segment(mut self, start: f64, end: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() || start < 0.0 {
            return Err(PlaybackError::InvalidParams(format!(
                "segment bounds must be finite and non-negative: {start}..{end}"
            )));
        }
        if end <= start {
            return Err(PlaybackError::InvalidParams(format!(
                "segment end {end} must come after start {start}"
            )));
        }
        self.start_position = Some(start);
        self.end_position = Some(end);
        Ok(self)
    }

    pub fn interrupt_playback(&self) -> bool {
        self.interrupt_playback
    }

    pub fn allow_delay(&self) -> bool {
        self.allow_delay
    }

    pub fn delay(&self) -> Option<f64> {
        self.delay
    }

    pub fn start_position(&self) -> Option<f64> {
        self.start_position
    }

    pub fn end_position(&self) -> Option<f64> {
        self.end_position
    }

    /// Loop defined by start and end positions, if both are set
    pub fn playback_loop(&self) -> Option<PlaybackLoop> {
        match (self.start_position, self.end_position) {
            (Some(start), Some(end)) => Some(PlaybackLoop::complete(start, end)),
            _ => None,
        }
    }
}
