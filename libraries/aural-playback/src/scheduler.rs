//! Gap scheduling
//!
//! A gap timer is a one-shot task keyed by session id. When it fires it
//! sends [`PlayerEvent::GapElapsed`] back to the control thread, which
//! re-checks the session before resuming the start chain. A stale timer is
//! therefore harmless even if cancellation loses a race.

use crate::{events::PlayerEvent, session::SessionId};
use crossbeam_channel::{after, bounded, select, Sender};
use std::thread;
use std::time::Duration;

/// One-shot, cancellable gap timer
pub trait GapTimer: Send {
    /// Schedule `GapElapsed(session)` after `delay`, replacing any pending timer
    fn schedule(&mut self, session: SessionId, delay: Duration);

    /// Cancel the pending timer, if any
    fn cancel(&mut self);
}

/// Gap timer backed by a short-lived thread per gap
pub struct ThreadGapTimer {
    events: Sender<PlayerEvent>,
    cancel: Option<Sender<()>>,
}

impl ThreadGapTimer {
    pub fn new(events: Sender<PlayerEvent>) -> Self {
        Self {
            events,
            cancel: None,
        }
    }
}

impl GapTimer for ThreadGapTimer {
    fn schedule(&mut self, session: SessionId, delay: Duration) {
        self.cancel();

        let (cancel_tx, cancel_rx) = bounded::<()>(1);
        let events = self.events.clone();
        let spawned = thread::Builder::new()
            .name(format!("aural-gap-{}", session.as_u64()))
            .spawn(move || {
                select! {
                    // Either an explicit cancel or the sender being dropped
                    recv(cancel_rx) -> _ => {
                        tracing::trace!("Gap timer for session {} cancelled", session);
                    }
                    recv(after(delay)) -> _ => {
                        if events.send(PlayerEvent::GapElapsed(session)).is_err() {
                            tracing::debug!("Gap elapsed after the control loop exited");
                        }
                    }
                }
            });

        match spawned {
            Ok(_) => self.cancel = Some(cancel_tx),
            Err(e) => {
                // Without a timer thread the gap collapses to zero
                tracing::warn!("Failed to spawn gap timer: {}; skipping gap", e);
                self.events.send(PlayerEvent::GapElapsed(session)).ok();
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.try_send(()).ok();
        }
    }
}

impl Drop for ThreadGapTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
