//! Track-completed chain steps
//!
//! Decides whether natural completion leads into the start chain (there is
//! a subsequent track) or the stop chain (there is not).

use super::{ChainOutcome, StepOutcome, START, STOP};
use crate::{context::RequestContext, delegate::PlaybackDelegate};
use aural_core::PlaybackGap;
use std::sync::Arc;
use tracing::{debug, info};

/// A finished track is remembered from its start
pub(super) fn save_completed_profile(
    delegate: &mut PlaybackDelegate,
    ctx: &mut RequestContext,
) -> StepOutcome {
    if let Some(track) = ctx.completed_track().cloned() {
        delegate.save_profile_by_policy(&track, 0.0);
    }
    StepOutcome::Continue
}

pub(super) fn resolve_subsequent(
    delegate: &mut PlaybackDelegate,
    ctx: &mut RequestContext,
) -> StepOutcome {
    match delegate.sequencer.subsequent(delegate.playlist.as_ref()) {
        Some(next) => {
            debug!("Subsequent track: {}", next.id);
            ctx.request_subsequent(next);
        }
        None => debug!("No subsequent track"),
    }
    StepOutcome::Continue
}

/// Contribute the gap after the completed track, or the preference gap
pub(super) fn delay_after_completion(
    delegate: &mut PlaybackDelegate,
    ctx: &mut RequestContext,
) -> StepOutcome {
    let (Some(completed), Some(next)) = (ctx.completed_track().cloned(), ctx.requested_track().cloned())
    else {
        return StepOutcome::Continue;
    };

    if let Some(after) = delegate.playlist.gap_after_track(&completed) {
        ctx.add_gap(completed, after);
    } else if let Some(duration) = delegate.preferences.implicit_gap() {
        ctx.add_gap(Arc::clone(&next), PlaybackGap::implicit(duration));
    }
    StepOutcome::Continue
}

pub(super) fn dispatch(delegate: &mut PlaybackDelegate, ctx: &mut RequestContext) -> StepOutcome {
    if ctx.requested_track().is_none() {
        return STOP.execute(delegate, ctx).into();
    }

    match START.execute(delegate, ctx) {
        ChainOutcome::Failed => {
            // The finished track is gone and its successor is unplayable
            info!("Subsequent track could not be played; ending playback");
            if delegate.state().is_active() {
                delegate.halt_playback();
            }
            delegate.sequencer.end();
            StepOutcome::Fail
        }
        outcome => outcome.into(),
    }
}
