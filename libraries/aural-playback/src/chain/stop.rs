//! Stop playback chain steps

use super::StepOutcome;
use crate::{context::RequestContext, delegate::PlaybackDelegate, events::PlaybackNotification};
use tracing::{debug, info};

pub(super) fn cancel_transcoding(delegate: &mut PlaybackDelegate, _ctx: &mut RequestContext) -> StepOutcome {
    if let Some(track) = delegate.cancellable_transcode() {
        debug!("Cancelling transcode of {}", track.id);
        delegate.transcoder.cancel(&track);
    }
    StepOutcome::Continue
}

pub(super) fn save_profile(delegate: &mut PlaybackDelegate, ctx: &mut RequestContext) -> StepOutcome {
    if ctx.completed_track().is_some() {
        return StepOutcome::Continue;
    }
    if let Some(track) = delegate.playing_track() {
        let position = delegate.seek_position();
        delegate.save_profile_by_policy(&track, position);
    }
    StepOutcome::Continue
}

pub(super) fn halt(delegate: &mut PlaybackDelegate, _ctx: &mut RequestContext) -> StepOutcome {
    delegate.halt_playback();
    delegate.sequencer.end();
    StepOutcome::Continue
}

pub(super) fn notify_transition(delegate: &mut PlaybackDelegate, ctx: &mut RequestContext) -> StepOutcome {
    let Some(old_track) = ctx.current_track() else {
        return StepOutcome::Continue;
    };
    info!("Playback stopped after {}", old_track.id);
    let notification = PlaybackNotification::TrackTransitioned {
        old_track: Some(old_track.id.clone()),
        old_state: ctx.current_state(),
        new_track: None,
    };
    delegate.publish(notification);
    StepOutcome::Continue
}
