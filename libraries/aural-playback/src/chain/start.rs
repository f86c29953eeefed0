//! Start playback chain steps

use super::{StepOutcome, STOP};
use crate::{
    context::RequestContext,
    delegate::{ActiveTrack, PlaybackDelegate},
    events::PlaybackNotification,
    preferences::RememberPosition,
    transcoder::TranscodeStatus,
    transport::PlayRequest,
};
use aural_core::{clamp_gap_seconds, GapPersistence, Track};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

fn requested(ctx: &RequestContext) -> Option<Arc<Track>> {
    ctx.requested_track().cloned()
}

/// Publish "track not played", tear down, and fail the request
fn fail_request(
    delegate: &mut PlaybackDelegate,
    ctx: &RequestContext,
    track: &Track,
    error: String,
) -> StepOutcome {
    warn!("Track {} not played: {}", track.id, error);
    delegate.publish(PlaybackNotification::TrackNotPlayed {
        old_track: ctx.current_track().map(|t| t.id.clone()),
        track: track.id.clone(),
        error,
    });
    delegate.halt_playback();
    StepOutcome::Fail
}

pub(super) fn check_interrupt(_delegate: &mut PlaybackDelegate, ctx: &mut RequestContext) -> StepOutcome {
    if ctx.requested_track().is_none() {
        debug!("Start requested without a track");
        return StepOutcome::Halt;
    }
    if !ctx.params().interrupt_playback() && ctx.current_state().is_playing_or_paused() {
        debug!("Non-interrupting request ignored while {}", ctx.current_state());
        return StepOutcome::Halt;
    }
    StepOutcome::Continue
}

/// Runs before anything is torn down, so a bad file leaves prior state intact
pub(super) fn validate(delegate: &mut PlaybackDelegate, ctx: &mut RequestContext) -> StepOutcome {
    let Some(track) = requested(ctx) else {
        return StepOutcome::Halt;
    };
    match delegate.reader.validate(&track) {
        Ok(()) => StepOutcome::Continue,
        Err(e) => {
            warn!("Track {} not played: {}", track.id, e);
            delegate.publish(PlaybackNotification::TrackNotPlayed {
                old_track: ctx.current_track().map(|t| t.id.clone()),
                track: track.id.clone(),
                error: e.to_string(),
            });
            StepOutcome::Fail
        }
    }
}

pub(super) fn cancel_stale_transcoding(
    delegate: &mut PlaybackDelegate,
    ctx: &mut RequestContext,
) -> StepOutcome {
    if ctx.cancel_transcoding() {
        if let Some(transcoding) = delegate.cancellable_transcode() {
            debug!("Cancelling transcode of {}", transcoding.id);
            delegate.transcoder.cancel(&transcoding);
        }
    }
    StepOutcome::Continue
}

pub(super) fn save_outgoing_profile(
    delegate: &mut PlaybackDelegate,
    ctx: &mut RequestContext,
) -> StepOutcome {
    // The completion chain has already saved the finished track
    if ctx.completed_track().is_some() {
        return StepOutcome::Continue;
    }
    if ctx.current_state().is_playing_or_paused() {
        if let Some(outgoing) = ctx.current_track().cloned() {
            delegate.save_profile_by_policy(&outgoing, ctx.current_seek_position());
        }
    }
    StepOutcome::Continue
}

pub(super) fn halt_current(delegate: &mut PlaybackDelegate, _ctx: &mut RequestContext) -> StepOutcome {
    if delegate.state().is_active() {
        delegate.halt_playback();
    }
    StepOutcome::Continue
}

/// Start from the remembered position unless the request names one
pub(super) fn apply_profile(delegate: &mut PlaybackDelegate, ctx: &mut RequestContext) -> StepOutcome {
    if ctx.params().start_position().is_some()
        || delegate.preferences.remember_last_position == RememberPosition::Disabled
    {
        return StepOutcome::Continue;
    }
    let Some(track) = requested(ctx) else {
        return StepOutcome::Halt;
    };
    if let Some(profile) = delegate.profiles.get(&track.id) {
        let position = profile.last_position;
        if position > 0.0 && (track.duration <= 0.0 || position < track.duration) {
            debug!("Resuming {} at remembered {:.1}s", track.id, position);
            ctx.start_position = position;
        }
    }
    StepOutcome::Continue
}

pub(super) fn begin_session(delegate: &mut PlaybackDelegate, ctx: &mut RequestContext) -> StepOutcome {
    let Some(track) = requested(ctx) else {
        return StepOutcome::Halt;
    };
    delegate
        .sequencer
        .select_track(delegate.playlist.as_ref(), &track);

    let session = delegate.sessions.start(Arc::clone(&track), ctx.start_position);
    info!("Session {} started for {}", session.id, track.id);
    ctx.session = Some(session);
    StepOutcome::Continue
}

/// Explicit delay wins over playlist gaps; otherwise gaps sum
pub(super) fn resolve_gap(delegate: &mut PlaybackDelegate, ctx: &mut RequestContext) -> StepOutcome {
    let (Some(track), Some(session)) = (requested(ctx), ctx.session().map(|s| s.id)) else {
        return StepOutcome::Halt;
    };

    let delay = if !ctx.params().allow_delay() {
        0.0
    } else if let Some(explicit) = ctx.params().delay() {
        explicit
    } else {
        if let Some(before) = delegate.playlist.gap_before_track(&track) {
            // A playlist gap before the track replaces the preference gap
            ctx.gaps.retain(|g| g.gap.persistence != GapPersistence::Implicit);
            ctx.add_gap(Arc::clone(&track), before);
        }
        for used in ctx.gaps.iter().filter(|g| g.gap.is_one_time()) {
            delegate.playlist.remove_gap(&used.track, used.gap.position);
        }
        ctx.gaps.iter().map(|g| g.gap.duration).sum()
    };
    // Several gaps may sum past the single-gap bound
    let delay = clamp_gap_seconds(delay);
    ctx.delay = Some(delay);

    if delay <= 0.0 {
        return StepOutcome::Continue;
    }

    let Ok(wait) = Duration::try_from_secs_f64(delay) else {
        return fail_request(delegate, ctx, &track, format!("invalid gap of {delay}s"));
    };
    let gap_end =
        Utc::now() + chrono::Duration::from_std(wait).unwrap_or_else(|_| chrono::Duration::zero());
    delegate.active = ActiveTrack::Waiting {
        track: Arc::clone(&track),
        gap_end,
    };
    delegate.gap_timer.schedule(session, wait);

    // Get a head start on conversion while the gap plays out
    if delegate.reader.needs_transcoding(&track) {
        delegate.transcoder.transcode_in_background(&track);
    }

    info!("Waiting {:.1}s before {}", delay, track.id);
    delegate.publish(PlaybackNotification::GapStarted {
        last_track: ctx.current_track().map(|t| t.id.clone()),
        next_track: track.id.clone(),
        gap_end_time: gap_end,
    });
    delegate.pending = Some(ctx.clone());
    StepOutcome::Suspend
}

pub(super) fn resolve_transcoding(
    delegate: &mut PlaybackDelegate,
    ctx: &mut RequestContext,
) -> StepOutcome {
    let (Some(track), Some(session)) = (requested(ctx), ctx.session().map(|s| s.id)) else {
        return StepOutcome::Halt;
    };
    if !delegate.reader.needs_transcoding(&track) {
        return StepOutcome::Continue;
    }

    match delegate.transcoder.transcode_immediately(&track, session) {
        TranscodeStatus::Ready(file) => {
            debug!("Transcoded output for {} already available", track.id);
            ctx.playback_file = Some(file);
            StepOutcome::Continue
        }
        TranscodeStatus::InProgress => {
            info!("Transcoding {} before playback", track.id);
            delegate.active = ActiveTrack::Transcoding {
                track: Arc::clone(&track),
            };
            delegate.publish(PlaybackNotification::TranscodingStarted {
                track: track.id.clone(),
            });
            delegate.pending = Some(ctx.clone());
            StepOutcome::Suspend
        }
        TranscodeStatus::Failed(reason) => {
            warn!("Cannot transcode {}: {}", track.id, reason);
            delegate.publish(PlaybackNotification::TrackNotPlayed {
                old_track: ctx.current_track().map(|t| t.id.clone()),
                track: track.id.clone(),
                error: reason,
            });
            STOP.execute(delegate, ctx);
            StepOutcome::Fail
        }
    }
}

pub(super) fn prepare_track(delegate: &mut PlaybackDelegate, ctx: &mut RequestContext) -> StepOutcome {
    let Some(track) = requested(ctx) else {
        return StepOutcome::Halt;
    };
    if let Err(e) = delegate.reader.prepare(&track) {
        return fail_request(delegate, ctx, &track, e.to_string());
    }
    if ctx.playback_file.is_none() {
        ctx.playback_file = Some(track.file_path.clone());
    }
    StepOutcome::Continue
}

pub(super) fn start_playback(delegate: &mut PlaybackDelegate, ctx: &mut RequestContext) -> StepOutcome {
    let (Some(track), Some(session)) = (requested(ctx), ctx.session().cloned()) else {
        return StepOutcome::Halt;
    };

    if ctx.current_track().map(|t| &t.id) != Some(&track.id) {
        delegate.publish(PlaybackNotification::PreTrackPlayback {
            old_track: ctx.current_track().map(|t| t.id.clone()),
            old_state: ctx.current_state(),
            new_track: track.id.clone(),
        });
    }

    let request = PlayRequest {
        track: Arc::clone(&track),
        file: ctx
            .playback_file
            .clone()
            .unwrap_or_else(|| track.file_path.clone()),
        start_position: ctx.start_position,
        playback_loop: ctx.params().playback_loop(),
        session,
    };
    if let Err(e) = delegate.transport.play(request) {
        return fail_request(delegate, ctx, &track, e.to_string());
    }

    delegate.active = ActiveTrack::Playing {
        track,
        paused: false,
    };
    StepOutcome::Continue
}

pub(super) fn notify_transition(delegate: &mut PlaybackDelegate, ctx: &mut RequestContext) -> StepOutcome {
    let Some(track) = requested(ctx) else {
        return StepOutcome::Halt;
    };
    info!("Now playing {}", track.id);
    delegate.publish(PlaybackNotification::TrackTransitioned {
        old_track: ctx.current_track().map(|t| t.id.clone()),
        old_state: ctx.current_state(),
        new_track: Some(track.id.clone()),
    });
    StepOutcome::Continue
}
