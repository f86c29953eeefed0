//! Gap scheduling tests
//!
//! No shallow tests - every test verifies observable player behavior.

mod common;

use aural_core::{
    GapPersistence, GapPosition, PlaybackGap, PlaybackState, Playlist, MAX_GAP_SECONDS,
};
use aural_playback::{ChainOutcome, PlaybackNotification, PlaybackParams, PlaybackPreferences};
use chrono::Utc;
use common::{album, track, Harness};
use std::time::Duration;

#[test]
fn gap_before_next_track_waits_then_plays() {
    let mut h = Harness::new(album(2, 180.0));
    let second = h.track(1);
    h.delegate
        .playlist_mut()
        .set_gap(&second, PlaybackGap::before(5.0));
    h.play(0);
    h.notifications();

    let before = Utc::now();
    h.finish_current();

    assert_eq!(h.state(), PlaybackState::Waiting);
    assert_eq!(h.delegate.waiting_track().map(|t| t.id.clone()), Some(second.id.clone()));
    assert!(h.delegate.playing_track().is_none());
    assert_eq!(h.delegate.seek_position(), 0.0);

    let gap_end = h.delegate.gap_end_time().expect("gap end while waiting");
    let remaining = (gap_end - before).num_milliseconds();
    assert!((4_900..=5_500).contains(&remaining), "gap end {remaining}ms away");
    assert_eq!(h.log().scheduled.last().map(|s| s.1), Some(Duration::from_secs(5)));

    match h.notifications().as_slice() {
        [PlaybackNotification::GapStarted {
            last_track,
            next_track,
            gap_end_time,
        }] => {
            assert_eq!(last_track.as_ref(), Some(&h.track(0).id));
            assert_eq!(next_track, &second.id);
            assert_eq!(*gap_end_time, gap_end);
        }
        other => panic!("expected a single gapStarted, got {other:?}"),
    }

    h.fire_gap();

    assert_eq!(h.state(), PlaybackState::Playing);
    assert!(h.delegate.gap_end_time().is_none());
    assert_eq!(h.played_paths(), vec![h.track(0).file_path.clone(), second.file_path.clone()]);
    assert_eq!(h.notification_kinds(), vec!["preTrackPlayback", "trackTransitioned"]);
}

#[test]
fn gaps_after_and_before_add_up() {
    let mut h = Harness::new(album(2, 180.0));
    let (first, second) = (h.track(0), h.track(1));
    h.delegate.playlist_mut().set_gap(&first, PlaybackGap::after(2.0));
    h.delegate.playlist_mut().set_gap(&second, PlaybackGap::before(3.0));
    h.play(0);

    h.finish_current();

    assert_eq!(h.log().scheduled.last().map(|s| s.1), Some(Duration::from_secs(5)));
}

#[test]
fn one_time_gap_is_consumed() {
    let mut h = Harness::new(album(2, 180.0));
    let second = h.track(1);
    let gap = PlaybackGap::before(1.5).with_persistence(GapPersistence::OneTime);
    h.delegate.playlist_mut().set_gap(&second, gap);

    h.play(1);
    assert_eq!(h.state(), PlaybackState::Waiting);
    assert!(h.delegate.playlist().gap_before_track(&second).is_none());
    h.fire_gap();
    assert_eq!(h.state(), PlaybackState::Playing);

    // Second request plays immediately
    h.play(1);
    assert_eq!(h.state(), PlaybackState::Playing);
    assert_eq!(h.log().scheduled.len(), 1);
}

#[test]
fn persistent_gap_applies_every_time() {
    let mut h = Harness::new(album(2, 180.0));
    let second = h.track(1);
    h.delegate
        .playlist_mut()
        .set_gap(&second, PlaybackGap::before(1.0));

    h.play(1);
    h.fire_gap();
    h.play(1);

    assert_eq!(h.state(), PlaybackState::Waiting);
    assert_eq!(h.log().scheduled.len(), 2);
}

#[test]
fn explicit_delay_overrides_playlist_gaps() {
    let mut h = Harness::new(album(1, 180.0));
    let only = h.track(0);
    h.delegate.playlist_mut().set_gap(&only, PlaybackGap::before(9.0));

    h.delegate
        .play_track(only, PlaybackParams::new().with_delay(2.0));

    assert_eq!(h.log().scheduled.last().map(|s| s.1), Some(Duration::from_secs(2)));
}

#[test]
fn disallowed_delay_plays_immediately() {
    let mut h = Harness::new(album(1, 180.0));
    let only = h.track(0);
    h.delegate.playlist_mut().set_gap(&only, PlaybackGap::before(9.0));

    let outcome = h
        .delegate
        .play_track(only, PlaybackParams::new().with_allow_delay(false));

    assert_eq!(outcome, ChainOutcome::Completed);
    assert_eq!(h.state(), PlaybackState::Playing);
    assert!(h.log().scheduled.is_empty());
}

#[test]
fn zero_explicit_delay_plays_immediately() {
    let mut h = Harness::new(album(1, 180.0));
    let only = h.track(0);
    h.delegate.playlist_mut().set_gap(&only, PlaybackGap::before(9.0));

    h.delegate
        .play_track(only, PlaybackParams::new().with_delay(0.0));

    assert_eq!(h.state(), PlaybackState::Playing);
}

fn gap_preferences(seconds: f64) -> PlaybackPreferences {
    PlaybackPreferences {
        gap_between_tracks: true,
        gap_between_tracks_duration: seconds,
        ..PlaybackPreferences::default()
    }
}

#[test]
fn preference_gap_applies_only_after_natural_completion() {
    let mut h = Harness::with_preferences(album(3, 180.0), gap_preferences(4.0));

    h.play(0);
    assert_eq!(h.state(), PlaybackState::Playing, "direct plays do not wait");

    h.finish_current();
    assert_eq!(h.state(), PlaybackState::Waiting);
    assert_eq!(h.log().scheduled.last().map(|s| s.1), Some(Duration::from_secs(4)));
}

#[test]
fn playlist_gap_replaces_preference_gap() {
    let mut h = Harness::with_preferences(album(2, 180.0), gap_preferences(4.0));
    let second = h.track(1);
    h.delegate
        .playlist_mut()
        .set_gap(&second, PlaybackGap::before(1.0));
    h.play(0);

    h.finish_current();

    assert_eq!(h.log().scheduled.last().map(|s| s.1), Some(Duration::from_secs(1)));
}

#[test]
fn gap_after_track_replaces_preference_gap() {
    let mut h = Harness::with_preferences(album(2, 180.0), gap_preferences(4.0));
    let first = h.track(0);
    h.delegate.playlist_mut().set_gap(&first, PlaybackGap::after(2.0));
    h.play(0);

    h.finish_current();

    assert_eq!(h.log().scheduled.last().map(|s| s.1), Some(Duration::from_secs(2)));
}

#[test]
fn new_request_during_gap_replaces_it() {
    let mut h = Harness::new(album(3, 180.0));
    let second = h.track(1);
    h.delegate
        .playlist_mut()
        .set_gap(&second, PlaybackGap::before(5.0));
    h.play(1);
    assert_eq!(h.state(), PlaybackState::Waiting);

    h.play(2);
    assert_eq!(h.state(), PlaybackState::Playing);

    // The old gap's timer reports late; the session no longer matches
    let (old_session, _) = h.log().scheduled[0];
    h.delegate
        .handle_event(aural_playback::PlayerEvent::GapElapsed(old_session));
    assert_eq!(h.delegate.playing_track().map(|t| t.id.clone()), Some(h.track(2).id.clone()));
    assert_eq!(h.log().plays.len(), 1);
}

#[test]
fn transcoding_starts_early_during_gap() {
    let mut h = Harness::new(vec![track("intro.mp3", 60.0), track("live.ogg", 300.0)]);
    let live = h.track(1);
    h.delegate.playlist_mut().set_gap(&live, PlaybackGap::before(3.0));
    h.play(0);

    h.finish_current();

    assert_eq!(h.state(), PlaybackState::Waiting);
    assert_eq!(h.log().background_transcodes, vec![live.file_path.clone()]);
}

fn live_after_gap() -> Harness {
    let mut h = Harness::new(vec![
        track("intro.mp3", 60.0),
        track("live.ogg", 300.0),
        track("outro.mp3", 60.0),
    ]);
    let live = h.track(1);
    h.delegate.playlist_mut().set_gap(&live, PlaybackGap::before(3.0));
    h.play(0);
    h.finish_current();
    assert_eq!(h.log().background_transcodes, vec![live.file_path.clone()]);
    h
}

#[test]
fn new_request_during_gap_cancels_early_transcoding() {
    let mut h = live_after_gap();

    h.play(2);

    assert_eq!(h.state(), PlaybackState::Playing);
    assert_eq!(h.log().cancelled_transcodes, vec![h.track(1).file_path.clone()]);
}

#[test]
fn stop_during_gap_cancels_early_transcoding() {
    let mut h = live_after_gap();

    h.delegate.stop();

    assert_eq!(h.state(), PlaybackState::NoTrack);
    assert_eq!(h.log().cancelled_transcodes, vec![h.track(1).file_path.clone()]);
}

#[test]
fn elapsed_gap_keeps_early_transcoding() {
    let mut h = live_after_gap();

    h.fire_gap();

    assert_eq!(h.state(), PlaybackState::Transcoding);
    assert!(h.log().cancelled_transcodes.is_empty());
}

#[test]
fn oversized_playlist_gap_is_clamped() {
    let mut h = Harness::new(album(2, 180.0));
    let second = h.track(1);
    h.delegate.playlist_mut().set_gap(&second, PlaybackGap::before(1e20));

    h.play(1);

    assert_eq!(h.state(), PlaybackState::Waiting);
    assert_eq!(
        h.log().scheduled.last().map(|s| s.1),
        Some(Duration::from_secs_f64(MAX_GAP_SECONDS))
    );
}

#[test]
fn infinite_explicit_delay_is_clamped() {
    let mut h = Harness::new(album(1, 180.0));
    let only = h.track(0);

    h.delegate
        .play_track(only, PlaybackParams::new().with_delay(f64::INFINITY));

    assert_eq!(h.state(), PlaybackState::Waiting);
    assert_eq!(
        h.log().scheduled.last().map(|s| s.1),
        Some(Duration::from_secs_f64(MAX_GAP_SECONDS))
    );
}

#[test]
fn oversized_preference_gap_is_clamped() {
    let mut h = Harness::with_preferences(album(2, 180.0), gap_preferences(1e20));
    h.play(0);

    h.finish_current();

    assert_eq!(h.state(), PlaybackState::Waiting);
    assert_eq!(
        h.log().scheduled.last().map(|s| s.1),
        Some(Duration::from_secs_f64(MAX_GAP_SECONDS))
    );
}

#[test]
fn gaps_summing_past_the_bound_are_clamped() {
    let mut h = Harness::new(album(2, 180.0));
    let (first, second) = (h.track(0), h.track(1));
    // Fields set directly skip the constructor's clamp
    let huge = |position| PlaybackGap {
        duration: f64::MAX,
        position,
        persistence: GapPersistence::Persistent,
    };
    h.delegate.playlist_mut().set_gap(&first, huge(GapPosition::AfterTrack));
    h.delegate.playlist_mut().set_gap(&second, huge(GapPosition::BeforeTrack));
    h.play(0);

    h.finish_current();

    assert_eq!(h.state(), PlaybackState::Waiting);
    assert_eq!(
        h.log().scheduled.last().map(|s| s.1),
        Some(Duration::from_secs_f64(MAX_GAP_SECONDS))
    );
}

#[test]
fn removing_a_gap_returns_it() {
    let mut h = Harness::new(album(1, 180.0));
    let only = h.track(0);
    h.delegate.playlist_mut().set_gap(&only, PlaybackGap::after(2.0));

    let removed = h
        .delegate
        .playlist_mut()
        .remove_gap(&only, GapPosition::AfterTrack);

    assert_eq!(removed.map(|g| g.duration), Some(2.0));
    assert!(h.delegate.playlist().gap_after_track(&only).is_none());
}
