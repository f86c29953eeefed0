//! Track completion and sequencing tests
//!
//! No shallow tests - every test verifies observable player behavior.

mod common;

use aural_core::{PlaybackState, RepeatMode};
use aural_playback::{
    PlaybackNotification, PlaybackPreferences, PlaylistSequencer, RememberPosition,
};
use common::{album, Harness};

#[test]
fn completion_advances_to_the_next_track() {
    let mut h = Harness::new(album(3, 180.0));
    h.play(0);
    h.notifications();

    h.finish_current();

    assert_eq!(h.state(), PlaybackState::Playing);
    assert_eq!(h.delegate.playing_track().map(|t| t.id.clone()), Some(h.track(1).id.clone()));
    assert_eq!(
        h.notifications(),
        vec![
            PlaybackNotification::PreTrackPlayback {
                old_track: Some(h.track(0).id.clone()),
                old_state: PlaybackState::Playing,
                new_track: h.track(1).id.clone(),
            },
            PlaybackNotification::TrackTransitioned {
                old_track: Some(h.track(0).id.clone()),
                old_state: PlaybackState::Playing,
                new_track: Some(h.track(1).id.clone()),
            },
        ]
    );
}

#[test]
fn completion_of_last_track_stops() {
    let mut h = Harness::new(album(2, 180.0));
    h.play(1);
    h.notifications();

    h.finish_current();

    assert_eq!(h.state(), PlaybackState::NoTrack);
    assert!(h.delegate.current_session().is_none());
    assert_eq!(
        h.notifications(),
        vec![PlaybackNotification::TrackTransitioned {
            old_track: Some(h.track(1).id.clone()),
            old_state: PlaybackState::Playing,
            new_track: None,
        }]
    );
}

#[test]
fn whole_album_plays_through_in_order() {
    let mut h = Harness::new(album(5, 60.0));
    h.delegate.begin();
    while h.state() == PlaybackState::Playing {
        h.finish_current();
    }

    let expected: Vec<_> = (0..5).map(|i| h.track(i).file_path.clone()).collect();
    assert_eq!(h.played_paths(), expected);
}

#[test]
fn stale_completion_is_discarded() {
    let mut h = Harness::new(album(3, 180.0));
    h.play(0);
    let stale = h.delegate.current_session().cloned().expect("session");
    h.play(2);
    h.notifications();

    h.delegate
        .handle_event(aural_playback::PlayerEvent::TrackCompleted(stale));

    assert_eq!(h.delegate.playing_track().map(|t| t.id.clone()), Some(h.track(2).id.clone()));
    assert_eq!(h.log().plays.len(), 2);
    assert!(h.notifications().is_empty());
}

#[test]
fn stale_completion_still_resets_remembered_position() {
    let preferences = PlaybackPreferences {
        remember_last_position: RememberPosition::AllTracks,
        ..PlaybackPreferences::default()
    };
    let mut h = Harness::with_preferences(album(2, 180.0), preferences);
    h.play(0);
    let stale = h.delegate.current_session().cloned().expect("session");
    h.set_position(150.0);
    h.play(1);
    let first = h.track(0).id.clone();
    assert_eq!(h.delegate.profiles().get(&first).map(|p| p.last_position), Some(150.0));

    h.delegate
        .handle_event(aural_playback::PlayerEvent::TrackCompleted(stale));

    assert_eq!(h.delegate.profiles().get(&first).map(|p| p.last_position), Some(0.0));
}

#[test]
fn repeat_one_replays_the_same_track() {
    let sequencer = PlaylistSequencer::new().with_repeat(RepeatMode::One);
    let mut h = Harness::with_sequencer(album(3, 180.0), sequencer);
    h.play(1);

    h.finish_current();
    h.finish_current();

    let second = h.track(1).file_path.clone();
    assert_eq!(h.played_paths(), vec![second.clone(), second.clone(), second]);
}

#[test]
fn repeat_all_wraps_to_the_first_track() {
    let sequencer = PlaylistSequencer::new().with_repeat(RepeatMode::All);
    let mut h = Harness::with_sequencer(album(2, 180.0), sequencer);
    h.play(1);

    h.finish_current();

    assert_eq!(h.delegate.playing_track().map(|t| t.id.clone()), Some(h.track(0).id.clone()));
}

#[test]
fn shuffled_album_plays_every_track_once() {
    let sequencer = PlaylistSequencer::new().with_shuffle(true);
    let mut h = Harness::with_sequencer(album(8, 60.0), sequencer);
    h.delegate.begin();
    while h.state() == PlaybackState::Playing {
        h.finish_current();
    }

    let mut played = h.played_paths();
    played.sort();
    let expected: Vec<_> = (0..8).map(|i| h.track(i).file_path.clone()).collect();
    assert_eq!(played, expected);
}

#[test]
fn unplayable_successor_ends_playback() {
    let mut h = Harness::new(album(3, 180.0));
    h.play(0);
    let bad = h.track(1).file_path.clone();
    h.log().unreadable.insert(bad);
    h.notifications();

    h.finish_current();

    assert_eq!(h.state(), PlaybackState::NoTrack);
    assert!(h.delegate.current_session().is_none());
    assert_eq!(h.notification_kinds(), vec!["trackNotPlayed"]);
    // The sequencer was reset, so beginning again starts from the top
    h.delegate.begin();
    assert_eq!(h.delegate.playing_track().map(|t| t.id.clone()), Some(h.track(0).id.clone()));
}

#[test]
fn completion_after_stop_is_ignored() {
    let mut h = Harness::new(album(2, 180.0));
    h.play(0);
    let session = h.delegate.current_session().cloned().expect("session");
    h.delegate.pause();
    h.delegate.stop();
    h.notifications();

    h.delegate
        .handle_event(aural_playback::PlayerEvent::TrackCompleted(session));

    assert_eq!(h.state(), PlaybackState::NoTrack);
    assert!(h.notifications().is_empty());
}
