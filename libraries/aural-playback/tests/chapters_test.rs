//! Chapter navigation tests
//!
//! No shallow tests - every test verifies observable player behavior.

mod common;

use aural_core::{Chapter, PlaybackLoop, PlaybackState, Track};
use aural_playback::PlaybackNotification;
use common::{track, Harness};

/// Ten one-minute chapters
fn audiobook() -> Track {
    let chapters = (0..10)
        .map(|i| {
            let start = f64::from(i) * 60.0;
            Chapter::new(format!("Chapter {}", i + 1), start, start + 60.0)
        })
        .collect();
    track("book.m4b", 600.0).with_chapters(chapters)
}

fn playing_audiobook_at(position: f64) -> Harness {
    let mut h = Harness::new(vec![audiobook(), track("next.mp3", 60.0)]);
    h.play(0);
    h.set_position(position);
    h.notifications();
    h
}

#[test]
fn playing_chapter_follows_position() {
    let mut h = playing_audiobook_at(0.0);
    assert_eq!(h.delegate.chapter_count(), 10);

    h.delegate.seek_to_time(245.0);

    let playing = h.delegate.playing_chapter().expect("a chapter at 245s");
    assert_eq!(playing.index, 4);
    assert_eq!(playing.chapter.title, "Chapter 5");
}

#[test]
fn next_chapter_jumps_to_following_start() {
    let mut h = playing_audiobook_at(245.0);

    h.delegate.next_chapter();

    assert_eq!(h.delegate.seek_position(), 300.0);
    assert_eq!(h.delegate.playing_chapter().map(|c| c.index), Some(5));
}

#[test]
fn next_chapter_in_last_chapter_does_nothing() {
    let mut h = playing_audiobook_at(590.0);

    h.delegate.next_chapter();

    assert_eq!(h.delegate.seek_position(), 590.0);
    assert_eq!(h.state(), PlaybackState::Playing);
}

#[test]
fn previous_chapter_goes_back_one() {
    let mut h = playing_audiobook_at(245.0);

    h.delegate.previous_chapter();

    assert_eq!(h.delegate.seek_position(), 180.0);
}

#[test]
fn previous_chapter_in_first_chapter_does_nothing() {
    let mut h = playing_audiobook_at(30.0);

    h.delegate.previous_chapter();

    assert_eq!(h.delegate.seek_position(), 30.0);
}

#[test]
fn replay_chapter_returns_to_its_start() {
    let mut h = playing_audiobook_at(245.0);

    h.delegate.replay_chapter();

    assert_eq!(h.delegate.seek_position(), 240.0);
}

#[test]
fn play_chapter_resumes_paused_playback() {
    let mut h = playing_audiobook_at(10.0);
    h.delegate.pause();

    h.delegate.play_chapter(7);

    assert_eq!(h.delegate.seek_position(), 420.0);
    assert_eq!(h.state(), PlaybackState::Playing);

    // Out of range is ignored
    h.delegate.play_chapter(10);
    assert_eq!(h.delegate.seek_position(), 420.0);
}

#[test]
fn chapter_loop_toggles_on_and_off() {
    let mut h = playing_audiobook_at(130.0);

    assert_eq!(
        h.delegate.toggle_chapter_loop(),
        Some(PlaybackLoop::complete(120.0, 180.0))
    );
    assert_eq!(h.delegate.playback_loop(), Some(PlaybackLoop::complete(120.0, 180.0)));

    assert_eq!(h.delegate.toggle_chapter_loop(), None);
    assert_eq!(h.delegate.playback_loop(), None);

    assert_eq!(
        h.notifications(),
        vec![
            PlaybackNotification::PlaybackLoopChanged {
                playback_loop: Some(PlaybackLoop::complete(120.0, 180.0))
            },
            PlaybackNotification::PlaybackLoopChanged {
                playback_loop: None
            },
        ]
    );
}

#[test]
fn chapter_loop_replaces_an_unrelated_loop() {
    let mut h = playing_audiobook_at(130.0);
    h.delegate.toggle_loop();

    assert_eq!(
        h.delegate.toggle_chapter_loop(),
        Some(PlaybackLoop::complete(120.0, 180.0))
    );
}

#[test]
fn chapter_navigation_skips_gaps_between_chapters() {
    let sparse = track("talk.mp3", 100.0).with_chapters(vec![
        Chapter::new("Intro", 10.0, 20.0),
        Chapter::new("Talk", 40.0, 80.0),
    ]);
    let mut h = Harness::new(vec![sparse]);
    h.play(0);
    h.set_position(30.0);

    assert!(h.delegate.playing_chapter().is_none());
    assert!(h.delegate.toggle_chapter_loop().is_none());

    h.delegate.previous_chapter();
    assert_eq!(h.delegate.seek_position(), 10.0);

    h.set_position(30.0);
    h.delegate.next_chapter();
    assert_eq!(h.delegate.seek_position(), 40.0);
}

#[test]
fn tracks_without_chapters_have_none() {
    let mut h = Harness::new(vec![track("song.mp3", 200.0)]);
    h.play(0);
    h.set_position(50.0);

    assert_eq!(h.delegate.chapter_count(), 0);
    assert!(h.delegate.playing_chapter().is_none());
    h.delegate.next_chapter();
    assert_eq!(h.delegate.seek_position(), 50.0);
}
