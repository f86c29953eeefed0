//! Chapter navigation
//!
//! Chapter lookup is polled by the UI roughly twice a second against tracks
//! that may carry hundreds of chapters, so it binary-searches the sorted
//! start times.

use crate::{delegate::PlaybackDelegate, events::PlaybackNotification};
use aural_core::{Chapter, PlaybackLoop};
use std::sync::Arc;

/// A chapter together with its position in the track's chapter list
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedChapter {
    pub index: usize,
    pub chapter: Chapter,
}

/// Index of the chapter whose `[start, end)` contains `position`
///
/// `chapters` must be sorted by start time and non-overlapping.
pub fn chapter_index_at(chapters: &[Chapter], position: f64) -> Option<usize> {
    let starts_at_or_before = chapters.partition_point(|c| c.start_time <= position);
    let candidate = starts_at_or_before.checked_sub(1)?;
    chapters[candidate].contains(position).then_some(candidate)
}

/// Index of the first chapter starting after `position`
fn next_chapter_index(chapters: &[Chapter], position: f64) -> Option<usize> {
    let index = chapters.partition_point(|c| c.start_time <= position);
    (index < chapters.len()).then_some(index)
}

/// Index of the chapter before the one at `position`
///
/// Between chapters, the one that ended most recently. None before or
/// within the first chapter.
fn previous_chapter_index(chapters: &[Chapter], position: f64) -> Option<usize> {
    let started = chapters.partition_point(|c| c.start_time <= position);
    let last_started = started.checked_sub(1)?;
    if chapters[last_started].contains(position) {
        last_started.checked_sub(1)
    } else {
        Some(last_started)
    }
}

impl PlaybackDelegate {
    // ===== Chapters =====

    pub fn chapter_count(&self) -> usize {
        self.playing_track().map_or(0, |t| t.chapters().len())
    }

    /// The chapter containing the current position
    pub fn playing_chapter(&self) -> Option<IndexedChapter> {
        let track = self.playing_track()?;
        let index = chapter_index_at(track.chapters(), self.seek_position())?;
        Some(IndexedChapter {
            index,
            chapter: track.chapters()[index].clone(),
        })
    }

    /// Jump to the start of chapter `index`, resuming if paused
    pub fn play_chapter(&mut self, index: usize) {
        let Some(track) = self.playing_track() else {
            return;
        };
        if index < track.chapters().len() {
            self.seek_to_chapter(&track, index);
        }
    }

    pub fn next_chapter(&mut self) {
        let Some(track) = self.playing_track() else {
            return;
        };
        if let Some(index) = next_chapter_index(track.chapters(), self.seek_position()) {
            self.seek_to_chapter(&track, index);
        }
    }

    pub fn previous_chapter(&mut self) {
        let Some(track) = self.playing_track() else {
            return;
        };
        if let Some(index) = previous_chapter_index(track.chapters(), self.seek_position()) {
            self.seek_to_chapter(&track, index);
        }
    }

    /// Restart the playing chapter
    pub fn replay_chapter(&mut self) {
        let Some(track) = self.playing_track() else {
            return;
        };
        if let Some(index) = chapter_index_at(track.chapters(), self.seek_position()) {
            self.seek_to_chapter(&track, index);
        }
    }

    /// Loop the playing chapter, or remove that loop if it is already set
    pub fn toggle_chapter_loop(&mut self) -> Option<PlaybackLoop> {
        let chapter = self.playing_chapter()?.chapter;
        let chapter_loop = PlaybackLoop::complete(chapter.start_time, chapter.end_time);

        let playback_loop = if self.transport.playback_loop() == Some(chapter_loop) {
            self.transport.remove_loop();
            None
        } else {
            self.transport
                .define_loop(chapter.start_time, chapter.end_time);
            Some(chapter_loop)
        };
        self.publish(PlaybackNotification::PlaybackLoopChanged { playback_loop });
        playback_loop
    }

    fn seek_to_chapter(&mut self, track: &Arc<aural_core::Track>, index: usize) {
        let start = track.chapters()[index].start_time;
        let result = self.transport.force_seek_to_time(track, start);
        self.apply_seek_result(result);
        self.resume_if_paused();
    }
}
