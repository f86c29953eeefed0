/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A named region of a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter title
    pub title: String,

    /// Start of the chapter in seconds (inclusive)
    pub start_time: f64,

    /// End of the chapter in seconds (exclusive)
    pub end_time: f64,
}

impl Chapter {
    /// Create a new chapter
    pub fn new(title: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            title: title.into(),
            start_time,
            end_time,
        }
    }

    /// Whether `position` lies within `[start_time, end_time)`
    #[inline]
    pub fn contains(&self, position: f64) -> bool {
        position >= self.start_time && position < self.end_time
    }

    /// Chapter length in seconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Audio track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// File path on disk
    pub file_path: PathBuf,

    /// Track title
    pub title: Option<String>,

    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Track duration in seconds
    pub duration: f64,

    /// Chapters, sorted by start time and non-overlapping
    chapters: Vec<Chapter>,
}

impl Track {
    /// Create a new track with no metadata
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            id: TrackId::from_path(&file_path),
            file_path,
            title: None,
            artist: None,
            album: None,
            duration: 0.0,
            chapters: Vec::new(),
        }
    }

    /// Create a track from loaded primary metadata
    pub fn with_metadata(file_path: PathBuf, metadata: TrackMetadata) -> Self {
        let mut track = Self::new(file_path);
        track.apply_metadata(metadata);
        track
    }

    /// Overwrite this track's primary info with `metadata`
    pub fn apply_metadata(&mut self, metadata: TrackMetadata) {
        self.title = metadata.title;
        self.artist = metadata.artist;
        self.album = metadata.album;
        self.duration = metadata.duration_ms.map_or(0.0, |ms| ms as f64 / 1000.0);
        self.set_chapters(metadata.chapters);
    }

    /// Builder-style duration setter
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    /// Builder-style chapters setter
    pub fn with_chapters(mut self, chapters: Vec<Chapter>) -> Self {
        self.set_chapters(chapters);
        self
    }

    /// Replace the chapter list, keeping it sorted by start time
    pub fn set_chapters(&mut self, mut chapters: Vec<Chapter>) {
        chapters.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        self.chapters = chapters;
    }

    /// Chapters sorted by start time
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Whether the track has any chapter markers
    pub fn has_chapters(&self) -> bool {
        !self.chapters.is_empty()
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration.max(0.0))
    }

    /// Lowercase file extension, used to decide native playability
    pub fn format(&self) -> Option<String> {
        self.file_path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    /// Title if tagged, else the file stem
    pub fn display_name(&self) -> String {
        self.title.clone().unwrap_or_else(|| {
            self.file_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.id.to_string())
        })
    }

    /// Whether this track refers to the file at `path`
    pub fn is_at(&self, path: &Path) -> bool {
        self.file_path == path
    }
}

/// Track metadata extracted from file tags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Track title
    pub title: Option<String>,

    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Album artist
    pub album_artist: Option<String>,

    /// Track number
    pub track_number: Option<u32>,

    /// Disc number
    pub disc_number: Option<u32>,

    /// Release year
    pub year: Option<u32>,

    /// Genre
    pub genre: Option<String>,

    /// Duration in milliseconds
    pub duration_ms: Option<u64>,

    /// Chapter markers, if the container carries any
    pub chapters: Vec<Chapter>,
}

impl TrackMetadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if metadata has any useful information
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.album.is_none()
            && self.album_artist.is_none()
            && self.track_number.is_none()
            && self.disc_number.is_none()
            && self.year.is_none()
            && self.genre.is_none()
            && self.duration_ms.is_none()
            && self.chapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_creation() {
        let track = Track::new(PathBuf::from("/music/song.mp3"));
        assert_eq!(track.id.as_str(), "/music/song.mp3");
        assert_eq!(track.display_name(), "song");
        assert!(track.artist.is_none());
    }

    #[test]
    fn format_is_lowercase_extension() {
        let track = Track::new(PathBuf::from("/music/Song.FLAC"));
        assert_eq!(track.format().as_deref(), Some("flac"));
        assert_eq!(Track::new(PathBuf::from("/music/noext")).format(), None);
    }

    #[test]
    fn metadata_applies_duration_in_seconds() {
        let metadata = TrackMetadata {
            title: Some("Title".to_string()),
            duration_ms: Some(181_500),
            ..TrackMetadata::default()
        };
        let track = Track::with_metadata(PathBuf::from("/a.mp3"), metadata);
        assert_eq!(track.duration, 181.5);
        assert_eq!(track.display_name(), "Title");
    }

    #[test]
    fn chapters_are_kept_sorted() {
        let track = Track::new(PathBuf::from("/book.m4b")).with_chapters(vec![
            Chapter::new("two", 60.0, 120.0),
            Chapter::new("one", 0.0, 60.0),
        ]);
        let titles: Vec<_> = track.chapters().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two"]);
    }

    #[test]
    fn chapter_bounds_are_half_open() {
        let chapter = Chapter::new("c", 10.0, 20.0);
        assert!(chapter.contains(10.0));
        assert!(chapter.contains(19.99));
        assert!(!chapter.contains(20.0));
        assert!(!chapter.contains(9.99));
    }

    #[test]
    fn metadata_is_empty() {
        let empty = TrackMetadata::new();
        assert!(empty.is_empty());

        let mut filled = TrackMetadata::new();
        filled.title = Some("Title".to_string());
        assert!(!filled.is_empty());
    }
}
