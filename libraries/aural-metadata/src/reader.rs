/// Metadata loader implementation using lofty
use crate::chapters::chapters_from_comments;
use crate::error::MetadataError;
use aural_core::{MetadataLoader, TrackMetadata};
use lofty::{AudioFile, ItemKey, TaggedFileExt};
use std::path::Path;
use tracing::debug;

/// Extensions lofty can probe, lowercase
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "aac", "aif", "aifc", "aiff", "ape", "flac", "m4a", "m4b", "mp3", "mp4", "mpc", "oga", "ogg",
    "opus", "spx", "wav", "wv",
];

/// Metadata loader using the lofty library
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyMetadataLoader;

impl LoftyMetadataLoader {
    /// Create a new metadata loader
    pub fn new() -> Self {
        Self
    }

    /// Extract primary info from a lofty tag
    fn extract_from_tag(tag: &lofty::Tag) -> TrackMetadata {
        let mut metadata = TrackMetadata::new();

        for item in tag.items() {
            let text = item.value().text();
            match item.key() {
                ItemKey::TrackTitle => metadata.title = text.map(str::to_string),
                ItemKey::TrackArtist => metadata.artist = text.map(str::to_string),
                ItemKey::AlbumTitle => metadata.album = text.map(str::to_string),
                ItemKey::AlbumArtist => metadata.album_artist = text.map(str::to_string),
                ItemKey::Genre => metadata.genre = text.map(str::to_string),
                ItemKey::Year => metadata.year = text.and_then(leading_number),
                ItemKey::TrackNumber => metadata.track_number = text.and_then(leading_number),
                ItemKey::DiscNumber => metadata.disc_number = text.and_then(leading_number),
                _ => {}
            }
        }

        metadata
    }

    /// Chapter markers among a tag's unmapped items
    fn extract_chapters(tag: &lofty::Tag, duration: f64) -> Vec<aural_core::Chapter> {
        let comments = tag.items().filter_map(|item| match (item.key(), item.value().text()) {
            (ItemKey::Unknown(key), Some(value)) => Some((key.as_str(), value)),
            _ => None,
        });
        chapters_from_comments(comments, duration)
    }

    fn read(&self, path: &Path) -> crate::Result<TrackMetadata> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.to_path_buf()));
        }
        if !self.is_supported(path) {
            return Err(MetadataError::UnsupportedFormat(path.display().to_string()));
        }

        let tagged_file = lofty::read_from_path(path)?;

        let duration = tagged_file.properties().duration();
        let duration_ms = u64::try_from(duration.as_millis()).ok();

        // Primary tag, else whichever tag the file has
        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.tags().first());

        let mut metadata = tag.map(Self::extract_from_tag).unwrap_or_default();
        metadata.duration_ms = duration_ms;
        if let Some(tag) = tag {
            metadata.chapters = Self::extract_chapters(tag, duration.as_secs_f64());
        }

        debug!(
            "Loaded {} ({} ms, {} chapters)",
            path.display(),
            duration_ms.unwrap_or(0),
            metadata.chapters.len()
        );
        Ok(metadata)
    }
}

/// "3/12" and "2024-05-01" both carry their number first
fn leading_number(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

impl MetadataLoader for LoftyMetadataLoader {
    fn load_primary(&self, path: &Path) -> aural_core::Result<TrackMetadata> {
        self.read(path).map_err(Into::into)
    }

    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_by_extension_case_insensitively() {
        let loader = LoftyMetadataLoader::new();
        assert!(loader.is_supported(Path::new("/music/a.MP3")));
        assert!(loader.is_supported(Path::new("/music/book.m4b")));
        assert!(!loader.is_supported(Path::new("/music/cover.jpg")));
        assert!(!loader.is_supported(Path::new("/music/README")));
    }

    #[test]
    fn numbers_are_read_up_to_the_first_separator() {
        assert_eq!(leading_number("3/12"), Some(3));
        assert_eq!(leading_number("2024-05-01"), Some(2024));
        assert_eq!(leading_number(" 7 "), Some(7));
        assert_eq!(leading_number("side A"), None);
    }

    #[test]
    fn read_nonexistent_file_returns_not_found() {
        let loader = LoftyMetadataLoader::new();
        let result = loader.load_primary(Path::new("/nonexistent/file.mp3"));
        assert!(matches!(result, Err(aural_core::AuralError::FileNotFound(_))));
    }
}
