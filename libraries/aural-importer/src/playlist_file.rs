//! m3u / m3u8 playlist files
//!
//! Only plain entries are read; `#EXTINF` and other directives are ignored.
//! Relative entries resolve against the playlist's own directory.

use crate::error::ImportError;
use std::fs;
use std::path::{Path, PathBuf};

const PLAYLIST_EXTENSIONS: &[&str] = &["m3u", "m3u8"];

pub fn is_playlist_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| PLAYLIST_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Read the file entries of the playlist at `path`
pub fn read_playlist(path: &Path) -> crate::Result<Vec<PathBuf>> {
    let bytes = fs::read(path).map_err(|e| ImportError::PlaylistFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let contents = String::from_utf8_lossy(&bytes);
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(parse_entries(&contents, base))
}

/// Entries of playlist text, resolved against `base`
pub fn parse_entries(contents: &str, base: &Path) -> Vec<PathBuf> {
    contents
        .lines()
        .map(|line| line.trim_start_matches('\u{feff}').trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("file://").unwrap_or(line);
            // Streams are not files
            if line.contains("://") {
                return None;
            }
            let entry = Path::new(line);
            Some(if entry.is_absolute() {
                entry.to_path_buf()
            } else {
                base.join(entry)
            })
        })
        .collect()
}
