//! Collection phase: user paths → flat candidate list
//!
//! Runs synchronously before any metadata is read. Explicitly named files
//! that are missing or not audio become errors; non-audio files found while
//! walking a directory are skipped.

use crate::error::ImportError;
use crate::playlist_file::{is_playlist_file, read_playlist};
use crate::session::TrackAddSession;
use crate::settings::ImportSettings;
use crate::target::AddTarget;
use aural_core::MetadataLoader;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A file waiting for its metadata
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub path: PathBuf,

    /// Index of the top-level path it came from
    pub origin: usize,
}

pub(crate) struct Collector<'a> {
    loader: &'a dyn MetadataLoader,
    target: &'a dyn AddTarget,
    settings: &'a ImportSettings,
    seen: HashSet<PathBuf>,
    visited_playlists: HashSet<PathBuf>,
    candidates: Vec<Candidate>,
}

impl<'a> Collector<'a> {
    pub fn new(
        loader: &'a dyn MetadataLoader,
        target: &'a dyn AddTarget,
        settings: &'a ImportSettings,
    ) -> Self {
        Self {
            loader,
            target,
            settings,
            seen: HashSet::new(),
            visited_playlists: HashSet::new(),
            candidates: Vec::new(),
        }
    }

    pub fn collect(mut self, paths: &[PathBuf], session: &mut TrackAddSession) -> Vec<Candidate> {
        for (origin, path) in paths.iter().enumerate() {
            self.add_named(path, origin, session);
        }
        debug!(
            "Collected {} candidates ({} errors)",
            self.candidates.len(),
            session.errors.len()
        );
        self.candidates
    }

    /// Canonical form used for duplicate checks
    pub fn resolve(settings: &ImportSettings, path: &Path) -> PathBuf {
        if settings.follow_symlinks {
            fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        } else {
            path.to_path_buf()
        }
    }

    /// A path the user or a playlist file named explicitly
    fn add_named(&mut self, path: &Path, origin: usize, session: &mut TrackAddSession) {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                session.total_tracks += 1;
                let error = if e.kind() == ErrorKind::NotFound {
                    ImportError::FileNotFound(path.to_path_buf())
                } else {
                    ImportError::io(path, &e)
                };
                session.record_error(error);
                return;
            }
        };

        let resolved = Self::resolve(self.settings, path);
        if metadata.is_dir() {
            self.add_directory(&resolved, origin, session);
        } else if is_playlist_file(&resolved) {
            self.add_playlist(&resolved, origin, session);
        } else if self.loader.is_supported(&resolved) {
            self.push_candidate(resolved, origin, session);
        } else {
            session.total_tracks += 1;
            session.record_error(ImportError::UnsupportedFormat(path.to_path_buf()));
        }
    }

    fn add_directory(&mut self, dir: &Path, origin: usize, session: &mut TrackAddSession) {
        let max_depth = if self.settings.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(self.settings.follow_symlinks)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(dir).to_path_buf();
                    let message = e.to_string();
                    session.total_tracks += 1;
                    session.record_error(ImportError::Io { path, message });
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }

            let resolved = Self::resolve(self.settings, entry.path());
            if is_playlist_file(&resolved) {
                self.add_playlist(&resolved, origin, session);
            } else if self.loader.is_supported(&resolved) {
                self.push_candidate(resolved, origin, session);
            }
        }
    }

    fn add_playlist(&mut self, path: &Path, origin: usize, session: &mut TrackAddSession) {
        if !self.visited_playlists.insert(path.to_path_buf()) {
            debug!("Playlist {} already expanded", path.display());
            return;
        }
        match read_playlist(path) {
            Ok(entries) => {
                debug!("Expanding {} ({} entries)", path.display(), entries.len());
                for entry in entries {
                    self.add_named(&entry, origin, session);
                }
            }
            Err(error) => {
                session.total_tracks += 1;
                session.record_error(error);
            }
        }
    }

    fn push_candidate(&mut self, path: PathBuf, origin: usize, session: &mut TrackAddSession) {
        if self.target.has_track(&path) || !self.seen.insert(path.clone()) {
            debug!("Skipping duplicate {}", path.display());
            return;
        }
        session.total_tracks += 1;
        self.candidates.push(Candidate { path, origin });
    }
}
