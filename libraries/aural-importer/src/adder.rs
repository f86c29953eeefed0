//! Batched metadata loading and ordered insertion

use crate::collect::{Candidate, Collector};
use crate::error::ImportError;
use crate::events::{AddProgress, TrackAddEvent};
use crate::session::{AutoplayOptions, TrackAddSession};
use crate::settings::ImportSettings;
use crate::target::AddTarget;
use aural_core::{AuralError, MetadataLoader, Track, TrackAddResult, TrackMetadata};
use crossbeam_channel::Sender;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Outcome of one add operation
#[derive(Debug, Default)]
pub struct TrackAddReport {
    pub added: Vec<TrackAddResult>,
    pub errors: Vec<ImportError>,
    pub total: usize,
    pub processed: usize,
    pub items_added: Vec<PathBuf>,
}

/// The track-add pipeline
pub struct TrackAdder {
    loader: Box<dyn MetadataLoader>,
    settings: ImportSettings,
    events: Option<Sender<TrackAddEvent>>,
}

impl TrackAdder {
    pub fn new(loader: Box<dyn MetadataLoader>, settings: ImportSettings) -> Self {
        Self {
            loader,
            settings,
            events: None,
        }
    }

    /// Publish pipeline events on `sender`
    pub fn with_events(mut self, sender: Sender<TrackAddEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Add files, directories and playlist files to `target`
    ///
    /// Individual failures are collected in the report; the operation itself
    /// always runs to completion.
    pub fn add_files(
        &self,
        target: &mut dyn AddTarget,
        paths: &[PathBuf],
        autoplay: AutoplayOptions,
    ) -> TrackAddReport {
        let mut session = TrackAddSession::new(autoplay);
        self.publish(TrackAddEvent::StartedAdding { items: paths.len() });

        // ===== Collection =====
        let candidates =
            Collector::new(self.loader.as_ref(), &*target, &self.settings).collect(paths, &mut session);

        // ===== Batches =====
        let batch_size = self.settings.effective_batch_size();
        let mut origins = BTreeSet::new();
        for (number, batch) in candidates.chunks(batch_size).enumerate() {
            debug!("Loading batch {} ({} files)", number + 1, batch.len());
            let loaded = self.load_batch(batch);
            self.insert_batch(target, batch, loaded, &mut session, &mut origins);
        }

        session.added_top_level_items = origins.into_iter().map(|i| paths[i].clone()).collect();

        info!(
            "Added {} of {} tracks ({} not added)",
            session.tracks_added,
            session.total_tracks,
            session.errors.len()
        );
        self.publish(TrackAddEvent::ItemsAdded(session.added_top_level_items.clone()));
        self.publish(TrackAddEvent::DoneAdding(session.progress()));
        if !session.errors.is_empty() {
            self.publish(TrackAddEvent::TracksNotAdded(session.errors.clone()));
        }

        TrackAddReport {
            added: session.results,
            errors: session.errors,
            total: session.total_tracks,
            processed: session.tracks_processed,
            items_added: session.added_top_level_items,
        }
    }

    /// The playlist's track for `path`, adding it first if needed
    pub fn find_or_add_file(
        &self,
        target: &mut dyn AddTarget,
        path: &Path,
    ) -> crate::Result<Arc<Track>> {
        if fs::metadata(path).is_err() {
            return Err(ImportError::FileNotFound(path.to_path_buf()));
        }
        let resolved = Collector::resolve(&self.settings, path);
        if let Some(existing) = target.find_track(&resolved) {
            return Ok(existing);
        }
        if !self.loader.is_supported(&resolved) {
            return Err(ImportError::UnsupportedFormat(path.to_path_buf()));
        }

        let metadata = load_one(self.loader.as_ref(), &resolved)?;
        let track = Track::with_metadata(resolved.clone(), metadata);
        match target.add_track(track) {
            Some(result) => {
                self.publish(TrackAddEvent::TrackAdded {
                    track: Arc::clone(&result.track),
                    index: result.index,
                    progress: AddProgress { added: 1, total: 1 },
                });
                Ok(result.track)
            }
            None => target
                .find_track(&resolved)
                .ok_or(ImportError::FileNotFound(resolved)),
        }
    }

    /// Load every candidate concurrently and wait for all of them
    fn load_batch(&self, batch: &[Candidate]) -> Vec<crate::Result<TrackMetadata>> {
        let loader = self.loader.as_ref();
        thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|candidate| {
                    thread::Builder::new()
                        .name("aural-metadata".to_string())
                        .spawn_scoped(scope, move || load_one(loader, &candidate.path))
                })
                .collect();

            handles
                .into_iter()
                .zip(batch)
                .map(|(handle, candidate)| match handle {
                    Ok(handle) => handle.join().unwrap_or_else(|_| {
                        Err(ImportError::metadata(&candidate.path, "metadata loader panicked"))
                    }),
                    Err(e) => {
                        warn!("Could not spawn metadata worker: {}", e);
                        load_one(loader, &candidate.path)
                    }
                })
                .collect()
        })
    }

    /// Insert one loaded batch in candidate order
    fn insert_batch(
        &self,
        target: &mut dyn AddTarget,
        batch: &[Candidate],
        loaded: Vec<crate::Result<TrackMetadata>>,
        session: &mut TrackAddSession,
        origins: &mut BTreeSet<usize>,
    ) {
        for (candidate, metadata) in batch.iter().zip(loaded) {
            session.tracks_processed += 1;
            let metadata = match metadata {
                Ok(metadata) => metadata,
                Err(error) => {
                    warn!("Not adding {}: {}", candidate.path.display(), error);
                    session.errors.push(error);
                    continue;
                }
            };

            let track = Track::with_metadata(candidate.path.clone(), metadata);
            let Some(result) = target.add_track(track) else {
                debug!("{} was added meanwhile", candidate.path.display());
                continue;
            };

            session.tracks_added += 1;
            origins.insert(candidate.origin);
            self.publish(TrackAddEvent::TrackAdded {
                track: Arc::clone(&result.track),
                index: result.index,
                progress: session.progress(),
            });

            if session.take_autoplay() {
                debug!("Autoplaying {}", result.track.id);
                target.autoplay(Arc::clone(&result.track), session.autoplay.interrupt);
            }
            session.results.push(result);
        }
    }

    fn publish(&self, event: TrackAddEvent) {
        if let Some(events) = &self.events {
            if let Err(e) = events.send(event) {
                debug!("Track-add event dropped: {}", e);
            }
        }
    }
}

fn load_one(loader: &dyn MetadataLoader, path: &Path) -> crate::Result<TrackMetadata> {
    loader.load_primary(path).map_err(|e| match e {
        AuralError::FileNotFound(path) => ImportError::FileNotFound(path),
        other => ImportError::metadata(path, other.to_string()),
    })
}
