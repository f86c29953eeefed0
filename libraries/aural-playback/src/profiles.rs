//! Playback profiles: remembered last positions per track

use crate::{error::Result, preferences::RememberPosition};
use aural_core::{PlaybackProfile, Track, TrackId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Store of playback profiles keyed by track identity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaybackProfiles {
    profiles: HashMap<TrackId, PlaybackProfile>,
}

impl PlaybackProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load profiles from a JSON file; a missing file yields an empty store
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = std::fs::read_to_string(path)?;
        let profiles = serde_json::from_str(&contents).map_err(aural_core::AuralError::from)?;
        Ok(profiles)
    }

    /// Write profiles to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(aural_core::AuralError::from)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn get(&self, id: &TrackId) -> Option<&PlaybackProfile> {
        self.profiles.get(id)
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.profiles.contains_key(id)
    }

    /// Create or overwrite the profile for `track`
    ///
    /// A position at or past the track's end means it finished, so the
    /// saved position resets to the start.
    pub fn upsert(&mut self, track: &Track, position: f64) -> &PlaybackProfile {
        let position = if track.duration > 0.0 && position >= track.duration {
            0.0
        } else {
            position.max(0.0)
        };
        let profile = self
            .profiles
            .entry(track.id.clone())
            .or_insert_with(|| PlaybackProfile::new(track.id.clone(), 0.0));
        profile.last_position = position;
        profile
    }

    /// Save according to `policy`; returns whether anything was written
    pub fn save_by_policy(&mut self, policy: RememberPosition, track: &Track, position: f64) -> bool {
        let allowed = match policy {
            RememberPosition::Disabled => false,
            RememberPosition::IndividualTracks => self.contains(&track.id),
            RememberPosition::AllTracks => true,
        };
        if allowed {
            self.upsert(track, position);
        }
        allowed
    }

    pub fn remove(&mut self, id: &TrackId) -> Option<PlaybackProfile> {
        self.profiles.remove(id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
