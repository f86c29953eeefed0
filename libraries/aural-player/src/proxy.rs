//! Insertion proxy for add pipelines running off the control thread
//!
//! The pipeline loads metadata on its own threads but every playlist
//! lookup, insertion and autoplay must happen on the control thread. The
//! proxy forwards each call as an [`AddRequest`] and blocks on the reply.

use aural_core::{Track, TrackAddResult};
use aural_importer::AddTarget;
use crossbeam_channel::{bounded, Sender};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub(crate) enum AddRequest {
    Find {
        path: PathBuf,
        reply: Sender<Option<Arc<Track>>>,
    },
    Add {
        track: Track,
        reply: Sender<Option<TrackAddResult>>,
    },
    Autoplay {
        track: Arc<Track>,
        interrupt: bool,
    },
}

impl AddRequest {
    /// Apply the request to the target owned by the control thread
    pub(crate) fn apply(self, target: &mut dyn AddTarget) {
        match self {
            Self::Find { path, reply } => {
                let _ = reply.send(target.find_track(&path));
            }
            Self::Add { track, reply } => {
                let _ = reply.send(target.add_track(track));
            }
            Self::Autoplay { track, interrupt } => target.autoplay(track, interrupt),
        }
    }
}

/// `AddTarget` that lives on a pipeline thread
///
/// Once the control loop has exited every lookup misses and every insert is
/// refused, so a pipeline still running at shutdown winds down on its own.
pub(crate) struct ControlTarget {
    requests: Sender<AddRequest>,
}

impl ControlTarget {
    pub(crate) fn new(requests: Sender<AddRequest>) -> Self {
        Self { requests }
    }
}

impl AddTarget for ControlTarget {
    fn find_track(&self, path: &Path) -> Option<Arc<Track>> {
        let (reply, response) = bounded(1);
        self.requests
            .send(AddRequest::Find {
                path: path.to_path_buf(),
                reply,
            })
            .ok()?;
        response.recv().ok().flatten()
    }

    fn add_track(&mut self, track: Track) -> Option<TrackAddResult> {
        let (reply, response) = bounded(1);
        self.requests.send(AddRequest::Add { track, reply }).ok()?;
        response.recv().ok().flatten()
    }

    fn autoplay(&mut self, track: Arc<Track>, interrupt: bool) {
        let _ = self.requests.send(AddRequest::Autoplay { track, interrupt });
    }
}
