mod gap;
mod ids;
mod playback_state;
mod track;

pub use gap::{clamp_gap_seconds, GapPersistence, GapPosition, PlaybackGap, MAX_GAP_SECONDS};
pub use ids::TrackId;
pub use playback_state::{PlaybackLoop, PlaybackProfile, PlaybackState, RepeatMode};
pub use track::{Chapter, Track, TrackMetadata};
