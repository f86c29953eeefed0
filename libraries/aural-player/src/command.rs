//! Messages exchanged with the control thread

use aural_core::{PlaybackState, TrackId};
use aural_importer::{AutoplayOptions, TrackAddEvent};
use aural_playback::{PlaybackNotification, PlaybackPreferences, SessionId, UserInputMode};
use crossbeam_channel::Sender;
use std::path::PathBuf;

/// Commands sent to the control thread
#[derive(Debug, Clone)]
pub enum PlayerCommand {
    /// Play the playlist track at an index
    PlayIndex(usize),

    /// Start from the sequencer's first track
    Begin,

    TogglePlayPause,
    Pause,
    Resume,
    Stop,
    Next,
    Previous,

    /// Restart the current track
    Replay,

    /// Seek to an absolute position (in seconds)
    SeekTo(f64),

    /// Seek to a percentage of the track (0-100)
    SeekToPercentage(f64),

    SeekForward(UserInputMode),
    SeekBackward(UserInputMode),
    SeekForwardSecondary,
    SeekBackwardSecondary,

    PlayChapter(usize),
    NextChapter,
    PreviousChapter,
    ReplayChapter,
    ToggleLoop,
    ToggleChapterLoop,

    /// Run the track-add pipeline on a worker thread
    AddFiles {
        paths: Vec<PathBuf>,
        options: AutoplayOptions,
    },

    /// Remove playlist tracks by index
    RemoveTracks(Vec<usize>),

    ClearPlaylist,

    SaveProfile,
    DeleteProfile,

    SetPreferences(PlaybackPreferences),

    /// Reply with a status snapshot
    Status(Sender<PlayerStatus>),

    /// Save state and exit the control loop
    Shutdown,
}

/// Everything published by the player, in order per source
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerNotification {
    Playback(PlaybackNotification),
    Import(TrackAddEvent),
}

/// Point-in-time view of the player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatus {
    pub state: PlaybackState,

    /// The playing, waiting or transcoding track
    pub track: Option<TrackId>,

    pub session: Option<SessionId>,

    /// Seconds into the playing track
    pub position: f64,

    pub playlist_len: usize,
}
