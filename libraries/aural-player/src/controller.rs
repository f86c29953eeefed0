//! The control thread
//!
//! One thread owns the [`PlaybackDelegate`] and is the only place its state
//! changes. It multiplexes four inputs with `select!`:
//! - user commands from any number of [`PlayerHandle`] calls
//! - player events (transport completions, gap expiries, transcode results)
//! - insertion requests from add pipelines running on worker threads
//! - progress events from those pipelines
//!
//! After every message the delegate's buffered notifications are forwarded
//! to subscribers, so they observe transitions in the order they happened.
//! A pipeline event is published only after every insertion and autoplay
//! that pipeline requested before it.

use crate::command::{PlayerCommand, PlayerNotification, PlayerStatus};
use crate::config::{AuralConfig, ProfileSettings};
use crate::error::{PlayerError, Result};
use crate::proxy::{AddRequest, ControlTarget};
use crate::transcoder::PassThroughTranscoder;
use crate::transport::SimulatedTransport;
use aural_core::{FlatPlaylist, MetadataLoader, Playlist};
use aural_importer::{AutoplayOptions, TrackAddEvent, TrackAdder};
use aural_playback::{
    FileTrackReader, PlaybackComponents, PlaybackDelegate, PlaybackParams, PlaybackProfiles,
    PlayerEvent, PlaylistSequencer, ThreadGapTimer,
};
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Handle used by front ends to drive the player
pub struct PlayerHandle {
    cmd_tx: Sender<PlayerCommand>,
    notifications: Receiver<PlayerNotification>,
    join: Option<JoinHandle<()>>,
}

impl PlayerHandle {
    pub fn send_command(&self, cmd: PlayerCommand) {
        let _ = self.cmd_tx.send(cmd);
    }

    /// Everything the player publishes
    pub fn notifications(&self) -> &Receiver<PlayerNotification> {
        &self.notifications
    }

    /// Ask the control thread for a status snapshot
    pub fn status(&self) -> Result<PlayerStatus> {
        let (reply, response) = bounded(1);
        self.cmd_tx
            .send(PlayerCommand::Status(reply))
            .map_err(|_| PlayerError::ChannelClosed)?;
        response.recv().map_err(|_| PlayerError::ChannelClosed)
    }

    /// Convenience for [`PlayerCommand::AddFiles`]
    pub fn add_files(&self, paths: Vec<PathBuf>, options: AutoplayOptions) {
        self.send_command(PlayerCommand::AddFiles { paths, options });
    }

    /// Save state, stop the control thread and wait for it
    pub fn shutdown(mut self) -> Result<()> {
        self.stop_thread()
    }

    fn stop_thread(&mut self) -> Result<()> {
        let Some(join) = self.join.take() else {
            return Ok(());
        };
        let _ = self.cmd_tx.send(PlayerCommand::Shutdown);
        join.join().map_err(|_| PlayerError::ChannelClosed)
    }
}

impl Drop for PlayerHandle {
    fn drop(&mut self) {
        if let Err(e) = self.stop_thread() {
            warn!("Control thread ended abnormally: {}", e);
        }
    }
}

/// Start the control thread with the simulated transport
pub fn start_player(config: AuralConfig, loader: Box<dyn MetadataLoader>) -> Result<PlayerHandle> {
    config.validate()?;

    let (cmd_tx, cmd_rx) = unbounded();
    let (event_tx, event_rx) = unbounded();
    let (add_tx, add_rx) = unbounded();
    let (import_tx, import_rx) = unbounded();
    let (notify_tx, notify_rx) = unbounded();

    let profiles = match &config.profiles.path {
        Some(path) => {
            let profiles = PlaybackProfiles::load(path)?;
            info!("Loaded {} playback profiles from {}", profiles.len(), path.display());
            profiles
        }
        None => PlaybackProfiles::new(),
    };

    let components = PlaybackComponents {
        playlist: Box::new(FlatPlaylist::new()),
        sequencer: Box::new(PlaylistSequencer::new()),
        transport: Box::new(SimulatedTransport::new(
            event_tx.clone(),
            config.transport.speed,
        )),
        transcoder: Box::new(PassThroughTranscoder::new(
            event_tx.clone(),
            Duration::from_millis(config.transport.transcode_delay_ms),
        )),
        reader: Box::new(FileTrackReader::with_native_formats(
            config.transport.native_formats.iter().map(String::as_str),
        )),
        gap_timer: Box::new(ThreadGapTimer::new(event_tx)),
    };
    let delegate = PlaybackDelegate::new(components, config.playback.clone(), profiles);
    let adder = TrackAdder::new(loader, config.import.clone()).with_events(import_tx);

    let state = ControlState {
        delegate,
        adder: Arc::new(adder),
        add_tx,
        notifications: notify_tx,
        profiles: config.profiles,
    };
    let channels = ControlChannels {
        cmd_rx,
        event_rx,
        add_rx,
        import_rx,
    };

    let name = "aural-control".to_string();
    let join = thread::Builder::new()
        .name(name.clone())
        .spawn(move || run_control_loop(state, channels))
        .map_err(|source| PlayerError::ThreadSpawn { name, source })?;

    Ok(PlayerHandle {
        cmd_tx,
        notifications: notify_rx,
        join: Some(join),
    })
}

struct ControlChannels {
    cmd_rx: Receiver<PlayerCommand>,
    event_rx: Receiver<PlayerEvent>,
    add_rx: Receiver<AddRequest>,
    import_rx: Receiver<TrackAddEvent>,
}

struct ControlState {
    delegate: PlaybackDelegate,
    adder: Arc<TrackAdder>,
    add_tx: Sender<AddRequest>,
    notifications: Sender<PlayerNotification>,
    profiles: ProfileSettings,
}

fn run_control_loop(mut state: ControlState, channels: ControlChannels) {
    let ControlChannels {
        cmd_rx,
        event_rx,
        add_rx,
        import_rx,
    } = channels;

    info!("Control thread started");
    loop {
        select! {
            recv(cmd_rx) -> msg => {
                let Ok(cmd) = msg else { break };
                if state.handle_command(cmd) {
                    break;
                }
            }
            recv(event_rx) -> msg => {
                if let Ok(event) = msg {
                    state.delegate.handle_event(event);
                }
            }
            recv(add_rx) -> msg => {
                if let Ok(request) = msg {
                    request.apply(&mut state.delegate);
                }
            }
            recv(import_rx) -> msg => {
                if let Ok(event) = msg {
                    // Requests the pipeline sent before this event come first
                    for request in add_rx.try_iter() {
                        request.apply(&mut state.delegate);
                    }
                    state.flush();
                    state.publish(PlayerNotification::Import(event));
                }
            }
        }
        state.flush();
    }

    state.shutdown();
    info!("Control thread exited");
}

impl ControlState {
    /// Apply a command; true when the loop should exit
    fn handle_command(&mut self, cmd: PlayerCommand) -> bool {
        let delegate = &mut self.delegate;
        match cmd {
            PlayerCommand::PlayIndex(index) => {
                delegate.play_index(index, PlaybackParams::new());
            }
            PlayerCommand::Begin => {
                delegate.begin();
            }
            PlayerCommand::TogglePlayPause => delegate.toggle_play_pause(),
            PlayerCommand::Pause => delegate.pause(),
            PlayerCommand::Resume => delegate.resume(),
            PlayerCommand::Stop => {
                delegate.stop();
            }
            PlayerCommand::Next => {
                delegate.next();
            }
            PlayerCommand::Previous => {
                delegate.previous();
            }
            PlayerCommand::Replay => delegate.replay(),
            PlayerCommand::SeekTo(time) => delegate.seek_to_time(time),
            PlayerCommand::SeekToPercentage(percent) => delegate.seek_to_percentage(percent),
            PlayerCommand::SeekForward(mode) => delegate.seek_forward(mode),
            PlayerCommand::SeekBackward(mode) => delegate.seek_backward(mode),
            PlayerCommand::SeekForwardSecondary => delegate.seek_forward_secondary(),
            PlayerCommand::SeekBackwardSecondary => delegate.seek_backward_secondary(),
            PlayerCommand::PlayChapter(index) => delegate.play_chapter(index),
            PlayerCommand::NextChapter => delegate.next_chapter(),
            PlayerCommand::PreviousChapter => delegate.previous_chapter(),
            PlayerCommand::ReplayChapter => delegate.replay_chapter(),
            PlayerCommand::ToggleLoop => {
                delegate.toggle_loop();
            }
            PlayerCommand::ToggleChapterLoop => {
                delegate.toggle_chapter_loop();
            }
            PlayerCommand::AddFiles { paths, options } => self.spawn_add(paths, options),
            PlayerCommand::RemoveTracks(indices) => {
                let removed = delegate.remove_tracks(&indices);
                debug!("Removed {} tracks", removed.len());
            }
            PlayerCommand::ClearPlaylist => delegate.clear_playlist(),
            PlayerCommand::SaveProfile => delegate.save_profile(),
            PlayerCommand::DeleteProfile => delegate.delete_profile(),
            PlayerCommand::SetPreferences(preferences) => delegate.set_preferences(preferences),
            PlayerCommand::Status(reply) => {
                let _ = reply.send(self.status());
            }
            PlayerCommand::Shutdown => return true,
        }
        false
    }

    /// Load metadata off-thread; insertion comes back through the proxy
    fn spawn_add(&mut self, paths: Vec<PathBuf>, options: AutoplayOptions) {
        let adder = Arc::clone(&self.adder);
        let mut target = ControlTarget::new(self.add_tx.clone());
        let worker_paths = paths.clone();

        let spawned = thread::Builder::new()
            .name("aural-add".to_string())
            .spawn(move || {
                let report = adder.add_files(&mut target, &worker_paths, options);
                info!(
                    "Add finished: {} of {} tracks added, {} errors",
                    report.added.len(),
                    report.total,
                    report.errors.len()
                );
            });

        if let Err(e) = spawned {
            // Fall back to adding on this thread; the UI stalls but nothing is lost
            warn!("Failed to spawn add worker: {}; adding inline", e);
            self.adder.add_files(&mut self.delegate, &paths, options);
        }
    }

    fn status(&self) -> PlayerStatus {
        let delegate = &self.delegate;
        PlayerStatus {
            state: delegate.state(),
            track: delegate.active_track().map(|t| t.id.clone()),
            session: delegate.current_session().map(|s| s.id),
            position: delegate.seek_position(),
            playlist_len: delegate.playlist().size(),
        }
    }

    fn publish(&self, notification: PlayerNotification) {
        let _ = self.notifications.send(notification);
    }

    fn flush(&mut self) {
        for notification in self.delegate.drain_notifications() {
            debug!("Publishing {}", notification.kind());
            self.publish(PlayerNotification::Playback(notification));
        }
    }

    fn shutdown(&mut self) {
        self.delegate.on_app_exit();
        self.flush();

        if !self.profiles.save_on_exit {
            return;
        }
        if let Some(path) = &self.profiles.path {
            match self.delegate.profiles().save(path) {
                Ok(()) => info!(
                    "Saved {} playback profiles to {}",
                    self.delegate.profiles().len(),
                    path.display()
                ),
                Err(e) => warn!("Failed to save playback profiles: {}", e),
            }
        }
    }
}
