/// Aural - headless playback from the command line
use aural_core::{FlatPlaylist, PlaybackState, Track};
use aural_importer::{AutoplayOptions, TrackAddEvent, TrackAdder};
use aural_metadata::LoftyMetadataLoader;
use aural_player::{start_player, AuralConfig, PlayerNotification};
use aural_playback::PlaybackNotification;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long to wait for trailing notifications once playback is idle
const DRAIN_TIMEOUT: Duration = Duration::from_millis(200);

#[derive(Parser)]
#[command(name = "aural")]
#[command(about = "Headless Aural player", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "AURAL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add files, directories and playlists to a fresh playlist and report
    Scan {
        /// Files, directories or m3u playlists
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Only add the top level of directories
        #[arg(long)]
        no_recursive: bool,
    },
    /// Play through the simulated transport until the sequence ends
    Play {
        /// Files, directories or m3u playlists
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Silence between tracks that finish naturally
        #[arg(long, value_name = "SECS")]
        gap: Option<f64>,

        /// Playback clock multiplier
        #[arg(long, value_name = "FACTOR")]
        speed: Option<f64>,

        /// Print notifications as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration (file plus environment) as TOML
    Config,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "aural_cli=info,aural_player=info,aural_playback=info,aural_importer=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AuralConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan {
            paths,
            json,
            no_recursive,
        } => scan(config, &paths, json, no_recursive),
        Commands::Play {
            paths,
            gap,
            speed,
            json,
        } => play(config, paths, gap, speed, json),
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn scan(
    mut config: AuralConfig,
    paths: &[PathBuf],
    json: bool,
    no_recursive: bool,
) -> anyhow::Result<()> {
    if no_recursive {
        config.import.recursive = false;
    }

    let adder = TrackAdder::new(Box::new(LoftyMetadataLoader::new()), config.import);
    let mut playlist = FlatPlaylist::new();
    let report = adder.add_files(&mut playlist, paths, AutoplayOptions::default());

    if json {
        let tracks: Vec<&Track> = report.added.iter().map(|r| r.track.as_ref()).collect();
        let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        let out = serde_json::json!({
            "total": report.total,
            "processed": report.processed,
            "items_added": report.items_added,
            "tracks": tracks,
            "errors": errors,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for added in &report.added {
        println!(
            "{:>4}  {}  [{}]",
            added.index + 1,
            added.track.display_name(),
            format_time(added.track.duration)
        );
    }
    for error in &report.errors {
        eprintln!("not added: {error}");
    }
    println!(
        "{} of {} tracks added ({} errors)",
        report.added.len(),
        report.total,
        report.errors.len()
    );
    Ok(())
}

fn play(
    mut config: AuralConfig,
    paths: Vec<PathBuf>,
    gap: Option<f64>,
    speed: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    if let Some(gap) = gap {
        config.playback.gap_between_tracks = gap > 0.0;
        config.playback.gap_between_tracks_duration = gap;
    }
    if let Some(speed) = speed {
        config.transport.speed = speed;
    }

    let player = start_player(config, Box::new(LoftyMetadataLoader::new()))?;
    player.add_files(paths, AutoplayOptions::play_now());

    let mut adding_done = false;
    while let Ok(notification) = player.notifications().recv() {
        if matches!(
            notification,
            PlayerNotification::Import(TrackAddEvent::DoneAdding(_))
        ) {
            adding_done = true;
        }
        print_notification(&notification, json)?;

        if adding_done && player.status()?.state == PlaybackState::NoTrack {
            break;
        }
    }

    // Errors are published right after the add completes
    while let Ok(notification) = player.notifications().recv_timeout(DRAIN_TIMEOUT) {
        print_notification(&notification, json)?;
    }

    player.shutdown()?;
    Ok(())
}

fn print_notification(notification: &PlayerNotification, json: bool) -> anyhow::Result<()> {
    match notification {
        PlayerNotification::Playback(playback) if json => {
            println!("{}", serde_json::to_string(playback)?);
        }
        PlayerNotification::Playback(playback) => println!("{}", describe(playback)),
        PlayerNotification::Import(TrackAddEvent::DoneAdding(progress)) => {
            eprintln!("added {} of {} tracks", progress.added, progress.total);
        }
        PlayerNotification::Import(TrackAddEvent::TracksNotAdded(errors)) => {
            for error in errors {
                eprintln!("not added: {error}");
            }
        }
        PlayerNotification::Import(_) => {}
    }
    Ok(())
}

fn describe(notification: &PlaybackNotification) -> String {
    match notification {
        PlaybackNotification::TrackTransitioned {
            new_track: Some(track),
            ..
        } => format!("> playing {track}"),
        PlaybackNotification::TrackTransitioned { new_track: None, .. } => "> stopped".to_string(),
        PlaybackNotification::GapStarted {
            next_track,
            gap_end_time,
            ..
        } => format!(
            "  gap before {next_track} until {}",
            gap_end_time.format("%H:%M:%S%.3f")
        ),
        PlaybackNotification::TranscodingStarted { track } => format!("  transcoding {track}"),
        PlaybackNotification::TrackNotPlayed { track, error, .. } => {
            format!("! could not play {track}: {error}")
        }
        PlaybackNotification::PlaybackStateChanged { state } => format!("  {state}"),
        PlaybackNotification::PreTrackPlayback { .. }
        | PlaybackNotification::PlaybackLoopChanged { .. } => format!("  {}", notification.kind()),
    }
}

/// `m:ss`, or `--:--` when the duration is unknown
fn format_time(seconds: f64) -> String {
    if seconds <= 0.0 || !seconds.is_finite() {
        return "--:--".to_string();
    }
    let total = seconds.round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
