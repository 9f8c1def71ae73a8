mod stats;

use clap::Parser;
use crossbeam_channel::{bounded, Receiver};
use log::{debug, error, info, warn};
use pinkboard_config::{load_config, Config, ConfigError};
use pinkboard_core::SpriteSource;
use pinkboard_simulation::{Canvas, FrameClock, HeartAnimation, SimulationError};
use pinkboard_transport::{FrameSnapshot, TransportController, TransportError};
use thiserror::Error;

use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use crate::stats::{FrameSummary, FrameTimes};

const DEFAULT_CONFIG: &str = "pinkboard.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "Heart-shaped particle trail renderer", long_about = None)]
struct Args {
    /// Path to the configuration file (JSON, or TOML with a .toml extension)
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Stop after this many frames
    #[arg(short, long)]
    frames: Option<u64>,

    /// Seed for particle placement; random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the last rendered frame to this file as a PNG
    #[arg(long)]
    png: Option<PathBuf>,
}

#[derive(Error, Debug)]
enum RunnerError {
    #[error("Failed to load config: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to set up animation: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("Failed to set up frame statistics: {0}")]
    Stats(#[from] hdrhistogram::CreationError),
}

/// What a finished run leaves behind.
struct RunOutcome {
    frames: u64,
    canvas: Canvas,
    summary: Option<FrameSummary>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), RunnerError> {
    let config = resolve_config(args)?;

    let (stop_tx, stop_rx) = bounded(1);
    ctrlc::set_handler(move || {
        let _ = stop_tx.try_send(());
    })?;

    info!(
        "Rendering at {} FPS on a {}x{} surface",
        config.framerate, config.surface.width, config.surface.height
    );
    let outcome = render(&config, &stop_rx)?;

    match outcome.summary {
        Some(summary) => info!("{}", summary),
        None => info!("No frames rendered"),
    }

    if let Some(path) = &args.png {
        outcome.canvas.save_png(path)?;
        info!("Wrote frame {} to {}", outcome.frames, path.display());
    }
    Ok(())
}

/// Loads the config named on the command line and applies flag overrides.
///
/// A missing file at the default path means "use built-in defaults"; any
/// other missing file is an error.
fn resolve_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = if args.config == Path::new(DEFAULT_CONFIG) && !args.config.exists() {
        info!("No {} found, using built-in defaults", DEFAULT_CONFIG);
        Config::default()
    } else {
        let config = load_config(&args.config)?;
        info!("Using configuration from {}", args.config.display());
        config
    };

    if let Some(frames) = args.frames {
        config.max_frames = Some(frames);
    }
    if let Some(seed) = args.seed {
        config.emission.seed = Some(seed);
    }
    config.validate()?;
    Ok(config)
}

/// Runs frames until `max_frames` is reached or `stop` fires.
fn render(config: &Config, stop: &Receiver<()>) -> Result<RunOutcome, RunnerError> {
    let mut animation = HeartAnimation::from_config(config)?;
    let mut canvas = Canvas::new(config.surface.width, config.surface.height)?;
    let mut transport = TransportController::from_config(&config.output)?;
    let mut clock = FrameClock::new();
    let mut times = FrameTimes::new()?;

    let frame_duration = Duration::from_secs_f64(1.0 / f64::from(config.framerate));
    let mut frame: u64 = 0;

    loop {
        if stop.try_recv().is_ok() {
            info!("Interrupted after {} frames", frame);
            break;
        }
        if config.max_frames.map_or(false, |max| frame >= max) {
            break;
        }

        let frame_start = Instant::now();
        let dt = clock.tick_at(frame_start);

        let center = canvas.center();
        let stats = animation.frame(&mut canvas, center, dt);

        if transport.wants_frame(frame) {
            let snapshot = FrameSnapshot::capture(
                frame,
                clock.elapsed(),
                animation.pool(),
                animation.sprite().base_size(),
            );
            transport.publish(&snapshot)?;
        }
        frame += 1;

        if frame % log_interval(config.framerate) == 0 {
            debug!("Frame {}: {} live, {} spawned", frame, stats.live, stats.spawned);
        }

        let elapsed = frame_start.elapsed();
        times.record(elapsed, frame_duration);
        if elapsed < frame_duration {
            spin_sleep::sleep(frame_duration - elapsed);
        } else if config.framerate > 10 {
            warn!("Frame time exceeded budget: {:?} > {:?}", elapsed, frame_duration);
        }
    }

    transport.flush()?;
    Ok(RunOutcome {
        frames: frame,
        canvas,
        summary: times.summary(),
    })
}

/// Frames between progress logs: about five seconds' worth.
fn log_interval(framerate: u32) -> u64 {
    (u64::from(framerate) * 5).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinkboard_config::SenderType;

    fn args(config: &Path) -> Args {
        Args {
            config: config.to_path_buf(),
            frames: None,
            seed: None,
            png: None,
        }
    }

    fn quick_config() -> Config {
        let mut config = Config::default();
        config.framerate = 1000;
        config.surface.width = 120;
        config.surface.height = 100;
        config.particles.length = 300;
        config.emission.seed = Some(5);
        config
    }

    #[test]
    fn cli_parses_flags() {
        let args = Args::parse_from([
            "pinkboard", "--config", "heart.toml", "--frames", "30", "--seed", "9", "--png", "out.png",
        ]);
        assert_eq!(args.config, PathBuf::from("heart.toml"));
        assert_eq!(args.frames, Some(30));
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.png, Some(PathBuf::from("out.png")));

        let args = Args::parse_from(["pinkboard"]);
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_config(&args(&dir.path().join("absent.json")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn flags_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heart.json");
        std::fs::write(&path, r#"{ "framerate": 30, "max_frames": 10, "emission": { "seed": 1 } }"#)
            .unwrap();

        let mut cli = args(&path);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.framerate, 30);
        assert_eq!(config.max_frames, Some(10));
        assert_eq!(config.emission.seed, Some(1));

        cli.frames = Some(3);
        cli.seed = Some(77);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.max_frames, Some(3));
        assert_eq!(config.emission.seed, Some(77));
    }

    #[test]
    fn invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heart.json");
        std::fs::write(&path, r#"{ "particles": { "length": 1 } }"#).unwrap();

        assert!(matches!(resolve_config(&args(&path)), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn render_stops_at_max_frames() {
        let mut config = quick_config();
        config.max_frames = Some(4);
        let (_tx, rx) = bounded(1);

        let outcome = render(&config, &rx).unwrap();
        assert_eq!(outcome.frames, 4);
        assert_eq!(outcome.summary.map(|s| s.frames), Some(4));
        assert_eq!(outcome.canvas.width(), 120);
    }

    #[test]
    fn log_interval_never_overflows_or_divides_by_zero() {
        assert_eq!(log_interval(60), 300);
        assert_eq!(log_interval(0), 1);
        assert_eq!(log_interval(u32::MAX), u64::from(u32::MAX) * 5);
    }

    #[test]
    fn last_frame_saves_as_png() {
        let mut config = quick_config();
        config.max_frames = Some(3);
        let (_tx, rx) = bounded(1);
        let outcome = render(&config, &rx).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last.png");
        outcome.canvas.save_png(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn render_stops_when_interrupted() {
        let config = quick_config();
        let (tx, rx) = bounded(1);
        tx.send(()).unwrap();

        let outcome = render(&config, &rx).unwrap();
        assert_eq!(outcome.frames, 0);
        assert!(outcome.summary.is_none());
    }

    #[test]
    fn render_publishes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.jsonl");
        let mut config = quick_config();
        config.max_frames = Some(6);
        config.output.sender = SenderType::File;
        config.output.path = Some(path.to_string_lossy().into_owned());
        config.output.every = 2;
        let (_tx, rx) = bounded(1);

        render(&config, &rx).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let frames: Vec<u64> = written
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["frame"].as_u64().unwrap()
            })
            .collect();
        assert_eq!(frames, vec![0, 2, 4]);
    }
}
