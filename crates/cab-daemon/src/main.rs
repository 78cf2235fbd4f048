//! cabinetd - Slot cabinet controller
//!
//! Usage:
//!   cabinetd                          - Run with built-in defaults
//!   cabinetd --config cabinet.json    - Run with a config file
//!   cabinetd --dry-run                - Print the resolved config and exit

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use cab_core::DebouncedButton;
use cab_daemon::{CabinetConfig, GameOrchestrator, open_button_line};
use cab_link::{PeripheralLink, SerialConnector};
use cab_present::{
    AnimationSet, AplaySoundBank, FrameSink, FramebufferSink, HeadlessSink,
    PresentationSequencer, SilentSoundBank, SoundBank,
};

#[derive(Parser, Debug)]
#[command(name = "cabinetd", version, about = "Slot cabinet game controller")]
struct Cli {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial device of the payout controller
    #[arg(long)]
    port: Option<String>,

    /// BCM pin of the spin button
    #[arg(long)]
    pin: Option<u8>,

    /// Directory holding the animation frame directories
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Directory of sound cues
    #[arg(long)]
    sounds: Option<PathBuf>,

    /// Framebuffer device (headless when omitted)
    #[arg(long)]
    framebuffer: Option<PathBuf>,

    /// Fixed RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Disable sound
    #[arg(long)]
    mute: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate and print the resolved config, then exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    if cli.dry_run {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    log::info!("Starting cabinetd...");

    let line = open_button_line(&config.input).context("Failed to claim the spin button")?;
    let button = DebouncedButton::new(line);

    let link = PeripheralLink::new(SerialConnector, config.link.clone());

    let p = &config.presentation;
    let animations = AnimationSet::load(&p.frames_root, &p.sequences);

    let sink: Box<dyn FrameSink> = match &p.framebuffer {
        Some(path) => Box::new(
            FramebufferSink::open(path, p.width, p.height)
                .with_context(|| format!("Failed to open display {}", path.display()))?,
        ),
        None => {
            log::info!("No framebuffer configured, running headless");
            Box::new(HeadlessSink::new())
        }
    };

    let sounds: Box<dyn SoundBank> = if p.mute {
        Box::new(SilentSoundBank)
    } else {
        let bank = AplaySoundBank::new(&p.sounds_dir).with_player(&p.audio_player);
        bank.report_assets();
        Box::new(bank)
    };

    let rng = match config.rules.seed {
        Some(seed) => {
            log::warn!("Using fixed RNG seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let mut presenter = PresentationSequencer::new(sink, sounds, rng, animations, &config.rules)
        .with_fps(p.fps);
    if p.await_spin_cue {
        presenter = presenter.with_spin_cue_wait(config.timing.audio_poll());
    }
    if p.background_music {
        presenter.start_background_music();
    }

    let mut orchestrator = GameOrchestrator::new(
        button,
        link,
        presenter,
        config.rules.wager,
        config.timing,
    );

    log::info!("Waiting for button press on pin {}...", config.input.pin);
    orchestrator.run(shutdown_signal()).await?;
    log::info!("cabinetd stopped");
    Ok(())
}

/// Load the config file (or defaults) and apply command-line overrides
fn resolve_config(cli: &Cli) -> Result<CabinetConfig> {
    let mut config = match &cli.config {
        Some(path) => CabinetConfig::load(path)?,
        None => CabinetConfig::default(),
    };

    if let Some(port) = &cli.port {
        config.link.port = port.clone();
    }
    if let Some(pin) = cli.pin {
        config.input.pin = pin;
    }
    if let Some(frames) = &cli.frames {
        config.presentation.frames_root = frames.clone();
    }
    if let Some(sounds) = &cli.sounds {
        config.presentation.sounds_dir = sounds.clone();
    }
    if let Some(framebuffer) = &cli.framebuffer {
        config.presentation.framebuffer = Some(framebuffer.clone());
    }
    if let Some(seed) = cli.seed {
        config.rules.seed = Some(seed);
    }
    if cli.mute {
        config.presentation.mute = true;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                log::error!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => log::info!("Interrupt received"),
        () = terminate => log::info!("SIGTERM received"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["cabinetd"]).unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config, CabinetConfig::default());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "cabinetd",
            "--port",
            "/dev/ttyUSB3",
            "--pin",
            "17",
            "--frames",
            "/opt/cabinet",
            "--framebuffer",
            "/dev/fb1",
            "--seed",
            "42",
            "--mute",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();

        assert_eq!(config.link.port, "/dev/ttyUSB3");
        assert_eq!(config.input.pin, 17);
        assert_eq!(config.presentation.frames_root, PathBuf::from("/opt/cabinet"));
        assert_eq!(config.presentation.framebuffer, Some(PathBuf::from("/dev/fb1")));
        assert_eq!(config.rules.seed, Some(42));
        assert!(config.presentation.mute);
    }

    #[test]
    fn test_cli_override_beats_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cabinet.json");
        std::fs::write(&path, r#"{"link": {"port": "/dev/ttyS0"}, "input": {"pin": 5}}"#).unwrap();

        let cli = Cli::try_parse_from([
            "cabinetd",
            "--config",
            path.to_str().unwrap(),
            "--pin",
            "6",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.link.port, "/dev/ttyS0");
        assert_eq!(config.input.pin, 6);
    }

    #[test]
    fn test_empty_port_rejected() {
        let cli = Cli::try_parse_from(["cabinetd", "--port", ""]).unwrap();
        assert!(resolve_config(&cli).is_err());
    }
}
