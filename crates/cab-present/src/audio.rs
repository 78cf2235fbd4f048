//! Sound cues
//!
//! Effects are fire-and-forget: [`SoundBank::trigger`] starts playback and
//! returns. Only the optional blocking spin cue waits, by polling
//! [`SoundBank::is_busy`].

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

/// Named sound assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Spin,
    Win,
    Lose,
    Button,
    Jackpot,
    /// Looping music, see [`SoundBank::start_music`]
    Background,
}

impl Cue {
    pub const ALL: [Cue; 6] = [
        Cue::Spin,
        Cue::Win,
        Cue::Lose,
        Cue::Button,
        Cue::Jackpot,
        Cue::Background,
    ];

    /// Asset file name inside the sounds directory
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Spin => "spin.wav",
            Self::Win => "win.wav",
            Self::Lose => "lose.wav",
            Self::Button => "button.wav",
            Self::Jackpot => "jackpot.wav",
            Self::Background => "background.wav",
        }
    }
}

/// Audio collaborator
pub trait SoundBank {
    /// Start playing `cue` without waiting for it. `false` when the asset is
    /// missing or playback could not start.
    fn trigger(&mut self, cue: Cue) -> bool;

    /// Whether the last triggered effect is still playing
    fn is_busy(&mut self) -> bool;

    /// Start looping background music. A missing asset is skipped.
    fn start_music(&mut self) -> bool;

    fn stop_music(&mut self);
}

impl<B: SoundBank + ?Sized> SoundBank for Box<B> {
    fn trigger(&mut self, cue: Cue) -> bool {
        (**self).trigger(cue)
    }

    fn is_busy(&mut self) -> bool {
        (**self).is_busy()
    }

    fn start_music(&mut self) -> bool {
        (**self).start_music()
    }

    fn stop_music(&mut self) {
        (**self).stop_music()
    }
}

/// Poll `bank` until its effect channel goes quiet
pub async fn wait_for_audio_idle<B: SoundBank + ?Sized>(bank: &mut B, poll: Duration) {
    while bank.is_busy() {
        tokio::time::sleep(poll).await;
    }
}

// ============ Silent ============

/// No speaker attached
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSoundBank;

impl SoundBank for SilentSoundBank {
    fn trigger(&mut self, cue: Cue) -> bool {
        log::trace!("[Audio] Silent cue {:?}", cue);
        false
    }

    fn is_busy(&mut self) -> bool {
        false
    }

    fn start_music(&mut self) -> bool {
        false
    }

    fn stop_music(&mut self) {}
}

// ============ aplay ============

/// Default command-line player
pub const DEFAULT_PLAYER: &str = "aplay";

/// Shortest time between two starts of the background loop
pub const MUSIC_MIN_RUN: Duration = Duration::from_secs(1);

/// Plays cues by spawning `aplay -q <file>` per effect
pub struct AplaySoundBank {
    sounds_dir: PathBuf,
    player: String,
    /// Most recently started effect
    effect: Option<Child>,
    /// Background loop task
    music: Option<JoinHandle<()>>,
}

impl AplaySoundBank {
    pub fn new(sounds_dir: impl Into<PathBuf>) -> Self {
        Self {
            sounds_dir: sounds_dir.into(),
            player: DEFAULT_PLAYER.to_string(),
            effect: None,
            music: None,
        }
    }

    /// Use a different player binary (must accept `-q <file>`)
    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = player.into();
        self
    }

    pub fn sounds_dir(&self) -> &Path {
        &self.sounds_dir
    }

    /// Path of `cue`, or `None` when the asset is missing
    pub fn asset(&self, cue: Cue) -> Option<PathBuf> {
        let path = self.sounds_dir.join(cue.file_name());
        path.is_file().then_some(path)
    }

    /// Log which assets are present
    pub fn report_assets(&self) {
        for cue in Cue::ALL {
            match self.asset(cue) {
                Some(path) => log::info!("[Audio] {:?}: {}", cue, path.display()),
                None => log::warn!(
                    "[Audio] {:?}: {} (missing)",
                    cue,
                    self.sounds_dir.join(cue.file_name()).display()
                ),
            }
        }
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.player);
        cmd.arg("-q")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl SoundBank for AplaySoundBank {
    fn trigger(&mut self, cue: Cue) -> bool {
        let Some(path) = self.asset(cue) else {
            log::debug!("[Audio] No asset for {:?}, skipping", cue);
            return false;
        };

        match self.command(&path).spawn() {
            Ok(child) => {
                // A still-running previous effect keeps playing alongside
                self.effect = Some(child);
                true
            }
            Err(e) => {
                log::warn!("[Audio] Error playing sound {}: {}", path.display(), e);
                false
            }
        }
    }

    fn is_busy(&mut self) -> bool {
        let Some(child) = self.effect.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(_)) => {
                self.effect = None;
                false
            }
            Err(e) => {
                log::warn!("[Audio] Lost track of effect process: {}", e);
                self.effect = None;
                false
            }
        }
    }

    fn start_music(&mut self) -> bool {
        if self.music.is_some() {
            return true;
        }
        let Some(path) = self.asset(Cue::Background) else {
            log::debug!("[Audio] No background music, skipping");
            return false;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("[Audio] Background music needs a running runtime");
            return false;
        };

        let mut cmd = self.command(&path);
        cmd.kill_on_drop(true);
        let handle = runtime.spawn(async move {
            loop {
                let started = tokio::time::Instant::now();
                match cmd.status().await {
                    // An empty or truncated file exits at once
                    Ok(status) if status.success() => {
                        tokio::time::sleep_until(started + MUSIC_MIN_RUN).await;
                    }
                    Ok(status) => {
                        log::warn!("[Audio] Background music exited with {}", status);
                        break;
                    }
                    Err(e) => {
                        log::warn!("[Audio] Error playing music: {}", e);
                        break;
                    }
                }
            }
        });

        log::info!("[Audio] Background music started");
        self.music = Some(handle);
        true
    }

    fn stop_music(&mut self) {
        if let Some(handle) = self.music.take() {
            handle.abort();
            log::info!("[Audio] Background music stopped");
        }
    }
}

impl Drop for AplaySoundBank {
    fn drop(&mut self) {
        if let Some(handle) = self.music.take() {
            handle.abort();
        }
    }
}
