//! Presentation configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::audio::DEFAULT_PLAYER;
use crate::display::DEFAULT_FPS;
use crate::frames::SequenceDirs;

/// Display, animation and sound settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Directory holding the sequence directories
    pub frames_root: PathBuf,
    /// Per-sequence directory names
    pub sequences: SequenceDirs,
    /// Animation frame rate
    pub fps: u32,
    /// Framebuffer device; headless when unset
    pub framebuffer: Option<PathBuf>,
    /// Panel width in pixels
    pub width: u32,
    /// Panel height in pixels
    pub height: u32,
    /// Directory of `.wav` cue assets
    pub sounds_dir: PathBuf,
    /// Command used to play cues
    pub audio_player: String,
    /// Hold the turn until the spin cue finishes
    pub await_spin_cue: bool,
    /// Loop `background.wav` while running
    pub background_music: bool,
    /// Disable sound entirely
    pub mute: bool,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            frames_root: PathBuf::from("."),
            sequences: SequenceDirs::default(),
            fps: DEFAULT_FPS,
            framebuffer: None,
            width: 160,
            height: 128,
            sounds_dir: PathBuf::from("sounds"),
            audio_player: DEFAULT_PLAYER.to_string(),
            await_spin_cue: false,
            background_music: true,
            mute: false,
        }
    }
}
