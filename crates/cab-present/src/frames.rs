//! Animation frames
//!
//! Each animation is a directory of individually numbered PNG files, played
//! in file-name order. Frames are decoded once at startup and kept as RGB8.

use std::path::{Path, PathBuf};

use image::RgbImage;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

/// One decoded frame
pub type Frame = RgbImage;

/// The three animations of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sequence {
    Spin,
    Win,
    Lose,
}

impl Sequence {
    pub const ALL: [Sequence; 3] = [Sequence::Spin, Sequence::Win, Sequence::Lose];

    pub fn name(self) -> &'static str {
        match self {
            Self::Spin => "spin",
            Self::Win => "win",
            Self::Lose => "lose",
        }
    }
}

// ============ Sequence Directories ============

/// Directory name of each sequence, relative to the frames root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceDirs {
    pub spin: String,
    pub win: String,
    pub lose: String,
}

impl SequenceDirs {
    pub fn dir_for(&self, sequence: Sequence) -> &str {
        match sequence {
            Sequence::Spin => &self.spin,
            Sequence::Win => &self.win,
            Sequence::Lose => &self.lose,
        }
    }
}

impl Default for SequenceDirs {
    fn default() -> Self {
        Self {
            spin: "letsgo_frames".to_string(),
            win: "winning_frames".to_string(),
            lose: "awdangit_frames".to_string(),
        }
    }
}

// ============ Animation Set ============

/// Spin, win and lose frame sequences. Read-only after load.
///
/// An empty sequence is valid; playing it is a no-op.
#[derive(Debug, Clone, Default)]
pub struct AnimationSet {
    spin: Vec<Frame>,
    win: Vec<Frame>,
    lose: Vec<Frame>,
}

impl AnimationSet {
    pub fn new(spin: Vec<Frame>, win: Vec<Frame>, lose: Vec<Frame>) -> Self {
        Self { spin, win, lose }
    }

    /// Load all three sequences from `root`
    pub fn load(root: &Path, dirs: &SequenceDirs) -> Self {
        let load = |sequence: Sequence| {
            let dir = root.join(dirs.dir_for(sequence));
            let frames = load_sequence(&dir);
            log::info!(
                "[Present] Loaded {} {} frames from {}",
                frames.len(),
                sequence.name(),
                dir.display()
            );
            frames
        };

        Self {
            spin: load(Sequence::Spin),
            win: load(Sequence::Win),
            lose: load(Sequence::Lose),
        }
    }

    pub fn frames(&self, sequence: Sequence) -> &[Frame] {
        match sequence {
            Sequence::Spin => &self.spin,
            Sequence::Win => &self.win,
            Sequence::Lose => &self.lose,
        }
    }

    /// Frame count over all sequences
    pub fn total_frames(&self) -> usize {
        self.spin.len() + self.win.len() + self.lose.len()
    }
}

/// Load every `*.png` directly inside `dir`, sorted by file name.
///
/// A missing directory yields an empty sequence. Files that fail to decode
/// are logged and skipped.
pub fn load_sequence(dir: &Path) -> Vec<Frame> {
    if !dir.is_dir() {
        log::debug!("[Present] Frame directory {} not found", dir.display());
        return Vec::new();
    }

    frame_paths(dir)
        .into_iter()
        .filter_map(|path| match image::open(&path) {
            Ok(img) => Some(img.to_rgb8()),
            Err(e) => {
                log::warn!("[Present] Error loading {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}

fn frame_paths(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect()
}
