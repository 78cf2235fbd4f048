//! # cab-present — Spin presentation
//!
//! Drives the cabinet display and speaker through one turn.
//!
//! ## Features
//!
//! - PNG frame sequences loaded once at startup (`spin`, `win`, `lose`)
//! - Frame-paced playback onto a Linux framebuffer (RGB565) or a headless sink
//! - Fire-and-forget sound cues through `aplay`, looping background music
//! - [`PresentationSequencer`]: spin animation → outcome draw → win/lose feedback
//!
//! ## Sequence
//!
//! ```text
//! Spin cue ─▶ spin frames @ fps ─▶ WinGate/draw_payout ─┬─▶ Win/Jackpot cue ─▶ win frames
//!                                                       └─▶ Lose cue ───────▶ lose frames
//! ```
//!
//! Sound is triggered, not awaited. The animation's frame timing paces the turn.

pub mod audio;
pub mod config;
pub mod display;
pub mod error;
pub mod frames;
pub mod sequencer;

pub use audio::*;
pub use config::*;
pub use display::*;
pub use error::*;
pub use frames::*;
pub use sequencer::*;
