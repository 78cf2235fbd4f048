//! Cabinet configuration file
//!
//! JSON, every section optional. Missing fields take the built-in defaults.

use std::path::Path;

use cab_core::{GameRules, TimingConfig};
use cab_link::LinkConfig;
use cab_present::{MAX_FRAMEBUFFER_DIM, PresentationConfig, valid_geometry};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default BCM pin of the spin button
pub const DEFAULT_BUTTON_PIN: u8 = 20;

/// Spin button line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// BCM pin number
    pub pin: u8,
    /// Enable the internal pull-up
    pub pull_up: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            pin: DEFAULT_BUTTON_PIN,
            pull_up: false,
        }
    }
}

/// Full cabinet configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CabinetConfig {
    pub link: LinkConfig,
    pub input: InputConfig,
    pub rules: GameRules,
    pub presentation: PresentationConfig,
    pub timing: TimingConfig,
}

impl CabinetConfig {
    /// Read, parse and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::info!("[Config] Loaded {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules.validate()?;

        if self.link.port.trim().is_empty() {
            return Err(invalid("link.port", "must not be empty"));
        }
        if self.link.baud_rate == 0 {
            return Err(invalid("link.baud_rate", "must be positive"));
        }

        let presentation = &self.presentation;
        if presentation.fps == 0 {
            return Err(invalid("presentation.fps", "must be positive"));
        }
        if !valid_geometry(presentation.width, presentation.height) {
            return Err(invalid(
                "presentation geometry",
                format!(
                    "{}x{} (each side 1..={})",
                    presentation.width, presentation.height, MAX_FRAMEBUFFER_DIM
                ),
            ));
        }

        // A zero interval would turn these waits into busy loops
        let timing = &self.timing;
        if timing.button_poll_ms == 0 {
            return Err(invalid("timing.button_poll_ms", "must be positive"));
        }
        if timing.connect_retry_ms == 0 {
            return Err(invalid("timing.connect_retry_ms", "must be positive"));
        }
        if presentation.await_spin_cue && timing.audio_poll_ms == 0 {
            return Err(invalid("timing.audio_poll_ms", "must be positive"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
