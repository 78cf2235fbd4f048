//! Cadences of the game loop

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed waits of the orchestrator, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Interval between button samples
    pub button_poll_ms: u64,
    /// Delay between peripheral connect attempts
    pub connect_retry_ms: u64,
    /// Pause after a report before the button re-arms
    pub cooldown_ms: u64,
    /// Poll interval while waiting for a blocking sound cue
    pub audio_poll_ms: u64,
}

impl TimingConfig {
    pub fn button_poll(&self) -> Duration {
        Duration::from_millis(self.button_poll_ms)
    }

    pub fn connect_retry(&self) -> Duration {
        Duration::from_millis(self.connect_retry_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn audio_poll(&self) -> Duration {
        Duration::from_millis(self.audio_poll_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            button_poll_ms: 50,
            connect_retry_ms: 500,
            cooldown_ms: 1000,
            audio_poll_ms: 100,
        }
    }
}
