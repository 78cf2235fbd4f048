//! Daemon error types

use cab_core::{HardwareReadError, RulesError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GpioError {
    #[error("GPIO {pin} unavailable: {reason}")]
    Unavailable { pin: u8, reason: String },
}

/// Conditions that stop the game loop
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("Hardware failure: {0}")]
    Hardware(#[from] HardwareReadError),
}
