//! Link configuration, state and inbound message decoding

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Serial endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Device path of the payout controller
    pub port: String,

    /// Fixed baud rate
    pub baud_rate: u32,

    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,
}

impl LinkConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_string(),
            baud_rate: 115_200,
            read_timeout_ms: 1000,
        }
    }
}

/// Link state. Never partially open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkState {
    /// No endpoint held
    Disconnected,
    /// Open in progress
    Connecting,
    /// Endpoint open and writable
    Connected,
}

/// Structured message from the payout controller
pub type PeripheralMessage = Map<String, Value>;

/// Decode one inbound line (terminator already stripped).
///
/// Blank lines decode to `Ok(None)`.
pub fn decode_line(line: &[u8]) -> Result<Option<PeripheralMessage>, DecodeError> {
    let text = std::str::from_utf8(line).map_err(|_| DecodeError::NotUtf8)?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(DecodeError::NotAnObject),
    }
}
