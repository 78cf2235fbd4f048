//! Link error types

use thiserror::Error;

/// Opening the serial endpoint failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Device not present: {0}")]
    DeviceNotPresent(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Writing a line failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error("No serial connection available")]
    NotConnected,

    #[error("Write failed: {0}")]
    IoFailure(String),

    #[error("Line contains a line terminator")]
    InvalidLine,
}

/// An inbound line could not be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Line is not valid UTF-8")]
    NotUtf8,

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Expected a JSON object")]
    NotAnObject,
}

pub type LinkResult<T> = Result<T, SendError>;
