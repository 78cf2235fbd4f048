//! Presentation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Failed to open framebuffer {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("Framebuffer write failed: {0}")]
    Write(#[from] std::io::Error),

    #[error("Invalid display geometry {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },
}

pub type DisplayResult<T> = Result<T, DisplayError>;
