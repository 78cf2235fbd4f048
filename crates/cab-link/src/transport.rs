//! Byte transport seam between the link and the device

use std::io;

use crate::error::ConnectionError;
use crate::protocol::LinkConfig;

/// An open, byte-oriented endpoint
pub trait Transport {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// Read whatever is already buffered without blocking. Returns 0 when
    /// nothing is waiting.
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Opens transports for a [`LinkConfig`]
pub trait Connector {
    type Transport: Transport;

    fn open(&mut self, config: &LinkConfig) -> Result<Self::Transport, ConnectionError>;
}
