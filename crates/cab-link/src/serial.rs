//! Serial port transport (USB CDC / UART)

use std::io::{self, Read, Write};
use std::path::Path;

use serialport::{ErrorKind, SerialPort};

use crate::error::ConnectionError;
use crate::protocol::LinkConfig;
use crate::transport::{Connector, Transport};

/// Opens the configured serial device
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialConnector;

/// An open serial device
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl Connector for SerialConnector {
    type Transport = SerialTransport;

    fn open(&mut self, config: &LinkConfig) -> Result<SerialTransport, ConnectionError> {
        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .timeout(config.read_timeout())
            .open()
            .map_err(|e| classify_open_error(&config.port, &e))?;

        Ok(SerialTransport { port })
    }
}

/// Map a serialport failure onto the link's two error classes
pub fn classify_open_error(path: &str, err: &serialport::Error) -> ConnectionError {
    let missing = matches!(
        err.kind(),
        ErrorKind::NoDevice | ErrorKind::Io(io::ErrorKind::NotFound)
    ) || !Path::new(path).exists();

    if missing {
        ConnectionError::DeviceNotPresent(format!("{path}: {err}"))
    } else {
        ConnectionError::Io(format!("{path}: {err}"))
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.port.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let pending = self.port.bytes_to_read().map_err(io::Error::from)? as usize;
        if pending == 0 || buf.is_empty() {
            return Ok(0);
        }
        let len = pending.min(buf.len());
        self.port.read(&mut buf[..len])
    }
}
