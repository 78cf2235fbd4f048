//! Peripheral Link: line-oriented connection to the payout controller

use std::io;

use crate::error::{ConnectionError, LinkResult, SendError};
use crate::protocol::{LinkConfig, LinkState, PeripheralMessage, decode_line};
use crate::transport::{Connector, Transport};

/// Partial inbound lines longer than this are dropped
const MAX_LINE_LEN: usize = 4096;

/// Read chunk for draining the transport
const READ_CHUNK: usize = 256;

/// Owns the connection to the payout controller.
///
/// All protocol traffic goes through this type. Commands are fire-and-forget
/// text lines; there is no acknowledgement correlation.
pub struct PeripheralLink<C: Connector> {
    /// Opens the endpoint
    connector: C,
    /// Endpoint configuration
    config: LinkConfig,
    /// Open endpoint, `None` while disconnected
    transport: Option<C::Transport>,
    /// Current state
    state: LinkState,
    /// Inbound bytes not yet terminated by a newline
    rx_buffer: Vec<u8>,
    /// A failed write may have left a fragment on the peripheral's side;
    /// the next line starts with `\n` to terminate it
    resync: bool,
}

impl<C: Connector> PeripheralLink<C> {
    pub fn new(connector: C, config: LinkConfig) -> Self {
        Self {
            connector,
            config,
            transport: None,
            state: LinkState::Disconnected,
            rx_buffer: Vec::new(),
            resync: false,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Open the endpoint.
    ///
    /// Does not retry; the caller owns the retry policy. Already connected
    /// is a no-op.
    pub fn connect(&mut self) -> Result<(), ConnectionError> {
        if self.is_connected() {
            return Ok(());
        }

        self.state = LinkState::Connecting;
        match self.connector.open(&self.config) {
            Ok(transport) => {
                self.transport = Some(transport);
                self.rx_buffer.clear();
                self.state = LinkState::Connected;
                log::info!(
                    "[Link] Serial connection established on {} at {} baud",
                    self.config.port,
                    self.config.baud_rate
                );
                Ok(())
            }
            Err(e) => {
                self.state = LinkState::Disconnected;
                log::warn!("[Link] Failed to connect to {}: {}", self.config.port, e);
                Err(e)
            }
        }
    }

    /// Write `text` followed by a single `\n`, then flush.
    ///
    /// Exactly one line reaches the wire per successful call. Any write or
    /// flush failure closes the link: a timed-out write may have left part of
    /// the line on the wire, and nothing may be appended to it. The first
    /// line after such a failure is preceded by a bare `\n`.
    pub fn send_line(&mut self, text: &str) -> LinkResult<()> {
        if text.contains(['\n', '\r']) {
            return Err(SendError::InvalidLine);
        }
        let Some(transport) = self.transport.as_mut() else {
            return Err(SendError::NotConnected);
        };

        let mut line = Vec::with_capacity(text.len() + 2);
        if self.resync {
            line.push(b'\n');
        }
        line.extend_from_slice(text.as_bytes());
        line.push(b'\n');

        let result = transport.write_all(&line).and_then(|()| transport.flush());
        match result {
            Ok(()) => {
                self.resync = false;
                Ok(())
            }
            Err(e) => {
                log::error!("[Link] Write failed, closing link: {}", e);
                self.resync = true;
                self.close();
                Err(SendError::IoFailure(e.to_string()))
            }
        }
    }

    /// Poll for one inbound message without blocking.
    ///
    /// Returns `None` when no complete line is buffered. A malformed line is
    /// logged and discarded, never retried.
    pub fn try_read_message(&mut self) -> Option<PeripheralMessage> {
        self.drain_transport();

        while let Some(pos) = self.rx_buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.rx_buffer.drain(..=pos).collect();
            match decode_line(&line[..pos]) {
                Ok(Some(message)) => return Some(message),
                Ok(None) => continue,
                Err(e) => {
                    log::warn!(
                        "[Link] Discarding malformed line ({}): {}",
                        e,
                        String::from_utf8_lossy(&line[..pos])
                    );
                    return None;
                }
            }
        }
        None
    }

    /// Close the endpoint if open. Idempotent.
    pub fn disconnect(&mut self) {
        if self.transport.is_some() {
            self.close();
            log::info!("[Link] Serial connection closed");
        }
    }

    fn close(&mut self) {
        self.transport = None;
        self.rx_buffer.clear();
        self.state = LinkState::Disconnected;
    }

    fn drain_transport(&mut self) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };

        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match transport.read_available(&mut chunk) {
                Ok(0) => break,
                Ok(n) => self.rx_buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) => {
                    log::error!("[Link] Read failed, closing link: {}", e);
                    self.close();
                    return;
                }
            }
        }

        if self.rx_buffer.len() > MAX_LINE_LEN && !self.rx_buffer.contains(&b'\n') {
            log::warn!(
                "[Link] Dropping {} unterminated inbound bytes",
                self.rx_buffer.len()
            );
            self.rx_buffer.clear();
        }
    }
}
