//! In-memory transport
//!
//! A shared wire that records every outbound line (with the tokio clock
//! timestamp it was written at) and lets a test inject inbound bytes, failed
//! opens and failed or short writes. Built for tests and behind the
//! `test-support` feature.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::error::ConnectionError;
use crate::protocol::LinkConfig;
use crate::transport::{Connector, Transport};

/// One complete, non-blank line seen on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentLine {
    pub at: Instant,
    pub line: String,
}

#[derive(Default)]
struct WireState {
    raw: Vec<u8>,
    partial: Vec<u8>,
    sent: Vec<SentLine>,
    inbound: VecDeque<u8>,
    open_failures: VecDeque<ConnectionError>,
    write_failure: Option<io::ErrorKind>,
    /// Bytes the next write accepts before failing
    short_write: Option<(usize, io::ErrorKind)>,
    opens: usize,
    flushes: usize,
    open: bool,
}

impl WireState {
    fn record(&mut self, bytes: &[u8]) {
        self.raw.extend_from_slice(bytes);
        self.partial.extend_from_slice(bytes);
        while let Some(pos) = self.partial.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=pos).collect();
            if pos == 0 {
                continue;
            }
            let line = String::from_utf8_lossy(&line[..pos]).into_owned();
            self.sent.push(SentLine {
                at: Instant::now(),
                line,
            });
        }
    }
}

/// Shared handle onto the in-memory wire
#[derive(Clone, Default)]
pub struct MemoryWire {
    inner: Arc<Mutex<WireState>>,
}

impl MemoryWire {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connector that opens transports onto this wire
    pub fn connector(&self) -> MemoryConnector {
        MemoryConnector { wire: self.clone() }
    }

    /// Every byte written, in order
    pub fn raw_bytes(&self) -> Vec<u8> {
        self.inner.lock().raw.clone()
    }

    pub fn sent(&self) -> Vec<SentLine> {
        self.inner.lock().sent.clone()
    }

    pub fn sent_lines(&self) -> Vec<String> {
        self.inner.lock().sent.iter().map(|s| s.line.clone()).collect()
    }

    /// Queue bytes for the link to read
    pub fn push_inbound(&self, bytes: &[u8]) {
        self.inner.lock().inbound.extend(bytes.iter().copied());
    }

    /// Fail the next `count` opens with `error`
    pub fn fail_next_opens(&self, count: usize, error: ConnectionError) {
        let mut inner = self.inner.lock();
        for _ in 0..count {
            inner.open_failures.push_back(error.clone());
        }
    }

    /// Make every write fail with `kind` (or succeed again with `None`)
    pub fn fail_writes(&self, kind: Option<io::ErrorKind>) {
        self.inner.lock().write_failure = kind;
    }

    /// Let the next write put only `accept` bytes on the wire, then fail
    /// with `kind`
    pub fn truncate_next_write(&self, accept: usize, kind: io::ErrorKind) {
        self.inner.lock().short_write = Some((accept, kind));
    }

    /// Number of open attempts, successful or not
    pub fn open_count(&self) -> usize {
        self.inner.lock().opens
    }

    pub fn flush_count(&self) -> usize {
        self.inner.lock().flushes
    }

    /// Whether a transport is currently held open
    pub fn is_open(&self) -> bool {
        self.inner.lock().open
    }
}

/// [`Connector`] for a [`MemoryWire`]
#[derive(Clone)]
pub struct MemoryConnector {
    wire: MemoryWire,
}

impl Connector for MemoryConnector {
    type Transport = MemoryTransport;

    fn open(&mut self, _config: &LinkConfig) -> Result<MemoryTransport, ConnectionError> {
        let mut inner = self.wire.inner.lock();
        inner.opens += 1;
        if let Some(error) = inner.open_failures.pop_front() {
            return Err(error);
        }
        inner.open = true;
        Ok(MemoryTransport {
            wire: self.wire.clone(),
        })
    }
}

/// Open end of a [`MemoryWire`]
pub struct MemoryTransport {
    wire: MemoryWire,
}

impl Transport for MemoryTransport {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut inner = self.wire.inner.lock();
        if let Some(kind) = inner.write_failure {
            return Err(io::Error::new(kind, "injected write failure"));
        }
        if let Some((accept, kind)) = inner.short_write.take() {
            inner.record(&bytes[..accept.min(bytes.len())]);
            return Err(io::Error::new(kind, "injected write failure"));
        }

        inner.record(bytes);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.wire.inner.lock().flushes += 1;
        Ok(())
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut inner = self.wire.inner.lock();
        let len = buf.len().min(inner.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(inner.inbound.drain(..len)) {
            *slot = byte;
        }
        Ok(len)
    }
}

impl Drop for MemoryTransport {
    fn drop(&mut self) {
        self.wire.inner.lock().open = false;
    }
}
