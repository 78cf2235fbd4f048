//! Debounced button input
//!
//! Converts a raw digital line into a "pressed-edge" event stream. Only
//! single-sample edge detection is done: one noisy sample reading "pressed"
//! between two "released" samples is reported as a press.

use crate::error::HardwareReadError;

/// A raw digital input line
pub trait InputLine {
    /// Hardware line identifier (BCM pin number on the cabinet)
    fn pin(&self) -> u8;

    /// Sample the line. `true` means the button is electrically pressed.
    fn read_pressed(&mut self) -> Result<bool, HardwareReadError>;

    /// Hand the line back to the platform. Called once during teardown.
    fn release(&mut self) {}
}

impl<L: InputLine + ?Sized> InputLine for Box<L> {
    fn pin(&self) -> u8 {
        (**self).pin()
    }

    fn read_pressed(&mut self) -> Result<bool, HardwareReadError> {
        (**self).read_pressed()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Last observed state of a button line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    /// Line identifier
    pub pin: u8,
    /// Raw reading from the immediately preceding poll
    pub last_observed: bool,
}

/// Rising-edge detector over one input line
pub struct DebouncedButton<L: InputLine> {
    line: L,
    state: ButtonState,
}

impl<L: InputLine> DebouncedButton<L> {
    pub fn new(line: L) -> Self {
        let pin = line.pin();
        Self {
            line,
            state: ButtonState {
                pin,
                last_observed: false,
            },
        }
    }

    /// Sample the line once.
    ///
    /// Returns `true` only when this sample is pressed and the previous one
    /// was not. `last_observed` is updated on every successful read.
    pub fn poll(&mut self) -> Result<bool, HardwareReadError> {
        let current = self.line.read_pressed()?;
        let edge = current && !self.state.last_observed;
        self.state.last_observed = current;
        Ok(edge)
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn line(&self) -> &L {
        &self.line
    }

    /// Release the underlying line
    pub fn release(&mut self) {
        log::debug!("[Input] Releasing line {}", self.state.pin);
        self.line.release();
    }
}
