//! Core error types

use thiserror::Error;

/// The button line could not be read. Fatal to the polling loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to read input line {pin}: {reason}")]
pub struct HardwareReadError {
    pub pin: u8,
    pub reason: String,
}

impl HardwareReadError {
    pub fn new(pin: u8, reason: impl Into<String>) -> Self {
        Self {
            pin,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayoutTableError {
    #[error("Payout table is empty")]
    Empty,

    #[error("Payout amount must be positive")]
    NonPositiveAmount,

    #[error("Weight for amount {amount} must be positive and finite, got {weight}")]
    NonPositiveWeight { amount: u64, weight: f64 },

    #[error("Duplicate payout amount: {0}")]
    DuplicateAmount(u64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RulesError {
    #[error("Win probability must be within [0, 1], got {0}")]
    InvalidWinProbability(f64),

    #[error("Wager must be positive")]
    ZeroWager,

    #[error(transparent)]
    PayoutTable(#[from] PayoutTableError),
}
