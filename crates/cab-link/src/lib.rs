//! # cab-link — Peripheral Link
//!
//! Serial connection to the payout controller board.
//!
//! ## Features
//!
//! - Connect / reconnect with a typed [`ConnectionError`]
//! - Fire-and-forget command lines (`GAMBLE <n>`, `WIN <n>`, `LOSE`)
//! - Optional non-blocking JSON line reception
//! - In-memory transport for tests (`test-support` feature)
//!
//! ## Wire format
//!
//! ASCII, one command per line, `\n` terminated, no escaping. Inbound lines
//! are single JSON objects.

pub mod commands;
pub mod error;
pub mod link;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod protocol;
pub mod serial;
pub mod transport;

pub use commands::*;
pub use error::*;
pub use link::*;
#[cfg(any(test, feature = "test-support"))]
pub use memory::*;
pub use protocol::*;
pub use serial::*;
pub use transport::*;
