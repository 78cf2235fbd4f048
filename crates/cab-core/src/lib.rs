//! # cab-core — Slot cabinet game core
//!
//! Hardware-independent pieces of a game turn.
//!
//! ## Features
//!
//! - **Debounced Input**: rising-edge detection over a raw, active-low button line
//! - **Payout Engine**: weighted draw over a fixed payout table
//! - **Win Gate**: independent "did this turn win" draw
//! - **Game Rules**: wager, win probability and payout table as one config block
//!
//! ## Architecture
//!
//! ```text
//! InputLine ──▶ DebouncedButton::poll() ──▶ rising edge
//!
//! WinGate::is_win() ──┬── false ──▶ GameOutcome::loss()
//!                     └── true ───▶ draw_payout(PayoutTable) ──▶ GameOutcome::win(amount)
//! ```

pub mod error;
pub mod input;
pub mod outcome;
pub mod payout;
pub mod rules;
pub mod timing;

pub use error::*;
pub use input::*;
pub use outcome::*;
pub use payout::*;
pub use rules::*;
pub use timing::*;
