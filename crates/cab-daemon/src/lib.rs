//! # cab-daemon — Game Orchestrator
//!
//! Ties the button, the payout controller link and the presentation into
//! the cabinet's game loop:
//!
//! ```text
//! WaitForLink → WaitForButton → SendGambleNotice → RunPresentation
//!      ▲              ▲                                  │
//!      │              └────────── Cooldown ◀── ReportOutcome
//!      └── (link dropped during the turn)
//! ```
//!
//! Everything runs on one cooperative thread. At most one turn is in
//! flight; the button is only polled in `WaitForButton`.

pub mod config;
pub mod error;
pub mod gpio;
pub mod orchestrator;

pub use config::*;
pub use error::*;
pub use gpio::*;
pub use orchestrator::*;
