//! Cabinet commands (cabinet → payout controller)

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Commands sent to the payout controller, one per line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CabinetCommand {
    /// Wager notice, sent before the outcome is known
    Gamble(u64),
    /// Turn paid out the given amount
    Win(u64),
    /// Turn paid nothing
    Lose,
}

impl fmt::Display for CabinetCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gamble(amount) => write!(f, "GAMBLE {amount}"),
            Self::Win(amount) => write!(f, "WIN {amount}"),
            Self::Lose => f.write_str("LOSE"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Invalid amount in {0:?}")]
    InvalidAmount(String),
}

impl FromStr for CabinetCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let amount = |raw: &str| {
            raw.parse::<u64>()
                .map_err(|_| ParseCommandError::InvalidAmount(line.to_string()))
        };

        match line.split_once(' ') {
            Some(("GAMBLE", raw)) => Ok(Self::Gamble(amount(raw)?)),
            Some(("WIN", raw)) => Ok(Self::Win(amount(raw)?)),
            None if line == "LOSE" => Ok(Self::Lose),
            _ => Err(ParseCommandError::Unknown(line.to_string())),
        }
    }
}
