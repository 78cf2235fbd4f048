//! Game rules: wager, win gate and payout table

use serde::{Deserialize, Serialize};

use crate::error::RulesError;
use crate::payout::{PayoutTable, WinGate};

/// Credits wagered per turn
pub const DEFAULT_WAGER: u64 = 200;

/// Fixed rules of the cabinet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Amount announced in the `GAMBLE` notice
    pub wager: u64,
    /// Probability that a turn pays out
    pub win_probability: WinGate,
    /// Payout distribution for winning turns
    pub payouts: PayoutTable,
    /// Fixed RNG seed (bench testing only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl GameRules {
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.wager == 0 {
            return Err(RulesError::ZeroWager);
        }
        // Gate and table are validated on construction/deserialization
        Ok(())
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            wager: DEFAULT_WAGER,
            win_probability: WinGate::default(),
            payouts: PayoutTable::standard(),
            seed: None,
        }
    }
}
