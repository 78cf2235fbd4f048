//! Game outcome of a single turn

use serde::{Deserialize, Serialize};

use crate::payout::{PayoutTable, RandomSource, WinGate, draw_payout};

/// Result of one turn. Produced fresh each turn and consumed by the report step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub won: bool,
    pub payout: u64,
}

impl GameOutcome {
    pub const fn loss() -> Self {
        Self {
            won: false,
            payout: 0,
        }
    }

    pub const fn win(payout: u64) -> Self {
        Self { won: true, payout }
    }
}

/// Run the win gate and, on a win, the payout draw
pub fn decide_outcome<R: RandomSource + ?Sized>(
    gate: &WinGate,
    table: &PayoutTable,
    rng: &mut R,
) -> GameOutcome {
    if gate.is_win(rng) {
        GameOutcome::win(draw_payout(table, rng))
    } else {
        GameOutcome::loss()
    }
}
