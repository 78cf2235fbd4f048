//! Payout engine
//!
//! Two independent draws decide a turn: the win gate ("does this turn pay?")
//! and, only on a win, the weighted payout draw ("how much?"). Keeping them
//! apart lets the hit rate and the payout distribution be tuned separately.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{PayoutTableError, RulesError};

/// Uniform random source over `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

// ============ Payout Table ============

/// One `(amount, weight)` row of the payout table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoutEntry {
    pub amount: u64,
    pub weight: f64,
}

impl PayoutEntry {
    pub const fn new(amount: u64, weight: f64) -> Self {
        Self { amount, weight }
    }
}

/// Cabinet payout amounts
pub const STANDARD_AMOUNTS: [u64; 8] = [10, 50, 100, 200, 500, 1000, 10000, 100000];

/// Relative weight of each entry in [`STANDARD_AMOUNTS`]
pub const STANDARD_WEIGHTS: [f64; 8] = [0.5, 1.0, 0.5, 0.4, 0.35, 0.1, 0.01, 0.001];

/// Immutable categorical distribution over payout amounts.
///
/// All weights are positive and finite, amounts are distinct and positive,
/// and the row order is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PayoutEntry>", into = "Vec<PayoutEntry>")]
pub struct PayoutTable {
    entries: Vec<PayoutEntry>,
    total_weight: f64,
}

impl PayoutTable {
    /// Build a table, validating every row
    pub fn new(entries: Vec<PayoutEntry>) -> Result<Self, PayoutTableError> {
        if entries.is_empty() {
            return Err(PayoutTableError::Empty);
        }

        for (i, entry) in entries.iter().enumerate() {
            if entry.amount == 0 {
                return Err(PayoutTableError::NonPositiveAmount);
            }
            if !(entry.weight.is_finite() && entry.weight > 0.0) {
                return Err(PayoutTableError::NonPositiveWeight {
                    amount: entry.amount,
                    weight: entry.weight,
                });
            }
            if entries[..i].iter().any(|e| e.amount == entry.amount) {
                return Err(PayoutTableError::DuplicateAmount(entry.amount));
            }
        }

        let total_weight = entries.iter().map(|e| e.weight).sum();
        Ok(Self {
            entries,
            total_weight,
        })
    }

    /// The cabinet's fixed payout table
    pub fn standard() -> Self {
        let entries: Vec<PayoutEntry> = STANDARD_AMOUNTS
            .iter()
            .zip(STANDARD_WEIGHTS.iter())
            .map(|(&amount, &weight)| PayoutEntry::new(amount, weight))
            .collect();
        let total_weight = STANDARD_WEIGHTS.iter().sum();
        Self {
            entries,
            total_weight,
        }
    }

    pub fn entries(&self) -> &[PayoutEntry] {
        &self.entries
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Probability of drawing `amount`, if it is in the table
    pub fn probability_of(&self, amount: u64) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.amount == amount)
            .map(|e| e.weight / self.total_weight)
    }

    /// Largest amount in the table (the jackpot)
    pub fn max_amount(&self) -> u64 {
        self.entries.iter().map(|e| e.amount).max().unwrap_or(0)
    }

    /// Mean payout of a winning turn
    pub fn expected_payout(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.amount as f64 * e.weight)
            .sum::<f64>()
            / self.total_weight
    }
}

impl Default for PayoutTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<PayoutEntry>> for PayoutTable {
    type Error = PayoutTableError;

    fn try_from(entries: Vec<PayoutEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<PayoutTable> for Vec<PayoutEntry> {
    fn from(table: PayoutTable) -> Self {
        table.entries
    }
}

/// Draw one payout amount.
///
/// Samples uniformly over `[0, Σweight)` and returns the amount whose
/// cumulative-weight interval contains the sample. Holds no state between
/// calls; independence comes from `rng` alone.
pub fn draw_payout<R: RandomSource + ?Sized>(table: &PayoutTable, rng: &mut R) -> u64 {
    let target = rng.next_unit() * table.total_weight;

    let mut cumulative = 0.0;
    for entry in &table.entries {
        cumulative += entry.weight;
        if target < cumulative {
            return entry.amount;
        }
    }

    // Rounding can leave `target` a hair above the last boundary
    table.entries.last().map_or(0, |e| e.amount)
}

// ============ Win Gate ============

/// Default probability that a turn pays out
pub const DEFAULT_WIN_PROBABILITY: f64 = 0.2;

/// Binary "does this turn pay out" decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct WinGate {
    probability: f64,
}

impl WinGate {
    pub fn new(probability: f64) -> Result<Self, RulesError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(RulesError::InvalidWinProbability(probability));
        }
        Ok(Self { probability })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Draw a uniform value; the turn wins when it falls below the probability
    pub fn is_win<R: RandomSource + ?Sized>(&self, rng: &mut R) -> bool {
        rng.next_unit() < self.probability
    }
}

impl Default for WinGate {
    fn default() -> Self {
        Self {
            probability: DEFAULT_WIN_PROBABILITY,
        }
    }
}

impl TryFrom<f64> for WinGate {
    type Error = RulesError;

    fn try_from(probability: f64) -> Result<Self, Self::Error> {
        Self::new(probability)
    }
}

impl From<WinGate> for f64 {
    fn from(gate: WinGate) -> Self {
        gate.probability
    }
}
