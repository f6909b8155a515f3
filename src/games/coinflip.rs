//! Coin flip: one float, threshold at 0.5.

use super::Outcome;
use crate::rng::OutcomeStream;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CoinSide {
    Heads,
    Tails,
}

impl fmt::Display for CoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinSide::Heads => write!(f, "heads"),
            CoinSide::Tails => write!(f, "tails"),
        }
    }
}

/// Flip the coin. Floats below 0.5 land heads.
pub fn flip(stream: &mut OutcomeStream) -> CoinSide {
    if stream.next_f64() < 0.5 {
        CoinSide::Heads
    } else {
        CoinSide::Tails
    }
}

pub fn resolve(stream: &mut OutcomeStream, pick: CoinSide, edge: f64) -> (Outcome, f64) {
    let result = flip(stream);
    let win = result == pick;
    let multiplier = if win { 2.0 * (1.0 - edge / 100.0) } else { 0.0 };
    (Outcome::CoinFlip { result, win }, multiplier)
}
