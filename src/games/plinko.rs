//! Plinko: one float per pin row, each deciding left or right. The bucket
//! index is the count of rightward bounces.

use super::Outcome;
use crate::payouts;
use crate::rng::OutcomeStream;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlinkoRisk {
    Low,
    Medium,
    High,
}

/// Drop the ball. Returns the L/R path and the landing bucket.
pub fn drop_ball(stream: &mut OutcomeStream, rows: u8) -> (String, u8) {
    let mut path = String::with_capacity(rows as usize);
    let mut bucket = 0u8;
    for _ in 0..rows {
        if stream.next_f64() < 0.5 {
            path.push('L');
        } else {
            path.push('R');
            bucket += 1;
        }
    }
    (path, bucket)
}

pub fn resolve(stream: &mut OutcomeStream, risk: PlinkoRisk, rows: u8) -> (Outcome, f64) {
    let (path, bucket) = drop_ball(stream, rows);
    // Rows were validated against the table upstream
    let multiplier = payouts::plinko_multipliers(risk, rows)
        .and_then(|table| table.get(bucket as usize).copied())
        .unwrap_or(0.0);
    (Outcome::Plinko { path, bucket }, multiplier)
}
