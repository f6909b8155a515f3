//! Rock-paper-scissors: one float, split into thirds for the house hand.

use super::Outcome;
use crate::rng::OutcomeStream;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RpsHand {
    Rock,
    Paper,
    Scissors,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RpsRoundResult {
    Win,
    Loss,
    Push,
}

/// Draw the house hand from one float.
pub fn house_hand(stream: &mut OutcomeStream) -> RpsHand {
    let f = stream.next_f64();
    if f < 1.0 / 3.0 {
        RpsHand::Rock
    } else if f < 2.0 / 3.0 {
        RpsHand::Paper
    } else {
        RpsHand::Scissors
    }
}

fn beats(a: RpsHand, b: RpsHand) -> bool {
    matches!(
        (a, b),
        (RpsHand::Rock, RpsHand::Scissors)
            | (RpsHand::Paper, RpsHand::Rock)
            | (RpsHand::Scissors, RpsHand::Paper)
    )
}

pub fn resolve(stream: &mut OutcomeStream, pick: RpsHand, edge: f64) -> (Outcome, f64) {
    let house = house_hand(stream);
    let (result, multiplier) = if pick == house {
        // Push returns the stake
        (RpsRoundResult::Push, 1.0)
    } else if beats(pick, house) {
        (RpsRoundResult::Win, 2.0 * (1.0 - edge / 100.0))
    } else {
        (RpsRoundResult::Loss, 0.0)
    };
    (Outcome::Rps { house, result }, multiplier)
}
