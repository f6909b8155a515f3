//! Roulette: one float mapped to a pocket on a single-zero wheel.

use super::Outcome;
use crate::errors::{EngineError, EngineResult};
use crate::payouts;
use crate::rng::OutcomeStream;
use serde::{Deserialize, Serialize};

/// Roulette bet types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouletteBet {
    Straight { number: u8 },
    Red,
    Black,
    Odd,
    Even,
    /// 1-18
    Low,
    /// 19-36
    High,
    /// 0 = 1-12, 1 = 13-24, 2 = 25-36
    Dozen { index: u8 },
    /// 0/1/2 = leftmost/middle/rightmost column of the layout
    Column { index: u8 },
}

impl RouletteBet {
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            RouletteBet::Straight { number } if *number > 36 => Err(EngineError::validation(
                format!("straight number must be 0-36, got {}", number),
            )),
            RouletteBet::Dozen { index } | RouletteBet::Column { index } if *index > 2 => Err(
                EngineError::validation(format!("dozen/column index must be 0-2, got {}", index)),
            ),
            _ => Ok(()),
        }
    }

    /// Whether this bet covers the drawn pocket. Zero wins only a straight
    /// bet on zero.
    pub fn wins(&self, pocket: u8) -> bool {
        match self {
            RouletteBet::Straight { number } => pocket == *number,
            _ if pocket == 0 => false,
            RouletteBet::Red => payouts::is_red(pocket),
            RouletteBet::Black => !payouts::is_red(pocket),
            RouletteBet::Odd => pocket % 2 == 1,
            RouletteBet::Even => pocket % 2 == 0,
            RouletteBet::Low => pocket <= 18,
            RouletteBet::High => pocket >= 19,
            RouletteBet::Dozen { index } => (pocket - 1) / 12 == *index,
            RouletteBet::Column { index } => (pocket - 1) % 3 == *index,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            RouletteBet::Straight { .. } => payouts::ROULETTE_STRAIGHT,
            RouletteBet::Dozen { .. } | RouletteBet::Column { .. } => payouts::ROULETTE_TWO_TO_ONE,
            _ => payouts::ROULETTE_EVEN_MONEY,
        }
    }
}

/// Spin the wheel: one float mapped to a pocket 0-36.
pub fn spin(stream: &mut OutcomeStream) -> u8 {
    stream.next_below(37) as u8
}

pub fn resolve(stream: &mut OutcomeStream, bet: &RouletteBet) -> (Outcome, f64) {
    let pocket = spin(stream);
    let win = bet.wins(pocket);
    let multiplier = if win { bet.multiplier() } else { 0.0 };
    (Outcome::Roulette { pocket, win }, multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_only_wins_straight_zero() {
        assert!(RouletteBet::Straight { number: 0 }.wins(0));
        assert!(!RouletteBet::Red.wins(0));
        assert!(!RouletteBet::Black.wins(0));
        assert!(!RouletteBet::Even.wins(0));
        assert!(!RouletteBet::Low.wins(0));
    }

    #[test]
    fn test_bet_coverage() {
        assert!(RouletteBet::Red.wins(1));
        assert!(RouletteBet::Black.wins(2));
        assert!(RouletteBet::Low.wins(18));
        assert!(RouletteBet::High.wins(19));
        assert!(RouletteBet::Dozen { index: 1 }.wins(13));
        assert!(!RouletteBet::Dozen { index: 1 }.wins(25));
        assert!(RouletteBet::Column { index: 0 }.wins(1));
        assert!(RouletteBet::Column { index: 2 }.wins(36));
    }

    #[test]
    fn test_validation() {
        assert!(RouletteBet::Straight { number: 37 }.validate().is_err());
        assert!(RouletteBet::Dozen { index: 3 }.validate().is_err());
        assert!(RouletteBet::Straight { number: 36 }.validate().is_ok());
    }

    #[test]
    fn test_red_rate_is_18_of_37() {
        let mut reds = 0u32;
        let rounds = 37_000u64;
        for nonce in 0..rounds {
            let mut stream = OutcomeStream::new("stat-secret", "stat-client", nonce);
            let pocket = spin(&mut stream);
            if pocket != 0 && payouts::is_red(pocket) {
                reds += 1;
            }
        }
        let rate = reds as f64 / rounds as f64;
        let expected = 18.0 / 37.0;
        assert!((rate - expected).abs() < 0.02, "red rate {}", rate);
    }
}
