//! Dice: one float mapped to a roll in [0, 100) with two decimals.

use super::Outcome;
use crate::rng::OutcomeStream;

/// Roll the dice. The raw float is scaled to 0.00-99.99.
pub fn roll(stream: &mut OutcomeStream) -> f64 {
    (stream.next_f64() * 10_000.0).floor() / 100.0
}

/// Win if the roll lands strictly below the target.
/// Multiplier = (100 - edge) / target.
pub fn resolve(stream: &mut OutcomeStream, target: f64, edge: f64) -> (Outcome, f64) {
    let roll = roll(stream);
    let win = roll < target;
    let multiplier = if win { (100.0 - edge) / target } else { 0.0 };
    (Outcome::Dice { roll, win }, multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_has_two_decimals() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        for _ in 0..100 {
            let r = roll(&mut stream);
            assert!((0.0..100.0).contains(&r));
            assert_eq!((r * 100.0).round(), r * 100.0);
        }
    }

    #[test]
    fn test_multiplier_formula() {
        // target 50 with 2% edge pays 98/50 = 1.96
        let mut stream = OutcomeStream::new("s", "c", 0);
        let r = roll(&mut stream);
        let mut replay = OutcomeStream::new("s", "c", 0);
        let (outcome, multiplier) = resolve(&mut replay, 50.0, 2.0);
        match outcome {
            Outcome::Dice { roll, win } => {
                assert_eq!(roll, r);
                if win {
                    assert!((multiplier - 1.96).abs() < 1e-9);
                } else {
                    assert_eq!(multiplier, 0.0);
                }
            }
            _ => panic!("wrong outcome type"),
        }
    }

    #[test]
    fn test_win_rate_tracks_target() {
        let mut wins = 0u32;
        let rounds = 20_000u64;
        for nonce in 0..rounds {
            let mut stream = OutcomeStream::new("stat-secret", "stat-client", nonce);
            let (outcome, _) = resolve(&mut stream, 50.0, 2.0);
            if matches!(outcome, Outcome::Dice { win: true, .. }) {
                wins += 1;
            }
        }
        let rate = wins as f64 / rounds as f64;
        assert!((0.47..0.53).contains(&rate), "win rate {}", rate);
    }
}
