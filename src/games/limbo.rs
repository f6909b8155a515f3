//! Limbo: one float through the inverse-CDF curve (1 - edge) / (1 - f),
//! floored to two decimals and clamped to the supported range.

use super::Outcome;
use crate::rng::OutcomeStream;

/// Drawn multiplier for a limbo round.
pub fn draw_multiplier(stream: &mut OutcomeStream, edge: f64, max: f64) -> f64 {
    let f = stream.next_f64();
    let raw = (1.0 - edge / 100.0) / (1.0 - f);
    ((raw * 100.0).floor() / 100.0).clamp(1.0, max)
}

/// Win if the drawn multiplier reaches the player's target; the payout
/// multiplier is the target itself.
pub fn resolve(stream: &mut OutcomeStream, target: f64, edge: f64, max: f64) -> (Outcome, f64) {
    let result = draw_multiplier(stream, edge, max);
    let win = result >= target;
    let multiplier = if win { target } else { 0.0 };
    (Outcome::Limbo { result, win }, multiplier)
}
