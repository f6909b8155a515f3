//! Crash: a committed crash point drawn from the exponential-curve inverse
//! CDF at session start.
//!
//! The client-side animation climbs continuously, but it is cosmetic: a
//! cash-out request carries the multiplier the player cashes out at and is
//! compared against the fixed crash point at receipt time. The crash point
//! is never recomputed.

use super::{SessionStatus, StepOutcome};
use crate::errors::{EngineError, EngineResult};
use crate::rng::OutcomeStream;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrashState {
    /// Committed crash point, fixed at session start
    pub crash_point: f64,
    pub auto_cash_out: Option<f64>,
    /// Multiplier the player locked in, if they cashed out in time
    pub cashed_out_at: Option<f64>,
}

/// Draw the crash point: one float through (1 - edge) / (1 - f), floored
/// to two decimals, clamped to [1.00, max].
pub fn derive_crash_point(stream: &mut OutcomeStream, edge: f64, max: f64) -> f64 {
    let f = stream.next_f64();
    let raw = (1.0 - edge / 100.0) / (1.0 - f);
    ((raw * 100.0).floor() / 100.0).clamp(1.0, max)
}

pub fn start(stream: &mut OutcomeStream, edge: f64, max: f64, auto_cash_out: Option<f64>) -> CrashState {
    CrashState {
        crash_point: derive_crash_point(stream, edge, max),
        auto_cash_out,
        cashed_out_at: None,
    }
}

/// Settle a cash-out request against the committed crash point. The player
/// wins at `at` only if the curve had not yet crashed there.
pub fn cash_out(state: &mut CrashState, at: f64) -> EngineResult<StepOutcome> {
    if at < 1.01 {
        return Err(EngineError::validation(format!(
            "cash-out multiplier must be at least 1.01, got {}",
            at
        )));
    }
    if at < state.crash_point {
        state.cashed_out_at = Some(at);
        Ok(StepOutcome::terminal(SessionStatus::CashedOut, at))
    } else {
        // The curve crashed before the requested multiplier
        Ok(StepOutcome::terminal(SessionStatus::Lost, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crash_point_at_least_one() {
        for nonce in 0..1_000 {
            let mut stream = OutcomeStream::new("s", "c", nonce);
            let point = derive_crash_point(&mut stream, 1.0, 10_000.0);
            assert!((1.0..=10_000.0).contains(&point));
        }
    }

    #[test]
    fn test_crash_point_is_deterministic() {
        let mut a = OutcomeStream::new("s", "c", 5);
        let mut b = OutcomeStream::new("s", "c", 5);
        assert_eq!(
            derive_crash_point(&mut a, 1.0, 10_000.0),
            derive_crash_point(&mut b, 1.0, 10_000.0)
        );
    }

    #[test]
    fn test_cash_out_below_crash_point_wins() {
        let mut state = CrashState {
            crash_point: 1.80,
            auto_cash_out: None,
            cashed_out_at: None,
        };
        let step = cash_out(&mut state, 1.50).unwrap();
        assert_eq!(step.status, SessionStatus::CashedOut);
        assert_eq!(step.multiplier, 1.50);
        assert_eq!(state.cashed_out_at, Some(1.50));
    }

    #[test]
    fn test_cash_out_at_or_past_crash_point_loses() {
        // Client displayed 2.00x but the committed point was 1.80x:
        // the server settles a loss at the fixed point, not a win.
        let mut state = CrashState {
            crash_point: 1.80,
            auto_cash_out: None,
            cashed_out_at: None,
        };
        let step = cash_out(&mut state, 2.00).unwrap();
        assert_eq!(step.status, SessionStatus::Lost);
        assert_eq!(step.multiplier, 0.0);
        assert_eq!(state.cashed_out_at, None);

        // Exactly at the crash point also loses
        let step = cash_out(&mut state, 1.80).unwrap();
        assert_eq!(step.status, SessionStatus::Lost);
    }

    #[test]
    fn test_cash_out_multiplier_validated() {
        let mut state = CrashState {
            crash_point: 1.80,
            auto_cash_out: None,
            cashed_out_at: None,
        };
        assert!(cash_out(&mut state, 1.0).is_err());
    }

    #[test]
    fn test_median_crash_point_near_two() {
        // P(crash >= 2) is about (1 - edge/100) / 2
        let mut above = 0u32;
        let rounds = 10_000u64;
        for nonce in 0..rounds {
            let mut stream = OutcomeStream::new("stat-secret", "stat-client", nonce);
            if derive_crash_point(&mut stream, 1.0, 10_000.0) >= 2.0 {
                above += 1;
            }
        }
        let rate = above as f64 / rounds as f64;
        assert!((0.45..0.54).contains(&rate), "rate {}", rate);
    }
}
