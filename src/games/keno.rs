//! Keno: ten unique numbers drawn from a 1-40 pool via partial shuffle,
//! paid by the (picks, hits) table.

use super::Outcome;
use crate::errors::{EngineError, EngineResult};
use crate::payouts;
use crate::rng::OutcomeStream;

/// Numbers drawn per round
pub const DRAW_COUNT: usize = 10;
/// Size of the number pool
pub const POOL_SIZE: u32 = 40;
/// Most numbers a player may pick
pub const MAX_PICKS: usize = 10;

pub fn validate_picks(picks: &[u8]) -> EngineResult<()> {
    if picks.is_empty() || picks.len() > MAX_PICKS {
        return Err(EngineError::validation(format!(
            "keno takes 1-{} picks, got {}",
            MAX_PICKS,
            picks.len()
        )));
    }
    if picks.iter().any(|&p| p == 0 || p as u32 > POOL_SIZE) {
        return Err(EngineError::validation(format!(
            "keno picks must be within 1-{}",
            POOL_SIZE
        )));
    }
    let mut seen = [false; POOL_SIZE as usize + 1];
    for &p in picks {
        if seen[p as usize] {
            return Err(EngineError::validation(format!(
                "duplicate keno pick {}",
                p
            )));
        }
        seen[p as usize] = true;
    }
    Ok(())
}

/// Draw the round's numbers, consuming exactly `DRAW_COUNT` floats.
pub fn draw(stream: &mut OutcomeStream) -> Vec<u8> {
    stream
        .draw_distinct(POOL_SIZE, DRAW_COUNT)
        .into_iter()
        .map(|n| n as u8 + 1)
        .collect()
}

pub fn resolve(stream: &mut OutcomeStream, picks: &[u8]) -> (Outcome, f64) {
    let drawn = draw(stream);
    let mut hits: Vec<u8> = picks
        .iter()
        .copied()
        .filter(|p| drawn.contains(p))
        .collect();
    hits.sort_unstable();
    let multiplier = payouts::keno_multiplier(picks.len(), hits.len());
    (Outcome::Keno { drawn, hits }, multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_draw_is_ten_unique_in_pool() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        let drawn = draw(&mut stream);
        assert_eq!(drawn.len(), DRAW_COUNT);
        let unique: HashSet<_> = drawn.iter().collect();
        assert_eq!(unique.len(), DRAW_COUNT);
        assert!(drawn.iter().all(|&n| (1..=40).contains(&n)));
    }

    #[test]
    fn test_validate_picks() {
        assert!(validate_picks(&[1, 2, 3]).is_ok());
        assert!(validate_picks(&[]).is_err());
        assert!(validate_picks(&[0]).is_err());
        assert!(validate_picks(&[41]).is_err());
        assert!(validate_picks(&[5, 5]).is_err());
        assert!(validate_picks(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]).is_err());
    }

    #[test]
    fn test_hits_are_the_intersection() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        let drawn = draw(&mut stream);
        // Pick the first three drawn numbers plus one sure miss
        let miss = (1..=40).find(|n| !drawn.contains(n)).unwrap();
        let picks = vec![drawn[0], drawn[1], drawn[2], miss];
        let mut replay = OutcomeStream::new("s", "c", 0);
        let (outcome, multiplier) = resolve(&mut replay, &picks);
        match outcome {
            Outcome::Keno { hits, .. } => {
                assert_eq!(hits.len(), 3);
                assert_eq!(multiplier, payouts::keno_multiplier(4, 3));
            }
            _ => panic!("wrong outcome type"),
        }
    }
}
