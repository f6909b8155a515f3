//! Mines: a 5x5 grid with a committed mine layout, revealed cell by cell.
//!
//! The layout comes from a partial Fisher-Yates over the 25 cell indices at
//! session start. Each safe reveal multiplies the pot by the fair odds of
//! that step; the house edge scales the product once.

use super::{SessionStatus, StepOutcome};
use crate::errors::{EngineError, EngineResult};
use crate::rng::OutcomeStream;
use serde::{Deserialize, Serialize};

/// Cells on the board
pub const GRID_SIZE: u8 = 25;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinesState {
    /// Committed mine positions, sorted
    pub mines: Vec<u8>,
    pub mine_count: u8,
    /// Safe cells uncovered so far, in reveal order
    pub revealed: Vec<u8>,
}

/// Derive the committed mine layout, consuming `mine_count` floats.
pub fn derive_layout(stream: &mut OutcomeStream, mine_count: u8) -> Vec<u8> {
    let mut cells: Vec<u8> = stream
        .draw_distinct(GRID_SIZE as u32, mine_count as usize)
        .into_iter()
        .map(|c| c as u8)
        .collect();
    cells.sort_unstable();
    cells
}

pub fn start(stream: &mut OutcomeStream, mine_count: u8) -> MinesState {
    MinesState {
        mines: derive_layout(stream, mine_count),
        mine_count,
        revealed: Vec::new(),
    }
}

/// Pot multiplier after `safe_revealed` safe cells with `mine_count` mines.
///
/// Each step's fair odds are cells-remaining over safe-cells-remaining;
/// the edge scales the product once.
pub fn multiplier(mine_count: u8, safe_revealed: usize, edge: f64) -> f64 {
    let mut product = 1.0f64;
    for i in 0..safe_revealed {
        let cells_left = (GRID_SIZE as usize - i) as f64;
        let safe_left = (GRID_SIZE as usize - mine_count as usize - i) as f64;
        product *= cells_left / safe_left;
    }
    product * (1.0 - edge / 100.0)
}

/// Uncover a cell. Hitting a mine loses the session; clearing every safe
/// cell wins it at the full multiplier.
pub fn reveal(state: &mut MinesState, cell: u8, edge: f64) -> EngineResult<StepOutcome> {
    if cell >= GRID_SIZE {
        return Err(EngineError::validation(format!(
            "cell must be 0-24, got {}",
            cell
        )));
    }
    if state.revealed.contains(&cell) {
        return Err(EngineError::invalid_action(format!(
            "cell {} is already revealed",
            cell
        )));
    }
    if state.mines.contains(&cell) {
        return Ok(StepOutcome::terminal(SessionStatus::Lost, 0.0));
    }
    state.revealed.push(cell);
    let safe_total = GRID_SIZE - state.mine_count;
    if state.revealed.len() == safe_total as usize {
        let m = multiplier(state.mine_count, state.revealed.len(), edge);
        return Ok(StepOutcome::terminal(SessionStatus::Won, m));
    }
    Ok(StepOutcome::active())
}

/// Lock in the current pot. Requires at least one safe reveal.
pub fn cash_out(state: &MinesState, edge: f64) -> EngineResult<StepOutcome> {
    if state.revealed.is_empty() {
        return Err(EngineError::invalid_action(
            "cash-out requires at least one revealed cell".to_string(),
        ));
    }
    Ok(StepOutcome::terminal(
        SessionStatus::CashedOut,
        multiplier(state.mine_count, state.revealed.len(), edge),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_layout_is_deterministic_and_unique() {
        let mut a = OutcomeStream::new("s", "c", 0);
        let mut b = OutcomeStream::new("s", "c", 0);
        let first = derive_layout(&mut a, 5);
        assert_eq!(first, derive_layout(&mut b, 5));
        let unique: HashSet<_> = first.iter().collect();
        assert_eq!(unique.len(), 5);
        assert!(first.iter().all(|&c| c < GRID_SIZE));
    }

    #[test]
    fn test_multiplier_grows_per_step() {
        // 5 mines: step odds 25/20, then 24/19, then 23/18
        let m1 = multiplier(5, 1, 0.0);
        assert!((m1 - 25.0 / 20.0).abs() < 1e-12);
        let m3 = multiplier(5, 3, 0.0);
        let expected = (25.0 / 20.0) * (24.0 / 19.0) * (23.0 / 18.0);
        assert!((m3 - expected).abs() < 1e-12);
        assert!(multiplier(5, 3, 1.0) < m3);
    }

    #[test]
    fn test_reveal_mine_loses() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        let mut state = start(&mut stream, 5);
        let mine = state.mines[0];
        let step = reveal(&mut state, mine, 1.0).unwrap();
        assert_eq!(step.status, SessionStatus::Lost);
        assert_eq!(step.multiplier, 0.0);
    }

    #[test]
    fn test_reveal_safe_continues() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        let mut state = start(&mut stream, 5);
        let safe = (0..GRID_SIZE).find(|c| !state.mines.contains(c)).unwrap();
        let step = reveal(&mut state, safe, 1.0).unwrap();
        assert_eq!(step.status, SessionStatus::Active);
        assert_eq!(state.revealed, vec![safe]);
        // Revealing the same cell twice is rejected
        assert!(reveal(&mut state, safe, 1.0).is_err());
    }

    #[test]
    fn test_clearing_all_safe_cells_wins() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        let mut state = start(&mut stream, 24);
        let safe = (0..GRID_SIZE).find(|c| !state.mines.contains(c)).unwrap();
        let step = reveal(&mut state, safe, 1.0).unwrap();
        assert_eq!(step.status, SessionStatus::Won);
        // One safe cell among 24 mines pays 25x scaled by the edge
        assert!((step.multiplier - 25.0 * 0.99).abs() < 1e-9);
    }

    #[test]
    fn test_cash_out_requires_progress() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        let mut state = start(&mut stream, 5);
        assert!(cash_out(&state, 1.0).is_err());
        let safe = (0..GRID_SIZE).find(|c| !state.mines.contains(c)).unwrap();
        reveal(&mut state, safe, 1.0).unwrap();
        let step = cash_out(&state, 1.0).unwrap();
        assert_eq!(step.status, SessionStatus::CashedOut);
        assert!((step.multiplier - multiplier(5, 1, 1.0)).abs() < 1e-12);
    }
}
