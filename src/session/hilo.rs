//! Hi-lo over a committed deck order.
//!
//! The full 52-card order is shuffled at session start; every guess simply
//! compares the next undealt card against the current one. Ace ranks low,
//! ties lose, and the pot accumulates fair odds per correct guess scaled
//! by the house edge.

use super::{SessionStatus, StepOutcome};
use crate::errors::{EngineError, EngineResult};
use crate::rng::OutcomeStream;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiLoState {
    /// Committed deck order
    pub deck: Vec<u8>,
    /// Index of the current face-up card
    pub position: usize,
    /// Pot multiplier accumulated over correct guesses
    pub accumulator: f64,
    pub correct_guesses: u32,
}

/// Rank of a card for hi-lo comparison: ace = 1 through king = 13.
pub fn card_rank(card: u8) -> u8 {
    (card % 13) + 1
}

pub fn start(stream: &mut OutcomeStream) -> HiLoState {
    HiLoState {
        deck: stream.shuffled_deck(),
        position: 0,
        accumulator: 1.0,
        correct_guesses: 0,
    }
}

impl HiLoState {
    pub fn current_card(&self) -> u8 {
        self.deck[self.position]
    }

    /// Cards revealed so far, oldest first.
    pub fn seen(&self) -> &[u8] {
        &self.deck[..=self.position]
    }
}

/// Fair-odds multiplier for one correct guess from `rank`, scaled by the
/// house edge. Thirteen ranks, four of each.
fn step_multiplier(rank: u8, guess_higher: bool, edge: f64) -> f64 {
    let wins = if guess_higher {
        13 - rank as i32
    } else {
        rank as i32 - 1
    };
    debug_assert!(wins > 0);
    (13.0 / wins as f64) * (1.0 - edge / 100.0)
}

/// Guess whether the next undealt card ranks higher or lower.
pub fn guess(state: &mut HiLoState, higher: bool, edge: f64) -> EngineResult<StepOutcome> {
    let current_rank = card_rank(state.current_card());
    if higher && current_rank == 13 {
        return Err(EngineError::invalid_action(
            "cannot guess higher than a king".to_string(),
        ));
    }
    if !higher && current_rank == 1 {
        return Err(EngineError::invalid_action(
            "cannot guess lower than an ace".to_string(),
        ));
    }
    // The next card was committed at session start
    state.position += 1;
    let next_rank = card_rank(state.current_card());
    let correct = if higher {
        next_rank > current_rank
    } else {
        next_rank < current_rank
    };
    if !correct {
        return Ok(StepOutcome::terminal(SessionStatus::Lost, 0.0));
    }
    state.accumulator *= step_multiplier(current_rank, higher, edge);
    state.correct_guesses += 1;
    if state.position == state.deck.len() - 1 {
        // Deck exhausted: lock in the pot
        return Ok(StepOutcome::terminal(
            SessionStatus::CashedOut,
            state.accumulator,
        ));
    }
    Ok(StepOutcome::active())
}

/// Lock in the pot. Requires at least one correct guess.
pub fn cash_out(state: &HiLoState) -> EngineResult<StepOutcome> {
    if state.correct_guesses == 0 {
        return Err(EngineError::invalid_action(
            "cash-out requires at least one correct guess".to_string(),
        ));
    }
    Ok(StepOutcome::terminal(
        SessionStatus::CashedOut,
        state.accumulator,
    ))
}
