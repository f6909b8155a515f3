//! Blackjack against a committed single-deck shoe.
//!
//! The full 52-card order is fixed at session start; hits and the dealer's
//! draws simply take the next undealt cards. Dealer draws to 17 and stands
//! on all 17s. Natural blackjack pays 3:2, wins pay 1:1, pushes return the
//! stake.
//!
//! Cards are 0-51: suit = card / 13, rank = card % 13 (0 = ace).

use super::{SessionStatus, StepOutcome};
use crate::errors::{EngineError, EngineResult};
use crate::rng::OutcomeStream;
use serde::{Deserialize, Serialize};

/// Payout multipliers on the effective stake
const WIN: f64 = 2.0;
const PUSH: f64 = 1.0;
const NATURAL: f64 = 2.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlackjackState {
    /// Committed shoe order
    pub deck: Vec<u8>,
    /// Next undealt position in the shoe
    pub drawn: usize,
    pub player: Vec<u8>,
    pub dealer: Vec<u8>,
    pub doubled: bool,
}

/// Blackjack value of a single card: aces count 11 here, face cards 10.
pub fn card_value(card: u8) -> u8 {
    match card % 13 {
        0 => 11,
        9..=12 => 10,
        rank => rank + 1,
    }
}

/// Best hand value, downgrading aces from 11 to 1 while busting.
pub fn hand_value(hand: &[u8]) -> u8 {
    let mut total: u16 = hand.iter().map(|&c| card_value(c) as u16).sum();
    let mut aces = hand.iter().filter(|&&c| c % 13 == 0).count();
    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }
    total as u8
}

fn is_natural(hand: &[u8]) -> bool {
    hand.len() == 2 && hand_value(hand) == 21
}

/// Deal the opening hands from the committed shoe: player, dealer, player,
/// dealer.
pub fn start(stream: &mut OutcomeStream) -> BlackjackState {
    let deck = stream.shuffled_deck();
    let player = vec![deck[0], deck[2]];
    let dealer = vec![deck[1], deck[3]];
    BlackjackState {
        deck,
        drawn: 4,
        player,
        dealer,
        doubled: false,
    }
}

/// Settle naturals immediately after the opening deal.
pub fn initial_step(state: &BlackjackState) -> StepOutcome {
    match (is_natural(&state.player), is_natural(&state.dealer)) {
        (true, true) => StepOutcome::terminal(SessionStatus::Won, PUSH),
        (true, false) => StepOutcome::terminal(SessionStatus::Won, NATURAL),
        (false, true) => StepOutcome::terminal(SessionStatus::Lost, 0.0),
        (false, false) => StepOutcome::active(),
    }
}

fn next_card(state: &mut BlackjackState) -> EngineResult<u8> {
    let card = state
        .deck
        .get(state.drawn)
        .copied()
        .ok_or_else(|| EngineError::integrity("blackjack shoe exhausted".to_string()))?;
    state.drawn += 1;
    Ok(card)
}

fn dealer_play_and_settle(state: &mut BlackjackState) -> EngineResult<StepOutcome> {
    while hand_value(&state.dealer) < 17 {
        let card = next_card(state)?;
        state.dealer.push(card);
    }
    let dealer = hand_value(&state.dealer);
    let player = hand_value(&state.player);
    let step = if dealer > 21 || player > dealer {
        StepOutcome::terminal(SessionStatus::Won, WIN)
    } else if player == dealer {
        StepOutcome::terminal(SessionStatus::Won, PUSH)
    } else {
        StepOutcome::terminal(SessionStatus::Lost, 0.0)
    };
    Ok(step)
}

/// Draw one card. Busting loses; reaching 21 auto-stands.
pub fn hit(state: &mut BlackjackState) -> EngineResult<StepOutcome> {
    let card = next_card(state)?;
    state.player.push(card);
    let value = hand_value(&state.player);
    if value > 21 {
        return Ok(StepOutcome::terminal(SessionStatus::Lost, 0.0));
    }
    if value == 21 {
        return dealer_play_and_settle(state);
    }
    Ok(StepOutcome::active())
}

/// Stop drawing; the dealer plays out from the committed shoe.
pub fn stand(state: &mut BlackjackState) -> EngineResult<StepOutcome> {
    dealer_play_and_settle(state)
}

/// Double the stake, draw exactly one card, then the dealer plays. Only
/// valid as the first action. The extra stake is debited by the engine
/// before this transition runs.
pub fn double(state: &mut BlackjackState) -> EngineResult<StepOutcome> {
    if state.player.len() != 2 || state.doubled {
        return Err(EngineError::invalid_action(
            "double is only available on the opening hand".to_string(),
        ));
    }
    state.doubled = true;
    let card = next_card(state)?;
    state.player.push(card);
    if hand_value(&state.player) > 21 {
        return Ok(StepOutcome::terminal(SessionStatus::Lost, 0.0));
    }
    dealer_play_and_settle(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_values() {
        assert_eq!(card_value(0), 11); // ace of first suit
        assert_eq!(card_value(13), 11); // ace of second suit
        assert_eq!(card_value(1), 2);
        assert_eq!(card_value(9), 10); // ten
        assert_eq!(card_value(12), 10); // king
    }

    #[test]
    fn test_hand_value_ace_adjustment() {
        // A + 9 = 20 (soft)
        assert_eq!(hand_value(&[0, 8]), 20);
        // A + 9 + 5 = 15 (ace downgraded)
        assert_eq!(hand_value(&[0, 8, 4]), 15);
        // A + A + 9 = 21
        assert_eq!(hand_value(&[0, 13, 8]), 21);
        // A + K = natural 21
        assert_eq!(hand_value(&[0, 12]), 21);
    }

    #[test]
    fn test_start_deals_from_committed_shoe() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        let state = start(&mut stream);
        assert_eq!(state.player, vec![state.deck[0], state.deck[2]]);
        assert_eq!(state.dealer, vec![state.deck[1], state.deck[3]]);
        assert_eq!(state.drawn, 4);
    }

    #[test]
    fn test_hit_takes_next_undealt_card() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        let mut state = start(&mut stream);
        let expected = state.deck[4];
        let _ = hit(&mut state).unwrap();
        assert_eq!(state.player[2], expected);
    }

    #[test]
    fn test_dealer_draws_to_seventeen() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        let mut state = start(&mut stream);
        let step = stand(&mut state).unwrap();
        assert!(step.status.is_terminal());
        let dealer = hand_value(&state.dealer);
        assert!(dealer >= 17, "dealer stopped at {}", dealer);
    }

    #[test]
    fn test_double_restricted_to_opening_hand() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        let mut state = start(&mut stream);
        // After a hit the player has three cards; double must be rejected
        if hit(&mut state).unwrap().status == SessionStatus::Active {
            assert!(double(&mut state).is_err());
        }
    }

    #[test]
    fn test_settlement_is_replayable() {
        // Same seeds, same play sequence, same result
        let run = |nonce: u64| {
            let mut stream = OutcomeStream::new("replay-secret", "replay-client", nonce);
            let mut state = start(&mut stream);
            let initial = initial_step(&state);
            if initial.status.is_terminal() {
                return (initial.status, initial.multiplier);
            }
            let step = stand(&mut state).unwrap();
            (step.status, step.multiplier)
        };
        for nonce in 0..20 {
            assert_eq!(run(nonce), run(nonce));
        }
    }
}
