//! Bingo: a seed-derived 5x5 card checked against 30 numbers drawn from a
//! 1-75 pool.
//!
//! Derivation order is fixed: first the card, column by column (B 1-15,
//! I 16-30, N 31-45 with a free center, G 46-60, O 61-75), then the 30
//! draws. Lines are the 5 rows, 5 columns and 2 diagonals.

use super::Outcome;
use crate::payouts;
use crate::rng::OutcomeStream;

/// Numbers drawn per round
pub const DRAW_COUNT: usize = 30;
/// Free center marker on the card
pub const FREE_CELL: u8 = 0;

/// Generate the player's card: 25 cells row-major, `FREE_CELL` at the
/// center. Each column holds unique numbers from its 15-number range.
pub fn generate_card(stream: &mut OutcomeStream) -> Vec<u8> {
    let mut card = vec![FREE_CELL; 25];
    for col in 0..5usize {
        let base = col as u32 * 15;
        let needed = if col == 2 { 4 } else { 5 };
        let drawn = stream.draw_distinct(15, needed);
        let mut next = drawn.into_iter();
        for row in 0..5usize {
            if col == 2 && row == 2 {
                continue; // free center
            }
            // draw_distinct returned exactly `needed` values
            if let Some(n) = next.next() {
                card[row * 5 + col] = (base + n) as u8 + 1;
            }
        }
    }
    card
}

/// Draw the round's numbers, consuming exactly `DRAW_COUNT` floats.
pub fn draw(stream: &mut OutcomeStream) -> Vec<u8> {
    stream
        .draw_distinct(75, DRAW_COUNT)
        .into_iter()
        .map(|n| n as u8 + 1)
        .collect()
}

fn marked(card: &[u8], drawn: &[u8], row: usize, col: usize) -> bool {
    let cell = card[row * 5 + col];
    cell == FREE_CELL || drawn.contains(&cell)
}

/// Count completed lines and detect a full house.
pub fn score_card(card: &[u8], drawn: &[u8]) -> (u8, bool) {
    let mut lines = 0u8;
    for row in 0..5 {
        if (0..5).all(|col| marked(card, drawn, row, col)) {
            lines += 1;
        }
    }
    for col in 0..5 {
        if (0..5).all(|row| marked(card, drawn, row, col)) {
            lines += 1;
        }
    }
    if (0..5).all(|i| marked(card, drawn, i, i)) {
        lines += 1;
    }
    if (0..5).all(|i| marked(card, drawn, i, 4 - i)) {
        lines += 1;
    }
    let full_house = (0..5).all(|row| (0..5).all(|col| marked(card, drawn, row, col)));
    (lines, full_house)
}

pub fn resolve(stream: &mut OutcomeStream) -> (Outcome, f64) {
    let card = generate_card(stream);
    let drawn = draw(stream);
    let (lines, full_house) = score_card(&card, &drawn);
    let multiplier = payouts::bingo_multiplier(lines, full_house);
    (
        Outcome::Bingo {
            card,
            drawn,
            lines,
            full_house,
        },
        multiplier,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_card_layout() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        let card = generate_card(&mut stream);
        assert_eq!(card.len(), 25);
        assert_eq!(card[12], FREE_CELL);
        // Column ranges hold
        for col in 0..5usize {
            let low = col as u8 * 15 + 1;
            let high = col as u8 * 15 + 15;
            for row in 0..5usize {
                if col == 2 && row == 2 {
                    continue;
                }
                let cell = card[row * 5 + col];
                assert!((low..=high).contains(&cell), "cell {} in col {}", cell, col);
            }
        }
        // No duplicates among the 24 numbers
        let unique: HashSet<_> = card.iter().filter(|&&c| c != FREE_CELL).collect();
        assert_eq!(unique.len(), 24);
    }

    #[test]
    fn test_draw_is_thirty_unique() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        let drawn = draw(&mut stream);
        assert_eq!(drawn.len(), DRAW_COUNT);
        let unique: HashSet<_> = drawn.iter().collect();
        assert_eq!(unique.len(), DRAW_COUNT);
    }

    #[test]
    fn test_full_house_when_everything_drawn() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        let card = generate_card(&mut stream);
        let everything: Vec<u8> = (1..=75).collect();
        let (lines, full_house) = score_card(&card, &everything);
        assert_eq!(lines, 12);
        assert!(full_house);
    }

    #[test]
    fn test_center_row_and_column_need_only_four() {
        let mut stream = OutcomeStream::new("s", "c", 0);
        let card = generate_card(&mut stream);
        // Drawing exactly the middle row's four numbers completes one line
        let middle_row: Vec<u8> = (0..5)
            .map(|col| card[2 * 5 + col])
            .filter(|&c| c != FREE_CELL)
            .collect();
        let (lines, full_house) = score_card(&card, &middle_row);
        assert!(lines >= 1);
        assert!(!full_house);
    }

    #[test]
    fn test_resolve_deterministic() {
        let mut a = OutcomeStream::new("s", "c", 9);
        let mut b = OutcomeStream::new("s", "c", 9);
        assert_eq!(resolve(&mut a).0, resolve(&mut b).0);
    }
}
