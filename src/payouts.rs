//! Static, versioned payout tables.
//!
//! Every transform converts a drawn outcome into a payout multiplier through
//! these tables. The active version is reported in each result's fairness
//! block so an auditor knows which table applied to a historical round.

use crate::games::plinko::PlinkoRisk;

/// Version tag reported alongside every result
pub const TABLE_VERSION: &str = "v1";

/// Convert a stake and multiplier into a payout, rounding down to whole
/// currency units.
pub fn payout_amount(stake: u64, multiplier: f64) -> u64 {
    (stake as f64 * multiplier).floor() as u64
}

// ---------------------------------------------------------------------------
// Roulette (single-zero wheel)
// ---------------------------------------------------------------------------

/// Red pockets on a single-zero wheel
pub const ROULETTE_RED: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

pub fn is_red(pocket: u8) -> bool {
    ROULETTE_RED.contains(&pocket)
}

/// Straight number pays 36x (35:1 plus stake)
pub const ROULETTE_STRAIGHT: f64 = 36.0;
/// Color, parity and range bets pay 2x
pub const ROULETTE_EVEN_MONEY: f64 = 2.0;
/// Dozens and columns pay 3x
pub const ROULETTE_TWO_TO_ONE: f64 = 3.0;

// ---------------------------------------------------------------------------
// Plinko bucket tables, keyed by (risk, rows)
// ---------------------------------------------------------------------------

static PLINKO_LOW_8: [f64; 9] = [5.6, 2.1, 1.1, 1.0, 0.5, 1.0, 1.1, 2.1, 5.6];
static PLINKO_MEDIUM_8: [f64; 9] = [13.0, 3.0, 1.3, 0.7, 0.4, 0.7, 1.3, 3.0, 13.0];
static PLINKO_HIGH_8: [f64; 9] = [29.0, 4.0, 1.5, 0.3, 0.2, 0.3, 1.5, 4.0, 29.0];

static PLINKO_LOW_12: [f64; 13] = [
    10.0, 3.0, 1.6, 1.4, 1.1, 1.0, 0.5, 1.0, 1.1, 1.4, 1.6, 3.0, 10.0,
];
static PLINKO_MEDIUM_12: [f64; 13] = [
    33.0, 11.0, 4.0, 2.0, 1.1, 0.6, 0.3, 0.6, 1.1, 2.0, 4.0, 11.0, 33.0,
];
static PLINKO_HIGH_12: [f64; 13] = [
    170.0, 24.0, 8.1, 2.0, 0.7, 0.2, 0.2, 0.2, 0.7, 2.0, 8.1, 24.0, 170.0,
];

static PLINKO_LOW_16: [f64; 17] = [
    16.0, 9.0, 2.0, 1.4, 1.4, 1.2, 1.1, 1.0, 0.5, 1.0, 1.1, 1.2, 1.4, 1.4, 2.0, 9.0, 16.0,
];
static PLINKO_MEDIUM_16: [f64; 17] = [
    110.0, 41.0, 10.0, 5.0, 3.0, 1.5, 1.0, 0.5, 0.3, 0.5, 1.0, 1.5, 3.0, 5.0, 10.0, 41.0, 110.0,
];
static PLINKO_HIGH_16: [f64; 17] = [
    1000.0, 130.0, 26.0, 9.0, 4.0, 2.0, 0.2, 0.2, 0.2, 0.2, 0.2, 2.0, 4.0, 9.0, 26.0, 130.0,
    1000.0,
];

/// Bucket multipliers for a (risk, rows) board. Rows outside {8, 12, 16}
/// have no table and are rejected at validation time.
pub fn plinko_multipliers(risk: PlinkoRisk, rows: u8) -> Option<&'static [f64]> {
    match (risk, rows) {
        (PlinkoRisk::Low, 8) => Some(&PLINKO_LOW_8),
        (PlinkoRisk::Medium, 8) => Some(&PLINKO_MEDIUM_8),
        (PlinkoRisk::High, 8) => Some(&PLINKO_HIGH_8),
        (PlinkoRisk::Low, 12) => Some(&PLINKO_LOW_12),
        (PlinkoRisk::Medium, 12) => Some(&PLINKO_MEDIUM_12),
        (PlinkoRisk::High, 12) => Some(&PLINKO_HIGH_12),
        (PlinkoRisk::Low, 16) => Some(&PLINKO_LOW_16),
        (PlinkoRisk::Medium, 16) => Some(&PLINKO_MEDIUM_16),
        (PlinkoRisk::High, 16) => Some(&PLINKO_HIGH_16),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Keno: multiplier by (picks, hits), 10 numbers drawn from 1-40
// ---------------------------------------------------------------------------

static KENO_1: [f64; 2] = [0.0, 3.96];
static KENO_2: [f64; 3] = [0.0, 1.9, 4.5];
static KENO_3: [f64; 4] = [0.0, 1.0, 3.1, 10.4];
static KENO_4: [f64; 5] = [0.0, 0.8, 1.8, 5.0, 22.5];
static KENO_5: [f64; 6] = [0.0, 0.25, 1.4, 4.1, 16.5, 36.0];
static KENO_6: [f64; 7] = [0.0, 0.0, 1.0, 3.68, 7.0, 16.5, 40.0];
static KENO_7: [f64; 8] = [0.0, 0.0, 0.47, 3.0, 4.5, 14.0, 31.0, 60.0];
static KENO_8: [f64; 9] = [0.0, 0.0, 0.0, 2.2, 4.0, 13.0, 22.0, 55.0, 70.0];
static KENO_9: [f64; 10] = [0.0, 0.0, 0.0, 1.55, 3.0, 8.0, 15.0, 44.0, 60.0, 85.0];
static KENO_10: [f64; 11] = [
    0.0, 0.0, 0.0, 1.4, 2.25, 4.5, 8.0, 17.0, 50.0, 80.0, 100.0,
];

/// Multiplier for a keno round. `picks` is validated to 1-10 upstream.
pub fn keno_multiplier(picks: usize, hits: usize) -> f64 {
    let table: &[f64] = match picks {
        1 => &KENO_1,
        2 => &KENO_2,
        3 => &KENO_3,
        4 => &KENO_4,
        5 => &KENO_5,
        6 => &KENO_6,
        7 => &KENO_7,
        8 => &KENO_8,
        9 => &KENO_9,
        10 => &KENO_10,
        _ => return 0.0,
    };
    table.get(hits).copied().unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Bingo: 30 numbers drawn from 1-75 against a 5x5 card
// ---------------------------------------------------------------------------

/// Multiplier by completed lines (rows, columns, diagonals) on the card.
/// A full house pays a flat multiplier regardless of line count.
pub fn bingo_multiplier(lines: u8, full_house: bool) -> f64 {
    if full_house {
        return 50.0;
    }
    match lines {
        0 => 0.0,
        1 => 2.0,
        2 => 4.0,
        3 => 8.0,
        4 => 15.0,
        _ => 25.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_rounds_down() {
        assert_eq!(payout_amount(1000, 1.96), 1960);
        assert_eq!(payout_amount(3, 0.5), 1);
        assert_eq!(payout_amount(100, 0.0), 0);
    }

    #[test]
    fn test_roulette_reds() {
        assert!(is_red(1));
        assert!(!is_red(2));
        assert!(!is_red(0));
        assert_eq!(ROULETTE_RED.len(), 18);
    }

    #[test]
    fn test_plinko_tables_are_symmetric() {
        for (risk, rows) in [
            (PlinkoRisk::Low, 8),
            (PlinkoRisk::Medium, 12),
            (PlinkoRisk::High, 16),
        ] {
            let table = plinko_multipliers(risk, rows).unwrap();
            assert_eq!(table.len(), rows as usize + 1);
            for i in 0..table.len() {
                assert_eq!(table[i], table[table.len() - 1 - i]);
            }
        }
    }

    #[test]
    fn test_plinko_unsupported_rows() {
        assert!(plinko_multipliers(PlinkoRisk::Low, 9).is_none());
    }

    #[test]
    fn test_keno_table_shape() {
        for picks in 1..=10 {
            // Max hits pays the most
            assert!(keno_multiplier(picks, picks) > keno_multiplier(picks, 0));
        }
        assert_eq!(keno_multiplier(11, 5), 0.0);
    }

    #[test]
    fn test_bingo_full_house_dominates() {
        assert!(bingo_multiplier(12, true) > bingo_multiplier(5, false));
        assert_eq!(bingo_multiplier(0, false), 0.0);
    }
}
