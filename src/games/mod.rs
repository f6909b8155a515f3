//! Game transforms.
//!
//! Each game consumes one or more floats from the outcome stream in a
//! fixed, documented order and converts the drawn outcome into a payout
//! multiplier. Single-shot games resolve in one call; stateful games
//! (mines, crash, blackjack, hi-lo) only derive their committed full
//! outcome here, with play handled by the session module.

pub mod bingo;
pub mod coinflip;
pub mod dice;
pub mod keno;
pub mod limbo;
pub mod plinko;
pub mod roulette;
pub mod rps;

use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::rng::OutcomeStream;
use crate::session;
use coinflip::CoinSide;
use plinko::PlinkoRisk;
use roulette::RouletteBet;
use rps::{RpsHand, RpsRoundResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported game types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    CoinFlip,
    Rps,
    Dice,
    Limbo,
    Roulette,
    Plinko,
    Keno,
    Bingo,
    Mines,
    Crash,
    Blackjack,
    HiLo,
}

impl GameType {
    /// Stateful games span several player decisions before settlement and
    /// are driven through the session state machine.
    pub fn is_stateful(&self) -> bool {
        matches!(
            self,
            GameType::Mines | GameType::Crash | GameType::Blackjack | GameType::HiLo
        )
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameType::CoinFlip => "coin_flip",
            GameType::Rps => "rps",
            GameType::Dice => "dice",
            GameType::Limbo => "limbo",
            GameType::Roulette => "roulette",
            GameType::Plinko => "plinko",
            GameType::Keno => "keno",
            GameType::Bingo => "bingo",
            GameType::Mines => "mines",
            GameType::Crash => "crash",
            GameType::Blackjack => "blackjack",
            GameType::HiLo => "hi_lo",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for GameType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coin_flip" => Ok(GameType::CoinFlip),
            "rps" => Ok(GameType::Rps),
            "dice" => Ok(GameType::Dice),
            "limbo" => Ok(GameType::Limbo),
            "roulette" => Ok(GameType::Roulette),
            "plinko" => Ok(GameType::Plinko),
            "keno" => Ok(GameType::Keno),
            "bingo" => Ok(GameType::Bingo),
            "mines" => Ok(GameType::Mines),
            "crash" => Ok(GameType::Crash),
            "blackjack" => Ok(GameType::Blackjack),
            "hi_lo" => Ok(GameType::HiLo),
            other => Err(EngineError::validation(format!(
                "unknown game type: {}",
                other
            ))),
        }
    }
}

/// Game-specific bet parameters (discriminated union keyed by game type)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum BetParams {
    CoinFlip {
        pick: CoinSide,
    },
    Rps {
        pick: RpsHand,
    },
    Dice {
        /// Win if the roll lands below this value, 1.00-95.00
        target: f64,
    },
    Limbo {
        /// Win if the drawn multiplier reaches this value
        target: f64,
    },
    Roulette {
        bet: RouletteBet,
    },
    Plinko {
        risk: PlinkoRisk,
        rows: u8,
    },
    Keno {
        picks: Vec<u8>,
    },
    Bingo {},
    Mines {
        mines: u8,
    },
    Crash {
        #[serde(skip_serializing_if = "Option::is_none")]
        auto_cash_out: Option<f64>,
    },
    Blackjack {},
    HiLo {},
}

impl BetParams {
    pub fn game_type(&self) -> GameType {
        match self {
            BetParams::CoinFlip { .. } => GameType::CoinFlip,
            BetParams::Rps { .. } => GameType::Rps,
            BetParams::Dice { .. } => GameType::Dice,
            BetParams::Limbo { .. } => GameType::Limbo,
            BetParams::Roulette { .. } => GameType::Roulette,
            BetParams::Plinko { .. } => GameType::Plinko,
            BetParams::Keno { .. } => GameType::Keno,
            BetParams::Bingo {} => GameType::Bingo,
            BetParams::Mines { .. } => GameType::Mines,
            BetParams::Crash { .. } => GameType::Crash,
            BetParams::Blackjack {} => GameType::Blackjack,
            BetParams::HiLo {} => GameType::HiLo,
        }
    }

    /// Validate game parameters before any state mutation.
    pub fn validate(&self, config: &EngineConfig) -> EngineResult<()> {
        match self {
            BetParams::Dice { target } => {
                if !(1.0..=95.0).contains(target) {
                    return Err(EngineError::validation(format!(
                        "dice target must be within 1.00-95.00, got {}",
                        target
                    )));
                }
            }
            BetParams::Limbo { target } => {
                if *target < 1.01 || *target > config.limbo_max {
                    return Err(EngineError::validation(format!(
                        "limbo target must be within 1.01-{}, got {}",
                        config.limbo_max, target
                    )));
                }
            }
            BetParams::Roulette { bet } => bet.validate()?,
            BetParams::Plinko { risk, rows } => {
                if crate::payouts::plinko_multipliers(*risk, *rows).is_none() {
                    return Err(EngineError::validation(format!(
                        "plinko supports 8, 12 or 16 rows, got {}",
                        rows
                    )));
                }
            }
            BetParams::Keno { picks } => keno::validate_picks(picks)?,
            BetParams::Mines { mines } => {
                if !(1..=24).contains(mines) {
                    return Err(EngineError::validation(format!(
                        "mine count must be within 1-24, got {}",
                        mines
                    )));
                }
            }
            BetParams::Crash { auto_cash_out } => {
                if let Some(target) = auto_cash_out {
                    if *target < 1.01 || *target > config.crash_max {
                        return Err(EngineError::validation(format!(
                            "auto cash-out must be within 1.01-{}, got {}",
                            config.crash_max, target
                        )));
                    }
                }
            }
            BetParams::CoinFlip { .. }
            | BetParams::Rps { .. }
            | BetParams::Bingo {}
            | BetParams::Blackjack {}
            | BetParams::HiLo {} => {}
        }
        Ok(())
    }
}

/// Raw derived outcome of a round (the values a verifier recomputes)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum Outcome {
    CoinFlip {
        result: CoinSide,
        win: bool,
    },
    Rps {
        house: RpsHand,
        result: RpsRoundResult,
    },
    Dice {
        roll: f64,
        win: bool,
    },
    Limbo {
        result: f64,
        win: bool,
    },
    Roulette {
        pocket: u8,
        win: bool,
    },
    Plinko {
        /// Left/right decision at each pin row
        path: String,
        bucket: u8,
    },
    Keno {
        drawn: Vec<u8>,
        hits: Vec<u8>,
    },
    Bingo {
        /// 25 cells row-major, 0 marks the free center
        card: Vec<u8>,
        drawn: Vec<u8>,
        lines: u8,
        full_house: bool,
    },
    /// Committed mine layout of a session
    Mines {
        mine_cells: Vec<u8>,
    },
    /// Committed crash point of a session
    Crash {
        crash_point: f64,
    },
    /// Committed shoe order of a blackjack session
    Blackjack {
        deck: Vec<u8>,
    },
    /// Committed deck order of a hi-lo session
    HiLo {
        deck: Vec<u8>,
    },
}

/// Resolve a single-shot bet into its outcome and payout multiplier.
///
/// Stateful game types are rejected here; they are started through the
/// session state machine instead.
pub fn resolve_single(
    params: &BetParams,
    stream: &mut OutcomeStream,
    config: &EngineConfig,
) -> EngineResult<(Outcome, f64)> {
    let edge = config.edges.for_game(params.game_type());
    match params {
        BetParams::CoinFlip { pick } => Ok(coinflip::resolve(stream, *pick, edge)),
        BetParams::Rps { pick } => Ok(rps::resolve(stream, *pick, edge)),
        BetParams::Dice { target } => Ok(dice::resolve(stream, *target, edge)),
        BetParams::Limbo { target } => Ok(limbo::resolve(stream, *target, edge, config.limbo_max)),
        BetParams::Roulette { bet } => Ok(roulette::resolve(stream, bet)),
        BetParams::Plinko { risk, rows } => Ok(plinko::resolve(stream, *risk, *rows)),
        BetParams::Keno { picks } => Ok(keno::resolve(stream, picks)),
        BetParams::Bingo {} => Ok(bingo::resolve(stream)),
        _ => Err(EngineError::validation(format!(
            "{} is a session game; use the session endpoints",
            params.game_type()
        ))),
    }
}

/// Derive the committed outcome for any game type.
///
/// Single-shot games return their full resolution and multiplier; stateful
/// games return the outcome fixed at session start (mine layout, crash
/// point, shoe order) whose realized multiplier depends on play.
pub fn derive_outcome(
    params: &BetParams,
    stream: &mut OutcomeStream,
    config: &EngineConfig,
) -> EngineResult<(Outcome, Option<f64>)> {
    let edge = config.edges.for_game(params.game_type());
    match params {
        BetParams::Mines { mines } => {
            let mine_cells = session::mines::derive_layout(stream, *mines);
            Ok((Outcome::Mines { mine_cells }, None))
        }
        BetParams::Crash { .. } => {
            let crash_point = session::crash::derive_crash_point(stream, edge, config.crash_max);
            Ok((Outcome::Crash { crash_point }, Some(crash_point)))
        }
        BetParams::Blackjack {} => Ok((
            Outcome::Blackjack {
                deck: stream.shuffled_deck(),
            },
            None,
        )),
        BetParams::HiLo {} => Ok((
            Outcome::HiLo {
                deck: stream.shuffled_deck(),
            },
            None,
        )),
        _ => {
            let (outcome, multiplier) = resolve_single(params, stream, config)?;
            Ok((outcome, Some(multiplier)))
        }
    }
}
