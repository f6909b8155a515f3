//! Fairline - Provably-Fair Casino Outcome Engine
//!
//! Deterministic, auditable outcome generation for casino games. Every
//! round is a pure function of a committed server seed, a player-chosen
//! client seed, and a monotonic nonce: the operator commits to the seed's
//! SHA-256 hash before play, and rotation discloses the secret so any
//! third party can replay every round bit-for-bit.
//!
//! Single-shot games (coin flip, dice, limbo, roulette, plinko, keno,
//! bingo, RPS) settle in one derivation; stateful games (mines, crash,
//! blackjack, hi-lo) fix their entire outcome at session start and only
//! reveal it incrementally as the player acts.

pub mod api;
pub mod config;
pub mod engine;
pub mod errors;
pub mod games;
pub mod ledger;
pub mod payouts;
pub mod rng;
pub mod rounds;
pub mod seeds;
pub mod session;
pub mod verify;

pub use config::{AppConfig, EngineConfig};
pub use engine::Engine;
pub use errors::{EngineError, EngineResult};
