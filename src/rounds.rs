//! Append-only round history.
//!
//! A round is immutable once written and is the sole source of truth for
//! later verification. The store enforces nonce uniqueness per seed pair:
//! a replay is an integrity fault, never silently tolerated.

use crate::errors::{EngineError, EngineResult};
use crate::games::{BetParams, GameType, Outcome};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One resolved bet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub round_id: Uuid,
    pub user_id: String,
    pub seed_pair_id: Uuid,
    pub server_seed_hash: String,
    pub client_seed: String,
    pub nonce: u64,
    pub game: GameType,
    pub stake: u64,
    pub params: BetParams,
    pub outcome: Outcome,
    pub multiplier: f64,
    pub payout: u64,
    pub completed_at: DateTime<Utc>,
}

/// In-memory append-only store keyed by user
pub struct RoundStore {
    by_user: DashMap<String, Vec<Round>>,
}

impl RoundStore {
    pub fn new() -> Self {
        Self {
            by_user: DashMap::new(),
        }
    }

    /// Append a completed round, enforcing (seed_pair, nonce) uniqueness.
    pub fn append(&self, round: Round) -> EngineResult<()> {
        let mut rounds = self.by_user.entry(round.user_id.clone()).or_default();
        if rounds
            .iter()
            .any(|r| r.seed_pair_id == round.seed_pair_id && r.nonce == round.nonce)
        {
            return Err(EngineError::integrity(format!(
                "nonce replay detected: seed pair {} nonce {}",
                round.seed_pair_id, round.nonce
            )));
        }
        rounds.push(round);
        Ok(())
    }

    /// Most recent rounds for a user, newest first.
    pub fn recent(&self, user_id: &str, limit: usize) -> Vec<Round> {
        self.by_user
            .get(user_id)
            .map(|rounds| rounds.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Total rounds recorded for a user.
    pub fn count(&self, user_id: &str) -> usize {
        self.by_user.get(user_id).map(|r| r.len()).unwrap_or(0)
    }
}

impl Default for RoundStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::coinflip::CoinSide;

    fn round(user: &str, seed_pair_id: Uuid, nonce: u64) -> Round {
        Round {
            round_id: Uuid::new_v4(),
            user_id: user.to_string(),
            seed_pair_id,
            server_seed_hash: "hash".to_string(),
            client_seed: "client".to_string(),
            nonce,
            game: GameType::CoinFlip,
            stake: 100,
            params: BetParams::CoinFlip {
                pick: CoinSide::Heads,
            },
            outcome: Outcome::CoinFlip {
                result: CoinSide::Heads,
                win: true,
            },
            multiplier: 1.96,
            payout: 196,
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_append_and_recent() {
        let store = RoundStore::new();
        let pair = Uuid::new_v4();
        store.append(round("alice", pair, 0)).unwrap();
        store.append(round("alice", pair, 1)).unwrap();
        let recent = store.recent("alice", 10);
        assert_eq!(recent.len(), 2);
        // Newest first
        assert_eq!(recent[0].nonce, 1);
    }

    #[test]
    fn test_nonce_replay_is_an_integrity_fault() {
        let store = RoundStore::new();
        let pair = Uuid::new_v4();
        store.append(round("alice", pair, 0)).unwrap();
        let err = store.append(round("alice", pair, 0)).unwrap_err();
        assert!(matches!(err, EngineError::Integrity(_)));
    }

    #[test]
    fn test_same_nonce_under_different_pairs_is_fine() {
        let store = RoundStore::new();
        store.append(round("alice", Uuid::new_v4(), 0)).unwrap();
        store.append(round("alice", Uuid::new_v4(), 0)).unwrap();
        assert_eq!(store.count("alice"), 2);
    }
}
