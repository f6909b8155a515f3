//! Server/client seed lifecycle and nonce reservation.
//!
//! A user has exactly one active seed pair. The server secret is generated
//! from OS randomness and only its SHA-256 commitment is disclosed while
//! the pair is active; rotation reveals the secret, freezes the pair as an
//! immutable historical record, and activates a fresh pair with the nonce
//! reset to zero.

use crate::errors::{EngineError, EngineResult};
use crate::rng::sha256_hex;
use chrono::{DateTime, Utc};
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Client seed applied until the player chooses their own
pub const DEFAULT_CLIENT_SEED: &str = "fairline";
/// Longest accepted client seed, in bytes
pub const MAX_CLIENT_SEED_LEN: usize = 64;
/// Entropy of a server seed secret, in bytes (hex-encoded for storage)
const SERVER_SEED_BYTES: usize = 32;

struct ActivePair {
    id: Uuid,
    server_seed: String,
    server_seed_hash: String,
    client_seed: String,
    /// Next unconsumed nonce; the single serialization point for rounds
    nonce: AtomicU64,
}

impl ActivePair {
    fn generate(client_seed: String) -> Self {
        let mut bytes = [0u8; SERVER_SEED_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        let server_seed = hex::encode(bytes);
        let server_seed_hash = sha256_hex(&server_seed);
        Self {
            id: Uuid::new_v4(),
            server_seed,
            server_seed_hash,
            client_seed,
            nonce: AtomicU64::new(0),
        }
    }
}

struct UserSeeds {
    active: ActivePair,
    revealed: Vec<RevealedSeed>,
}

/// Publicly visible state of the active pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedInfo {
    pub server_seed_hash: String,
    pub client_seed: String,
    /// Nonce the next round will consume
    pub nonce: u64,
}

/// A retired pair, disclosed for audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealedSeed {
    pub seed_pair_id: Uuid,
    pub server_seed: String,
    pub server_seed_hash: String,
    pub client_seed: String,
    /// Rounds played under this pair (nonces 0..rounds_played)
    pub rounds_played: u64,
    pub revealed_at: DateTime<Utc>,
}

/// Everything a derivation needs, captured atomically with the reserved
/// nonce. The secret never leaves the engine.
#[derive(Debug, Clone)]
pub struct ReservedDerivation {
    pub seed_pair_id: Uuid,
    pub server_seed: String,
    pub server_seed_hash: String,
    pub client_seed: String,
    pub nonce: u64,
}

/// Owns every user's seed state
pub struct SeedManager {
    users: DashMap<String, UserSeeds>,
}

impl SeedManager {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// The user's seed slot, created with a fresh pair on first touch.
    /// Users are never removed.
    fn entry(&self, user_id: &str) -> RefMut<'_, String, UserSeeds> {
        self.users
            .entry(user_id.to_string())
            .or_insert_with(|| UserSeeds {
                active: ActivePair::generate(DEFAULT_CLIENT_SEED.to_string()),
                revealed: Vec::new(),
            })
    }

    /// Current seed info, creating a pair on first call. Idempotent.
    pub fn activate(&self, user_id: &str) -> SeedInfo {
        let entry = self.entry(user_id);
        let pair = &entry.active;
        SeedInfo {
            server_seed_hash: pair.server_seed_hash.clone(),
            client_seed: pair.client_seed.clone(),
            nonce: pair.nonce.load(Ordering::SeqCst),
        }
    }

    /// Set the client seed, effective starting with the next round.
    pub fn set_client_seed(&self, user_id: &str, new_seed: &str) -> EngineResult<SeedInfo> {
        let trimmed = new_seed.trim();
        if trimmed.is_empty() {
            return Err(EngineError::validation(
                "client seed must not be empty".to_string(),
            ));
        }
        if trimmed.len() > MAX_CLIENT_SEED_LEN {
            return Err(EngineError::validation(format!(
                "client seed must be at most {} bytes",
                MAX_CLIENT_SEED_LEN
            )));
        }
        if !trimmed.bytes().all(|b| (0x21..0x7f).contains(&b)) {
            return Err(EngineError::validation(
                "client seed must be printable ASCII without spaces".to_string(),
            ));
        }
        let mut entry = self.entry(user_id);
        entry.active.client_seed = trimmed.to_string();
        let pair = &entry.active;
        Ok(SeedInfo {
            server_seed_hash: pair.server_seed_hash.clone(),
            client_seed: pair.client_seed.clone(),
            nonce: pair.nonce.load(Ordering::SeqCst),
        })
    }

    /// Atomically reserve the next nonce along with the seed values the
    /// derivation will use.
    pub fn reserve(&self, user_id: &str) -> ReservedDerivation {
        let entry = self.entry(user_id);
        let pair = &entry.active;
        let nonce = pair.nonce.fetch_add(1, Ordering::SeqCst);
        ReservedDerivation {
            seed_pair_id: pair.id,
            server_seed: pair.server_seed.clone(),
            server_seed_hash: pair.server_seed_hash.clone(),
            client_seed: pair.client_seed.clone(),
            nonce,
        }
    }

    /// Retire the active pair, disclosing its secret, and activate a fresh
    /// one with the nonce reset to zero.
    ///
    /// The commitment is re-checked before disclosure; a mismatch means
    /// corrupted seed storage and surfaces as an integrity fault.
    pub fn rotate(&self, user_id: &str) -> EngineResult<RevealedSeed> {
        let mut entry = self.entry(user_id);
        if sha256_hex(&entry.active.server_seed) != entry.active.server_seed_hash {
            return Err(EngineError::integrity(
                "server seed commitment mismatch on rotation".to_string(),
            ));
        }
        let fresh = ActivePair::generate(entry.active.client_seed.clone());
        let retired = std::mem::replace(&mut entry.active, fresh);
        let revealed = RevealedSeed {
            seed_pair_id: retired.id,
            server_seed: retired.server_seed,
            server_seed_hash: retired.server_seed_hash,
            client_seed: retired.client_seed,
            rounds_played: retired.nonce.load(Ordering::SeqCst),
            revealed_at: Utc::now(),
        };
        entry.revealed.push(revealed.clone());
        Ok(revealed)
    }

    /// Historical revealed pairs, oldest first.
    pub fn history(&self, user_id: &str) -> Vec<RevealedSeed> {
        self.users
            .get(user_id)
            .map(|entry| entry.revealed.clone())
            .unwrap_or_default()
    }
}

impl Default for SeedManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_is_idempotent() {
        let seeds = SeedManager::new();
        let first = seeds.activate("alice");
        let second = seeds.activate("alice");
        assert_eq!(first.server_seed_hash, second.server_seed_hash);
        assert_eq!(first.client_seed, DEFAULT_CLIENT_SEED);
        assert_eq!(first.nonce, 0);
    }

    #[test]
    fn test_users_get_distinct_pairs() {
        let seeds = SeedManager::new();
        assert_ne!(
            seeds.activate("alice").server_seed_hash,
            seeds.activate("bob").server_seed_hash
        );
    }

    #[test]
    fn test_client_seed_validation() {
        let seeds = SeedManager::new();
        assert!(seeds.set_client_seed("alice", "").is_err());
        assert!(seeds.set_client_seed("alice", "   ").is_err());
        assert!(seeds.set_client_seed("alice", &"x".repeat(65)).is_err());
        assert!(seeds.set_client_seed("alice", "has spaces").is_err());
        let info = seeds.set_client_seed("alice", "my-lucky-seed").unwrap();
        assert_eq!(info.client_seed, "my-lucky-seed");
    }

    #[test]
    fn test_reserve_increments_nonce() {
        let seeds = SeedManager::new();
        assert_eq!(seeds.reserve("alice").nonce, 0);
        assert_eq!(seeds.reserve("alice").nonce, 1);
        assert_eq!(seeds.activate("alice").nonce, 2);
    }

    #[test]
    fn test_rotation_discloses_and_resets() {
        let seeds = SeedManager::new();
        let before = seeds.activate("alice");
        seeds.reserve("alice");
        seeds.reserve("alice");

        let revealed = seeds.rotate("alice").unwrap();
        // Commitment integrity: the disclosed secret matches the old hash
        assert_eq!(sha256_hex(&revealed.server_seed), before.server_seed_hash);
        assert_eq!(revealed.rounds_played, 2);

        let after = seeds.activate("alice");
        assert_ne!(after.server_seed_hash, before.server_seed_hash);
        assert_eq!(after.nonce, 0);
        assert_eq!(seeds.history("alice").len(), 1);
    }

    #[test]
    fn test_client_seed_survives_rotation() {
        let seeds = SeedManager::new();
        seeds.set_client_seed("alice", "sticky").unwrap();
        seeds.rotate("alice").unwrap();
        assert_eq!(seeds.activate("alice").client_seed, "sticky");
    }
}
