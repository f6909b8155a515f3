//! Public verification of past rounds.
//!
//! A pure recomputation from caller-supplied, disclosed values: no stored
//! state, no side effects, no authentication. Given the secret revealed by
//! a seed rotation, any third party can reproduce every round played under
//! that pair bit-for-bit.

use crate::config::EngineConfig;
use crate::errors::EngineResult;
use crate::games::{self, BetParams, Outcome};
use crate::payouts;
use crate::rng::{sha256_hex, OutcomeStream};
use serde::{Deserialize, Serialize};

/// Disclosed values identifying one derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub server_seed: String,
    pub client_seed: String,
    pub nonce: u64,
    #[serde(flatten)]
    pub params: BetParams,
}

/// Recomputed result of the derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResult {
    /// Commitment the operator must have shown before play
    pub server_seed_hash: String,
    /// First HMAC block of the byte stream, hex-encoded
    pub hmac: String,
    pub outcome: Outcome,
    /// Payout multiplier for single-shot games and the committed point for
    /// crash; absent where the realized multiplier depends on play
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    pub table_version: String,
}

/// Recompute the outcome for disclosed seeds. Bit-identical to the live
/// derivation for the same inputs.
pub fn verify(request: &VerifyRequest, config: &EngineConfig) -> EngineResult<VerifyResult> {
    request.params.validate(config)?;
    let mut stream = OutcomeStream::new(&request.server_seed, &request.client_seed, request.nonce);
    let (outcome, multiplier) = games::derive_outcome(&request.params, &mut stream, config)?;
    Ok(VerifyResult {
        server_seed_hash: sha256_hex(&request.server_seed),
        hmac: OutcomeStream::block_hex(
            &request.server_seed,
            &request.client_seed,
            request.nonce,
            0,
        ),
        outcome,
        multiplier,
        table_version: payouts::TABLE_VERSION.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    fn request(params: BetParams) -> VerifyRequest {
        VerifyRequest {
            server_seed: "abc".to_string(),
            client_seed: "xyz".to_string(),
            nonce: 0,
            params,
        }
    }

    #[test]
    fn test_verification_matches_live_derivation() {
        let cfg = config();
        let params = BetParams::Dice { target: 50.0 };
        let mut live = OutcomeStream::new("abc", "xyz", 0);
        let (live_outcome, live_multiplier) =
            games::resolve_single(&params, &mut live, &cfg).unwrap();

        let result = verify(&request(params), &cfg).unwrap();
        assert_eq!(result.outcome, live_outcome);
        assert_eq!(result.multiplier, Some(live_multiplier));
    }

    #[test]
    fn test_commitment_hash_reported() {
        let cfg = config();
        let result = verify(&request(BetParams::Dice { target: 50.0 }), &cfg).unwrap();
        assert_eq!(result.server_seed_hash, sha256_hex("abc"));
        assert_eq!(result.hmac.len(), 64);
    }

    #[test]
    fn test_session_games_return_committed_outcome() {
        let cfg = config();
        let result = verify(&request(BetParams::Mines { mines: 5 }), &cfg).unwrap();
        match result.outcome {
            Outcome::Mines { mine_cells } => assert_eq!(mine_cells.len(), 5),
            _ => panic!("wrong outcome type"),
        }
        assert!(result.multiplier.is_none());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let cfg = config();
        assert!(verify(&request(BetParams::Dice { target: 0.0 }), &cfg).is_err());
    }

    #[test]
    fn test_verification_is_pure() {
        let cfg = config();
        let req = request(BetParams::Limbo { target: 2.0 });
        let first = verify(&req, &cfg).unwrap();
        let second = verify(&req, &cfg).unwrap();
        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.hmac, second.hmac);
    }
}
