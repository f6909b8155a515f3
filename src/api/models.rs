//! API request and response models.
//!
//! Engine-side types (play results, session snapshots, verification
//! results) serialize directly; this module holds the request wrappers and
//! the handful of API-only responses.

use crate::games::BetParams;
use crate::session::SessionAction;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Change the client seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetClientSeedRequest {
    pub user_id: String,
    pub client_seed: String,
}

/// Rotate the server seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotateSeedRequest {
    pub user_id: String,
}

/// Play a single-shot game. Game parameters are flattened alongside the
/// envelope: `{"user_id": "...", "stake": 100, "game": "dice", "target": 50}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRequest {
    pub user_id: String,
    pub stake: u64,
    #[serde(flatten)]
    pub params: BetParams,
}

/// Start a stateful session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub user_id: String,
    pub stake: u64,
    #[serde(flatten)]
    pub params: BetParams,
}

/// Act on an active session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActRequest {
    pub user_id: String,
    pub session_id: Uuid,
    #[serde(flatten)]
    pub action: SessionAction,
}

/// Cash out an active session. `at_multiplier` carries the crash cash-out
/// multiplier; mines and hi-lo ignore it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashOutRequest {
    pub user_id: String,
    pub session_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_multiplier: Option<f64>,
}

/// Paging for the round history endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RoundsQuery {
    pub limit: Option<usize>,
}

/// Balance lookup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub user_id: String,
    pub balance: u64,
}

/// Test-gateway deposit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRequest {
    pub user_id: String,
    pub amount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::coinflip::CoinSide;

    #[test]
    fn test_play_request_flattens_params() {
        let json = r#"{"user_id":"alice","stake":100,"game":"dice","target":50.0}"#;
        let request: PlayRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.user_id, "alice");
        assert!(matches!(request.params, BetParams::Dice { target } if target == 50.0));
    }

    #[test]
    fn test_act_request_flattens_action() {
        let json = r#"{"user_id":"alice","session_id":"2f4ad743-3b7e-4bb2-a3ac-7d7b1c66e6b5","action":"reveal","cell":7}"#;
        let request: ActRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(request.action, SessionAction::Reveal { cell: 7 }));
    }

    #[test]
    fn test_coinflip_request_shape() {
        let json = r#"{"user_id":"alice","stake":50,"game":"coin_flip","pick":"heads"}"#;
        let request: PlayRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(
            request.params,
            BetParams::CoinFlip {
                pick: CoinSide::Heads
            }
        ));
    }
}
