//! Engine error taxonomy.
//!
//! Errors are grouped by how the caller recovers: validation and funds
//! errors are rejected before any state mutation, conflicts are retryable,
//! integrity faults indicate corrupted state or attempted forgery and are
//! never swallowed.

use crate::games::GameType;
use uuid::Uuid;

/// Root error type for all engine operations
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Bad stake, bad target range, malformed client seed, etc.
    /// Rejected before any state mutation.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Stake exceeds available balance. No nonce is consumed.
    #[error("Insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: u64, required: u64 },

    /// A stateful session of this game type is already running.
    #[error("A {game} session is already active for this user")]
    SessionActive { game: GameType },

    /// No active session of this game type for the user.
    #[error("No active {game} session for this user")]
    SessionNotFound { game: GameType },

    /// The supplied session id does not match the user's active session.
    #[error("Session {session_id} is not the active session for this user")]
    SessionMismatch { session_id: Uuid },

    /// Rotation mid-session would desynchronize the commitment.
    #[error("Cannot rotate the server seed while a game session is active")]
    RotationBlocked,

    /// Action not valid for the current session state.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Corrupted storage or attempted forgery (hash mismatch, nonce replay).
    /// Alerting condition, never recoverable.
    #[error("Integrity fault: {0}")]
    Integrity(String),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    pub fn invalid_action(msg: impl Into<String>) -> Self {
        EngineError::InvalidAction(msg.into())
    }

    pub fn integrity(msg: impl Into<String>) -> Self {
        EngineError::Integrity(msg.into())
    }
}

/// Convenience type alias for engine results
pub type EngineResult<T> = Result<T, EngineError>;
