//! Route definitions.
//!
//! Maps URLs to handlers with type-safe routing.

use super::handlers::*;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the API router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check (high priority)
        .route("/health", get(health_handler))
        // Seed lifecycle
        .route("/api/seed/:user_id", get(get_seed_handler))
        .route("/api/seed/:user_id/history", get(seed_history_handler))
        .route("/api/seed/client", post(set_client_seed_handler))
        .route("/api/seed/rotate", post(rotate_seed_handler))
        // Single-shot play
        .route("/api/play", post(play_handler))
        // Stateful sessions
        .route("/api/session/start", post(start_session_handler))
        .route("/api/session/act", post(act_handler))
        .route("/api/session/cashout", post(cash_out_handler))
        .route("/api/session/:user_id/:game", get(get_session_handler))
        // Public verification (no authentication required)
        .route("/api/verify", post(verify_handler))
        // Audit trail
        .route("/api/rounds/:user_id", get(rounds_handler))
        // In-memory ledger gateway
        .route("/api/balance/:user_id", get(balance_handler))
        .route("/api/deposit", post(deposit_handler))
        // Attach shared state
        .with_state(state)
}
