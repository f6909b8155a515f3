//! Request handlers.
//!
//! Each handler validates input, delegates to the engine, and maps engine
//! errors onto the HTTP taxonomy. Handlers hold no game logic.

use super::errors::ApiError;
use super::middleware::RequestId;
use super::models::*;
use crate::engine::{Engine, PlayResult};
use crate::games::GameType;
use crate::rounds::Round;
use crate::seeds::{RevealedSeed, SeedInfo};
use crate::session::SessionSnapshot;
use crate::verify::{VerifyRequest, VerifyResult};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    Extension,
};
use std::sync::Arc;

/// Default and ceiling for the round history page size
const DEFAULT_ROUNDS_LIMIT: usize = 50;
const MAX_ROUNDS_LIMIT: usize = 500;

/// Shared state for all handlers
pub struct AppState {
    pub engine: Arc<Engine>,
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/seed/:user_id
pub async fn get_seed_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<SeedInfo> {
    Json(state.engine.active_seed(&user_id))
}

/// POST /api/seed/client
pub async fn set_client_seed_handler(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(request): Json<SetClientSeedRequest>,
) -> Result<Json<SeedInfo>, ApiError> {
    state
        .engine
        .set_client_seed(&request.user_id, &request.client_seed)
        .map(Json)
        .map_err(|e| ApiError::from_engine(e, request_id))
}

/// POST /api/seed/rotate
pub async fn rotate_seed_handler(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(request): Json<RotateSeedRequest>,
) -> Result<Json<RevealedSeed>, ApiError> {
    state
        .engine
        .rotate_seed(&request.user_id)
        .map(Json)
        .map_err(|e| ApiError::from_engine(e, request_id))
}

/// GET /api/seed/:user_id/history
pub async fn seed_history_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<Vec<RevealedSeed>> {
    Json(state.engine.seed_history(&user_id))
}

/// POST /api/play
pub async fn play_handler(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(request): Json<PlayRequest>,
) -> Result<Json<PlayResult>, ApiError> {
    state
        .engine
        .play(&request.user_id, request.stake, request.params)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_engine(e, request_id))
}

/// POST /api/session/start
pub async fn start_session_handler(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    state
        .engine
        .start_session(&request.user_id, request.stake, request.params)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_engine(e, request_id))
}

/// POST /api/session/act
pub async fn act_handler(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(request): Json<ActRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    state
        .engine
        .act(&request.user_id, request.session_id, request.action)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_engine(e, request_id))
}

/// POST /api/session/cashout
pub async fn cash_out_handler(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(request): Json<CashOutRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    state
        .engine
        .cash_out(&request.user_id, request.session_id, request.at_multiplier)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_engine(e, request_id))
}

/// GET /api/session/:user_id/:game — resume an active session
pub async fn get_session_handler(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Path((user_id, game)): Path<(String, String)>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let game: GameType = game
        .parse()
        .map_err(|e| ApiError::from_engine(e, request_id.clone()))?;
    state
        .engine
        .session(&user_id, game)
        .map(Json)
        .map_err(|e| ApiError::from_engine(e, request_id))
}

/// POST /api/verify — public, recomputes from caller-supplied values
pub async fn verify_handler(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResult>, ApiError> {
    state
        .engine
        .verify(&request)
        .map(Json)
        .map_err(|e| ApiError::from_engine(e, request_id))
}

/// GET /api/rounds/:user_id
pub async fn rounds_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<RoundsQuery>,
) -> Json<Vec<Round>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ROUNDS_LIMIT)
        .min(MAX_ROUNDS_LIMIT);
    Json(state.engine.rounds(&user_id, limit))
}

/// GET /api/balance/:user_id
pub async fn balance_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<BalanceResponse> {
    let balance = state.engine.balance(&user_id).await;
    Json(BalanceResponse { user_id, balance })
}

/// POST /api/deposit — in-memory gateway surface for integration testing
pub async fn deposit_handler(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(request): Json<DepositRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    if request.amount == 0 {
        return Err(ApiError::bad_request(
            request_id,
            "deposit amount must be positive".to_string(),
        ));
    }
    let balance = state.engine.deposit(&request.user_id, request.amount).await;
    Ok(Json(BalanceResponse {
        user_id: request.user_id,
        balance,
    }))
}
