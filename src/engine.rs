//! Engine facade.
//!
//! Orchestrates one play or session action end to end: validate, debit the
//! stake, reserve a nonce, derive the outcome, credit the payout, record
//! the round. Everything before the debit is side-effect-free, so a
//! rejected request never consumes a nonce.

use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::games::{self, BetParams, GameType, Outcome};
use crate::ledger::Ledger;
use crate::payouts::{self, payout_amount};
use crate::rng::OutcomeStream;
use crate::rounds::{Round, RoundStore};
use crate::seeds::{RevealedSeed, SeedInfo, SeedManager};
use crate::session::{
    blackjack, crash, hilo, mines, GameSession, SessionAction, SessionSnapshot, SessionState,
    SessionStatus, SessionStore, StepOutcome,
};
use crate::verify::{self, VerifyRequest, VerifyResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Commitment data returned with every result so the player can audit the
/// round after the seed is rotated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fairness {
    pub server_seed_hash: String,
    pub client_seed: String,
    pub nonce: u64,
    pub table_version: String,
}

/// Settled single-shot round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayResult {
    pub round_id: Uuid,
    pub game: GameType,
    pub outcome: Outcome,
    pub multiplier: f64,
    pub payout: u64,
    pub balance: u64,
    pub fairness: Fairness,
}

/// Provably-fair outcome engine
pub struct Engine {
    config: EngineConfig,
    seeds: SeedManager,
    sessions: SessionStore,
    rounds: RoundStore,
    ledger: Arc<dyn Ledger>,
}

impl Engine {
    pub fn new(config: EngineConfig, ledger: Arc<dyn Ledger>) -> Self {
        Self {
            config,
            seeds: SeedManager::new(),
            sessions: SessionStore::new(),
            rounds: RoundStore::new(),
            ledger,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Seed lifecycle
    // ------------------------------------------------------------------

    /// Current commitment for the user, creating a pair on first call.
    pub fn active_seed(&self, user_id: &str) -> SeedInfo {
        self.seeds.activate(user_id)
    }

    /// Change the client seed, effective with the next round.
    pub fn set_client_seed(&self, user_id: &str, new_seed: &str) -> EngineResult<SeedInfo> {
        self.seeds.set_client_seed(user_id, new_seed)
    }

    /// Rotate the server seed, disclosing the retiring secret. Blocked
    /// while any session is active, since rotating mid-session would
    /// desynchronize the commitment.
    pub fn rotate_seed(&self, user_id: &str) -> EngineResult<RevealedSeed> {
        if self.sessions.has_active_for_user(user_id) {
            return Err(EngineError::RotationBlocked);
        }
        self.seeds.rotate(user_id)
    }

    /// Previously rotated (disclosed) pairs, oldest first.
    pub fn seed_history(&self, user_id: &str) -> Vec<RevealedSeed> {
        self.seeds.history(user_id)
    }

    // ------------------------------------------------------------------
    // Single-shot play
    // ------------------------------------------------------------------

    /// Play one single-shot round.
    pub async fn play(
        &self,
        user_id: &str,
        stake: u64,
        params: BetParams,
    ) -> EngineResult<PlayResult> {
        let game = params.game_type();
        if game.is_stateful() {
            return Err(EngineError::validation(format!(
                "{} spans multiple decisions; use the session endpoints",
                game
            )));
        }
        params.validate(&self.config)?;
        self.check_stake(stake)?;

        // Funds are settled before any nonce is reserved or randomness
        // drawn, so a rejected bet wastes neither
        self.ledger.debit(user_id, stake).await?;
        let reserved = self.seeds.reserve(user_id);
        let mut stream =
            OutcomeStream::new(&reserved.server_seed, &reserved.client_seed, reserved.nonce);
        let (outcome, multiplier) = games::resolve_single(&params, &mut stream, &self.config)?;
        let payout = payout_amount(stake, multiplier);
        if payout > 0 {
            self.ledger
                .credit(user_id, payout, &format!("{} payout", game))
                .await;
        }

        let round_id = Uuid::new_v4();
        self.rounds.append(Round {
            round_id,
            user_id: user_id.to_string(),
            seed_pair_id: reserved.seed_pair_id,
            server_seed_hash: reserved.server_seed_hash.clone(),
            client_seed: reserved.client_seed.clone(),
            nonce: reserved.nonce,
            game,
            stake,
            params,
            outcome: outcome.clone(),
            multiplier,
            payout,
            completed_at: Utc::now(),
        })?;

        let balance = self.ledger.balance(user_id).await;
        tracing::info!(user_id, %game, nonce = reserved.nonce, payout, "round settled");
        Ok(PlayResult {
            round_id,
            game,
            outcome,
            multiplier,
            payout,
            balance,
            fairness: Fairness {
                server_seed_hash: reserved.server_seed_hash,
                client_seed: reserved.client_seed,
                nonce: reserved.nonce,
                table_version: payouts::TABLE_VERSION.to_string(),
            },
        })
    }

    // ------------------------------------------------------------------
    // Stateful sessions
    // ------------------------------------------------------------------

    /// Start a multi-round session: reserves one nonce, derives the full
    /// outcome up front, and returns only what is safe to reveal.
    pub async fn start_session(
        &self,
        user_id: &str,
        stake: u64,
        params: BetParams,
    ) -> EngineResult<SessionSnapshot> {
        let game = params.game_type();
        if !game.is_stateful() {
            return Err(EngineError::validation(format!(
                "{} settles in one shot; use the play endpoint",
                game
            )));
        }
        params.validate(&self.config)?;
        self.check_stake(stake)?;
        if self.sessions.contains(user_id, game) {
            return Err(EngineError::SessionActive { game });
        }

        self.ledger.debit(user_id, stake).await?;
        let reserved = self.seeds.reserve(user_id);
        let mut stream =
            OutcomeStream::new(&reserved.server_seed, &reserved.client_seed, reserved.nonce);
        let edge = self.config.edges.for_game(game);

        let (state, initial) = match &params {
            BetParams::Mines { mines: count } => (
                SessionState::Mines(mines::start(&mut stream, *count)),
                StepOutcome::active(),
            ),
            BetParams::Crash { auto_cash_out } => {
                let mut crash_state =
                    crash::start(&mut stream, edge, self.config.crash_max, *auto_cash_out);
                // An auto cash-out settles against the committed point
                // immediately; there is nothing left to decide
                let initial = match auto_cash_out {
                    Some(at) => crash::cash_out(&mut crash_state, *at)?,
                    None => StepOutcome::active(),
                };
                (SessionState::Crash(crash_state), initial)
            }
            BetParams::Blackjack {} => {
                let blackjack_state = blackjack::start(&mut stream);
                let initial = blackjack::initial_step(&blackjack_state);
                (SessionState::Blackjack(blackjack_state), initial)
            }
            BetParams::HiLo {} => (
                SessionState::HiLo(hilo::start(&mut stream)),
                StepOutcome::active(),
            ),
            _ => {
                return Err(EngineError::validation(format!(
                    "{} is not a session game",
                    game
                )))
            }
        };

        let session = GameSession {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            seed_pair_id: reserved.seed_pair_id,
            server_seed_hash: reserved.server_seed_hash,
            client_seed: reserved.client_seed,
            nonce: reserved.nonce,
            stake,
            status: SessionStatus::Active,
            multiplier: 0.0,
            payout: 0,
            state,
            created_at: Utc::now(),
        };

        if initial.status.is_terminal() {
            // Naturals and auto cash-outs settle without ever storing the
            // session
            return self.settle_session(session, initial).await;
        }
        match self.sessions.try_insert(session.clone()) {
            Ok(()) => Ok(session.snapshot()),
            Err(err) => {
                // Lost a concurrent start race: return the stake; the
                // reserved nonce stays unused, which is harmless
                self.ledger
                    .credit(user_id, stake, "session start conflict refund")
                    .await;
                Err(err)
            }
        }
    }

    /// Apply a player action to the active session.
    pub async fn act(
        &self,
        user_id: &str,
        session_id: Uuid,
        action: SessionAction,
    ) -> EngineResult<SessionSnapshot> {
        let game = action.game_type();

        // Double-down re-debits the stake before the transition runs
        let double_stake = if action == SessionAction::Double {
            let stake = {
                let session = self
                    .sessions
                    .get_mut(user_id, game)
                    .ok_or(EngineError::SessionNotFound { game })?;
                if session.id != session_id {
                    return Err(EngineError::SessionMismatch { session_id });
                }
                session.stake
            };
            self.ledger.debit(user_id, stake).await?;
            Some(stake)
        } else {
            None
        };

        let applied = self.apply_to_session(user_id, session_id, game, |session, edges| {
            session.apply_action(&action, edges)
        });
        let (step, snapshot) = match applied {
            Ok(v) => v,
            Err(err) => {
                if let Some(stake) = double_stake {
                    // The transition never ran; hand the extra stake back
                    self.ledger
                        .credit(user_id, stake, "double-down refund")
                        .await;
                }
                return Err(err);
            }
        };

        match snapshot {
            Some(snapshot) => Ok(snapshot),
            None => self.finish_session(user_id, game, step).await,
        }
    }

    /// Cash out an active session. `at_multiplier` carries the multiplier
    /// a crash player cashes out at; the server compares it against the
    /// pre-committed crash point, never against the client's animation.
    pub async fn cash_out(
        &self,
        user_id: &str,
        session_id: Uuid,
        at_multiplier: Option<f64>,
    ) -> EngineResult<SessionSnapshot> {
        let game = self
            .sessions
            .find_game_by_id(user_id, session_id)
            .ok_or(EngineError::SessionMismatch { session_id })?;
        let (step, _) = self.apply_to_session(user_id, session_id, game, |session, edges| {
            session.apply_cash_out(at_multiplier, edges)
        })?;
        self.finish_session(user_id, game, step).await
    }

    /// Authoritative snapshot of the user's active session, for clients
    /// resuming after a reconnect. Consumes no randomness and no nonce.
    pub fn session(&self, user_id: &str, game: GameType) -> EngineResult<SessionSnapshot> {
        let session = self
            .sessions
            .get_mut(user_id, game)
            .ok_or(EngineError::SessionNotFound { game })?;
        Ok(session.snapshot())
    }

    /// Run a transition under the session lock. Terminal steps mark the
    /// session so no concurrent action can apply before removal.
    fn apply_to_session<F>(
        &self,
        user_id: &str,
        session_id: Uuid,
        game: GameType,
        transition: F,
    ) -> EngineResult<(StepOutcome, Option<SessionSnapshot>)>
    where
        F: FnOnce(&mut GameSession, &crate::config::HouseEdges) -> EngineResult<StepOutcome>,
    {
        let mut session = self
            .sessions
            .get_mut(user_id, game)
            .ok_or(EngineError::SessionNotFound { game })?;
        if session.id != session_id {
            return Err(EngineError::SessionMismatch { session_id });
        }
        let step = transition(&mut session, &self.config.edges)?;
        if step.status.is_terminal() {
            session.status = step.status;
            Ok((step, None))
        } else {
            Ok((step, Some(session.snapshot())))
        }
    }

    /// Remove a session marked terminal and settle it.
    async fn finish_session(
        &self,
        user_id: &str,
        game: GameType,
        step: StepOutcome,
    ) -> EngineResult<SessionSnapshot> {
        let session = self.sessions.remove(user_id, game).ok_or_else(|| {
            EngineError::integrity("active session vanished during settlement".to_string())
        })?;
        self.settle_session(session, step).await
    }

    /// Credit the payout and archive the session as an immutable round.
    async fn settle_session(
        &self,
        mut session: GameSession,
        step: StepOutcome,
    ) -> EngineResult<SessionSnapshot> {
        session.status = step.status;
        session.multiplier = step.multiplier;
        session.payout = payout_amount(session.effective_stake(), step.multiplier);
        if session.payout > 0 {
            self.ledger
                .credit(
                    &session.user_id,
                    session.payout,
                    &format!("{} payout", session.game_type()),
                )
                .await;
        }
        let (params, outcome) = session_round_record(&session.state);
        self.rounds.append(Round {
            round_id: session.id,
            user_id: session.user_id.clone(),
            seed_pair_id: session.seed_pair_id,
            server_seed_hash: session.server_seed_hash.clone(),
            client_seed: session.client_seed.clone(),
            nonce: session.nonce,
            game: session.game_type(),
            stake: session.effective_stake(),
            params,
            outcome,
            multiplier: session.multiplier,
            payout: session.payout,
            completed_at: Utc::now(),
        })?;
        tracing::info!(
            user_id = %session.user_id,
            game = %session.game_type(),
            status = ?session.status,
            payout = session.payout,
            "session settled"
        );
        Ok(session.snapshot())
    }

    // ------------------------------------------------------------------
    // Audit and gateway surface
    // ------------------------------------------------------------------

    /// Recent rounds for a user, newest first.
    pub fn rounds(&self, user_id: &str, limit: usize) -> Vec<Round> {
        self.rounds.recent(user_id, limit)
    }

    /// Pure recomputation from disclosed values; see [`crate::verify`].
    pub fn verify(&self, request: &VerifyRequest) -> EngineResult<VerifyResult> {
        verify::verify(request, &self.config)
    }

    pub async fn balance(&self, user_id: &str) -> u64 {
        self.ledger.balance(user_id).await
    }

    pub async fn deposit(&self, user_id: &str, amount: u64) -> u64 {
        self.ledger.credit(user_id, amount, "deposit").await;
        self.ledger.balance(user_id).await
    }

    fn check_stake(&self, stake: u64) -> EngineResult<()> {
        if stake < self.config.min_stake || stake > self.config.max_stake {
            return Err(EngineError::validation(format!(
                "stake must be within {}-{}",
                self.config.min_stake, self.config.max_stake
            )));
        }
        Ok(())
    }
}

/// Params/outcome pair archived when a session settles: the committed full
/// outcome, not just the revealed portion.
fn session_round_record(state: &SessionState) -> (BetParams, Outcome) {
    match state {
        SessionState::Mines(s) => (
            BetParams::Mines {
                mines: s.mine_count,
            },
            Outcome::Mines {
                mine_cells: s.mines.clone(),
            },
        ),
        SessionState::Crash(s) => (
            BetParams::Crash {
                auto_cash_out: s.auto_cash_out,
            },
            Outcome::Crash {
                crash_point: s.crash_point,
            },
        ),
        SessionState::Blackjack(s) => (
            BetParams::Blackjack {},
            Outcome::Blackjack {
                deck: s.deck.clone(),
            },
        ),
        SessionState::HiLo(s) => (
            BetParams::HiLo {},
            Outcome::HiLo {
                deck: s.deck.clone(),
            },
        ),
    }
}
