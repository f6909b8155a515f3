//! Multi-round game sessions.
//!
//! A session's entire outcome (mine layout, shoe order, crash point) is
//! fixed at creation from a single derivation; player actions only reveal
//! pre-committed values. This is what makes mid-session cash-outs and
//! losses verifiable against a single commitment: re-deriving mid-session
//! never occurs.

pub mod blackjack;
pub mod crash;
pub mod hilo;
pub mod mines;

use crate::config::HouseEdges;
use crate::errors::{EngineError, EngineResult};
use crate::games::GameType;
use blackjack::BlackjackState;
use chrono::{DateTime, Utc};
use crash::CrashState;
use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use hilo::HiLoState;
use mines::MinesState;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session lifecycle states
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Won,
    Lost,
    CashedOut,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Active)
    }
}

/// Per-game session state (full outcome plus revealed progress)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionState {
    Mines(MinesState),
    Crash(CrashState),
    Blackjack(BlackjackState),
    HiLo(HiLoState),
}

impl SessionState {
    pub fn game_type(&self) -> GameType {
        match self {
            SessionState::Mines(_) => GameType::Mines,
            SessionState::Crash(_) => GameType::Crash,
            SessionState::Blackjack(_) => GameType::Blackjack,
            SessionState::HiLo(_) => GameType::HiLo,
        }
    }
}

/// Player action on an active session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionAction {
    /// Mines: uncover one cell
    Reveal { cell: u8 },
    /// Blackjack: draw a card
    Hit,
    /// Blackjack: stop drawing, dealer plays
    Stand,
    /// Blackjack: double the stake, draw one card, dealer plays
    Double,
    /// Hi-lo: next card is higher
    Higher,
    /// Hi-lo: next card is lower
    Lower,
}

impl SessionAction {
    /// The game type this action belongs to.
    pub fn game_type(&self) -> GameType {
        match self {
            SessionAction::Reveal { .. } => GameType::Mines,
            SessionAction::Hit | SessionAction::Stand | SessionAction::Double => {
                GameType::Blackjack
            }
            SessionAction::Higher | SessionAction::Lower => GameType::HiLo,
        }
    }
}

/// Result of a single state-machine step
#[derive(Debug, Clone, Copy)]
pub struct StepOutcome {
    pub status: SessionStatus,
    /// Multiplier applied to the effective stake when terminal
    pub multiplier: f64,
}

impl StepOutcome {
    pub fn active() -> Self {
        Self {
            status: SessionStatus::Active,
            multiplier: 0.0,
        }
    }

    pub fn terminal(status: SessionStatus, multiplier: f64) -> Self {
        Self { status, multiplier }
    }
}

/// One in-flight multi-round game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub id: Uuid,
    pub user_id: String,
    pub seed_pair_id: Uuid,
    pub server_seed_hash: String,
    pub client_seed: String,
    pub nonce: u64,
    pub stake: u64,
    pub status: SessionStatus,
    /// Settled multiplier; 0 while active
    pub multiplier: f64,
    /// Settled payout; 0 while active
    pub payout: u64,
    pub state: SessionState,
    pub created_at: DateTime<Utc>,
}

impl GameSession {
    pub fn game_type(&self) -> GameType {
        self.state.game_type()
    }

    /// Stake at risk, accounting for a blackjack double-down.
    pub fn effective_stake(&self) -> u64 {
        match &self.state {
            SessionState::Blackjack(bj) if bj.doubled => self.stake * 2,
            _ => self.stake,
        }
    }

    /// Apply a player action. Only valid while the session is active.
    pub fn apply_action(
        &mut self,
        action: &SessionAction,
        edges: &HouseEdges,
    ) -> EngineResult<StepOutcome> {
        if self.status.is_terminal() {
            return Err(EngineError::invalid_action(
                "session has already completed".to_string(),
            ));
        }
        let step = match (&mut self.state, action) {
            (SessionState::Mines(state), SessionAction::Reveal { cell }) => {
                mines::reveal(state, *cell, edges.mines)?
            }
            (SessionState::Blackjack(state), SessionAction::Hit) => blackjack::hit(state)?,
            (SessionState::Blackjack(state), SessionAction::Stand) => blackjack::stand(state)?,
            (SessionState::Blackjack(state), SessionAction::Double) => blackjack::double(state)?,
            (SessionState::HiLo(state), SessionAction::Higher) => {
                hilo::guess(state, true, edges.hilo)?
            }
            (SessionState::HiLo(state), SessionAction::Lower) => {
                hilo::guess(state, false, edges.hilo)?
            }
            (state, action) => {
                return Err(EngineError::invalid_action(format!(
                    "{:?} is not a valid action for a {} session",
                    action,
                    state.game_type()
                )))
            }
        };
        Ok(step)
    }

    /// Cash out the session. `at_multiplier` is required for crash, where
    /// the request is compared against the pre-committed crash point.
    pub fn apply_cash_out(
        &mut self,
        at_multiplier: Option<f64>,
        edges: &HouseEdges,
    ) -> EngineResult<StepOutcome> {
        if self.status.is_terminal() {
            return Err(EngineError::invalid_action(
                "session has already completed".to_string(),
            ));
        }
        match &mut self.state {
            SessionState::Mines(state) => mines::cash_out(state, edges.mines),
            SessionState::HiLo(state) => hilo::cash_out(state),
            SessionState::Crash(state) => {
                let at = at_multiplier.ok_or_else(|| {
                    EngineError::validation(
                        "crash cash-out requires the multiplier to cash out at".to_string(),
                    )
                })?;
                crash::cash_out(state, at)
            }
            SessionState::Blackjack(_) => Err(EngineError::invalid_action(
                "blackjack sessions settle through hit/stand/double".to_string(),
            )),
        }
    }

    /// Client-safe view of the session. Unrevealed portions of the
    /// committed outcome stay hidden until the session is terminal.
    pub fn snapshot(&self) -> SessionSnapshot {
        let terminal = self.status.is_terminal();
        let view = match &self.state {
            SessionState::Mines(state) => SessionView::Mines {
                mine_count: state.mine_count,
                revealed: state.revealed.clone(),
                mines: terminal.then(|| state.mines.clone()),
            },
            SessionState::Crash(state) => SessionView::Crash {
                auto_cash_out: state.auto_cash_out,
                cashed_out_at: state.cashed_out_at,
                crash_point: terminal.then_some(state.crash_point),
            },
            SessionState::Blackjack(state) => {
                let dealer_visible = if terminal {
                    state.dealer.clone()
                } else {
                    // Hole card stays hidden while the player acts
                    state.dealer.iter().copied().take(1).collect()
                };
                SessionView::Blackjack {
                    player: state.player.clone(),
                    player_value: blackjack::hand_value(&state.player),
                    dealer: dealer_visible,
                    dealer_value: terminal.then(|| blackjack::hand_value(&state.dealer)),
                    doubled: state.doubled,
                }
            }
            SessionState::HiLo(state) => SessionView::HiLo {
                current_card: state.current_card(),
                seen: state.seen().to_vec(),
                correct_guesses: state.correct_guesses,
                accumulator: state.accumulator,
            },
        };
        SessionSnapshot {
            session_id: self.id,
            game: self.game_type(),
            status: self.status,
            stake: self.effective_stake(),
            multiplier: self.multiplier,
            payout: self.payout,
            server_seed_hash: self.server_seed_hash.clone(),
            client_seed: self.client_seed.clone(),
            nonce: self.nonce,
            created_at: self.created_at,
            view,
        }
    }
}

/// Client-visible session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub game: GameType,
    pub status: SessionStatus,
    pub stake: u64,
    pub multiplier: f64,
    pub payout: u64,
    pub server_seed_hash: String,
    pub client_seed: String,
    pub nonce: u64,
    pub created_at: DateTime<Utc>,
    pub view: SessionView,
}

/// Per-game view with unrevealed values withheld until terminal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum SessionView {
    Mines {
        mine_count: u8,
        revealed: Vec<u8>,
        #[serde(skip_serializing_if = "Option::is_none")]
        mines: Option<Vec<u8>>,
    },
    Crash {
        #[serde(skip_serializing_if = "Option::is_none")]
        auto_cash_out: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cashed_out_at: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        crash_point: Option<f64>,
    },
    Blackjack {
        player: Vec<u8>,
        player_value: u8,
        dealer: Vec<u8>,
        #[serde(skip_serializing_if = "Option::is_none")]
        dealer_value: Option<u8>,
        doubled: bool,
    },
    HiLo {
        current_card: u8,
        seen: Vec<u8>,
        correct_guesses: u32,
        accumulator: f64,
    },
}

/// Thread-safe store enforcing one active session per user per game type
pub struct SessionStore {
    active: DashMap<(String, GameType), GameSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            active: DashMap::new(),
        }
    }

    /// Insert a new session; rejects if one is already active for the
    /// (user, game) slot.
    pub fn try_insert(&self, session: GameSession) -> EngineResult<()> {
        let key = (session.user_id.clone(), session.game_type());
        match self.active.entry(key) {
            Entry::Occupied(_) => Err(EngineError::SessionActive {
                game: session.game_type(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(session);
                Ok(())
            }
        }
    }

    pub fn contains(&self, user_id: &str, game: GameType) -> bool {
        self.active.contains_key(&(user_id.to_string(), game))
    }

    pub fn get_mut(
        &self,
        user_id: &str,
        game: GameType,
    ) -> Option<RefMut<'_, (String, GameType), GameSession>> {
        self.active.get_mut(&(user_id.to_string(), game))
    }

    pub fn remove(&self, user_id: &str, game: GameType) -> Option<GameSession> {
        self.active
            .remove(&(user_id.to_string(), game))
            .map(|(_, session)| session)
    }

    /// Find which game type a session id belongs to for this user.
    pub fn find_game_by_id(&self, user_id: &str, session_id: Uuid) -> Option<GameType> {
        self.active
            .iter()
            .find(|entry| entry.key().0 == user_id && entry.value().id == session_id)
            .map(|entry| entry.key().1)
    }

    /// Whether the user has any active session (blocks seed rotation).
    pub fn has_active_for_user(&self, user_id: &str) -> bool {
        self.active.iter().any(|entry| entry.key().0 == user_id)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::OutcomeStream;

    fn mines_session(user: &str) -> GameSession {
        let mut stream = OutcomeStream::new("secret", "client", 0);
        GameSession {
            id: Uuid::new_v4(),
            user_id: user.to_string(),
            seed_pair_id: Uuid::new_v4(),
            server_seed_hash: "hash".to_string(),
            client_seed: "client".to_string(),
            nonce: 0,
            stake: 100,
            status: SessionStatus::Active,
            multiplier: 0.0,
            payout: 0,
            state: SessionState::Mines(mines::start(&mut stream, 5)),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_single_active_session_per_game() {
        let store = SessionStore::new();
        store.try_insert(mines_session("alice")).unwrap();
        let err = store.try_insert(mines_session("alice")).unwrap_err();
        assert!(matches!(err, EngineError::SessionActive { .. }));
        // A different user is unaffected
        store.try_insert(mines_session("bob")).unwrap();
    }

    #[test]
    fn test_wrong_action_for_game_rejected() {
        let mut session = mines_session("alice");
        let err = session
            .apply_action(&SessionAction::Hit, &HouseEdges::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAction(_)));
    }

    #[test]
    fn test_active_snapshot_hides_mines() {
        let session = mines_session("alice");
        match session.snapshot().view {
            SessionView::Mines { mines, .. } => assert!(mines.is_none()),
            _ => panic!("wrong view"),
        }
    }

    #[test]
    fn test_find_by_id_scoped_to_user() {
        let store = SessionStore::new();
        let session = mines_session("alice");
        let id = session.id;
        store.try_insert(session).unwrap();
        assert_eq!(store.find_game_by_id("alice", id), Some(GameType::Mines));
        assert_eq!(store.find_game_by_id("bob", id), None);
    }
}
