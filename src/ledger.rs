//! Balance ledger gateway.
//!
//! The engine treats the ledger as an external collaborator: stake debits
//! happen before any nonce is reserved or randomness drawn, payouts are
//! credited after settlement. The in-memory implementation backs tests and
//! single-node deployments.

use async_trait::async_trait;
use dashmap::DashMap;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: u64, required: u64 },
}

impl From<LedgerError> for crate::errors::EngineError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds { balance, required } => {
                crate::errors::EngineError::InsufficientFunds { balance, required }
            }
        }
    }
}

/// Debit/credit interface the engine settles against
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn balance(&self, user_id: &str) -> u64;

    /// Withdraw a stake. Fails without side effects when the balance is
    /// short.
    async fn debit(&self, user_id: &str, amount: u64) -> Result<(), LedgerError>;

    /// Deposit a payout or refund. The reason is recorded for audit logs.
    async fn credit(&self, user_id: &str, amount: u64, reason: &str);
}

/// DashMap-backed ledger handing each new user an opening balance
pub struct InMemoryLedger {
    balances: DashMap<String, u64>,
    starting_balance: u64,
}

impl InMemoryLedger {
    pub fn new(starting_balance: u64) -> Self {
        Self {
            balances: DashMap::new(),
            starting_balance,
        }
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn balance(&self, user_id: &str) -> u64 {
        *self
            .balances
            .entry(user_id.to_string())
            .or_insert(self.starting_balance)
    }

    async fn debit(&self, user_id: &str, amount: u64) -> Result<(), LedgerError> {
        let mut balance = self
            .balances
            .entry(user_id.to_string())
            .or_insert(self.starting_balance);
        if *balance < amount {
            return Err(LedgerError::InsufficientFunds {
                balance: *balance,
                required: amount,
            });
        }
        *balance -= amount;
        Ok(())
    }

    async fn credit(&self, user_id: &str, amount: u64, reason: &str) {
        let mut balance = self
            .balances
            .entry(user_id.to_string())
            .or_insert(self.starting_balance);
        *balance += amount;
        tracing::debug!(user_id, amount, reason, "ledger credit");
    }
}
