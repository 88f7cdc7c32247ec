//! Durable stores for accounts, movements, and game history.
//!
//! The ledger depends on [`LedgerStore::apply_atomic`] providing true
//! all-or-nothing semantics: the balance write, the movement rows, and
//! the history row of one settlement either all persist or none do.
//! Isolation is optimistic: every account carries a version, and a
//! commit against a stale version is rejected as a conflict for the
//! ledger to retry.

pub mod memory;
#[cfg(feature = "rocks")]
pub mod rocks;

use crate::errors::StoreError;
use crate::games::{GameData, GameType, RoundResult};
use crate::money::Amount;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's spendable balance. Written only through the settlement
/// path; never deleted, at most deactivated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub owner_id: String,
    pub balance: Amount,
    /// Optimistic-concurrency token, bumped on every committed write.
    pub version: u64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(owner_id: impl Into<String>, opening_balance: Amount) -> Self {
        Account {
            owner_id: owner_id.into(),
            balance: opening_balance,
            version: 1,
            active: true,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Bet,
    Win,
    Deposit,
    Withdrawal,
}

/// An immutable record of one balance change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    pub id: Uuid,
    pub owner_id: String,
    pub kind: MovementKind,
    /// Signed: negative debits, positive credits.
    pub amount: Amount,
    pub balance_before: Amount,
    pub balance_after: Amount,
    pub game: Option<GameType>,
    /// Shared by every leg of the same round.
    pub round_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Denormalized record of one played round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// The round id; also referenced by the round's movements.
    pub id: Uuid,
    pub owner_id: String,
    pub game: GameType,
    pub bet_amount: Amount,
    pub win_amount: Amount,
    pub result: RoundResult,
    pub balance_before: Amount,
    pub balance_after: Amount,
    pub data: GameData,
    pub created_at: DateTime<Utc>,
}

/// One settlement's worth of writes, committed all-or-nothing.
#[derive(Debug, Clone)]
pub struct AtomicApply {
    pub owner_id: String,
    /// Version the balance was read at; the commit is rejected if the
    /// account has moved on.
    pub expected_version: u64,
    pub new_balance: Amount,
    pub movements: Vec<Movement>,
    pub history: Option<HistoryRecord>,
}

/// Storage interface the ledger settles against.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Register a new account. Fails if the owner already has one.
    async fn create_account(&self, account: Account) -> Result<(), StoreError>;

    /// Snapshot read of balance and version. Not a lock; callers that
    /// intend to write must go through [`LedgerStore::apply_atomic`].
    async fn account(&self, owner_id: &str) -> Result<Account, StoreError>;

    /// Commit one settlement atomically, returning the new balance.
    async fn apply_atomic(&self, apply: AtomicApply) -> Result<Amount, StoreError>;

    /// Movements for an account, newest first.
    async fn movements(&self, owner_id: &str, limit: usize) -> Result<Vec<Movement>, StoreError>;

    /// Played rounds for an account, newest first, optionally filtered
    /// by game.
    async fn history(
        &self,
        owner_id: &str,
        game: Option<GameType>,
        limit: usize,
    ) -> Result<Vec<HistoryRecord>, StoreError>;

    /// Soft-deactivate an account. Its records remain queryable.
    async fn deactivate(&self, owner_id: &str) -> Result<(), StoreError>;
}
