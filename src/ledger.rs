//! The settlement path: every balance change flows through here.
//!
//! A settlement reads a balance snapshot, checks funds, computes the
//! new balance, and hands the store one atomic commit carrying the
//! balance write, the movement legs, and the history record. A version
//! conflict means another settlement for the same account won the
//! race; the loop re-reads and retries up to a bounded attempt count.
//! Accounts never contend with each other.

use crate::errors::{CasinoError, CasinoResult, StoreError, ValidationError};
use crate::games::{GameType, Outcome};
use crate::money::Amount;
use crate::store::{AtomicApply, HistoryRecord, LedgerStore, Movement, MovementKind};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Result of a settled round.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub round_id: Uuid,
    pub net_change: Amount,
    pub new_balance: Amount,
    pub movement_ids: Vec<Uuid>,
}

/// Result of a deposit or withdrawal.
#[derive(Debug, Clone)]
pub struct Adjustment {
    pub movement_id: Uuid,
    pub new_balance: Amount,
}

pub struct LedgerCore {
    store: Arc<dyn LedgerStore>,
    max_commit_attempts: u32,
}

impl LedgerCore {
    pub fn new(store: Arc<dyn LedgerStore>, max_commit_attempts: u32) -> Self {
        Self {
            store,
            max_commit_attempts,
        }
    }

    /// Atomically apply a resolved round to an account.
    ///
    /// On success the balance moved by `win_amount - wager_total` and
    /// the round is fully recorded; on any failure nothing changed.
    pub async fn settle(
        &self,
        owner_id: &str,
        wager_total: Amount,
        game: GameType,
        outcome: &Outcome,
    ) -> CasinoResult<Settlement> {
        let round_id = Uuid::new_v4();
        let net = outcome.win_amount - wager_total;

        for attempt in 1..=self.max_commit_attempts {
            let account = self.store.account(owner_id).await.map_err(store_error)?;
            if !account.active {
                return Err(CasinoError::AccountClosed(owner_id.to_string()));
            }

            let balance = account.balance;
            if balance < wager_total {
                return Err(CasinoError::InsufficientFunds {
                    balance,
                    required: wager_total,
                });
            }

            let new_balance = balance + net;
            if new_balance.is_negative() {
                // cannot happen while the outcome formulas hold: the
                // worst case loses exactly the wager checked above
                return Err(CasinoError::InvariantViolation(format!(
                    "settlement of {} against balance {} would leave {}",
                    net, balance, new_balance
                )));
            }

            let now = Utc::now();
            let after_bet = balance - wager_total;
            let mut movements = vec![Movement {
                id: Uuid::new_v4(),
                owner_id: owner_id.to_string(),
                kind: MovementKind::Bet,
                amount: -wager_total,
                balance_before: balance,
                balance_after: after_bet,
                game: Some(game),
                round_id: Some(round_id),
                created_at: now,
            }];
            if outcome.win_amount.is_positive() {
                movements.push(Movement {
                    id: Uuid::new_v4(),
                    owner_id: owner_id.to_string(),
                    kind: MovementKind::Win,
                    amount: outcome.win_amount,
                    balance_before: after_bet,
                    balance_after: new_balance,
                    game: Some(game),
                    round_id: Some(round_id),
                    created_at: now,
                });
            }
            let movement_ids: Vec<Uuid> = movements.iter().map(|m| m.id).collect();

            let history = HistoryRecord {
                id: round_id,
                owner_id: owner_id.to_string(),
                game,
                bet_amount: wager_total,
                win_amount: outcome.win_amount,
                result: outcome.result,
                balance_before: balance,
                balance_after: new_balance,
                data: outcome.data.clone(),
                created_at: now,
            };

            let apply = AtomicApply {
                owner_id: owner_id.to_string(),
                expected_version: account.version,
                new_balance,
                movements,
                history: Some(history),
            };

            match self.store.apply_atomic(apply).await {
                Ok(committed) => {
                    tracing::debug!(
                        owner_id,
                        %game,
                        round_id = %round_id,
                        net = %net,
                        balance = %committed,
                        "settled round"
                    );
                    return Ok(Settlement {
                        round_id,
                        net_change: net,
                        new_balance: committed,
                        movement_ids,
                    });
                }
                Err(StoreError::Conflict { expected, found }) => {
                    tracing::debug!(
                        owner_id,
                        attempt,
                        expected,
                        found,
                        "concurrent settlement won the commit race, retrying"
                    );
                }
                Err(e) => return Err(store_error(e)),
            }
        }

        Err(CasinoError::PersistenceConflict {
            attempts: self.max_commit_attempts,
        })
    }

    /// Credit an account outside of play.
    pub async fn deposit(&self, owner_id: &str, amount: Amount) -> CasinoResult<Adjustment> {
        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount.into());
        }
        self.adjust(owner_id, amount, MovementKind::Deposit).await
    }

    /// Debit an account outside of play; refuses to overdraw.
    pub async fn withdraw(&self, owner_id: &str, amount: Amount) -> CasinoResult<Adjustment> {
        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount.into());
        }
        self.adjust(owner_id, -amount, MovementKind::Withdrawal).await
    }

    async fn adjust(
        &self,
        owner_id: &str,
        delta: Amount,
        kind: MovementKind,
    ) -> CasinoResult<Adjustment> {
        for attempt in 1..=self.max_commit_attempts {
            let account = self.store.account(owner_id).await.map_err(store_error)?;
            if !account.active {
                return Err(CasinoError::AccountClosed(owner_id.to_string()));
            }

            let balance = account.balance;
            let new_balance = balance + delta;
            if new_balance.is_negative() {
                return Err(CasinoError::InsufficientFunds {
                    balance,
                    required: -delta,
                });
            }

            let movement = Movement {
                id: Uuid::new_v4(),
                owner_id: owner_id.to_string(),
                kind,
                amount: delta,
                balance_before: balance,
                balance_after: new_balance,
                game: None,
                round_id: None,
                created_at: Utc::now(),
            };
            let movement_id = movement.id;

            let apply = AtomicApply {
                owner_id: owner_id.to_string(),
                expected_version: account.version,
                new_balance,
                movements: vec![movement],
                history: None,
            };

            match self.store.apply_atomic(apply).await {
                Ok(committed) => {
                    tracing::debug!(owner_id, kind = ?kind, delta = %delta, balance = %committed, "applied adjustment");
                    return Ok(Adjustment {
                        movement_id,
                        new_balance: committed,
                    });
                }
                Err(StoreError::Conflict { .. }) => {
                    tracing::debug!(owner_id, attempt, "adjustment conflicted, retrying");
                }
                Err(e) => return Err(store_error(e)),
            }
        }

        Err(CasinoError::PersistenceConflict {
            attempts: self.max_commit_attempts,
        })
    }
}

/// Map store failures onto the caller-facing taxonomy. Conflicts are
/// handled inside the retry loop and never reach this point.
pub(crate) fn store_error(e: StoreError) -> CasinoError {
    match e {
        StoreError::NotFound(owner) => CasinoError::AccountNotFound(owner),
        StoreError::AlreadyExists(owner) => CasinoError::AccountExists(owner),
        StoreError::Closed(owner) => CasinoError::AccountClosed(owner),
        StoreError::Conflict { .. } => CasinoError::PersistenceConflict { attempts: 0 },
        StoreError::Unavailable(msg) => CasinoError::StorageUnavailable(msg),
        StoreError::Corrupted(msg) => CasinoError::StorageUnavailable(msg),
    }
}
