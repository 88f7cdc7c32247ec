//! In-memory store over concurrent maps.
//!
//! The reference implementation for tests and single-process
//! deployments. The exclusive entry lock taken by `apply_atomic`
//! makes each commit a single critical section; the version check on
//! top of it keeps the optimistic contract observable.

use crate::errors::StoreError;
use crate::games::GameType;
use crate::money::Amount;
use crate::store::{Account, AtomicApply, HistoryRecord, LedgerStore, Movement};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Default)]
pub struct MemoryStore {
    accounts: DashMap<String, Account>,
    movements: DashMap<String, Vec<Movement>>,
    history: DashMap<String, Vec<HistoryRecord>>,
    commit_faults: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` commits fail before touching any state, as
    /// if the backing store went away mid-settlement. Test support for
    /// the all-or-nothing contract.
    pub fn fail_next_commits(&self, n: u32) {
        self.commit_faults.store(n, Ordering::SeqCst);
    }

    fn take_fault(&self) -> bool {
        self.commit_faults
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn create_account(&self, account: Account) -> Result<(), StoreError> {
        if self.accounts.contains_key(&account.owner_id) {
            return Err(StoreError::AlreadyExists(account.owner_id));
        }
        let owner_id = account.owner_id.clone();
        self.accounts.insert(owner_id.clone(), account);
        self.movements.entry(owner_id.clone()).or_default();
        self.history.entry(owner_id).or_default();
        Ok(())
    }

    async fn account(&self, owner_id: &str) -> Result<Account, StoreError> {
        self.accounts
            .get(owner_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(owner_id.to_string()))
    }

    async fn apply_atomic(&self, apply: AtomicApply) -> Result<Amount, StoreError> {
        if self.take_fault() {
            return Err(StoreError::Unavailable(
                "injected commit fault".to_string(),
            ));
        }

        let mut entry = self
            .accounts
            .get_mut(&apply.owner_id)
            .ok_or_else(|| StoreError::NotFound(apply.owner_id.clone()))?;
        if !entry.active {
            return Err(StoreError::Closed(apply.owner_id));
        }
        if entry.version != apply.expected_version {
            return Err(StoreError::Conflict {
                expected: apply.expected_version,
                found: entry.version,
            });
        }

        entry.balance = apply.new_balance;
        entry.version += 1;

        // the exclusive account entry is still held, so the appends
        // below are invisible to other settlements of this account
        self.movements
            .entry(apply.owner_id.clone())
            .or_default()
            .extend(apply.movements);
        if let Some(record) = apply.history {
            self.history
                .entry(apply.owner_id)
                .or_default()
                .push(record);
        }

        Ok(entry.balance)
    }

    async fn movements(&self, owner_id: &str, limit: usize) -> Result<Vec<Movement>, StoreError> {
        if !self.accounts.contains_key(owner_id) {
            return Err(StoreError::NotFound(owner_id.to_string()));
        }
        let rows = self
            .movements
            .get(owner_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        Ok(rows.into_iter().rev().take(limit).collect())
    }

    async fn history(
        &self,
        owner_id: &str,
        game: Option<GameType>,
        limit: usize,
    ) -> Result<Vec<HistoryRecord>, StoreError> {
        if !self.accounts.contains_key(owner_id) {
            return Err(StoreError::NotFound(owner_id.to_string()));
        }
        let rows = self
            .history
            .get(owner_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        Ok(rows
            .into_iter()
            .rev()
            .filter(|record| game.map_or(true, |g| record.game == g))
            .take(limit)
            .collect())
    }

    async fn deactivate(&self, owner_id: &str) -> Result<(), StoreError> {
        let mut entry = self
            .accounts
            .get_mut(owner_id)
            .ok_or_else(|| StoreError::NotFound(owner_id.to_string()))?;
        entry.active = false;
        entry.version += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{slots, GameData, RoundResult};
    use crate::store::MovementKind;
    use chrono::Utc;
    use uuid::Uuid;

    fn movement(owner: &str, amount: i64, before: i64, after: i64) -> Movement {
        Movement {
            id: Uuid::new_v4(),
            owner_id: owner.to_string(),
            kind: if amount < 0 {
                MovementKind::Bet
            } else {
                MovementKind::Win
            },
            amount: Amount::from_int(amount),
            balance_before: Amount::from_int(before),
            balance_after: Amount::from_int(after),
            game: Some(GameType::Slots),
            round_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_account_rejects_duplicates() {
        let store = MemoryStore::new();
        let account = Account::new("alice", Amount::from_int(100));
        store.create_account(account.clone()).await.unwrap();
        assert!(matches!(
            store.create_account(account).await,
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_apply_rejects_stale_version() {
        let store = MemoryStore::new();
        store
            .create_account(Account::new("bob", Amount::from_int(100)))
            .await
            .unwrap();

        let apply = AtomicApply {
            owner_id: "bob".to_string(),
            expected_version: 99,
            new_balance: Amount::from_int(90),
            movements: vec![],
            history: None,
        };
        assert!(matches!(
            store.apply_atomic(apply).await,
            Err(StoreError::Conflict { .. })
        ));
        // balance untouched
        assert_eq!(
            store.account("bob").await.unwrap().balance,
            Amount::from_int(100)
        );
    }

    #[tokio::test]
    async fn test_commit_fault_leaves_no_trace() {
        let store = MemoryStore::new();
        store
            .create_account(Account::new("carol", Amount::from_int(100)))
            .await
            .unwrap();
        store.fail_next_commits(1);

        let apply = AtomicApply {
            owner_id: "carol".to_string(),
            expected_version: 1,
            new_balance: Amount::from_int(90),
            movements: vec![movement("carol", -10, 100, 90)],
            history: None,
        };
        assert!(matches!(
            store.apply_atomic(apply.clone()).await,
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(
            store.account("carol").await.unwrap().balance,
            Amount::from_int(100)
        );
        assert!(store.movements("carol", 10).await.unwrap().is_empty());

        // the fault was consumed; the retry lands
        store.apply_atomic(apply).await.unwrap();
        assert_eq!(
            store.account("carol").await.unwrap().balance,
            Amount::from_int(90)
        );
        assert_eq!(store.movements("carol", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_history_filter_and_order() {
        let store = MemoryStore::new();
        store
            .create_account(Account::new("dave", Amount::from_int(100)))
            .await
            .unwrap();

        for (i, game) in [GameType::Slots, GameType::Dice, GameType::Slots]
            .into_iter()
            .enumerate()
        {
            let record = HistoryRecord {
                id: Uuid::new_v4(),
                owner_id: "dave".to_string(),
                game,
                bet_amount: Amount::from_int(i as i64 + 1),
                win_amount: Amount::ZERO,
                result: RoundResult::Loss,
                balance_before: Amount::from_int(100),
                balance_after: Amount::from_int(90),
                data: GameData::Slots {
                    reels: [slots::Symbol::Cherry, slots::Symbol::Lemon, slots::Symbol::Star],
                    combo: slots::Combo::Miss,
                },
                created_at: Utc::now(),
            };
            let apply = AtomicApply {
                owner_id: "dave".to_string(),
                expected_version: 1 + i as u64,
                new_balance: Amount::from_int(100),
                movements: vec![],
                history: Some(record),
            };
            store.apply_atomic(apply).await.unwrap();
        }

        let all = store.history("dave", None, 10).await.unwrap();
        assert_eq!(all.len(), 3);
        // newest first
        assert_eq!(all[0].bet_amount, Amount::from_int(3));

        let slots_only = store
            .history("dave", Some(GameType::Slots), 10)
            .await
            .unwrap();
        assert_eq!(slots_only.len(), 2);
    }

    #[tokio::test]
    async fn test_deactivated_account_refuses_commits() {
        let store = seeded_store_async("erin", 100).await;
        store.deactivate("erin").await.unwrap();
        let version = store.account("erin").await.unwrap().version;
        let apply = AtomicApply {
            owner_id: "erin".to_string(),
            expected_version: version,
            new_balance: Amount::from_int(90),
            movements: vec![],
            history: None,
        };
        assert!(matches!(
            store.apply_atomic(apply).await,
            Err(StoreError::Closed(_))
        ));
    }

    async fn seeded_store_async(owner: &str, balance: i64) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_account(Account::new(owner, Amount::from_int(balance)))
            .await
            .unwrap();
        store
    }
}
