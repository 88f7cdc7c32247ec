//! RocksDB-backed store: one write batch per settlement.
//!
//! Commits for the same account are serialized through a per-account
//! guard; the version check under the guard keeps the optimistic
//! contract intact if another writer reaches the database directly.
//! All rows of one settlement land in a single `WriteBatch`.

use crate::errors::StoreError;
use crate::games::GameType;
use crate::money::Amount;
use crate::store::{Account, AtomicApply, HistoryRecord, LedgerStore, Movement};
use async_trait::async_trait;
use dashmap::DashMap;
use rocksdb::{DBCompressionType, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

fn account_key(owner_id: &str) -> Vec<u8> {
    format!("account:{}", owner_id).into_bytes()
}

fn movement_prefix(owner_id: &str) -> Vec<u8> {
    format!("movement:{}:", owner_id).into_bytes()
}

fn history_prefix(owner_id: &str) -> Vec<u8> {
    format!("history:{}:", owner_id).into_bytes()
}

/// Rows sort newest-first under their prefix: the committed account
/// version (unique per commit) is inverted, and the in-commit index
/// inverted again so the later leg of a round scans first.
fn movement_key(owner_id: &str, version: u64, index: u8, id: Uuid) -> Vec<u8> {
    let mut key = movement_prefix(owner_id);
    key.extend_from_slice(&(u64::MAX - version).to_be_bytes());
    key.push(u8::MAX - index);
    key.extend_from_slice(id.as_bytes());
    key
}

fn history_key(owner_id: &str, version: u64, id: Uuid) -> Vec<u8> {
    let mut key = history_prefix(owner_id);
    key.extend_from_slice(&(u64::MAX - version).to_be_bytes());
    key.extend_from_slice(id.as_bytes());
    key
}

pub struct RocksStore {
    db: Arc<DB>,
    commit_guards: DashMap<String, Arc<Mutex<()>>>,
}

impl RocksStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(DBCompressionType::Lz4);

        let db = DB::open(&opts, path)?;
        Ok(Self {
            db: Arc::new(db),
            commit_guards: DashMap::new(),
        })
    }

    fn guard(&self, owner_id: &str) -> Arc<Mutex<()>> {
        self.commit_guards
            .entry(owner_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn load_account(&self, owner_id: &str) -> Result<Account, StoreError> {
        let bytes = self
            .db
            .get(account_key(owner_id))?
            .ok_or_else(|| StoreError::NotFound(owner_id.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::Corrupted(format!("account record for {}: {}", owner_id, e))
        })
    }

    fn put_account(&self, batch: &mut WriteBatch, account: &Account) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(account).map_err(|e| {
            StoreError::Corrupted(format!("account record for {}: {}", account.owner_id, e))
        })?;
        batch.put(account_key(&account.owner_id), bytes);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8], limit: usize) -> Vec<Vec<u8>> {
        let mut rows = Vec::new();
        let iter = self
            .db
            .iterator(IteratorMode::From(prefix, rocksdb::Direction::Forward));
        for item in iter {
            let Ok((key, value)) = item else { break };
            if !key.starts_with(prefix) {
                break;
            }
            rows.push(value.to_vec());
            if rows.len() >= limit {
                break;
            }
        }
        rows
    }
}

#[async_trait]
impl LedgerStore for RocksStore {
    async fn create_account(&self, account: Account) -> Result<(), StoreError> {
        let guard = self.guard(&account.owner_id);
        let _held = guard.lock().await;

        if self.db.get(account_key(&account.owner_id))?.is_some() {
            return Err(StoreError::AlreadyExists(account.owner_id));
        }
        let mut batch = WriteBatch::default();
        self.put_account(&mut batch, &account)?;
        self.db.write(batch)?;
        Ok(())
    }

    async fn account(&self, owner_id: &str) -> Result<Account, StoreError> {
        self.load_account(owner_id)
    }

    async fn apply_atomic(&self, apply: AtomicApply) -> Result<Amount, StoreError> {
        let guard = self.guard(&apply.owner_id);
        let _held = guard.lock().await;

        let account = self.load_account(&apply.owner_id)?;
        if !account.active {
            return Err(StoreError::Closed(apply.owner_id));
        }
        if account.version != apply.expected_version {
            return Err(StoreError::Conflict {
                expected: apply.expected_version,
                found: account.version,
            });
        }

        let updated = Account {
            balance: apply.new_balance,
            version: account.version + 1,
            ..account
        };

        let mut batch = WriteBatch::default();
        self.put_account(&mut batch, &updated)?;
        for (index, movement) in apply.movements.iter().enumerate() {
            let bytes = serde_json::to_vec(movement).map_err(|e| {
                StoreError::Corrupted(format!("movement {}: {}", movement.id, e))
            })?;
            batch.put(
                movement_key(
                    &apply.owner_id,
                    apply.expected_version,
                    index as u8,
                    movement.id,
                ),
                bytes,
            );
        }
        if let Some(record) = &apply.history {
            let bytes = serde_json::to_vec(record).map_err(|e| {
                StoreError::Corrupted(format!("history record {}: {}", record.id, e))
            })?;
            batch.put(
                history_key(&apply.owner_id, apply.expected_version, record.id),
                bytes,
            );
        }

        self.db.write(batch)?;
        Ok(updated.balance)
    }

    async fn movements(&self, owner_id: &str, limit: usize) -> Result<Vec<Movement>, StoreError> {
        // distinguishes an empty account from a missing one
        self.load_account(owner_id)?;
        self.scan_prefix(&movement_prefix(owner_id), limit)
            .iter()
            .map(|bytes| {
                serde_json::from_slice(bytes)
                    .map_err(|e| StoreError::Corrupted(format!("movement record: {}", e)))
            })
            .collect()
    }

    async fn history(
        &self,
        owner_id: &str,
        game: Option<GameType>,
        limit: usize,
    ) -> Result<Vec<HistoryRecord>, StoreError> {
        self.load_account(owner_id)?;
        // over-scan when filtering, since the filter drops rows
        let scan_limit = if game.is_some() { usize::MAX } else { limit };
        let rows = self
            .scan_prefix(&history_prefix(owner_id), scan_limit)
            .iter()
            .map(|bytes| {
                serde_json::from_slice::<HistoryRecord>(bytes)
                    .map_err(|e| StoreError::Corrupted(format!("history record: {}", e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows
            .into_iter()
            .filter(|record| game.map_or(true, |g| record.game == g))
            .take(limit)
            .collect())
    }

    async fn deactivate(&self, owner_id: &str) -> Result<(), StoreError> {
        let guard = self.guard(owner_id);
        let _held = guard.lock().await;

        let mut account = self.load_account(owner_id)?;
        account.active = false;
        account.version += 1;
        let mut batch = WriteBatch::default();
        self.put_account(&mut batch, &account)?;
        self.db.write(batch)?;
        Ok(())
    }
}
