//! Error taxonomy for bet validation, settlement, and storage.
//!
//! Every failure is typed so the request layer can map it to a user
//! message: validation and insufficient funds are the caller's
//! business, conflicts are transient, storage faults are fatal. None
//! of them leave partial state behind.

use crate::money::Amount;
use thiserror::Error;

pub type CasinoResult<T> = Result<T, CasinoError>;

/// Top-level failures surfaced to the request layer.
#[derive(Debug, Error)]
pub enum CasinoError {
    /// Malformed bet; nothing was read or written.
    #[error("invalid bet: {0}")]
    Validation(#[from] ValidationError),

    /// Expected business outcome, not a fault. No side effects.
    #[error("insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: Amount, required: Amount },

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("account already exists: {0}")]
    AccountExists(String),

    #[error("account is closed: {0}")]
    AccountClosed(String),

    /// Concurrent settlements kept winning the commit race; the retry
    /// budget ran out. Transient from the caller's point of view.
    #[error("settlement conflicted after {attempts} attempts")]
    PersistenceConflict { attempts: u32 },

    /// The store refused the commit outright. Fail closed: no
    /// mutation happened.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A settlement would have violated ledger arithmetic. Indicates a
    /// bug in outcome computation, never reachable through validation.
    #[error("ledger invariant violated: {0}")]
    InvariantViolation(String),
}

/// Bet-shape failures raised before any balance is read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("stake must be greater than zero")]
    NonPositiveStake,

    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("at least one bet must be placed")]
    NoLegs,

    #[error("unknown bet key: {0}")]
    UnknownBetKey(String),

    #[error("number {0} is outside the wheel range 0-36")]
    NumberOutOfRange(u8),

    #[error("combination bets cover 2 to 6 numbers, got {0}")]
    BadCombinationSize(usize),

    #[error("combination bet repeats number {0}")]
    DuplicateNumber(u8),

    #[error("dice sum target must be between 2 and 12, got {0}")]
    BadSumTarget(u8),

    #[error("card index {0} is outside the dealt hand")]
    BadKeepIndex(usize),

    #[error("duplicate card index {0} in keep list")]
    DuplicateKeepIndex(usize),

    #[error("wager {wager} is below the table minimum {min}")]
    BelowTableMinimum { wager: Amount, min: Amount },

    #[error("wager {wager} exceeds the table maximum {max}")]
    AboveTableMaximum { wager: Amount, max: Amount },
}

/// Failures reported by a [`crate::store::LedgerStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account not found: {0}")]
    NotFound(String),

    #[error("account already exists: {0}")]
    AlreadyExists(String),

    #[error("account is closed: {0}")]
    Closed(String),

    /// The account changed between snapshot and commit.
    #[error("version conflict: expected {expected}, found {found}")]
    Conflict { expected: u64, found: u64 },

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("corrupted record: {0}")]
    Corrupted(String),
}

#[cfg(feature = "rocks")]
impl From<rocksdb::Error> for StoreError {
    fn from(e: rocksdb::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(String),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
