//! Croupier - ledger-consistent casino bet settlement.
//!
//! Outcome generation for five table games, bet validation, and an
//! atomic settlement core that keeps account balances, movement
//! records, and game history mutually consistent under concurrent
//! play. Two concurrent bets against the same account can never both
//! read the same balance and commit; the commit path is optimistic
//! with bounded retries and every settlement is all-or-nothing.
//!
//! The crate is a library invoked by an already-authenticated request
//! layer. HTTP routing, authentication, and rendering live elsewhere;
//! the ledger trusts the owner id it is handed.

pub mod casino;
pub mod config;
pub mod errors;
pub mod games;
pub mod ledger;
pub mod money;
pub mod stats;
pub mod store;

pub use casino::{Casino, RoundReceipt};
pub use config::{CasinoConfig, ConfigLoader};
pub use errors::{CasinoError, CasinoResult, StoreError, ValidationError};
pub use games::{BetRequest, GameData, GameType, Outcome, RoundResult};
pub use ledger::{Adjustment, LedgerCore, Settlement};
pub use money::Amount;
pub use stats::PlayerStats;
pub use store::memory::MemoryStore;
#[cfg(feature = "rocks")]
pub use store::rocks::RocksStore;
pub use store::{Account, HistoryRecord, LedgerStore, Movement, MovementKind};
