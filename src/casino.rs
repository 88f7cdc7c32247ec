//! Facade tying bet validation, outcome generation, and settlement.
//!
//! One `Casino` replaces the per-game service sprawl: every game goes
//! through the same validate → resolve → settle pipeline, dispatched
//! by the bet's game type. The request layer hands in an authenticated
//! owner id and a structured bet; it gets back a receipt or a typed
//! failure to translate.

use crate::config::CasinoConfig;
use crate::errors::CasinoResult;
use crate::games::{BetRequest, GameData, GameType, Outcome, RoundResult};
use crate::ledger::{store_error, Adjustment, LedgerCore};
use crate::money::Amount;
use crate::stats::PlayerStats;
use crate::store::{Account, HistoryRecord, LedgerStore, Movement};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Everything the request layer needs to answer a play call.
#[derive(Debug, Clone, Serialize)]
pub struct RoundReceipt {
    pub round_id: Uuid,
    pub game: GameType,
    pub result: RoundResult,
    pub data: GameData,
    pub bet_amount: Amount,
    pub win_amount: Amount,
    pub net_change: Amount,
    pub new_balance: Amount,
    pub movement_ids: Vec<Uuid>,
}

pub struct Casino {
    ledger: LedgerCore,
    store: Arc<dyn LedgerStore>,
    config: CasinoConfig,
}

impl Casino {
    pub fn new(store: Arc<dyn LedgerStore>, config: CasinoConfig) -> Self {
        let ledger = LedgerCore::new(store.clone(), config.ledger.max_commit_attempts);
        Self {
            ledger,
            store,
            config,
        }
    }

    /// Open an account with the configured opening balance.
    pub async fn register(&self, owner_id: &str) -> CasinoResult<Account> {
        let account = Account::new(owner_id, self.config.ledger.opening_balance());
        self.store
            .create_account(account.clone())
            .await
            .map_err(store_error)?;
        tracing::info!(owner_id, balance = %account.balance, "account registered");
        Ok(account)
    }

    /// Validate, resolve, and settle one round.
    pub async fn play(&self, owner_id: &str, bet: BetRequest) -> CasinoResult<RoundReceipt> {
        bet.validate(&self.config.table)?;
        let outcome = {
            let mut rng = rand::thread_rng();
            bet.resolve(&mut rng)
        };
        self.settle_round(owner_id, &bet, outcome).await
    }

    /// Deterministic variant of [`Casino::play`] for replay and tests.
    pub async fn play_seeded(
        &self,
        owner_id: &str,
        bet: BetRequest,
        seed: u64,
    ) -> CasinoResult<RoundReceipt> {
        bet.validate(&self.config.table)?;
        let outcome = {
            let mut rng = StdRng::seed_from_u64(seed);
            bet.resolve(&mut rng)
        };
        self.settle_round(owner_id, &bet, outcome).await
    }

    async fn settle_round(
        &self,
        owner_id: &str,
        bet: &BetRequest,
        outcome: Outcome,
    ) -> CasinoResult<RoundReceipt> {
        let wager = bet.wager_total();
        let game = bet.game_type();
        let settlement = self.ledger.settle(owner_id, wager, game, &outcome).await?;
        Ok(RoundReceipt {
            round_id: settlement.round_id,
            game,
            result: outcome.result,
            data: outcome.data,
            bet_amount: wager,
            win_amount: outcome.win_amount,
            net_change: settlement.net_change,
            new_balance: settlement.new_balance,
            movement_ids: settlement.movement_ids,
        })
    }

    /// Plain snapshot read; not part of any settlement.
    pub async fn balance(&self, owner_id: &str) -> CasinoResult<Amount> {
        let account = self.store.account(owner_id).await.map_err(store_error)?;
        Ok(account.balance)
    }

    pub async fn deposit(&self, owner_id: &str, amount: Amount) -> CasinoResult<Adjustment> {
        self.ledger.deposit(owner_id, amount).await
    }

    pub async fn withdraw(&self, owner_id: &str, amount: Amount) -> CasinoResult<Adjustment> {
        self.ledger.withdraw(owner_id, amount).await
    }

    pub async fn movements(
        &self,
        owner_id: &str,
        limit: Option<usize>,
    ) -> CasinoResult<Vec<Movement>> {
        let limit = self.clamp_limit(limit);
        self.store
            .movements(owner_id, limit)
            .await
            .map_err(store_error)
    }

    pub async fn history(
        &self,
        owner_id: &str,
        game: Option<GameType>,
        limit: Option<usize>,
    ) -> CasinoResult<Vec<HistoryRecord>> {
        let limit = self.clamp_limit(limit);
        self.store
            .history(owner_id, game, limit)
            .await
            .map_err(store_error)
    }

    pub async fn player_stats(&self, owner_id: &str) -> CasinoResult<PlayerStats> {
        let records = self
            .store
            .history(owner_id, None, usize::MAX)
            .await
            .map_err(store_error)?;
        Ok(PlayerStats::from_records(&records))
    }

    pub async fn game_stats(&self, owner_id: &str, game: GameType) -> CasinoResult<PlayerStats> {
        let records = self
            .store
            .history(owner_id, Some(game), usize::MAX)
            .await
            .map_err(store_error)?;
        Ok(PlayerStats::from_records(&records))
    }

    /// Soft-deactivate; history and movements stay queryable.
    pub async fn close_account(&self, owner_id: &str) -> CasinoResult<()> {
        self.store
            .deactivate(owner_id)
            .await
            .map_err(store_error)?;
        tracing::info!(owner_id, "account closed");
        Ok(())
    }

    fn clamp_limit(&self, limit: Option<usize>) -> usize {
        limit
            .unwrap_or(self.config.history.default_query_limit)
            .min(self.config.history.max_query_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CasinoError, ValidationError};
    use crate::games::dice::DiceBet;
    use crate::store::memory::MemoryStore;

    fn casino() -> Casino {
        Casino::new(Arc::new(MemoryStore::new()), CasinoConfig::default())
    }

    #[tokio::test]
    async fn test_register_grants_opening_balance() {
        let casino = casino();
        let account = casino.register("alice").await.unwrap();
        assert_eq!(account.balance, Amount::from_int(1000));
        assert_eq!(casino.balance("alice").await.unwrap(), Amount::from_int(1000));

        assert!(matches!(
            casino.register("alice").await,
            Err(CasinoError::AccountExists(_))
        ));
    }

    #[tokio::test]
    async fn test_play_settles_and_records() {
        let casino = casino();
        casino.register("bob").await.unwrap();

        let receipt = casino
            .play_seeded(
                "bob",
                BetRequest::Dice {
                    bet: DiceBet::Field,
                    stake: Amount::from_int(10),
                },
                42,
            )
            .await
            .unwrap();

        assert_eq!(receipt.bet_amount, Amount::from_int(10));
        assert_eq!(
            receipt.net_change,
            receipt.win_amount - receipt.bet_amount
        );
        assert_eq!(
            receipt.new_balance,
            Amount::from_int(1000) + receipt.net_change
        );
        assert_eq!(receipt.result, RoundResult::from_net(receipt.net_change));

        let history = casino.history("bob", None, None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, receipt.round_id);

        let movements = casino.movements("bob", None).await.unwrap();
        assert_eq!(movements.len(), receipt.movement_ids.len());
    }

    #[tokio::test]
    async fn test_invalid_bet_never_reaches_the_ledger() {
        let casino = casino();
        casino.register("carol").await.unwrap();

        let result = casino
            .play(
                "carol",
                BetRequest::Slots {
                    stake: Amount::ZERO,
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(CasinoError::Validation(ValidationError::NonPositiveStake))
        ));
        assert_eq!(casino.balance("carol").await.unwrap(), Amount::from_int(1000));
        assert!(casino.movements("carol", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let casino = casino();
        assert!(matches!(
            casino.balance("ghost").await,
            Err(CasinoError::AccountNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_closed_account_refuses_play() {
        let casino = casino();
        casino.register("dave").await.unwrap();
        casino.close_account("dave").await.unwrap();

        let result = casino
            .play_seeded(
                "dave",
                BetRequest::Slots {
                    stake: Amount::from_int(10),
                },
                1,
            )
            .await;
        assert!(matches!(result, Err(CasinoError::AccountClosed(_))));
    }

    #[tokio::test]
    async fn test_deposit_and_withdraw() {
        let casino = casino();
        casino.register("erin").await.unwrap();

        let adjustment = casino
            .deposit("erin", Amount::from_int(250))
            .await
            .unwrap();
        assert_eq!(adjustment.new_balance, Amount::from_int(1250));

        let adjustment = casino
            .withdraw("erin", Amount::from_int(50))
            .await
            .unwrap();
        assert_eq!(adjustment.new_balance, Amount::from_int(1200));

        assert!(matches!(
            casino.withdraw("erin", Amount::from_int(5000)).await,
            Err(CasinoError::InsufficientFunds { .. })
        ));
        assert!(matches!(
            casino.deposit("erin", Amount::ZERO).await,
            Err(CasinoError::Validation(ValidationError::NonPositiveAmount))
        ));
    }

    #[tokio::test]
    async fn test_stats_follow_history() {
        let casino = casino();
        casino.register("frank").await.unwrap();

        for seed in 0..10 {
            casino
                .play_seeded(
                    "frank",
                    BetRequest::Slots {
                        stake: Amount::from_int(10),
                    },
                    seed,
                )
                .await
                .unwrap();
        }

        let stats = casino.player_stats("frank").await.unwrap();
        assert_eq!(stats.total_rounds, 10);
        assert_eq!(stats.total_bet, Amount::from_int(100));
        assert_eq!(stats.wins + stats.losses + stats.draws, 10);

        let slots_stats = casino.game_stats("frank", GameType::Slots).await.unwrap();
        assert_eq!(slots_stats.total_rounds, 10);
        let dice_stats = casino.game_stats("frank", GameType::Dice).await.unwrap();
        assert_eq!(dice_stats.total_rounds, 0);
    }
}
