//! Aggregate player statistics over settled rounds.

use crate::money::Amount;
use crate::store::HistoryRecord;
use crate::games::RoundResult;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub total_rounds: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    /// Percentage of rounds won.
    pub win_rate: f64,
    pub total_bet: Amount,
    pub total_won: Amount,
    pub net_profit: Amount,
}

impl PlayerStats {
    pub fn from_records(records: &[HistoryRecord]) -> Self {
        let total_rounds = records.len() as u64;
        let mut wins = 0;
        let mut losses = 0;
        let mut draws = 0;
        let mut total_bet = Amount::ZERO;
        let mut total_won = Amount::ZERO;

        for record in records {
            match record.result {
                RoundResult::Win => wins += 1,
                RoundResult::Loss => losses += 1,
                RoundResult::Draw => draws += 1,
            }
            total_bet += record.bet_amount;
            total_won += record.win_amount;
        }

        let win_rate = if total_rounds > 0 {
            wins as f64 * 100.0 / total_rounds as f64
        } else {
            0.0
        };

        PlayerStats {
            total_rounds,
            wins,
            losses,
            draws,
            win_rate,
            total_bet,
            total_won,
            net_profit: total_won - total_bet,
        }
    }
}
