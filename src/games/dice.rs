//! Two-die table: exact-sum predictions and craps-style named bets.
//!
//! One bet per round, judged on a single roll. Line bets that land on
//! a point (total outside {2, 3, 7, 11, 12}) resolve probabilistically
//! on the spot rather than waiting for follow-up rolls.

use crate::errors::ValidationError;
use crate::games::{GameData, Outcome, RoundResult};
use crate::money::Amount;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Chance a pass-line bet wins once a point is established.
const PASS_POINT_WIN: f64 = 0.52;
/// Chance a don't-pass bet wins once a point is established.
const DONT_PASS_POINT_WIN: f64 = 0.48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiceBet {
    /// Predict the exact total of both dice. Returns six times the
    /// stake on a hit.
    Sum(u8),
    /// Wins on 7/11, loses on 2/3/12, otherwise a point is resolved.
    Pass,
    /// Wins on 2/3, loses on 7/11, pushes on 12.
    DontPass,
    /// 2 and 12 pay 2:1; 3, 4, 9, 10, 11 pay 1:1.
    Field,
    /// 2, 3 or 12. Pays 7:1.
    AnyCraps,
    /// A 7 on the next roll. Pays 4:1.
    AnySeven,
}

/// How the roll was judged, carried in the round payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ruling {
    Natural,
    Craps,
    Seven,
    SevenOut,
    PointWin,
    PointLoss,
    FieldDouble,
    FieldSingle,
    Push,
    Hit,
    Miss,
}

pub(crate) fn validate(bet: DiceBet) -> Result<(), ValidationError> {
    match bet {
        DiceBet::Sum(target) if !(2..=12).contains(&target) => {
            Err(ValidationError::BadSumTarget(target))
        }
        _ => Ok(()),
    }
}

pub fn roll<R: Rng>(rng: &mut R) -> [u8; 2] {
    [rng.gen_range(1..=6), rng.gen_range(1..=6)]
}

pub fn resolve<R: Rng>(bet: DiceBet, stake: Amount, rng: &mut R) -> Outcome {
    let dice = roll(rng);
    judge(bet, stake, dice, rng)
}

/// Multipliers are stake-inclusive: a winning stake comes back with
/// the payout on top, a push returns the stake alone.
pub(crate) fn judge<R: Rng>(bet: DiceBet, stake: Amount, dice: [u8; 2], rng: &mut R) -> Outcome {
    let total = dice[0] + dice[1];
    let (ruling, multiplier) = match bet {
        DiceBet::Sum(target) => {
            if total == target {
                (Ruling::Hit, 6)
            } else {
                (Ruling::Miss, 0)
            }
        }
        DiceBet::Pass => match total {
            7 | 11 => (Ruling::Natural, 2),
            2 | 3 | 12 => (Ruling::Craps, 0),
            _ => {
                if rng.gen_bool(PASS_POINT_WIN) {
                    (Ruling::PointWin, 2)
                } else {
                    (Ruling::PointLoss, 0)
                }
            }
        },
        DiceBet::DontPass => match total {
            7 | 11 => (Ruling::SevenOut, 0),
            2 | 3 => (Ruling::Craps, 2),
            12 => (Ruling::Push, 1),
            _ => {
                if rng.gen_bool(DONT_PASS_POINT_WIN) {
                    (Ruling::PointWin, 2)
                } else {
                    (Ruling::PointLoss, 0)
                }
            }
        },
        DiceBet::Field => match total {
            2 | 12 => (Ruling::FieldDouble, 3),
            3 | 4 | 9 | 10 | 11 => (Ruling::FieldSingle, 2),
            _ => (Ruling::Miss, 0),
        },
        DiceBet::AnyCraps => match total {
            2 | 3 | 12 => (Ruling::Craps, 8),
            _ => (Ruling::Miss, 0),
        },
        DiceBet::AnySeven => {
            if total == 7 {
                (Ruling::Seven, 5)
            } else {
                (Ruling::Miss, 0)
            }
        }
    };

    let win_amount = stake.mul_int(multiplier);
    let net = win_amount - stake;
    Outcome {
        result: RoundResult::from_net(net),
        win_amount,
        data: GameData::Dice {
            dice,
            total,
            bet,
            ruling,
        },
    }
}
