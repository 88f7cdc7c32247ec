//! European roulette: bet-key parsing, layout predicates, payouts.
//!
//! A round is a list of legs, each a key plus a stake. The whole round
//! settles as one unit: one debit for the total wager, one credit for
//! the summed winnings. Combination bets (split/street/corner/line)
//! pay by the generic `floor(36/n) - 1` formula; named bets use the
//! fixed table below.

use crate::errors::ValidationError;
use crate::games::{GameData, Outcome, RoundResult};
use crate::money::Amount;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

pub const BLACK_NUMBERS: [u8; 18] = [
    2, 4, 6, 8, 10, 11, 13, 15, 17, 20, 22, 24, 26, 28, 29, 31, 33, 35,
];

pub fn is_red(n: u8) -> bool {
    RED_NUMBERS.contains(&n)
}

pub fn is_black(n: u8) -> bool {
    BLACK_NUMBERS.contains(&n)
}

/// One placeable position on the layout.
///
/// Parsed from the wire form: `"17"` (straight), `"8-9"` / `"1-2-3"`
/// (combinations), or a named bet (`"red"`, `"odd"`, `"2nd12"`,
/// `"col3"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BetKey {
    Straight(u8),
    Combination(Vec<u8>),
    Red,
    Black,
    Even,
    Odd,
    /// 1-18
    Low,
    /// 19-36
    High,
    /// 1..=3
    Dozen(u8),
    /// 1..=3
    Column(u8),
}

impl BetKey {
    /// Whether the winning number falls inside this position.
    pub fn covers(&self, n: u8) -> bool {
        match self {
            BetKey::Straight(target) => n == *target,
            BetKey::Combination(numbers) => numbers.contains(&n),
            BetKey::Red => is_red(n),
            BetKey::Black => is_black(n),
            BetKey::Even => n != 0 && n % 2 == 0,
            BetKey::Odd => n % 2 == 1,
            BetKey::Low => (1..=18).contains(&n),
            BetKey::High => (19..=36).contains(&n),
            BetKey::Dozen(d) => {
                let lo = (d - 1) * 12 + 1;
                (lo..=lo + 11).contains(&n)
            }
            BetKey::Column(c) => n != 0 && n % 3 == *c % 3,
        }
    }

    /// Payout to one. A combination covering n numbers pays
    /// `floor(36/n) - 1`; straight bets are the n = 1 case of the same
    /// formula.
    pub fn payout(&self) -> u32 {
        match self {
            BetKey::Straight(_) => 35,
            BetKey::Combination(numbers) => 36 / numbers.len() as u32 - 1,
            BetKey::Red | BetKey::Black | BetKey::Even | BetKey::Odd | BetKey::Low | BetKey::High => 1,
            BetKey::Dozen(_) | BetKey::Column(_) => 2,
        }
    }

    /// Range checks for keys built directly rather than parsed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            BetKey::Straight(n) if *n > 36 => Err(ValidationError::NumberOutOfRange(*n)),
            BetKey::Combination(numbers) => {
                if !(2..=6).contains(&numbers.len()) {
                    return Err(ValidationError::BadCombinationSize(numbers.len()));
                }
                for (i, n) in numbers.iter().enumerate() {
                    if *n > 36 {
                        return Err(ValidationError::NumberOutOfRange(*n));
                    }
                    if numbers[..i].contains(n) {
                        return Err(ValidationError::DuplicateNumber(*n));
                    }
                }
                Ok(())
            }
            BetKey::Dozen(d) | BetKey::Column(d) if !(1..=3).contains(d) => {
                Err(ValidationError::UnknownBetKey(self.to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl FromStr for BetKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "red" => BetKey::Red,
            "black" => BetKey::Black,
            "even" => BetKey::Even,
            "odd" => BetKey::Odd,
            "low" => BetKey::Low,
            "high" => BetKey::High,
            "1st12" => BetKey::Dozen(1),
            "2nd12" => BetKey::Dozen(2),
            "3rd12" => BetKey::Dozen(3),
            "col1" => BetKey::Column(1),
            "col2" => BetKey::Column(2),
            "col3" => BetKey::Column(3),
            other if other.contains('-') => {
                let numbers = other
                    .split('-')
                    .map(|part| {
                        part.parse::<u8>()
                            .map_err(|_| ValidationError::UnknownBetKey(s.to_string()))
                    })
                    .collect::<Result<Vec<u8>, _>>()?;
                BetKey::Combination(numbers)
            }
            other => {
                let n = other
                    .parse::<u8>()
                    .map_err(|_| ValidationError::UnknownBetKey(s.to_string()))?;
                BetKey::Straight(n)
            }
        };
        key.validate()?;
        Ok(key)
    }
}

impl fmt::Display for BetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetKey::Straight(n) => write!(f, "{}", n),
            BetKey::Combination(numbers) => {
                let joined: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
                write!(f, "{}", joined.join("-"))
            }
            BetKey::Red => write!(f, "red"),
            BetKey::Black => write!(f, "black"),
            BetKey::Even => write!(f, "even"),
            BetKey::Odd => write!(f, "odd"),
            BetKey::Low => write!(f, "low"),
            BetKey::High => write!(f, "high"),
            BetKey::Dozen(1) => write!(f, "1st12"),
            BetKey::Dozen(2) => write!(f, "2nd12"),
            BetKey::Dozen(_) => write!(f, "3rd12"),
            BetKey::Column(c) => write!(f, "col{}", c),
        }
    }
}

impl TryFrom<String> for BetKey {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BetKey> for String {
    fn from(key: BetKey) -> String {
        key.to_string()
    }
}

/// One chip placement inside a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    pub key: BetKey,
    pub stake: Amount,
}

/// A leg that hit, with its payout applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningLeg {
    pub key: BetKey,
    pub stake: Amount,
    pub payout: u32,
    pub win_amount: Amount,
}

pub(crate) fn validate_legs(legs: &[Leg]) -> Result<(), ValidationError> {
    if legs.is_empty() {
        return Err(ValidationError::NoLegs);
    }
    for leg in legs {
        if !leg.stake.is_positive() {
            return Err(ValidationError::NonPositiveStake);
        }
        leg.key.validate()?;
    }
    Ok(())
}

pub fn spin<R: Rng>(rng: &mut R) -> u8 {
    rng.gen_range(0..=36)
}

pub fn resolve<R: Rng>(legs: &[Leg], rng: &mut R) -> Outcome {
    settle_spin(legs, spin(rng))
}

/// Judge every leg against the winning number. A winning leg returns
/// stake times payout plus the stake itself.
pub fn settle_spin(legs: &[Leg], winning_number: u8) -> Outcome {
    let wager_total: Amount = legs.iter().map(|leg| leg.stake).sum();
    let mut win_amount = Amount::ZERO;
    let mut winning_legs = Vec::new();

    for leg in legs {
        if leg.key.covers(winning_number) {
            let payout = leg.key.payout();
            let amount = leg.stake.mul_int(payout as i64 + 1);
            win_amount += amount;
            winning_legs.push(WinningLeg {
                key: leg.key.clone(),
                stake: leg.stake,
                payout,
                win_amount: amount,
            });
        }
    }

    let net = win_amount - wager_total;
    Outcome {
        result: RoundResult::from_net(net),
        win_amount,
        data: GameData::Roulette {
            winning_number,
            is_red: is_red(winning_number),
            is_black: is_black(winning_number),
            winning_legs,
        },
    }
}
