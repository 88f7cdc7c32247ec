//! Game catalogue: bet requests, outcome generation, round payloads.
//!
//! Each game module is a pure outcome generator: bet parameters plus a
//! randomness source in, an [`Outcome`] out. No game touches account
//! state; the ledger consumes the outcome it is handed.

pub mod blackjack;
pub mod cards;
pub mod dice;
pub mod poker;
pub mod roulette;
pub mod slots;

use crate::config::TableConfig;
use crate::errors::ValidationError;
use crate::money::Amount;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported game types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Roulette,
    Dice,
    Slots,
    Blackjack,
    Poker,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::Roulette => write!(f, "roulette"),
            GameType::Dice => write!(f, "dice"),
            GameType::Slots => write!(f, "slots"),
            GameType::Blackjack => write!(f, "blackjack"),
            GameType::Poker => write!(f, "poker"),
        }
    }
}

/// How a round ended for the player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Win,
    Loss,
    Draw,
}

impl RoundResult {
    /// Classify by the sign of the net balance change; a returned
    /// stake (net zero) is a draw.
    pub fn from_net(net: Amount) -> Self {
        if net.is_positive() {
            RoundResult::Win
        } else if net.is_negative() {
            RoundResult::Loss
        } else {
            RoundResult::Draw
        }
    }
}

/// What a game resolved to, before any balance is touched.
///
/// `win_amount` is stake-inclusive: the net balance change of the
/// round is `win_amount - wager_total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub result: RoundResult,
    pub win_amount: Amount,
    pub data: GameData,
}

/// Per-game round payload, persisted with the history record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum GameData {
    Roulette {
        winning_number: u8,
        is_red: bool,
        is_black: bool,
        winning_legs: Vec<roulette::WinningLeg>,
    },
    Dice {
        dice: [u8; 2],
        total: u8,
        bet: dice::DiceBet,
        ruling: dice::Ruling,
    },
    Slots {
        reels: [slots::Symbol; 3],
        combo: slots::Combo,
    },
    Blackjack {
        player: Vec<cards::Card>,
        dealer: Vec<cards::Card>,
        player_score: u8,
        dealer_score: u8,
        natural: bool,
    },
    Poker {
        hand: Vec<cards::Card>,
        kept: Vec<usize>,
        rank: poker::HandRank,
    },
}

/// A validated-shape bet as handed over by the request layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum BetRequest {
    Roulette { legs: Vec<roulette::Leg> },
    Dice { bet: dice::DiceBet, stake: Amount },
    Slots { stake: Amount },
    Blackjack { stake: Amount },
    Poker { stake: Amount, keep: Vec<usize> },
}

impl BetRequest {
    pub fn game_type(&self) -> GameType {
        match self {
            BetRequest::Roulette { .. } => GameType::Roulette,
            BetRequest::Dice { .. } => GameType::Dice,
            BetRequest::Slots { .. } => GameType::Slots,
            BetRequest::Blackjack { .. } => GameType::Blackjack,
            BetRequest::Poker { .. } => GameType::Poker,
        }
    }

    /// Sum of every stake placed in this round.
    pub fn wager_total(&self) -> Amount {
        match self {
            BetRequest::Roulette { legs } => legs.iter().map(|leg| leg.stake).sum(),
            BetRequest::Dice { stake, .. }
            | BetRequest::Slots { stake }
            | BetRequest::Blackjack { stake }
            | BetRequest::Poker { stake, .. } => *stake,
        }
    }

    /// Reject malformed bets before any balance is read.
    pub fn validate(&self, table: &TableConfig) -> Result<(), ValidationError> {
        match self {
            BetRequest::Roulette { legs } => roulette::validate_legs(legs)?,
            BetRequest::Dice { bet, stake } => {
                if !stake.is_positive() {
                    return Err(ValidationError::NonPositiveStake);
                }
                dice::validate(*bet)?;
            }
            BetRequest::Slots { stake } | BetRequest::Blackjack { stake } => {
                if !stake.is_positive() {
                    return Err(ValidationError::NonPositiveStake);
                }
            }
            BetRequest::Poker { stake, keep } => {
                if !stake.is_positive() {
                    return Err(ValidationError::NonPositiveStake);
                }
                poker::validate_keep(keep)?;
            }
        }

        let wager = self.wager_total();
        if wager < table.min_bet() {
            return Err(ValidationError::BelowTableMinimum {
                wager,
                min: table.min_bet(),
            });
        }
        if wager > table.max_bet() {
            return Err(ValidationError::AboveTableMaximum {
                wager,
                max: table.max_bet(),
            });
        }
        Ok(())
    }

    /// Run the game. Pure over the bet and the randomness source.
    pub fn resolve<R: Rng>(&self, rng: &mut R) -> Outcome {
        match self {
            BetRequest::Roulette { legs } => roulette::resolve(legs, rng),
            BetRequest::Dice { bet, stake } => dice::resolve(*bet, *stake, rng),
            BetRequest::Slots { stake } => slots::resolve(*stake, rng),
            BetRequest::Blackjack { stake } => blackjack::resolve(*stake, rng),
            BetRequest::Poker { stake, keep } => poker::resolve(*stake, keep, rng),
        }
    }
}
