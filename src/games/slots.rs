//! Three-reel slot machine with a weighted symbol strip.

use crate::games::{GameData, Outcome, RoundResult};
use crate::money::Amount;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Cherry,
    Lemon,
    Orange,
    Grape,
    Star,
    Diamond,
    Seven,
}

/// Reel strip. Duplicate entries weight the common fruit; sevens and
/// diamonds come up once per ten positions.
const STRIP: [Symbol; 10] = [
    Symbol::Cherry,
    Symbol::Cherry,
    Symbol::Lemon,
    Symbol::Lemon,
    Symbol::Orange,
    Symbol::Orange,
    Symbol::Grape,
    Symbol::Star,
    Symbol::Diamond,
    Symbol::Seven,
];

impl Symbol {
    /// Multiplier for three of a kind.
    fn triple_multiplier(self) -> i64 {
        match self {
            Symbol::Seven => 100,
            Symbol::Diamond => 50,
            Symbol::Star => 25,
            Symbol::Grape => 15,
            Symbol::Cherry | Symbol::Lemon | Symbol::Orange => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combo {
    Triple,
    Double,
    Miss,
}

pub fn spin<R: Rng>(rng: &mut R) -> [Symbol; 3] {
    let mut pick = || STRIP[rng.gen_range(0..STRIP.len())];
    [pick(), pick(), pick()]
}

pub fn resolve<R: Rng>(stake: Amount, rng: &mut R) -> Outcome {
    settle_reels(stake, spin(rng))
}

pub(crate) fn settle_reels(stake: Amount, reels: [Symbol; 3]) -> Outcome {
    let [a, b, c] = reels;
    let (combo, multiplier) = if a == b && b == c {
        (Combo::Triple, a.triple_multiplier())
    } else if a == b || b == c || a == c {
        (Combo::Double, 2)
    } else {
        (Combo::Miss, 0)
    };

    let win_amount = stake.mul_int(multiplier);
    let net = win_amount - stake;
    Outcome {
        result: RoundResult::from_net(net),
        win_amount,
        data: GameData::Slots { reels, combo },
    }
}
