//! Five-card-draw video poker with a jacks-or-better paytable.
//!
//! Deal five, redraw every index the player did not keep, rank the
//! final hand. Paytable multipliers are stake-inclusive, so a plain
//! pair of jacks or better returns the stake and nothing more.

use crate::errors::ValidationError;
use crate::games::cards::{self, Card};
use crate::games::{GameData, Outcome, RoundResult};
use crate::money::Amount;
use rand::Rng;
use serde::{Deserialize, Serialize};

const HAND_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandRank {
    RoyalFlush,
    StraightFlush,
    FourOfAKind,
    FullHouse,
    Flush,
    Straight,
    ThreeOfAKind,
    TwoPair,
    JacksOrBetter,
    HighCard,
}

impl HandRank {
    pub fn multiplier(self) -> i64 {
        match self {
            HandRank::RoyalFlush => 250,
            HandRank::StraightFlush => 50,
            HandRank::FourOfAKind => 25,
            HandRank::FullHouse => 9,
            HandRank::Flush => 6,
            HandRank::Straight => 4,
            HandRank::ThreeOfAKind => 3,
            HandRank::TwoPair => 2,
            HandRank::JacksOrBetter => 1,
            HandRank::HighCard => 0,
        }
    }
}

pub(crate) fn validate_keep(keep: &[usize]) -> Result<(), ValidationError> {
    for (i, index) in keep.iter().enumerate() {
        if *index >= HAND_SIZE {
            return Err(ValidationError::BadKeepIndex(*index));
        }
        if keep[..i].contains(index) {
            return Err(ValidationError::DuplicateKeepIndex(*index));
        }
    }
    Ok(())
}

/// Rank a final five-card hand.
pub fn evaluate(hand: &[Card]) -> HandRank {
    debug_assert_eq!(hand.len(), HAND_SIZE);

    let mut values: Vec<u8> = hand.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));

    let mut counts = [0u8; 15];
    for v in &values {
        counts[*v as usize] += 1;
    }
    let mut freq: Vec<u8> = counts.iter().copied().filter(|c| *c > 0).collect();
    freq.sort_unstable_by(|a, b| b.cmp(a));

    let flush = hand.iter().all(|c| c.suit == hand[0].suit);
    let straight = is_straight(&values);

    if flush && straight && values[0] == 14 && values[4] == 10 {
        return HandRank::RoyalFlush;
    }
    if flush && straight {
        return HandRank::StraightFlush;
    }
    if freq[0] == 4 {
        return HandRank::FourOfAKind;
    }
    if freq[0] == 3 && freq[1] == 2 {
        return HandRank::FullHouse;
    }
    if flush {
        return HandRank::Flush;
    }
    if straight {
        return HandRank::Straight;
    }
    if freq[0] == 3 {
        return HandRank::ThreeOfAKind;
    }
    if freq[0] == 2 && freq[1] == 2 {
        return HandRank::TwoPair;
    }
    if freq[0] == 2 {
        let pair_value = (11..=14).find(|v| counts[*v as usize] == 2);
        if pair_value.is_some() {
            return HandRank::JacksOrBetter;
        }
    }
    HandRank::HighCard
}

/// `values` must be sorted descending. The wheel (A-5-4-3-2) counts.
fn is_straight(values: &[u8]) -> bool {
    let consecutive = values.windows(2).all(|w| w[0] == w[1] + 1);
    let wheel = values == &[14, 5, 4, 3, 2][..];
    consecutive || wheel
}

pub fn resolve<R: Rng>(stake: Amount, keep: &[usize], rng: &mut R) -> Outcome {
    let mut shoe = cards::shuffled_deck(rng);
    let mut hand: Vec<Card> = (0..HAND_SIZE).map(|_| cards::draw(&mut shoe)).collect();
    for i in 0..HAND_SIZE {
        if !keep.contains(&i) {
            hand[i] = cards::draw(&mut shoe);
        }
    }

    let rank = evaluate(&hand);
    let win_amount = stake.mul_int(rank.multiplier());
    let net = win_amount - stake;
    Outcome {
        result: RoundResult::from_net(net),
        win_amount,
        data: GameData::Poker {
            hand,
            kept: keep.to_vec(),
            rank,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::cards::{Rank, Suit};

    fn hand(cards: &[(Rank, Suit)]) -> Vec<Card> {
        cards.iter().map(|(r, s)| Card::new(*r, *s)).collect()
    }

    #[test]
    fn test_royal_flush() {
        let h = hand(&[
            (Rank::Ace, Suit::Hearts),
            (Rank::King, Suit::Hearts),
            (Rank::Queen, Suit::Hearts),
            (Rank::Jack, Suit::Hearts),
            (Rank::Ten, Suit::Hearts),
        ]);
        assert_eq!(evaluate(&h), HandRank::RoyalFlush);
        assert_eq!(HandRank::RoyalFlush.multiplier(), 250);
    }

    #[test]
    fn test_straight_flush_and_wheel() {
        let h = hand(&[
            (Rank::Nine, Suit::Clubs),
            (Rank::Eight, Suit::Clubs),
            (Rank::Seven, Suit::Clubs),
            (Rank::Six, Suit::Clubs),
            (Rank::Five, Suit::Clubs),
        ]);
        assert_eq!(evaluate(&h), HandRank::StraightFlush);

        let wheel = hand(&[
            (Rank::Ace, Suit::Spades),
            (Rank::Five, Suit::Hearts),
            (Rank::Four, Suit::Clubs),
            (Rank::Three, Suit::Diamonds),
            (Rank::Two, Suit::Spades),
        ]);
        assert_eq!(evaluate(&wheel), HandRank::Straight);
    }

    #[test]
    fn test_four_of_a_kind_and_full_house() {
        let quads = hand(&[
            (Rank::Nine, Suit::Clubs),
            (Rank::Nine, Suit::Hearts),
            (Rank::Nine, Suit::Spades),
            (Rank::Nine, Suit::Diamonds),
            (Rank::Two, Suit::Clubs),
        ]);
        assert_eq!(evaluate(&quads), HandRank::FourOfAKind);

        let boat = hand(&[
            (Rank::Nine, Suit::Clubs),
            (Rank::Nine, Suit::Hearts),
            (Rank::Nine, Suit::Spades),
            (Rank::Two, Suit::Diamonds),
            (Rank::Two, Suit::Clubs),
        ]);
        assert_eq!(evaluate(&boat), HandRank::FullHouse);
    }

    #[test]
    fn test_pair_threshold_is_jacks() {
        let jacks = hand(&[
            (Rank::Jack, Suit::Clubs),
            (Rank::Jack, Suit::Hearts),
            (Rank::Nine, Suit::Spades),
            (Rank::Five, Suit::Diamonds),
            (Rank::Two, Suit::Clubs),
        ]);
        assert_eq!(evaluate(&jacks), HandRank::JacksOrBetter);

        let tens = hand(&[
            (Rank::Ten, Suit::Clubs),
            (Rank::Ten, Suit::Hearts),
            (Rank::Nine, Suit::Spades),
            (Rank::Five, Suit::Diamonds),
            (Rank::Two, Suit::Clubs),
        ]);
        assert_eq!(evaluate(&tens), HandRank::HighCard);

        let aces = hand(&[
            (Rank::Ace, Suit::Clubs),
            (Rank::Ace, Suit::Hearts),
            (Rank::Nine, Suit::Spades),
            (Rank::Five, Suit::Diamonds),
            (Rank::Two, Suit::Clubs),
        ]);
        assert_eq!(evaluate(&aces), HandRank::JacksOrBetter);
    }

    #[test]
    fn test_two_pair_and_trips() {
        let two_pair = hand(&[
            (Rank::Ten, Suit::Clubs),
            (Rank::Ten, Suit::Hearts),
            (Rank::Five, Suit::Spades),
            (Rank::Five, Suit::Diamonds),
            (Rank::Two, Suit::Clubs),
        ]);
        assert_eq!(evaluate(&two_pair), HandRank::TwoPair);

        let trips = hand(&[
            (Rank::Ten, Suit::Clubs),
            (Rank::Ten, Suit::Hearts),
            (Rank::Ten, Suit::Spades),
            (Rank::Five, Suit::Diamonds),
            (Rank::Two, Suit::Clubs),
        ]);
        assert_eq!(evaluate(&trips), HandRank::ThreeOfAKind);
    }

    #[test]
    fn test_flush_beats_straight() {
        let flush = hand(&[
            (Rank::King, Suit::Clubs),
            (Rank::Ten, Suit::Clubs),
            (Rank::Eight, Suit::Clubs),
            (Rank::Five, Suit::Clubs),
            (Rank::Two, Suit::Clubs),
        ]);
        assert_eq!(evaluate(&flush), HandRank::Flush);

        let straight = hand(&[
            (Rank::Nine, Suit::Clubs),
            (Rank::Eight, Suit::Hearts),
            (Rank::Seven, Suit::Spades),
            (Rank::Six, Suit::Diamonds),
            (Rank::Five, Suit::Clubs),
        ]);
        assert_eq!(evaluate(&straight), HandRank::Straight);
    }

    #[test]
    fn test_keep_validation() {
        assert!(validate_keep(&[]).is_ok());
        assert!(validate_keep(&[0, 2, 4]).is_ok());
        assert_eq!(
            validate_keep(&[5]).unwrap_err(),
            ValidationError::BadKeepIndex(5)
        );
        assert_eq!(
            validate_keep(&[1, 1]).unwrap_err(),
            ValidationError::DuplicateKeepIndex(1)
        );
    }

    #[test]
    fn test_resolve_respects_kept_cards() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = resolve(Amount::from_int(10), &[0, 1, 2, 3, 4], &mut rng);
        match outcome.data {
            GameData::Poker { hand, kept, .. } => {
                assert_eq!(hand.len(), 5);
                assert_eq!(kept.len(), 5);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }
}
