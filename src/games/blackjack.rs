//! Blackjack round against a fresh 52-card shoe.
//!
//! Both sides receive two cards; the player stands pat and the dealer
//! draws to 17. Aces count 11, reduced to 1 while the hand busts. A
//! two-card 21 is a natural and pays 3:2.

use crate::games::cards::{self, Card};
use crate::games::{GameData, Outcome, RoundResult};
use crate::money::Amount;
use rand::Rng;

const DEALER_STAND: u8 = 17;

/// Best blackjack total for a hand.
pub fn score(cards: &[Card]) -> u8 {
    let mut total: u8 = 0;
    let mut aces = 0;
    for card in cards {
        let value = card.rank.blackjack_value();
        if value == 11 {
            aces += 1;
        }
        total += value;
    }
    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }
    total
}

pub fn resolve<R: Rng>(stake: Amount, rng: &mut R) -> Outcome {
    let mut shoe = cards::shuffled_deck(rng);

    let player = vec![cards::draw(&mut shoe), cards::draw(&mut shoe)];
    let mut dealer = vec![cards::draw(&mut shoe), cards::draw(&mut shoe)];
    while score(&dealer) < DEALER_STAND {
        dealer.push(cards::draw(&mut shoe));
    }

    judge(stake, player, dealer)
}

pub(crate) fn judge(stake: Amount, player: Vec<Card>, dealer: Vec<Card>) -> Outcome {
    let player_score = score(&player);
    let dealer_score = score(&dealer);
    let natural = player_score == 21 && player.len() == 2;

    // stake-inclusive multiplier as a fraction: 1:1 wins return 2x,
    // a natural returns 5/2, a push returns the stake
    let (num, den) = if player_score > 21 {
        (0, 1)
    } else if natural {
        (5, 2)
    } else if dealer_score > 21 {
        (2, 1)
    } else if player_score > dealer_score {
        (2, 1)
    } else if player_score == dealer_score {
        (1, 1)
    } else {
        (0, 1)
    };

    let win_amount = stake.mul_frac(num, den);
    let net = win_amount - stake;
    Outcome {
        result: RoundResult::from_net(net),
        win_amount,
        data: GameData::Blackjack {
            player,
            dealer,
            player_score,
            dealer_score,
            natural,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::cards::{Rank, Suit};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(rank: Rank) -> Card {
        Card::new(rank, Suit::Spades)
    }

    fn hand(ranks: &[Rank]) -> Vec<Card> {
        ranks.iter().map(|r| card(*r)).collect()
    }

    #[test]
    fn test_score_adjusts_aces() {
        assert_eq!(score(&hand(&[Rank::Ace, Rank::King])), 21);
        assert_eq!(score(&hand(&[Rank::Ace, Rank::Ace, Rank::Nine])), 21);
        assert_eq!(score(&hand(&[Rank::Ace, Rank::King, Rank::Five])), 16);
        assert_eq!(score(&hand(&[Rank::Ten, Rank::Nine, Rank::Three])), 22);
    }

    #[test]
    fn test_natural_pays_three_to_two() {
        let outcome = judge(
            Amount::from_int(10),
            hand(&[Rank::Ace, Rank::King]),
            hand(&[Rank::Ten, Rank::Nine]),
        );
        // 10 * 5/2 = 25, net +15
        assert_eq!(outcome.win_amount, Amount::from_int(25));
        assert_eq!(outcome.result, RoundResult::Win);
        match outcome.data {
            GameData::Blackjack { natural, .. } => assert!(natural),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_player_bust_loses_even_against_dealer_bust() {
        let outcome = judge(
            Amount::from_int(10),
            hand(&[Rank::Ten, Rank::Nine, Rank::Five]),
            hand(&[Rank::Ten, Rank::Eight, Rank::Six]),
        );
        assert_eq!(outcome.win_amount, Amount::ZERO);
        assert_eq!(outcome.result, RoundResult::Loss);
    }

    #[test]
    fn test_dealer_bust_pays_even_money() {
        let outcome = judge(
            Amount::from_int(10),
            hand(&[Rank::Ten, Rank::Eight]),
            hand(&[Rank::Ten, Rank::Six, Rank::Nine]),
        );
        assert_eq!(outcome.win_amount, Amount::from_int(20));
        assert_eq!(outcome.result, RoundResult::Win);
    }

    #[test]
    fn test_higher_total_wins() {
        let outcome = judge(
            Amount::from_int(10),
            hand(&[Rank::Ten, Rank::Nine]),
            hand(&[Rank::Ten, Rank::Seven]),
        );
        assert_eq!(outcome.win_amount, Amount::from_int(20));
    }

    #[test]
    fn test_push_returns_stake() {
        let outcome = judge(
            Amount::from_int(10),
            hand(&[Rank::Ten, Rank::Eight]),
            hand(&[Rank::Nine, Rank::Nine]),
        );
        assert_eq!(outcome.win_amount, Amount::from_int(10));
        assert_eq!(outcome.result, RoundResult::Draw);
    }

    #[test]
    fn test_resolved_round_is_well_formed() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let outcome = resolve(Amount::from_int(10), &mut rng);
            match outcome.data {
                GameData::Blackjack {
                    player,
                    dealer,
                    player_score,
                    dealer_score,
                    ..
                } => {
                    assert_eq!(player.len(), 2);
                    assert!(dealer.len() >= 2);
                    assert_eq!(score(&player), player_score);
                    assert_eq!(score(&dealer), dealer_score);
                    // dealer stood on 17+ or busted
                    assert!(dealer_score >= 17);
                }
                other => panic!("unexpected payload: {:?}", other),
            }
        }
    }
}
