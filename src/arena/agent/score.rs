use rand::{Rng, RngCore};

use crate::{
    arena::{betting::BetBounds, errors::ArenaError},
    core::{Category, Hand, Rankable},
};

use super::{Strategy, triangular};

/// Scores at or below this are worth the minimum bet.
const SCORE_FLOOR: f64 = Category::OnePair.base_score() as f64;
/// Scores at or above this are worth the maximum bet.
const SCORE_CEILING: f64 = Category::FiveCard.base_score() as f64 + 10_000.0;

/// A strategy that bets in proportion to the hand score, with some noise.
///
/// The score is jittered by a triangular sample that leans towards
/// overestimating (`score - 5000` up to `score + 10000`, peaking at the
/// score), then mapped linearly onto the betting bounds.
///
/// With a weak target it will sometimes check instead of opening. The
/// chance of checking is at most 20% and falls to zero as the target
/// reaches the maximum bet. Opening bets are random between the minimum
/// and the target.
#[derive(Debug, Clone)]
pub struct ScoreStrategy<R> {
    rng: R,
}

impl<R: Rng> ScoreStrategy<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// A number in `[0, 1]` saying how good the hand looks.
    pub fn strength(&mut self, hand: &Hand) -> Result<f64, ArenaError> {
        let score = f64::from(hand.rank()?.score);
        let jittered = triangular(&mut self.rng, score - 5_000.0, score, score + 10_000.0);
        Ok(((jittered.trunc() - SCORE_FLOOR) / (SCORE_CEILING - SCORE_FLOOR)).clamp(0.0, 1.0))
    }
}

impl<R: Rng + Send> Strategy for ScoreStrategy<R> {
    fn bet_target(&mut self, hand: &Hand, bounds: BetBounds) -> Result<u32, ArenaError> {
        let strength = self.strength(hand)?;
        let target = (strength * f64::from(bounds.span())) as u32 + bounds.min;
        Ok(bounds.clamp(target))
    }

    fn opening_bet(&mut self, bounds: BetBounds, target: u32) -> Option<u32> {
        let check_chance = if bounds.span() == 0 {
            0.0
        } else {
            f64::from(bounds.max.saturating_sub(target)) * 0.2 / f64::from(bounds.span())
        };
        if self.rng.random::<f64>() > check_chance {
            Some(self.rng.random_range(bounds.min..=target.max(bounds.min)))
        } else {
            None
        }
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn strategy(seed: u64) -> ScoreStrategy<StdRng> {
        ScoreStrategy::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_targets_within_bounds() {
        let mut s = strategy(7);
        let bounds = BetBounds::new(5, 15);
        for hand in crate::core::Deck::new().hands().take(500) {
            let hand = Hand::new_with_cards(hand).unwrap();
            let target = s.bet_target(&hand, bounds).unwrap();
            assert!((5..=15).contains(&target), "{hand} got {target}");
        }
    }

    #[test]
    fn test_five_card_beats_one_pair() {
        let five = Hand::new_from_str("SA,HA,DA,CA,J").unwrap();
        let pair = Hand::new_from_str("SJ,HJ,SQ,DK,CA").unwrap();
        let bounds = BetBounds::new(6, 30);

        let mut s = strategy(11);
        let mut five_total = 0;
        let mut pair_total = 0;
        for _ in 0..100 {
            five_total += s.bet_target(&five, bounds).unwrap();
            pair_total += s.bet_target(&pair, bounds).unwrap();
        }
        assert!(five_total > pair_total);
        // A five card hand never jitters below 85000.
        assert!(five_total >= 100 * 25);
    }

    #[test]
    fn test_opening_bet_in_range() {
        let mut s = strategy(3);
        let bounds = BetBounds::new(5, 15);
        let mut checks = 0;
        for _ in 0..1_000 {
            match s.opening_bet(bounds, 9) {
                Some(bet) => assert!((5..=9).contains(&bet)),
                None => checks += 1,
            }
        }
        // (15 - 9) * 0.2 / 10 = 12% chance to check.
        assert!(checks > 60 && checks < 200, "checked {checks} times");
    }

    #[test]
    fn test_max_target_always_opens() {
        let mut s = strategy(5);
        let bounds = BetBounds::new(5, 15);
        for _ in 0..200 {
            assert!(s.opening_bet(bounds, 15).is_some());
        }
    }

    #[test]
    fn test_seeded_runs_match() {
        let hand = Hand::new_from_str("SA,HA,DK,CK,SQ").unwrap();
        let bounds = BetBounds::new(5, 15);
        let a: Vec<u32> = {
            let mut s = strategy(21);
            (0..20).map(|_| s.bet_target(&hand, bounds).unwrap()).collect()
        };
        let b: Vec<u32> = {
            let mut s = strategy(21);
            (0..20).map(|_| s.bet_target(&hand, bounds).unwrap()).collect()
        };
        assert_eq!(a, b);
    }
}
