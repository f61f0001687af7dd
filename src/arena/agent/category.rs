use rand::{Rng, RngCore};

use crate::{
    arena::{betting::BetBounds, errors::ArenaError},
    core::{Category, Hand, Rankable},
};

use super::Strategy;

/// A strategy that looks only at the hand category.
///
/// Premium hands push towards the maximum, strong hands settle in the
/// middle. A three card hand is worth a bet before the exchange but not
/// after it, and pairs never put money in: they check when they can and
/// fold otherwise.
#[derive(Debug, Clone)]
pub struct CategoryStrategy<R> {
    rng: R,
    round_one_max: u32,
}

impl<R: Rng> CategoryStrategy<R> {
    /// `round_one_max` is the maximum bet of the first betting round. It's
    /// how the strategy tells the two rounds apart.
    pub fn new(round_one_max: u32, rng: R) -> Self {
        Self { rng, round_one_max }
    }

    /// The target for a category in the first round (`max <= 15` by
    /// default) or the second.
    fn tier(category: Category, first_round: bool) -> u32 {
        match (category, first_round) {
            (Category::FiveCard, true) => 11,
            (Category::RoyalStraightFlush | Category::FourCard, true) => 10,
            (Category::FullHouse | Category::Straight, true) => 10,
            (Category::ThreeCard, true) => 8,
            (Category::FiveCard | Category::RoyalStraightFlush | Category::FourCard, false) => 28,
            (Category::FullHouse, false) => 18,
            (Category::Straight, false) => 17,
            _ => 0,
        }
    }
}

impl<R: Rng + Send> Strategy for CategoryStrategy<R> {
    fn bet_target(&mut self, hand: &Hand, bounds: BetBounds) -> Result<u32, ArenaError> {
        let category = hand.rank()?.category;
        let first_round = bounds.max <= self.round_one_max;
        let tier = Self::tier(category, first_round);
        if tier == 0 {
            return Ok(0);
        }
        Ok(bounds.clamp(tier))
    }

    fn opening_bet(&mut self, bounds: BetBounds, target: u32) -> Option<u32> {
        (target >= bounds.min).then_some(target)
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn target(hand: &str, bounds: BetBounds) -> u32 {
        let mut s = CategoryStrategy::new(15, StdRng::seed_from_u64(0));
        s.bet_target(&Hand::new_from_str(hand).unwrap(), bounds)
            .unwrap()
    }

    #[test]
    fn test_round_one_tiers() {
        let bounds = BetBounds::new(5, 15);
        assert_eq!(11, target("SA,HA,DA,CA,J", bounds));
        assert_eq!(10, target("SA,HA,DA,CA,SK", bounds));
        assert_eq!(10, target("SA,HK,DQ,CJ,J", bounds));
        assert_eq!(8, target("SA,HA,DA,CK,CJ", bounds));
        assert_eq!(0, target("SA,HA,SK,HK,CJ", bounds));
        assert_eq!(0, target("SA,HA,SK,DQ,CJ", bounds));
    }

    #[test]
    fn test_round_two_tiers() {
        let bounds = BetBounds::new(11, 30);
        assert_eq!(28, target("SA,HA,DA,CA,J", bounds));
        assert_eq!(18, target("SA,HA,DA,CK,SK", bounds));
        assert_eq!(17, target("SA,HK,DQ,CJ,J", bounds));
        assert_eq!(0, target("SA,HA,DA,CK,CJ", bounds));
    }

    #[test]
    fn test_tier_below_a_high_minimum() {
        // Agreeing to 15 in round one puts the second round minimum at 16.
        let bounds = BetBounds::new(16, 30);
        assert_eq!(17, target("SA,HK,DQ,CJ,J", bounds));
        assert_eq!(28, target("SA,HA,DA,CA,SK", bounds));
    }

    #[test]
    fn test_pairs_never_open() {
        let mut s = CategoryStrategy::new(15, StdRng::seed_from_u64(0));
        assert_eq!(None, s.opening_bet(BetBounds::new(5, 15), 0));
        assert_eq!(Some(8), s.opening_bet(BetBounds::new(5, 15), 8));
    }
}
