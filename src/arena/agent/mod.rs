//! `Strategy`s are the decision making half of an agent. The session
//! handles the protocol and the bookkeeping, then asks the strategy how
//! much a hand is worth, whether to open the betting and which cards to
//! throw away.
//!
//! A few strategies are provided. They all take an injected `Rng` so runs
//! can be made deterministic by seeding.
mod category;
mod fixed;
mod score;

pub use self::category::CategoryStrategy;
pub use self::fixed::FixedTargetStrategy;
pub use self::score::ScoreStrategy;

use rand::{Rng, RngCore, seq::SliceRandom};

use crate::core::{Card, Hand, RankCounts, Rankable};

use super::{betting::BetBounds, errors::ArenaError};

/// This is the trait that you need to implement in order to play with a
/// different strategy. It's up to you to implement the logic and state.
pub trait Strategy: Send {
    /// How much this hand is worth betting within `bounds`. The betting
    /// round raises up to the target, calls at it and folds above it.
    ///
    /// Returning less than `bounds.min` means never putting money in
    /// unless the opening bet decides otherwise.
    fn bet_target(&mut self, hand: &Hand, bounds: BetBounds) -> Result<u32, ArenaError>;

    /// What to do when nobody has bet yet. `None` checks, `Some` bets the
    /// amount, which the betting round clamps into `[bounds.min, target]`.
    fn opening_bet(&mut self, _bounds: BetBounds, target: u32) -> Option<u32> {
        Some(target)
    }

    /// The cards to exchange, at most `max` of them.
    fn select_discards(&mut self, hand: &Hand, max: usize) -> Result<Vec<Card>, ArenaError> {
        singleton_discards(hand, max, self.rng())
    }

    /// The randomness this strategy draws from.
    fn rng(&mut self) -> &mut dyn RngCore;
}

impl Strategy for Box<dyn Strategy> {
    fn bet_target(&mut self, hand: &Hand, bounds: BetBounds) -> Result<u32, ArenaError> {
        self.as_mut().bet_target(hand, bounds)
    }

    fn opening_bet(&mut self, bounds: BetBounds, target: u32) -> Option<u32> {
        self.as_mut().opening_bet(bounds, target)
    }

    fn select_discards(&mut self, hand: &Hand, max: usize) -> Result<Vec<Card>, ArenaError> {
        self.as_mut().select_discards(hand, max)
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        self.as_mut().rng()
    }
}

/// The default exchange policy.
///
/// Hands that can't improve keep everything. Otherwise every non joker
/// card whose value appears only once goes. If that's more than `max`
/// cards a random subset of `max` of them is picked. The result keeps the
/// order the cards have in the hand.
pub fn singleton_discards<R: Rng + ?Sized>(
    hand: &Hand,
    max: usize,
    rng: &mut R,
) -> Result<Vec<Card>, ArenaError> {
    let result = hand.rank()?;
    if result.category.keeps_all_cards() {
        return Ok(vec![]);
    }

    let counts = RankCounts::new(hand.iter());
    let mut candidates: Vec<Card> = hand
        .iter()
        .filter(|c| c.value().is_some_and(|v| counts.count(v) == 1))
        .copied()
        .collect();

    if candidates.len() > max {
        candidates.shuffle(rng);
        candidates.truncate(max);
        candidates.sort_by_key(|c| hand.iter().position(|h| h == c));
    }
    Ok(candidates)
}

/// Draw from the triangular distribution on `[low, high]` peaking at
/// `mode`, by inverting its cumulative distribution.
pub(crate) fn triangular<R: Rng + ?Sized>(rng: &mut R, low: f64, mode: f64, high: f64) -> f64 {
    let width = high - low;
    if width <= 0.0 {
        return mode;
    }
    let u: f64 = rng.random();
    let split = (mode - low) / width;
    if u < split {
        low + (u * width * (mode - low)).sqrt()
    } else {
        high - ((1.0 - u) * width * (high - mode)).sqrt()
    }
}
