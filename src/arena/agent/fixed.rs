use rand::{Rng, RngCore};

use crate::{
    arena::{betting::BetBounds, errors::ArenaError},
    core::Hand,
};

use super::Strategy;

/// Bets the same amount no matter the cards, brought into the bounds of
/// each round. Discards use the default singleton policy.
#[derive(Debug, Clone)]
pub struct FixedTargetStrategy<R> {
    target: u32,
    rng: R,
}

impl<R: Rng> FixedTargetStrategy<R> {
    pub fn new(target: u32, rng: R) -> Self {
        Self { target, rng }
    }
}

impl<R: Rng + Send> Strategy for FixedTargetStrategy<R> {
    fn bet_target(&mut self, _hand: &Hand, bounds: BetBounds) -> Result<u32, ArenaError> {
        Ok(bounds.clamp(self.target))
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }
}
