//! fate17 is a library for the player side of fate17, a five card
//! draw game played heads up with a 17 card deck: the aces, kings,
//! queens and jacks of every suit plus a single wild joker.
//!
//! The `core` module ranks hands. The `arena` module has the betting
//! state machine, the pot ledger, the pluggable strategies and the async
//! runtime that plays a session of games against a host over a pair of
//! channels.
//!
//! ```
//! use fate17::core::{Category, Hand, Rankable};
//!
//! let hand = Hand::new_from_str("SA,HK,DQ,CJ,J").unwrap();
//! assert_eq!(Category::Straight, hand.rank().unwrap().category);
//! ```

/// Allow all the core card functionality to be used
/// externally. Everything in core is pure and deterministic.
pub mod core;

/// The betting protocol, strategies and the agent runtime.
#[cfg(feature = "arena")]
pub mod arena;
