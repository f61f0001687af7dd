//! This is the arena module, the player side of a fate17 table.
//!
//! A host deals the cards and runs the table. Each agent talks to it over
//! a pair of line channels. The pieces, bottom up:
//!
//! - `protocol` parses and formats the lines.
//! - `ledger` tracks a betting round's pot.
//! - `betting` is the betting round state machine.
//! - `agent` holds the `Strategy` trait and the strategies that come with
//!   the crate.
//! - `game` drives one game from the order to the balance change.
//! - `session` plays a run of games and reports the balance.
//!
//! # Example
//!
//! ```
//! use fate17::arena::{
//!     FixedTargetStrategy, PlayerSessionBuilder,
//!     channel::{DEFAULT_CAPACITY, link_pair},
//!     protocol::Response,
//! };
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let rt = tokio::runtime::Builder::new_current_thread()
//!     .enable_time()
//!     .build()
//!     .unwrap();
//!
//! rt.block_on(async {
//!     let (mut host, agent) = link_pair(DEFAULT_CAPACITY);
//!     let session = PlayerSessionBuilder::default()
//!         .name("sandy")
//!         .strategy(FixedTargetStrategy::new(10, StdRng::seed_from_u64(420)))
//!         .link(agent)
//!         .build()
//!         .unwrap()
//!         .spawn();
//!
//!     assert_eq!("sandy report for 1 games", host.recv_line().await.unwrap());
//!     for line in ["first", "ante", "cards SA,HA,SK,DQ,CJ", "action:bet,check"] {
//!         host.send_line(line).await.unwrap();
//!     }
//!     assert_eq!(Response::Bet(10), host.recv_response().await.unwrap());
//!     host.send_line("opponent fold").await.unwrap();
//!
//!     // The bet came back but the ante is gone.
//!     let report = session.await.unwrap().unwrap();
//!     assert_eq!(-5, report.balance);
//! });
//! ```
pub mod agent;
pub mod betting;
pub mod channel;
pub mod errors;
pub mod game;
pub mod ledger;
pub mod protocol;
pub mod session;

#[cfg(any(test, feature = "arena-test-util"))]
pub mod test_util;

pub use agent::{
    CategoryStrategy, FixedTargetStrategy, ScoreStrategy, Strategy, singleton_discards,
};
pub use betting::{BetBounds, BettingRound, RoundOutcome, RoundResult};
pub use errors::{ArenaError, SessionError};
pub use game::{Game, GameEnd, GameRecord};
pub use ledger::{PotLedger, Seat};
pub use session::{
    PlayerSession, PlayerSessionBuilder, SessionReport, StrategyConfig, ViolationPolicy,
};
