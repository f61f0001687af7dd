use std::time::Duration;

use thiserror::Error;

use crate::core::Fate17Error;

use super::session::SessionReport;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    #[error("Unexpected instruction {instruction:?} while {expected}")]
    ProtocolViolation {
        instruction: String,
        expected: &'static str,
    },
    #[error("Unable to parse instruction {0:?}")]
    MalformedInstruction(String),
    #[error("Unable to parse response {0:?}")]
    MalformedResponse(String),
    #[error("No instruction received after {waited:?}")]
    ChannelStall { waited: Duration },
    #[error("The other side of the channel hung up")]
    ChannelClosed,
    #[error("Card error: {0}")]
    Card(#[from] Fate17Error),
    #[error("Need a strategy to play")]
    NeedStrategy,
    #[error("Need a channel to the host")]
    NeedLink,
}

impl ArenaError {
    /// Did the host send something that doesn't fit the protocol?
    ///
    /// These spoil a single game but leave the channel usable, so a session
    /// can give up on the game and carry on with the next one.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            ArenaError::ProtocolViolation { .. }
                | ArenaError::MalformedInstruction(_)
                | ArenaError::Card(_)
        )
    }
}

/// A session that ended early. The report covers the games played before
/// the error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Session ended after {} games: {error}", .report.games_played)]
pub struct SessionError {
    #[source]
    pub error: ArenaError,
    pub report: SessionReport,
}
