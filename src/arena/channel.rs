//! The two way line channel between a host and one agent.
//!
//! Each direction is a bounded `tokio::sync::mpsc` queue of lines. The host
//! keeps a `HostLink`, the agent an `AgentLink`. The only place an agent
//! waits is `AgentLink::recv_instruction`, which gives up after a timeout
//! so a silent host can't hang it forever.
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{Level, event};

use super::{
    errors::ArenaError,
    protocol::{Instruction, Response},
};

/// How many lines can queue up in each direction.
pub const DEFAULT_CAPACITY: usize = 64;

/// Create a connected pair of links.
///
/// ```
/// use fate17::arena::channel::link_pair;
///
/// let (host, agent) = link_pair(8);
/// ```
pub fn link_pair(capacity: usize) -> (HostLink, AgentLink) {
    let (instruction_tx, instruction_rx) = mpsc::channel(capacity);
    let (response_tx, response_rx) = mpsc::channel(capacity);
    (
        HostLink {
            instructions: instruction_tx,
            responses: response_rx,
        },
        AgentLink {
            instructions: instruction_rx,
            responses: response_tx,
        },
    )
}

/// The agent's end: instructions in, responses out.
#[derive(Debug)]
pub struct AgentLink {
    instructions: mpsc::Receiver<String>,
    responses: mpsc::Sender<String>,
}

impl AgentLink {
    /// Wait up to `timeout` for the next line and parse it.
    pub async fn recv_instruction(&mut self, timeout: Duration) -> Result<Instruction, ArenaError> {
        let line = match tokio::time::timeout(timeout, self.instructions.recv()).await {
            Ok(Some(line)) => line,
            Ok(None) => return Err(ArenaError::ChannelClosed),
            Err(_) => return Err(ArenaError::ChannelStall { waited: timeout }),
        };
        event!(Level::TRACE, %line, "instruction_received");
        line.parse()
    }

    pub async fn send_response(&self, response: &Response) -> Result<(), ArenaError> {
        let line = response.to_string();
        event!(Level::TRACE, %line, "response_sent");
        self.responses
            .send(line)
            .await
            .map_err(|_| ArenaError::ChannelClosed)
    }
}

/// The host's end: instructions out, responses in.
#[derive(Debug)]
pub struct HostLink {
    instructions: mpsc::Sender<String>,
    responses: mpsc::Receiver<String>,
}

impl HostLink {
    pub async fn send(&self, instruction: &Instruction) -> Result<(), ArenaError> {
        self.send_line(instruction.to_string()).await
    }

    /// Send a raw line. Handy for feeding an agent something that isn't a
    /// valid instruction.
    pub async fn send_line(&self, line: impl Into<String>) -> Result<(), ArenaError> {
        self.instructions
            .send(line.into())
            .await
            .map_err(|_| ArenaError::ChannelClosed)
    }

    /// The next raw line from the agent.
    pub async fn recv_line(&mut self) -> Result<String, ArenaError> {
        self.responses.recv().await.ok_or(ArenaError::ChannelClosed)
    }

    /// The next line from the agent, parsed as a decision response.
    pub async fn recv_response(&mut self) -> Result<Response, ArenaError> {
        self.recv_line().await?.parse()
    }
}

#[cfg(test)]
mod tests {
    use crate::arena::protocol::{Order, Request};

    use super::*;

    const WAIT: Duration = Duration::from_secs(30);

    #[tokio::test]
    async fn test_lines_flow_both_ways() {
        let (mut host, mut agent) = link_pair(4);

        host.send(&Instruction::Order(Order::First)).await.unwrap();
        host.send_line("action:bet,check").await.unwrap();
        assert_eq!(
            Instruction::Order(Order::First),
            agent.recv_instruction(WAIT).await.unwrap()
        );
        assert_eq!(
            Instruction::Request(Request::BetOrCheck),
            agent.recv_instruction(WAIT).await.unwrap()
        );

        agent.send_response(&Response::Bet(7)).await.unwrap();
        assert_eq!(Response::Bet(7), host.recv_response().await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_line() {
        let (host, mut agent) = link_pair(4);
        host.send_line("dance").await.unwrap();
        assert_eq!(
            ArenaError::MalformedInstruction("dance".to_string()),
            agent.recv_instruction(WAIT).await.unwrap_err()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stall() {
        let (_host, mut agent) = link_pair(4);
        let waited = Duration::from_secs(5);
        assert_eq!(
            ArenaError::ChannelStall { waited },
            agent.recv_instruction(waited).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_closed() {
        let (host, mut agent) = link_pair(4);
        drop(host);
        assert_eq!(
            ArenaError::ChannelClosed,
            agent.recv_instruction(WAIT).await.unwrap_err()
        );
        assert_eq!(
            ArenaError::ChannelClosed,
            agent.send_response(&Response::Fold).await.unwrap_err()
        );
    }
}
