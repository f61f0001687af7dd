use super::{
    channel::HostLink,
    errors::ArenaError,
    game::{GameEnd, GameRecord},
};

/// One step of a scripted host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostStep {
    /// Send this line to the agent.
    Send(String),
    /// Wait for a response and check it's exactly this line.
    Expect(String),
    /// Wait for a response and check it starts with this.
    ExpectPrefix(String),
}

/// A host that plays a fixed script against one agent. Mismatched
/// responses panic, so this is only for tests.
#[derive(Debug)]
pub struct ScriptedHost {
    link: HostLink,
    steps: Vec<HostStep>,
}

impl ScriptedHost {
    pub fn new(link: HostLink) -> Self {
        Self {
            link,
            steps: vec![],
        }
    }

    pub fn send(mut self, line: impl Into<String>) -> Self {
        self.steps.push(HostStep::Send(line.into()));
        self
    }

    /// Send several lines in a row.
    pub fn send_all<'a>(mut self, lines: impl IntoIterator<Item = &'a str>) -> Self {
        self.steps
            .extend(lines.into_iter().map(|l| HostStep::Send(l.to_string())));
        self
    }

    pub fn expect(mut self, line: impl Into<String>) -> Self {
        self.steps.push(HostStep::Expect(line.into()));
        self
    }

    pub fn expect_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.steps.push(HostStep::ExpectPrefix(prefix.into()));
        self
    }

    /// Play the script. Returns every line the agent sent, and the link so
    /// the caller decides when the agent sees the host hang up.
    pub async fn run(mut self) -> Result<(Vec<String>, HostLink), ArenaError> {
        let mut received = vec![];
        for step in self.steps {
            match step {
                HostStep::Send(line) => self.link.send_line(line).await?,
                HostStep::Expect(want) => {
                    let got = self.link.recv_line().await?;
                    assert_eq!(want, got);
                    received.push(got);
                }
                HostStep::ExpectPrefix(prefix) => {
                    let got = self.link.recv_line().await?;
                    assert!(got.starts_with(&prefix), "{got:?} doesn't start with {prefix:?}");
                    received.push(got);
                }
            }
        }
        Ok((received, self.link))
    }
}

/// Check a game record adds up.
pub fn assert_valid_game_record(record: &GameRecord) {
    assert_eq!(
        i64::from(record.ledger.received) - i64::from(record.ledger.paid),
        record.net()
    );

    if record.end == Some(GameEnd::Abandoned) {
        assert_eq!(0, record.net());
        assert!(record.violation.is_some());
        return;
    }
    assert!(record.end.is_some());
    assert!(record.violation.is_none());

    // Everything paid is the ante plus this agent's bets.
    let bets = record.round_one.map_or(0, |r| u64::from(r.my_bet))
        + record.round_two.map_or(0, |r| u64::from(r.my_bet));
    let paid = u64::from(record.ante) + bets;
    assert_eq!(paid.min(u64::from(u32::MAX)), u64::from(record.ledger.paid));

    // A second round only happens after an agreed first round.
    if let (Some(one), Some(_)) = (record.round_one, record.round_two) {
        assert_eq!(one.my_bet, one.opp_bet);
        assert!(one.my_bet > 0);
        assert!(record.exchanged.is_some());
    }

    // Nobody can win more than everything on the table.
    let table = 2 * u64::from(record.ante)
        + record.round_one.map_or(0, |r| u64::from(r.pot()))
        + record.round_two.map_or(0, |r| u64::from(r.pot()));
    assert!(u64::from(record.ledger.received) <= table);
}
