use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{Instrument, Level, debug_span, event, trace_span};

use super::{
    Strategy,
    betting::BetBounds,
    channel::AgentLink,
    errors::{ArenaError, SessionError},
    game::{Game, GameEnd, GameRecord},
    protocol::{Instruction, Response},
};

/// What to do when the host breaks the protocol in the middle of a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViolationPolicy {
    /// End the session with the error.
    #[default]
    Abort,
    /// Log it, give up on the game without touching the balance, and pick
    /// up again at the next `first` or `second`.
    AbandonGame,
}

/// The rules of the table and how the agent deals with the host.
///
/// The defaults are the standard fate17 table: ante 5, first round bets
/// between 5 and 15, second round bets up to 30, at most 7 cards to go
/// around in the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyConfig {
    pub name: String,
    /// Used when the host sends a bare `ante`.
    pub ante: u32,
    pub round_one: BetBounds,
    /// The second round minimum is one more than this agent's first round
    /// bet.
    pub round_two_max: u32,
    /// The most cards the agent will exchange when it goes first.
    pub max_discards: usize,
    /// Cards left in the deck for both exchanges together.
    pub exchange_limit: usize,
    pub receive_timeout: Duration,
    pub violation_policy: ViolationPolicy,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            name: "fate17".to_string(),
            ante: 5,
            round_one: BetBounds::new(5, 15),
            round_two_max: 30,
            max_discards: 5,
            exchange_limit: 7,
            receive_timeout: Duration::from_secs(30),
            violation_policy: ViolationPolicy::Abort,
        }
    }
}

/// The result of a whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionReport {
    pub name: String,
    pub games_played: usize,
    pub balance: i64,
    pub records: Vec<GameRecord>,
}

impl SessionReport {
    /// How many games were abandoned.
    pub fn violations(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.end == Some(GameEnd::Abandoned))
            .count()
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One agent playing a fixed number of games against a host.
///
/// Build it with `PlayerSessionBuilder`, then `run` it or `spawn` it onto
/// the tokio runtime.
pub struct PlayerSession {
    config: StrategyConfig,
    game_count: usize,
    strategy: Box<dyn Strategy>,
    link: AgentLink,
    balance: i64,
    records: Vec<GameRecord>,
}

impl PlayerSession {
    /// The first line sent to the host.
    pub fn greeting(&self) -> String {
        format!("{} report for {} games", self.config.name, self.game_count)
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Play every game and report. The session is consumed, the link is
    /// dropped at the end which tells the host the agent is gone.
    ///
    /// If the session can't go on, the error carries the report of the
    /// games played so far.
    pub async fn run(self) -> Result<SessionReport, SessionError> {
        let span = debug_span!(
            "PlayerSession::run",
            name = %self.config.name,
            game_count = self.game_count
        );
        self.run_games().instrument(span).await
    }

    /// Run the session as its own tokio task.
    pub fn spawn(self) -> JoinHandle<Result<SessionReport, SessionError>> {
        tokio::spawn(self.run())
    }

    async fn run_games(mut self) -> Result<SessionReport, SessionError> {
        if let Err(error) = self
            .link
            .send_response(&Response::Greeting(self.greeting()))
            .await
        {
            return Err(self.abort(error));
        }

        let mut carried = None;
        for index in 1..=self.game_count {
            let mut game = Game::new(index, &self.config);
            let played = self
                .play_game(&mut game, carried.take())
                .instrument(trace_span!("game", index))
                .await;

            match played {
                Ok(()) => {
                    let record = game.into_record();
                    self.balance += record.net();
                    event!(
                        Level::DEBUG,
                        index,
                        net = record.net(),
                        balance = self.balance,
                        "game_finished"
                    );
                    self.records.push(record);
                }
                Err(GameFailure { error, instruction })
                    if error.is_protocol_violation()
                        && self.config.violation_policy == ViolationPolicy::AbandonGame =>
                {
                    event!(Level::WARN, index, %error, "game_abandoned");
                    self.records.push(game.abandon(&error));
                    if index < self.game_count {
                        carried = match instruction {
                            // The host has already moved on to the next game.
                            Some(order @ Instruction::Order(_)) => Some(order),
                            _ => match self.resync().await {
                                Ok(order) => Some(order),
                                Err(error) => return Err(self.abort(error)),
                            },
                        };
                    }
                }
                Err(GameFailure { error, .. }) => return Err(self.abort(error)),
            }
        }

        let report = self.report();
        Self::log_report(&report);
        Ok(report)
    }

    /// The report of every game played so far.
    fn report(&mut self) -> SessionReport {
        SessionReport {
            name: self.config.name.clone(),
            games_played: self.records.len(),
            balance: self.balance,
            records: std::mem::take(&mut self.records),
        }
    }

    fn log_report(report: &SessionReport) {
        event!(
            Level::INFO,
            name = %report.name,
            games_played = report.games_played,
            balance = report.balance,
            violations = report.violations(),
            "session_report"
        );
    }

    fn abort(&mut self, error: ArenaError) -> SessionError {
        event!(Level::WARN, %error, "session_aborted");
        let report = self.report();
        Self::log_report(&report);
        SessionError { error, report }
    }

    async fn play_game(
        &mut self,
        game: &mut Game,
        mut carried: Option<Instruction>,
    ) -> Result<(), GameFailure> {
        while !game.is_finished() {
            let instruction = match carried.take() {
                Some(instruction) => instruction,
                None => {
                    self.link
                        .recv_instruction(self.config.receive_timeout)
                        .await?
                }
            };
            match game.handle(&instruction, self.strategy.as_mut()) {
                Ok(Some(response)) => self.link.send_response(&response).await?,
                Ok(None) => {}
                Err(error) => {
                    return Err(GameFailure {
                        error,
                        instruction: Some(instruction),
                    });
                }
            }
        }
        Ok(())
    }

    /// Skip everything up to the start of the next game.
    async fn resync(&mut self) -> Result<Instruction, ArenaError> {
        loop {
            match self
                .link
                .recv_instruction(self.config.receive_timeout)
                .await
            {
                Ok(instruction @ Instruction::Order(_)) => return Ok(instruction),
                Ok(instruction) => {
                    event!(Level::TRACE, %instruction, "instruction_skipped");
                }
                Err(ArenaError::MalformedInstruction(line)) => {
                    event!(Level::TRACE, %line, "instruction_skipped");
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// Why a game couldn't be finished. `instruction` is the line the game
/// rejected, if it got that far.
struct GameFailure {
    error: ArenaError,
    instruction: Option<Instruction>,
}

impl From<ArenaError> for GameFailure {
    fn from(error: ArenaError) -> Self {
        Self {
            error,
            instruction: None,
        }
    }
}

/// # PlayerSessionBuilder
///
/// A strategy and a link to the host are required, everything else has a
/// default. The name set here wins over the name in the config.
///
/// ## Examples
///
/// ```
/// use fate17::arena::{
///     PlayerSessionBuilder, ScoreStrategy,
///     channel::{DEFAULT_CAPACITY, link_pair},
/// };
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let (_host, agent) = link_pair(DEFAULT_CAPACITY);
/// let session = PlayerSessionBuilder::default()
///     .name("sandy")
///     .strategy(ScoreStrategy::new(StdRng::seed_from_u64(420)))
///     .game_count(10)
///     .link(agent)
///     .build()
///     .unwrap();
/// assert_eq!("sandy report for 10 games", session.greeting());
/// ```
#[derive(Default)]
pub struct PlayerSessionBuilder {
    name: Option<String>,
    strategy: Option<Box<dyn Strategy>>,
    config: Option<StrategyConfig>,
    game_count: Option<usize>,
    link: Option<AgentLink>,
}

impl PlayerSessionBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn strategy<S: Strategy + 'static>(mut self, strategy: S) -> Self {
        self.strategy = Some(Box::new(strategy));
        self
    }

    /// Set the table rules. If not set the defaults are used.
    pub fn config(mut self, config: StrategyConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// How many games to play. Defaults to one.
    pub fn game_count(mut self, game_count: usize) -> Self {
        self.game_count = Some(game_count);
        self
    }

    pub fn link(mut self, link: AgentLink) -> Self {
        self.link = Some(link);
        self
    }

    /// @returns ArenaError if no strategy or no link was given.
    pub fn build(self) -> Result<PlayerSession, ArenaError> {
        let strategy = self.strategy.ok_or(ArenaError::NeedStrategy)?;
        let link = self.link.ok_or(ArenaError::NeedLink)?;

        let mut config = self.config.unwrap_or_default();
        if let Some(name) = self.name {
            config.name = name;
        }

        Ok(PlayerSession {
            config,
            game_count: self.game_count.unwrap_or(1),
            strategy,
            link,
            balance: 0,
            records: vec![],
        })
    }
}
