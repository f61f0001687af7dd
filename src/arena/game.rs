//! A single game, from the order being handed out to the balance moving.
//!
//! `Game` is a synchronous state machine. The session feeds it one
//! instruction at a time and sends back whatever response it produces.
//! Money only moves through the game's `GameLedger`, which the session
//! commits once the game is over.
use std::cmp::min;

use tracing::{Level, event};

use crate::core::{Card, Fate17Error, HAND_SIZE, Hand};

use super::{
    Strategy,
    betting::{BetBounds, BettingRound, RoundOutcome, RoundResult},
    errors::ArenaError,
    ledger::Seat,
    protocol::{Instruction, OpponentMove, Order, Request, Response, Verdict},
    session::StrategyConfig,
};

/// Which of the two betting rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BettingInterval {
    One,
    Two,
}

/// How a game finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEnd {
    /// A betting round ended without agreement or with both checking.
    Betting {
        interval: BettingInterval,
        outcome: RoundOutcome,
    },
    /// Both rounds were agreed and the hands were compared.
    Showdown(Verdict),
    /// The host broke the protocol and the game was given up.
    Abandoned,
}

/// Money moving during one game. Deductions and credits are kept apart so
/// a record shows both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameLedger {
    pub paid: u32,
    pub received: u32,
}

impl GameLedger {
    fn pay(&mut self, amount: u32) {
        self.paid = self.paid.saturating_add(amount);
    }

    fn receive(&mut self, amount: u32) {
        self.received = self.received.saturating_add(amount);
    }

    /// What the game did to the balance.
    pub fn net(&self) -> i64 {
        i64::from(self.received) - i64::from(self.paid)
    }
}

/// Everything worth remembering about a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameRecord {
    /// One based game number within the session.
    pub index: usize,
    pub order: Option<Order>,
    pub ante: u32,
    /// The hand as dealt.
    pub dealt: Option<Hand>,
    /// The hand after the exchange, when there was one.
    pub exchanged: Option<Hand>,
    pub discarded: usize,
    pub opponent_discarded: Option<usize>,
    pub round_one: Option<RoundResult>,
    pub round_two: Option<RoundResult>,
    pub opponent_hand: Option<Vec<Card>>,
    pub end: Option<GameEnd>,
    pub ledger: GameLedger,
    /// Why the game was abandoned.
    pub violation: Option<String>,
}

impl GameRecord {
    fn new(index: usize) -> Self {
        Self {
            index,
            order: None,
            ante: 0,
            dealt: None,
            exchanged: None,
            discarded: 0,
            opponent_discarded: None,
            round_one: None,
            round_two: None,
            opponent_hand: None,
            end: None,
            ledger: GameLedger::default(),
            violation: None,
        }
    }

    /// What the game did to the balance.
    pub fn net(&self) -> i64 {
        self.ledger.net()
    }
}

/// Where in the card exchange the agent is.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Exchange {
    /// Waiting for `action:change`. `leads` is true when this agent
    /// exchanges before the opponent.
    AwaitRequest { leads: bool, max: usize },
    /// Sent `change`, waiting for the replacements.
    AwaitReplacements { leads: bool, discards: Vec<Card> },
    /// Waiting to hear how many cards the opponent exchanged.
    AwaitOpponent { leads: bool },
}

#[derive(Debug, Clone)]
enum Phase {
    AwaitOrder,
    AwaitAnte,
    AwaitDeal,
    Betting(BettingInterval, BettingRound),
    Exchange(Exchange),
    AwaitOpponentHand,
    AwaitVerdict,
    Finished,
    /// An instruction broke the game.
    Failed,
}

impl Phase {
    fn expected(&self) -> &'static str {
        match self {
            Phase::AwaitOrder => "waiting for first or second",
            Phase::AwaitAnte => "waiting for the ante",
            Phase::AwaitDeal => "waiting for the deal",
            Phase::Betting(..) => "betting",
            Phase::Exchange(Exchange::AwaitRequest { .. }) => "waiting for action:change",
            Phase::Exchange(Exchange::AwaitReplacements { .. }) => "waiting for replacement cards",
            Phase::Exchange(Exchange::AwaitOpponent { .. }) => "waiting for the opponent to change",
            Phase::AwaitOpponentHand => "waiting for the opponent's cards",
            Phase::AwaitVerdict => "waiting for win, lose or tie",
            Phase::Finished => "the game is over",
            Phase::Failed => "the game has failed",
        }
    }
}

/// One game of fate17 as seen by this agent.
#[derive(Debug, Clone)]
pub struct Game {
    phase: Phase,
    hand: Option<Hand>,
    record: GameRecord,
    ante: u32,
    round_one_bounds: BetBounds,
    round_two_max: u32,
    max_discards: usize,
    exchange_limit: usize,
}

impl Game {
    pub fn new(index: usize, config: &StrategyConfig) -> Self {
        Self {
            phase: Phase::AwaitOrder,
            hand: None,
            record: GameRecord::new(index),
            ante: config.ante,
            round_one_bounds: config.round_one,
            round_two_max: config.round_two_max,
            max_discards: min(config.max_discards, HAND_SIZE),
            exchange_limit: config.exchange_limit,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    /// Did an instruction break this game? A failed game never finishes
    /// and should be abandoned.
    pub fn is_failed(&self) -> bool {
        matches!(self.phase, Phase::Failed)
    }

    /// The current hand, once dealt.
    pub fn hand(&self) -> Option<&Hand> {
        self.hand.as_ref()
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn into_record(self) -> GameRecord {
        self.record
    }

    /// Give up on this game. Nothing it paid or won is kept.
    pub fn abandon(mut self, error: &ArenaError) -> GameRecord {
        self.record.end = Some(GameEnd::Abandoned);
        self.record.ledger = GameLedger::default();
        self.record.violation = Some(error.to_string());
        self.record
    }

    fn violation(instruction: &Instruction, phase: &Phase) -> ArenaError {
        ArenaError::ProtocolViolation {
            instruction: instruction.to_string(),
            expected: phase.expected(),
        }
    }

    fn current_hand(&self) -> Result<Hand, ArenaError> {
        self.hand.ok_or(ArenaError::ProtocolViolation {
            instruction: String::new(),
            expected: "a dealt hand",
        })
    }

    /// Apply one instruction and return the response for the host, if any.
    ///
    /// After an error the game is failed and can't go on.
    pub fn handle(
        &mut self,
        instruction: &Instruction,
        strategy: &mut dyn Strategy,
    ) -> Result<Option<Response>, ArenaError> {
        let phase = std::mem::replace(&mut self.phase, Phase::Failed);
        let (next, response) = match (phase, instruction) {
            (Phase::AwaitOrder, Instruction::Order(order)) => {
                self.record.order = Some(*order);
                (Phase::AwaitAnte, None)
            }
            (Phase::AwaitAnte, Instruction::Ante(amount)) => {
                let ante = amount.unwrap_or(self.ante);
                self.record.ante = ante;
                self.record.ledger.pay(ante);
                event!(Level::DEBUG, ante, "ante_paid");
                (Phase::AwaitDeal, None)
            }
            (Phase::AwaitDeal, Instruction::Cards(cards)) => {
                let hand = Hand::new_with_cards(cards.clone())?;
                self.hand = Some(hand);
                self.record.dealt = Some(hand);
                let target = strategy.bet_target(&hand, self.round_one_bounds)?;
                event!(Level::DEBUG, %hand, target, "hand_dealt");
                let round = BettingRound::new(self.round_one_bounds, target);
                (Phase::Betting(BettingInterval::One, round), None)
            }
            (Phase::Betting(interval, mut round), _) => {
                let response = round.handle(instruction, strategy)?;
                let next = match round.result() {
                    Some(result) => self.finish_round(interval, result),
                    None => Phase::Betting(interval, round),
                };
                (next, response)
            }
            (Phase::Exchange(exchange), _) => self.exchange(exchange, instruction, strategy)?,
            (Phase::AwaitOpponentHand, Instruction::Opponent(OpponentMove::Cards(cards))) => {
                self.record.opponent_hand = Some(cards.clone());
                (Phase::AwaitVerdict, None)
            }
            (Phase::AwaitVerdict, Instruction::Verdict(verdict)) => {
                self.showdown(*verdict);
                (Phase::Finished, None)
            }
            (phase, _) => return Err(Self::violation(instruction, &phase)),
        };
        self.phase = next;
        Ok(response)
    }

    fn finish_round(&mut self, interval: BettingInterval, result: RoundResult) -> Phase {
        let outcome = result.outcome();
        self.record.ledger.pay(result.my_bet);
        event!(
            Level::DEBUG,
            ?interval,
            ?outcome,
            my_bet = result.my_bet,
            opp_bet = result.opp_bet,
            "betting_round_finished"
        );

        match interval {
            BettingInterval::One => {
                self.record.round_one = Some(result);
                match outcome {
                    RoundOutcome::Agreed { setter } => {
                        let exchange = if setter == Seat::Me {
                            Exchange::AwaitRequest {
                                leads: true,
                                max: self.max_discards,
                            }
                        } else {
                            Exchange::AwaitOpponent { leads: false }
                        };
                        Phase::Exchange(exchange)
                    }
                    RoundOutcome::Won => {
                        self.record.ledger.receive(result.pot());
                        self.end(interval, outcome)
                    }
                    RoundOutcome::BothChecked | RoundOutcome::Folded => self.end(interval, outcome),
                }
            }
            BettingInterval::Two => {
                self.record.round_two = Some(result);
                let round_one = self.record.round_one.unwrap_or(RoundResult {
                    my_bet: 0,
                    opp_bet: 0,
                    is_setter: None,
                });
                match outcome {
                    RoundOutcome::Agreed { .. } => Phase::AwaitOpponentHand,
                    // The host splits the pot, so round one comes back.
                    RoundOutcome::BothChecked => {
                        self.record.ledger.receive(round_one.my_bet);
                        self.end(interval, outcome)
                    }
                    RoundOutcome::Won => {
                        self.record.ledger.receive(round_one.pot() + result.pot());
                        self.end(interval, outcome)
                    }
                    RoundOutcome::Folded => self.end(interval, outcome),
                }
            }
        }
    }

    fn end(&mut self, interval: BettingInterval, outcome: RoundOutcome) -> Phase {
        self.record.end = Some(GameEnd::Betting { interval, outcome });
        Phase::Finished
    }

    fn start_round_two(&mut self, strategy: &mut dyn Strategy) -> Result<Phase, ArenaError> {
        let hand = self.current_hand()?;
        let my_round_one = self.record.round_one.map_or(0, |r| r.my_bet);
        let bounds = BetBounds::after_round_one(my_round_one, self.round_two_max);
        let target = strategy.bet_target(&hand, bounds)?;
        event!(Level::DEBUG, %hand, target, min = bounds.min, max = bounds.max, "round_two_target");
        Ok(Phase::Betting(
            BettingInterval::Two,
            BettingRound::new(bounds, target),
        ))
    }

    fn exchange(
        &mut self,
        exchange: Exchange,
        instruction: &Instruction,
        strategy: &mut dyn Strategy,
    ) -> Result<(Phase, Option<Response>), ArenaError> {
        match (exchange, instruction) {
            (Exchange::AwaitRequest { leads, max }, Instruction::Request(Request::Change)) => {
                let hand = self.current_hand()?;
                let mut discards = strategy.select_discards(&hand, max)?;
                discards.truncate(max);
                if let Some(missing) = discards.iter().find(|c| !hand.contains(c)) {
                    return Err(Fate17Error::CardNotInHand(*missing).into());
                }
                self.record.discarded = discards.len();
                let response = Response::Change(discards.clone());
                Ok((
                    Phase::Exchange(Exchange::AwaitReplacements { leads, discards }),
                    Some(response),
                ))
            }
            (Exchange::AwaitReplacements { leads, discards }, Instruction::Cards(replacements)) => {
                if replacements.len() != discards.len() {
                    return Err(ArenaError::ProtocolViolation {
                        instruction: instruction.to_string(),
                        expected: "as many replacements as discards",
                    });
                }
                let hand = self.current_hand()?.exchange(&discards, replacements)?;
                self.hand = Some(hand);
                self.record.exchanged = Some(hand);
                event!(Level::DEBUG, %hand, discarded = discards.len(), "cards_exchanged");
                if leads {
                    Ok((Phase::Exchange(Exchange::AwaitOpponent { leads }), None))
                } else {
                    Ok((self.start_round_two(strategy)?, None))
                }
            }
            (Exchange::AwaitOpponent { leads }, Instruction::Opponent(OpponentMove::Change(n))) => {
                self.record.opponent_discarded = Some(*n);
                if leads {
                    Ok((self.start_round_two(strategy)?, None))
                } else {
                    let max = min(self.max_discards, self.exchange_limit.saturating_sub(*n));
                    Ok((
                        Phase::Exchange(Exchange::AwaitRequest { leads, max }),
                        None,
                    ))
                }
            }
            (exchange, _) => Err(Self::violation(instruction, &Phase::Exchange(exchange))),
        }
    }

    fn showdown(&mut self, verdict: Verdict) {
        let my_bets = self.record.round_one.map_or(0, |r| r.my_bet)
            + self.record.round_two.map_or(0, |r| r.my_bet);
        let stake = my_bets.saturating_add(self.record.ante);
        match verdict {
            Verdict::Win => self.record.ledger.receive(stake.saturating_mul(2)),
            Verdict::Tie => self.record.ledger.receive(stake),
            Verdict::Lose => {}
        }
        self.record.end = Some(GameEnd::Showdown(verdict));
        event!(Level::DEBUG, ?verdict, net = self.record.net(), "showdown");
    }
}
