use tracing::{Level, event};

use super::{
    Strategy,
    errors::ArenaError,
    ledger::{PotLedger, Seat},
    protocol::{Instruction, OpponentMove, Request, Response},
};

/// The smallest and largest bet allowed in a betting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BetBounds {
    pub min: u32,
    pub max: u32,
}

impl BetBounds {
    /// Create new bounds. `max` is never allowed below `min`.
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    /// The second round has to beat what this agent agreed to in the first.
    pub fn after_round_one(my_round_one: u32, max: u32) -> Self {
        Self::new(my_round_one + 1, max)
    }

    /// How wide the range of allowed bets is.
    pub fn span(&self) -> u32 {
        self.max - self.min
    }

    /// Clamp an amount into the bounds.
    pub fn clamp(&self, amount: u32) -> u32 {
        amount.clamp(self.min, self.max)
    }
}

/// How a betting round ended, from this agent's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundOutcome {
    /// Nobody put any money in.
    BothChecked,
    /// Both put in the same amount. `setter` made the bet the other called.
    Agreed { setter: Seat },
    /// The opponent folded to this agent's bet.
    Won,
    /// This agent folded.
    Folded,
}

/// The contributions of a finished betting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundResult {
    pub my_bet: u32,
    pub opp_bet: u32,
    /// `Some(true)` when this agent made the last bet or raise, `Some(false)`
    /// when the opponent did, `None` when nobody bet.
    pub is_setter: Option<bool>,
}

impl RoundResult {
    pub fn outcome(&self) -> RoundOutcome {
        match (self.my_bet, self.opp_bet) {
            (0, 0) => RoundOutcome::BothChecked,
            (mine, theirs) if mine == theirs => RoundOutcome::Agreed {
                setter: if self.is_setter == Some(true) {
                    Seat::Me
                } else {
                    Seat::Opponent
                },
            },
            (mine, theirs) if mine > theirs => RoundOutcome::Won,
            _ => RoundOutcome::Folded,
        }
    }

    /// Both bets together.
    pub fn pot(&self) -> u32 {
        self.my_bet + self.opp_bet
    }
}

/// The state machine for a single betting round.
///
/// Feed it every instruction the host sends while the round lasts. It
/// answers the decision requests by asking the strategy, and keeps a
/// `PotLedger` of the round in sync with both players' bets.
///
/// # Examples
///
/// ```
/// use fate17::arena::{
///     BetBounds, BettingRound, FixedTargetStrategy,
///     protocol::{Instruction, Response},
/// };
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut strategy = FixedTargetStrategy::new(10, StdRng::seed_from_u64(1));
/// let mut round = BettingRound::new(BetBounds::new(5, 15), 10);
///
/// let bet = round
///     .handle(&"action:bet,check".parse().unwrap(), &mut strategy)
///     .unwrap();
/// assert_eq!(Some(Response::Bet(10)), bet);
///
/// let call: Instruction = "opponent call".parse().unwrap();
/// assert_eq!(None, round.handle(&call, &mut strategy).unwrap());
/// assert!(round.is_finished());
/// ```
#[derive(Debug, Clone)]
pub struct BettingRound {
    bounds: BetBounds,
    target: u32,
    my_bet: u32,
    opp_bet: u32,
    checked: bool,
    opp_checked: bool,
    is_setter: Option<bool>,
    ledger: PotLedger,
    finished: bool,
}

impl BettingRound {
    /// Start a round. Targets above the maximum are brought down to it. A
    /// target below the minimum means the agent won't put money in unless
    /// its opening bet says otherwise.
    pub fn new(bounds: BetBounds, target: u32) -> Self {
        Self {
            bounds,
            target: target.min(bounds.max),
            my_bet: 0,
            opp_bet: 0,
            checked: false,
            opp_checked: false,
            is_setter: None,
            ledger: PotLedger::new(),
            finished: false,
        }
    }

    pub fn bounds(&self) -> BetBounds {
        self.bounds
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn my_bet(&self) -> u32 {
        self.my_bet
    }

    pub fn opp_bet(&self) -> u32 {
        self.opp_bet
    }

    pub fn ledger(&self) -> &PotLedger {
        &self.ledger
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The contributions once the round has finished.
    pub fn result(&self) -> Option<RoundResult> {
        self.finished.then_some(RoundResult {
            my_bet: self.my_bet,
            opp_bet: self.opp_bet,
            is_setter: self.is_setter,
        })
    }

    /// Is there a bet on the table that this agent has to answer?
    fn facing_bet(&self) -> bool {
        self.opp_bet > self.my_bet
    }

    /// Is there a bet on the table that the opponent has to answer?
    fn awaiting_answer(&self) -> bool {
        self.my_bet > self.opp_bet
    }

    fn violation(instruction: &Instruction, expected: &'static str) -> ArenaError {
        ArenaError::ProtocolViolation {
            instruction: instruction.to_string(),
            expected,
        }
    }

    /// Apply one instruction. Returns the response to send back, if the
    /// instruction asked for one.
    pub fn handle(
        &mut self,
        instruction: &Instruction,
        strategy: &mut dyn Strategy,
    ) -> Result<Option<Response>, ArenaError> {
        if self.finished {
            return Err(Self::violation(instruction, "the betting round is over"));
        }

        let response = match instruction {
            Instruction::Request(Request::BetOrCheck) => {
                if !self.ledger.both_checked() {
                    return Err(Self::violation(instruction, "a bet is already placed"));
                }
                match strategy.opening_bet(self.bounds, self.target) {
                    Some(amount) => {
                        let ceiling = self.target.max(self.bounds.min);
                        let amount = amount.clamp(self.bounds.min, ceiling);
                        self.my_bet = amount;
                        self.is_setter = Some(true);
                        self.ledger.place_bet(Seat::Me, amount);
                        Some(Response::Bet(amount))
                    }
                    None => {
                        self.checked = true;
                        self.finished = self.opp_checked;
                        Some(Response::Check)
                    }
                }
            }
            Instruction::Request(Request::RaiseCallOrFold) => {
                if !self.facing_bet() {
                    return Err(Self::violation(instruction, "there is no bet to answer"));
                }
                if self.target > self.opp_bet {
                    let raise = self.target - self.opp_bet;
                    self.my_bet = self.target;
                    self.is_setter = Some(true);
                    self.ledger.raise(Seat::Me, raise);
                    Some(Response::Raise {
                        by: raise,
                        to: self.my_bet,
                    })
                } else if self.target == self.opp_bet {
                    self.call()
                } else {
                    self.fold()
                }
            }
            Instruction::Request(Request::CallOrFold) => {
                if !self.facing_bet() {
                    return Err(Self::violation(instruction, "there is no bet to answer"));
                }
                // A target under the minimum never puts money in.
                if self.target >= self.bounds.min && self.opp_bet >= self.target {
                    self.call()
                } else {
                    self.fold()
                }
            }
            Instruction::Opponent(OpponentMove::Bet(amount)) => {
                if !self.ledger.both_checked() {
                    return Err(Self::violation(instruction, "a bet is already placed"));
                }
                if !(self.bounds.min..=self.bounds.max).contains(amount) {
                    return Err(Self::violation(instruction, "bets are limited to the round bounds"));
                }
                self.opp_bet = *amount;
                self.is_setter = Some(false);
                self.ledger.place_bet(Seat::Opponent, *amount);
                None
            }
            Instruction::Opponent(OpponentMove::Raise(amount)) => {
                if !self.awaiting_answer() {
                    return Err(Self::violation(instruction, "there is no bet to raise"));
                }
                let raised = self
                    .my_bet
                    .checked_add(*amount)
                    .filter(|raised| *raised <= self.bounds.max)
                    .ok_or_else(|| Self::violation(instruction, "bets are limited to the round bounds"))?;
                self.opp_bet = raised;
                self.is_setter = Some(false);
                self.ledger.raise(Seat::Opponent, *amount);
                None
            }
            Instruction::Opponent(OpponentMove::Check) => {
                if !self.ledger.both_checked() {
                    return Err(Self::violation(instruction, "a bet is already placed"));
                }
                self.opp_checked = true;
                self.finished = self.checked;
                None
            }
            Instruction::Opponent(OpponentMove::Fold) => {
                if !self.awaiting_answer() {
                    return Err(Self::violation(instruction, "there is no bet to fold to"));
                }
                self.finished = true;
                None
            }
            Instruction::Opponent(OpponentMove::Call) => {
                if !self.awaiting_answer() {
                    return Err(Self::violation(instruction, "there is no bet to call"));
                }
                self.opp_bet = self.my_bet;
                self.ledger.call(Seat::Opponent);
                self.finished = true;
                None
            }
            _ => return Err(Self::violation(instruction, "betting")),
        };

        event!(
            Level::TRACE,
            my_bet = self.my_bet,
            opp_bet = self.opp_bet,
            finished = self.finished,
            ledger = %self.ledger,
            "betting_instruction_applied"
        );
        Ok(response)
    }

    fn call(&mut self) -> Option<Response> {
        self.my_bet = self.opp_bet;
        self.ledger.call(Seat::Me);
        self.finished = true;
        Some(Response::Call(self.opp_bet))
    }

    fn fold(&mut self) -> Option<Response> {
        self.finished = true;
        Some(Response::Fold)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::arena::FixedTargetStrategy;

    use super::*;

    /// Checks that always decline to open.
    struct Checker;

    impl Strategy for Checker {
        fn bet_target(
            &mut self,
            _hand: &crate::core::Hand,
            bounds: BetBounds,
        ) -> Result<u32, ArenaError> {
            Ok(bounds.min)
        }

        fn opening_bet(&mut self, _bounds: BetBounds, _target: u32) -> Option<u32> {
            None
        }

        fn rng(&mut self) -> &mut dyn rand::RngCore {
            unreachable!("checker never draws")
        }
    }

    fn fixed(target: u32) -> FixedTargetStrategy<StdRng> {
        FixedTargetStrategy::new(target, StdRng::seed_from_u64(42))
    }

    /// Play a script of instructions, returning the responses and checking
    /// the ledger stays in line with the bets after every step.
    fn play(
        round: &mut BettingRound,
        strategy: &mut dyn Strategy,
        script: &[&str],
    ) -> Vec<Option<Response>> {
        let mut last_pot = 0;
        script
            .iter()
            .map(|line| {
                let instruction: Instruction = line.parse().unwrap();
                let response = round.handle(&instruction, strategy).unwrap();
                let ledger = round.ledger();
                assert_eq!(round.my_bet() + round.opp_bet(), ledger.pot());
                assert!(ledger.pot() >= last_pot);
                assert_eq!(round.my_bet().max(round.opp_bet()), ledger.current_stake());
                last_pot = ledger.pot();
                response
            })
            .collect()
    }

    #[test_log::test]
    fn test_bet_then_called() {
        let mut strategy = fixed(10);
        let mut round = BettingRound::new(BetBounds::new(5, 15), 10);
        let responses = play(
            &mut round,
            &mut strategy,
            &["action:bet,check", "opponent call"],
        );
        assert_eq!(vec![Some(Response::Bet(10)), None], responses);

        let result = round.result().unwrap();
        assert_eq!(10, result.my_bet);
        assert_eq!(10, result.opp_bet);
        assert_eq!(Some(true), result.is_setter);
        assert_eq!(RoundOutcome::Agreed { setter: Seat::Me }, result.outcome());
        assert_eq!(0, round.ledger().pending());
    }

    #[test_log::test]
    fn test_call_at_the_cap() {
        let mut strategy = fixed(5);
        let mut round = BettingRound::new(BetBounds::new(5, 15), 5);
        let responses = play(
            &mut round,
            &mut strategy,
            &["opponent bet 12", "action:call,fold"],
        );
        assert_eq!(vec![None, Some(Response::Call(12))], responses);

        let result = round.result().unwrap();
        assert_eq!(12, result.my_bet);
        assert_eq!(
            RoundOutcome::Agreed {
                setter: Seat::Opponent
            },
            result.outcome()
        );
    }

    #[test_log::test]
    fn test_fold_when_target_too_low() {
        let mut strategy = fixed(5);
        let mut round = BettingRound::new(BetBounds::new(5, 15), 5);
        let responses = play(
            &mut round,
            &mut strategy,
            &["opponent bet 12", "action:raise,call,fold"],
        );
        assert_eq!(vec![None, Some(Response::Fold)], responses);

        let result = round.result().unwrap();
        assert_eq!(0, result.my_bet);
        assert_eq!(12, result.opp_bet);
        assert_eq!(RoundOutcome::Folded, result.outcome());
        assert!(round.ledger().is_folded());
    }

    #[test_log::test]
    fn test_mutual_check() {
        let mut round = BettingRound::new(BetBounds::new(5, 15), 5);
        let responses = play(
            &mut round,
            &mut Checker,
            &["opponent check", "action:bet,check"],
        );
        assert_eq!(vec![None, Some(Response::Check)], responses);
        assert!(round.is_finished());
        assert_eq!(RoundOutcome::BothChecked, round.result().unwrap().outcome());
        assert!(round.ledger().both_checked());
    }

    #[test_log::test]
    fn test_check_then_opponent_checks() {
        let mut round = BettingRound::new(BetBounds::new(5, 15), 5);
        play(&mut round, &mut Checker, &["action:bet,check"]);
        assert!(!round.is_finished());
        play(&mut round, &mut Checker, &["opponent check"]);
        assert!(round.is_finished());
    }

    #[test_log::test]
    fn test_check_then_answer_a_bet() {
        let mut strategy = fixed(9);
        let mut round = BettingRound::new(BetBounds::new(5, 15), 9);
        // Opening with a check can't happen with a fixed target so check by
        // hand first.
        play(&mut round, &mut Checker, &["action:bet,check"]);
        let responses = play(
            &mut round,
            &mut strategy,
            &["opponent bet 6", "action:raise,call,fold", "opponent call"],
        );
        assert_eq!(
            vec![None, Some(Response::Raise { by: 3, to: 9 }), None],
            responses
        );
        let result = round.result().unwrap();
        assert_eq!(RoundOutcome::Agreed { setter: Seat::Me }, result.outcome());
        assert_eq!(18, result.pot());
    }

    #[test_log::test]
    fn test_raise_war() {
        let mut strategy = fixed(15);
        let mut round = BettingRound::new(BetBounds::new(5, 20), 15);
        let responses = play(
            &mut round,
            &mut strategy,
            &[
                "opponent bet 5",
                "action:raise,call,fold",
                "opponent raise 2",
                "action:call,fold",
            ],
        );
        assert_eq!(
            vec![
                None,
                Some(Response::Raise { by: 10, to: 15 }),
                None,
                Some(Response::Call(17)),
            ],
            responses
        );
        assert_eq!(
            RoundOutcome::Agreed {
                setter: Seat::Opponent
            },
            round.result().map(|r| r.outcome()).unwrap()
        );
    }

    #[test_log::test]
    fn test_opponent_folds() {
        let mut strategy = fixed(12);
        let mut round = BettingRound::new(BetBounds::new(5, 15), 12);
        play(
            &mut round,
            &mut strategy,
            &["action:bet,check", "opponent fold"],
        );
        let result = round.result().unwrap();
        assert_eq!(RoundOutcome::Won, result.outcome());
        assert_eq!(12, result.my_bet);
        assert_eq!(0, result.opp_bet);
    }

    #[test_log::test]
    fn test_opening_bet_clamped() {
        // Target under the minimum still opens at the minimum.
        let mut strategy = fixed(2);
        let mut round = BettingRound::new(BetBounds::new(5, 15), 2);
        let responses = play(&mut round, &mut strategy, &["action:bet,check"]);
        assert_eq!(vec![Some(Response::Bet(5))], responses);

        // Target over the maximum is capped.
        let mut strategy = fixed(40);
        let mut round = BettingRound::new(BetBounds::new(5, 15), 40);
        assert_eq!(15, round.target());
        let responses = play(&mut round, &mut strategy, &["action:bet,check"]);
        assert_eq!(vec![Some(Response::Bet(15))], responses);
    }

    #[test_log::test]
    fn test_wrong_phase_is_a_violation() {
        let mut strategy = fixed(10);
        let mut round = BettingRound::new(BetBounds::new(5, 15), 10);
        let err = round
            .handle(&"action:change".parse().unwrap(), &mut strategy)
            .unwrap_err();
        assert!(err.is_protocol_violation());
        assert!(matches!(err, ArenaError::ProtocolViolation { .. }));
    }

    #[test_log::test]
    fn test_answering_nothing_is_a_violation() {
        let mut strategy = fixed(10);
        let mut round = BettingRound::new(BetBounds::new(5, 15), 10);
        let err = round
            .handle(&"action:call,fold".parse().unwrap(), &mut strategy)
            .unwrap_err();
        assert!(matches!(err, ArenaError::ProtocolViolation { .. }));

        let err = round
            .handle(&"opponent call".parse().unwrap(), &mut strategy)
            .unwrap_err();
        assert!(matches!(err, ArenaError::ProtocolViolation { .. }));
    }

    #[test_log::test]
    fn test_instructions_after_the_end_are_violations() {
        let mut strategy = fixed(10);
        let mut round = BettingRound::new(BetBounds::new(5, 15), 10);
        play(
            &mut round,
            &mut strategy,
            &["action:bet,check", "opponent fold"],
        );
        let err = round
            .handle(&"opponent check".parse().unwrap(), &mut strategy)
            .unwrap_err();
        assert!(matches!(err, ArenaError::ProtocolViolation { .. }));
    }

    #[test]
    fn test_bounds() {
        let bounds = BetBounds::after_round_one(12, 30);
        assert_eq!(13, bounds.min);
        assert_eq!(30, bounds.max);
        assert_eq!(17, bounds.span());
        assert_eq!(13, bounds.clamp(1));

        let squashed = BetBounds::new(10, 4);
        assert_eq!(10, squashed.max);
    }

    #[test_log::test]
    fn test_opponent_over_the_maximum() {
        let mut strategy = fixed(10);
        let mut round = BettingRound::new(BetBounds::new(5, 15), 10);
        let err = round
            .handle(&"opponent bet 16".parse().unwrap(), &mut strategy)
            .unwrap_err();
        assert!(matches!(err, ArenaError::ProtocolViolation { .. }));

        let mut round = BettingRound::new(BetBounds::new(5, 15), 10);
        play(&mut round, &mut strategy, &["action:bet,check"]);
        let err = round
            .handle(&"opponent raise 4294967295".parse().unwrap(), &mut strategy)
            .unwrap_err();
        assert!(matches!(err, ArenaError::ProtocolViolation { .. }));
    }

    #[test_log::test]
    fn test_sub_minimum_target_folds_at_the_cap() {
        let mut strategy = fixed(0);
        let mut round = BettingRound::new(BetBounds::new(5, 15), 0);
        let responses = play(
            &mut round,
            &mut strategy,
            &["opponent bet 15", "action:call,fold"],
        );
        assert_eq!(vec![None, Some(Response::Fold)], responses);
        let result = round.result().unwrap();
        assert_eq!(RoundOutcome::Folded, result.outcome());
        assert_eq!(0, result.my_bet);
    }
}
