//! The line protocol spoken between the host and an agent.
//!
//! Every message is a single line of text. Instructions flow from the host
//! to the agent and responses flow back. Both sides parse with `FromStr`
//! and render with `Display`, so `line.parse::<Instruction>()` and
//! `instruction.to_string()` round trip.
use std::fmt;
use std::str::FromStr;

use crate::core::Card;

use super::errors::ArenaError;

/// Which player acts first in a betting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Order {
    First,
    Second,
}

/// How the showdown went for the agent receiving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    Win,
    Lose,
    Tie,
}

/// The host is asking the agent to decide something.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    /// `action:bet,check` nobody has bet yet.
    BetOrCheck,
    /// `action:raise,call,fold` the opponent bet or raised.
    RaiseCallOrFold,
    /// `action:call,fold` the opponent hit the maximum bet.
    CallOrFold,
    /// `action:change` pick the cards to exchange.
    Change,
}

/// Something the opponent did, as relayed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OpponentMove {
    Bet(u32),
    /// The amount is the raise on top of the agent's current bet.
    Raise(u32),
    Check,
    Fold,
    Call,
    /// How many cards the opponent exchanged.
    Change(usize),
    /// The opponent's hand, revealed at showdown.
    Cards(Vec<Card>),
}

/// Host to agent messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Instruction {
    Order(Order),
    /// Pay the ante. Hosts may leave the amount off.
    Ante(Option<u32>),
    /// Cards dealt to the agent. Either the starting five or replacements.
    Cards(Vec<Card>),
    Request(Request),
    Opponent(OpponentMove),
    Verdict(Verdict),
}

/// Agent to host messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Response {
    /// Free form text sent once at the start of a session.
    Greeting(String),
    Bet(u32),
    /// Raise by `by` so that the agent's bet becomes `to`.
    Raise {
        by: u32,
        to: u32,
    },
    Call(u32),
    Fold,
    Check,
    Change(Vec<Card>),
}

fn parse_amount<T: FromStr>(s: &str, line: &str) -> Result<T, ArenaError> {
    s.parse()
        .map_err(|_| ArenaError::MalformedInstruction(line.to_string()))
}

fn parse_cards(s: &str, line: &str) -> Result<Vec<Card>, ArenaError> {
    Card::parse_list(s).map_err(|_| ArenaError::MalformedInstruction(line.to_string()))
}

impl FromStr for Instruction {
    type Err = ArenaError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim();
        let mut words = trimmed.splitn(2, ' ');
        let head = words.next().unwrap_or_default();
        let rest = words.next().unwrap_or_default().trim();
        let malformed = || ArenaError::MalformedInstruction(line.to_string());

        let instruction = match (head, rest) {
            ("first", "") => Instruction::Order(Order::First),
            ("second", "") => Instruction::Order(Order::Second),
            ("ante", "") => Instruction::Ante(None),
            ("ante", amount) => Instruction::Ante(Some(parse_amount(amount, line)?)),
            ("cards", cards) => Instruction::Cards(parse_cards(cards, line)?),
            ("action:bet,check", "") => Instruction::Request(Request::BetOrCheck),
            ("action:raise,call,fold", "") => Instruction::Request(Request::RaiseCallOrFold),
            ("action:call,fold", "") => Instruction::Request(Request::CallOrFold),
            ("action:change", "") => Instruction::Request(Request::Change),
            ("win", "") => Instruction::Verdict(Verdict::Win),
            ("lose", "") => Instruction::Verdict(Verdict::Lose),
            ("tie", "") => Instruction::Verdict(Verdict::Tie),
            ("opponent", what) => {
                let mut parts = what.splitn(2, ' ');
                let verb = parts.next().unwrap_or_default();
                let arg = parts.next().unwrap_or_default().trim();
                let mv = match (verb, arg) {
                    ("bet", n) if !n.is_empty() => OpponentMove::Bet(parse_amount(n, line)?),
                    ("raise", n) if !n.is_empty() => OpponentMove::Raise(parse_amount(n, line)?),
                    ("change", n) if !n.is_empty() => {
                        OpponentMove::Change(parse_amount(n, line)?)
                    }
                    ("check", "") => OpponentMove::Check,
                    ("fold", "") => OpponentMove::Fold,
                    ("call", "") => OpponentMove::Call,
                    ("cards", cards) => OpponentMove::Cards(parse_cards(cards, line)?),
                    _ => return Err(malformed()),
                };
                Instruction::Opponent(mv)
            }
            _ => return Err(malformed()),
        };
        Ok(instruction)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Order(Order::First) => write!(f, "first"),
            Instruction::Order(Order::Second) => write!(f, "second"),
            Instruction::Ante(None) => write!(f, "ante"),
            Instruction::Ante(Some(n)) => write!(f, "ante {n}"),
            Instruction::Cards(cards) => write!(f, "cards {}", Card::join(cards)),
            Instruction::Request(Request::BetOrCheck) => write!(f, "action:bet,check"),
            Instruction::Request(Request::RaiseCallOrFold) => write!(f, "action:raise,call,fold"),
            Instruction::Request(Request::CallOrFold) => write!(f, "action:call,fold"),
            Instruction::Request(Request::Change) => write!(f, "action:change"),
            Instruction::Opponent(OpponentMove::Bet(n)) => write!(f, "opponent bet {n}"),
            Instruction::Opponent(OpponentMove::Raise(n)) => write!(f, "opponent raise {n}"),
            Instruction::Opponent(OpponentMove::Check) => write!(f, "opponent check"),
            Instruction::Opponent(OpponentMove::Fold) => write!(f, "opponent fold"),
            Instruction::Opponent(OpponentMove::Call) => write!(f, "opponent call"),
            Instruction::Opponent(OpponentMove::Change(n)) => write!(f, "opponent change {n}"),
            Instruction::Opponent(OpponentMove::Cards(cards)) => {
                write!(f, "opponent cards {}", Card::join(cards))
            }
            Instruction::Verdict(Verdict::Win) => write!(f, "win"),
            Instruction::Verdict(Verdict::Lose) => write!(f, "lose"),
            Instruction::Verdict(Verdict::Tie) => write!(f, "tie"),
        }
    }
}

impl FromStr for Response {
    type Err = ArenaError;

    /// Parse one of the decision responses. Greetings are free form and
    /// can't be told apart from garbage, so they are never produced here.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = || ArenaError::MalformedResponse(line.to_string());
        let amount = |s: &str| s.parse::<u32>().map_err(|_| malformed());

        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["bet", n] => Ok(Response::Bet(amount(n)?)),
            ["raise", by, "to", "be", to] => Ok(Response::Raise {
                by: amount(by)?,
                to: amount(to)?,
            }),
            ["call", n] => Ok(Response::Call(amount(n)?)),
            ["fold"] => Ok(Response::Fold),
            ["check"] => Ok(Response::Check),
            ["change"] => Ok(Response::Change(vec![])),
            ["change", cards] => Card::parse_list(cards)
                .map(Response::Change)
                .map_err(|_| malformed()),
            _ => Err(malformed()),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Greeting(text) => write!(f, "{text}"),
            Response::Bet(n) => write!(f, "bet {n}"),
            Response::Raise { by, to } => write!(f, "raise {by} to be {to}"),
            Response::Call(n) => write!(f, "call {n}"),
            Response::Fold => write!(f, "fold"),
            Response::Check => write!(f, "check"),
            Response::Change(cards) => write!(f, "change {}", Card::join(cards)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_betting_requests() {
        assert_eq!(
            Instruction::Request(Request::BetOrCheck),
            "action:bet,check".parse().unwrap()
        );
        assert_eq!(
            Instruction::Request(Request::RaiseCallOrFold),
            "action:raise,call,fold".parse().unwrap()
        );
        assert_eq!(
            Instruction::Request(Request::CallOrFold),
            "action:call,fold".parse().unwrap()
        );
    }

    #[test]
    fn test_parse_opponent_moves() {
        assert_eq!(
            Instruction::Opponent(OpponentMove::Bet(12)),
            "opponent bet 12".parse().unwrap()
        );
        assert_eq!(
            Instruction::Opponent(OpponentMove::Raise(3)),
            "opponent raise 3".parse().unwrap()
        );
        assert_eq!(
            Instruction::Opponent(OpponentMove::Change(2)),
            "opponent change 2".parse().unwrap()
        );
        let Instruction::Opponent(OpponentMove::Cards(cards)) =
            "opponent cards J,HA,DA,CQ,CA".parse::<Instruction>().unwrap()
        else {
            panic!("expected the opponent's cards");
        };
        assert_eq!(5, cards.len());
    }

    #[test]
    fn test_parse_cards_trailing_newline() {
        let Instruction::Cards(cards) = "cards SA,HK,DQ,CJ,J\n".parse::<Instruction>().unwrap() else {
            panic!("expected cards");
        };
        assert_eq!("SA,HK,DQ,CJ,J", Card::join(&cards));
    }

    #[test]
    fn test_parse_empty_replacements() {
        assert_eq!(Instruction::Cards(vec![]), "cards".parse().unwrap());
        assert_eq!(Instruction::Cards(vec![]), "cards ".parse().unwrap());
    }

    #[test]
    fn test_parse_ante() {
        assert_eq!(Instruction::Ante(None), "ante".parse().unwrap());
        assert_eq!(Instruction::Ante(Some(5)), "ante 5".parse().unwrap());
    }

    #[test]
    fn test_malformed() {
        for line in [
            "",
            "dance",
            "opponent bet",
            "opponent bet ten",
            "opponent dance",
            "cards SA,XX",
            "first please",
            "action:bet",
        ] {
            assert!(
                matches!(
                    line.parse::<Instruction>(),
                    Err(ArenaError::MalformedInstruction(_))
                ),
                "{line:?} should not parse"
            );
        }
    }

    #[test]
    fn test_instruction_display_parses_back() {
        let all = vec![
            Instruction::Order(Order::First),
            Instruction::Order(Order::Second),
            Instruction::Ante(Some(5)),
            Instruction::Cards(Card::parse_list("SA,J").unwrap()),
            Instruction::Request(Request::Change),
            Instruction::Opponent(OpponentMove::Call),
            Instruction::Opponent(OpponentMove::Raise(4)),
            Instruction::Verdict(Verdict::Tie),
        ];
        for i in all {
            assert_eq!(i, i.to_string().parse().unwrap());
        }
    }

    #[test]
    fn test_response_wire_format() {
        assert_eq!("bet 10", Response::Bet(10).to_string());
        assert_eq!(
            "raise 3 to be 10",
            Response::Raise { by: 3, to: 10 }.to_string()
        );
        assert_eq!("call 12", Response::Call(12).to_string());
        assert_eq!("change ", Response::Change(vec![]).to_string());
        assert_eq!(
            "change SA,J",
            Response::Change(Card::parse_list("SA,J").unwrap()).to_string()
        );
    }

    #[test]
    fn test_parse_response() {
        assert_eq!(
            Response::Raise { by: 3, to: 10 },
            "raise 3 to be 10".parse().unwrap()
        );
        assert_eq!(Response::Change(vec![]), "change ".parse().unwrap());
        assert_eq!(Response::Fold, "fold".parse().unwrap());
        assert!("hello there".parse::<Response>().is_err());
    }
}
