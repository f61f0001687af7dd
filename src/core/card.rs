use std::fmt;

use super::Fate17Error;

/// Card rank or value.
///
/// Only the four court ranks exist in a fate17 deck. The discriminant
/// is the order used for sorting, not the scoring weight.
#[derive(PartialEq, PartialOrd, Eq, Ord, Debug, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// J
    Jack = 0,
    /// Q
    Queen = 1,
    /// K
    King = 2,
    /// A
    Ace = 3,
}

/// Constant of all the values.
/// This is what `Value::values()` returns
const VALUES: [Value; 4] = [Value::Jack, Value::Queen, Value::King, Value::Ace];

impl Value {
    /// Get all of the `Value`'s that are possible.
    /// This is used to iterate through all possible
    /// values when creating a new deck.
    pub const fn values() -> [Value; 4] {
        VALUES
    }

    /// The weight this rank contributes to a hand score.
    ///
    /// # Examples
    ///
    /// ```
    /// use fate17::core::Value;
    ///
    /// assert_eq!(8, Value::Ace.weight());
    /// assert_eq!(2, Value::Jack.weight());
    /// ```
    pub const fn weight(self) -> u32 {
        match self {
            Value::Ace => 8,
            Value::King => 6,
            Value::Queen => 4,
            Value::Jack => 2,
        }
    }

    pub fn from_char(c: char) -> Option<Value> {
        match c {
            'A' => Some(Value::Ace),
            'K' => Some(Value::King),
            'Q' => Some(Value::Queen),
            'J' => Some(Value::Jack),
            _ => None,
        }
    }

    pub const fn to_char(self) -> char {
        match self {
            Value::Ace => 'A',
            Value::King => 'K',
            Value::Queen => 'Q',
            Value::Jack => 'J',
        }
    }
}

/// Enum for the four different suits.
/// While this has support for ordering it's not
/// sensical. The sorting is only there to allow sorting cards.
#[derive(PartialEq, PartialOrd, Eq, Ord, Debug, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Suit {
    /// Spades
    Spade = 0,
    /// Hearts
    Heart = 1,
    /// Diamonds
    Diamond = 2,
    /// Clubs
    Club = 3,
}

/// All of the `Suit`'s. This is what `Suit::suits()` returns.
const SUITS: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];

impl Suit {
    /// Provide all the Suit's that there are.
    pub const fn suits() -> [Suit; 4] {
        SUITS
    }

    pub fn from_char(s: char) -> Option<Suit> {
        match s {
            'S' => Some(Suit::Spade),
            'H' => Some(Suit::Heart),
            'D' => Some(Suit::Diamond),
            'C' => Some(Suit::Club),
            _ => None,
        }
    }

    pub const fn to_char(self) -> char {
        match self {
            Suit::Spade => 'S',
            Suit::Heart => 'H',
            Suit::Diamond => 'D',
            Suit::Club => 'C',
        }
    }
}

/// The main type of this library.
///
/// A card is either one of the sixteen suited court cards or the single
/// wild joker, which has neither value nor suit.
#[derive(PartialEq, PartialOrd, Eq, Ord, Debug, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Card {
    /// A suited card with a face value.
    Standard {
        /// The face value of this card.
        value: Value,
        /// The suit of this card.
        suit: Suit,
    },
    /// The wild card.
    Joker,
}

impl Card {
    /// Create a new suited card.
    pub const fn new(value: Value, suit: Suit) -> Self {
        Card::Standard { value, suit }
    }

    pub const fn is_joker(&self) -> bool {
        matches!(self, Card::Joker)
    }

    /// The face value, `None` for the joker.
    pub const fn value(&self) -> Option<Value> {
        match self {
            Card::Standard { value, .. } => Some(*value),
            Card::Joker => None,
        }
    }

    /// The suit, `None` for the joker.
    pub const fn suit(&self) -> Option<Suit> {
        match self {
            Card::Standard { suit, .. } => Some(*suit),
            Card::Joker => None,
        }
    }

    /// Parse a comma separated list of card tokens, eg `"SA,HK,J"`.
    ///
    /// An empty (or all whitespace) string is an empty list. That's
    /// what the host sends when no cards were exchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use fate17::core::{Card, Suit, Value};
    ///
    /// let cards = Card::parse_list("SA,J").unwrap();
    /// assert_eq!(vec![Card::new(Value::Ace, Suit::Spade), Card::Joker], cards);
    /// assert!(Card::parse_list("").unwrap().is_empty());
    /// ```
    pub fn parse_list(s: &str) -> Result<Vec<Card>, Fate17Error> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(vec![]);
        }
        s.split(',').map(|token| Card::try_from(token.trim())).collect()
    }

    /// Format cards as the comma separated token list used on the wire.
    pub fn join(cards: &[Card]) -> String {
        cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Parse a single card token. `J` alone is the joker, everything else
/// is suit then value, eg `SA` or `HJ`.
impl TryFrom<&str> for Card {
    type Error = Fate17Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        let first = chars.next().ok_or(Fate17Error::TooFewChars)?;
        let second = chars.next();

        if chars.next().is_some() {
            return Err(Fate17Error::UnparsedCharsRemaining);
        }

        match (first, second) {
            ('J', None) => Ok(Card::Joker),
            (_, None) => Err(Fate17Error::TooFewChars),
            (s, Some(v)) => {
                let suit = Suit::from_char(s).ok_or(Fate17Error::UnexpectedSuitChar)?;
                let value = Value::from_char(v).ok_or(Fate17Error::UnexpectedValueChar)?;
                Ok(Card::new(value, suit))
            }
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Standard { value, suit } => write!(f, "{}{}", suit.to_char(), value.to_char()),
            Card::Joker => write!(f, "J"),
        }
    }
}
