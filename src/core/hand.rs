use std::fmt;

use super::{Card, Fate17Error};

/// Number of cards held by each player.
pub const HAND_SIZE: usize = 5;

/// A fate17 hand. Exactly five distinct cards with at most one joker.
///
/// The invariant is checked on construction so everything downstream
/// (ranking, discard selection) can rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Card>", into = "Vec<Card>"))]
pub struct Hand([Card; HAND_SIZE]);

impl Hand {
    /// Create a hand from five cards.
    ///
    /// # Examples
    ///
    /// ```
    /// use fate17::core::{Card, Hand, Suit, Value};
    ///
    /// let hand = Hand::new_with_cards(vec![
    ///     Card::new(Value::Ace, Suit::Spade),
    ///     Card::new(Value::Ace, Suit::Heart),
    ///     Card::new(Value::King, Suit::Diamond),
    ///     Card::new(Value::Queen, Suit::Club),
    ///     Card::Joker,
    /// ])
    /// .unwrap();
    ///
    /// assert!(hand.contains(&Card::Joker));
    /// ```
    pub fn new_with_cards(cards: Vec<Card>) -> Result<Self, Fate17Error> {
        if cards.len() != HAND_SIZE {
            return Err(Fate17Error::HandSize(cards.len()));
        }

        let mut out = [Card::Joker; HAND_SIZE];
        let mut jokers = 0;
        for (idx, card) in cards.into_iter().enumerate() {
            if out[..idx].contains(&card) {
                if card.is_joker() {
                    return Err(Fate17Error::TooManyJokers);
                }
                return Err(Fate17Error::DuplicateCardInHand(card));
            }
            if card.is_joker() {
                jokers += 1;
            }
            out[idx] = card;
        }
        debug_assert!(jokers <= 1);

        Ok(Self(out))
    }

    /// Parse a hand from the comma separated wire format.
    ///
    /// ```
    /// use fate17::core::Hand;
    ///
    /// let hand = Hand::new_from_str("SA,HA,DA,CA,J").unwrap();
    /// assert_eq!("SA,HA,DA,CA,J", hand.to_string());
    ///
    /// assert!(Hand::new_from_str("SA,HA").is_err());
    /// ```
    pub fn new_from_str(hand_string: &str) -> Result<Self, Fate17Error> {
        Self::new_with_cards(Card::parse_list(hand_string)?)
    }

    /// Given a card, is it in the current hand?
    pub fn contains(&self, c: &Card) -> bool {
        self.0.contains(c)
    }

    pub fn has_joker(&self) -> bool {
        self.contains(&Card::Joker)
    }

    pub fn cards(&self) -> &[Card; HAND_SIZE] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.0.iter()
    }

    /// Build the hand that results from giving up `discards` and
    /// receiving `replacements`.
    ///
    /// Kept cards stay in their original order, replacements are appended.
    /// Every discard has to be in the hand and the result has to be a
    /// valid hand again.
    ///
    /// ```
    /// use fate17::core::{Card, Hand};
    ///
    /// let hand = Hand::new_from_str("SA,HA,DK,CQ,SJ").unwrap();
    /// let discards = Card::parse_list("CQ,SJ").unwrap();
    /// let replacements = Card::parse_list("DA,J").unwrap();
    ///
    /// let next = hand.exchange(&discards, &replacements).unwrap();
    /// assert_eq!("SA,HA,DK,DA,J", next.to_string());
    /// ```
    pub fn exchange(&self, discards: &[Card], replacements: &[Card]) -> Result<Self, Fate17Error> {
        if let Some(missing) = discards.iter().find(|c| !self.contains(c)) {
            return Err(Fate17Error::CardNotInHand(*missing));
        }

        let kept = self.0.iter().filter(|c| !discards.contains(c)).copied();
        Self::new_with_cards(kept.chain(replacements.iter().copied()).collect())
    }
}

impl TryFrom<Vec<Card>> for Hand {
    type Error = Fate17Error;

    fn try_from(cards: Vec<Card>) -> Result<Self, Self::Error> {
        Self::new_with_cards(cards)
    }
}

impl From<Hand> for Vec<Card> {
    fn from(hand: Hand) -> Self {
        hand.0.to_vec()
    }
}

impl<'a> IntoIterator for &'a Hand {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Card::join(&self.0))
    }
}
