use rand::Rng;
use rand::seq::SliceRandom;

use super::{Card, CardIter, HAND_SIZE, Suit, Value};

/// Number of cards in a full fate17 deck. Sixteen court cards and the joker.
pub const DECK_SIZE: usize = 17;

/// The fate17 deck.
///
/// Cards are kept in a `Vec` so that dealing after a shuffle is just a pop.
/// Dealing belongs to the host; the agents only use this to
/// reason about which cards are still out there.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deck {
    /// Card storage.
    cards: Vec<Card>,
}

impl Deck {
    /// Create the full 17 card deck
    ///
    /// ```
    /// use fate17::core::Deck;
    ///
    /// assert_eq!(17, Deck::new().len());
    /// ```
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for s in Suit::suits() {
            for v in Value::values() {
                cards.push(Card::new(v, s));
            }
        }
        cards.push(Card::Joker);
        Self { cards }
    }

    /// Given a card, is it in the current deck?
    pub fn contains(&self, c: &Card) -> bool {
        self.cards.contains(c)
    }

    /// Given a card remove it from the deck if it is present.
    pub fn remove(&mut self, c: &Card) -> bool {
        match self.cards.iter().position(|x| x == c) {
            Some(idx) => {
                self.cards.remove(idx);
                true
            }
            None => false,
        }
    }

    /// How many cards are there in the deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Have all of the cards been dealt from this deck?
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Randomly shuffle the deck.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng)
    }

    /// Deal `count` cards, or `None` if there aren't that many left.
    ///
    /// ```
    /// use fate17::core::Deck;
    /// use rand::{SeedableRng, rngs::StdRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(17);
    /// let mut deck = Deck::new();
    /// deck.shuffle(&mut rng);
    ///
    /// let cards = deck.deal(5).unwrap();
    /// assert_eq!(5, cards.len());
    /// assert_eq!(12, deck.len());
    /// assert!(deck.deal(13).is_none());
    /// ```
    pub fn deal(&mut self, count: usize) -> Option<Vec<Card>> {
        if self.cards.len() < count {
            return None;
        }
        let at = self.cards.len() - count;
        Some(self.cards.split_off(at))
    }

    /// Every possible five card hand that can be made from the cards
    /// remaining in this deck.
    pub fn hands(&self) -> CardIter {
        CardIter::new(self.cards.clone(), HAND_SIZE)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_contains_in() {
        let d = Deck::new();
        assert!(d.contains(&Card::new(Value::Queen, Suit::Heart)));
        assert!(d.contains(&Card::Joker));
    }

    #[test]
    fn test_remove() {
        let mut d = Deck::new();
        let c = Card::new(Value::Ace, Suit::Heart);
        assert!(d.contains(&c));
        assert!(d.remove(&c));
        assert!(!d.contains(&c));
        assert!(!d.remove(&c));
        assert_eq!(16, d.len());
    }

    #[test]
    fn test_two_hands_leave_seven() {
        let mut rng = StdRng::seed_from_u64(420);
        let mut d = Deck::new();
        d.shuffle(&mut rng);

        let first = d.deal(HAND_SIZE).unwrap();
        let second = d.deal(HAND_SIZE).unwrap();

        assert_eq!(7, d.len());
        for c in &first {
            assert!(!second.contains(c));
            assert!(!d.contains(c));
        }
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let mut a = Deck::new();
        let mut b = Deck::new();
        a.shuffle(&mut StdRng::seed_from_u64(7));
        b.shuffle(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
