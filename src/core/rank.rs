use std::fmt;

use super::{Card, Fate17Error, HAND_SIZE, Hand, Suit, Value};

/// All the different possible hand categories, weakest first.
///
/// With only four ranks in the deck there is no high card hand and no
/// plain flush; the joker is what makes straights possible at all.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    /// One value appears twice.
    OnePair,
    /// Two different values appear twice each.
    TwoPair,
    /// Three of the same value, possibly using the joker.
    ThreeCard,
    /// Joker plus one card of every value.
    Straight,
    /// Three of one value and two of another value.
    FullHouse,
    /// Four of the same value, possibly using the joker.
    FourCard,
    /// Joker plus one card of every value, all the same suit.
    RoyalStraightFlush,
    /// All four cards of a value plus the joker.
    FiveCard,
}

impl Category {
    /// The lowest score a hand of this category can have. Every hand of
    /// the category scores below `base_score() + 10_000`.
    pub const fn base_score(self) -> u32 {
        match self {
            Category::FiveCard => 90_000,
            Category::RoyalStraightFlush => 80_000,
            Category::FourCard => 70_000,
            Category::FullHouse => 60_000,
            Category::Straight => 50_000,
            Category::ThreeCard => 40_000,
            Category::TwoPair => 30_000,
            Category::OnePair => 20_000,
        }
    }

    /// Hands that can't be improved by exchanging cards.
    pub const fn keeps_all_cards(self) -> bool {
        matches!(
            self,
            Category::FiveCard
                | Category::RoyalStraightFlush
                | Category::Straight
                | Category::FullHouse
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::FiveCard => "five card",
            Category::RoyalStraightFlush => "royal straight flush",
            Category::FourCard => "four card",
            Category::FullHouse => "full house",
            Category::Straight => "straight",
            Category::ThreeCard => "three card",
            Category::TwoPair => "two pair",
            Category::OnePair => "one pair",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The result of ranking a hand.
///
/// The score alone decides who wins; the category is carried along
/// because the discard policy and the betting strategies key off it.
/// Ordering is by score first.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandResult {
    pub score: u32,
    pub category: Category,
}

impl fmt::Display for HandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.score, self.category)
    }
}

/// Per value and per suit counts of the non-joker cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RankCounts {
    has_joker: bool,
    value_count: [u8; 4],
    suit_count: [u8; 4],
}

impl RankCounts {
    pub fn new<'a, I: IntoIterator<Item = &'a Card>>(cards: I) -> Self {
        let mut counts = RankCounts::default();
        for c in cards {
            match c {
                Card::Joker => counts.has_joker = true,
                Card::Standard { value, suit } => {
                    counts.value_count[*value as usize] += 1;
                    counts.suit_count[*suit as usize] += 1;
                }
            }
        }
        counts
    }

    pub fn has_joker(&self) -> bool {
        self.has_joker
    }

    /// How many times `value` shows up.
    pub fn count(&self, value: Value) -> u8 {
        self.value_count[value as usize]
    }

    /// The values that appear exactly `count` times, highest weight first.
    pub fn values_with_count(&self, count: u8) -> Vec<Value> {
        Value::values()
            .into_iter()
            .rev()
            .filter(|v| self.count(*v) == count)
            .collect()
    }

    pub fn distinct_values(&self) -> usize {
        self.value_count.iter().filter(|c| **c > 0).count()
    }

    pub fn distinct_suits(&self) -> usize {
        self.suit_count.iter().filter(|c| **c > 0).count()
    }

    /// The only suit present, if all suited cards share one.
    pub fn single_suit(&self) -> Option<Suit> {
        if self.distinct_suits() != 1 {
            return None;
        }
        Suit::suits()
            .into_iter()
            .find(|s| self.suit_count[*s as usize] > 0)
    }

    /// Value counts sorted from the most to least common, zeros dropped.
    /// `[2, 1, 1, 1]` is a single pair with three other values.
    fn pattern(&self) -> Vec<u8> {
        let mut p: Vec<u8> = self
            .value_count
            .iter()
            .copied()
            .filter(|c| *c > 0)
            .collect();
        p.sort_unstable_by(|a, b| b.cmp(a));
        p
    }
}

/// Put the weights of `values` into decimal slots. The first value gets
/// the first slot and so on.
fn slots(values: &[Value], places: &[u32]) -> u32 {
    values
        .iter()
        .zip(places)
        .map(|(v, place)| v.weight() * place)
        .sum()
}

/// Can this turn into a hand rank?
pub trait Rankable {
    /// The cards to be ranked.
    fn card_slice(&self) -> &[Card];

    /// Rank the cards.
    ///
    /// Only the counts per value, the presence of the joker, and whether
    /// the suited cards share a suit matter. Within a category ties are
    /// broken by the weights of the values placed into base ten slots,
    /// so categories never overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use fate17::core::{Category, Hand, Rankable};
    ///
    /// let hand = Hand::new_from_str("SA,HA,DA,CK,SK").unwrap();
    /// let result = hand.rank().unwrap();
    ///
    /// assert_eq!(Category::FullHouse, result.category);
    /// assert_eq!(68_600, result.score);
    /// ```
    ///
    /// # Errors
    ///
    /// [`Fate17Error::HandSize`] if there aren't exactly five cards and
    /// [`Fate17Error::Unclassified`] for card sets that can't come from a
    /// fate17 deck.
    fn rank(&self) -> Result<HandResult, Fate17Error> {
        let cards = self.card_slice();
        if cards.len() != HAND_SIZE {
            return Err(Fate17Error::HandSize(cards.len()));
        }

        let counts = RankCounts::new(cards);
        let pattern = counts.pattern();

        let result = |category: Category, kickers: u32| HandResult {
            category,
            score: category.base_score() + kickers,
        };

        let quads = counts.values_with_count(4);
        let trips = counts.values_with_count(3);
        let pairs = counts.values_with_count(2);
        let singles = counts.values_with_count(1);

        let ranked = match (counts.has_joker(), pattern.as_slice()) {
            (true, [4]) => result(Category::FiveCard, 0),
            (true, [1, 1, 1, 1]) => match counts.single_suit() {
                Some(_) => result(Category::RoyalStraightFlush, 0),
                None => result(Category::Straight, 0),
            },
            (false, [4, 1]) => result(
                Category::FourCard,
                slots(&quads, &[1000]) + slots(&singles, &[100]),
            ),
            (true, [3, 1]) => result(
                Category::FourCard,
                slots(&trips, &[1000]) + slots(&singles, &[100]),
            ),
            (false, [3, 2]) => result(
                Category::FullHouse,
                slots(&trips, &[1000]) + slots(&pairs, &[100]),
            ),
            // The joker completes the higher pair into three.
            (true, [2, 2]) => result(Category::FullHouse, slots(&pairs, &[1000, 100])),
            (false, [3, 1, 1]) => result(
                Category::ThreeCard,
                slots(&trips, &[1000]) + slots(&singles, &[100, 10]),
            ),
            (true, [2, 1, 1]) => result(
                Category::ThreeCard,
                slots(&pairs, &[1000]) + slots(&singles, &[100, 10]),
            ),
            (false, [2, 2, 1]) => result(
                Category::TwoPair,
                slots(&pairs, &[1000, 100]) + slots(&singles, &[10]),
            ),
            (false, [2, 1, 1, 1]) => result(
                Category::OnePair,
                slots(&pairs, &[1000]) + slots(&singles, &[100, 10, 1]),
            ),
            _ => return Err(Fate17Error::Unclassified(Card::join(cards))),
        };

        Ok(ranked)
    }
}

/// Implementation for `Hand`
impl Rankable for Hand {
    fn card_slice(&self) -> &[Card] {
        &self.cards()[..]
    }
}

impl Rankable for [Card] {
    fn card_slice(&self) -> &[Card] {
        self
    }
}

impl Rankable for Vec<Card> {
    fn card_slice(&self) -> &[Card] {
        &self[..]
    }
}
