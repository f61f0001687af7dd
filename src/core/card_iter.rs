use super::Card;

/// Iterator over every `num_cards` sized combination of a set of cards.
///
/// Combinations come out in lexicographic order of their positions in
/// `possible_cards`.
#[derive(Debug, Clone)]
pub struct CardIter {
    // All the possible cards that can be dealt
    possible_cards: Vec<Card>,

    // Offsets of the next combination. `None` once exhausted.
    idx: Option<Vec<usize>>,
}

impl CardIter {
    pub fn new(possible_cards: Vec<Card>, num_cards: usize) -> CardIter {
        let idx = (num_cards <= possible_cards.len()).then(|| (0..num_cards).collect());
        CardIter {
            possible_cards,
            idx,
        }
    }
}

impl Iterator for CardIter {
    type Item = Vec<Card>;

    fn next(&mut self) -> Option<Vec<Card>> {
        let idx = self.idx.as_mut()?;
        let result: Vec<Card> = idx.iter().map(|i| self.possible_cards[*i]).collect();

        // Find the right most offset that can still move forward
        // leaving enough cards for the offsets after it.
        let n = self.possible_cards.len();
        let k = idx.len();
        match (0..k).rev().find(|&level| idx[level] < n - k + level) {
            Some(level) => {
                idx[level] += 1;
                for after in level + 1..k {
                    idx[after] = idx[after - 1] + 1;
                }
            }
            None => self.idx = None,
        }

        Some(result)
    }
}
