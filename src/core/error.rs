use thiserror::Error;

use super::Card;

/// This is the core error type for the
/// fate17 library. It uses `thiserror` to provide
/// readable error messages
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fate17Error {
    #[error("Unable to parse value")]
    UnexpectedValueChar,
    #[error("Unable to parse suit")]
    UnexpectedSuitChar,
    #[error("Error reading characters while parsing")]
    TooFewChars,
    #[error("Extra un-used characters found after parsing")]
    UnparsedCharsRemaining,
    #[error("A fate17 hand has exactly 5 cards, got {0}")]
    HandSize(usize),
    #[error("Card already added to hand {0}")]
    DuplicateCardInHand(Card),
    #[error("There is only one joker in the deck")]
    TooManyJokers,
    #[error("Card {0} is not in the hand")]
    CardNotInHand(Card),
    #[error("Can't classify hand {0}")]
    Unclassified(String),
}
