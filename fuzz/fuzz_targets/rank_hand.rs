#![no_main]

extern crate fate17;
extern crate libfuzzer_sys;

use fate17::core::{Hand, Rankable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Anything that parses as a hand has to rank, and every ordering of
    // it has to rank the same.
    if let Ok(hand) = Hand::new_from_str(text) {
        let result = hand.rank().unwrap();
        let mut cards: Vec<_> = hand.iter().copied().collect();
        cards.reverse();
        assert_eq!(result, cards.rank().unwrap());
        assert!(result.score >= result.category.base_score());
        assert!(result.score < result.category.base_score() + 10_000);
    }
});
