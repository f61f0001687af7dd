#![no_main]

extern crate arbitrary;
extern crate fate17;
extern crate libfuzzer_sys;
extern crate rand;

use fate17::arena::{
    CategoryStrategy, Game, ScoreStrategy, Strategy, StrategyConfig, protocol::Instruction,
    test_util::assert_valid_game_record,
};
use libfuzzer_sys::fuzz_target;
use rand::{SeedableRng, rngs::StdRng};

#[derive(Debug, Clone, arbitrary::Arbitrary)]
struct Input {
    pub lines: Vec<String>,
    pub seed: u64,
    pub by_category: bool,
}

fuzz_target!(|input: Input| {
    let rng = StdRng::seed_from_u64(input.seed);
    let mut strategy: Box<dyn Strategy> = if input.by_category {
        Box::new(CategoryStrategy::new(15, rng))
    } else {
        Box::new(ScoreStrategy::new(rng))
    };

    // Whatever the host says the game either errors out or stays
    // consistent, it never panics.
    let mut game = Game::new(1, &StrategyConfig::default());
    for line in input.lines {
        let Ok(instruction) = line.parse::<Instruction>() else {
            return;
        };
        if game.handle(&instruction, strategy.as_mut()).is_err() {
            return;
        }
        if game.is_finished() {
            assert_valid_game_record(game.record());
            return;
        }
    }
});
