use rand::Rng;
use rand_chacha::ChaChaRng;

use crate::game::GameView;

/// Perfect play for a race-to-target game with moves in [1, max_move]:
/// leave the opponent a remaining distance that is a multiple of
/// (max_move + 1), then answer every reply m with (max_move + 1 - m).
#[derive(Debug)]
pub struct OptimalStrategy {
    rng: ChaChaRng,
}

impl OptimalStrategy {
    pub fn new(rng: ChaChaRng) -> OptimalStrategy {
        OptimalStrategy { rng }
    }

    pub fn get_next_move(&mut self, view: &GameView) -> u32 {
        debug_assert!(!view.state.is_terminal(), "strategy invoked on a finished game");
        let remaining = view.remaining();
        let modulus = view.max_move + 1;
        let remainder = remaining % modulus;
        if remainder > 0 {
            remainder
        } else {
            // Lost position against perfect play; any legal move does.
            remaining.min(self.rng.gen_range(1..=view.max_move))
        }
    }
}
