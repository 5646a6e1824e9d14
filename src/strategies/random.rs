use rand::Rng;
use rand_chacha::ChaChaRng;

use crate::game::GameView;

/// Picks uniformly among the legal magnitudes. No lookahead.
#[derive(Debug)]
pub struct RandomStrategy {
    rng: ChaChaRng,
}

impl RandomStrategy {
    pub fn new(rng: ChaChaRng) -> RandomStrategy {
        RandomStrategy { rng }
    }

    pub fn get_next_move(&mut self, view: &GameView) -> u32 {
        debug_assert!(!view.state.is_terminal(), "strategy invoked on a finished game");
        // a move past the remaining distance would overshoot the target
        let ceiling = view.max_move.min(view.remaining());
        self.rng.gen_range(1..=ceiling)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::game::{Operation, State};

    fn view(remaining: u32, max_move: u32) -> GameView {
        let target = remaining + max_move + 1;
        GameView {
            operation: Operation::Addition,
            max_move,
            target,
            count: target - remaining,
            state: State::PlayerOneMove,
        }
    }

    #[test]
    fn moves_stay_within_the_bound() {
        let mut strategy = RandomStrategy::new(ChaChaRng::seed_from_u64(7));
        for _ in 0..200 {
            let mov = strategy.get_next_move(&view(50, 10));
            assert!((1..=10).contains(&mov));
        }
    }

    #[test]
    fn moves_never_overshoot_a_short_remaining() {
        let mut strategy = RandomStrategy::new(ChaChaRng::seed_from_u64(7));
        for _ in 0..200 {
            let mov = strategy.get_next_move(&view(3, 10));
            assert!((1..=3).contains(&mov));
        }
    }

    #[test]
    fn fixed_seed_reproduces_the_same_moves() {
        let mut first = RandomStrategy::new(ChaChaRng::seed_from_u64(99));
        let mut second = RandomStrategy::new(ChaChaRng::seed_from_u64(99));
        let view = view(50, 10);
        for _ in 0..50 {
            assert_eq!(first.get_next_move(&view), second.get_next_move(&view));
        }
    }
}
