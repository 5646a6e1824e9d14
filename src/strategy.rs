use fnv::FnvHashMap;
use rand_chacha::ChaChaRng;

use crate::game::GameView;
use crate::strategies::optimal::OptimalStrategy;
use crate::strategies::random::RandomStrategy;

pub const DEFAULT_STRATEGY_KEY: &str = "optimal";

/// A move-selection policy for one player. The set of policies is closed,
/// so dispatch is a plain match.
///
/// Contract: `get_next_move` always returns a magnitude that is legal for
/// the given snapshot, and is never invoked once the game is over.
#[derive(Debug)]
pub enum Strategy {
    Random(RandomStrategy),
    Optimal(OptimalStrategy),
}

impl Strategy {
    pub fn get_next_move(&mut self, view: &GameView) -> u32 {
        match self {
            Strategy::Random(strategy) => strategy.get_next_move(view),
            Strategy::Optimal(strategy) => strategy.get_next_move(view),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Random(_) => "random",
            Strategy::Optimal(_) => "optimal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyError {
    #[error("strategy \"{0}\" not found")]
    UnknownStrategy(String),
}

type StrategyCtor = fn(ChaChaRng) -> Strategy;

/// Maps strategy keys to constructors. Populated once at start-up; the
/// engine never resolves names mid-game.
pub struct StrategyRegistry {
    ctors: FnvHashMap<&'static str, StrategyCtor>,
}

impl StrategyRegistry {
    pub fn new() -> StrategyRegistry {
        let mut registry = StrategyRegistry {
            ctors: FnvHashMap::default(),
        };
        registry.register("random", |rng| Strategy::Random(RandomStrategy::new(rng)));
        registry.register("optimal", |rng| Strategy::Optimal(OptimalStrategy::new(rng)));
        registry
    }

    pub fn register(&mut self, key: &'static str, ctor: StrategyCtor) {
        self.ctors.insert(key, ctor);
    }

    pub fn resolve(&self, key: &str, rng: ChaChaRng) -> Result<Strategy, StrategyError> {
        match self.ctors.get(key) {
            Some(ctor) => Ok(ctor(rng)),
            None => Err(StrategyError::UnknownStrategy(key.to_string())),
        }
    }

    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = self.ctors.keys().copied().collect::<Vec<_>>();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::game::{Game, GameConfig};

    fn rng() -> ChaChaRng {
        ChaChaRng::seed_from_u64(0)
    }

    #[test]
    fn registry_resolves_the_builtin_strategies() {
        let registry = StrategyRegistry::new();
        let optimal = registry.resolve("optimal", rng()).unwrap();
        assert_eq!(optimal.name(), "optimal");
        let random = registry.resolve("random", rng()).unwrap();
        assert_eq!(random.name(), "random");
        assert_eq!(registry.keys(), vec!["optimal", "random"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let registry = StrategyRegistry::new();
        assert_eq!(
            registry.resolve("psychic", rng()).unwrap_err(),
            StrategyError::UnknownStrategy("psychic".to_string())
        );
    }

    #[test]
    fn dispatched_moves_are_legal() {
        let game = Game::new(GameConfig::default()).unwrap();
        let registry = StrategyRegistry::new();
        for key in registry.keys() {
            let mut strategy = registry.resolve(key, rng()).unwrap();
            let mov = strategy.get_next_move(&game.view());
            assert!((1..=game.max_move()).contains(&mov), "{} misbehaved", key);
        }
    }
}
