//! Normalization and validation of a `GameConfig`.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::{ConfigError, GameConfig, PhaseConfig, PhaseId};
use crate::flow::{Flow, Phase};
use crate::plugins::Pipeline;

use super::dispatch::Dispatcher;
use super::Game;

/// Anything that can become a built [`Game`].
///
/// Implemented for both [`GameConfig`] and [`Game`], so building an already
/// built game hands it back unchanged.
pub trait IntoGame<G> {
    fn into_game(self) -> Result<Game<G>, ConfigError>;
}

impl<G: Clone + 'static> IntoGame<G> for GameConfig<G> {
    fn into_game(self) -> Result<Game<G>, ConfigError> {
        Game::new(self)
    }
}

impl<G> IntoGame<G> for Game<G> {
    fn into_game(self) -> Result<Game<G>, ConfigError> {
        Ok(self)
    }
}

impl<G: Clone + 'static> Game<G> {
    /// Validate `config` and build the reducer.
    ///
    /// Declared phases inherit unset turn-level fields from the flow
    /// defaults. The implicit default phase is the flow defaults themselves,
    /// unless the game declares a phase named `default`.
    pub fn new(config: GameConfig<G>) -> Result<Self, ConfigError> {
        let GameConfig {
            name,
            setup,
            moves,
            flow,
            phases,
            starting_phase,
            end_if,
            on_end,
            player_view,
            plugins,
            seed,
            max_transitions,
        } = config;

        let mut declared: FxHashMap<PhaseId, PhaseConfig<G>> = FxHashMap::default();
        for (id, phase) in phases {
            if declared.contains_key(&id) {
                return Err(ConfigError::DuplicatePhase(id));
            }
            declared.insert(id, phase.inherit(&flow));
        }
        declared
            .entry(PhaseId::default_phase())
            .or_insert_with(|| flow.clone());

        let mut ids: Vec<&PhaseId> = declared.keys().collect();
        ids.sort();
        for id in ids {
            let phase = &declared[id];
            if let Some(next) = &phase.next {
                if !declared.contains_key(next) {
                    return Err(ConfigError::UnknownPhase {
                        from: id.clone(),
                        next: next.clone(),
                    });
                }
            }
            if phase.move_limit == Some(0) {
                return Err(ConfigError::ZeroMoveLimit(id.clone()));
            }
            if let Some(name) = phase
                .allowed_moves
                .iter()
                .flatten()
                .find(|name| !moves.contains_key(name.as_str()))
            {
                return Err(ConfigError::UnknownAllowedMove {
                    phase: id.clone(),
                    name: name.clone(),
                });
            }
        }

        let starting_phase = starting_phase.unwrap_or_else(PhaseId::default_phase);
        if !declared.contains_key(&starting_phase) {
            return Err(ConfigError::UnknownStartingPhase(starting_phase));
        }

        let pipeline = Pipeline::new(plugins);
        let phases: FxHashMap<PhaseId, Phase<G>> = declared
            .into_iter()
            .map(|(id, phase)| (id.clone(), Phase::build(id, phase, &pipeline)))
            .collect();
        let fallback = match phases.get(&PhaseId::default_phase()) {
            Some(phase) => phase.clone(),
            None => Phase::build(PhaseId::default_phase(), flow, &pipeline),
        };
        let dispatcher = Dispatcher::new(moves, &pipeline);

        debug!(
            game = %name,
            moves = dispatcher.names().len(),
            phases = phases.len(),
            plugins = pipeline.plugins().len(),
            "game built"
        );

        let flow = Flow::new(
            phases,
            fallback,
            starting_phase,
            end_if,
            pipeline.wrap_opt(on_end),
            max_transitions,
        );

        Ok(Self {
            name,
            setup,
            dispatcher,
            flow,
            pipeline,
            player_view,
            seed,
        })
    }

    /// Build from a config or pass an already built game through.
    pub fn build(source: impl IntoGame<G>) -> Result<Self, ConfigError> {
        source.into_game()
    }

    /// Game name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered move names, sorted. Includes inert moves.
    #[must_use]
    pub fn move_names(&self) -> &[String] {
        self.dispatcher.names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MoveDef;

    fn base() -> GameConfig<u32> {
        GameConfig::<u32>::new("test")
            .with_move("a", |g: &u32, _, _| Some(g + 1))
            .with_move_def("b", MoveDef::inert())
    }

    #[test]
    fn test_builds_with_implicit_phase() {
        let game = Game::new(base()).unwrap();

        assert_eq!(game.name(), "test");
        assert_eq!(game.move_names(), ["a", "b"]);
        assert!(game.flow.has_phase(&PhaseId::default_phase()));
    }

    #[test]
    fn test_unknown_next_phase() {
        let config = base().with_phase("one", PhaseConfig::new().with_next("two"));

        assert_eq!(
            Game::new(config).unwrap_err(),
            ConfigError::UnknownPhase {
                from: PhaseId::new("one"),
                next: PhaseId::new("two"),
            }
        );
    }

    #[test]
    fn test_unknown_starting_phase() {
        let config = base().with_starting_phase("nowhere");
        assert_eq!(
            Game::new(config).unwrap_err(),
            ConfigError::UnknownStartingPhase(PhaseId::new("nowhere"))
        );
    }

    #[test]
    fn test_unknown_allowed_move() {
        let config = base().with_phase("one", PhaseConfig::new().with_allowed_moves(["a", "zap"]));
        assert_eq!(
            Game::new(config).unwrap_err(),
            ConfigError::UnknownAllowedMove {
                phase: PhaseId::new("one"),
                name: "zap".into(),
            }
        );
    }

    #[test]
    fn test_zero_move_limit() {
        assert_eq!(
            Game::new(base().with_move_limit(0)).unwrap_err(),
            ConfigError::ZeroMoveLimit(PhaseId::default_phase())
        );
    }

    #[test]
    fn test_duplicate_phase() {
        let config = base()
            .with_phase("one", PhaseConfig::new())
            .with_phase("one", PhaseConfig::new());
        assert_eq!(
            Game::new(config).unwrap_err(),
            ConfigError::DuplicatePhase(PhaseId::new("one"))
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let game = Game::build(base()).unwrap();
        let again = Game::build(game).unwrap();

        assert_eq!(again.move_names(), ["a", "b"]);
    }
}
