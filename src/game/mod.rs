//! The built game: a pure reducer over [`State`].
//!
//! ## Lifecycle
//!
//! ```text
//! GameConfig --Game::new--> Game --initial_state--> State
//!                             |
//!               apply(State, Action) -> State
//! ```
//!
//! A `Game` is immutable once built. Every plugin wrap is applied during
//! construction, so applying actions never re-wraps or re-normalizes.

mod builder;
mod dispatch;
mod reducer;
mod state;

pub use builder::IntoGame;
pub use state::State;

use crate::core::config::{PlayerViewFn, SetupFn};
use crate::flow::Flow;
use crate::plugins::Pipeline;

use dispatch::Dispatcher;

/// A validated game definition.
///
/// ## Example
///
/// ```
/// use turn_engine::core::{GameConfig, PlayerId};
/// use turn_engine::game::Game;
///
/// let game = Game::new(
///     GameConfig::<u32>::new("counter")
///         .with_move("bump", |g: &u32, _, _| Some(g + 1))
///         .with_move_limit(1),
/// )
/// .unwrap();
///
/// let state = game.initial_state(2, Some(7)).unwrap();
/// let state = game.make_move(state, "bump", PlayerId::new(0), &[]);
///
/// assert_eq!(state.g, 1);
/// assert_eq!(state.ctx.current_player, PlayerId::new(1));
/// ```
pub struct Game<G> {
    name: String,
    setup: SetupFn<G>,
    dispatcher: Dispatcher<G>,
    flow: Flow<G>,
    pipeline: Pipeline<G>,
    player_view: Option<PlayerViewFn<G>>,
    seed: Option<u64>,
}

impl<G: 'static> std::fmt::Debug for Game<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("name", &self.name)
            .field("moves", &self.dispatcher)
            .field("flow", &self.flow)
            .field("plugins", &self.pipeline.plugins().len())
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
