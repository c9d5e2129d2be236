//! Game configuration types.
//!
//! Games describe themselves declaratively:
//! - `GameConfig`: setup, moves, flow defaults, phases, termination, plugins
//! - `PhaseConfig`: hooks, predicates, turn order and limits of one phase
//! - `Move` / `MoveDef`: a move function plus metadata
//!
//! A `GameConfig` is only a description. `Game::new` normalizes and validates
//! it into an immutable reducer; the config itself is never mutated.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::context::Context;
use super::player::PlayerId;
use crate::plugins::{FnContext, GameFn, Plugin};
use crate::turn_order::TurnOrder;

/// Phase identifier. Games name their own phases.
///
/// The engine only compares phase ids. When a game declares no phases, the
/// implicit phase [`PhaseId::DEFAULT`] is active for the whole game.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhaseId(String);

impl PhaseId {
    /// Name of the implicit phase.
    pub const DEFAULT: &'static str = "default";

    /// Create a new phase ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The implicit phase.
    #[must_use]
    pub fn default_phase() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    /// Get the raw name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Is this the implicit phase?
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }
}

impl std::fmt::Display for PhaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhaseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PhaseId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Request to end the phase, optionally overriding the phase's `next`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndPhase {
    pub next: Option<PhaseId>,
}

impl EndPhase {
    /// End the phase and go to `next`.
    pub fn to(next: impl Into<PhaseId>) -> Self {
        Self {
            next: Some(next.into()),
        }
    }
}

/// Request to end the turn, optionally naming the next player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EndTurn {
    pub next: Option<PlayerId>,
}

impl EndTurn {
    /// End the turn and hand it to `next`.
    #[must_use]
    pub fn to(next: PlayerId) -> Self {
        Self { next: Some(next) }
    }
}

/// Produces the initial game state.
pub type SetupFn<G> = Arc<dyn Fn(&mut FnContext<'_>) -> G + Send + Sync>;

/// Game-over predicate. `Some(payload)` ends the game.
pub type EndGameIfFn<G> = Arc<dyn Fn(&G, &Context) -> Option<Value> + Send + Sync>;

/// Phase-end predicate.
pub type EndPhaseIfFn<G> = Arc<dyn Fn(&G, &Context) -> Option<EndPhase> + Send + Sync>;

/// Turn-end predicate.
pub type EndTurnIfFn<G> = Arc<dyn Fn(&G, &Context) -> Option<EndTurn> + Send + Sync>;

/// Redaction applied before state is shown to a player (`None` = spectator).
pub type PlayerViewFn<G> = Arc<dyn Fn(&G, &Context, Option<PlayerId>) -> G + Send + Sync>;

/// A move with metadata.
pub struct MoveDef<G> {
    /// The function. A definition without one resolves to a no-op.
    pub func: Option<GameFn<G>>,

    /// Hide this move's arguments from other players in the log.
    pub redact: bool,

    /// May this move be undone?
    pub undoable: bool,
}

impl<G: 'static> MoveDef<G> {
    /// Create a definition around a move function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&G, &mut FnContext<'_>, &[Value]) -> Option<G> + Send + Sync + 'static,
    {
        Self {
            func: Some(GameFn::new(f)),
            redact: false,
            undoable: true,
        }
    }

    /// A definition with no function (declared but inert).
    #[must_use]
    pub fn inert() -> Self {
        Self {
            func: None,
            redact: false,
            undoable: true,
        }
    }

    /// Mark arguments as secret.
    #[must_use]
    pub fn redacted(mut self) -> Self {
        self.redact = true;
        self
    }

    /// Forbid undoing this move.
    #[must_use]
    pub fn not_undoable(mut self) -> Self {
        self.undoable = false;
        self
    }
}

impl<G> Clone for MoveDef<G> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            redact: self.redact,
            undoable: self.undoable,
        }
    }
}

/// A registered move: a bare function or a definition with metadata.
pub enum Move<G> {
    Fn(GameFn<G>),
    Def(MoveDef<G>),
}

impl<G> Move<G> {
    /// The callable, if any.
    #[must_use]
    pub fn func(&self) -> Option<&GameFn<G>> {
        match self {
            Move::Fn(f) => Some(f),
            Move::Def(def) => def.func.as_ref(),
        }
    }

    /// Are the arguments secret?
    #[must_use]
    pub fn redact(&self) -> bool {
        matches!(self, Move::Def(def) if def.redact)
    }

    /// May the move be undone?
    #[must_use]
    pub fn undoable(&self) -> bool {
        match self {
            Move::Fn(_) => true,
            Move::Def(def) => def.undoable,
        }
    }
}

impl<G> Clone for Move<G> {
    fn clone(&self) -> Self {
        match self {
            Move::Fn(f) => Move::Fn(f.clone()),
            Move::Def(def) => Move::Def(def.clone()),
        }
    }
}

impl<G> std::fmt::Debug for Move<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Fn(_) => f.write_str("Move::Fn"),
            Move::Def(def) => f
                .debug_struct("Move::Def")
                .field("callable", &def.func.is_some())
                .field("redact", &def.redact)
                .field("undoable", &def.undoable)
                .finish(),
        }
    }
}

/// Configuration of one phase.
///
/// Every field is optional. Unset turn-level fields (turn order, move limit,
/// turn hooks, `on_move`, `end_turn_if`, allowed moves) are inherited from the
/// game-level flow defaults when the game is built.
pub struct PhaseConfig<G> {
    pub(crate) next: Option<PhaseId>,
    pub(crate) on_phase_begin: Option<GameFn<G>>,
    pub(crate) on_phase_end: Option<GameFn<G>>,
    pub(crate) on_turn_begin: Option<GameFn<G>>,
    pub(crate) on_turn_end: Option<GameFn<G>>,
    pub(crate) on_move: Option<GameFn<G>>,
    pub(crate) end_phase_if: Option<EndPhaseIfFn<G>>,
    pub(crate) end_turn_if: Option<EndTurnIfFn<G>>,
    pub(crate) end_game_if: Option<EndGameIfFn<G>>,
    pub(crate) turn_order: Option<TurnOrder<G>>,
    pub(crate) move_limit: Option<u32>,
    pub(crate) allowed_moves: Option<Vec<String>>,
}

impl<G> Default for PhaseConfig<G> {
    fn default() -> Self {
        Self {
            next: None,
            on_phase_begin: None,
            on_phase_end: None,
            on_turn_begin: None,
            on_turn_end: None,
            on_move: None,
            end_phase_if: None,
            end_turn_if: None,
            end_game_if: None,
            turn_order: None,
            move_limit: None,
            allowed_moves: None,
        }
    }
}

impl<G> Clone for PhaseConfig<G> {
    fn clone(&self) -> Self {
        Self {
            next: self.next.clone(),
            on_phase_begin: self.on_phase_begin.clone(),
            on_phase_end: self.on_phase_end.clone(),
            on_turn_begin: self.on_turn_begin.clone(),
            on_turn_end: self.on_turn_end.clone(),
            on_move: self.on_move.clone(),
            end_phase_if: self.end_phase_if.clone(),
            end_turn_if: self.end_turn_if.clone(),
            end_game_if: self.end_game_if.clone(),
            turn_order: self.turn_order.clone(),
            move_limit: self.move_limit,
            allowed_moves: self.allowed_moves.clone(),
        }
    }
}

impl<G> std::fmt::Debug for PhaseConfig<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseConfig")
            .field("next", &self.next)
            .field("turn_order", &self.turn_order)
            .field("move_limit", &self.move_limit)
            .field("allowed_moves", &self.allowed_moves)
            .finish_non_exhaustive()
    }
}

impl<G: 'static> PhaseConfig<G> {
    /// Create an empty phase configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase entered when this one ends without an explicit target.
    #[must_use]
    pub fn with_next(mut self, next: impl Into<PhaseId>) -> Self {
        self.next = Some(next.into());
        self
    }

    /// Set the turn order.
    #[must_use]
    pub fn with_turn_order(mut self, order: TurnOrder<G>) -> Self {
        self.turn_order = Some(order);
        self
    }

    /// End the turn automatically once the acting player made `limit` moves.
    #[must_use]
    pub fn with_move_limit(mut self, limit: u32) -> Self {
        self.move_limit = Some(limit);
        self
    }

    /// Restrict this phase to the named moves.
    #[must_use]
    pub fn with_allowed_moves<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_moves = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Hook run when the phase begins.
    #[must_use]
    pub fn on_phase_begin<F>(mut self, f: F) -> Self
    where
        F: Fn(&G, &mut FnContext<'_>) -> Option<G> + Send + Sync + 'static,
    {
        self.on_phase_begin = Some(GameFn::hook(f));
        self
    }

    /// Hook run when the phase ends.
    #[must_use]
    pub fn on_phase_end<F>(mut self, f: F) -> Self
    where
        F: Fn(&G, &mut FnContext<'_>) -> Option<G> + Send + Sync + 'static,
    {
        self.on_phase_end = Some(GameFn::hook(f));
        self
    }

    /// Hook run when a turn begins.
    #[must_use]
    pub fn on_turn_begin<F>(mut self, f: F) -> Self
    where
        F: Fn(&G, &mut FnContext<'_>) -> Option<G> + Send + Sync + 'static,
    {
        self.on_turn_begin = Some(GameFn::hook(f));
        self
    }

    /// Hook run when a turn ends.
    #[must_use]
    pub fn on_turn_end<F>(mut self, f: F) -> Self
    where
        F: Fn(&G, &mut FnContext<'_>) -> Option<G> + Send + Sync + 'static,
    {
        self.on_turn_end = Some(GameFn::hook(f));
        self
    }

    /// Hook run after every successful move; receives the move's arguments.
    #[must_use]
    pub fn on_move<F>(mut self, f: F) -> Self
    where
        F: Fn(&G, &mut FnContext<'_>, &[Value]) -> Option<G> + Send + Sync + 'static,
    {
        self.on_move = Some(GameFn::new(f));
        self
    }

    /// End the phase whenever `f` returns true.
    #[must_use]
    pub fn end_phase_if<F>(self, f: F) -> Self
    where
        F: Fn(&G, &Context) -> bool + Send + Sync + 'static,
    {
        self.end_phase_with(move |g, ctx| f(g, ctx).then(EndPhase::default))
    }

    /// End the phase whenever `f` returns `Some`, honoring its `next`.
    #[must_use]
    pub fn end_phase_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&G, &Context) -> Option<EndPhase> + Send + Sync + 'static,
    {
        self.end_phase_if = Some(Arc::new(f));
        self
    }

    /// End the turn whenever `f` returns true.
    #[must_use]
    pub fn end_turn_if<F>(self, f: F) -> Self
    where
        F: Fn(&G, &Context) -> bool + Send + Sync + 'static,
    {
        self.end_turn_with(move |g, ctx| f(g, ctx).then(EndTurn::default))
    }

    /// End the turn whenever `f` returns `Some`, honoring its `next`.
    #[must_use]
    pub fn end_turn_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&G, &Context) -> Option<EndTurn> + Send + Sync + 'static,
    {
        self.end_turn_if = Some(Arc::new(f));
        self
    }

    /// Game-over predicate used instead of the game-level one in this phase.
    #[must_use]
    pub fn end_game_if<F>(mut self, f: F) -> Self
    where
        F: Fn(&G, &Context) -> Option<Value> + Send + Sync + 'static,
    {
        self.end_game_if = Some(Arc::new(f));
        self
    }

    /// Fill unset turn-level fields from `defaults`.
    #[must_use]
    pub(crate) fn inherit(self, defaults: &PhaseConfig<G>) -> Self {
        Self {
            on_turn_begin: self.on_turn_begin.or_else(|| defaults.on_turn_begin.clone()),
            on_turn_end: self.on_turn_end.or_else(|| defaults.on_turn_end.clone()),
            on_move: self.on_move.or_else(|| defaults.on_move.clone()),
            end_turn_if: self.end_turn_if.or_else(|| defaults.end_turn_if.clone()),
            turn_order: self.turn_order.or_else(|| defaults.turn_order.clone()),
            move_limit: self.move_limit.or(defaults.move_limit),
            allowed_moves: self.allowed_moves.or_else(|| defaults.allowed_moves.clone()),
            ..self
        }
    }
}

/// Complete game description.
///
/// ## Example
///
/// ```
/// use turn_engine::core::{GameConfig, PhaseConfig};
/// use turn_engine::turn_order::TurnOrder;
///
/// let config = GameConfig::<u32>::new("counter")
///     .with_move("bump", |g, _, _| Some(g + 1))
///     .with_phase(
///         "draft",
///         PhaseConfig::new().with_turn_order(TurnOrder::any_once()).with_next("play"),
///     )
///     .with_phase("play", PhaseConfig::new().with_move_limit(1))
///     .with_starting_phase("draft");
///
/// assert_eq!(config.move_count(), 1);
/// assert_eq!(config.phase_count(), 2);
/// ```
pub struct GameConfig<G> {
    pub(crate) name: String,
    pub(crate) setup: SetupFn<G>,
    pub(crate) moves: FxHashMap<String, Move<G>>,
    pub(crate) flow: PhaseConfig<G>,
    pub(crate) phases: Vec<(PhaseId, PhaseConfig<G>)>,
    pub(crate) starting_phase: Option<PhaseId>,
    pub(crate) end_if: Option<EndGameIfFn<G>>,
    pub(crate) on_end: Option<GameFn<G>>,
    pub(crate) player_view: Option<PlayerViewFn<G>>,
    pub(crate) plugins: Vec<Plugin<G>>,
    pub(crate) seed: Option<u64>,
    pub(crate) max_transitions: usize,
}

/// Default cap on turn/phase transitions within one reducer call.
pub const DEFAULT_MAX_TRANSITIONS: usize = 64;

impl<G: Default + 'static> GameConfig<G> {
    /// Create a configuration whose setup returns `G::default()`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_setup(name, |_| G::default())
    }
}

impl<G: 'static> GameConfig<G> {
    /// Create a configuration with a setup function.
    ///
    /// Setup receives a [`FnContext`] so it can use the seeded randomness.
    pub fn from_setup<F>(name: impl Into<String>, setup: F) -> Self
    where
        F: Fn(&mut FnContext<'_>) -> G + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            setup: Arc::new(setup),
            moves: FxHashMap::default(),
            flow: PhaseConfig::default(),
            phases: Vec::new(),
            starting_phase: None,
            end_if: None,
            on_end: None,
            player_view: None,
            plugins: Vec::new(),
            seed: None,
            max_transitions: DEFAULT_MAX_TRANSITIONS,
        }
    }

    /// Replace the setup function.
    #[must_use]
    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: Fn(&mut FnContext<'_>) -> G + Send + Sync + 'static,
    {
        self.setup = Arc::new(setup);
        self
    }

    /// Register a move function.
    #[must_use]
    pub fn with_move<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&G, &mut FnContext<'_>, &[Value]) -> Option<G> + Send + Sync + 'static,
    {
        self.moves.insert(name.into(), Move::Fn(GameFn::new(f)));
        self
    }

    /// Register a move with metadata.
    #[must_use]
    pub fn with_move_def(mut self, name: impl Into<String>, def: MoveDef<G>) -> Self {
        self.moves.insert(name.into(), Move::Def(def));
        self
    }

    /// Game-level flow defaults. They configure the implicit phase and are
    /// inherited by declared phases.
    #[must_use]
    pub fn with_flow(mut self, flow: PhaseConfig<G>) -> Self {
        self.flow = flow;
        self
    }

    /// Default turn order (shorthand for a flow default).
    #[must_use]
    pub fn with_turn_order(mut self, order: TurnOrder<G>) -> Self {
        self.flow.turn_order = Some(order);
        self
    }

    /// Default move limit (shorthand for a flow default).
    #[must_use]
    pub fn with_move_limit(mut self, limit: u32) -> Self {
        self.flow.move_limit = Some(limit);
        self
    }

    /// Declare a phase.
    #[must_use]
    pub fn with_phase(mut self, id: impl Into<PhaseId>, phase: PhaseConfig<G>) -> Self {
        self.phases.push((id.into(), phase));
        self
    }

    /// Phase active when the game starts (default: the implicit phase).
    #[must_use]
    pub fn with_starting_phase(mut self, id: impl Into<PhaseId>) -> Self {
        self.starting_phase = Some(id.into());
        self
    }

    /// Game-over predicate.
    #[must_use]
    pub fn end_if<F>(mut self, f: F) -> Self
    where
        F: Fn(&G, &Context) -> Option<Value> + Send + Sync + 'static,
    {
        self.end_if = Some(Arc::new(f));
        self
    }

    /// Hook run once when the game ends.
    #[must_use]
    pub fn on_end<F>(mut self, f: F) -> Self
    where
        F: Fn(&G, &mut FnContext<'_>) -> Option<G> + Send + Sync + 'static,
    {
        self.on_end = Some(GameFn::hook(f));
        self
    }

    /// Redaction applied by `Game::player_view`.
    #[must_use]
    pub fn with_player_view<F>(mut self, f: F) -> Self
    where
        F: Fn(&G, &Context, Option<PlayerId>) -> G + Send + Sync + 'static,
    {
        self.player_view = Some(Arc::new(f));
        self
    }

    /// Register a plugin. Registration order is wrapping order.
    #[must_use]
    pub fn with_plugin(mut self, plugin: Plugin<G>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Seed used when `initial_state` is not given one.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cap on turn/phase transitions per reducer call.
    #[must_use]
    pub fn with_max_transitions(mut self, max: usize) -> Self {
        self.max_transitions = max;
        self
    }

    /// Game name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of registered moves.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Number of declared phases.
    #[must_use]
    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }
}

impl<G> std::fmt::Debug for GameConfig<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut moves: Vec<_> = self.moves.keys().collect();
        moves.sort();
        f.debug_struct("GameConfig")
            .field("name", &self.name)
            .field("moves", &moves)
            .field("phases", &self.phases.iter().map(|(id, _)| id).collect::<Vec<_>>())
            .field("starting_phase", &self.starting_phase)
            .field("plugins", &self.plugins)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_id() {
        let id = PhaseId::new("draft");
        assert_eq!(id.as_str(), "draft");
        assert_eq!(format!("{}", id), "draft");
        assert!(!id.is_default());
        assert!(PhaseId::default_phase().is_default());
        assert_eq!(PhaseId::from("draft"), id);
    }

    #[test]
    fn test_move_variants() {
        let plain: Move<u32> = Move::Fn(GameFn::new(|g: &u32, _, _| Some(g + 1)));
        assert!(plain.func().is_some());
        assert!(!plain.redact());
        assert!(plain.undoable());

        let secret: Move<u32> =
            Move::Def(MoveDef::new(|g: &u32, _, _| Some(*g)).redacted().not_undoable());
        assert!(secret.func().is_some());
        assert!(secret.redact());
        assert!(!secret.undoable());

        let inert: Move<u32> = Move::Def(MoveDef::inert());
        assert!(inert.func().is_none());
    }

    #[test]
    fn test_phase_inherits_turn_fields() {
        let defaults = PhaseConfig::<u32>::new()
            .with_move_limit(2)
            .with_turn_order(TurnOrder::any())
            .with_allowed_moves(["a"])
            .on_turn_begin(|g, _| Some(g + 1));
        let phase = PhaseConfig::new()
            .with_move_limit(1)
            .with_next("next")
            .inherit(&defaults);

        assert_eq!(phase.move_limit, Some(1));
        assert!(phase.turn_order.is_some());
        assert!(phase.on_turn_begin.is_some());
        assert_eq!(phase.allowed_moves, Some(vec!["a".to_string()]));
        assert_eq!(phase.next, Some(PhaseId::new("next")));
        assert!(phase.on_phase_begin.is_none());
    }

    #[test]
    fn test_end_phase_if_bool_adapter() {
        let phase = PhaseConfig::<u32>::new().end_phase_if(|g, _| *g > 3);
        let ctx = Context::new(2, 0, PhaseId::default_phase());
        let pred = phase.end_phase_if.as_ref().map(Arc::clone);

        assert!(pred.as_ref().is_some_and(|p| p(&1, &ctx).is_none()));
        assert!(pred.as_ref().is_some_and(|p| p(&4, &ctx) == Some(EndPhase::default())));
    }

    #[test]
    fn test_game_config_builder() {
        let config = GameConfig::<u32>::new("test")
            .with_move("a", |g, _, _| Some(g + 1))
            .with_move_def("b", MoveDef::inert())
            .with_phase("one", PhaseConfig::new())
            .with_starting_phase("one")
            .with_seed(9)
            .with_move_limit(1);

        assert_eq!(config.name(), "test");
        assert_eq!(config.move_count(), 2);
        assert_eq!(config.phase_count(), 1);
        assert_eq!(config.starting_phase, Some(PhaseId::new("one")));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.flow.move_limit, Some(1));
        assert_eq!(config.max_transitions, DEFAULT_MAX_TRANSITIONS);
    }
}
