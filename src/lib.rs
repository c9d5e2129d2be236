//! # turn-engine
//!
//! A deterministic engine for turn-based games.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: no hardcoded phases, moves or players. Games
//!    describe themselves through `GameConfig`.
//!
//! 2. **Pure Reducer**: `Game::apply(State, Action) -> State`. Input that
//!    cannot be applied returns the state unchanged; nothing panics on
//!    player input.
//!
//! 3. **Reproducible**: all randomness comes from a seeded ChaCha stream
//!    stored in the context, so replays with the same seed match exactly.
//!
//! ## Architecture
//!
//! - **Phase / turn / move layers**: a state machine runs phases and turns;
//!   moves are dispatched inside the active phase.
//!
//! - **Plugins**: every move and hook is wrapped once at construction by the
//!   registered plugins, first plugin outermost.
//!
//! - **Persistent Data Structures**: `im` vectors keep context snapshots cheap
//!   for undo and replay.
//!
//! ## Modules
//!
//! - `core`: players, context, actions, RNG, configuration, errors
//! - `turn_order`: who acts first, next, and during a turn
//! - `plugins`: the function-wrapping pipeline
//! - `flow`: the phase/turn state machine and events handle
//! - `game`: the built reducer and its state
//! - `games`: sample games

pub mod core;
pub mod flow;
pub mod game;
pub mod games;
pub mod plugins;
pub mod turn_order;

// Re-export commonly used types
pub use crate::core::{
    Action, ConfigError, Context, GameConfig, GameEvent, GameRng, GameRngState, LogEntry, Move,
    MoveAction, MoveDef, PhaseConfig, PhaseId, PlayerId, PlayerMap,
};

pub use crate::flow::Events;
pub use crate::game::{Game, IntoGame, State};
pub use crate::plugins::{FnContext, GameFn, Plugin};
pub use crate::turn_order::TurnOrder;
