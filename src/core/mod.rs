//! Core engine types: players, context, actions, RNG, configuration.
//!
//! Everything here is game-agnostic. Games describe themselves through
//! `GameConfig` rather than by extending these types.

pub mod action;
pub mod config;
pub mod context;
pub mod error;
pub mod player;
pub mod rng;

pub use action::{Action, GameEvent, LogEntry, LoggedAction, MoveAction, MoveArgs};
pub use config::{
    EndPhase, EndTurn, GameConfig, Move, MoveDef, PhaseConfig, PhaseId, DEFAULT_MAX_TRANSITIONS,
};
pub use context::{Context, MoveStats, Stats};
pub use error::ConfigError;
pub use player::{PlayerId, PlayerMap, MAX_PLAYERS};
pub use rng::{GameRng, GameRngState};
