//! Normalized phase: every hook wrapped, turn order resolved.

use rustc_hash::FxHashSet;

use crate::core::config::{EndGameIfFn, EndPhaseIfFn, EndTurnIfFn};
use crate::core::{PhaseConfig, PhaseId};
use crate::plugins::{GameFn, Pipeline};
use crate::turn_order::TurnOrder;

/// A phase as the flow machine runs it.
pub(crate) struct Phase<G> {
    pub(crate) id: PhaseId,
    pub(crate) next: Option<PhaseId>,
    pub(crate) on_phase_begin: Option<GameFn<G>>,
    pub(crate) on_phase_end: Option<GameFn<G>>,
    pub(crate) on_turn_begin: Option<GameFn<G>>,
    pub(crate) on_turn_end: Option<GameFn<G>>,
    pub(crate) on_move: Option<GameFn<G>>,
    pub(crate) end_phase_if: Option<EndPhaseIfFn<G>>,
    pub(crate) end_turn_if: Option<EndTurnIfFn<G>>,
    pub(crate) end_game_if: Option<EndGameIfFn<G>>,
    pub(crate) turn_order: TurnOrder<G>,
    pub(crate) move_limit: Option<u32>,
    pub(crate) allowed_moves: Option<FxHashSet<String>>,
}

impl<G: 'static> Phase<G> {
    /// Build from an already-inherited config, wrapping hooks once.
    pub(crate) fn build(id: PhaseId, config: PhaseConfig<G>, pipeline: &Pipeline<G>) -> Self {
        Self {
            id,
            next: config.next,
            on_phase_begin: pipeline.wrap_opt(config.on_phase_begin),
            on_phase_end: pipeline.wrap_opt(config.on_phase_end),
            on_turn_begin: pipeline.wrap_opt(config.on_turn_begin),
            on_turn_end: pipeline.wrap_opt(config.on_turn_end),
            on_move: pipeline.wrap_opt(config.on_move),
            end_phase_if: config.end_phase_if,
            end_turn_if: config.end_turn_if,
            end_game_if: config.end_game_if,
            turn_order: config.turn_order.unwrap_or_default(),
            move_limit: config.move_limit,
            allowed_moves: config.allowed_moves.map(|names| names.into_iter().collect()),
        }
    }
}

impl<G> Phase<G> {
    /// May `name` be played in this phase?
    pub(crate) fn allows(&self, name: &str) -> bool {
        self.allowed_moves
            .as_ref()
            .map_or(true, |allowed| allowed.contains(name))
    }
}

impl<G> Clone for Phase<G> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
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

impl<G> std::fmt::Debug for Phase<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Phase")
            .field("id", &self.id)
            .field("next", &self.next)
            .field("turn_order", &self.turn_order)
            .field("move_limit", &self.move_limit)
            .finish_non_exhaustive()
    }
}
