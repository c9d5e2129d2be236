//! Move lookup and invocation.
//!
//! A move request resolves only when every check passes:
//! 1. the acting player holds a seat
//! 2. the active phase allows the move name
//! 3. the name is registered
//! 4. the registration has a callable function
//!
//! Any failure is a silent no-op for the reducer.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::core::{Context, GameEvent, GameRngState, Move, MoveAction};
use crate::flow::Phase;
use crate::plugins::{FnContext, GameFn, Pipeline};

/// A move ready to call: already wrapped by every plugin.
pub(crate) struct ResolvedMove<G> {
    pub(crate) func: GameFn<G>,
    pub(crate) redact: bool,
    pub(crate) undoable: bool,
}

/// Outcome of running a resolved move.
pub(crate) struct Invocation<G> {
    pub(crate) g: Option<G>,
    pub(crate) random: GameRngState,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) redact: bool,
    pub(crate) undoable: bool,
}

/// Registered moves, wrapped once at build time.
pub(crate) struct Dispatcher<G> {
    moves: FxHashMap<String, ResolvedMove<G>>,
    names: Vec<String>,
}

impl<G: 'static> Dispatcher<G> {
    pub(crate) fn new(moves: FxHashMap<String, Move<G>>, pipeline: &Pipeline<G>) -> Self {
        let mut names: Vec<String> = moves.keys().cloned().collect();
        names.sort();

        let moves = moves
            .into_iter()
            .filter_map(|(name, mv)| {
                let func = pipeline.wrap(mv.func()?.clone());
                Some((
                    name,
                    ResolvedMove {
                        func,
                        redact: mv.redact(),
                        undoable: mv.undoable(),
                    },
                ))
            })
            .collect();

        Self { moves, names }
    }

    /// Registered move names, sorted.
    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn resolve(
        &self,
        phase: &Phase<G>,
        action: &MoveAction,
        ctx: &Context,
    ) -> Option<&ResolvedMove<G>> {
        if !action.player_id.is_seated(ctx.num_players()) {
            trace!(player = %action.player_id, "rejecting move from unseated player");
            return None;
        }
        if !phase.allows(&action.name) {
            trace!(name = %action.name, phase = %phase.id, "move not allowed in this phase");
            return None;
        }
        let resolved = self.moves.get(&action.name);
        if resolved.is_none() {
            trace!(name = %action.name, "unknown or inert move");
        }
        resolved
    }

    /// Resolve and run `action` against `g`. `None` when it does not resolve.
    pub(crate) fn invoke(
        &self,
        phase: &Phase<G>,
        g: &G,
        action: &MoveAction,
        ctx: &Context,
    ) -> Option<Invocation<G>> {
        let resolved = self.resolve(phase, action, ctx)?;
        let view = ctx.for_player(action.player_id);
        let mut fctx = FnContext::for_move(&view, &action.name);
        let next = resolved.func.call(g, &mut fctx, &action.args);
        let (random, events) = fctx.finish();

        Some(Invocation {
            g: next,
            random,
            events,
            redact: resolved.redact,
            undoable: resolved.undoable,
        })
    }
}

impl<G> std::fmt::Debug for Dispatcher<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("moves", &self.names).finish()
    }
}
