//! Callable game functions and the context they run in.
//!
//! Moves and lifecycle hooks share one signature so that plugins can wrap
//! both uniformly:
//!
//! ```text
//! (G, &mut FnContext, args) -> Option<G>
//! ```
//!
//! Returning `None` means "no state change". Hooks are called with empty
//! args.

use std::sync::Arc;

use serde_json::Value;

use crate::core::{Context, GameEvent, GameRng, GameRngState, PlayerId};
use crate::flow::Events;

type GameFnInner<G> = dyn Fn(&G, &mut FnContext<'_>, &[Value]) -> Option<G> + Send + Sync;

/// A move or hook function.
///
/// Cheap to clone (`Arc`). Plugins receive one and return a wrapped one.
///
/// ## Example
///
/// ```
/// use turn_engine::plugins::GameFn;
///
/// let add: GameFn<i64> = GameFn::new(|g, _fctx, args| {
///     let n = args.first().and_then(|v| v.as_i64()).unwrap_or(1);
///     Some(g + n)
/// });
/// ```
pub struct GameFn<G>(Arc<GameFnInner<G>>);

impl<G: 'static> GameFn<G> {
    /// Wrap a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&G, &mut FnContext<'_>, &[Value]) -> Option<G> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap a closure that ignores arguments (lifecycle hooks).
    pub fn hook<F>(f: F) -> Self
    where
        F: Fn(&G, &mut FnContext<'_>) -> Option<G> + Send + Sync + 'static,
    {
        Self::new(move |g, fctx, _args| f(g, fctx))
    }

    /// Invoke the function.
    pub fn call(&self, g: &G, fctx: &mut FnContext<'_>, args: &[Value]) -> Option<G> {
        (self.0)(g, fctx, args)
    }
}

impl<G> Clone for GameFn<G> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<G> std::fmt::Debug for GameFn<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GameFn(..)")
    }
}

/// What a move or hook sees while it runs.
///
/// Exposes the read-only [`Context`], a live [`GameRng`] restored from the
/// context's snapshot, and the [`Events`] handle. The engine collects the
/// advanced RNG state and the requested events once the function returns.
///
/// Moves and the `on_move` hook also see the acting player and the move
/// name.
#[derive(Debug)]
pub struct FnContext<'a> {
    ctx: &'a Context,
    move_name: Option<&'a str>,
    rng: GameRng,
    events: Events,
}

impl<'a> FnContext<'a> {
    /// Context for a function about to run against `ctx`.
    #[must_use]
    pub fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            move_name: None,
            rng: GameRng::from_state(&ctx.random),
            events: Events::default(),
        }
    }

    /// Context for `name` as played by `ctx.player_id`.
    #[must_use]
    pub(crate) fn for_move(ctx: &'a Context, name: &'a str) -> Self {
        Self {
            move_name: Some(name),
            ..Self::new(ctx)
        }
    }

    /// Engine metadata.
    #[must_use]
    pub fn ctx(&self) -> &Context {
        self.ctx
    }

    /// Player performing the move. `None` inside lifecycle hooks other
    /// than `on_move`.
    #[must_use]
    pub fn player_id(&self) -> Option<PlayerId> {
        self.ctx.player_id
    }

    /// Name of the move being played, or that `on_move` follows.
    #[must_use]
    pub fn move_name(&self) -> Option<&str> {
        self.move_name
    }

    /// Deterministic randomness.
    pub fn random(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    /// Lifecycle events handle.
    pub fn events(&mut self) -> &mut Events {
        &mut self.events
    }

    /// Advanced RNG state and requested events.
    #[must_use]
    pub(crate) fn finish(self) -> (GameRngState, Vec<GameEvent>) {
        (self.rng.state(), self.events.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PhaseId;
    use serde_json::json;

    fn ctx() -> Context {
        Context::new(2, 7, PhaseId::default_phase())
    }

    #[test]
    fn test_game_fn_call() {
        let add: GameFn<i64> = GameFn::new(|g, _, args| Some(g + args[0].as_i64().unwrap_or(0)));
        let ctx = ctx();
        let mut fctx = FnContext::new(&ctx);

        assert_eq!(add.call(&1, &mut fctx, &[json!(2)]), Some(3));
    }

    #[test]
    fn test_hook_ignores_args() {
        let double: GameFn<i64> = GameFn::hook(|g, _| Some(g * 2));
        let ctx = ctx();
        let mut fctx = FnContext::new(&ctx);

        assert_eq!(double.call(&4, &mut fctx, &[json!("ignored")]), Some(8));
    }

    #[test]
    fn test_finish_returns_rng_and_events() {
        let ctx = ctx();
        let mut fctx = FnContext::new(&ctx);

        fctx.random().d6();
        fctx.events().end_turn(None);
        let (rng, events) = fctx.finish();

        assert_ne!(rng, ctx.random);
        assert_eq!(events, vec![GameEvent::EndTurn { next: None }]);
    }

    #[test]
    fn test_player_id_from_view() {
        let ctx = ctx().for_player(PlayerId::new(1));
        let fctx = FnContext::new(&ctx);

        assert_eq!(fctx.player_id(), Some(PlayerId::new(1)));
        assert_eq!(fctx.move_name(), None);
    }

    #[test]
    fn test_for_move_carries_name() {
        let ctx = ctx().for_player(PlayerId::new(0));
        let fctx = FnContext::for_move(&ctx, "draw");

        assert_eq!(fctx.move_name(), Some("draw"));
        assert_eq!(fctx.player_id(), Some(PlayerId::new(0)));
    }
}
