//! Built-in plugin that traces every move and hook call.

use tracing::trace;

use super::function::GameFn;
use super::pipeline::Plugin;

/// A plugin that opens a `tracing` span around each wrapped call.
///
/// Records turn, phase, acting player and whether the function changed
/// the state. Install a subscriber at `TRACE` level to see the output.
#[must_use]
pub fn trace<G: 'static>() -> Plugin<G> {
    Plugin::new("trace").with_fn_wrap(|inner: GameFn<G>| {
        GameFn::new(move |g: &G, fctx, args| {
            let span = tracing::trace_span!(
                "game_fn",
                turn = fctx.ctx().turn,
                phase = %fctx.ctx().phase,
                player = ?fctx.player_id(),
                args = args.len(),
            );
            let _enter = span.enter();
            let out = inner.call(g, fctx, args);
            trace!(changed = out.is_some(), "game function returned");
            out
        })
    })
}
